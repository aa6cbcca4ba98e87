use std::{
    collections::BTreeMap,
    path::{Path, PathBuf},
};

use crate::ConfigError;

pub const ROOT_VAR: &str = "CONMUX";
pub const DEFAULT_ROOT: &str = "/usr/local/conmux";
pub const RC_FILE: &str = ".conmuxrc";

/// Resolve the installation root.
///
/// The `--root` flag wins, then a `CONMUX=` assignment in `~/.conmuxrc`, then
/// the `CONMUX` environment variable, then [`DEFAULT_ROOT`].
///
/// # Errors
///
/// Returns a `ConfigError` if the rc file exists but cannot be read.
pub fn resolve_root(flag: Option<PathBuf>) -> Result<PathBuf, ConfigError> {
    if let Some(root) = flag {
        return Ok(root);
    }

    let home = dirs::home_dir();
    let rc = match &home {
        Some(home) => read_rc(&home.join(RC_FILE))?,
        None => None,
    };

    Ok(resolve_root_with(
        None,
        rc.as_deref(),
        |key| std::env::var(key).ok(),
        home.as_deref(),
    ))
}

fn read_rc(path: &Path) -> Result<Option<String>, ConfigError> {
    match std::fs::read_to_string(path) {
        Ok(text) => {
            tracing::debug!("Loaded rc file {}", path.display());
            Ok(Some(text))
        }
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(None),
        Err(err) => Err(ConfigError::Io(err)),
    }
}

/// Same precedence as [`resolve_root`] with every source passed in.
pub fn resolve_root_with<F>(
    flag: Option<PathBuf>,
    rc: Option<&str>,
    env: F,
    home: Option<&Path>,
) -> PathBuf
where
    F: Fn(&str) -> Option<String>,
{
    if let Some(root) = flag {
        return root;
    }
    if let Some(text) = rc {
        if let Some(root) = parse_rc(text, &env, home).remove(ROOT_VAR) {
            return PathBuf::from(root);
        }
    }
    env(ROOT_VAR).map_or_else(|| PathBuf::from(DEFAULT_ROOT), PathBuf::from)
}

/// Parse shell-style `KEY=VALUE` assignments.
///
/// Values are expanded against earlier assignments and then `env`, the way
/// sourcing the file would. Later assignments to the same key win.
pub fn parse_rc<F>(text: &str, env: &F, home: Option<&Path>) -> BTreeMap<String, String>
where
    F: Fn(&str) -> Option<String>,
{
    let mut vars = BTreeMap::new();

    for line in text.lines() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        let line = line.strip_prefix("export ").map_or(line, str::trim_start);
        let Some((key, value)) = line.split_once('=') else {
            tracing::debug!("Skipping rc line without assignment: {line:?}");
            continue;
        };
        if !is_identifier(key) {
            tracing::debug!("Skipping rc line with invalid name: {line:?}");
            continue;
        }

        let value = match unquote(value) {
            Quoted::Literal(value) => value.to_owned(),
            Quoted::Expand(value) => shellexpand::full_with_context_no_errors(
                value,
                || home.and_then(Path::to_str).map(str::to_owned),
                |name: &str| vars.get(name).cloned().or_else(|| env(name)),
            )
            .into_owned(),
        };
        vars.insert(key.to_owned(), value);
    }

    vars
}

enum Quoted<'a> {
    Literal(&'a str),
    Expand(&'a str),
}

fn unquote(value: &str) -> Quoted<'_> {
    let value = value.trim();
    if let Some(rest) = value.strip_prefix('\'') {
        return Quoted::Literal(rest.split_once('\'').map_or(rest, |(inner, _)| inner));
    }
    if let Some(rest) = value.strip_prefix('"') {
        return Quoted::Expand(rest.split_once('"').map_or(rest, |(inner, _)| inner));
    }
    Quoted::Expand(value.split_whitespace().next().unwrap_or_default())
}

fn is_identifier(key: &str) -> bool {
    let mut chars = key.chars();
    chars
        .next()
        .is_some_and(|c| c.is_ascii_alphabetic() || c == '_')
        && chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}

#[cfg(test)]
mod tests {
    use super::*;

    fn no_env(_: &str) -> Option<String> {
        None
    }

    #[test]
    fn test_precedence() {
        let env = |key: &str| (key == ROOT_VAR).then(|| "/from/env".to_owned());

        assert_eq!(
            resolve_root_with(Some("/from/flag".into()), Some("CONMUX=/from/rc"), env, None),
            PathBuf::from("/from/flag")
        );
        assert_eq!(
            resolve_root_with(None, Some("CONMUX=/from/rc"), env, None),
            PathBuf::from("/from/rc")
        );
        assert_eq!(
            resolve_root_with(None, Some("OTHER=1"), env, None),
            PathBuf::from("/from/env")
        );
        assert_eq!(
            resolve_root_with(None, None, no_env, None),
            PathBuf::from(DEFAULT_ROOT)
        );
    }

    #[test]
    fn test_parse_rc_forms() {
        let text = r#"
            # site settings
            export CONMUX="/srv/conmux"
            LAB='$NOT_EXPANDED'
            PLAIN=value # trailing comment
            not an assignment
            1BAD=x
        "#;
        let vars = parse_rc(text, &no_env, None);
        assert_eq!(vars["CONMUX"], "/srv/conmux");
        assert_eq!(vars["LAB"], "$NOT_EXPANDED");
        assert_eq!(vars["PLAIN"], "value");
        assert_eq!(vars.len(), 3);
    }

    #[test]
    fn test_parse_rc_expansion() {
        let env = |key: &str| (key == "HOST_ROOT").then(|| "/hosts".to_owned());
        let text = "BASE=$HOST_ROOT/lab\n\
                    CONMUX=${CONMUX:-/srv/conmux}\n\
                    LOCAL=~/conmux\n\
                    LOGS=$BASE/log";
        let vars = parse_rc(text, &env, Some(Path::new("/home/lab")));
        assert_eq!(vars["BASE"], "/hosts/lab");
        assert_eq!(vars["CONMUX"], "/srv/conmux");
        assert_eq!(vars["LOGS"], "/hosts/lab/log");
        assert_eq!(vars["LOCAL"], "/home/lab/conmux");
    }

    #[test]
    fn test_parse_rc_last_assignment_wins() {
        let vars = parse_rc("CONMUX=/a\nCONMUX=/b", &no_env, None);
        assert_eq!(vars["CONMUX"], "/b");
    }
}
