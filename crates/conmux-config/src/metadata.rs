use conmux_types::ConfigMeta;

use crate::ConfigError;

pub const TYPE_MARKER: &str = "TYPE:";
pub const FLAGS_MARKER: &str = "FLAGS:";

/// Extract the type tag and helper roles from a `.cf` file.
///
/// Markers may sit behind any number of `#`. The first `TYPE:` line decides
/// the type; every `FLAGS:` line adds roles, up to a `#` token.
///
/// # Errors
///
/// Returns a `ConfigError` if a role contains `/`.
pub fn parse_metadata(text: &str) -> Result<ConfigMeta, ConfigError> {
    let mut meta = ConfigMeta::default();

    for line in text.lines() {
        let line = line.trim().trim_start_matches('#').trim_start();

        if let Some(rest) = line.strip_prefix(TYPE_MARKER) {
            if meta.service_type.is_none() {
                meta.service_type = rest.split_whitespace().next().map(str::to_owned);
            }
        } else if let Some(rest) = line.strip_prefix(FLAGS_MARKER) {
            for role in rest
                .split_whitespace()
                .take_while(|token| !token.starts_with('#'))
            {
                if role.contains('/') {
                    return Err(ConfigError::Validation(format!(
                        "helper role `{role}` contains `/`"
                    )));
                }
                if !meta.flags.iter().any(|r| r == role) {
                    meta.flags.push(role.to_owned());
                }
            }
        }
    }

    Ok(meta)
}
