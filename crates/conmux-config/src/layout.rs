use std::{
    ffi::OsString,
    path::{Path, PathBuf},
};

use crate::ConfigError;

pub const CONFIG_EXTENSION: &str = "cf";
pub const PID_EXTENSION: &str = "pid";
pub const LOG_EXTENSION: &str = "log";
pub const SETTINGS_FILE: &str = "supervisor.toml";
pub const LOCK_FILE: &str = "supervisor.lock";
pub const REGISTRY_FILE: &str = "registry";

const SEARCH_DIRS: [&str; 4] = ["bin", "sbin", "lib/drivers", "lib/helpers"];

/// Every on-disk location the supervisor touches, computed from the root.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Layout {
    root: PathBuf,
}

impl Layout {
    #[must_use]
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Layout of an existing installation, with the root made absolute.
    ///
    /// Launched processes run inside the root, so every path handed to them
    /// must not depend on the supervisor's own working directory.
    ///
    /// # Errors
    ///
    /// Returns a `ConfigError` if the root is not a directory.
    pub fn open(root: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let root = root.as_ref();
        if !root.is_dir() {
            return Err(ConfigError::Validation(format!(
                "root {} is not a directory",
                root.display()
            )));
        }
        Ok(Self::new(std::fs::canonicalize(root)?))
    }

    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    #[must_use]
    pub fn config_dir(&self) -> PathBuf {
        self.root.join("etc")
    }

    #[must_use]
    pub fn log_dir(&self) -> PathBuf {
        self.root.join("log")
    }

    #[must_use]
    pub fn config_file(&self, name: &str) -> PathBuf {
        self.config_dir().join(format!("{name}.{CONFIG_EXTENSION}"))
    }

    #[must_use]
    pub fn registry_file(&self) -> PathBuf {
        self.config_dir().join(REGISTRY_FILE)
    }

    #[must_use]
    pub fn settings_file(&self) -> PathBuf {
        self.config_dir().join(SETTINGS_FILE)
    }

    #[must_use]
    pub fn lock_file(&self) -> PathBuf {
        self.log_dir().join(LOCK_FILE)
    }

    #[must_use]
    pub fn pid_file(&self, name: &str) -> PathBuf {
        self.log_dir().join(format!("{name}.{PID_EXTENSION}"))
    }

    #[must_use]
    pub fn log_file(&self, name: &str) -> PathBuf {
        self.log_dir().join(format!("{name}.{LOG_EXTENSION}"))
    }

    /// Last-applied copy of a service's configuration.
    #[must_use]
    pub fn snapshot_file(&self, name: &str) -> PathBuf {
        self.log_dir().join(format!("{name}.{CONFIG_EXTENSION}"))
    }

    #[must_use]
    pub fn search_dirs(&self) -> Vec<PathBuf> {
        SEARCH_DIRS.iter().map(|dir| self.root.join(dir)).collect()
    }

    /// `PATH` for launched processes: the search dirs followed by `inherited`.
    ///
    /// # Errors
    ///
    /// Returns a `ConfigError` if a search dir contains the path separator.
    pub fn search_path(&self, inherited: Option<OsString>) -> Result<OsString, ConfigError> {
        let mut dirs = self.search_dirs();
        if let Some(inherited) = inherited {
            dirs.extend(std::env::split_paths(&inherited));
        }
        std::env::join_paths(dirs).map_err(|err| ConfigError::Validation(err.to_string()))
    }

    /// Checks the root and creates `etc/` and `log/` when missing.
    ///
    /// # Errors
    ///
    /// Returns a `ConfigError` if the root is not a directory or the
    /// subdirectories cannot be created.
    pub fn prepare(&self) -> Result<(), ConfigError> {
        if !self.root.is_dir() {
            return Err(ConfigError::Validation(format!(
                "root {} is not a directory",
                self.root.display()
            )));
        }
        std::fs::create_dir_all(self.config_dir())?;
        std::fs::create_dir_all(self.log_dir())?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_paths() {
        let layout = Layout::new("/usr/local/conmux");
        assert_eq!(
            layout.pid_file("blade3"),
            PathBuf::from("/usr/local/conmux/log/blade3.pid")
        );
        assert_eq!(
            layout.log_file("registry"),
            PathBuf::from("/usr/local/conmux/log/registry.log")
        );
        assert_eq!(
            layout.snapshot_file("blade3"),
            PathBuf::from("/usr/local/conmux/log/blade3.cf")
        );
        assert_eq!(
            layout.registry_file(),
            PathBuf::from("/usr/local/conmux/etc/registry")
        );
    }

    #[test]
    fn test_search_path_prepends() {
        let layout = Layout::new("/opt/conmux");
        let path = layout.search_path(Some("/usr/bin:/bin".into())).unwrap();
        let dirs: Vec<PathBuf> = std::env::split_paths(&path).collect();
        assert_eq!(
            dirs,
            vec![
                PathBuf::from("/opt/conmux/bin"),
                PathBuf::from("/opt/conmux/sbin"),
                PathBuf::from("/opt/conmux/lib/drivers"),
                PathBuf::from("/opt/conmux/lib/helpers"),
                PathBuf::from("/usr/bin"),
                PathBuf::from("/bin"),
            ]
        );
    }

    #[test]
    fn test_prepare() {
        let dir = tempfile::tempdir().unwrap();
        let layout = Layout::new(dir.path());
        layout.prepare().unwrap();
        assert!(layout.config_dir().is_dir());
        assert!(layout.log_dir().is_dir());

        let missing = Layout::new(dir.path().join("missing"));
        assert!(missing.prepare().is_err());
    }

    #[test]
    fn test_open_makes_root_absolute() {
        let dir = tempfile::tempdir_in(".").unwrap();
        let name = dir.path().file_name().unwrap();
        let relative = Path::new(".").join(name);

        let layout = Layout::open(&relative).unwrap();
        assert!(layout.root().is_absolute());
        assert_eq!(layout.root(), dir.path().canonicalize().unwrap());
        assert_eq!(
            layout.config_file("blade3"),
            layout.root().join("etc/blade3.cf")
        );
        assert!(layout.search_dirs().iter().all(|d| d.is_absolute()));
    }

    #[test]
    fn test_open_does_not_create_anything() {
        let dir = tempfile::tempdir().unwrap();
        let layout = Layout::open(dir.path()).unwrap();
        assert!(!layout.config_dir().exists());
        assert!(!layout.log_dir().exists());

        assert!(Layout::open(dir.path().join("missing")).is_err());
        std::fs::write(dir.path().join("file"), "").unwrap();
        assert!(Layout::open(dir.path().join("file")).is_err());
    }
}
