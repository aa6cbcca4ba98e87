mod env;
mod layout;
mod metadata;
mod model;
mod raw;

pub use env::{parse_rc, resolve_root, resolve_root_with, DEFAULT_ROOT, RC_FILE, ROOT_VAR};
pub use layout::{Layout, CONFIG_EXTENSION, PID_EXTENSION};
pub use metadata::{parse_metadata, FLAGS_MARKER, TYPE_MARKER};
pub use model::{Commands, Settings};

/// Error type for configuration parsing.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[cfg(feature = "toml")]
    #[error("toml parse error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("validation error(s): {0}")]
    Validation(String),
}

/// Load the tuning file of an installation, falling back to defaults when
/// `etc/supervisor.toml` does not exist.
///
/// # Errors
///
/// Returns a `ConfigError` if the file cannot be read or parsed.
pub fn load_settings(layout: &Layout) -> Result<Settings, ConfigError> {
    let path = layout.settings_file();
    match std::fs::read_to_string(&path) {
        Ok(text) => {
            tracing::debug!("Loading settings from {}", path.display());
            parse_settings(&text)
        }
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(Settings::default()),
        Err(err) => Err(ConfigError::Io(err)),
    }
}

/// Parse settings from a string.
///
/// # Errors
///
/// Returns a `ConfigError` if the configuration string cannot be parsed.
#[cfg(feature = "toml")]
pub fn parse_settings(config: &str) -> Result<Settings, ConfigError> {
    let raw = toml::from_str::<raw::RawSettings>(config)?;
    raw.try_into()
}

/// Parse settings from a string.
///
/// # Errors
///
/// Returns a `ConfigError`: without the `toml` feature only an empty file is
/// accepted.
#[cfg(not(feature = "toml"))]
pub fn parse_settings(config: &str) -> Result<Settings, ConfigError> {
    if config.trim().is_empty() {
        return raw::RawSettings::default().try_into();
    }
    Err(ConfigError::Validation(
        "settings file requires the `toml` feature".into(),
    ))
}
