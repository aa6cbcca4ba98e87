use std::time::Duration;

use crate::{raw::RawSettings, ConfigError};

pub const DEFAULT_REGISTRY_PORT: u16 = 63000;
pub const DEFAULT_SETTLE_DELAY: Duration = Duration::from_secs(1);
pub const DEFAULT_AUTOBOOT_TYPE: &str = "autoboot";

/// Executables launched by the supervisor, resolved through the search path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Commands {
    pub registry: String,
    pub server: String,
    pub attach: String,
    pub status: String,
}

impl Default for Commands {
    fn default() -> Self {
        Self {
            registry: "conmux-registry".to_owned(),
            server: "conmux".to_owned(),
            attach: "conmux-attach".to_owned(),
            status: "console".to_owned(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub registry_port: u16,
    pub settle_delay: Duration,
    pub name_prefix: String,
    pub autoboot_types: Vec<String>,
    pub commands: Commands,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            registry_port: DEFAULT_REGISTRY_PORT,
            settle_delay: DEFAULT_SETTLE_DELAY,
            name_prefix: String::new(),
            autoboot_types: vec![DEFAULT_AUTOBOOT_TYPE.to_owned()],
            commands: Commands::default(),
        }
    }
}

fn command(field: &str, value: Option<String>, default: String) -> Result<String, ConfigError> {
    match value {
        Some(value) if value.trim().is_empty() => Err(ConfigError::Validation(format!(
            "commands.{field}: executable is empty"
        ))),
        Some(value) => Ok(value),
        None => Ok(default),
    }
}

impl TryFrom<RawSettings> for Settings {
    type Error = ConfigError;

    fn try_from(raw: RawSettings) -> Result<Self, Self::Error> {
        let defaults = Settings::default();

        if raw.registry_port == Some(0) {
            return Err(ConfigError::Validation(
                "registry_port: must not be 0".to_owned(),
            ));
        }

        let autoboot_types = raw.autoboot_types.unwrap_or(defaults.autoboot_types);
        if autoboot_types.iter().any(|t| t.trim().is_empty()) {
            return Err(ConfigError::Validation(
                "autoboot_types: contains empty element".to_owned(),
            ));
        }

        let commands = Commands {
            registry: command("registry", raw.commands.registry, defaults.commands.registry)?,
            server: command("server", raw.commands.server, defaults.commands.server)?,
            attach: command("attach", raw.commands.attach, defaults.commands.attach)?,
            status: command("status", raw.commands.status, defaults.commands.status)?,
        };

        Ok(Settings {
            registry_port: raw.registry_port.unwrap_or(defaults.registry_port),
            settle_delay: raw
                .settle_delay_ms
                .map_or(defaults.settle_delay, Duration::from_millis),
            name_prefix: raw.name_prefix.unwrap_or_default(),
            autoboot_types,
            commands,
        })
    }
}
