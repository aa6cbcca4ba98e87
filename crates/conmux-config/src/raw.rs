use serde::Deserialize;

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub(crate) struct RawSettings {
    pub registry_port: Option<u16>,
    pub settle_delay_ms: Option<u64>,
    pub name_prefix: Option<String>,
    pub autoboot_types: Option<Vec<String>>,
    #[serde(default)]
    pub commands: RawCommands,
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub(crate) struct RawCommands {
    pub registry: Option<String>,
    pub server: Option<String>,
    pub attach: Option<String>,
    pub status: Option<String>,
}
