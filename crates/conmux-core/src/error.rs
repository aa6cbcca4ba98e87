use std::path::PathBuf;

use conmux_config::ConfigError;

pub type Result<R, E = Error> = std::result::Result<R, E>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("internal error: {0}")]
    Internal(String),
    #[error("io error: {0}")]
    IOError(#[from] std::io::Error),
    #[error("empty command for `{0}`")]
    EmptyCommand(String),
    #[error("cannot launch `{name}`: {source}")]
    Spawn {
        name: String,
        #[source]
        source: std::io::Error,
    },
    #[error("cannot signal pid {pid}: {source}")]
    Signal {
        pid: u32,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid pid record for `{name}`: {content:?}")]
    InvalidPidRecord { name: String, content: String },
    #[error("another invocation holds {}", .0.display())]
    Locked(PathBuf),
    #[error(transparent)]
    Config(#[from] ConfigError),
}
