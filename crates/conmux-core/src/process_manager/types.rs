use std::path::PathBuf;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CommandSpec {
    pub name: String,
    pub cmd: Vec<String>,
    pub cwd: Option<PathBuf>,
    pub env: Vec<(String, String)>,
    /// Receives stdout and stderr, truncated at launch.
    pub log: Option<PathBuf>,
}

impl CommandSpec {
    #[must_use]
    pub fn new(name: impl Into<String>, cmd: Vec<String>) -> Self {
        Self {
            name: name.into(),
            cmd,
            cwd: None,
            env: vec![],
            log: None,
        }
    }
}
