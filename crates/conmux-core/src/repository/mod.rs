use std::path::PathBuf;

use conmux_types::DeclaredConfig;

use crate::error::Result;

mod fs;
#[cfg(test)]
mod memory;

pub use fs::FsRepository;
#[cfg(test)]
pub(crate) use memory::{MemoryRepository, Op};

/// Persistent supervisor state: PID records, last-applied configuration
/// snapshots and the declared configuration files.
///
/// Names are always returned sorted.
pub trait Repository: Send + Sync {
    /// Names with a PID record.
    fn tracked(&self) -> Result<Vec<String>>;
    fn pid(&self, name: &str) -> Result<Option<u32>>;
    fn set_pid(&mut self, name: &str, pid: u32) -> Result<()>;
    /// Removing an absent record is not an error.
    fn remove_pid(&mut self, name: &str) -> Result<()>;

    fn snapshot(&self, name: &str) -> Result<Option<Vec<u8>>>;
    fn set_snapshot(&mut self, name: &str, content: &[u8]) -> Result<()>;

    /// Names with a configuration file.
    fn declared(&self) -> Result<Vec<String>>;
    /// Current content of one declared configuration.
    fn config(&self, name: &str) -> Result<DeclaredConfig>;

    /// Make sure the registry's data file exists and return its path.
    fn ensure_registry_file(&mut self) -> Result<PathBuf>;
}
