use crate::{error::Result, process_manager::types::CommandSpec};

#[async_trait::async_trait]
pub trait ProcessManager: Send + Sync {
    /// Launch a detached process and return its pid.
    ///
    /// Ownership of the process passes to the OS; only the pid is kept.
    async fn spawn(&mut self, spec: CommandSpec) -> Result<u32>;
    /// Probe whether a process is alive without affecting it.
    fn is_alive(&self, pid: u32) -> bool;
    /// Ask a process to shut down. A process that is already gone is not an error.
    async fn shutdown(&mut self, pid: u32) -> Result<()>;
    /// Run a command to completion and return the first line it printed.
    async fn capture(&mut self, spec: CommandSpec) -> Result<String>;
}
