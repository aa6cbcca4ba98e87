mod error;
#[cfg(unix)]
mod lock;
mod process_manager;
mod repository;
mod supervisor;

pub use error::{Error, Result};
#[cfg(unix)]
pub use lock::SupervisorLock;
#[cfg(unix)]
pub use process_manager::UnixProcessManager;
pub use process_manager::{CommandSpec, ProcessManager};
pub use repository::{FsRepository, Repository};
pub use supervisor::{PassReport, Supervisor, SupervisorCommand, SupervisorEvent};
