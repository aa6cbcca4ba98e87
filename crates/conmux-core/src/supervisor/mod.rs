mod commands;
mod reconcile;

pub use commands::{PassReport, SupervisorCommand, SupervisorEvent};
pub use reconcile::Supervisor;
