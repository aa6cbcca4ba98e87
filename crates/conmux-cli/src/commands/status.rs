use anyhow::Result;
use conmux_config::{Layout, Settings};
use conmux_core::{PassReport, SupervisorCommand};

/// Read-only, so no lock is taken.
pub async fn status(layout: Layout, settings: Settings) -> Result<PassReport> {
    let mut supervisor = super::supervisor(layout, settings)?;
    Ok(supervisor.run(SupervisorCommand::Status).await?)
}
