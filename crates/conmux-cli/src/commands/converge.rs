use anyhow::Result;
use conmux_config::{Layout, Settings};
use conmux_core::{PassReport, SupervisorCommand, SupervisorLock};

/// Start or stop pass, serialized against other invocations.
pub async fn converge(
    layout: Layout,
    settings: Settings,
    command: SupervisorCommand,
) -> Result<PassReport> {
    let lock = SupervisorLock::acquire(&layout.lock_file())?;
    tracing::debug!("Holding {}", lock.path().display());

    let mut supervisor = super::supervisor(layout, settings)?;
    let report = supervisor.run(command).await?;

    drop(lock);
    Ok(report)
}
