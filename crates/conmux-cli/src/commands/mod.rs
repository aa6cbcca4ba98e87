use std::process::ExitCode;

use anyhow::{Context, Result};
use conmux_config::{load_settings, resolve_root, Layout, Settings};
use conmux_core::{
    FsRepository, PassReport, Supervisor, SupervisorCommand, SupervisorEvent, UnixProcessManager,
};

use crate::{config::Cli, logger::Logger};

mod converge;
mod status;

/// How a pass ended, beyond structural errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Clean,
    ItemFailures,
}

impl From<Outcome> for ExitCode {
    fn from(outcome: Outcome) -> Self {
        match outcome {
            Outcome::Clean => ExitCode::SUCCESS,
            Outcome::ItemFailures => ExitCode::from(3),
        }
    }
}

pub async fn run(cli: Cli) -> Result<Outcome> {
    let root = resolve_root(cli.root).context("cannot resolve the conmux root")?;
    let layout =
        Layout::open(&root).with_context(|| format!("cannot use {}", root.display()))?;
    let settings = load_settings(&layout)
        .with_context(|| format!("cannot load {}", layout.settings_file().display()))?;

    tracing::debug!("Using {} with {settings:?}", layout.root().display());

    let report = match SupervisorCommand::from(cli.command) {
        command @ (SupervisorCommand::Start | SupervisorCommand::Stop) => {
            layout
                .prepare()
                .with_context(|| format!("cannot use {}", layout.root().display()))?;
            converge::converge(layout, settings, command).await?
        }
        SupervisorCommand::Status => status::status(layout, settings).await?,
    };

    Ok(render(&report, &mut Logger::default()))
}

fn supervisor(
    layout: Layout,
    settings: Settings,
) -> Result<Supervisor<UnixProcessManager, FsRepository>> {
    let repository = FsRepository::new(layout.clone());
    Ok(Supervisor::new(
        UnixProcessManager::new(),
        repository,
        layout,
        settings,
        std::env::var_os("PATH"),
    )?)
}

fn render<W: std::io::Write>(report: &PassReport, logger: &mut Logger<W>) -> Outcome {
    for event in &report.events {
        match event {
            SupervisorEvent::Started { name, pid } => {
                logger.log(name, &format!("started (pid {pid})"));
            }
            SupervisorEvent::AlreadyRunning { name, pid } => {
                logger.log(name, &format!("already running (pid {pid})"));
            }
            SupervisorEvent::ConfigChanged { name } => {
                logger.log(name, "configuration changed, restarting");
            }
            SupervisorEvent::Stopped { name, .. } => logger.log(name, "stopped"),
            SupervisorEvent::Failed { name, message } => {
                logger.error(&format!("{name}: {message}"));
            }
            SupervisorEvent::Status { base, line } => logger.status(base, line),
        }
    }

    if report.has_failures() {
        Outcome::ItemFailures
    } else {
        Outcome::Clean
    }
}
