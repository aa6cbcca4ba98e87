use std::{collections::BTreeSet, ffi::OsString};

use conmux_config::{parse_metadata, Layout, Settings};
use conmux_types::{base_name, is_helper, DeclaredConfig, Helper, REGISTRY};

use crate::{
    error::{Error, Result},
    repository::Repository,
    supervisor::commands::{PassReport, SupervisorCommand, SupervisorEvent},
    CommandSpec, ProcessManager,
};

/// Reconciles the processes recorded in a [`Repository`] against the
/// configurations it declares.
///
/// A pass never stops at the first failing service: per-service errors are
/// logged and recorded in the returned [`PassReport`]. Only failing to list
/// the tracked or declared services aborts a pass.
#[derive(Debug)]
pub struct Supervisor<P: ProcessManager, R: Repository> {
    process_manager: P,
    repository: R,
    layout: Layout,
    settings: Settings,
    env: Vec<(String, String)>,
}

impl<P: ProcessManager, R: Repository> Supervisor<P, R> {
    /// `inherited_path` is extended with the installation's search dirs to
    /// form the `PATH` of every launched process.
    ///
    /// # Errors
    ///
    /// Returns an error if the search path for launched processes cannot be
    /// built.
    pub fn new(
        process_manager: P,
        repository: R,
        layout: Layout,
        settings: Settings,
        inherited_path: Option<OsString>,
    ) -> Result<Self> {
        let path = layout.search_path(inherited_path)?;
        let env = vec![("PATH".to_owned(), path.to_string_lossy().into_owned())];

        Ok(Self {
            process_manager,
            repository,
            layout,
            settings,
            env,
        })
    }

    /// Run one pass.
    ///
    /// # Errors
    ///
    /// Returns an error if the tracked or declared services cannot be listed.
    pub async fn run(&mut self, command: SupervisorCommand) -> Result<PassReport> {
        tracing::info!("Running {command:?} pass in {}", self.layout.root().display());

        let mut report = PassReport::default();
        let tracked = self.repository.tracked()?;
        tracing::debug!("Tracked: {tracked:?}");

        match command {
            SupervisorCommand::Start => {
                let kept = self.start_all(&tracked, &mut report).await?;
                self.converge(&tracked, &kept, &mut report).await;
            }
            SupervisorCommand::Stop => {
                self.converge(&tracked, &BTreeSet::new(), &mut report).await;
            }
            SupervisorCommand::Status => {
                self.status(&tracked, &mut report).await;
            }
        }

        Ok(report)
    }

    async fn start_all(
        &mut self,
        tracked: &[String],
        report: &mut PassReport,
    ) -> Result<BTreeSet<String>> {
        let mut kept = BTreeSet::from([REGISTRY.to_owned()]);

        match self.repository.ensure_registry_file() {
            Ok(data_file) => {
                let spec = self.spec(
                    REGISTRY,
                    vec![
                        self.settings.commands.registry.clone(),
                        self.settings.registry_port.to_string(),
                        data_file.to_string_lossy().into_owned(),
                    ],
                );
                if self.start(spec, report).await {
                    self.settle().await;
                }
            }
            Err(err) => report.fail(REGISTRY, &err),
        }

        let declared = self.repository.declared()?;
        tracing::debug!("Declared: {declared:?}");

        let mut started_any = false;
        let mut helpers = Vec::new();
        for name in declared {
            let config = match self.repository.config(&name) {
                Ok(config) => config,
                Err(err) => {
                    // Leave it and its helpers running until it reads again.
                    report.fail(&name, &err);
                    kept.extend(
                        tracked
                            .iter()
                            .filter(|t| is_helper_of(t, &name))
                            .cloned(),
                    );
                    kept.insert(name);
                    continue;
                }
            };
            kept.insert(name);
            started_any |= self.apply(&config, report).await;
            helpers.extend(self.helpers(&config, report));
        }

        kept.extend(helpers.iter().map(Helper::tracked_name));

        if started_any {
            self.settle().await;
        }

        for helper in helpers {
            tracing::info!("Starting helper {}", helper.label());
            let spec = self.spec(
                &helper.tracked_name(),
                vec![
                    self.settings.commands.attach.clone(),
                    base_name(&helper.service, &self.settings.name_prefix).to_owned(),
                    helper.role_arg(),
                ],
            );
            self.start(spec, report).await;
        }

        Ok(kept)
    }

    /// Restart on changed content, start if not running, then record the
    /// content as applied. Returns whether a process was launched.
    async fn apply(&mut self, config: &DeclaredConfig, report: &mut PassReport) -> bool {
        let name = &config.name;

        match self.repository.snapshot(name) {
            Ok(Some(snapshot)) if snapshot != config.content => {
                tracing::info!("Configuration of `{name}` changed");
                report.push(SupervisorEvent::ConfigChanged { name: name.clone() });
                self.stop(name, report).await;
            }
            Ok(_) => {}
            Err(err) => tracing::warn!("Cannot read snapshot of `{name}`: {err}"),
        }

        let spec = self.spec(
            name,
            vec![
                self.settings.commands.server.clone(),
                config.path.to_string_lossy().into_owned(),
            ],
        );
        let started = self.start(spec, report).await;

        if let Err(err) = self.repository.set_snapshot(name, &config.content) {
            report.fail(name, &err);
        }

        started
    }

    fn helpers(&self, config: &DeclaredConfig, report: &mut PassReport) -> Vec<Helper> {
        match parse_metadata(&String::from_utf8_lossy(&config.content)) {
            Ok(meta) if meta.is_autoboot(&self.settings.autoboot_types) => meta
                .flags
                .into_iter()
                .map(|role| Helper::new(config.name.as_str(), role))
                .collect(),
            Ok(_) => vec![],
            Err(err) => {
                report.fail(&config.name, &Error::Config(err));
                vec![]
            }
        }
    }

    /// Launch unless the recorded process is alive. Returns whether a
    /// process was launched.
    async fn start(&mut self, spec: CommandSpec, report: &mut PassReport) -> bool {
        let name = spec.name.clone();

        match self.repository.pid(&name) {
            Ok(Some(pid)) if self.process_manager.is_alive(pid) => {
                tracing::debug!("`{name}` already running as pid {pid}");
                report.push(SupervisorEvent::AlreadyRunning { name, pid });
                return false;
            }
            Ok(Some(pid)) => tracing::debug!("Recorded pid {pid} of `{name}` is gone"),
            Ok(None) => {}
            Err(err) => tracing::warn!("Treating `{name}` as stopped: {err}"),
        }

        let pid = match self.process_manager.spawn(spec).await {
            Ok(pid) => pid,
            Err(err) => {
                report.fail(&name, &err);
                return false;
            }
        };
        tracing::info!("Started `{name}` as pid {pid}");

        let recorded = self.repository.set_pid(&name, pid);
        report.push(SupervisorEvent::Started {
            name: name.clone(),
            pid,
        });
        if let Err(err) = recorded {
            report.fail(&name, &err);
        }

        true
    }

    /// Signal the recorded process and drop its record.
    async fn stop(&mut self, name: &str, report: &mut PassReport) {
        let pid = self.repository.pid(name).unwrap_or_else(|err| {
            tracing::warn!("Dropping record of `{name}`: {err}");
            None
        });

        if let Some(pid) = pid {
            if let Err(err) = self.process_manager.shutdown(pid).await {
                tracing::warn!("Cannot stop `{name}`: {err}");
            }
        }

        if let Err(err) = self.repository.remove_pid(name) {
            report.fail(name, &err);
            return;
        }
        tracing::info!("Stopped `{name}`");
        report.push(SupervisorEvent::Stopped {
            name: name.to_owned(),
            pid,
        });
    }

    async fn converge(
        &mut self,
        tracked: &[String],
        kept: &BTreeSet<String>,
        report: &mut PassReport,
    ) {
        for name in tracked.iter().filter(|name| !kept.contains(*name)) {
            self.stop(name, report).await;
        }
    }

    async fn status(&mut self, tracked: &[String], report: &mut PassReport) {
        for name in tracked {
            if name == REGISTRY || is_helper(name) {
                continue;
            }

            let base = base_name(name, &self.settings.name_prefix).to_owned();
            let mut spec = self.spec(
                name,
                vec![
                    self.settings.commands.status.clone(),
                    "-s".to_owned(),
                    base.clone(),
                ],
            );
            spec.log = None;

            match self.process_manager.capture(spec).await {
                Ok(line) => report.push(SupervisorEvent::Status { base, line }),
                Err(err) => report.fail(name, &err),
            }
        }
    }

    async fn settle(&self) {
        if self.settings.settle_delay.is_zero() {
            return;
        }
        tracing::debug!("Waiting {:?} for new processes", self.settings.settle_delay);
        tokio::time::sleep(self.settings.settle_delay).await;
    }

    fn spec(&self, name: &str, cmd: Vec<String>) -> CommandSpec {
        CommandSpec {
            name: name.to_owned(),
            cmd,
            cwd: Some(self.layout.root().to_path_buf()),
            env: self.env.clone(),
            log: Some(self.layout.log_file(name)),
        }
    }
}

fn is_helper_of(tracked: &str, service: &str) -> bool {
    is_helper(tracked)
        && tracked
            .strip_prefix(service)
            .is_some_and(|rest| rest.starts_with('-'))
}
