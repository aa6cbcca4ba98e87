use std::{fs::File, process::Stdio};

use libc::{kill, setsid, EPERM, ESRCH, SIGHUP};
use tokio::process::Command;

use crate::{
    error::{Error, Result},
    process_manager::{base::ProcessManager, types::CommandSpec},
};

/// Unix-specific process manager.
///
/// Children are started in their own session and never waited on, so they
/// outlive the supervisor.
#[derive(Debug, Default)]
pub struct UnixProcessManager {}

impl UnixProcessManager {
    #[must_use]
    pub fn new() -> Self {
        Self {}
    }

    fn command(spec: &CommandSpec) -> Result<Command> {
        let Some((program, args)) = spec.cmd.split_first() else {
            return Err(Error::EmptyCommand(spec.name.clone()));
        };

        let mut cmd = Command::new(program);
        cmd.args(args);
        if let Some(dir) = &spec.cwd {
            cmd.current_dir(dir);
        }
        for (k, v) in &spec.env {
            cmd.env(k, v);
        }
        cmd.stdin(Stdio::null());

        Ok(cmd)
    }
}

fn to_pid(pid: u32) -> Option<libc::pid_t> {
    libc::pid_t::try_from(pid).ok().filter(|pid| *pid > 0)
}

#[async_trait::async_trait]
impl ProcessManager for UnixProcessManager {
    async fn spawn(&mut self, spec: CommandSpec) -> Result<u32> {
        let mut cmd = Self::command(&spec)?;

        #[allow(unsafe_code)]
        unsafe {
            cmd.pre_exec(|| {
                if setsid() == -1 {
                    return Err(std::io::Error::last_os_error());
                }
                Ok(())
            });
        }

        if let Some(path) = &spec.log {
            let file = File::create(path)?;
            cmd.stdout(Stdio::from(file.try_clone()?))
                .stderr(Stdio::from(file));
        } else {
            cmd.stdout(Stdio::null()).stderr(Stdio::null());
        }

        let child = cmd.spawn().map_err(|source| Error::Spawn {
            name: spec.name.clone(),
            source,
        })?;

        let pid = child.id().ok_or_else(|| {
            Error::Internal(format!("`{}` exited before its pid was read", spec.name))
        })?;

        tracing::debug!("Spawned `{}` as pid {pid}: {:?}", spec.name, spec.cmd);

        Ok(pid)
    }

    fn is_alive(&self, pid: u32) -> bool {
        let Some(pid) = to_pid(pid) else {
            return false;
        };

        #[allow(unsafe_code)]
        let rc = unsafe { kill(pid, 0) };

        rc == 0 || std::io::Error::last_os_error().raw_os_error() == Some(EPERM)
    }

    async fn shutdown(&mut self, pid: u32) -> Result<()> {
        let Some(target) = to_pid(pid) else {
            return Err(Error::Signal {
                pid,
                source: std::io::Error::from(std::io::ErrorKind::InvalidInput),
            });
        };

        #[allow(unsafe_code)]
        unsafe {
            let rc = kill(target, SIGHUP);
            if rc == -1 {
                let err = std::io::Error::last_os_error();
                if err.raw_os_error() == Some(ESRCH) {
                    tracing::debug!("pid {pid} already gone");
                    return Ok(());
                }
                return Err(Error::Signal { pid, source: err });
            }
        }

        Ok(())
    }

    async fn capture(&mut self, spec: CommandSpec) -> Result<String> {
        let output = Self::command(&spec)?
            .output()
            .await
            .map_err(|source| Error::Spawn {
                name: spec.name.clone(),
                source,
            })?;

        let first_line = |bytes: &[u8]| {
            String::from_utf8_lossy(bytes)
                .lines()
                .map(str::trim)
                .find(|line| !line.is_empty())
                .map(str::to_owned)
        };

        Ok(first_line(&output.stdout)
            .or_else(|| first_line(&output.stderr))
            .unwrap_or_default())
    }
}
