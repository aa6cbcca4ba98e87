use std::collections::HashSet;

use async_trait::async_trait;

use crate::{
    error::{Error, Result},
    CommandSpec, ProcessManager,
};

/// Hands out pids from 1000 up and remembers everything it was asked to do.
#[derive(Debug)]
pub struct MockProcessManager {
    next_pid: u32,
    pub alive: HashSet<u32>,
    pub spawned: Vec<(u32, CommandSpec)>,
    pub signalled: Vec<u32>,
    pub captured: Vec<CommandSpec>,
    /// Names whose launch fails the way a missing executable would.
    pub broken: HashSet<String>,
}

impl Default for MockProcessManager {
    fn default() -> Self {
        Self {
            next_pid: 1000,
            alive: HashSet::new(),
            spawned: Vec::new(),
            signalled: Vec::new(),
            captured: Vec::new(),
            broken: HashSet::new(),
        }
    }
}

impl MockProcessManager {
    pub fn spawned_names(&self) -> Vec<&str> {
        self.spawned.iter().map(|(_, s)| s.name.as_str()).collect()
    }

    pub fn pid_of(&self, name: &str) -> Option<u32> {
        self.spawned
            .iter()
            .rev()
            .find(|(_, s)| s.name == name)
            .map(|(pid, _)| *pid)
    }
}

#[async_trait]
impl ProcessManager for MockProcessManager {
    async fn spawn(&mut self, spec: CommandSpec) -> Result<u32> {
        if spec.cmd.is_empty() {
            return Err(Error::EmptyCommand(spec.name));
        }
        if self.broken.contains(&spec.name) {
            return Err(Error::Spawn {
                name: spec.name,
                source: std::io::Error::from(std::io::ErrorKind::NotFound),
            });
        }
        let pid = self.next_pid;
        self.next_pid += 1;
        self.alive.insert(pid);
        self.spawned.push((pid, spec));
        Ok(pid)
    }

    fn is_alive(&self, pid: u32) -> bool {
        self.alive.contains(&pid)
    }

    async fn shutdown(&mut self, pid: u32) -> Result<()> {
        self.signalled.push(pid);
        self.alive.remove(&pid);
        Ok(())
    }

    async fn capture(&mut self, spec: CommandSpec) -> Result<String> {
        let target = spec.cmd.last().cloned().unwrap_or_default();
        self.captured.push(spec);
        Ok(format!("status of {target}"))
    }
}
