use std::{
    collections::{BTreeMap, BTreeSet},
    path::PathBuf,
};

use conmux_types::DeclaredConfig;

use crate::{
    error::{Error, Result},
    repository::Repository,
};

/// Repository operations that can be made to fail for one name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Op {
    Config,
    SetSnapshot,
    RemovePid,
}

#[derive(Debug, Default)]
pub struct MemoryRepository {
    pub pids: BTreeMap<String, u32>,
    pub snapshots: BTreeMap<String, Vec<u8>>,
    pub configs: BTreeMap<String, Vec<u8>>,
    pub registry_file_created: bool,
    /// Operations that fail the way unreadable or read-only files would.
    pub failing: BTreeSet<(Op, String)>,
}

impl MemoryRepository {
    pub fn with_config(mut self, name: &str, content: &str) -> Self {
        self.configs
            .insert(name.to_owned(), content.as_bytes().to_vec());
        self
    }

    pub fn failing(mut self, op: Op, name: &str) -> Self {
        self.failing.insert((op, name.to_owned()));
        self
    }

    fn check(&self, op: Op, name: &str) -> Result<()> {
        if self.failing.contains(&(op, name.to_owned())) {
            return Err(Error::IOError(std::io::Error::new(
                std::io::ErrorKind::PermissionDenied,
                format!("{op:?} of `{name}` denied"),
            )));
        }
        Ok(())
    }
}

impl Repository for MemoryRepository {
    fn tracked(&self) -> Result<Vec<String>> {
        Ok(self.pids.keys().cloned().collect())
    }

    fn pid(&self, name: &str) -> Result<Option<u32>> {
        Ok(self.pids.get(name).copied())
    }

    fn set_pid(&mut self, name: &str, pid: u32) -> Result<()> {
        self.pids.insert(name.to_owned(), pid);
        Ok(())
    }

    fn remove_pid(&mut self, name: &str) -> Result<()> {
        self.check(Op::RemovePid, name)?;
        self.pids.remove(name);
        Ok(())
    }

    fn snapshot(&self, name: &str) -> Result<Option<Vec<u8>>> {
        Ok(self.snapshots.get(name).cloned())
    }

    fn set_snapshot(&mut self, name: &str, content: &[u8]) -> Result<()> {
        self.check(Op::SetSnapshot, name)?;
        self.snapshots.insert(name.to_owned(), content.to_vec());
        Ok(())
    }

    fn declared(&self) -> Result<Vec<String>> {
        Ok(self.configs.keys().cloned().collect())
    }

    fn config(&self, name: &str) -> Result<DeclaredConfig> {
        self.check(Op::Config, name)?;
        let content = self.configs.get(name).cloned().ok_or_else(|| {
            Error::IOError(std::io::Error::from(std::io::ErrorKind::NotFound))
        })?;
        Ok(DeclaredConfig {
            name: name.to_owned(),
            path: PathBuf::from(format!("etc/{name}.cf")),
            content,
        })
    }

    fn ensure_registry_file(&mut self) -> Result<PathBuf> {
        self.registry_file_created = true;
        Ok(PathBuf::from("etc/registry"))
    }
}
