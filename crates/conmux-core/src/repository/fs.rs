use std::{
    fs::{self, OpenOptions},
    io::ErrorKind,
    path::{Path, PathBuf},
};

use conmux_config::{Layout, CONFIG_EXTENSION, PID_EXTENSION};
use conmux_types::DeclaredConfig;

use crate::{
    error::{Error, Result},
    repository::Repository,
};

/// Keeps records as files under the installation's `log/` directory.
#[derive(Debug, Clone)]
pub struct FsRepository {
    layout: Layout,
}

impl FsRepository {
    #[must_use]
    pub fn new(layout: Layout) -> Self {
        Self { layout }
    }
}

fn not_found_as_none<T>(result: std::io::Result<T>) -> Result<Option<T>> {
    match result {
        Ok(value) => Ok(Some(value)),
        Err(err) if err.kind() == ErrorKind::NotFound => Ok(None),
        Err(err) => Err(Error::IOError(err)),
    }
}

/// Stems of the regular files in `dir` with the given extension.
fn list_names(dir: &Path, extension: &str) -> Result<Vec<String>> {
    let Some(entries) = not_found_as_none(fs::read_dir(dir))? else {
        return Ok(vec![]);
    };

    let mut names = Vec::new();
    for entry in entries {
        let path = entry?.path();
        if path.extension().and_then(|e| e.to_str()) != Some(extension) || !path.is_file() {
            continue;
        }
        match path.file_stem().and_then(|s| s.to_str()) {
            Some(stem) if !stem.is_empty() => names.push(stem.to_owned()),
            _ => tracing::warn!("Ignoring unusable file name {}", path.display()),
        }
    }
    names.sort();

    Ok(names)
}

impl Repository for FsRepository {
    fn tracked(&self) -> Result<Vec<String>> {
        list_names(&self.layout.log_dir(), PID_EXTENSION)
    }

    fn pid(&self, name: &str) -> Result<Option<u32>> {
        let Some(content) = not_found_as_none(fs::read_to_string(self.layout.pid_file(name)))?
        else {
            return Ok(None);
        };

        match content.trim().parse::<u32>() {
            Ok(pid) if pid > 0 => Ok(Some(pid)),
            _ => Err(Error::InvalidPidRecord {
                name: name.to_owned(),
                content,
            }),
        }
    }

    fn set_pid(&mut self, name: &str, pid: u32) -> Result<()> {
        fs::write(self.layout.pid_file(name), format!("{pid}\n"))?;
        Ok(())
    }

    fn remove_pid(&mut self, name: &str) -> Result<()> {
        not_found_as_none(fs::remove_file(self.layout.pid_file(name)))?;
        Ok(())
    }

    fn snapshot(&self, name: &str) -> Result<Option<Vec<u8>>> {
        not_found_as_none(fs::read(self.layout.snapshot_file(name)))
    }

    fn set_snapshot(&mut self, name: &str, content: &[u8]) -> Result<()> {
        fs::write(self.layout.snapshot_file(name), content)?;
        Ok(())
    }

    fn declared(&self) -> Result<Vec<String>> {
        list_names(&self.layout.config_dir(), CONFIG_EXTENSION)
    }

    fn config(&self, name: &str) -> Result<DeclaredConfig> {
        let path = self.layout.config_file(name);
        let content = fs::read(&path)?;
        Ok(DeclaredConfig {
            name: name.to_owned(),
            path,
            content,
        })
    }

    fn ensure_registry_file(&mut self) -> Result<PathBuf> {
        let path = self.layout.registry_file();
        OpenOptions::new().create(true).append(true).open(&path)?;
        Ok(path)
    }
}
