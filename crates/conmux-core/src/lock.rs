use std::{
    fs::{File, OpenOptions},
    os::fd::AsRawFd,
    path::{Path, PathBuf},
};

use libc::{flock, EWOULDBLOCK, LOCK_EX, LOCK_NB};

use crate::error::{Error, Result};

/// Exclusive advisory lock held for the duration of a start or stop pass.
///
/// Released when dropped.
#[derive(Debug)]
pub struct SupervisorLock {
    _file: File,
    path: PathBuf,
}

impl SupervisorLock {
    /// Take the lock without waiting.
    ///
    /// # Errors
    ///
    /// Returns `Error::Locked` if another invocation holds it.
    pub fn acquire(path: &Path) -> Result<Self> {
        let file = OpenOptions::new()
            .create(true)
            .truncate(false)
            .write(true)
            .open(path)?;

        #[allow(unsafe_code)]
        let rc = unsafe { flock(file.as_raw_fd(), LOCK_EX | LOCK_NB) };
        if rc == -1 {
            let err = std::io::Error::last_os_error();
            if err.raw_os_error() == Some(EWOULDBLOCK) {
                return Err(Error::Locked(path.to_path_buf()));
            }
            return Err(Error::IOError(err));
        }

        tracing::debug!("Acquired {}", path.display());

        Ok(Self {
            _file: file,
            path: path.to_path_buf(),
        })
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_second_acquire_fails_until_release() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("supervisor.lock");

        let lock = SupervisorLock::acquire(&path).unwrap();
        assert_eq!(lock.path(), path);
        assert!(matches!(
            SupervisorLock::acquire(&path),
            Err(Error::Locked(_))
        ));

        drop(lock);
        SupervisorLock::acquire(&path).unwrap();
    }
}
