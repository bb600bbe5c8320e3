//! Advisory run lock
//!
//! Concurrent runs against the same repository would race on directory
//! replacement, so a run holds an exclusive `flock`-style lock for its whole
//! duration. The lock file itself is left in place; only the lock is released.

use std::fs::{File, OpenOptions};
use std::path::{Path, PathBuf};

use fs2::FileExt;
use tracing::debug;

use crate::error::{Result, SyncError};

/// Exclusive lock held for the duration of a sync run
#[derive(Debug)]
pub struct SyncLock {
    file: File,
    path: PathBuf,
}

impl SyncLock {
    /// Take the lock without blocking
    ///
    /// # Errors
    ///
    /// Returns [`SyncError::LockHeld`] if another process holds the lock and
    /// [`SyncError::Lock`] if the lock file cannot be opened.
    pub fn acquire(path: &Path) -> Result<Self> {
        let file = OpenOptions::new()
            .read(true)
            .write(true)
            .create(true)
            .truncate(false)
            .open(path)
            .map_err(|source| SyncError::Lock {
                path: path.to_path_buf(),
                source,
            })?;

        file.try_lock_exclusive()
            .map_err(|_| SyncError::LockHeld {
                path: path.to_path_buf(),
            })?;

        debug!("Acquired run lock {}", path.display());
        Ok(Self {
            file,
            path: path.to_path_buf(),
        })
    }

}

impl Drop for SyncLock {
    fn drop(&mut self) {
        // Closing the handle releases the lock as well
        let _ = FileExt::unlock(&self.file);
        debug!("Released run lock {}", self.path.display());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_second_acquire_fails_while_held() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join(".dotsync.lock");

        let _first = SyncLock::acquire(&path).unwrap();

        let err = SyncLock::acquire(&path).unwrap_err();
        assert!(matches!(err, SyncError::LockHeld { .. }));
    }

    #[test]
    fn test_lock_is_released_on_drop() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join(".dotsync.lock");

        drop(SyncLock::acquire(&path).unwrap());
        assert!(SyncLock::acquire(&path).is_ok());
    }

    #[test]
    fn test_unopenable_lock_path() {
        let tmp = TempDir::new().unwrap();
        let err = SyncLock::acquire(&tmp.path().join("missing/dir/lock")).unwrap_err();
        assert!(matches!(err, SyncError::Lock { .. }));
    }
}
