//! File hashing for content comparison using SHA-256

use std::fs::{self, File};
use std::io::{BufReader, Read};
use std::path::Path;

use sha2::{Digest, Sha256};

use crate::error::{Result, SyncError};

/// File hash result
pub type FileHash = [u8; 32];

/// File hasher
pub struct FileHasher;

impl FileHasher {
    /// Compute SHA-256 hash of a file by streaming its contents
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read.
    pub fn hash(path: &Path) -> Result<FileHash> {
        let file = File::open(path).map_err(|e| SyncError::transfer(path, e))?;

        let mut reader = BufReader::new(file);
        let mut hasher = Sha256::new();
        let mut buffer = [0; 8192];

        loop {
            let bytes_read = reader
                .read(&mut buffer)
                .map_err(|e| SyncError::transfer(path, e))?;

            if bytes_read == 0 {
                break;
            }

            hasher.update(&buffer[..bytes_read]);
        }

        Ok(hasher.finalize().into())
    }

    /// Whether two regular files hold the same bytes
    ///
    /// Files of different length are never hashed.
    ///
    /// # Errors
    ///
    /// Returns an error if either file cannot be read.
    pub fn same_content(a: &Path, b: &Path) -> Result<bool> {
        let len_a = fs::metadata(a).map_err(|e| SyncError::transfer(a, e))?.len();
        let len_b = fs::metadata(b).map_err(|e| SyncError::transfer(b, e))?.len();
        if len_a != len_b {
            return Ok(false);
        }

        Ok(Self::hash(a)? == Self::hash(b)?)
    }
}
