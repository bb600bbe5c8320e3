//! Filesystem probing and timestamp comparison
//!
//! Probes use `lstat`: symlinks are reported as links and their own
//! modification time is used, never the target's.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::time::SystemTime;

use crate::error::{Result, SyncError};

/// Kind of filesystem object found at a path
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeKind {
    /// Nothing exists at the path
    Missing,
    /// Regular file
    File,
    /// Directory
    Directory,
    /// Symbolic link (not followed)
    Symlink,
}

/// Snapshot of a filesystem object taken when probed
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileNode {
    /// Absolute path
    pub path: PathBuf,
    /// What exists at the path
    pub kind: NodeKind,
    /// Last modification time, `None` when missing
    pub modified: Option<SystemTime>,
}

impl FileNode {
    /// Inspect `path` without following symlinks
    ///
    /// A missing path, or one whose parent is not a directory, yields a
    /// [`NodeKind::Missing`] node.
    ///
    /// # Errors
    ///
    /// Returns an error if the metadata exists but cannot be read.
    pub fn probe(path: &Path) -> Result<Self> {
        let metadata = match fs::symlink_metadata(path) {
            Ok(metadata) => metadata,
            Err(e)
                if matches!(
                    e.kind(),
                    io::ErrorKind::NotFound | io::ErrorKind::NotADirectory
                ) =>
            {
                return Ok(Self {
                    path: path.to_path_buf(),
                    kind: NodeKind::Missing,
                    modified: None,
                });
            }
            Err(e) => return Err(SyncError::transfer(path, e)),
        };

        let file_type = metadata.file_type();
        let kind = if file_type.is_symlink() {
            NodeKind::Symlink
        } else if file_type.is_dir() {
            NodeKind::Directory
        } else {
            NodeKind::File
        };
        let modified = metadata
            .modified()
            .map_err(|e| SyncError::transfer(path, e))?;

        Ok(Self {
            path: path.to_path_buf(),
            kind,
            modified: Some(modified),
        })
    }

    /// Whether anything exists at the path
    #[must_use]
    pub fn exists(&self) -> bool {
        self.kind != NodeKind::Missing
    }

    /// Whether the path is a real directory (not a link to one)
    #[must_use]
    pub fn is_dir(&self) -> bool {
        self.kind == NodeKind::Directory
    }
}

/// Timestamp comparator
pub struct TimestampComparator;

impl TimestampComparator {
    /// Whether `candidate` was modified strictly after `reference`
    ///
    /// Missing nodes are never newer, and anything existing is newer than a
    /// missing node.
    #[must_use]
    pub fn is_newer(candidate: &FileNode, reference: &FileNode) -> bool {
        match (candidate.modified, reference.modified) {
            (Some(candidate), Some(reference)) => candidate > reference,
            (Some(_), None) => true,
            (None, _) => false,
        }
    }
}
