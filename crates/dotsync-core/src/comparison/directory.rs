//! Directory comparison for recursive equality
//!
//! This module compares two directory trees path by path to identify
//! entries that are added, modified, removed, or unchanged between source and
//! destination. Subdirectories, files and symlinks are all tracked, so an
//! extra empty directory at the destination also counts as a difference.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use walkdir::WalkDir;

use crate::error::{Result, SyncError};

use super::hash::FileHasher;

/// Result of comparing two directories recursively
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DirectoryComparison {
    /// Paths present in source but not in destination
    pub added: Vec<PathBuf>,
    /// Paths present in both but with different content or kind
    pub modified: Vec<PathBuf>,
    /// Paths present in destination but not in source
    pub removed: Vec<PathBuf>,
    /// Paths identical in both locations
    pub unchanged: Vec<PathBuf>,
}

impl DirectoryComparison {
    /// Check if directories are identical (no changes)
    #[must_use]
    pub fn is_identical(&self) -> bool {
        self.added.is_empty() && self.modified.is_empty() && self.removed.is_empty()
    }

    /// Count total number of changes
    #[must_use]
    pub fn change_count(&self) -> usize {
        self.added.len() + self.modified.len() + self.removed.len()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum TreeEntry {
    File,
    Directory,
    Symlink,
}

/// Directory comparator for recursive comparison
pub struct DirectoryComparator;

impl DirectoryComparator {
    /// Compare two directories recursively
    ///
    /// Returns paths relative to the source/destination roots, sorted.
    /// A missing destination compares as empty.
    ///
    /// # Errors
    ///
    /// Returns an error if directory traversal or file reads fail.
    pub fn compare(source: &Path, destination: &Path) -> Result<DirectoryComparison> {
        let source_tree = Self::collect(source)?;
        let dest_tree = if destination.exists() {
            Self::collect(destination)?
        } else {
            BTreeMap::new()
        };

        let mut comparison = DirectoryComparison::default();

        for (rel_path, kind) in &source_tree {
            match dest_tree.get(rel_path) {
                None => comparison.added.push(rel_path.clone()),
                Some(dest_kind) if dest_kind != kind => comparison.modified.push(rel_path.clone()),
                Some(_) => {
                    let same = match kind {
                        TreeEntry::Directory => true,
                        TreeEntry::File => FileHasher::same_content(
                            &source.join(rel_path),
                            &destination.join(rel_path),
                        )?,
                        TreeEntry::Symlink => {
                            Self::read_link(&source.join(rel_path))?
                                == Self::read_link(&destination.join(rel_path))?
                        }
                    };
                    if same {
                        comparison.unchanged.push(rel_path.clone());
                    } else {
                        comparison.modified.push(rel_path.clone());
                    }
                }
            }
        }

        comparison.removed = dest_tree
            .keys()
            .filter(|rel_path| !source_tree.contains_key(*rel_path))
            .cloned()
            .collect();

        Ok(comparison)
    }

    /// Collect every path below `root` (excluding the root) without following links
    fn collect(root: &Path) -> Result<BTreeMap<PathBuf, TreeEntry>> {
        let mut tree = BTreeMap::new();

        for entry in WalkDir::new(root).min_depth(1).follow_links(false) {
            let entry = entry.map_err(|e| {
                let path = e.path().unwrap_or(root).to_path_buf();
                SyncError::transfer(path, e.into())
            })?;

            let kind = if entry.path_is_symlink() {
                TreeEntry::Symlink
            } else if entry.file_type().is_dir() {
                TreeEntry::Directory
            } else {
                TreeEntry::File
            };

            let rel_path = entry
                .path()
                .strip_prefix(root)
                .map_err(|_| {
                    SyncError::transfer(
                        entry.path(),
                        std::io::Error::other("walked outside of the compared root"),
                    )
                })?
                .to_path_buf();
            tree.insert(rel_path, kind);
        }

        Ok(tree)
    }

    fn read_link(path: &Path) -> Result<PathBuf> {
        fs::read_link(path).map_err(|e| SyncError::transfer(path, e))
    }
}
