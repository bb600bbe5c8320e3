//! File and directory transfer executor

use std::fs;
use std::path::{Path, PathBuf};

use tracing::{debug, info, warn};
use walkdir::WalkDir;

use super::actions::{SkipReason, Transfer};
use crate::comparison::{FileNode, NodeKind, SyncVerdict};
use crate::config::SyncDirection;
use crate::error::{Result, SyncError};

const STAGING_PREFIX: &str = ".dotsync-staging-";

/// Carries out classifier verdicts on the filesystem
pub struct TransferExecutor {
    dry_run: bool,
}

impl TransferExecutor {
    /// Create a new executor
    #[must_use]
    pub const fn new(dry_run: bool) -> Self {
        Self { dry_run }
    }

    /// Execute a verdict for one entry
    ///
    /// Files are copied in place. Directories are mirrored: the destination
    /// ends up containing exactly the source tree. Symlinks are recreated as
    /// links, never dereferenced.
    ///
    /// # Errors
    ///
    /// Returns [`SyncError::Conflict`] for a conflict verdict and
    /// [`SyncError::Transfer`] if a filesystem operation fails.
    pub fn execute(
        &self,
        source: &FileNode,
        dest: &Path,
        verdict: SyncVerdict,
        direction: SyncDirection,
    ) -> Result<Transfer> {
        let transfer = match verdict {
            SyncVerdict::Copy => Transfer::Copied,
            SyncVerdict::OverwriteAllowed => Transfer::Replaced,
            SyncVerdict::SkipIdentical => return Ok(Transfer::Skipped(SkipReason::Identical)),
            SyncVerdict::SkipPolicy => {
                info!(
                    "Skipping {} because the destination exists and is newer",
                    dest.display()
                );
                return Ok(Transfer::Skipped(SkipReason::NewerDestination));
            }
            SyncVerdict::Conflict => {
                return Err(SyncError::Conflict {
                    dest: dest.to_path_buf(),
                    hint: Self::conflict_hint(direction).to_string(),
                });
            }
        };

        let is_directory = source.is_dir();
        if self.dry_run {
            info!(
                "[dry run] Would {} {} -> {}",
                if is_directory { "mirror" } else { "copy" },
                source.path.display(),
                dest.display()
            );
            return Ok(transfer);
        }

        if is_directory {
            Self::mirror_directory(&source.path, dest)?;
        } else {
            Self::copy_file(source, dest)?;
        }
        Ok(transfer)
    }

    /// Remediation hint attached to conflict errors
    #[must_use]
    pub const fn conflict_hint(direction: SyncDirection) -> &'static str {
        match direction {
            SyncDirection::Push => {
                "If you want to force override, provide the `--force` option. \
                 If you don't want it overridden, provide the `--skip-existing` option."
            }
            SyncDirection::Pull => {
                "If you want to force override, provide the `--force` option."
            }
        }
    }

    /// Copy a single file or symlink, replacing whatever is at `dest`
    fn copy_file(source: &FileNode, dest: &Path) -> Result<()> {
        Self::ensure_parent(dest)?;

        // Never write through a link or onto a directory at the destination
        let existing = FileNode::probe(dest)?;
        let keep_in_place = existing.kind == NodeKind::File && source.kind == NodeKind::File;
        if !keep_in_place {
            Self::remove_path(&existing)?;
        }

        if source.kind == NodeKind::Symlink {
            Self::copy_symlink(&source.path, dest)
        } else {
            fs::copy(&source.path, dest)
                .map(|_| ())
                .map_err(|e| SyncError::transfer(dest, e))
        }
    }

    /// Replace `dest` with a copy of the `source` tree
    ///
    /// The tree is first copied into a staging directory next to `dest`. The
    /// old destination is moved aside, the staged tree renamed into place, and
    /// only then is the old tree deleted.
    fn mirror_directory(source: &Path, dest: &Path) -> Result<()> {
        let parent = Self::ensure_parent(dest)?;

        let staging = tempfile::Builder::new()
            .prefix(STAGING_PREFIX)
            .tempdir_in(&parent)
            .map_err(|e| SyncError::transfer(&parent, e))?;
        Self::copy_tree(source, staging.path())?;

        let existing = FileNode::probe(dest)?;
        let backup = if existing.exists() {
            let backup = Self::backup_path(dest);
            fs::rename(dest, &backup).map_err(|e| SyncError::transfer(dest, e))?;
            debug!("Moved {} aside to {}", dest.display(), backup.display());
            Some(FileNode {
                path: backup,
                ..existing
            })
        } else {
            None
        };

        Self::swap_into_place(&staging.keep(), dest, backup.as_ref())?;

        if let Some(backup) = backup {
            if let Err(e) = Self::remove_path(&backup) {
                warn!("Failed to clear previous copy of {}: {e}", dest.display());
            }
        }
        debug!("Mirrored {} into {}", source.display(), dest.display());
        Ok(())
    }

    /// Rename the staged tree onto `dest`, restoring `backup` if that fails
    ///
    /// Rollback failures are logged with the paths left behind so the old
    /// tree can be recovered by hand.
    fn swap_into_place(staged: &Path, dest: &Path, backup: Option<&FileNode>) -> Result<()> {
        let Err(e) = fs::rename(staged, dest) else {
            return Ok(());
        };

        if let Err(cleanup) = fs::remove_dir_all(staged) {
            if cleanup.kind() != std::io::ErrorKind::NotFound {
                warn!(
                    "Failed to remove staging directory {}: {cleanup}",
                    staged.display()
                );
            }
        }
        if let Some(backup) = backup {
            match fs::rename(&backup.path, dest) {
                Ok(()) => debug!("Restored {} from {}", dest.display(), backup.path.display()),
                Err(restore) => warn!(
                    "Failed to restore {}: {restore}; the previous copy is kept at {}",
                    dest.display(),
                    backup.path.display()
                ),
            }
        }
        Err(SyncError::transfer(dest, e))
    }

    /// Copy the contents of `source` into the existing directory `target`
    ///
    /// # Errors
    ///
    /// Returns an error if traversal or any copy fails.
    pub fn copy_tree(source: &Path, target: &Path) -> Result<()> {
        let mut dir_permissions = Vec::new();

        for entry in WalkDir::new(source).follow_links(false) {
            let entry = entry.map_err(|e| {
                let path = e.path().unwrap_or(source).to_path_buf();
                SyncError::transfer(path, e.into())
            })?;
            let rel_path = entry.path().strip_prefix(source).map_err(|_| {
                SyncError::transfer(entry.path(), std::io::Error::other("walked outside of the source tree"))
            })?;
            let target_path = target.join(rel_path);
            let file_type = entry.file_type();

            if file_type.is_symlink() {
                Self::copy_symlink(entry.path(), &target_path)?;
            } else if file_type.is_dir() {
                if entry.depth() > 0 {
                    fs::create_dir(&target_path)
                        .map_err(|e| SyncError::transfer(&target_path, e))?;
                }
                let permissions = entry
                    .metadata()
                    .map_err(|e| SyncError::transfer(entry.path(), e.into()))?
                    .permissions();
                dir_permissions.push((target_path, permissions));
            } else {
                fs::copy(entry.path(), &target_path)
                    .map_err(|e| SyncError::transfer(&target_path, e))?;
            }
        }

        // Deepest first, so read-only directories are restricted after their contents exist
        for (dir, permissions) in dir_permissions.into_iter().rev() {
            fs::set_permissions(&dir, permissions).map_err(|e| SyncError::transfer(&dir, e))?;
        }

        Ok(())
    }

    fn copy_symlink(source: &Path, dest: &Path) -> Result<()> {
        let target = fs::read_link(source).map_err(|e| SyncError::transfer(source, e))?;

        #[cfg(unix)]
        let linked = std::os::unix::fs::symlink(&target, dest);
        #[cfg(windows)]
        let linked = if source.is_dir() {
            std::os::windows::fs::symlink_dir(&target, dest)
        } else {
            std::os::windows::fs::symlink_file(&target, dest)
        };

        linked.map_err(|e| SyncError::transfer(dest, e))
    }

    fn remove_path(node: &FileNode) -> Result<()> {
        let removed = match node.kind {
            NodeKind::Missing => return Ok(()),
            NodeKind::Directory => fs::remove_dir_all(&node.path),
            NodeKind::File | NodeKind::Symlink => fs::remove_file(&node.path),
        };
        removed.map_err(|e| SyncError::transfer(&node.path, e))?;
        debug!("Cleared {}", node.path.display());
        Ok(())
    }

    fn ensure_parent(dest: &Path) -> Result<PathBuf> {
        let parent = dest
            .parent()
            .filter(|p| !p.as_os_str().is_empty())
            .map_or_else(|| PathBuf::from("."), Path::to_path_buf);
        fs::create_dir_all(&parent).map_err(|e| SyncError::transfer(&parent, e))?;
        Ok(parent)
    }

    fn backup_path(dest: &Path) -> PathBuf {
        let name = dest
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        dest.with_file_name(format!(".{name}.dotsync-old-{}", std::process::id()))
    }
}
