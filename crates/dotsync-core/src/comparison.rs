//! File comparison and verdict classification
//!
//! This module provides read-only analysis of a source/destination pair:
//! - Existence, kind and modification time via `lstat` probes
//! - Content equality via SHA-256 hashing, link targets and recursive
//!   directory comparison
//! - Textual diffs for changed files
//! - Classification into a [`SyncVerdict`]

mod diff;
mod directory;
mod hash;
mod timestamp;

use std::fs;
use std::path::Path;

use tracing::debug;

pub use diff::DiffGenerator;
pub use directory::{DirectoryComparator, DirectoryComparison};
pub use hash::{FileHash, FileHasher};
pub use timestamp::{FileNode, NodeKind, TimestampComparator};

use crate::config::{SyncDirection, SyncPolicy};
use crate::error::{Result, SyncError};

/// Decision taken for one entry
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncVerdict {
    /// Destination does not exist
    Copy,
    /// Destination already holds the same content
    SkipIdentical,
    /// Destination is newer and different, and the policy says to leave it
    SkipPolicy,
    /// Destination may be replaced without losing newer content, or `force` is set
    OverwriteAllowed,
    /// Destination is newer and different, and nothing allows replacing it
    Conflict,
}

impl SyncVerdict {
    /// Whether the verdict leads to a filesystem mutation
    #[must_use]
    pub const fn transfers(self) -> bool {
        matches!(self, Self::Copy | Self::OverwriteAllowed)
    }
}

/// Verdict together with the probes it was based on
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Classification {
    /// Decision for the entry
    pub verdict: SyncVerdict,
    /// Source probe
    pub source: FileNode,
    /// Destination probe
    pub dest: FileNode,
}

/// Classifies a source/destination pair into a [`SyncVerdict`]
pub struct ConflictClassifier;

impl ConflictClassifier {
    /// Classify an entry
    ///
    /// 1. The source must exist.
    /// 2. A missing destination is a [`SyncVerdict::Copy`].
    /// 3. Identical content is a [`SyncVerdict::SkipIdentical`], whatever the
    ///    timestamps say.
    /// 4. A destination that is not strictly newer may be overwritten.
    /// 5. A newer, different destination is skipped on push with
    ///    `skip_existing`, overwritten with `force`, and a conflict otherwise.
    ///
    /// Directories are classified as a unit by their top-level modification
    /// time and recursive equality.
    ///
    /// # Errors
    ///
    /// Returns [`SyncError::SourceMissing`] if the source does not exist, or
    /// an I/O error if either side cannot be inspected.
    pub fn classify(
        source: &Path,
        dest: &Path,
        direction: SyncDirection,
        policy: SyncPolicy,
    ) -> Result<Classification> {
        let source = FileNode::probe(source)?;
        if !source.exists() {
            return Err(SyncError::SourceMissing { path: source.path });
        }
        let dest = FileNode::probe(dest)?;

        let verdict = Self::decide(&source, &dest, direction, policy)?;
        debug!(
            "Classified {} -> {} as {verdict:?}",
            source.path.display(),
            dest.path.display()
        );

        Ok(Classification {
            verdict,
            source,
            dest,
        })
    }

    fn decide(
        source: &FileNode,
        dest: &FileNode,
        direction: SyncDirection,
        policy: SyncPolicy,
    ) -> Result<SyncVerdict> {
        if !dest.exists() {
            return Ok(SyncVerdict::Copy);
        }

        if Self::same_content(source, dest)? {
            return Ok(SyncVerdict::SkipIdentical);
        }

        if !TimestampComparator::is_newer(dest, source) {
            return Ok(SyncVerdict::OverwriteAllowed);
        }

        Ok(match direction {
            SyncDirection::Push if policy.skip_existing() => SyncVerdict::SkipPolicy,
            _ if policy.force() => SyncVerdict::OverwriteAllowed,
            _ => SyncVerdict::Conflict,
        })
    }

    /// Whether two probed nodes hold the same content
    ///
    /// # Errors
    ///
    /// Returns an error if either side cannot be read.
    pub fn same_content(source: &FileNode, dest: &FileNode) -> Result<bool> {
        match (source.kind, dest.kind) {
            (NodeKind::File, NodeKind::File) => FileHasher::same_content(&source.path, &dest.path),
            (NodeKind::Symlink, NodeKind::Symlink) => {
                let source_target =
                    fs::read_link(&source.path).map_err(|e| SyncError::transfer(&source.path, e))?;
                let dest_target =
                    fs::read_link(&dest.path).map_err(|e| SyncError::transfer(&dest.path, e))?;
                Ok(source_target == dest_target)
            }
            (NodeKind::Directory, NodeKind::Directory) => {
                Ok(DirectoryComparator::compare(&source.path, &dest.path)?.is_identical())
            }
            _ => Ok(false),
        }
    }

    /// Generate a unified diff for two file entries
    ///
    /// # Errors
    ///
    /// Returns an error if file reading fails.
    pub fn generate_diff(source: &Path, destination: &Path) -> Result<Option<String>> {
        DiffGenerator::generate(source, destination)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;
    use std::time::{Duration, SystemTime};
    use tempfile::TempDir;

    struct Pair {
        _tmp: TempDir,
        source: PathBuf,
        dest: PathBuf,
    }

    fn set_mtime(path: &Path, time: SystemTime) {
        fs::File::open(path).unwrap().set_modified(time).unwrap();
    }

    /// Source and destination files with the destination `dest_offset` seconds newer
    fn files(source_body: &str, dest_body: &str, dest_offset: i64) -> Pair {
        let tmp = TempDir::new().unwrap();
        let source = tmp.path().join("source");
        let dest = tmp.path().join("dest");
        fs::write(&source, source_body).unwrap();
        fs::write(&dest, dest_body).unwrap();

        let base = SystemTime::now() - Duration::from_secs(3600);
        set_mtime(&source, base);
        let dest_time = if dest_offset >= 0 {
            base + Duration::from_secs(dest_offset.unsigned_abs())
        } else {
            base - Duration::from_secs(dest_offset.unsigned_abs())
        };
        set_mtime(&dest, dest_time);

        Pair {
            _tmp: tmp,
            source,
            dest,
        }
    }

    fn verdict(pair: &Pair, direction: SyncDirection, policy: SyncPolicy) -> SyncVerdict {
        ConflictClassifier::classify(&pair.source, &pair.dest, direction, policy)
            .unwrap()
            .verdict
    }

    #[test]
    fn test_missing_destination_is_copy() {
        let tmp = TempDir::new().unwrap();
        let source = tmp.path().join("source");
        fs::write(&source, "x").unwrap();

        let result = ConflictClassifier::classify(
            &source,
            &tmp.path().join("nested/dest"),
            SyncDirection::Push,
            SyncPolicy::strict(),
        )
        .unwrap();

        assert_eq!(result.verdict, SyncVerdict::Copy);
        assert!(result.verdict.transfers());
    }

    #[test]
    fn test_missing_source_is_error() {
        let tmp = TempDir::new().unwrap();
        let err = ConflictClassifier::classify(
            &tmp.path().join("absent"),
            &tmp.path().join("dest"),
            SyncDirection::Pull,
            SyncPolicy::strict(),
        )
        .unwrap_err();

        assert!(matches!(err, SyncError::SourceMissing { .. }));
    }

    #[test]
    fn test_identical_content_never_conflicts() {
        for offset in [-60, 0, 60] {
            let pair = files("same", "same", offset);
            for direction in [SyncDirection::Push, SyncDirection::Pull] {
                assert_eq!(
                    verdict(&pair, direction, SyncPolicy::strict()),
                    SyncVerdict::SkipIdentical
                );
            }
        }
    }

    #[test]
    fn test_older_destination_is_overwritable() {
        let pair = files("new", "old", -60);
        assert_eq!(
            verdict(&pair, SyncDirection::Push, SyncPolicy::strict()),
            SyncVerdict::OverwriteAllowed
        );
    }

    #[test]
    fn test_equal_timestamps_are_not_newer() {
        let pair = files("new", "old", 0);
        assert_eq!(
            verdict(&pair, SyncDirection::Pull, SyncPolicy::strict()),
            SyncVerdict::OverwriteAllowed
        );
    }

    #[test]
    fn test_newer_different_destination_by_policy() {
        let pair = files("repo", "live edit", 60);

        assert_eq!(
            verdict(&pair, SyncDirection::Push, SyncPolicy::strict()),
            SyncVerdict::Conflict
        );
        assert_eq!(
            verdict(&pair, SyncDirection::Push, SyncPolicy::forced()),
            SyncVerdict::OverwriteAllowed
        );
        assert_eq!(
            verdict(&pair, SyncDirection::Push, SyncPolicy::skipping_existing()),
            SyncVerdict::SkipPolicy
        );
    }

    #[test]
    fn test_skip_existing_only_applies_to_push() {
        let pair = files("live", "repo edit", 60);
        assert_eq!(
            verdict(&pair, SyncDirection::Pull, SyncPolicy::skipping_existing()),
            SyncVerdict::Conflict
        );
        assert_eq!(
            verdict(&pair, SyncDirection::Pull, SyncPolicy::forced()),
            SyncVerdict::OverwriteAllowed
        );
    }

    #[test]
    fn test_directory_with_stale_extra_is_not_identical() {
        let tmp = TempDir::new().unwrap();
        let source = tmp.path().join("source");
        let dest = tmp.path().join("dest");
        fs::create_dir_all(&source).unwrap();
        fs::create_dir_all(&dest).unwrap();
        fs::write(source.join("init.lua"), "x").unwrap();
        fs::write(dest.join("init.lua"), "x").unwrap();

        let base = SystemTime::now() - Duration::from_secs(3600);
        set_mtime(&source, base);
        set_mtime(&dest, base - Duration::from_secs(60));
        let result =
            ConflictClassifier::classify(&source, &dest, SyncDirection::Push, SyncPolicy::strict())
                .unwrap();
        assert_eq!(result.verdict, SyncVerdict::SkipIdentical);

        fs::write(dest.join("stale.lua"), "old").unwrap();
        set_mtime(&dest, base - Duration::from_secs(60));
        let result =
            ConflictClassifier::classify(&source, &dest, SyncDirection::Push, SyncPolicy::strict())
                .unwrap();
        assert_eq!(result.verdict, SyncVerdict::OverwriteAllowed);
        assert!(result.source.is_dir());
    }

    #[test]
    fn test_kind_mismatch_is_different_content() {
        let tmp = TempDir::new().unwrap();
        let source = tmp.path().join("source");
        let dest = tmp.path().join("dest");
        fs::write(&source, "file").unwrap();
        fs::create_dir(&dest).unwrap();

        let source_node = FileNode::probe(&source).unwrap();
        let dest_node = FileNode::probe(&dest).unwrap();
        assert!(!ConflictClassifier::same_content(&source_node, &dest_node).unwrap());
    }
}
