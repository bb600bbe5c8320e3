//! Read-only inspection of manifest entries for `status` and `diff`

use std::fmt;
use std::path::PathBuf;

use crate::comparison::{
    ConflictClassifier, DirectoryComparator, DirectoryComparison, FileNode, NodeKind,
    TimestampComparator,
};
use crate::config::SyncDirection;
use crate::error::Result;
use crate::manifest::ManifestEntry;
use crate::resolver::EntryResolver;

/// State of an entry relative to the chosen direction
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EntryState {
    /// Both sides hold the same content
    InSync,
    /// Source differs and is at least as new as the destination
    SourceNewer,
    /// Destination differs and is strictly newer
    DestinationNewer,
    /// Only the source exists
    DestinationMissing,
    /// The source does not exist
    SourceMissing,
    /// The entry could not be resolved or inspected
    Invalid(String),
}

impl fmt::Display for EntryState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InSync => f.write_str("in sync"),
            Self::SourceNewer => f.write_str("source newer"),
            Self::DestinationNewer => f.write_str("destination newer"),
            Self::DestinationMissing => f.write_str("destination missing"),
            Self::SourceMissing => f.write_str("source missing"),
            Self::Invalid(message) => write!(f, "invalid: {message}"),
        }
    }
}

/// State of one entry
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntryStatus {
    /// Manifest entry
    pub entry: ManifestEntry,
    /// Observed state
    pub state: EntryState,
}

/// Difference between the two sides of an entry
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DiffContent {
    /// Unified diff of two text files
    Text(String),
    /// At least one side is not UTF-8 text
    Binary,
    /// Per-path changes between two directories
    Tree(DirectoryComparison),
    /// The two sides are different kinds of filesystem object
    KindMismatch,
}

/// Difference found for one entry
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntryDiff {
    /// Manifest entry
    pub entry: ManifestEntry,
    /// Source location
    pub source: PathBuf,
    /// Destination location
    pub dest: PathBuf,
    /// What differs
    pub content: DiffContent,
}

pub(super) struct Inspector<'a> {
    resolver: EntryResolver<'a>,
    direction: SyncDirection,
}

impl<'a> Inspector<'a> {
    pub(super) const fn new(resolver: EntryResolver<'a>, direction: SyncDirection) -> Self {
        Self {
            resolver,
            direction,
        }
    }

    pub(super) fn status(&self, entry: &ManifestEntry) -> EntryStatus {
        let state = self
            .state(entry)
            .unwrap_or_else(|e| EntryState::Invalid(e.to_string()));
        EntryStatus {
            entry: entry.clone(),
            state,
        }
    }

    fn state(&self, entry: &ManifestEntry) -> Result<EntryState> {
        let (source, dest) = self.probe(entry)?;

        if !source.exists() {
            return Ok(EntryState::SourceMissing);
        }
        if !dest.exists() {
            return Ok(EntryState::DestinationMissing);
        }
        if ConflictClassifier::same_content(&source, &dest)? {
            return Ok(EntryState::InSync);
        }
        if TimestampComparator::is_newer(&dest, &source) {
            Ok(EntryState::DestinationNewer)
        } else {
            Ok(EntryState::SourceNewer)
        }
    }

    pub(super) fn diff(&self, entry: &ManifestEntry) -> Result<Option<EntryDiff>> {
        let (source, dest) = self.probe(entry)?;
        if !source.exists() || !dest.exists() || ConflictClassifier::same_content(&source, &dest)? {
            return Ok(None);
        }

        let content = match (source.kind, dest.kind) {
            (NodeKind::File, NodeKind::File) => {
                match ConflictClassifier::generate_diff(&source.path, &dest.path)? {
                    Some(text) => DiffContent::Text(text),
                    None => DiffContent::Binary,
                }
            }
            (NodeKind::Directory, NodeKind::Directory) => {
                DiffContent::Tree(DirectoryComparator::compare(&source.path, &dest.path)?)
            }
            _ => DiffContent::KindMismatch,
        };

        Ok(Some(EntryDiff {
            entry: entry.clone(),
            source: source.path,
            dest: dest.path,
            content,
        }))
    }

    fn probe(&self, entry: &ManifestEntry) -> Result<(FileNode, FileNode)> {
        let resolved = self.resolver.resolve(entry, self.direction)?;
        Ok((
            FileNode::probe(&resolved.source)?,
            FileNode::probe(&resolved.dest)?,
        ))
    }
}
