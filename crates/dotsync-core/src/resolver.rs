//! Mapping of manifest entries to concrete source and destination paths

use std::path::PathBuf;

use crate::config::{SyncContext, SyncDirection};
use crate::error::Result;
use crate::manifest::ManifestEntry;

/// Source and destination of one entry for one direction
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedEntry {
    /// Path copied from
    pub source: PathBuf,
    /// Path copied to
    pub dest: PathBuf,
}

/// Resolves manifest entries against the repository and home roots
#[derive(Debug, Clone, Copy)]
pub struct EntryResolver<'a> {
    context: &'a SyncContext,
}

impl<'a> EntryResolver<'a> {
    /// Create a resolver over the context's roots
    #[must_use]
    pub const fn new(context: &'a SyncContext) -> Self {
        Self { context }
    }

    /// Resolve an entry lexically; nothing needs to exist yet
    ///
    /// # Errors
    ///
    /// Returns [`crate::SyncError::InvalidEntry`] for entries that would escape
    /// either root.
    pub fn resolve(&self, entry: &ManifestEntry, direction: SyncDirection) -> Result<ResolvedEntry> {
        entry.validate()?;

        let repository_path = self.context.repository().join(entry.repository_relative());
        let home_path = self.context.home().join(entry.home_relative());

        Ok(match direction {
            SyncDirection::Push => ResolvedEntry {
                source: repository_path,
                dest: home_path,
            },
            SyncDirection::Pull => ResolvedEntry {
                source: home_path,
                dest: repository_path,
            },
        })
    }
}
