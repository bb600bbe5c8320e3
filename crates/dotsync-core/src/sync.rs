//! Manifest-driven synchronization engine
//!
//! Push copies repository entries into the home directory, pull copies them
//! back. Each entry is resolved, classified and executed independently; a
//! failing entry is recorded and the run moves on.

mod actions;
mod executor;
mod inspection;
mod orchestrator;
mod reporting;

use std::collections::BTreeMap;

pub use actions::{EntryOutcome, SkipReason, Transfer};
pub use executor::TransferExecutor;
pub use inspection::{DiffContent, EntryDiff, EntryState, EntryStatus};
pub use orchestrator::SyncEngine;
pub use reporting::SyncReporter;

use crate::config::SyncDirection;
use crate::manifest::ManifestEntry;

/// Outcome of a sync run, one record per manifest entry in manifest order
#[derive(Debug, Clone)]
pub struct SyncReport {
    direction: SyncDirection,
    dry_run: bool,
    outcomes: Vec<(ManifestEntry, EntryOutcome)>,
}

impl SyncReport {
    /// Create an empty report
    #[must_use]
    pub const fn new(direction: SyncDirection, dry_run: bool) -> Self {
        Self {
            direction,
            dry_run,
            outcomes: Vec::new(),
        }
    }

    /// Record the outcome of one entry
    pub fn record(&mut self, entry: ManifestEntry, outcome: EntryOutcome) {
        self.outcomes.push((entry, outcome));
    }

    /// Recorded outcomes
    #[must_use]
    pub fn outcomes(&self) -> &[(ManifestEntry, EntryOutcome)] {
        &self.outcomes
    }

    /// Direction of the run
    #[must_use]
    pub const fn direction(&self) -> SyncDirection {
        self.direction
    }

    /// Whether the run was a dry run
    #[must_use]
    pub const fn is_dry_run(&self) -> bool {
        self.dry_run
    }

    /// Entries whose destination was created
    #[must_use]
    pub fn copied(&self) -> usize {
        self.count(|outcome| matches!(outcome, EntryOutcome::Copied))
    }

    /// Entries whose destination was replaced
    #[must_use]
    pub fn replaced(&self) -> usize {
        self.count(|outcome| matches!(outcome, EntryOutcome::Replaced))
    }

    /// Entries left untouched
    #[must_use]
    pub fn skipped(&self) -> usize {
        self.count(|outcome| matches!(outcome, EntryOutcome::Skipped { .. }))
    }

    /// Skip counts per reason, most frequent first
    #[must_use]
    pub fn skip_reasons(&self) -> Vec<(SkipReason, usize)> {
        let mut counts: BTreeMap<SkipReason, usize> = BTreeMap::new();
        for (_, outcome) in &self.outcomes {
            if let EntryOutcome::Skipped { reason } = outcome {
                *counts.entry(*reason).or_default() += 1;
            }
        }
        let mut reasons: Vec<_> = counts.into_iter().collect();
        reasons.sort_by_key(|(_, count)| std::cmp::Reverse(*count));
        reasons
    }

    /// Entries that ended in a conflict
    #[must_use]
    pub fn conflicts(&self) -> usize {
        self.count(|outcome| matches!(outcome, EntryOutcome::Conflict { .. }))
    }

    /// Entries that failed for any reason other than a conflict
    #[must_use]
    pub fn errors(&self) -> usize {
        self.count(|outcome| matches!(outcome, EntryOutcome::Failed { .. }))
    }

    /// Entries that changed (or would change) the destination
    #[must_use]
    pub fn total_operations(&self) -> usize {
        self.copied() + self.replaced()
    }

    /// Whether every entry succeeded
    #[must_use]
    pub fn is_success(&self) -> bool {
        !self.outcomes.iter().any(|(_, outcome)| outcome.is_failure())
    }

    /// Process exit status for this run
    #[must_use]
    pub fn exit_code(&self) -> u8 {
        u8::from(!self.is_success())
    }

    fn count(&self, predicate: impl Fn(&EntryOutcome) -> bool) -> usize {
        self.outcomes
            .iter()
            .filter(|(_, outcome)| predicate(outcome))
            .count()
    }
}
