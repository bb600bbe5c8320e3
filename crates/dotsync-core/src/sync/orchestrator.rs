//! Sync orchestration - coordinates the sync workflow

use tracing::{debug, info, warn};

use super::SyncReport;
use super::actions::{EntryOutcome, Transfer};
use super::executor::TransferExecutor;
use super::inspection::{EntryDiff, EntryStatus, Inspector};
use crate::comparison::ConflictClassifier;
use crate::config::{SyncContext, SyncDirection, SyncPolicy};
use crate::error::Result;
use crate::lock::SyncLock;
use crate::manifest::{Manifest, ManifestEntry};
use crate::resolver::EntryResolver;

/// Main sync engine
pub struct SyncEngine<'a> {
    context: &'a SyncContext,
    dry_run: bool,
}

impl<'a> SyncEngine<'a> {
    /// Create a new sync engine over a resolved context
    #[must_use]
    pub const fn new(context: &'a SyncContext) -> Self {
        Self {
            context,
            dry_run: false,
        }
    }

    /// Report what would happen without touching the filesystem
    #[must_use]
    pub const fn with_dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }

    /// Execute a sync run
    ///
    /// Every manifest entry is processed in order. Entry-level failures,
    /// conflicts included, are recorded in the report and do not stop the
    /// remaining entries.
    ///
    /// # Errors
    ///
    /// Returns an error if the run lock is held elsewhere, the manifest
    /// cannot be loaded, or an entry raises a run-level error.
    pub fn run(&self, direction: SyncDirection, policy: SyncPolicy) -> Result<SyncReport> {
        let _lock = if self.dry_run {
            None
        } else {
            Some(SyncLock::acquire(self.context.lock_path())?)
        };

        let manifest = Manifest::load(self.context.manifest())?;
        info!(
            "Running {direction} for {} manifest entries{}",
            manifest.len(),
            if self.dry_run { " (dry run)" } else { "" }
        );

        let resolver = EntryResolver::new(self.context);
        let executor = TransferExecutor::new(self.dry_run);
        let mut report = SyncReport::new(direction, self.dry_run);

        for entry in &manifest {
            let outcome = match Self::sync_entry(&resolver, &executor, entry, direction, policy) {
                Ok(transfer) => {
                    Self::log_transfer(entry, direction, transfer);
                    EntryOutcome::from(transfer)
                }
                Err(e) if e.is_fatal() => return Err(e),
                Err(e) => {
                    warn!("Error during {direction} of `{entry}`: {e}");
                    EntryOutcome::from_error(&e)
                }
            };
            report.record(entry.clone(), outcome);
        }

        Ok(report)
    }

    /// Read-only state of every manifest entry
    ///
    /// # Errors
    ///
    /// Returns an error if the manifest cannot be loaded.
    pub fn status(&self, direction: SyncDirection) -> Result<Vec<EntryStatus>> {
        let manifest = Manifest::load(self.context.manifest())?;
        let inspector = Inspector::new(EntryResolver::new(self.context), direction);
        Ok(manifest.iter().map(|entry| inspector.status(entry)).collect())
    }

    /// Differences for every entry present on both sides with different content
    ///
    /// # Errors
    ///
    /// Returns an error if the manifest cannot be loaded.
    pub fn diff(&self, direction: SyncDirection) -> Result<Vec<EntryDiff>> {
        let manifest = Manifest::load(self.context.manifest())?;
        let inspector = Inspector::new(EntryResolver::new(self.context), direction);

        let mut diffs = Vec::new();
        for entry in &manifest {
            match inspector.diff(entry) {
                Ok(Some(diff)) => diffs.push(diff),
                Ok(None) => {}
                Err(e) => warn!("Cannot diff `{entry}`: {e}"),
            }
        }
        Ok(diffs)
    }

    fn sync_entry(
        resolver: &EntryResolver<'_>,
        executor: &TransferExecutor,
        entry: &ManifestEntry,
        direction: SyncDirection,
        policy: SyncPolicy,
    ) -> Result<Transfer> {
        let resolved = resolver.resolve(entry, direction)?;
        debug!(
            "Resolved `{entry}`: {} -> {}",
            resolved.source.display(),
            resolved.dest.display()
        );

        let classification =
            ConflictClassifier::classify(&resolved.source, &resolved.dest, direction, policy)?;

        executor.execute(
            &classification.source,
            &resolved.dest,
            classification.verdict,
            direction,
        )
    }

    fn log_transfer(entry: &ManifestEntry, direction: SyncDirection, transfer: Transfer) {
        match transfer {
            Transfer::Copied | Transfer::Replaced => {
                info!("{} `{entry}`", direction.past_tense());
            }
            Transfer::Skipped(reason) => info!("Skipped `{entry}` ({reason})"),
        }
    }
}
