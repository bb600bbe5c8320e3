use anyhow::Context;
use dotsync_core::SyncDirection;
use dotsync_core::sync::{EntryState, SyncEngine};

use super::common::SyncOptions;

pub struct Status;

impl Status {
    pub fn execute(direction: SyncDirection, options: &SyncOptions<'_>) -> anyhow::Result<u8> {
        let context = options.context()?;
        let statuses = SyncEngine::new(&context)
            .status(direction)
            .context("Failed to inspect manifest entries")?;

        println!("{direction} status for {}", context.repository().display());
        for status in &statuses {
            println!("  {:<24} {}", status.entry.as_str(), status.state);
        }

        let pending = statuses
            .iter()
            .filter(|status| status.state != EntryState::InSync)
            .count();
        println!("\n{} entries, {pending} out of sync", statuses.len());

        Ok(0)
    }
}
