use dotsync_core::{SyncDirection, SyncPolicy};

use super::common::{SyncOptions, run_sync};

pub struct Pull;

impl Pull {
    pub fn execute(force: bool, options: &SyncOptions<'_>) -> anyhow::Result<u8> {
        let policy = if force {
            SyncPolicy::forced()
        } else {
            SyncPolicy::strict()
        };
        run_sync(SyncDirection::Pull, policy, options)
    }
}
