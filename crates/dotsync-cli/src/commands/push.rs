use dotsync_core::{SyncDirection, SyncPolicy};

use super::common::{SyncOptions, run_sync};

pub struct Push;

impl Push {
    pub fn execute(
        force: bool,
        skip_existing: bool,
        options: &SyncOptions<'_>,
    ) -> anyhow::Result<u8> {
        let policy = SyncPolicy::new(force, skip_existing)?;
        run_sync(SyncDirection::Push, policy, options)
    }
}
