//! Common types and utilities for command execution

use std::path::{Path, PathBuf};

use anyhow::Context;
use dotsync_core::config::{ConfigManager, ContextOverrides};
use dotsync_core::sync::{SyncEngine, SyncReporter};
use dotsync_core::{SyncContext, SyncDirection, SyncPolicy};

/// Execution options shared by every command
pub struct SyncOptions<'a> {
    /// Preview changes without applying (dry-run)
    pub dry_run: bool,
    /// Repository and home root overrides
    pub overrides: ContextOverrides,
    /// Path to custom config file
    pub config_path: Option<&'a Path>,
    /// Skip loading all config files
    pub no_config: bool,
}

impl<'a> SyncOptions<'a> {
    /// Create new sync options
    #[must_use]
    pub const fn new(
        dry_run: bool,
        repository: Option<PathBuf>,
        home: Option<PathBuf>,
        config_path: Option<&'a Path>,
        no_config: bool,
    ) -> Self {
        Self {
            dry_run,
            overrides: ContextOverrides { repository, home },
            config_path,
            no_config,
        }
    }

    /// Load the config file and resolve the sync context
    pub fn context(&self) -> anyhow::Result<SyncContext> {
        let file = ConfigManager::load(self.config_path, self.no_config)
            .context("Failed to load configuration")?;
        SyncContext::resolve(&file, &self.overrides).context("Failed to resolve sync locations")
    }
}

/// Run a push or pull and print its summary, returning the exit status
pub fn run_sync(
    direction: SyncDirection,
    policy: SyncPolicy,
    options: &SyncOptions<'_>,
) -> anyhow::Result<u8> {
    let context = options.context()?;
    tracing::debug!(
        "Repository: {}, home: {}",
        context.repository().display(),
        context.home().display()
    );

    let report = SyncEngine::new(&context)
        .with_dry_run(options.dry_run)
        .run(direction, policy)
        .with_context(|| format!("{direction} aborted"))?;

    println!("{}", SyncReporter::generate_summary(&report));
    Ok(report.exit_code())
}
