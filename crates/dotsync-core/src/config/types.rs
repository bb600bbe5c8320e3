//! Configuration types and structures

use std::fmt;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::error::{Result, SyncError};

/// Sync direction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SyncDirection {
    /// Publish repository files into the home directory
    Push,
    /// Capture home directory files back into the repository
    Pull,
}

impl SyncDirection {
    /// Lowercase command name
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Push => "push",
            Self::Pull => "pull",
        }
    }

    /// Past-tense verb used in log lines
    #[must_use]
    pub const fn past_tense(self) -> &'static str {
        match self {
            Self::Push => "Published",
            Self::Pull => "Pulled",
        }
    }
}

impl fmt::Display for SyncDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Overwrite policy for destinations holding newer, different content
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SyncPolicy {
    force: bool,
    skip_existing: bool,
}

impl SyncPolicy {
    /// Build a policy from the two command-line switches
    ///
    /// # Errors
    ///
    /// Returns [`SyncError::InvalidPolicy`] if both switches are set.
    pub fn new(force: bool, skip_existing: bool) -> Result<Self> {
        if force && skip_existing {
            return Err(SyncError::InvalidPolicy);
        }
        Ok(Self {
            force,
            skip_existing,
        })
    }

    /// Refuse to overwrite newer destinations
    #[must_use]
    pub const fn strict() -> Self {
        Self {
            force: false,
            skip_existing: false,
        }
    }

    /// Overwrite newer destinations
    #[must_use]
    pub const fn forced() -> Self {
        Self {
            force: true,
            skip_existing: false,
        }
    }

    /// Leave newer destinations alone (push only)
    #[must_use]
    pub const fn skipping_existing() -> Self {
        Self {
            force: false,
            skip_existing: true,
        }
    }

    /// Whether newer destinations may be overwritten
    #[must_use]
    pub const fn force(&self) -> bool {
        self.force
    }

    /// Whether newer destinations are silently skipped on push
    #[must_use]
    pub const fn skip_existing(&self) -> bool {
        self.skip_existing
    }
}

/// Contents of a `config.toml` file
///
/// Every key is optional; missing keys fall back to command-line values or
/// built-in defaults.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FileConfig {
    /// Repository root holding the tracked files
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub repository: Option<PathBuf>,

    /// Home directory receiving the dotted copies
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub home: Option<PathBuf>,

    /// Manifest file name inside the repository
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub manifest: Option<String>,

    /// Lock file name inside the repository
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lock_file: Option<String>,
}
