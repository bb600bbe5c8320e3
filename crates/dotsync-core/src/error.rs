//! Typed errors for the sync engine.
//!
//! Run-level failures (manifest, configuration, lock) abort a run before any
//! entry is touched. Entry-level failures are caught by the orchestrator and
//! recorded as that entry's outcome.
//!
//! ```text
//! SyncError
//! ├── run level:   ManifestNotFound, ManifestRead, Config, ConfigRead,
//! │                InvalidPolicy, LockHeld, Lock
//! └── entry level: InvalidEntry, SourceMissing, Conflict, Transfer
//! ```

use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Result type alias for the sync engine
pub type Result<T, E = SyncError> = std::result::Result<T, E>;

/// Errors raised while loading, classifying or transferring entries
#[derive(Error, Debug)]
pub enum SyncError {
    /// The manifest file does not exist
    #[error("Manifest not found: {}", path.display())]
    ManifestNotFound {
        /// Expected manifest location
        path: PathBuf,
    },

    /// The manifest file exists but could not be read
    #[error("Failed to read manifest {}: {source}", path.display())]
    ManifestRead {
        /// Manifest location
        path: PathBuf,
        /// Underlying I/O error
        source: io::Error,
    },

    /// A configuration file is malformed or inconsistent
    #[error("Invalid configuration in {}: {message}", path.display())]
    Config {
        /// Offending file, or the setting's origin
        path: PathBuf,
        /// Human-readable problem description
        message: String,
    },

    /// A configuration file could not be read
    #[error("Failed to read config file {}: {source}", path.display())]
    ConfigRead {
        /// Config file location
        path: PathBuf,
        /// Underlying I/O error
        source: io::Error,
    },

    /// `force` and `skip_existing` were both requested
    #[error("--force and --skip-existing cannot be used together")]
    InvalidPolicy,

    /// Another run currently holds the lock
    #[error("Another dotsync run holds the lock at {}", path.display())]
    LockHeld {
        /// Lock file location
        path: PathBuf,
    },

    /// The lock file could not be opened
    #[error("Failed to open lock file {}: {source}", path.display())]
    Lock {
        /// Lock file location
        path: PathBuf,
        /// Underlying I/O error
        source: io::Error,
    },

    /// A manifest entry would resolve outside the repository or home root
    #[error("Invalid manifest entry `{entry}`: {reason}")]
    InvalidEntry {
        /// Entry as written in the manifest
        entry: String,
        /// Why it was rejected
        reason: &'static str,
    },

    /// The source of an entry does not exist or cannot be inspected
    #[error("Source does not exist: {}", path.display())]
    SourceMissing {
        /// Source location
        path: PathBuf,
    },

    /// The destination holds newer, different content
    #[error(
        "Target {} exists with a newer last-modified time stamp than the source. {hint}",
        dest.display()
    )]
    Conflict {
        /// Destination location
        dest: PathBuf,
        /// Remediation hint naming the relevant flags
        hint: String,
    },

    /// A filesystem operation failed while inspecting or transferring an entry
    #[error("I/O error at {}: {source}", path.display())]
    Transfer {
        /// Path the operation was acting on
        path: PathBuf,
        /// Underlying I/O error
        source: io::Error,
    },
}

impl SyncError {
    /// Wrap an I/O error raised while acting on `path`
    pub fn transfer(path: impl Into<PathBuf>, source: io::Error) -> Self {
        Self::Transfer {
            path: path.into(),
            source,
        }
    }

    /// Whether this error aborts the whole run rather than a single entry
    #[must_use]
    pub const fn is_fatal(&self) -> bool {
        !matches!(
            self,
            Self::InvalidEntry { .. }
                | Self::SourceMissing { .. }
                | Self::Conflict { .. }
                | Self::Transfer { .. }
        )
    }
}
