//! Transfer results and per-entry outcomes

use std::fmt;

use crate::error::SyncError;

/// Why an entry was left untouched
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum SkipReason {
    /// Destination already matches the source
    Identical,
    /// Destination is newer and `--skip-existing` was given
    NewerDestination,
}

impl SkipReason {
    /// Short description used in logs and summaries
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Identical => "identical content",
            Self::NewerDestination => "destination is newer",
        }
    }
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// What the executor did with an entry
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transfer {
    /// Destination was created
    Copied,
    /// Destination existed and was replaced
    Replaced,
    /// Nothing was changed
    Skipped(SkipReason),
}

/// Recorded result for one manifest entry
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EntryOutcome {
    /// Destination was created
    Copied,
    /// Destination existed and was replaced
    Replaced,
    /// Nothing was changed
    Skipped {
        /// Why the entry was skipped
        reason: SkipReason,
    },
    /// Destination holds newer, different content
    Conflict {
        /// Error message including the remediation hint
        message: String,
    },
    /// The entry could not be resolved, inspected or transferred
    Failed {
        /// Error message including the underlying I/O error
        message: String,
    },
}

impl EntryOutcome {
    /// Translate an entry-level error into an outcome
    #[must_use]
    pub fn from_error(error: &SyncError) -> Self {
        match error {
            SyncError::Conflict { .. } => Self::Conflict {
                message: error.to_string(),
            },
            _ => Self::Failed {
                message: error.to_string(),
            },
        }
    }

    /// Whether the entry ended in a conflict or an error
    #[must_use]
    pub const fn is_failure(&self) -> bool {
        matches!(self, Self::Conflict { .. } | Self::Failed { .. })
    }
}

impl From<Transfer> for EntryOutcome {
    fn from(transfer: Transfer) -> Self {
        match transfer {
            Transfer::Copied => Self::Copied,
            Transfer::Replaced => Self::Replaced,
            Transfer::Skipped(reason) => Self::Skipped { reason },
        }
    }
}
