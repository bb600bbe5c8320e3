//! # dotsync-core
//!
//! Core library for manifest-driven dotfile synchronization.
//!
//! A repository holds tracked configuration files and a `.dotpublish`
//! manifest listing them. Each manifest entry `X` lives at `X` inside the
//! repository and at `.X` inside the home directory. This library decides,
//! per entry, whether to copy, skip, overwrite, mirror a directory, or refuse
//! with a conflict, and then carries out that decision.

#![warn(missing_docs)]
#![warn(clippy::all)]

/// Error taxonomy for sync runs
pub mod error;

/// Manifest parsing
pub mod manifest;

/// Configuration file parsing and sync context resolution
pub mod config;

/// Mapping of manifest entries to concrete paths
pub mod resolver;

/// File comparison and verdict classification
pub mod comparison;

/// Advisory run lock
pub mod lock;

/// Synchronization engine
pub mod sync;

pub use config::{SyncContext, SyncDirection, SyncPolicy};
pub use error::{Result, SyncError};
pub use manifest::{Manifest, ManifestEntry};
pub use sync::{EntryOutcome, SyncEngine, SyncReport, SyncReporter};
