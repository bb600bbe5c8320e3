//! Configuration file parsing and sync context resolution
//!
//! This module handles:
//! - Config file discovery (explicit path or XDG location)
//! - TOML parsing with serde
//! - Precedence between command-line overrides, the config file and defaults
//! - Validation of the resolved roots and file names
//!
//! The result is a single immutable [`SyncContext`], built once at startup and
//! passed by reference into the sync engine.

mod discovery;
mod types;
mod validation;

use std::fs;
use std::path::{Path, PathBuf};

use tracing::debug;

pub use discovery::ConfigDiscovery;
pub use types::{FileConfig, SyncDirection, SyncPolicy};
pub use validation::ConfigValidator;

use crate::error::{Result, SyncError};
use crate::manifest::MANIFEST_FILE_NAME;

/// Default lock file name inside the repository
pub const LOCK_FILE_NAME: &str = ".dotsync.lock";

/// Loads the optional config file
pub struct ConfigManager;

impl ConfigManager {
    /// Discover and parse the config file
    ///
    /// With `no_config` set, nothing is read and defaults are returned.
    ///
    /// # Errors
    ///
    /// Returns an error if an explicit config path does not exist or a config
    /// file cannot be read or parsed.
    pub fn load(cli_config_path: Option<&Path>, no_config: bool) -> Result<FileConfig> {
        if no_config {
            return Ok(FileConfig::default());
        }

        match ConfigDiscovery::discover(cli_config_path)? {
            Some(path) => Self::parse(&path),
            None => Ok(FileConfig::default()),
        }
    }

    /// Parse a single config file
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or is not valid TOML for
    /// [`FileConfig`].
    pub fn parse(path: &Path) -> Result<FileConfig> {
        let content = fs::read_to_string(path).map_err(|source| SyncError::ConfigRead {
            path: path.to_path_buf(),
            source,
        })?;

        let config: FileConfig = toml::from_str(&content).map_err(|e| SyncError::Config {
            path: path.to_path_buf(),
            message: e.message().to_string(),
        })?;

        if let Some(manifest) = &config.manifest {
            ConfigValidator::validate_file_name("manifest", manifest, path)?;
        }
        if let Some(lock_file) = &config.lock_file {
            ConfigValidator::validate_file_name("lock_file", lock_file, path)?;
        }

        debug!("Loaded config file {}", path.display());
        Ok(config)
    }
}

/// Root overrides supplied on the command line or via environment
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ContextOverrides {
    /// Repository root override
    pub repository: Option<PathBuf>,
    /// Home directory override
    pub home: Option<PathBuf>,
}

/// Resolved locations for a sync run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyncContext {
    repository: PathBuf,
    home: PathBuf,
    manifest: PathBuf,
    lock_path: PathBuf,
}

impl SyncContext {
    /// Build a context from two roots with the default manifest and lock names
    ///
    /// No validation or canonicalization is performed.
    pub fn new(repository: impl Into<PathBuf>, home: impl Into<PathBuf>) -> Self {
        let repository = repository.into();
        Self {
            manifest: repository.join(MANIFEST_FILE_NAME),
            lock_path: repository.join(LOCK_FILE_NAME),
            home: home.into(),
            repository,
        }
    }

    /// Resolve the context from a config file and command-line overrides
    ///
    /// Precedence, highest first: overrides, config file, defaults. The
    /// repository defaults to the current directory and the home root to the
    /// user's home directory. Both roots are canonicalized.
    ///
    /// # Errors
    ///
    /// Returns [`SyncError::Config`] if a root cannot be determined or does
    /// not exist, if both roots are the same directory, or if a file name
    /// setting is invalid.
    pub fn resolve(file: &FileConfig, overrides: &ContextOverrides) -> Result<Self> {
        let repository = match overrides.repository.as_ref().or(file.repository.as_ref()) {
            Some(path) => path.clone(),
            None => std::env::current_dir().map_err(|e| SyncError::Config {
                path: PathBuf::from("."),
                message: format!("cannot determine current directory: {e}"),
            })?,
        };
        let home = overrides
            .home
            .clone()
            .or_else(|| file.home.clone())
            .or_else(dirs::home_dir)
            .ok_or_else(|| SyncError::Config {
                path: PathBuf::from("~"),
                message: "cannot determine home directory".to_string(),
            })?;

        let repository = Self::canonicalize("repository", &repository)?;
        let home = Self::canonicalize("home", &home)?;
        ConfigValidator::validate_roots(&repository, &home)?;

        let manifest_name = file.manifest.as_deref().unwrap_or(MANIFEST_FILE_NAME);
        let lock_name = file.lock_file.as_deref().unwrap_or(LOCK_FILE_NAME);
        ConfigValidator::validate_file_name("manifest", manifest_name, &repository)?;
        ConfigValidator::validate_file_name("lock_file", lock_name, &repository)?;

        Ok(Self {
            manifest: repository.join(manifest_name),
            lock_path: repository.join(lock_name),
            repository,
            home,
        })
    }

    /// Repository root
    #[must_use]
    pub fn repository(&self) -> &Path {
        &self.repository
    }

    /// Home root
    #[must_use]
    pub fn home(&self) -> &Path {
        &self.home
    }

    /// Manifest file location
    #[must_use]
    pub fn manifest(&self) -> &Path {
        &self.manifest
    }

    /// Lock file location
    #[must_use]
    pub fn lock_path(&self) -> &Path {
        &self.lock_path
    }

    /// Render the context as config-file TOML
    ///
    /// # Errors
    ///
    /// Returns [`SyncError::Config`] if a path cannot be represented in TOML,
    /// such as a path that is not valid UTF-8.
    pub fn to_toml(&self) -> Result<String> {
        let file_name = |path: &Path| {
            path.file_name()
                .map(|name| name.to_string_lossy().into_owned())
        };
        let snapshot = FileConfig {
            repository: Some(self.repository.clone()),
            home: Some(self.home.clone()),
            manifest: file_name(&self.manifest),
            lock_file: file_name(&self.lock_path),
        };
        toml::to_string(&snapshot).map_err(|e| SyncError::Config {
            path: self.repository.clone(),
            message: format!("cannot render configuration: {e}"),
        })
    }

    fn canonicalize(key: &str, path: &Path) -> Result<PathBuf> {
        dunce::canonicalize(path).map_err(|e| SyncError::Config {
            path: path.to_path_buf(),
            message: format!("{key} root is not accessible: {e}"),
        })
    }
}
