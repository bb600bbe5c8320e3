//! Configuration file discovery

use std::io;
use std::path::{Path, PathBuf};

use crate::error::{Result, SyncError};

/// Config file discovery
pub struct ConfigDiscovery;

impl ConfigDiscovery {
    /// Locate the config file to use
    ///
    /// An explicit path wins and must exist. Otherwise the global XDG config
    /// (`$XDG_CONFIG_HOME/dotsync/config.toml`) is used when present.
    ///
    /// # Errors
    ///
    /// Returns [`SyncError::ConfigRead`] if an explicit path does not exist.
    pub fn discover(cli_path: Option<&Path>) -> Result<Option<PathBuf>> {
        if let Some(path) = cli_path {
            if path.is_file() {
                return Ok(Some(path.to_path_buf()));
            }
            return Err(SyncError::ConfigRead {
                path: path.to_path_buf(),
                source: io::Error::from(io::ErrorKind::NotFound),
            });
        }

        Ok(Self::find_global_config())
    }

    /// Default location of the global config file
    #[must_use]
    pub fn global_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("dotsync").join("config.toml"))
    }

    fn find_global_config() -> Option<PathBuf> {
        Self::global_config_path().filter(|path| path.is_file())
    }
}
