//! Configuration validation

use std::path::{Component, Path};

use crate::error::{Result, SyncError};

/// Config validator
pub struct ConfigValidator;

impl ConfigValidator {
    /// Check that a file name setting names a single relative path component
    ///
    /// # Errors
    ///
    /// Returns [`SyncError::Config`] naming `key` if the value is empty,
    /// absolute, or contains separators or `..`.
    pub fn validate_file_name(key: &str, value: &str, origin: &Path) -> Result<()> {
        let mut components = Path::new(value).components();
        let valid = matches!(
            (components.next(), components.next()),
            (Some(Component::Normal(_)), None)
        );

        if valid {
            Ok(())
        } else {
            Err(SyncError::Config {
                path: origin.to_path_buf(),
                message: format!("`{key}` must be a plain file name, got `{value}`"),
            })
        }
    }

    /// Check that the repository and home roots are distinct directories
    ///
    /// # Errors
    ///
    /// Returns [`SyncError::Config`] if either root is not a directory or both
    /// resolve to the same path.
    pub fn validate_roots(repository: &Path, home: &Path) -> Result<()> {
        for (key, root) in [("repository", repository), ("home", home)] {
            if !root.is_dir() {
                return Err(SyncError::Config {
                    path: root.to_path_buf(),
                    message: format!("{key} root is not a directory"),
                });
            }
        }

        if repository == home {
            return Err(SyncError::Config {
                path: repository.to_path_buf(),
                message: "repository and home must be different directories".to_string(),
            });
        }

        Ok(())
    }
}
