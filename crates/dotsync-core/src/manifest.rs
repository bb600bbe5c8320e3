//! Manifest parsing
//!
//! The manifest is a plain text file at the repository root listing one
//! repository-relative path per line. A line whose first character is `#` is
//! a comment. Indented `#` is not a comment marker and is kept verbatim.
//! Blank lines are dropped.

use std::collections::HashSet;
use std::fmt;
use std::fs;
use std::io;
use std::path::{Component, Path, PathBuf};

use tracing::{debug, warn};

use crate::error::{Result, SyncError};

/// Default manifest file name at the repository root
pub const MANIFEST_FILE_NAME: &str = ".dotpublish";

const COMMENT_MARKER: char = '#';

/// A single manifest-listed path, relative to the repository root
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ManifestEntry(String);

impl ManifestEntry {
    /// Create an entry from its manifest text
    pub fn new(entry: impl Into<String>) -> Self {
        Self(entry.into())
    }

    /// The entry as written in the manifest
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Path of the entry inside the repository (`X`)
    #[must_use]
    pub fn repository_relative(&self) -> PathBuf {
        PathBuf::from(&self.0)
    }

    /// Path of the entry inside the home directory (`.X`)
    #[must_use]
    pub fn home_relative(&self) -> PathBuf {
        PathBuf::from(format!(".{}", self.0))
    }

    /// Reject entries that would escape the repository or home root
    ///
    /// # Errors
    ///
    /// Returns [`SyncError::InvalidEntry`] for absolute paths, for paths
    /// containing `..` and for paths starting with a `.` component.
    pub fn validate(&self) -> Result<()> {
        let path = Path::new(&self.0);
        if path.has_root() || path.is_absolute() {
            return Err(SyncError::InvalidEntry {
                entry: self.0.clone(),
                reason: "entries must be relative paths",
            });
        }
        if path.components().any(|c| matches!(c, Component::ParentDir)) {
            return Err(SyncError::InvalidEntry {
                entry: self.0.clone(),
                reason: "entries must not contain `..`",
            });
        }
        // The home side prefixes a dot, so `.` and `./x` would become `..` and `../x`
        let home = self.home_relative();
        let leading_dot = matches!(path.components().next(), None | Some(Component::CurDir));
        if leading_dot
            || home
                .components()
                .any(|c| !matches!(c, Component::Normal(_)))
        {
            return Err(SyncError::InvalidEntry {
                entry: self.0.clone(),
                reason: "entries must not start with `.` or `/`",
            });
        }
        Ok(())
    }
}

impl fmt::Display for ManifestEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Ordered, de-duplicated list of manifest entries
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Manifest {
    entries: Vec<ManifestEntry>,
}

impl Manifest {
    /// Load and parse the manifest file
    ///
    /// # Errors
    ///
    /// Returns [`SyncError::ManifestNotFound`] if the file does not exist and
    /// [`SyncError::ManifestRead`] if it cannot be read.
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path).map_err(|source| {
            if source.kind() == io::ErrorKind::NotFound {
                SyncError::ManifestNotFound {
                    path: path.to_path_buf(),
                }
            } else {
                SyncError::ManifestRead {
                    path: path.to_path_buf(),
                    source,
                }
            }
        })?;

        let manifest = Self::parse(&content);
        debug!(
            "Loaded {} entries from {}",
            manifest.len(),
            path.display()
        );
        Ok(manifest)
    }

    /// Parse manifest text
    #[must_use]
    pub fn parse(content: &str) -> Self {
        let mut seen = HashSet::new();
        let mut entries = Vec::new();

        for line in content.lines() {
            let line = line.strip_suffix('\r').unwrap_or(line);

            if line.starts_with(COMMENT_MARKER) || line.trim().is_empty() {
                continue;
            }

            let entry = ManifestEntry::new(line);
            if seen.insert(entry.clone()) {
                entries.push(entry);
            } else {
                warn!("Ignoring duplicate manifest entry `{line}`");
            }
        }

        Self { entries }
    }

    /// Entries in file order
    #[must_use]
    pub fn entries(&self) -> &[ManifestEntry] {
        &self.entries
    }

    /// Number of entries
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the manifest lists no entries
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterate entries in file order
    pub fn iter(&self) -> std::slice::Iter<'_, ManifestEntry> {
        self.entries.iter()
    }
}

impl<'a> IntoIterator for &'a Manifest {
    type Item = &'a ManifestEntry;
    type IntoIter = std::slice::Iter<'a, ManifestEntry>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn names(manifest: &Manifest) -> Vec<&str> {
        manifest.iter().map(ManifestEntry::as_str).collect()
    }

    #[test]
    fn test_parse_drops_only_leading_hash_lines() {
        let manifest = Manifest::parse("# comment\ntool-config\n  # indented\n");

        assert_eq!(names(&manifest), vec!["tool-config", "  # indented"]);
    }

    #[test]
    fn test_parse_preserves_order() {
        let manifest = Manifest::parse("vimrc\nbashrc\nconfig/nvim\n");
        assert_eq!(names(&manifest), vec!["vimrc", "bashrc", "config/nvim"]);
    }

    #[test]
    fn test_parse_skips_blank_lines() {
        let manifest = Manifest::parse("bashrc\n\n   \n\tgitconfig\n");
        assert_eq!(names(&manifest), vec!["bashrc", "\tgitconfig"]);
    }

    #[test]
    fn test_parse_strips_carriage_returns() {
        let manifest = Manifest::parse("bashrc\r\n#comment\r\nzshrc\r\n");
        assert_eq!(names(&manifest), vec!["bashrc", "zshrc"]);
    }

    #[test]
    fn test_parse_deduplicates_entries() {
        let manifest = Manifest::parse("bashrc\nzshrc\nbashrc\n");
        assert_eq!(names(&manifest), vec!["bashrc", "zshrc"]);
    }

    #[test]
    fn test_load_missing_manifest() {
        let tmp = TempDir::new().unwrap();
        let err = Manifest::load(&tmp.path().join(MANIFEST_FILE_NAME)).unwrap_err();
        assert!(matches!(err, SyncError::ManifestNotFound { .. }));
    }

    #[test]
    fn test_load_manifest_file() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join(MANIFEST_FILE_NAME);
        fs::write(&path, "# tracked files\nbashrc\nconfig/nvim\n").unwrap();

        let manifest = Manifest::load(&path).unwrap();
        assert_eq!(manifest.len(), 2);
        assert!(!manifest.is_empty());
        assert_eq!(names(&manifest), vec!["bashrc", "config/nvim"]);
    }

    #[test]
    fn test_entry_paths() {
        let entry = ManifestEntry::new("config/nvim");
        assert_eq!(entry.repository_relative(), PathBuf::from("config/nvim"));
        assert_eq!(entry.home_relative(), PathBuf::from(".config/nvim"));
        assert_eq!(entry.to_string(), "config/nvim");
    }

    #[test]
    fn test_entry_validation() {
        assert!(ManifestEntry::new("bashrc").validate().is_ok());
        assert!(ManifestEntry::new("config/nvim").validate().is_ok());
        assert!(ManifestEntry::new("/etc/passwd").validate().is_err());
        assert!(ManifestEntry::new("../outside").validate().is_err());
        assert!(ManifestEntry::new("config/../../outside").validate().is_err());
    }

    #[test]
    fn test_entries_cannot_escape_home_through_leading_dot() {
        for entry in [".", "./", "./bashrc", ".//bashrc", "./config/nvim"] {
            let err = ManifestEntry::new(entry).validate().unwrap_err();
            assert!(
                matches!(err, SyncError::InvalidEntry { .. }),
                "`{entry}` was accepted"
            );
        }
        // A dotted name stays a single normal component once prefixed
        assert!(ManifestEntry::new(".hidden").validate().is_ok());
        assert!(ManifestEntry::new("config/./nvim").validate().is_ok());
    }
}
