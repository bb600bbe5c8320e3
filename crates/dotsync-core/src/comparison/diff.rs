//! Unified diff generation

use std::fs;
use std::path::Path;

use similar::TextDiff;

use crate::error::{Result, SyncError};

const DIFF_CONTEXT_LINES: usize = 3;

/// Diff generator for creating textual diffs
pub struct DiffGenerator;

impl DiffGenerator {
    /// Generate a unified diff turning `destination` into `source`
    ///
    /// Returns `None` when either file is not valid UTF-8.
    ///
    /// # Errors
    ///
    /// Returns an error if either file cannot be read.
    pub fn generate(source: &Path, destination: &Path) -> Result<Option<String>> {
        let source_bytes = fs::read(source).map_err(|e| SyncError::transfer(source, e))?;
        let dest_bytes = fs::read(destination).map_err(|e| SyncError::transfer(destination, e))?;

        let (Ok(source_content), Ok(dest_content)) =
            (String::from_utf8(source_bytes), String::from_utf8(dest_bytes))
        else {
            return Ok(None);
        };

        Ok(Some(Self::generate_from_content(
            &source_content,
            &dest_content,
            source,
            destination,
        )))
    }

    /// Generate a unified diff from string contents
    #[must_use]
    pub fn generate_from_content(
        source_content: &str,
        dest_content: &str,
        source_path: &Path,
        dest_path: &Path,
    ) -> String {
        let dest_header = dest_path.display().to_string();
        let source_header = source_path.display().to_string();

        TextDiff::from_lines(dest_content, source_content)
            .unified_diff()
            .context_radius(DIFF_CONTEXT_LINES)
            .header(&dest_header, &source_header)
            .to_string()
    }
}
