//! JSON file snapshot source.
//!
//! Reads an exported issue list from a single JSON document, either a bare
//! array of issues or `{"issues": [...]}`.

use crate::domain::{Issue, SnapshotDocument};
use crate::storage::{ensure_unique_ids, IssueSource};
use anyhow::{anyhow, Context, Result};
use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};

/// Snapshot source backed by a JSON file.
#[derive(Debug, Clone)]
pub struct JsonSnapshot {
    path: PathBuf,
}

#[derive(Serialize)]
struct WrappedRef<'a> {
    issues: &'a [Issue],
}

impl JsonSnapshot {
    /// Create a source reading from `path`
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    /// Check that the snapshot file exists
    pub fn validate(&self) -> Result<()> {
        if !self.path.is_file() {
            return Err(anyhow!(
                "Snapshot not found: {}",
                self.path.display()
            ));
        }
        Ok(())
    }

    /// Write issues as `{"issues": [...]}`.
    ///
    /// The write is atomic: write to a temp file, then rename.
    pub fn write(&self, issues: &[Issue]) -> Result<()> {
        let json = serde_json::to_string_pretty(&WrappedRef { issues })
            .context("Failed to serialize snapshot")?;

        let temp_path = self.path.with_extension("json.tmp");
        fs::write(&temp_path, json).context("Failed to write temporary file")?;
        fs::rename(&temp_path, &self.path).context("Failed to rename temporary file")?;

        Ok(())
    }
}

impl IssueSource for JsonSnapshot {
    fn list_issues(&self) -> Result<Vec<Issue>> {
        self.validate()?;

        let contents = fs::read_to_string(&self.path)
            .with_context(|| format!("Failed to read snapshot: {}", self.path.display()))?;
        let document: SnapshotDocument = serde_json::from_str(&contents)
            .with_context(|| format!("Failed to parse snapshot: {}", self.path.display()))?;

        let issues = document.into_issues();
        ensure_unique_ids(&issues)?;
        Ok(issues)
    }

    fn save_issues(&self, issues: &[Issue]) -> Result<()> {
        self.write(issues)
    }

    fn describe(&self) -> String {
        self.path.display().to_string()
    }
}
