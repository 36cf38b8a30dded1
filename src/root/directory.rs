//! Directory roots.

use crate::core::{HarnessError, HarnessResult};
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// A directory tree whose files are looked up on demand.
#[derive(Debug, Clone)]
pub struct DirectoryRoot {
    path: PathBuf,
}

impl DirectoryRoot {
    pub(crate) const fn new(path: PathBuf) -> Self {
        Self { path }
    }

    /// Path of the directory.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    pub(crate) fn contains(&self, entry: &str) -> bool {
        self.path.join(entry).is_file()
    }

    /// Walk the tree and return every file as a `/`-separated relative name.
    pub(crate) fn entries(&self) -> HarnessResult<Vec<String>> {
        let mut entries = Vec::new();

        for entry in WalkDir::new(&self.path).follow_links(false).sort_by_file_name() {
            let entry = entry.map_err(|e| HarnessError::RootUnavailable {
                path: self.path.clone(),
                reason: e.to_string(),
            })?;
            if !entry.file_type().is_file() {
                continue;
            }
            // Every walked path is below the root.
            let Ok(relative) = entry.path().strip_prefix(&self.path) else {
                continue;
            };
            let name = relative
                .components()
                .map(|c| c.as_os_str().to_string_lossy())
                .collect::<Vec<_>>()
                .join("/");
            entries.push(name);
        }

        Ok(entries)
    }
}
