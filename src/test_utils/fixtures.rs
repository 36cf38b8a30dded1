//! Builders for archive and directory roots used in tests.

use anyhow::{Context, Result};
use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};
use zip::ZipWriter;
use zip::write::SimpleFileOptions;

#[derive(Clone, Debug)]
enum ArchiveEntry {
    File { name: String, content: Vec<u8> },
    Directory(String),
}

/// Test fixture for a zip archive (jar) root.
///
/// Entries are written in the order they are added, which is also the
/// archive's central-directory order.
#[derive(Clone, Debug)]
pub struct ArchiveFixture {
    pub name: String,
    entries: Vec<ArchiveEntry>,
}

impl ArchiveFixture {
    /// An empty archive named `name`.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            entries: Vec::new(),
        }
    }

    /// Add a file entry.
    #[must_use]
    pub fn with_entry(mut self, name: &str, content: &[u8]) -> Self {
        self.entries.push(ArchiveEntry::File {
            name: name.to_string(),
            content: content.to_vec(),
        });
        self
    }

    /// Add an explicit directory entry such as `org/`.
    #[must_use]
    pub fn with_directory(mut self, name: &str) -> Self {
        self.entries.push(ArchiveEntry::Directory(name.to_string()));
        self
    }

    /// Write the archive into `dir`, returning its path.
    pub fn write_to(&self, dir: &Path) -> Result<PathBuf> {
        fs::create_dir_all(dir)?;
        let path = dir.join(&self.name);
        let file = File::create(&path)
            .with_context(|| format!("Failed to create archive {}", path.display()))?;

        let mut zip = ZipWriter::new(file);
        let options = SimpleFileOptions::default();
        for entry in &self.entries {
            match entry {
                ArchiveEntry::File { name, content } => {
                    zip.start_file(name.as_str(), options)?;
                    zip.write_all(content)?;
                }
                ArchiveEntry::Directory(name) => zip.add_directory(name.as_str(), options)?,
            }
        }
        zip.finish()
            .with_context(|| format!("Failed to finish archive {}", path.display()))?;
        Ok(path)
    }
}

/// Test fixture for a directory root.
#[derive(Clone, Debug)]
pub struct DirectoryFixture {
    pub name: String,
    entries: Vec<(String, Vec<u8>)>,
}

impl DirectoryFixture {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            entries: Vec::new(),
        }
    }

    /// Add a file at the `/`-separated path `name`.
    #[must_use]
    pub fn with_entry(mut self, name: &str, content: &[u8]) -> Self {
        self.entries.push((name.to_string(), content.to_vec()));
        self
    }

    /// Create the directory under `dir`, returning its path.
    pub fn write_to(&self, dir: &Path) -> Result<PathBuf> {
        let root = dir.join(&self.name);
        fs::create_dir_all(&root)?;
        for (name, content) in &self.entries {
            let path = root.join(name);
            if let Some(parent) = path.parent() {
                fs::create_dir_all(parent)?;
            }
            fs::write(&path, content)
                .with_context(|| format!("Failed to write fixture file {}", path.display()))?;
        }
        Ok(root)
    }
}
