//! Zip archive roots.

use crate::core::{HarnessError, HarnessResult};
use std::collections::HashSet;
use std::fs::File;
use std::io::{self, BufReader, Read};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::trace;
use zip::ZipArchive;

/// A zip archive whose entry names were indexed when it was opened.
///
/// The index is shared between clones, so attaching the same archive to
/// several levels does not re-read its central directory.
#[derive(Debug, Clone)]
pub struct ArchiveRoot {
    path: PathBuf,
    index: Arc<ArchiveIndex>,
}

#[derive(Debug)]
struct ArchiveIndex {
    ordered: Vec<String>,
    names: HashSet<String>,
}

impl ArchiveRoot {
    /// Open and index the archive at `path`.
    ///
    /// Directory entries are skipped; only file entries can be located.
    pub(crate) fn open(path: PathBuf) -> HarnessResult<Self> {
        let unavailable = |reason: String| HarnessError::RootUnavailable {
            path: path.clone(),
            reason,
        };

        let file = File::open(&path).map_err(|e| unavailable(e.to_string()))?;
        let mut archive =
            ZipArchive::new(BufReader::new(file)).map_err(|e| unavailable(e.to_string()))?;

        let mut ordered = Vec::with_capacity(archive.len());
        for i in 0..archive.len() {
            let entry = archive.by_index(i).map_err(|e| unavailable(e.to_string()))?;
            if entry.is_dir() {
                continue;
            }
            ordered.push(entry.name().to_string());
        }
        let names = ordered.iter().cloned().collect();

        trace!("Indexed {} entries in archive {}", ordered.len(), path.display());

        Ok(Self {
            path,
            index: Arc::new(ArchiveIndex { ordered, names }),
        })
    }

    /// Path of the archive file.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Indexed file entries in central-directory order.
    #[must_use]
    pub fn entries(&self) -> &[String] {
        &self.index.ordered
    }

    pub(crate) fn contains(&self, entry: &str) -> bool {
        self.index.names.contains(entry)
    }
}

/// Read one entry's content. The archive is reopened on every call.
pub(crate) fn read_entry(archive_path: &Path, entry: &str) -> io::Result<Vec<u8>> {
    let file = File::open(archive_path)?;
    let mut archive = ZipArchive::new(BufReader::new(file)).map_err(io::Error::other)?;
    let mut zipped = archive.by_name(entry).map_err(io::Error::other)?;

    let mut content = Vec::new();
    zipped.read_to_end(&mut content)?;
    Ok(content)
}
