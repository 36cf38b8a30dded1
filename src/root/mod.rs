//! Loadable roots and resource locators.
//!
//! A [`RootLocation`] is one loadable unit attached to a resolver level: either
//! a directory tree or a zip archive. Both expose the same three operations:
//! membership ([`RootLocation::contains`]), location ([`RootLocation::locate`]),
//! and ordered enumeration ([`RootLocation::entries`]).
//!
//! # Entry names
//!
//! Entry names are relative, `/`-separated paths such as
//! `org/apache/commons/logging/Log.class`. Names that are empty, absolute,
//! contain a backslash, or contain `.`, `..`, or empty components never match
//! any root, so a lookup cannot step outside the root it is searching.
//!
//! # Iteration order
//!
//! - Archives list entries in central-directory order
//! - Directories list entries in a recursive walk sorted by file name
//!
//! # Example
//!
//! ```rust,no_run
//! use pathable_harness::root::RootLocation;
//! use std::path::Path;
//!
//! # fn example() -> anyhow::Result<()> {
//! let root = RootLocation::open(Path::new("lib/commons-logging-1.1.jar"))?;
//! if let Some(locator) = root.locate("org/apache/commons/logging/Log.class") {
//!     println!("found at {locator}");
//! }
//! # Ok(())
//! # }
//! ```

mod archive;
mod directory;

pub use archive::ArchiveRoot;
pub use directory::DirectoryRoot;

use crate::core::{HarnessError, HarnessResult};
use serde::Serialize;
use std::fmt;
use std::fs::File;
use std::io::Read;
use std::path::{Path, PathBuf};

/// A readable stream over a resource's content. Closing is the caller's job.
pub type ResourceStream = Box<dyn Read + Send>;

/// The physical shape of a root.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum RootKind {
    /// A directory tree on disk
    Directory,
    /// A zip archive (jar)
    Archive,
}

/// Where a located resource lives.
///
/// Renders as `jar:file:<archive>!/<entry>` for archive entries and
/// `file:<dir>/<entry>` for directory entries.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct ResourceLocator {
    root: PathBuf,
    kind: RootKind,
    entry: String,
}

impl ResourceLocator {
    pub(crate) fn new(root: &Path, kind: RootKind, entry: &str) -> Self {
        Self {
            root: root.to_path_buf(),
            kind,
            entry: entry.to_string(),
        }
    }

    /// Path of the root that holds the resource.
    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Kind of the root that holds the resource.
    #[must_use]
    pub const fn kind(&self) -> RootKind {
        self.kind
    }

    /// Entry name inside the root.
    #[must_use]
    pub fn entry(&self) -> &str {
        &self.entry
    }

    /// Open the located resource for reading.
    ///
    /// # Errors
    ///
    /// Returns [`HarnessError::ResourceUnreadable`] when the resource was
    /// located but its content cannot be read anymore, for example because the
    /// archive was removed or corrupted after it was indexed.
    pub fn open(&self) -> HarnessResult<ResourceStream> {
        let opened = match self.kind {
            RootKind::Directory => File::open(self.root.join(&self.entry))
                .map(|file| Box::new(file) as ResourceStream),
            RootKind::Archive => archive::read_entry(&self.root, &self.entry)
                .map(|bytes| Box::new(std::io::Cursor::new(bytes)) as ResourceStream),
        };
        opened.map_err(|source| HarnessError::ResourceUnreadable {
            locator: self.to_string(),
            source,
        })
    }
}

impl fmt::Display for ResourceLocator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let root = self.root.to_string_lossy().replace('\\', "/");
        match self.kind {
            RootKind::Archive => write!(f, "jar:file:{root}!/{}", self.entry),
            RootKind::Directory => write!(f, "file:{}/{}", root.trim_end_matches('/'), self.entry),
        }
    }
}

/// A loadable unit attached to a resolver level.
#[derive(Debug, Clone)]
pub enum RootLocation {
    /// A directory tree
    Directory(DirectoryRoot),
    /// An indexed zip archive
    Archive(ArchiveRoot),
}

impl RootLocation {
    /// Open a root, choosing directory or archive handling from what is on disk.
    ///
    /// The path is canonicalized so that locators and equality are stable.
    ///
    /// # Errors
    ///
    /// Returns [`HarnessError::RootUnavailable`] if the path does not exist or
    /// is a file that is not a readable zip archive.
    pub fn open(path: &Path) -> HarnessResult<Self> {
        let canonical = path.canonicalize().map_err(|e| HarnessError::RootUnavailable {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;

        if canonical.is_dir() {
            Ok(Self::Directory(DirectoryRoot::new(canonical)))
        } else {
            ArchiveRoot::open(canonical).map(Self::Archive)
        }
    }

    /// Path of the root on disk.
    #[must_use]
    pub fn path(&self) -> &Path {
        match self {
            Self::Directory(dir) => dir.path(),
            Self::Archive(archive) => archive.path(),
        }
    }

    /// Shape of the root.
    #[must_use]
    pub const fn kind(&self) -> RootKind {
        match self {
            Self::Directory(_) => RootKind::Directory,
            Self::Archive(_) => RootKind::Archive,
        }
    }

    /// Whether this root holds `entry`.
    #[must_use]
    pub fn contains(&self, entry: &str) -> bool {
        if !is_valid_entry_name(entry) {
            return false;
        }
        match self {
            Self::Directory(dir) => dir.contains(entry),
            Self::Archive(archive) => archive.contains(entry),
        }
    }

    /// Locate `entry` in this root.
    #[must_use]
    pub fn locate(&self, entry: &str) -> Option<ResourceLocator> {
        self.contains(entry)
            .then(|| ResourceLocator::new(self.path(), self.kind(), entry))
    }

    /// List every entry in this root, in the root's iteration order.
    ///
    /// # Errors
    ///
    /// Directory walks can fail part-way through on unreadable subdirectories.
    pub fn entries(&self) -> HarnessResult<Vec<String>> {
        match self {
            Self::Directory(dir) => dir.entries(),
            Self::Archive(archive) => Ok(archive.entries().to_vec()),
        }
    }
}

impl PartialEq for RootLocation {
    fn eq(&self, other: &Self) -> bool {
        self.kind() == other.kind() && self.path() == other.path()
    }
}

impl Eq for RootLocation {}

impl fmt::Display for RootLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.path().display())
    }
}

/// Check that an entry name stays inside its root.
pub(crate) fn is_valid_entry_name(entry: &str) -> bool {
    !entry.is_empty()
        && !entry.starts_with('/')
        && !entry.contains('\\')
        && entry
            .split('/')
            .all(|component| !component.is_empty() && component != "." && component != "..")
}
