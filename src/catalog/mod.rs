//! Logical library catalog.
//!
//! A logical library is a named, ordered list of roots. Resolver levels refer
//! to libraries by name (`commons-logging`, `testclasses`) instead of by path,
//! and the catalog turns those names into roots when the hierarchy is built.
//!
//! The catalog is populated once and read-only afterwards. It can be passed
//! around explicitly, or installed process-wide with [`install_global`] for
//! code that has no handle to it.
//!
//! # Example
//!
//! ```rust,no_run
//! use pathable_harness::catalog::LibraryCatalog;
//! use pathable_harness::root::RootLocation;
//! use std::path::Path;
//!
//! # fn example() -> anyhow::Result<()> {
//! let mut catalog = LibraryCatalog::new();
//! catalog.register(
//!     "commons-logging",
//!     vec![RootLocation::open(Path::new("lib/commons-logging-1.1.jar"))?],
//! )?;
//!
//! let roots = catalog.resolve("commons-logging")?;
//! assert_eq!(roots.len(), 1);
//! # Ok(())
//! # }
//! ```

mod discovery;

pub use discovery::discover_root;

use crate::core::{HarnessError, HarnessResult};
use crate::root::RootLocation;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;
use tracing::debug;

static GLOBAL_CATALOG: OnceLock<LibraryCatalog> = OnceLock::new();

/// A named, ordered set of roots. Immutable once registered.
#[derive(Debug, Clone)]
pub struct LogicalLibrary {
    name: String,
    roots: Vec<RootLocation>,
}

impl LogicalLibrary {
    /// Library name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Roots in registration order.
    #[must_use]
    pub fn roots(&self) -> &[RootLocation] {
        &self.roots
    }
}

/// Name → roots lookup consulted while resolver levels are assembled.
#[derive(Debug, Clone, Default)]
pub struct LibraryCatalog {
    libraries: BTreeMap<String, LogicalLibrary>,
}

impl LibraryCatalog {
    /// Create an empty catalog.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a library.
    ///
    /// # Errors
    ///
    /// - [`HarnessError::DuplicateLibrary`] if the name is already registered
    /// - [`HarnessError::InvalidLibrary`] if the name is empty or `roots` is empty
    pub fn register(&mut self, name: impl Into<String>, roots: Vec<RootLocation>) -> HarnessResult<()> {
        let name = name.into();
        if name.trim().is_empty() {
            return Err(HarnessError::InvalidLibrary {
                name,
                reason: "library name must not be empty".to_string(),
            });
        }
        if roots.is_empty() {
            return Err(HarnessError::InvalidLibrary {
                name,
                reason: "a library needs at least one root".to_string(),
            });
        }
        if self.libraries.contains_key(&name) {
            return Err(HarnessError::DuplicateLibrary { name });
        }

        debug!("Registered logical library '{}' with {} root(s)", name, roots.len());
        self.libraries.insert(
            name.clone(),
            LogicalLibrary {
                name,
                roots,
            },
        );
        Ok(())
    }

    /// Register a library whose roots are given as paths, opening each one.
    ///
    /// # Errors
    ///
    /// Fails like [`LibraryCatalog::register`], or with
    /// [`HarnessError::RootUnavailable`] when a path cannot be opened.
    pub fn register_paths<P: AsRef<Path>>(&mut self, name: impl Into<String>, paths: &[P]) -> HarnessResult<()> {
        let roots = paths
            .iter()
            .map(|p| RootLocation::open(p.as_ref()))
            .collect::<HarnessResult<Vec<_>>>()?;
        self.register(name, roots)
    }

    /// Find a root for `name` on the search path and register it as a library.
    ///
    /// See [`discover_root`] for the matching rule.
    ///
    /// # Errors
    ///
    /// [`HarnessError::UnknownLibrary`] if nothing on the search path matches,
    /// or any error [`LibraryCatalog::register_paths`] can return.
    pub fn register_discovered(&mut self, name: &str, search_dirs: &[PathBuf]) -> HarnessResult<PathBuf> {
        let path = discover_root(name, search_dirs)?;
        self.register_paths(name, std::slice::from_ref(&path))?;
        Ok(path)
    }

    /// Resolve a library name to its roots.
    ///
    /// # Errors
    ///
    /// [`HarnessError::UnknownLibrary`] if the name was never registered.
    pub fn resolve(&self, name: &str) -> HarnessResult<&[RootLocation]> {
        self.libraries
            .get(name)
            .map(LogicalLibrary::roots)
            .ok_or_else(|| HarnessError::UnknownLibrary {
                name: name.to_string(),
            })
    }

    /// Look up a library by name.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&LogicalLibrary> {
        self.libraries.get(name)
    }

    /// Whether `name` is registered.
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.libraries.contains_key(name)
    }

    /// Iterate libraries in name order.
    pub fn libraries(&self) -> impl Iterator<Item = &LogicalLibrary> {
        self.libraries.values()
    }

    /// Number of registered libraries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.libraries.len()
    }

    /// Whether the catalog is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.libraries.is_empty()
    }
}

/// Install `catalog` as the process-wide catalog.
///
/// # Errors
///
/// [`HarnessError::CatalogAlreadyInstalled`] on every call after the first.
pub fn install_global(catalog: LibraryCatalog) -> HarnessResult<&'static LibraryCatalog> {
    GLOBAL_CATALOG
        .set(catalog)
        .map_err(|_| HarnessError::CatalogAlreadyInstalled)?;
    debug!("Installed the global library catalog");
    GLOBAL_CATALOG.get().ok_or(HarnessError::CatalogAlreadyInstalled)
}

/// The process-wide catalog, if one was installed.
#[must_use]
pub fn global() -> Option<&'static LibraryCatalog> {
    GLOBAL_CATALOG.get()
}
