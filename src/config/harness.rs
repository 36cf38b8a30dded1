//! The harness configuration file.
//!
//! A configuration file describes the catalog, the platform tiers and
//! optionally the hierarchy the CLI queries:
//!
//! ```toml
//! # Directories searched for discovered libraries
//! search_paths = ["lib"]
//! # Libraries located by file-name prefix on search_paths
//! discover = ["commons-logging", "commons-logging-adapters"]
//!
//! [libraries]
//! testclasses = ["target/test-classes"]
//!
//! [platform]
//! bootstrap_prefixes = ["java."]
//! system_roots = ["lib/junit-3.8.1.jar"]
//!
//! [hierarchy]
//! context_level = "child"
//!
//! [[hierarchy.levels]]
//! label = "parent"
//! libraries = ["commons-logging"]
//! system_prefixes = ["junit."]
//!
//! [[hierarchy.levels]]
//! label = "child"
//! libraries = ["commons-logging-adapters", "testclasses"]
//! ```
//!
//! Relative paths are resolved against the directory holding the file.
//!
//! # Lookup order
//!
//! 1. an explicit path (the CLI's `--config`)
//! 2. the `PATHABLE_CONFIG` environment variable
//! 3. `./pathable.toml`
//! 4. `~/.pathable/config.toml`

use super::parse_config;
use crate::catalog::LibraryCatalog;
use crate::constants::{CONFIG_ENV_VAR, DEFAULT_ROOT_LABEL, PROJECT_CONFIG_FILE, USER_CONFIG_DIR, USER_CONFIG_FILE};
use crate::core::{HarnessError, HarnessResult};
use crate::resolver::SystemPlatform;
use crate::root::RootLocation;
use crate::runner::{Hierarchy, HierarchySpec, LevelSpec};
use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::debug;

/// Platform tiers.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlatformConfig {
    /// Class-name prefixes the bootstrap tier owns
    #[serde(default)]
    pub bootstrap_prefixes: Vec<String>,
    #[serde(default)]
    pub bootstrap_roots: Vec<PathBuf>,
    /// Roots answering system-prefix passthroughs
    #[serde(default)]
    pub system_roots: Vec<PathBuf>,
}

/// A parsed configuration file.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct HarnessConfig {
    /// Logical libraries by name, each an ordered list of roots
    #[serde(default)]
    pub libraries: BTreeMap<String, Vec<PathBuf>>,
    #[serde(default)]
    pub search_paths: Vec<PathBuf>,
    /// Library names located on `search_paths` by file-name prefix
    #[serde(default)]
    pub discover: Vec<String>,
    #[serde(default)]
    pub platform: PlatformConfig,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hierarchy: Option<HierarchySpec>,
    #[serde(skip)]
    base_dir: PathBuf,
}

impl HarnessConfig {
    /// Load a configuration file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn load(path: &Path) -> Result<Self> {
        let mut config: Self = parse_config(path)?;
        config.base_dir = match path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
            _ => PathBuf::from("."),
        };
        debug!(
            "Loaded harness config from {} ({} libraries, {} discovered)",
            path.display(),
            config.libraries.len(),
            config.discover.len()
        );
        Ok(config)
    }

    /// Load the configuration found by [`HarnessConfig::locate`].
    ///
    /// # Errors
    ///
    /// [`HarnessError::ConfigError`] if no configuration file exists at any
    /// lookup location, or the load error of the file that was found.
    pub fn load_default(explicit: Option<&Path>) -> Result<Self> {
        let path = Self::locate(explicit).ok_or_else(|| HarnessError::ConfigError {
            message: format!(
                "no configuration file found; pass --config, set {CONFIG_ENV_VAR}, or create {PROJECT_CONFIG_FILE}"
            ),
        })?;
        Self::load(&path)
    }

    /// Find the configuration file to use.
    ///
    /// An explicit path or `PATHABLE_CONFIG` is returned whether or not it
    /// exists, so a typo surfaces as a read error. The project and user files
    /// are only returned when present.
    #[must_use]
    pub fn locate(explicit: Option<&Path>) -> Option<PathBuf> {
        let cwd = std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."));
        locate_in(
            explicit,
            std::env::var_os(CONFIG_ENV_VAR),
            &cwd,
            dirs::home_dir().as_deref(),
        )
    }

    /// Make a configuration whose relative paths resolve against `base_dir`.
    #[must_use]
    pub fn with_base_dir(mut self, base_dir: impl Into<PathBuf>) -> Self {
        self.base_dir = base_dir.into();
        self
    }

    /// Directory relative paths resolve against.
    #[must_use]
    pub fn base_dir(&self) -> &Path {
        &self.base_dir
    }

    fn resolve_path(&self, path: &Path) -> PathBuf {
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            self.base_dir.join(path)
        }
    }

    fn resolve_all(&self, paths: &[PathBuf]) -> Vec<PathBuf> {
        paths.iter().map(|p| self.resolve_path(p)).collect()
    }

    /// Register every configured and discovered library.
    ///
    /// # Errors
    ///
    /// Catalog registration errors, [`HarnessError::RootUnavailable`] for a
    /// root that does not exist, and [`HarnessError::UnknownLibrary`] for a
    /// discovered name with no match.
    pub fn build_catalog(&self) -> HarnessResult<LibraryCatalog> {
        let mut catalog = LibraryCatalog::new();
        for (name, roots) in &self.libraries {
            catalog.register_paths(name.clone(), &self.resolve_all(roots))?;
        }
        let search_paths = self.resolve_all(&self.search_paths);
        for name in &self.discover {
            catalog.register_discovered(name, &search_paths)?;
        }
        Ok(catalog)
    }

    /// Build the platform tiers.
    ///
    /// # Errors
    ///
    /// [`HarnessError::RootUnavailable`] for a root that cannot be opened.
    pub fn build_platform(&self) -> HarnessResult<SystemPlatform> {
        let open = |paths: &[PathBuf]| -> HarnessResult<Vec<RootLocation>> {
            self.resolve_all(paths)
                .iter()
                .map(|path| RootLocation::open(path))
                .collect()
        };

        let platform = self
            .platform
            .bootstrap_prefixes
            .iter()
            .fold(SystemPlatform::new(), |platform, prefix| {
                platform.with_bootstrap_prefix(prefix.clone())
            })
            .with_bootstrap_roots(open(&self.platform.bootstrap_roots)?)
            .with_system_roots(open(&self.platform.system_roots)?);
        Ok(platform)
    }

    /// The configured hierarchy, or a single root level holding every
    /// catalog library when none is configured.
    #[must_use]
    pub fn hierarchy_spec(&self, catalog: &LibraryCatalog) -> HierarchySpec {
        self.hierarchy.clone().unwrap_or_else(|| {
            let level = catalog
                .libraries()
                .fold(LevelSpec::new(DEFAULT_ROOT_LABEL), |level, library| {
                    level.with_library(library.name())
                });
            HierarchySpec::new().level(level)
        })
    }

    /// Build the catalog, the platform, and the hierarchy in one go.
    ///
    /// # Errors
    ///
    /// Any error from [`HarnessConfig::build_catalog`],
    /// [`HarnessConfig::build_platform`] or [`Hierarchy::build`].
    pub fn build_hierarchy(&self) -> HarnessResult<(LibraryCatalog, Hierarchy)> {
        let catalog = self.build_catalog()?;
        let platform = Arc::new(self.build_platform()?);
        let hierarchy = Hierarchy::build(&self.hierarchy_spec(&catalog), &catalog, platform)?;
        Ok((catalog, hierarchy))
    }
}

fn locate_in(
    explicit: Option<&Path>,
    env_value: Option<OsString>,
    cwd: &Path,
    home: Option<&Path>,
) -> Option<PathBuf> {
    if let Some(path) = explicit {
        return Some(path.to_path_buf());
    }
    if let Some(value) = env_value.filter(|v| !v.is_empty()) {
        return Some(PathBuf::from(value));
    }
    let project = cwd.join(PROJECT_CONFIG_FILE);
    if project.is_file() {
        return Some(project);
    }
    home.map(|home| home.join(USER_CONFIG_DIR).join(USER_CONFIG_FILE))
        .filter(|user| user.is_file())
}
