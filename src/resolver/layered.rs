//! One level of a resolver hierarchy.

use super::engine;
use super::platform::PlatformResolver;
use super::types::{ClassHandle, ResolverId};
use crate::catalog::LibraryCatalog;
use crate::core::{HarnessError, HarnessResult};
use crate::root::{ResourceLocator, ResourceStream, RootLocation};
use std::collections::HashSet;
use std::fmt;
use std::sync::{Arc, Mutex, MutexGuard, OnceLock, PoisonError};
use tracing::debug;

/// What a level searches, fixed at the first lookup.
#[derive(Debug, Clone)]
pub(crate) struct LevelConfig {
    pub(crate) roots: Vec<RootLocation>,
    pub(crate) system_prefixes: Vec<String>,
    pub(crate) explicit: Vec<(String, Arc<LayeredResolver>)>,
    pub(crate) parent_first: bool,
}

impl Default for LevelConfig {
    fn default() -> Self {
        Self {
            roots: Vec::new(),
            system_prefixes: Vec::new(),
            explicit: Vec::new(),
            parent_first: true,
        }
    }
}

#[derive(Debug, Default)]
struct PendingConfig {
    sealed: bool,
    config: LevelConfig,
}

/// A resolver level: own roots, delegation rules, and a shared parent.
///
/// A level starts open for configuration. The first lookup of any kind seals
/// it; from then on the configuration is immutable and every mutation fails
/// with [`HarnessError::ResolverSealed`]. Sealed levels are safe to query
/// from several threads at once.
///
/// Levels are always handled through [`Arc`], so one parent can be shared
/// by many children and a level can be installed as the ambient context.
///
/// # Example
///
/// ```rust,no_run
/// use pathable_harness::catalog::LibraryCatalog;
/// use pathable_harness::resolver::{LayeredResolver, SystemPlatform};
/// use std::sync::Arc;
///
/// # fn example(catalog: &LibraryCatalog) -> anyhow::Result<()> {
/// let parent = LayeredResolver::root("parent", Arc::new(SystemPlatform::new()));
/// parent.allow_system_prefix("junit.")?;
/// parent.add_logical_lib("commons-logging", catalog)?;
///
/// let child = LayeredResolver::child("child", &parent);
/// child.add_logical_lib("testclasses", catalog)?;
///
/// let log = child.find_class("org.apache.commons.logging.Log")?;
/// assert!(log.is_defined_by(&parent));
/// # Ok(())
/// # }
/// ```
pub struct LayeredResolver {
    id: ResolverId,
    label: String,
    parent: Option<Arc<LayeredResolver>>,
    platform: Arc<dyn PlatformResolver>,
    pending: Mutex<PendingConfig>,
    sealed: OnceLock<LevelConfig>,
}

impl LayeredResolver {
    /// Create a root-most level. Its implicit parent is the platform's
    /// bootstrap tier.
    #[must_use]
    pub fn root(label: impl Into<String>, platform: Arc<dyn PlatformResolver>) -> Arc<Self> {
        Self::build(label.into(), None, platform)
    }

    /// Create a level below `parent`, sharing the parent's platform.
    #[must_use]
    pub fn child(label: impl Into<String>, parent: &Arc<Self>) -> Arc<Self> {
        Self::build(label.into(), Some(Arc::clone(parent)), Arc::clone(&parent.platform))
    }

    fn build(label: String, parent: Option<Arc<Self>>, platform: Arc<dyn PlatformResolver>) -> Arc<Self> {
        let resolver = Self {
            id: ResolverId::next(),
            label,
            parent,
            platform,
            pending: Mutex::new(PendingConfig::default()),
            sealed: OnceLock::new(),
        };
        debug!(
            "Created resolver '{}' {} (parent: {})",
            resolver.label,
            resolver.id,
            resolver.parent.as_ref().map_or("bootstrap", |p| p.label.as_str())
        );
        Arc::new(resolver)
    }

    /// Append roots to this level's search path.
    ///
    /// # Errors
    ///
    /// [`HarnessError::ResolverSealed`] once this level has answered a lookup.
    pub fn add_roots(&self, roots: impl IntoIterator<Item = RootLocation>) -> HarnessResult<()> {
        self.configure("add roots", |config| config.roots.extend(roots))
    }

    /// Append the roots of a logical library.
    ///
    /// # Errors
    ///
    /// [`HarnessError::UnknownLibrary`] for an unregistered name, or
    /// [`HarnessError::ResolverSealed`] as for [`LayeredResolver::add_roots`].
    pub fn add_logical_lib(&self, name: &str, catalog: &LibraryCatalog) -> HarnessResult<()> {
        let roots = catalog.resolve(name)?.to_vec();
        debug!("Attaching logical library '{}' to resolver '{}'", name, self.label);
        self.add_roots(roots)
    }

    /// Route class names starting with `prefix` to the platform's system tier.
    ///
    /// Applies to this level only; descendants reach it through normal
    /// parent-first delegation.
    ///
    /// # Errors
    ///
    /// [`HarnessError::ResolverSealed`] once this level has answered a lookup.
    pub fn allow_system_prefix(&self, prefix: impl Into<String>) -> HarnessResult<()> {
        let prefix = prefix.into();
        self.configure("allow a system prefix", |config| config.system_prefixes.push(prefix))
    }

    /// Route class names starting with `prefix` to `resolver`.
    ///
    /// When several registered prefixes match, the first one registered wins.
    ///
    /// # Errors
    ///
    /// - [`HarnessError::InvalidHierarchy`] if this level is reachable from
    ///   `resolver` through parents or explicit routes, which would make
    ///   delegation cyclic
    /// - [`HarnessError::ResolverSealed`] once this level has answered a lookup
    pub fn use_explicit_resolver(&self, prefix: impl Into<String>, resolver: Arc<Self>) -> HarnessResult<()> {
        if resolver.reaches(self.id) {
            return Err(HarnessError::InvalidHierarchy {
                reason: format!(
                    "resolver '{}' is reachable from '{}', so delegating to it would loop",
                    self.label, resolver.label
                ),
            });
        }
        let prefix = prefix.into();
        self.configure("add an explicit resolver", |config| config.explicit.push((prefix, resolver)))
    }

    /// Choose between parent-first (default) and child-first delegation.
    ///
    /// # Errors
    ///
    /// [`HarnessError::ResolverSealed`] once this level has answered a lookup.
    pub fn set_parent_first(&self, parent_first: bool) -> HarnessResult<()> {
        self.configure("change delegation order", |config| config.parent_first = parent_first)
    }

    /// Resolve a class by name.
    ///
    /// # Errors
    ///
    /// [`HarnessError::ClassNotFound`] if no tier can supply it.
    pub fn find_class(&self, name: &str) -> HarnessResult<ClassHandle> {
        engine::find_class(self, name)
    }

    /// Locate the first resource named `name` in delegation order.
    #[must_use]
    pub fn find_resource(&self, name: &str) -> Option<ResourceLocator> {
        engine::find_resource(self, name)
    }

    /// Locate every resource named `name`, ancestors' before this level's.
    #[must_use]
    pub fn find_all_resources(&self, name: &str) -> Vec<ResourceLocator> {
        engine::find_all_resources(self, name)
    }

    /// Open the resource [`LayeredResolver::find_resource`] would return.
    ///
    /// # Errors
    ///
    /// [`HarnessError::ResourceUnreadable`] if the resource is found but
    /// cannot be read. A missing resource is `Ok(None)`.
    pub fn open_resource_stream(&self, name: &str) -> HarnessResult<Option<ResourceStream>> {
        self.find_resource(name).map(|locator| locator.open()).transpose()
    }

    /// Process-unique identity.
    #[must_use]
    pub const fn id(&self) -> ResolverId {
        self.id
    }

    /// Human-readable label.
    #[must_use]
    pub fn label(&self) -> &str {
        &self.label
    }

    /// Parent level; `None` for the root-most level.
    #[must_use]
    pub const fn parent(&self) -> Option<&Arc<Self>> {
        self.parent.as_ref()
    }

    /// The platform this level's chain ends in.
    #[must_use]
    pub fn platform(&self) -> &Arc<dyn PlatformResolver> {
        &self.platform
    }

    /// Whether this level has answered a lookup.
    #[must_use]
    pub fn is_sealed(&self) -> bool {
        self.sealed.get().is_some()
    }

    /// Current delegation order.
    #[must_use]
    pub fn is_parent_first(&self) -> bool {
        self.with_current(|config| config.parent_first)
    }

    /// This level's own roots, in registration order.
    #[must_use]
    pub fn roots(&self) -> Vec<RootLocation> {
        self.with_current(|config| config.roots.clone())
    }

    /// Prefixes routed to the system tier.
    #[must_use]
    pub fn system_prefixes(&self) -> Vec<String> {
        self.with_current(|config| config.system_prefixes.clone())
    }

    /// Whether this level is a strict ancestor of `other`.
    #[must_use]
    pub fn is_ancestor_of(&self, other: &Self) -> bool {
        let mut current = other.parent.as_deref();
        while let Some(level) = current {
            if level.id == self.id {
                return true;
            }
            current = level.parent.as_deref();
        }
        false
    }

    /// Number of levels above this one.
    #[must_use]
    pub fn depth(&self) -> usize {
        std::iter::successors(self.parent.as_deref(), |level| level.parent.as_deref()).count()
    }

    /// Whether `target` is this level or can be reached from it by following
    /// parents and explicit routes.
    fn reaches(self: &Arc<Self>, target: ResolverId) -> bool {
        let mut visited = HashSet::new();
        let mut pending = vec![Arc::clone(self)];
        while let Some(level) = pending.pop() {
            if level.id == target {
                return true;
            }
            if !visited.insert(level.id) {
                continue;
            }
            pending.extend(level.parent.iter().cloned());
            pending.extend(level.with_current(|config| {
                config.explicit.iter().map(|(_, routed)| Arc::clone(routed)).collect::<Vec<_>>()
            }));
        }
        false
    }

    /// The sealed configuration; seals on first use.
    pub(crate) fn config(&self) -> &LevelConfig {
        self.sealed.get_or_init(|| {
            let mut pending = self.lock_pending();
            pending.sealed = true;
            debug!("Sealed resolver '{}' with {} root(s)", self.label, pending.config.roots.len());
            std::mem::take(&mut pending.config)
        })
    }

    fn configure(&self, operation: &str, apply: impl FnOnce(&mut LevelConfig)) -> HarnessResult<()> {
        let mut pending = self.lock_pending();
        if pending.sealed {
            return Err(HarnessError::ResolverSealed {
                resolver: self.label.clone(),
                operation: operation.to_string(),
            });
        }
        apply(&mut pending.config);
        Ok(())
    }

    fn with_current<T>(&self, read: impl FnOnce(&LevelConfig) -> T) -> T {
        if let Some(config) = self.sealed.get() {
            return read(config);
        }
        let pending = self.lock_pending();
        if pending.sealed {
            // Sealing finished between the two checks.
            drop(pending);
            return read(self.config());
        }
        read(&pending.config)
    }

    fn lock_pending(&self) -> MutexGuard<'_, PendingConfig> {
        self.pending.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl fmt::Debug for LayeredResolver {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LayeredResolver")
            .field("id", &self.id)
            .field("label", &self.label)
            .field("parent", &self.parent.as_ref().map(|p| p.label.as_str()))
            .field("sealed", &self.is_sealed())
            .finish_non_exhaustive()
    }
}
