//! The platform boundary above the root-most hierarchy level.
//!
//! Two tiers sit outside every hierarchy:
//!
//! - **bootstrap** answers names with no declared owner and is the implicit
//!   parent of the root-most level
//! - **system** answers names a level explicitly passes through with
//!   [`LayeredResolver::allow_system_prefix`](super::LayeredResolver::allow_system_prefix);
//!   it consults bootstrap first
//!
//! [`PlatformResolver`] is the injectable seam; [`SystemPlatform`] is the
//! configurable implementation used by the CLI and the integration tests.

use super::types::ClassHandle;
use crate::constants::class_entry_name;
use crate::root::{ResourceLocator, RootLocation};
use std::fmt;

/// Capability answering lookups that leave the hierarchy.
pub trait PlatformResolver: Send + Sync + fmt::Debug {
    /// Class from the bootstrap tier, if it owns `name`.
    fn bootstrap_class(&self, name: &str) -> Option<ClassHandle>;

    /// First bootstrap resource named `name`.
    fn bootstrap_resource(&self, name: &str) -> Option<ResourceLocator>;

    /// Every bootstrap resource named `name`, in bootstrap order.
    fn bootstrap_resources(&self, name: &str) -> Vec<ResourceLocator> {
        self.bootstrap_resource(name).into_iter().collect()
    }

    /// Class from the system tier for a prefix passthrough.
    fn system_class(&self, name: &str) -> Option<ClassHandle>;
}

/// A platform described by prefixes and roots.
///
/// # Example
///
/// ```rust,no_run
/// use pathable_harness::resolver::{PlatformResolver, SystemPlatform};
/// use pathable_harness::root::RootLocation;
/// use std::path::Path;
///
/// # fn example() -> anyhow::Result<()> {
/// let platform = SystemPlatform::new()
///     .with_bootstrap_prefix("java.")
///     .with_system_roots(vec![RootLocation::open(Path::new("lib/junit-3.8.1.jar"))?]);
///
/// assert!(platform.bootstrap_class("java.lang.String").is_some());
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone, Default)]
pub struct SystemPlatform {
    bootstrap_prefixes: Vec<String>,
    bootstrap_roots: Vec<RootLocation>,
    system_roots: Vec<RootLocation>,
}

impl SystemPlatform {
    /// A platform that owns nothing.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Names starting with `prefix` are ownerless and answered by bootstrap
    /// without a root entry.
    #[must_use]
    pub fn with_bootstrap_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.bootstrap_prefixes.push(prefix.into());
        self
    }

    /// Roots searched by the bootstrap tier.
    #[must_use]
    pub fn with_bootstrap_roots(mut self, roots: Vec<RootLocation>) -> Self {
        self.bootstrap_roots.extend(roots);
        self
    }

    /// Roots searched by the system tier after bootstrap.
    #[must_use]
    pub fn with_system_roots(mut self, roots: Vec<RootLocation>) -> Self {
        self.system_roots.extend(roots);
        self
    }

    /// Configured ownerless prefixes.
    #[must_use]
    pub fn bootstrap_prefixes(&self) -> &[String] {
        &self.bootstrap_prefixes
    }

    /// Roots of the system tier.
    #[must_use]
    pub fn system_roots(&self) -> &[RootLocation] {
        &self.system_roots
    }
}

impl PlatformResolver for SystemPlatform {
    fn bootstrap_class(&self, name: &str) -> Option<ClassHandle> {
        if self.bootstrap_prefixes.iter().any(|p| name.starts_with(p.as_str())) {
            return Some(ClassHandle::bootstrap(name, None));
        }
        let entry = class_entry_name(name);
        self.bootstrap_roots
            .iter()
            .find_map(|root| root.locate(&entry))
            .map(|locator| ClassHandle::bootstrap(name, Some(locator)))
    }

    fn bootstrap_resource(&self, name: &str) -> Option<ResourceLocator> {
        self.bootstrap_roots.iter().find_map(|root| root.locate(name))
    }

    fn bootstrap_resources(&self, name: &str) -> Vec<ResourceLocator> {
        self.bootstrap_roots
            .iter()
            .filter_map(|root| root.locate(name))
            .collect()
    }

    fn system_class(&self, name: &str) -> Option<ClassHandle> {
        self.bootstrap_class(name).or_else(|| {
            let entry = class_entry_name(name);
            self.system_roots
                .iter()
                .find_map(|root| root.locate(&entry))
                .map(|locator| ClassHandle::system(name, Some(locator)))
        })
    }
}
