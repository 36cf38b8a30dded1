//! Identity and origin types carried by every lookup result.

use crate::root::ResourceLocator;
use serde::Serialize;
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

static NEXT_RESOLVER_ID: AtomicU64 = AtomicU64::new(1);

/// Process-unique identity of a [`LayeredResolver`](super::LayeredResolver).
///
/// Two resolvers built from identical configuration still have different
/// ids; equality of ids is equality of resolver instances.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct ResolverId(u64);

impl ResolverId {
    pub(crate) fn next() -> Self {
        Self(NEXT_RESOLVER_ID.fetch_add(1, Ordering::Relaxed))
    }
}

impl fmt::Display for ResolverId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// The tier that actually answered a lookup.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(tag = "tier", content = "resolver", rename_all = "lowercase")]
pub enum Origin {
    /// The platform's bootstrap tier (ownerless names)
    Bootstrap,
    /// The platform's system tier (prefix passthrough)
    System,
    /// A hierarchy level
    Level(ResolverId),
}

impl Origin {
    /// Whether a platform tier, rather than a hierarchy level, answered.
    #[must_use]
    pub const fn is_platform(&self) -> bool {
        matches!(self, Self::Bootstrap | Self::System)
    }
}

impl fmt::Display for Origin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Bootstrap => f.write_str("bootstrap"),
            Self::System => f.write_str("system"),
            Self::Level(id) => write!(f, "level {id}"),
        }
    }
}

/// A successfully resolved class.
///
/// The handle records which tier defined the class and, when the class came
/// from a root, where its entry lives.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct ClassHandle {
    name: String,
    origin: Origin,
    defined_by: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    locator: Option<ResourceLocator>,
}

impl ClassHandle {
    /// A class supplied by the platform's bootstrap tier.
    #[must_use]
    pub fn bootstrap(name: &str, locator: Option<ResourceLocator>) -> Self {
        Self {
            name: name.to_string(),
            origin: Origin::Bootstrap,
            defined_by: "bootstrap".to_string(),
            locator,
        }
    }

    /// A class supplied by the platform's system tier.
    #[must_use]
    pub fn system(name: &str, locator: Option<ResourceLocator>) -> Self {
        Self {
            name: name.to_string(),
            origin: Origin::System,
            defined_by: "system".to_string(),
            locator,
        }
    }

    pub(crate) fn level(name: &str, id: ResolverId, label: &str, locator: ResourceLocator) -> Self {
        Self {
            name: name.to_string(),
            origin: Origin::Level(id),
            defined_by: label.to_string(),
            locator: Some(locator),
        }
    }

    /// Fully qualified class name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Which tier answered.
    #[must_use]
    pub const fn origin(&self) -> Origin {
        self.origin
    }

    /// Label of the tier that answered (`bootstrap`, `system`, or a level label).
    #[must_use]
    pub fn defined_by(&self) -> &str {
        &self.defined_by
    }

    /// Where the defining entry lives, if the class came from a root.
    #[must_use]
    pub const fn locator(&self) -> Option<&ResourceLocator> {
        self.locator.as_ref()
    }

    /// Whether `resolver` is the level that defined this class.
    #[must_use]
    pub fn is_defined_by(&self, resolver: &super::LayeredResolver) -> bool {
        self.origin == Origin::Level(resolver.id())
    }
}

impl fmt::Display for ClassHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} (defined by {})", self.name, self.defined_by)
    }
}
