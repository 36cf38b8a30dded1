//! Layered resolvers and the delegation engine.
//!
//! A hierarchy is a tree of [`LayeredResolver`] levels. Each level owns an
//! ordered list of roots and a parent; the root-most level's parent is the
//! platform's bootstrap tier. Lookups walk the chain according to each
//! level's delegation order and report which tier answered through
//! [`Origin`].
//!
//! # Components
//!
//! - [`LayeredResolver`] holds one level's configuration and exposes the
//!   lookup operations
//! - the engine implements parent-first and child-first delegation, system
//!   prefix passthrough and explicit-resolver routing
//! - [`PlatformResolver`] is the seam to the bootstrap and system tiers, with
//!   [`SystemPlatform`] as the configurable implementation
//!
//! # Example
//!
//! ```rust,no_run
//! use pathable_harness::resolver::{LayeredResolver, Origin, SystemPlatform};
//! use std::sync::Arc;
//!
//! # fn example() -> anyhow::Result<()> {
//! let platform = Arc::new(SystemPlatform::new().with_bootstrap_prefix("java."));
//! let root = LayeredResolver::root("root", platform);
//! let child = LayeredResolver::child("child", &root);
//!
//! let string = child.find_class("java.lang.String")?;
//! assert_eq!(string.origin(), Origin::Bootstrap);
//! # Ok(())
//! # }
//! ```

mod engine;
mod layered;
mod platform;
mod types;

pub use layered::LayeredResolver;
pub use platform::{PlatformResolver, SystemPlatform};
pub use types::{ClassHandle, Origin, ResolverId};
