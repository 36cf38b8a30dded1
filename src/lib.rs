//! pathable-harness - layered, path-composable class and resource resolution
//!
//! A test harness for code that discovers its implementation at runtime
//! through a hierarchy of resolvers. Each test declares the exact resolver
//! chain it runs under, which libraries each level sees, and which level acts
//! as the ambient "context" resolver, then runs with that context installed
//! and restored afterwards.
//!
//! # Architecture Overview
//!
//! - A [`catalog::LibraryCatalog`] maps logical library names to ordered
//!   roots (zip archives or directories)
//! - [`resolver::LayeredResolver`] levels are chained through shared parents;
//!   lookups are parent-first by default and report the level that answered
//! - The [`context`] module holds the thread's ambient resolver
//! - The [`runner`] builds a hierarchy from a declarative spec, loads an entry
//!   type through it, and runs the entry's test methods inside a context scope
//!
//! # Core Modules
//!
//! - [`catalog`] - Logical libraries and discovery on search paths
//! - [`root`] - Archive and directory roots, resource locators and streams
//! - [`resolver`] - Layered resolvers, delegation, and the platform tiers
//! - [`context`] - Thread-local ambient resolver and properties
//! - [`runner`] - Hierarchy specs, fixtures, context-scoped suites, reports
//! - [`config`] - `pathable.toml` loading
//! - [`core`] - Error types and user-facing error rendering
//! - [`cli`] - The `pathable` command-line interface
//!
//! # Example
//!
//! ```rust,no_run
//! use pathable_harness::catalog::LibraryCatalog;
//! use pathable_harness::resolver::{LayeredResolver, SystemPlatform};
//! use std::sync::Arc;
//!
//! # fn example() -> anyhow::Result<()> {
//! let mut catalog = LibraryCatalog::new();
//! catalog.register_paths("logging-api", &["lib/commons-logging-1.1.jar"])?;
//! catalog.register_paths("logging-adapters", &["lib/commons-logging-adapters-1.1.jar"])?;
//!
//! let parent = LayeredResolver::root("parent", Arc::new(SystemPlatform::new()));
//! parent.add_logical_lib("logging-api", &catalog)?;
//! let child = LayeredResolver::child("child", &parent);
//! child.add_logical_lib("logging-adapters", &catalog)?;
//!
//! // Present in both jars: parent-first delegation means the parent wins.
//! let logger = child.find_class("org.apache.commons.logging.impl.Log4J12Logger")?;
//! assert!(logger.is_defined_by(&parent));
//!
//! // Multi-resource lookup lists the ancestor's copy first.
//! let copies = child.find_all_resources("org/apache/commons/logging/impl/Log4J12Logger.class");
//! assert_eq!(copies.len(), 2);
//! # Ok(())
//! # }
//! ```

pub mod catalog;
pub mod cli;
pub mod config;
pub mod constants;
pub mod context;
pub mod core;
pub mod resolver;
pub mod root;
pub mod runner;

#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;
