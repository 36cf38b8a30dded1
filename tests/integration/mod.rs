//! Integration test suite for pathable-harness
//!
//! End-to-end tests that build real archive and directory layouts in a
//! temporary directory and exercise the library and the `pathable` binary.
//!
//! # Running Integration Tests
//!
//! ```bash
//! cargo test --test integration
//! ```
//!
//! # Test Organization
//!
//! - **resolution**: Delegation order, origins, and multi-resource listing
//!   across real hierarchies
//! - **pathable_suite**: Context-scoped suites over parent-first and
//!   child-first hierarchies
//! - **context_isolation**: Ambient context restoration across failures,
//!   panics, and threads
//! - **config_hierarchy**: Hierarchies built from `pathable.toml`
//! - **cli**: The `pathable` binary

mod cli;
mod config_hierarchy;
mod context_isolation;
mod pathable_suite;
mod resolution;
