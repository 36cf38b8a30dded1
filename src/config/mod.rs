//! Configuration loading for the harness.
//!
//! - [`parse_config`] is the generic TOML reader
//! - [`HarnessConfig`] describes the catalog, platform, and hierarchy and
//!   knows where to look for its file

mod harness;
mod parser;

pub use harness::{HarnessConfig, PlatformConfig};
pub use parser::parse_config;
