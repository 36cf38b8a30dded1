//! Generic configuration parsing utilities.
//!
//! Reads a TOML file into any [`serde::de::DeserializeOwned`] type and
//! attaches the file path to every failure.
//!
//! Example error output:
//! ```text
//! Failed to parse config file: /path/to/pathable.toml
//! Caused by:
//!     invalid type: string "lib", expected a sequence
//! ```

use anyhow::{Context, Result};
use std::path::Path;

/// Parse a TOML configuration file into the specified type.
///
/// # Examples
///
/// ```rust,no_run
/// use pathable_harness::config::parse_config;
/// use serde::Deserialize;
/// use std::path::Path;
///
/// #[derive(Deserialize)]
/// struct Config {
///     name: String,
/// }
///
/// # fn example() -> anyhow::Result<()> {
/// let config: Config = parse_config(Path::new("pathable.toml"))?;
/// println!("Loaded {}", config.name);
/// # Ok(())
/// # }
/// ```
///
/// # Errors
///
/// Returns an error if the file cannot be read, is not valid TOML, or does
/// not match the shape of `T`. The underlying I/O or TOML error is kept as the
/// cause.
pub fn parse_config<T>(path: &Path) -> Result<T>
where
    T: serde::de::DeserializeOwned,
{
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {}", path.display()))?;

    let config: T = toml::from_str(&content)
        .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

    Ok(config)
}
