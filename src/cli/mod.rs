//! Command-line interface for the `pathable` binary.
//!
//! The CLI loads a harness configuration, builds its hierarchy, and answers
//! lookups from one level of it.
//!
//! # Available Commands
//!
//! - `libs` - List logical libraries and hierarchy levels
//! - `find-class` - Resolve a class and report which tier defined it
//! - `find-resource` - Locate the first resource with a name
//! - `find-all` - Locate every resource with a name, ancestors first
//! - `cat` - Print a resource's content
//!
//! # Global Options
//!
//! - `--config <FILE>` - Configuration file (otherwise `PATHABLE_CONFIG`,
//!   `./pathable.toml`, `~/.pathable/config.toml`)
//! - `--verbose` - Enable debug output
//! - `--quiet` - Suppress all logging
//!
//! # Example
//!
//! ```bash
//! pathable libs
//! pathable find-class org.apache.commons.logging.impl.Log4J12Logger --level child
//! pathable find-all org/apache/commons/logging/impl/Log4J12Logger.class --format json
//! ```

mod libs;
mod lookup;

use crate::config::HarnessConfig;
use crate::core::HarnessResult;
use crate::resolver::LayeredResolver;
use crate::runner::Hierarchy;
use anyhow::Result;
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

/// Output format shared by every command.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    /// Human-readable text
    #[default]
    Text,
    /// Pretty-printed JSON on stdout
    Json,
}

/// Options selecting the level a lookup starts from.
#[derive(Args, Debug, Clone)]
pub struct LevelArgs {
    /// Label of the level to query (default: the hierarchy's context level)
    #[arg(long)]
    pub level: Option<String>,

    #[arg(long, value_enum, default_value = "text")]
    pub format: OutputFormat,
}

impl LevelArgs {
    fn select<'a>(&self, hierarchy: &'a Hierarchy) -> HarnessResult<&'a Arc<LayeredResolver>> {
        match &self.level {
            Some(label) => hierarchy.level(label),
            None => Ok(hierarchy.context_resolver()),
        }
    }
}

#[derive(Parser, Debug)]
#[command(
    name = "pathable",
    about = "Inspect layered class and resource resolution",
    version,
    long_about = "Builds the resolver hierarchy described by a pathable.toml file and answers class and resource lookups from any of its levels."
)]
pub struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable debug logging
    #[arg(short, long, global = true, conflicts_with = "quiet")]
    verbose: bool,

    /// Disable logging
    #[arg(short, long, global = true)]
    quiet: bool,

    /// Path to the harness configuration file
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// List logical libraries and hierarchy levels
    Libs(libs::LibsCommand),

    /// Resolve a class by fully qualified name
    FindClass(lookup::FindClassCommand),

    /// Locate the first resource with a name
    FindResource(lookup::FindResourceCommand),

    /// Locate every resource with a name
    FindAll(lookup::FindAllCommand),

    /// Print a resource's content to stdout
    Cat(lookup::CatCommand),
}

impl Cli {
    /// Set up logging, load the configuration, and run the command.
    ///
    /// # Errors
    ///
    /// Configuration, hierarchy, and lookup errors are returned for the
    /// caller to render.
    pub fn execute(self) -> Result<()> {
        init_logging(self.log_filter());
        let config = HarnessConfig::load_default(self.config.as_deref())?;

        match self.command {
            Commands::Libs(cmd) => cmd.execute(&config),
            Commands::FindClass(cmd) => cmd.execute(&config),
            Commands::FindResource(cmd) => cmd.execute(&config),
            Commands::FindAll(cmd) => cmd.execute(&config),
            Commands::Cat(cmd) => cmd.execute(&config),
        }
    }

    /// Log filter implied by the global flags; `None` turns logging off.
    #[must_use]
    pub fn log_filter(&self) -> Option<&'static str> {
        if self.quiet {
            None
        } else if self.verbose {
            Some("debug")
        } else {
            Some("info")
        }
    }
}

/// Install the stderr subscriber. `RUST_LOG` overrides `default_filter`.
pub fn init_logging(default_filter: Option<&str>) {
    let Some(default_filter) = default_filter else {
        return;
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .without_time()
        .try_init();
}
