//! Class and resource lookup commands.

use super::{LevelArgs, OutputFormat};
use crate::config::HarnessConfig;
use crate::root::ResourceLocator;
use anyhow::{Context, Result};
use clap::Args;
use colored::Colorize;
use serde_json::json;
use std::io::{self, Write};
use tracing::debug;

fn locator_json(locator: &ResourceLocator) -> serde_json::Value {
    json!({
        "locator": locator.to_string(),
        "root": locator.root(),
        "kind": locator.kind(),
        "entry": locator.entry(),
    })
}

#[derive(Args, Debug)]
pub struct FindClassCommand {
    /// Fully qualified class name, e.g. `org.apache.commons.logging.Log`
    pub name: String,

    #[command(flatten)]
    pub target: LevelArgs,
}

impl FindClassCommand {
    pub fn execute(self, config: &HarnessConfig) -> Result<()> {
        let (_, hierarchy) = config.build_hierarchy()?;
        let resolver = self.target.select(&hierarchy)?;
        let handle = resolver.find_class(&self.name)?;

        match self.target.format {
            OutputFormat::Json => {
                let value = json!({
                    "requested_from": resolver.label(),
                    "class": handle,
                });
                println!("{}", serde_json::to_string_pretty(&value)?);
            }
            OutputFormat::Text => {
                println!("{} defined by {}", handle.name().bold(), handle.defined_by().green());
                if let Some(locator) = handle.locator() {
                    println!("  {locator}");
                }
            }
        }
        Ok(())
    }
}

#[derive(Args, Debug)]
pub struct FindResourceCommand {
    /// `/`-separated resource name, e.g. `org/apache/commons/logging/Log.class`
    pub name: String,

    #[command(flatten)]
    pub target: LevelArgs,
}

impl FindResourceCommand {
    /// A missing resource is reported, not treated as an error.
    pub fn execute(self, config: &HarnessConfig) -> Result<()> {
        let (_, hierarchy) = config.build_hierarchy()?;
        let resolver = self.target.select(&hierarchy)?;
        let found = resolver.find_resource(&self.name);

        match (self.target.format, found) {
            (OutputFormat::Json, found) => {
                let value = found.as_ref().map_or(serde_json::Value::Null, locator_json);
                println!("{}", serde_json::to_string_pretty(&value)?);
            }
            (OutputFormat::Text, Some(locator)) => println!("{locator}"),
            (OutputFormat::Text, None) => println!(
                "{} Resource '{}' is not visible from level '{}'",
                "-".yellow(),
                self.name,
                resolver.label()
            ),
        }
        Ok(())
    }
}

#[derive(Args, Debug)]
pub struct FindAllCommand {
    /// `/`-separated resource name
    pub name: String,

    #[command(flatten)]
    pub target: LevelArgs,
}

impl FindAllCommand {
    pub fn execute(self, config: &HarnessConfig) -> Result<()> {
        let (_, hierarchy) = config.build_hierarchy()?;
        let resolver = self.target.select(&hierarchy)?;
        let all = resolver.find_all_resources(&self.name);

        match self.target.format {
            OutputFormat::Json => {
                let values: Vec<serde_json::Value> = all.iter().map(locator_json).collect();
                println!("{}", serde_json::to_string_pretty(&values)?);
            }
            OutputFormat::Text => {
                for locator in &all {
                    println!("{locator}");
                }
                println!(
                    "{} match(es) for '{}' from level '{}'",
                    all.len(),
                    self.name,
                    resolver.label()
                );
            }
        }
        Ok(())
    }
}

#[derive(Args, Debug)]
pub struct CatCommand {
    /// `/`-separated resource name
    pub name: String,

    /// Label of the level to query (default: the hierarchy's context level)
    #[arg(long)]
    pub level: Option<String>,
}

impl CatCommand {
    pub fn execute(self, config: &HarnessConfig) -> Result<()> {
        let (_, hierarchy) = config.build_hierarchy()?;
        let resolver = match &self.level {
            Some(label) => hierarchy.level(label)?,
            None => hierarchy.context_resolver(),
        };

        let Some(mut stream) = resolver.open_resource_stream(&self.name)? else {
            anyhow::bail!(
                "Resource '{}' is not visible from level '{}'",
                self.name,
                resolver.label()
            );
        };
        debug!("Streaming '{}' from level '{}'", self.name, resolver.label());

        let mut stdout = io::stdout().lock();
        io::copy(&mut stream, &mut stdout)
            .with_context(|| format!("Failed to copy resource '{}' to stdout", self.name))?;
        stdout.flush()?;
        Ok(())
    }
}
