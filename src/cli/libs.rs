//! The `libs` command.

use super::OutputFormat;
use crate::config::HarnessConfig;
use anyhow::Result;
use clap::Args;
use colored::Colorize;
use serde_json::json;

#[derive(Args, Debug)]
pub struct LibsCommand {
    #[arg(long, value_enum, default_value = "text")]
    pub format: OutputFormat,
}

impl LibsCommand {
    pub fn execute(self, config: &HarnessConfig) -> Result<()> {
        let catalog = config.build_catalog()?;
        let spec = config.hierarchy_spec(&catalog);
        spec.validate()?;

        match self.format {
            OutputFormat::Json => {
                let libraries: Vec<serde_json::Value> = catalog
                    .libraries()
                    .map(|library| {
                        json!({
                            "name": library.name(),
                            "roots": library
                                .roots()
                                .iter()
                                .map(|root| json!({ "path": root.path(), "kind": root.kind() }))
                                .collect::<Vec<_>>(),
                        })
                    })
                    .collect();
                let value = json!({
                    "libraries": libraries,
                    "levels": spec.levels,
                    "entry_level": spec.entry_label(),
                    "context_level": spec.context_label(),
                });
                println!("{}", serde_json::to_string_pretty(&value)?);
            }
            OutputFormat::Text => {
                println!("{}", "Libraries:".bold());
                for library in catalog.libraries() {
                    println!("  {}", library.name().cyan());
                    for root in library.roots() {
                        println!("    {root}");
                    }
                }

                println!("{}", "Levels (root first):".bold());
                for (depth, level) in spec.levels.iter().enumerate() {
                    let order = if level.parent_first { "parent-first" } else { "child-first" };
                    println!(
                        "  {}{} [{}] {}",
                        "  ".repeat(depth),
                        level.label.green(),
                        order,
                        level.libraries.join(", ")
                    );
                    if !level.system_prefixes.is_empty() {
                        println!(
                            "  {}  system: {}",
                            "  ".repeat(depth),
                            level.system_prefixes.join(", ")
                        );
                    }
                }
            }
        }
        Ok(())
    }
}
