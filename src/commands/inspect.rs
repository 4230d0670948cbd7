//! Read-only commands describing the tools, templates and config

use anyhow::{Context, Result};
use colored::Colorize;

use crate::config::{Settings, templates};
use crate::tools;

/// Print every tool definition as JSON
pub fn show_tools() -> Result<()> {
    let tools = tools::list_tools();
    let json = serde_json::to_string_pretty(&tools).context("Failed to serialize tool definitions")?;
    println!("{}", json);
    Ok(())
}

/// List the registered templates and their images
pub fn show_templates(verbose: bool) -> Result<()> {
    for (name, container) in templates::list() {
        let image = container.image.as_deref().unwrap_or("<none>");
        println!("  {}: {}", name.bold(), image);

        if let Some(command) = &container.command {
            println!("      command: {}", command.join(" "));
        }
        if let Some(args) = &container.args {
            println!("      args:    {}", args.join(" "));
        }
        if verbose {
            let yaml = serde_yaml::to_string(container)
                .with_context(|| format!("Failed to render template {}", name))?;
            for line in yaml.lines() {
                println!("      {}", line.dimmed());
            }
        }
    }
    Ok(())
}

/// Print an example configuration file
pub fn show_config_example() -> Result<()> {
    println!("{}", Settings::example_config()?);
    Ok(())
}
