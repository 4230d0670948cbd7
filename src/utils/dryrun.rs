//! Dry-run mode utilities

use colored::Colorize;
use serde::Serialize;
use std::env;

/// Environment variable that forces dry-run mode
pub const DRY_RUN_ENV: &str = "KUBE_MCP_TOOLS_DRY_RUN";

/// Check if dry-run mode is enabled by flag, config, or environment
pub fn is_dry_run(requested: bool) -> bool {
    requested || env::var_os(DRY_RUN_ENV).is_some()
}

/// Log a dry-run action
pub fn log_action(action: &str) {
    println!("  {} {}", "[DRY RUN]".cyan().bold(), action);
}

/// Render a manifest the way `kubectl get -o yaml` would show it
pub fn render_manifest<T: Serialize>(object: &T) -> anyhow::Result<String> {
    Ok(serde_yaml::to_string(object)?)
}

/// Print the manifest that would have been submitted
pub fn log_manifest<T: Serialize>(action: &str, object: &T) -> anyhow::Result<()> {
    log_action(action);
    println!("{}", render_manifest(object)?);
    println!("{}", "No changes were made (--dry-run mode)".yellow());
    Ok(())
}
