//! Utility modules for kube-mcp-tools

pub mod dryrun;
pub mod logger;

// Re-export commonly used items
pub use logger::{log_info, log_warn};
