//! Configuration file support for kube-mcp-tools

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

const LOCAL_CONFIG_FILE: &str = ".kube-mcp-tools.toml";
const CONFIG_DIR_NAME: &str = "kube-mcp-tools";

/// Main configuration structure
#[derive(Debug, Deserialize, Serialize, Clone, Default)]
pub struct Settings {
    #[serde(default)]
    pub defaults: Defaults,

    #[serde(default)]
    pub kube: KubeSettings,

    #[serde(default)]
    pub behavior: Behavior,
}

/// Default values for tool arguments the CLI may omit
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct Defaults {
    #[serde(default = "default_namespace")]
    pub namespace: String,
}

/// Cluster connection settings
#[derive(Debug, Deserialize, Serialize, Clone, Default)]
pub struct KubeSettings {
    /// Path to a kubeconfig file. Falls back to the inferred config
    /// (KUBECONFIG, ~/.kube/config, in-cluster) when unset.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub kubeconfig: Option<String>,

    /// Kubeconfig context to use instead of the current one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub context: Option<String>,
}

/// Behavior settings
#[derive(Debug, Deserialize, Serialize, Clone, Default)]
pub struct Behavior {
    #[serde(default)]
    pub dry_run: bool,
}

fn default_namespace() -> String {
    "default".to_string()
}

impl Default for Defaults {
    fn default() -> Self {
        Self {
            namespace: default_namespace(),
        }
    }
}

impl Settings {
    /// Load settings from an explicit file, or from the standard locations.
    ///
    /// An explicit path must exist and parse. Files found in the standard
    /// locations fall back to defaults when unreadable.
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        if let Some(path) = explicit {
            return Self::load_from_file(path);
        }

        match Self::find_config_file() {
            Some(path) => Ok(Self::load_from_file(&path).unwrap_or_else(|err| {
                crate::log_warn!("Ignoring config file {}: {:#}", path.display(), err);
                Self::default()
            })),
            None => Ok(Self::default()),
        }
    }

    /// Load settings from a specific file
    pub fn load_from_file(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let settings: Settings = toml::from_str(&contents)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        Ok(settings)
    }

    /// Find config file in standard locations
    /// Priority:
    /// 1. .kube-mcp-tools.toml in current directory
    /// 2. ~/.config/kube-mcp-tools/config.toml (XDG config directory)
    fn find_config_file() -> Option<PathBuf> {
        let local_config = PathBuf::from(LOCAL_CONFIG_FILE);
        if local_config.exists() {
            return Some(local_config);
        }

        if let Some(config_dir) = dirs::config_dir() {
            let xdg_config = config_dir.join(CONFIG_DIR_NAME).join("config.toml");
            if xdg_config.exists() {
                return Some(xdg_config);
            }
        }

        None
    }

    /// Generate example config file content
    pub fn example_config() -> Result<String> {
        let header = "# kube-mcp-tools configuration file\n\
                      # Place this file at ~/.config/kube-mcp-tools/config.toml or .kube-mcp-tools.toml in your project\n\
                      #\n\
                      # [kube]\n\
                      # kubeconfig = \"/path/to/kubeconfig\"\n\
                      # context = \"kind-dev\"\n\n";

        let body = toml::to_string_pretty(&Settings::default())
            .context("Failed to serialize settings")?;

        Ok(format!("{}{}", header, body))
    }
}
