//! Tool errors with actionable suggestions

use colored::Colorize;
use rmcp::model::ErrorCode;
use serde_json::Value;
use std::borrow::Cow;
use thiserror::Error;

use crate::config::templates;
use crate::k8s::UpstreamError;

#[derive(Error, Debug)]
pub enum ToolError {
    /// Template name not present in the registry
    #[error("Invalid template: {name}")]
    InvalidTemplate { name: String },

    /// Arguments failed schema validation
    #[error("{0}")]
    InvalidRequest(String),

    #[error("Unknown tool: {0}")]
    UnknownTool(String),

    /// Failure inside this crate, not caused by the caller
    #[error("{0}")]
    Internal(String),

    /// The cluster API call failed; carries the server's diagnostics unchanged
    #[error(transparent)]
    Upstream(#[from] UpstreamError),
}

impl ToolError {
    pub fn invalid_template(name: &str) -> Self {
        Self::InvalidTemplate {
            name: name.to_string(),
        }
    }

    pub fn code(&self) -> ErrorCode {
        match self {
            ToolError::InvalidTemplate { .. } | ToolError::InvalidRequest(_) => {
                ErrorCode::INVALID_REQUEST
            }
            ToolError::UnknownTool(_) => ErrorCode::METHOD_NOT_FOUND,
            ToolError::Internal(_) | ToolError::Upstream(_) => ErrorCode::INTERNAL_ERROR,
        }
    }

    /// Structured payload for error responses
    pub fn data(&self) -> Option<Value> {
        match self {
            ToolError::Upstream(err) => Some(err.diagnostics()),
            _ => None,
        }
    }

    pub fn suggestions(&self) -> Vec<String> {
        match self {
            ToolError::InvalidTemplate { .. } => vec![
                format!(
                    "Available templates: {}",
                    templates::template_names().join(", ")
                ),
                "List template details with: kube-mcp-tools templates".to_string(),
            ],
            ToolError::InvalidRequest(_) => {
                vec!["Show accepted arguments with: kube-mcp-tools tools".to_string()]
            }
            ToolError::UnknownTool(_) => {
                vec!["List available tools with: kube-mcp-tools tools".to_string()]
            }
            ToolError::Internal(_) => Vec::new(),
            ToolError::Upstream(err) => upstream_suggestions(err),
        }
    }

    /// Display the error with suggestions
    pub fn display(&self) {
        tracing::debug!(code = self.code().0, error = ?self, "Tool call failed");
        eprint!("{}", self.render());
    }

    fn render(&self) -> String {
        let mut out = format!("{} {}\n", "Error:".red().bold(), self);

        if let Some(status) = self.status() {
            out.push_str(&format!("  {} {}\n", "HTTP status:".dimmed(), status));
        }

        let suggestions = self.suggestions();
        if !suggestions.is_empty() {
            out.push_str(&format!("\n{}\n", "Suggestions:".yellow().bold()));
            for suggestion in &suggestions {
                out.push_str(&format!("  {} {}\n", "→".blue(), suggestion));
            }
        }
        out
    }

    fn status(&self) -> Option<u16> {
        match self {
            ToolError::Upstream(err) => err.status,
            _ => None,
        }
    }
}

impl From<ToolError> for rmcp::ErrorData {
    fn from(err: ToolError) -> Self {
        rmcp::ErrorData {
            code: err.code(),
            message: Cow::Owned(err.to_string()),
            data: err.data(),
        }
    }
}

fn upstream_suggestions(err: &UpstreamError) -> Vec<String> {
    match err.status {
        Some(409) => vec![
            "A resource with this name already exists in the namespace".to_string(),
            "Choose a different name or delete the existing resource".to_string(),
        ],
        Some(401) | Some(403) => vec![
            "Verify you have permission to create workloads in this namespace".to_string(),
            "Check with: kubectl auth can-i create deployments,pods -n <namespace>".to_string(),
        ],
        Some(404) => vec![
            "The namespace may not exist".to_string(),
            "Create it with: kubectl create namespace <namespace>".to_string(),
        ],
        Some(422) => vec![
            "The API server rejected the object".to_string(),
            "Names must be valid DNS-1123 labels (lowercase alphanumerics and '-')".to_string(),
        ],
        Some(_) => vec!["Run with -vv to see the full server response".to_string()],
        None => vec![
            "Verify the cluster is reachable: kubectl cluster-info".to_string(),
            "Check the [kube] section of your config file".to_string(),
        ],
    }
}
