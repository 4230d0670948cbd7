//! `create_deployment` tool

use rmcp::model::CallToolResult;
use serde::Serialize;

use super::schema::DeploymentRequest;
use super::{ToolContext, ToolError, json_result};
use crate::config::templates;
use crate::k8s::ResourceKind;
use crate::k8s::resources::{self, DEFAULT_REPLICAS};

pub const NAME: &str = "create_deployment";

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct DeploymentCreated {
    deployment_name: String,
    status: &'static str,
}

/// Create a Deployment from a registry template
pub async fn create_deployment(
    context: &ToolContext,
    request: DeploymentRequest,
) -> Result<CallToolResult, ToolError> {
    let template = templates::resolve(&request.template)
        .ok_or_else(|| ToolError::invalid_template(&request.template))?;

    let replicas = request.replicas.unwrap_or(DEFAULT_REPLICAS);
    if replicas < 0 {
        return Err(ToolError::InvalidRequest(format!(
            "replicas must not be negative, got {}",
            replicas
        )));
    }

    let deployment =
        resources::build_deployment(&request.name, &request.namespace, replicas, template);

    tracing::info!(
        name = %request.name,
        namespace = %request.namespace,
        template = %request.template,
        replicas,
        "Creating deployment"
    );

    let created = context
        .api()
        .create_namespaced_deployment(&request.namespace, &deployment)
        .await
        .map_err(|err| {
            tracing::error!(
                status = ?err.status,
                message = %err.message,
                details = %err.details.clone().unwrap_or_default(),
                "Deployment creation error"
            );
            ToolError::Upstream(err)
        })?;

    context
        .tracker()
        .track_resource(ResourceKind::Deployment, &request.name, &request.namespace);

    let deployment_name = created.metadata.name.unwrap_or_else(|| {
        crate::log_warn!("Server response has no deployment name, reporting {}", request.name);
        request.name.clone()
    });

    json_result(&DeploymentCreated {
        deployment_name,
        status: "created",
    })
}
