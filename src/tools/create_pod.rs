//! `create_pod` tool

use rmcp::model::CallToolResult;
use serde::Serialize;

use super::schema::PodRequest;
use super::{ToolContext, ToolError, json_result};
use crate::config::templates;
use crate::k8s::ResourceKind;
use crate::k8s::resources;

pub const NAME: &str = "create_pod";

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct PodCreated {
    pod_name: String,
    status: &'static str,
}

/// Create a Pod from a registry template, optionally overriding its command
pub async fn create_pod(context: &ToolContext, request: PodRequest) -> Result<CallToolResult, ToolError> {
    let template = templates::resolve(&request.template)
        .ok_or_else(|| ToolError::invalid_template(&request.template))?;

    let container = resources::effective_container(template, request.command.as_deref());
    let pod = resources::build_pod(&request.name, &request.namespace, container);

    tracing::info!(
        name = %request.name,
        namespace = %request.namespace,
        template = %request.template,
        command_override = request.command.is_some(),
        "Creating pod"
    );

    let created = context
        .api()
        .create_namespaced_pod(&request.namespace, &pod)
        .await
        .map_err(|err| {
            tracing::error!(
                status = ?err.status,
                message = %err.message,
                details = %err.details.clone().unwrap_or_default(),
                "Pod creation error"
            );
            ToolError::Upstream(err)
        })?;

    context
        .tracker()
        .track_resource(ResourceKind::Pod, &request.name, &request.namespace);

    let pod_name = created.metadata.name.unwrap_or_else(|| {
        crate::log_warn!("Server response has no pod name, reporting {}", request.name);
        request.name.clone()
    });

    json_result(&PodCreated {
        pod_name,
        status: "created",
    })
}
