//! Tool handlers exposed to the agent-facing protocol layer
//!
//! Each tool validates its raw JSON arguments against its schema, builds a
//! Kubernetes object from a registry template, submits it once and records
//! it with the tracker after the cluster accepts it.

pub mod create_deployment;
pub mod create_pod;
pub mod error;
pub mod schema;

#[cfg(test)]
pub(crate) mod testing;

pub use create_deployment::create_deployment;
pub use create_pod::create_pod;
pub use error::ToolError;
pub use schema::{DeploymentRequest, PodRequest};

use rmcp::model::{CallToolResult, Content, Tool};
use serde::Serialize;
use serde_json::Value;
use std::sync::Arc;

use crate::k8s::{ResourceApi, ResourceTracker};

/// Collaborators shared by all tool invocations
#[derive(Clone)]
pub struct ToolContext {
    api: Arc<dyn ResourceApi>,
    tracker: Arc<dyn ResourceTracker>,
}

impl ToolContext {
    pub fn new(api: Arc<dyn ResourceApi>, tracker: Arc<dyn ResourceTracker>) -> Self {
        Self { api, tracker }
    }

    pub fn api(&self) -> &dyn ResourceApi {
        self.api.as_ref()
    }

    pub fn tracker(&self) -> &dyn ResourceTracker {
        self.tracker.as_ref()
    }
}

/// Wrap a payload as a successful result with one pretty-printed JSON text item
pub fn json_result<T: Serialize>(payload: &T) -> Result<CallToolResult, ToolError> {
    let text = serde_json::to_string_pretty(payload)
        .map_err(|err| ToolError::Internal(format!("Failed to serialize tool output: {}", err)))?;
    Ok(CallToolResult::success(vec![Content::text(text)]))
}

/// Text of the first content item
pub fn result_text(result: &CallToolResult) -> Option<&str> {
    result
        .content
        .first()
        .and_then(|content| content.as_text())
        .map(|text| text.text.as_str())
}

/// Definitions of every available tool
pub fn list_tools() -> Vec<Tool> {
    vec![schema::create_deployment_tool(), schema::create_pod_tool()]
}

/// Validate `arguments` for the named tool and run it
pub async fn call_tool(
    context: &ToolContext,
    name: &str,
    arguments: Value,
) -> Result<CallToolResult, ToolError> {
    tracing::debug!(tool = name, "Calling tool");

    match name {
        create_deployment::NAME => {
            let request = schema::parse_arguments(name, arguments)?;
            create_deployment(context, request).await
        }
        create_pod::NAME => {
            let request = schema::parse_arguments(name, arguments)?;
            create_pod(context, request).await
        }
        other => Err(ToolError::UnknownTool(other.to_string())),
    }
}

#[cfg(test)]
mod tests {
    use super::testing::{FakeApi, RecordingTracker};
    use super::*;
    use crate::config::templates;
    use crate::k8s::ResourceKind;
    use rmcp::model::ErrorCode;
    use serde_json::json;

    fn context(api: &Arc<FakeApi>, tracker: &Arc<RecordingTracker>) -> ToolContext {
        ToolContext::new(api.clone(), tracker.clone())
    }

    fn payload(result: &CallToolResult) -> Value {
        serde_json::from_str(result_text(result).unwrap()).unwrap()
    }

    #[tokio::test]
    async fn test_create_deployment_end_to_end() {
        let api = Arc::new(FakeApi::new());
        let tracker = Arc::new(RecordingTracker::default());

        let response = call_tool(
            &context(&api, &tracker),
            "create_deployment",
            json!({"name": "web", "namespace": "default", "template": "nginx", "replicas": 3}),
        )
        .await
        .unwrap();

        assert_eq!(
            payload(&response),
            json!({"deploymentName": "web", "status": "created"})
        );

        let deployments = api.deployments();
        assert_eq!(deployments.len(), 1);
        let (namespace, deployment) = &deployments[0];
        assert_eq!(namespace, "default");
        assert_eq!(deployment.metadata.name.as_deref(), Some("web"));

        let spec = deployment.spec.as_ref().unwrap();
        assert_eq!(spec.replicas, Some(3));
        let containers = &spec.template.spec.as_ref().unwrap().containers;
        assert_eq!(containers.len(), 1);
        assert_eq!(&containers[0], templates::resolve("nginx").unwrap());

        assert_eq!(
            tracker.calls(),
            vec![(ResourceKind::Deployment, "web".to_string(), "default".to_string())]
        );
    }

    #[tokio::test]
    async fn test_create_deployment_defaults_to_one_replica() {
        let api = Arc::new(FakeApi::new());
        let tracker = Arc::new(RecordingTracker::default());

        call_tool(
            &context(&api, &tracker),
            "create_deployment",
            json!({"name": "web", "namespace": "default", "template": "ubuntu"}),
        )
        .await
        .unwrap();

        let (_, deployment) = &api.deployments()[0];
        assert_eq!(deployment.spec.as_ref().unwrap().replicas, Some(1));
    }

    #[tokio::test]
    async fn test_create_deployment_honors_zero_replicas() {
        let api = Arc::new(FakeApi::new());
        let tracker = Arc::new(RecordingTracker::default());

        call_tool(
            &context(&api, &tracker),
            "create_deployment",
            json!({"name": "idle", "namespace": "default", "template": "alpine", "replicas": 0}),
        )
        .await
        .unwrap();

        let (_, deployment) = &api.deployments()[0];
        assert_eq!(deployment.spec.as_ref().unwrap().replicas, Some(0));
    }

    #[tokio::test]
    async fn test_create_deployment_accepts_whole_number_float() {
        let api = Arc::new(FakeApi::new());
        let tracker = Arc::new(RecordingTracker::default());
        let ctx = context(&api, &tracker);

        call_tool(
            &ctx,
            "create_deployment",
            json!({"name": "web", "namespace": "default", "template": "nginx", "replicas": 3.0}),
        )
        .await
        .unwrap();
        let (_, deployment) = &api.deployments()[0];
        assert_eq!(deployment.spec.as_ref().unwrap().replicas, Some(3));

        let err = call_tool(
            &ctx,
            "create_deployment",
            json!({"name": "web2", "namespace": "default", "template": "nginx", "replicas": 2.5}),
        )
        .await
        .unwrap_err();
        assert_eq!(err.code(), ErrorCode::INVALID_REQUEST);
        assert_eq!(api.call_count(), 1);
    }

    #[tokio::test]
    async fn test_create_pod_end_to_end() {
        let api = Arc::new(FakeApi::new());
        let tracker = Arc::new(RecordingTracker::default());

        let response = call_tool(
            &context(&api, &tracker),
            "create_pod",
            json!({"name": "job1", "namespace": "default", "template": "busybox", "command": ["sleep", "100"]}),
        )
        .await
        .unwrap();

        assert_eq!(
            payload(&response),
            json!({"podName": "job1", "status": "created"})
        );

        let pods = api.pods();
        assert_eq!(pods.len(), 1);
        let (_, pod) = &pods[0];
        let containers = &pod.spec.as_ref().unwrap().containers;
        assert_eq!(containers.len(), 1);
        assert_eq!(
            containers[0].command,
            Some(vec!["sleep".to_string(), "100".to_string()])
        );
        assert!(containers[0].args.is_none());

        let labels = pod.metadata.labels.as_ref().unwrap();
        assert_eq!(labels["mcp-managed"], "true");
        assert_eq!(labels["app"], "job1");

        assert_eq!(
            tracker.calls(),
            vec![(ResourceKind::Pod, "job1".to_string(), "default".to_string())]
        );
    }

    #[tokio::test]
    async fn test_create_pod_without_command_inherits_template() {
        let api = Arc::new(FakeApi::new());
        let tracker = Arc::new(RecordingTracker::default());

        call_tool(
            &context(&api, &tracker),
            "create_pod",
            json!({"name": "shell", "namespace": "default", "template": "busybox"}),
        )
        .await
        .unwrap();

        let (_, pod) = &api.pods()[0];
        assert_eq!(
            &pod.spec.as_ref().unwrap().containers[0],
            templates::resolve("busybox").unwrap()
        );
    }

    #[tokio::test]
    async fn test_invalid_template_makes_no_calls() {
        let api = Arc::new(FakeApi::new());
        let tracker = Arc::new(RecordingTracker::default());
        let ctx = context(&api, &tracker);

        for tool in ["create_deployment", "create_pod"] {
            let err = call_tool(
                &ctx,
                tool,
                json!({"name": "web", "namespace": "default", "template": "does-not-exist"}),
            )
            .await
            .unwrap_err();
            assert!(matches!(err, ToolError::InvalidTemplate { .. }));
            assert_eq!(err.code(), ErrorCode::INVALID_REQUEST);
        }

        assert_eq!(api.call_count(), 0);
        assert!(tracker.calls().is_empty());
    }

    #[tokio::test]
    async fn test_direct_call_with_invalid_template_makes_no_calls() {
        let api = Arc::new(FakeApi::new());
        let tracker = Arc::new(RecordingTracker::default());

        let request = PodRequest {
            name: "job1".to_string(),
            namespace: "default".to_string(),
            template: "custom".to_string(),
            command: None,
        };
        let err = create_pod(&context(&api, &tracker), request).await.unwrap_err();

        assert_eq!(err.to_string(), "Invalid template: custom");
        assert_eq!(api.call_count(), 0);
    }

    #[tokio::test]
    async fn test_upstream_failure_is_propagated_and_untracked() {
        let api = Arc::new(FakeApi::failing(409, "deployments.apps \"web\" already exists"));
        let tracker = Arc::new(RecordingTracker::default());

        let err = call_tool(
            &context(&api, &tracker),
            "create_deployment",
            json!({"name": "web", "namespace": "default", "template": "nginx"}),
        )
        .await
        .unwrap_err();

        match &err {
            ToolError::Upstream(upstream) => {
                assert_eq!(upstream.status, Some(409));
                assert_eq!(upstream.message, "deployments.apps \"web\" already exists");
                assert_eq!(upstream.details.as_ref().unwrap()["reason"], "AlreadyExists");
            }
            other => panic!("expected upstream failure, got {other:?}"),
        }
        assert_eq!(api.call_count(), 1);
        assert!(tracker.calls().is_empty());
    }

    #[tokio::test]
    async fn test_pod_upstream_failure_is_untracked() {
        let api = Arc::new(FakeApi::failing(403, "pods is forbidden"));
        let tracker = Arc::new(RecordingTracker::default());

        let err = call_tool(
            &context(&api, &tracker),
            "create_pod",
            json!({"name": "job1", "namespace": "locked", "template": "alpine"}),
        )
        .await
        .unwrap_err();

        assert_eq!(err.to_string(), "pods is forbidden");
        assert_eq!(err.data().unwrap()["status"], 403);
        assert!(tracker.calls().is_empty());
    }

    #[test]
    fn test_reports_server_assigned_name() {
        let api = Arc::new(FakeApi::new().with_name_suffix("-x7k2"));
        let tracker = Arc::new(RecordingTracker::default());

        let response = tokio_test::block_on(call_tool(
            &context(&api, &tracker),
            "create_pod",
            json!({"name": "job1", "namespace": "default", "template": "alpine"}),
        ))
        .unwrap();

        assert_eq!(payload(&response)["podName"], "job1-x7k2");
        // Tracking uses the requested name
        assert_eq!(tracker.calls()[0].1, "job1");
    }

    #[test]
    fn test_unknown_tool() {
        let api = Arc::new(FakeApi::new());
        let tracker = Arc::new(RecordingTracker::default());

        let err = tokio_test::block_on(call_tool(
            &context(&api, &tracker),
            "delete_namespace",
            json!({}),
        ))
        .unwrap_err();

        assert!(matches!(err, ToolError::UnknownTool(_)));
        assert_eq!(err.code(), ErrorCode::METHOD_NOT_FOUND);
        assert_eq!(api.call_count(), 0);
    }

    #[test]
    fn test_list_tools() {
        let tools = list_tools();
        let names: Vec<&str> = tools.iter().map(|tool| tool.name.as_ref()).collect();
        assert_eq!(names, vec!["create_deployment", "create_pod"]);
    }

    #[test]
    fn test_response_shape() {
        let result = json_result(&json!({"podName": "job1", "status": "created"})).unwrap();
        assert_eq!(result.is_error, Some(false));

        let value = serde_json::to_value(&result).unwrap();
        assert_eq!(value["content"][0]["type"], "text");
        assert_eq!(
            serde_json::from_str::<Value>(value["content"][0]["text"].as_str().unwrap()).unwrap(),
            json!({"podName": "job1", "status": "created"})
        );
    }

    struct Unserializable;

    impl Serialize for Unserializable {
        fn serialize<S: serde::Serializer>(&self, _: S) -> Result<S::Ok, S::Error> {
            Err(serde::ser::Error::custom("map key must be a string"))
        }
    }

    #[test]
    fn test_serialization_failure_is_internal() {
        let err = json_result(&Unserializable).unwrap_err();
        assert!(matches!(err, ToolError::Internal(_)));
        assert_eq!(err.code(), ErrorCode::INTERNAL_ERROR);
        assert!(err.to_string().contains("map key must be a string"));
    }
}
