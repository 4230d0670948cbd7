//! Construction of managed Deployment and Pod objects

use k8s_openapi::api::apps::v1::{Deployment, DeploymentSpec};
use k8s_openapi::api::core::v1::{Container, Pod, PodSpec, PodTemplateSpec};
use k8s_openapi::apimachinery::pkg::apis::meta::v1::{LabelSelector, ObjectMeta};
use std::collections::BTreeMap;

/// Label marking objects created by these tools
pub const MANAGED_LABEL: &str = "mcp-managed";
pub const APP_LABEL: &str = "app";

/// Replica count used when a request does not set one
pub const DEFAULT_REPLICAS: i32 = 1;

/// `app: <name>`, shared by a Deployment's selector and its pod template
pub fn selector_labels(name: &str) -> BTreeMap<String, String> {
    BTreeMap::from([(APP_LABEL.to_string(), name.to_string())])
}

/// Labels carried by every top-level object the tools create
pub fn managed_labels(name: &str) -> BTreeMap<String, String> {
    let mut labels = selector_labels(name);
    labels.insert(MANAGED_LABEL.to_string(), "true".to_string());
    labels
}

fn managed_metadata(name: &str, namespace: &str) -> ObjectMeta {
    ObjectMeta {
        name: Some(name.to_string()),
        namespace: Some(namespace.to_string()),
        labels: Some(managed_labels(name)),
        ..Default::default()
    }
}

/// Build a Deployment running one copy of `container` per replica
pub fn build_deployment(
    name: &str,
    namespace: &str,
    replicas: i32,
    container: &Container,
) -> Deployment {
    Deployment {
        metadata: managed_metadata(name, namespace),
        spec: Some(DeploymentSpec {
            replicas: Some(replicas),
            selector: LabelSelector {
                match_labels: Some(selector_labels(name)),
                ..Default::default()
            },
            template: PodTemplateSpec {
                metadata: Some(ObjectMeta {
                    labels: Some(selector_labels(name)),
                    ..Default::default()
                }),
                spec: Some(PodSpec {
                    containers: vec![container.clone()],
                    ..Default::default()
                }),
            },
            ..Default::default()
        }),
        ..Default::default()
    }
}

/// Apply a command override to a template container.
///
/// Overriding the command drops the template's args, which only make sense
/// for the template's own command.
pub fn effective_container(template: &Container, command: Option<&[String]>) -> Container {
    let mut container = template.clone();
    if let Some(command) = command {
        container.command = Some(command.to_vec());
        container.args = None;
    }
    container
}

/// Build a bare Pod running `container`
pub fn build_pod(name: &str, namespace: &str, container: Container) -> Pod {
    Pod {
        metadata: managed_metadata(name, namespace),
        spec: Some(PodSpec {
            containers: vec![container],
            ..Default::default()
        }),
        ..Default::default()
    }
}
