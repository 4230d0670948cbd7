//! Recording fakes for the Kubernetes collaborators

use async_trait::async_trait;
use k8s_openapi::api::apps::v1::Deployment;
use k8s_openapi::api::core::v1::Pod;
use serde_json::json;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};

use crate::k8s::{ResourceApi, ResourceKind, ResourceTracker, UpstreamError};

/// Captures submitted objects; optionally fails every call
#[derive(Default)]
pub struct FakeApi {
    calls: AtomicUsize,
    deployments: Mutex<Vec<(String, Deployment)>>,
    pods: Mutex<Vec<(String, Pod)>>,
    failure: Option<(u16, String)>,
    name_suffix: String,
}

impl FakeApi {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing(status: u16, message: &str) -> Self {
        Self {
            failure: Some((status, message.to_string())),
            ..Self::default()
        }
    }

    /// Simulate the server assigning a different name
    pub fn with_name_suffix(mut self, suffix: &str) -> Self {
        self.name_suffix = suffix.to_string();
        self
    }

    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn deployments(&self) -> Vec<(String, Deployment)> {
        self.deployments.lock().unwrap().clone()
    }

    pub fn pods(&self) -> Vec<(String, Pod)> {
        self.pods.lock().unwrap().clone()
    }

    fn check_failure(&self) -> Result<(), UpstreamError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        match &self.failure {
            Some((status, message)) => {
                let reason = if *status == 409 { "AlreadyExists" } else { "Forbidden" };
                Err(
                    UpstreamError::new(Some(*status), message.clone()).with_details(json!({
                        "kind": "Status",
                        "status": "Failure",
                        "message": message,
                        "reason": reason,
                        "code": status,
                    })),
                )
            }
            None => Ok(()),
        }
    }

    fn assigned_name(&self, name: Option<&String>) -> Option<String> {
        name.map(|name| format!("{}{}", name, self.name_suffix))
    }
}

#[async_trait]
impl ResourceApi for FakeApi {
    async fn create_namespaced_deployment(
        &self,
        namespace: &str,
        deployment: &Deployment,
    ) -> Result<Deployment, UpstreamError> {
        self.check_failure()?;
        self.deployments
            .lock()
            .unwrap()
            .push((namespace.to_string(), deployment.clone()));

        let mut created = deployment.clone();
        created.metadata.name = self.assigned_name(deployment.metadata.name.as_ref());
        Ok(created)
    }

    async fn create_namespaced_pod(&self, namespace: &str, pod: &Pod) -> Result<Pod, UpstreamError> {
        self.check_failure()?;
        self.pods
            .lock()
            .unwrap()
            .push((namespace.to_string(), pod.clone()));

        let mut created = pod.clone();
        created.metadata.name = self.assigned_name(pod.metadata.name.as_ref());
        Ok(created)
    }
}

#[derive(Default)]
pub struct RecordingTracker {
    calls: Mutex<Vec<(ResourceKind, String, String)>>,
}

impl RecordingTracker {
    pub fn calls(&self) -> Vec<(ResourceKind, String, String)> {
        self.calls.lock().unwrap().clone()
    }
}

impl ResourceTracker for RecordingTracker {
    fn track_resource(&self, kind: ResourceKind, name: &str, namespace: &str) {
        self.calls
            .lock()
            .unwrap()
            .push((kind, name.to_string(), namespace.to_string()));
    }
}
