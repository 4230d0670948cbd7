//! Kubernetes API collaborators used to submit constructed objects

use anyhow::{Context, Result};
use async_trait::async_trait;
use k8s_openapi::api::apps::v1::Deployment;
use k8s_openapi::api::core::v1::Pod;
use kube::api::PostParams;
use kube::config::{KubeConfigOptions, Kubeconfig};
use kube::{Api, Client, Config};
use serde_json::{Value, json};
use thiserror::Error;

use crate::config::settings::KubeSettings;
use crate::utils::dryrun;

/// Failure reported by the cluster API, carrying the server's diagnostics
#[derive(Error, Debug)]
#[error("{message}")]
pub struct UpstreamError {
    /// HTTP status code, when the server answered
    pub status: Option<u16>,
    pub message: String,
    /// Status body returned by the server
    pub details: Option<Value>,
    #[source]
    pub source: Option<kube::Error>,
}

impl UpstreamError {
    pub fn new(status: Option<u16>, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
            details: None,
            source: None,
        }
    }

    pub fn with_details(mut self, details: Value) -> Self {
        self.details = Some(details);
        self
    }

    /// Structured diagnostics for logs and error responses
    pub fn diagnostics(&self) -> Value {
        json!({
            "status": self.status,
            "message": self.message,
            "details": self.details,
        })
    }
}

impl From<kube::Error> for UpstreamError {
    fn from(err: kube::Error) -> Self {
        let (status, message, details) = match &err {
            kube::Error::Api(response) => {
                let body = serde_json::to_value(response).ok();
                let status = body
                    .as_ref()
                    .and_then(|b| b.get("code"))
                    .and_then(Value::as_u64)
                    .and_then(|code| u16::try_from(code).ok());
                let message = body
                    .as_ref()
                    .and_then(|b| b.get("message"))
                    .and_then(Value::as_str)
                    .filter(|m| !m.is_empty())
                    .map(str::to_string)
                    .unwrap_or_else(|| err.to_string());
                (status, message, body)
            }
            other => (None, other.to_string(), None),
        };

        Self {
            status,
            message,
            details,
            source: Some(err),
        }
    }
}

/// Creates namespaced workload objects on a cluster
#[async_trait]
pub trait ResourceApi: Send + Sync {
    async fn create_namespaced_deployment(
        &self,
        namespace: &str,
        deployment: &Deployment,
    ) -> Result<Deployment, UpstreamError>;

    async fn create_namespaced_pod(&self, namespace: &str, pod: &Pod) -> Result<Pod, UpstreamError>;
}

/// `ResourceApi` backed by a live cluster connection
#[derive(Clone)]
pub struct KubeApi {
    client: Client,
}

impl KubeApi {
    pub fn new(client: Client) -> Self {
        Self { client }
    }

    /// Build a client from the configured kubeconfig/context, or infer one
    pub async fn connect(settings: &KubeSettings) -> Result<Self> {
        let options = KubeConfigOptions {
            context: settings.context.clone(),
            ..Default::default()
        };

        let config = match (&settings.kubeconfig, &settings.context) {
            (Some(path), _) => {
                let kubeconfig = Kubeconfig::read_from(path)
                    .with_context(|| format!("Failed to read kubeconfig: {}", path))?;
                Config::from_custom_kubeconfig(kubeconfig, &options)
                    .await
                    .with_context(|| format!("Failed to load kubeconfig: {}", path))?
            }
            (None, Some(context)) => Config::from_kubeconfig(&options)
                .await
                .with_context(|| format!("Failed to load kubeconfig context: {}", context))?,
            (None, None) => Config::infer()
                .await
                .context("Failed to infer Kubernetes configuration")?,
        };

        tracing::debug!(cluster_url = %config.cluster_url, "Connecting to cluster");

        let client = Client::try_from(config).context("Failed to create Kubernetes client")?;
        Ok(Self::new(client))
    }
}

#[async_trait]
impl ResourceApi for KubeApi {
    async fn create_namespaced_deployment(
        &self,
        namespace: &str,
        deployment: &Deployment,
    ) -> Result<Deployment, UpstreamError> {
        let api: Api<Deployment> = Api::namespaced(self.client.clone(), namespace);
        Ok(api.create(&PostParams::default(), deployment).await?)
    }

    async fn create_namespaced_pod(&self, namespace: &str, pod: &Pod) -> Result<Pod, UpstreamError> {
        let api: Api<Pod> = Api::namespaced(self.client.clone(), namespace);
        Ok(api.create(&PostParams::default(), pod).await?)
    }
}

/// `ResourceApi` that prints manifests instead of submitting them
#[derive(Debug, Clone, Default)]
pub struct DryRunApi;

#[async_trait]
impl ResourceApi for DryRunApi {
    async fn create_namespaced_deployment(
        &self,
        namespace: &str,
        deployment: &Deployment,
    ) -> Result<Deployment, UpstreamError> {
        let action = format!("Would create Deployment in namespace {}", namespace);
        dryrun::log_manifest(&action, deployment)
            .map_err(|err| UpstreamError::new(None, err.to_string()))?;
        Ok(deployment.clone())
    }

    async fn create_namespaced_pod(&self, namespace: &str, pod: &Pod) -> Result<Pod, UpstreamError> {
        let action = format!("Would create Pod in namespace {}", namespace);
        dryrun::log_manifest(&action, pod).map_err(|err| UpstreamError::new(None, err.to_string()))?;
        Ok(pod.clone())
    }
}
