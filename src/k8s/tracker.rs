//! Bookkeeping of resources created by the tools

use serde::Serialize;
use std::fmt;
use std::sync::{Mutex, PoisonError};

/// Kind of workload object the tools create
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ResourceKind {
    Deployment,
    Pod,
}

impl ResourceKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ResourceKind::Deployment => "Deployment",
            ResourceKind::Pod => "Pod",
        }
    }
}

impl fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Records resources after the cluster has accepted them.
///
/// Notifications are fire-and-forget: implementations handle their own
/// failures.
pub trait ResourceTracker: Send + Sync {
    fn track_resource(&self, kind: ResourceKind, name: &str, namespace: &str);
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TrackedResource {
    pub kind: ResourceKind,
    pub name: String,
    pub namespace: String,
}

/// Process-local tracker keeping resources in creation order
#[derive(Debug, Default)]
pub struct InMemoryTracker {
    resources: Mutex<Vec<TrackedResource>>,
}

impl InMemoryTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of everything tracked so far
    pub fn resources(&self) -> Vec<TrackedResource> {
        self.resources
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

impl ResourceTracker for InMemoryTracker {
    fn track_resource(&self, kind: ResourceKind, name: &str, namespace: &str) {
        tracing::debug!(%kind, name, namespace, "Tracking resource");
        self.resources
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(TrackedResource {
                kind,
                name: name.to_string(),
                namespace: namespace.to_string(),
            });
    }
}
