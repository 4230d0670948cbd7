//! Kubernetes operations

pub mod client;
pub mod resources;
pub mod tracker;

pub use client::{DryRunApi, KubeApi, ResourceApi, UpstreamError};
pub use tracker::{InMemoryTracker, ResourceKind, ResourceTracker, TrackedResource};
