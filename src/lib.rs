//! kube-mcp-tools - template-backed Kubernetes tool handlers
//!
//! Tools translate validated, structured requests into Deployments and Pods
//! built from a fixed registry of container templates.

pub mod commands;
pub mod config;
pub mod k8s;
pub mod tools;
pub mod utils;
