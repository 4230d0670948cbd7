//! Command implementations for kube-mcp-tools CLI

pub mod create;
pub mod inspect;
