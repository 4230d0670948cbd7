//! Commands that invoke the tools against a cluster

use anyhow::{Context, Result};
use rmcp::model::CallToolResult;
use serde_json::{Value, json};
use std::io::Read;
use std::sync::Arc;

use crate::config::Settings;
use crate::k8s::{DryRunApi, InMemoryTracker, KubeApi, ResourceApi};
use crate::tools::{self, ToolContext, ToolError};
use crate::utils::dryrun;

/// Options shared by every tool invocation from the CLI
pub struct InvokeOptions {
    pub settings: Settings,
    pub dry_run: bool,
}

/// Options for the create-deployment command
pub struct CreateDeploymentOptions {
    pub name: String,
    pub namespace: Option<String>,
    pub template: String,
    pub replicas: Option<u32>,
}

/// Options for the create-pod command
pub struct CreatePodOptions {
    pub name: String,
    pub namespace: Option<String>,
    pub template: String,
    pub command: Vec<String>,
}

/// Handle create-deployment command
pub async fn create_deployment(
    invoke: InvokeOptions,
    options: CreateDeploymentOptions,
) -> Result<()> {
    let namespace = options
        .namespace
        .unwrap_or_else(|| invoke.settings.defaults.namespace.clone());

    let mut arguments = json!({
        "name": options.name,
        "namespace": namespace,
        "template": options.template,
    });
    if let Some(replicas) = options.replicas {
        arguments["replicas"] = json!(replicas);
    }

    call(invoke, tools::create_deployment::NAME, arguments).await
}

/// Handle create-pod command
pub async fn create_pod(invoke: InvokeOptions, options: CreatePodOptions) -> Result<()> {
    let namespace = options
        .namespace
        .unwrap_or_else(|| invoke.settings.defaults.namespace.clone());

    let mut arguments = json!({
        "name": options.name,
        "namespace": namespace,
        "template": options.template,
    });
    if !options.command.is_empty() {
        arguments["command"] = json!(options.command);
    }

    call(invoke, tools::create_pod::NAME, arguments).await
}

/// Handle call command: raw JSON arguments from `--input` or stdin
pub async fn call_raw(invoke: InvokeOptions, tool: &str, input: Option<String>) -> Result<()> {
    let raw = match input {
        Some(input) => input,
        None => {
            let mut buffer = String::new();
            std::io::stdin()
                .read_to_string(&mut buffer)
                .context("Failed to read tool arguments from stdin")?;
            buffer
        }
    };

    let arguments: Value = if raw.trim().is_empty() {
        Value::Null
    } else {
        serde_json::from_str(&raw).context("Tool arguments are not valid JSON")?
    };

    call(invoke, tool, arguments).await
}

async fn call(invoke: InvokeOptions, tool: &str, arguments: Value) -> Result<()> {
    let tracker = Arc::new(InMemoryTracker::new());
    let context = build_context(&invoke, tracker.clone()).await?;

    match tools::call_tool(&context, tool, arguments).await {
        Ok(result) => {
            print_response(&result);
            for resource in tracker.resources() {
                crate::log_info!(
                    "Tracked {} {}/{}",
                    resource.kind,
                    resource.namespace,
                    resource.name
                );
            }
            Ok(())
        }
        Err(err) => exit_with_error(err),
    }
}

async fn build_context(invoke: &InvokeOptions, tracker: Arc<InMemoryTracker>) -> Result<ToolContext> {
    let api: Arc<dyn ResourceApi> =
        if dryrun::is_dry_run(invoke.dry_run || invoke.settings.behavior.dry_run) {
            crate::log_info!("DRY RUN MODE: manifests are printed, nothing is submitted");
            Arc::new(DryRunApi)
        } else {
            Arc::new(KubeApi::connect(&invoke.settings.kube).await?)
        };

    Ok(ToolContext::new(api, tracker))
}

fn print_response(result: &CallToolResult) {
    if let Some(text) = tools::result_text(result) {
        println!("{}", text);
    }
}

fn exit_with_error(err: ToolError) -> ! {
    err.display();
    std::process::exit(1);
}
