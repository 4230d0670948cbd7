//! kube-mcp-tools CLI - create template-backed Deployments and Pods

use anyhow::Result;
use clap::{CommandFactory, Parser, Subcommand};
use clap_complete::{Shell, generate};
use kube_mcp_tools::commands::create::{
    self, CreateDeploymentOptions, CreatePodOptions, InvokeOptions,
};
use kube_mcp_tools::commands::inspect;
use kube_mcp_tools::config::Settings;
use kube_mcp_tools::utils::logger;
use std::io;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "kube-mcp-tools")]
#[command(author, version, about = "Template-backed Kubernetes tool handlers", long_about = None)]
struct Cli {
    /// Verbose output (can be used multiple times: -v, -vv, -vvv)
    /// -v: INFO, -vv: DEBUG, -vvv: TRACE
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Dry-run mode: print manifests without submitting them
    #[arg(long, global = true)]
    dry_run: bool,

    /// Path to a config file (default: .kube-mcp-tools.toml or ~/.config/kube-mcp-tools/config.toml)
    #[arg(long, global = true, env = "KUBE_MCP_TOOLS_CONFIG")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create a Deployment from a template
    CreateDeployment {
        /// Deployment name
        #[arg(long)]
        name: String,

        /// Target namespace (default from config)
        #[arg(short, long)]
        namespace: Option<String>,

        /// Container template
        #[arg(short, long)]
        template: String,

        /// Number of replicas (default: 1)
        #[arg(short, long)]
        replicas: Option<u32>,
    },

    /// Create a Pod from a template
    CreatePod {
        /// Pod name
        #[arg(long)]
        name: String,

        /// Target namespace (default from config)
        #[arg(short, long)]
        namespace: Option<String>,

        /// Container template
        #[arg(short, long)]
        template: String,

        /// Command overriding the template's command and args (after --)
        #[arg(last = true)]
        command: Vec<String>,
    },

    /// Invoke a tool with raw JSON arguments
    Call {
        /// Tool name (create_deployment, create_pod)
        tool: String,

        /// JSON arguments; read from stdin when omitted
        #[arg(short, long)]
        input: Option<String>,
    },

    /// Print the tool schemas
    Tools,

    /// List container templates
    Templates,

    /// Print an example config file
    Config,

    /// Generate shell completion scripts
    Completion {
        /// Shell type
        #[arg(value_enum)]
        shell: Shell,
    },

    /// Show version information
    Version,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    logger::init(cli.verbose);

    match cli.command {
        Commands::CreateDeployment {
            name,
            namespace,
            template,
            replicas,
        } => {
            let invoke = invoke_options(cli.config, cli.dry_run)?;
            create::create_deployment(
                invoke,
                CreateDeploymentOptions {
                    name,
                    namespace,
                    template,
                    replicas,
                },
            )
            .await
        }
        Commands::CreatePod {
            name,
            namespace,
            template,
            command,
        } => {
            let invoke = invoke_options(cli.config, cli.dry_run)?;
            create::create_pod(
                invoke,
                CreatePodOptions {
                    name,
                    namespace,
                    template,
                    command,
                },
            )
            .await
        }
        Commands::Call { tool, input } => {
            let invoke = invoke_options(cli.config, cli.dry_run)?;
            create::call_raw(invoke, &tool, input).await
        }
        Commands::Tools => inspect::show_tools(),
        Commands::Templates => inspect::show_templates(cli.verbose > 0),
        Commands::Config => inspect::show_config_example(),
        Commands::Completion { shell } => handle_completion_command(shell),
        Commands::Version => handle_version_command(),
    }
}

fn invoke_options(config: Option<PathBuf>, dry_run: bool) -> Result<InvokeOptions> {
    let settings = Settings::load(config.as_deref())?;
    Ok(InvokeOptions { settings, dry_run })
}

fn handle_completion_command(shell: Shell) -> Result<()> {
    let mut cmd = Cli::command();
    generate(shell, &mut cmd, "kube-mcp-tools", &mut io::stdout());
    Ok(())
}

fn handle_version_command() -> Result<()> {
    println!("kube-mcp-tools {}", env!("CARGO_PKG_VERSION"));
    println!("Template-backed Kubernetes tool handlers");
    Ok(())
}
