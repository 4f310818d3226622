use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::Context;
use clap::{Args, Parser, Subcommand};
use nodeprop::config::env::DEFAULT_TOKEN_VAR;
use nodeprop::presets::{register_nodeprop, NODEPROP_FLOW};
use nodeprop::utils::LoggingConfig;
use nodeprop::{
    DynTransport, EnvConfig, FlowParams, Gateway, GatewayManifest, RecordingTransport,
    ReqwestTransport,
};
use serde_json::json;

#[derive(Parser)]
#[command(name = "nodeprop", version, about = "GitHub workflow dispatch gateway", author)]
struct Cli {
    #[command(flatten)]
    global: GlobalArgs,
    #[command(subcommand)]
    command: Command,
}

#[derive(Args)]
struct GlobalArgs {
    /// Token value or `${VAR}` reference; defaults to $GITHUB_TOKEN
    #[arg(long, global = true)]
    token: Option<String>,
    #[arg(long, global = true, env = "NODEPROP_API_BASE")]
    api_base: Option<String>,
    /// Print requests instead of sending them
    #[arg(long, global = true)]
    dry_run: bool,
}

#[derive(Subcommand)]
enum Command {
    /// Dispatch every workflow registered for a repository
    Run {
        #[arg(long)]
        manifest: PathBuf,
        #[arg(long)]
        repo: String,
    },
    /// Dispatch one named action or workflow
    Dispatch {
        #[arg(long)]
        manifest: PathBuf,
        #[arg(long)]
        repo: String,
        #[arg(long)]
        flow_type: String,
        #[arg(long)]
        name: String,
        #[arg(long = "param", value_parser = parse_param)]
        params: Vec<(String, String)>,
    },
    /// Dispatch nodeprop-action.yml on main
    Nodeprop {
        #[arg(long)]
        repo: String,
    },
    /// Show registered flows and repositories
    List {
        #[arg(long)]
        manifest: PathBuf,
    },
}

fn parse_param(raw: &str) -> Result<(String, String), String> {
    match raw.split_once('=') {
        Some((key, value)) if !key.is_empty() => Ok((key.to_string(), value.to_string())),
        _ => Err(format!("expected KEY=VALUE, got `{raw}`")),
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    LoggingConfig::init();

    let cli = Cli::parse();
    let recorder = Arc::new(RecordingTransport::new());
    let transport: DynTransport = if cli.global.dry_run {
        recorder.clone() as DynTransport
    } else {
        Arc::new(ReqwestTransport::new()?) as DynTransport
    };

    let outcome = run_command(cli.command, transport, &cli.global).await;

    // 即使调度失败，也输出已记录的请求
    if cli.global.dry_run {
        render_recorded(&recorder)?;
    }
    outcome
}

async fn run_command(
    command: Command,
    transport: DynTransport,
    global: &GlobalArgs,
) -> anyhow::Result<()> {
    match command {
        Command::Run { manifest, repo } => {
            let gateway = load_gateway(&manifest, transport, global)?;
            let token = resolve_token(global)?;
            gateway.actor().run_repo_flows(&repo, &token).await?;
            println!("Dispatched workflows for `{repo}`");
        }
        Command::Dispatch {
            manifest,
            repo,
            flow_type,
            name,
            params,
        } => {
            let gateway = load_gateway(&manifest, transport, global)?;
            let token = resolve_token(global)?;
            let params: FlowParams = params.into_iter().collect();
            gateway
                .actor()
                .run_custom_flow(&repo, &flow_type, &name, &token, &params)
                .await?;
            println!("Dispatched {flow_type} `{name}` for `{repo}`");
        }
        Command::Nodeprop { repo } => {
            let gateway = match global.api_base.as_deref() {
                Some(api_base) => Gateway::with_api_base(transport, api_base),
                None => Gateway::new(transport),
            };
            register_nodeprop(gateway.manager());
            let token = resolve_token(global)?;
            gateway
                .actor()
                .run_custom_flow(&repo, "workflow", NODEPROP_FLOW, &token, &FlowParams::new())
                .await?;
            println!("Dispatched `{NODEPROP_FLOW}` for `{repo}`");
        }
        Command::List { manifest } => {
            let gateway = load_gateway(&manifest, transport, global)?;
            render_listing(&gateway);
        }
    }
    Ok(())
}

fn load_gateway(
    path: &Path,
    transport: DynTransport,
    global: &GlobalArgs,
) -> anyhow::Result<Gateway> {
    let manifest = GatewayManifest::load(path)
        .with_context(|| format!("loading manifest `{}`", path.display()))?;
    Ok(Gateway::from_manifest(
        &manifest,
        transport,
        global.api_base.as_deref(),
    )?)
}

fn resolve_token(global: &GlobalArgs) -> anyhow::Result<String> {
    if global.dry_run && global.token.is_none() {
        if let Some(token) = EnvConfig::get_env_optional(DEFAULT_TOKEN_VAR) {
            return Ok(token);
        }
        return Ok("dry-run".to_string());
    }
    Ok(EnvConfig::resolve_token(global.token.as_deref(), DEFAULT_TOKEN_VAR)?)
}

fn render_listing(gateway: &Gateway) {
    let manager = gateway.manager();
    println!("{:<10} {:<24} {}", "Kind", "Name", "Target");
    for name in manager.action_names() {
        if let Some(spec) = manager.action(&name) {
            println!("{:<10} {:<24} {}", "action", name, spec);
        }
    }
    for name in manager.workflow_names() {
        if let Some(spec) = manager.workflow(&name) {
            println!("{:<10} {:<24} {}", "workflow", name, spec);
        }
    }

    let registry = gateway.registry();
    for repo in registry.repos() {
        if let Some(entry) = registry.get(&repo) {
            println!(
                "{:<10} {:<24} actions={:?} workflows={:?}",
                "repo", repo, entry.actions, entry.workflows
            );
        }
    }
}

fn render_recorded(recorder: &RecordingTransport) -> anyhow::Result<()> {
    for request in recorder.requests() {
        let value = json!({
            "method": request.method.as_str(),
            "url": request.url,
            "body": request.body_json()?,
        });
        println!("{}", serde_json::to_string_pretty(&value)?);
    }
    Ok(())
}
