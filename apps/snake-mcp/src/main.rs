//! MCP stdio server exposing flake8, mypy and pytest.
//!
//! stdout carries the MCP stream; logs and `--list-tools` output go to stderr.

mod settings;

use anyhow::{Context, Result};
use clap::Parser;
use python_tools::{PythonTools, build_registry};
use snake_config::{LoadedSnakeConfig, load_merged, load_with_explicit, schema_json_pretty};
use snake_tools_mcp::{RegistryServer, ServiceExt, stdio};
use std::path::PathBuf;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

const INSTRUCTIONS: &str = "Python quality tools. Every tool takes `path`, the project directory \
to run in, plus tool-specific options. Results are {success, data, error} envelopes; lint \
findings and failing tests are successful runs with `has_issues` set.";

#[derive(Parser, Debug)]
#[command(name = "snake-mcp")]
#[command(about = "MCP server for flake8, mypy and pytest", version)]
struct Args {
    /// Comma-separated allowlist (case-insensitive). Example: mypy,pytest
    #[arg(long, value_name = "NAMES")]
    allow: Option<String>,

    /// JSON config file layered over the global and local snake.json
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,

    /// List available tools and exit
    #[arg(long)]
    list_tools: bool,

    /// Output mode: text | structured (default: from config, else text)
    #[arg(long, value_parser = ["text", "structured"])]
    output: Option<String>,

    /// Log filter, e.g. debug or python_tools=trace
    #[arg(long, value_name = "LEVEL")]
    log_level: Option<String>,

    /// Print the JSON Schema for snake.json and exit
    #[arg(long)]
    print_config_schema: bool,
}

fn load_config(args: &Args) -> Result<LoadedSnakeConfig> {
    let cwd = std::env::current_dir().context("Failed to determine current directory")?;
    match &args.config {
        Some(path) => load_with_explicit(&cwd, path),
        None => load_merged(&cwd),
    }
}

/// An explicit `--log-level` beats `RUST_LOG`; otherwise `RUST_LOG` beats the
/// configured level.
fn init_tracing(cli_level: Option<&str>, level: &str, json: bool) {
    let filter = match cli_level {
        Some(_) => EnvFilter::try_new(level).unwrap_or_else(|_| EnvFilter::new("info")),
        None => EnvFilter::try_from_default_env()
            .or_else(|_| EnvFilter::try_new(level))
            .unwrap_or_else(|_| EnvFilter::new("info")),
    };
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr);
    if json {
        builder.json().init();
    } else {
        builder.init();
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    if args.print_config_schema {
        println!("{}", schema_json_pretty()?);
        return Ok(());
    }

    let loaded = load_config(&args)?;
    let cfg = &loaded.config;
    init_tracing(
        args.log_level.as_deref(),
        settings::resolve_level(args.log_level.as_deref(), cfg),
        cfg.logging.json,
    );
    // Emitted again now that a subscriber exists.
    for warning in &loaded.warnings {
        tracing::warn!(%warning, "config warning");
    }

    let tools = PythonTools::new(cfg.tools.clone());
    let registry = Arc::new(build_registry(&tools));
    let output_mode = settings::resolve_output(args.output.as_deref(), cfg.server.output);

    let mut server = RegistryServer::new(registry)
        .with_info("snake-mcp", env!("CARGO_PKG_VERSION"))
        .with_output_mode(output_mode)
        .with_instructions(INSTRUCTIONS);
    if let Some(allow) = settings::resolve_allowlist(args.allow.as_deref(), cfg) {
        for name in settings::unknown_tools(&allow) {
            tracing::warn!(tool = name, "allowlist names an unknown tool");
        }
        server = server.with_allowlist(allow);
    }

    let names = server.effective_tool_names();
    if args.list_tools {
        eprintln!("Available tools ({}):", names.len());
        for name in names {
            eprintln!("  - {name}");
        }
        return Ok(());
    }

    tracing::info!(tools = ?names, mode = ?output_mode, "starting snake-mcp");
    let service = server
        .serve(stdio())
        .await
        .context("Failed to start MCP server on stdio")?;
    let reason = service
        .waiting()
        .await
        .context("MCP server task failed")?;
    tracing::info!(?reason, "snake-mcp stopped");

    Ok(())
}
