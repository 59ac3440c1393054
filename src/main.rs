//! Macroforge MCP Server - Entry Point
//!
//! This is the main entry point for the macroforge-mcp server.
//! It sets up logging, parses arguments, and starts the server.

use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use macroforge_mcp::config::{ServerConfig, configure};
use rmcp::{ServiceExt, transport::stdio};
use tracing::{Level, info};
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

/// MCP server for Macroforge documentation and macro tooling.
#[derive(Parser, Debug)]
#[command(name = "macroforge-mcp")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Documentation directory containing sections.json.
    #[arg(short, long, default_value = "docs")]
    docs_dir: PathBuf,

    /// Macroforge analyzer executable used by the code tools.
    #[arg(short, long, default_value = "macroforge")]
    analyzer: String,

    /// Arguments to pass to the analyzer before each subcommand.
    #[arg(long = "analyzer-arg", allow_hyphen_values = true)]
    analyzer_args: Vec<String>,

    /// Seconds to wait for a single analyzer call.
    #[arg(long, default_value_t = 30)]
    analyzer_timeout_secs: u64,

    /// Serve documentation only; code tools report the analyzer as unavailable.
    #[arg(long)]
    no_analyzer: bool,

    /// Log level: trace, debug, info, warn, error.
    #[arg(long, default_value = "info")]
    log_level: String,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Add macroforge-mcp to .mcp.json in the current directory.
    Config,
}

impl Args {
    /// Parses the log level string into a tracing Level.
    fn parse_log_level(&self) -> Result<Level> {
        match self.log_level.to_lowercase().as_str() {
            "trace" => Ok(Level::TRACE),
            "debug" => Ok(Level::DEBUG),
            "info" => Ok(Level::INFO),
            "warn" => Ok(Level::WARN),
            "error" => Ok(Level::ERROR),
            other => anyhow::bail!("invalid log level: {}", other),
        }
    }

    /// Collects the server settings from the flags.
    fn server_config(&self) -> ServerConfig {
        ServerConfig {
            docs_dir: self.docs_dir.clone(),
            analyzer_command: self.analyzer.clone(),
            analyzer_args: self.analyzer_args.clone(),
            analyzer_timeout: Duration::from_secs(self.analyzer_timeout_secs),
            analyzer_enabled: !self.no_analyzer,
        }
    }
}

/// Initializes the tracing subscriber for logging.
fn init_tracing(level: Level) -> Result<()> {
    // Create an env filter that respects RUST_LOG but has a default level
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("macroforge_mcp={level},rmcp={level}")));

    // Note: We write logs to stderr to keep stdout clean for MCP communication
    tracing_subscriber::registry()
        .with(filter)
        .with(
            fmt::layer()
                .with_writer(std::io::stderr)
                .with_ansi(false)
                .with_target(true)
                .with_thread_ids(false)
                .with_file(true)
                .with_line_number(true),
        )
        .try_init()
        .context("failed to initialize tracing subscriber")?;

    Ok(())
}

/// Main entry point.
#[tokio::main]
async fn main() -> Result<()> {
    // Parse command-line arguments
    let args = Args::parse();

    if let Some(Command::Config) = args.command {
        return configure(&args.docs_dir);
    }

    // Initialize tracing
    let log_level = args.parse_log_level()?;
    init_tracing(log_level)?;

    let config = args.server_config();
    info!(
        docs_dir = %config.docs_dir.display(),
        analyzer = %config.analyzer_command,
        analyzer_enabled = config.analyzer_enabled,
        "starting macroforge-mcp server"
    );

    // Load documentation once; the snapshot is shared read-only by every request
    let server = config.build_server();

    info!("starting MCP server with stdio transport");

    // Start the MCP server with stdio transport
    let service = server
        .serve(stdio())
        .await
        .context("failed to start MCP server")?;

    info!("MCP server started, waiting for messages");

    // Wait for the service to complete (handles graceful shutdown)
    service.waiting().await?;

    info!("MCP server shut down gracefully");

    Ok(())
}
