//! Server settings and MCP client configuration.
//!
//! [`ServerConfig`] collects everything the server needs at startup.
//! [`configure`] creates or updates `.mcp.json` in the project root so MCP
//! clients launch macroforge-mcp automatically.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result, bail};
use serde_json::{Map, Value, json};
use tracing::{info, warn};

use crate::analyzer::{Analyzer, NoAnalyzer, ProcessAnalyzer};
use crate::docs::Catalog;
use crate::mcp::MacroforgeMcp;

/// Name of the server entry written to `.mcp.json`.
pub const SERVER_NAME: &str = "macroforge";

/// Startup settings for the server.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Directory containing `sections.json` and the markdown bodies.
    pub docs_dir: PathBuf,
    /// Analyzer executable.
    pub analyzer_command: String,
    /// Arguments placed before every analyzer subcommand.
    pub analyzer_args: Vec<String>,
    /// Upper bound on a single analyzer invocation.
    pub analyzer_timeout: Duration,
    /// When false the code tools report the analyzer as unavailable.
    pub analyzer_enabled: bool,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            docs_dir: PathBuf::from("docs"),
            analyzer_command: "macroforge".to_string(),
            analyzer_args: Vec::new(),
            analyzer_timeout: Duration::from_secs(30),
            analyzer_enabled: true,
        }
    }
}

impl ServerConfig {
    /// Loads the catalog and wires up the analyzer.
    pub fn build_server(&self) -> MacroforgeMcp {
        let catalog = Catalog::load(&self.docs_dir);

        if !self.analyzer_enabled {
            info!("analyzer disabled; code tools will report it as unavailable");
            return MacroforgeMcp::new(catalog, NoAnalyzer);
        }

        let analyzer = ProcessAnalyzer::builder()
            .command(&self.analyzer_command)
            .args(self.analyzer_args.iter().cloned())
            .timeout(self.analyzer_timeout)
            .build();
        if !analyzer.is_available() {
            warn!(
                command = %self.analyzer_command,
                "analyzer not found; code tools will report it as unavailable"
            );
        }
        MacroforgeMcp::new(catalog, analyzer)
    }
}

/// Configure macroforge-mcp by creating/updating .mcp.json in current directory
///
/// ## Errors
/// Returns an error if:
/// - File I/O fails
/// - Existing .mcp.json contains invalid JSON
/// - macroforge-mcp is already configured
pub fn configure(docs_dir: &Path) -> Result<()> {
    let config_file = Path::new(".mcp.json");
    add_server_entry(config_file, docs_dir)?;

    println!("\n{}", "=".repeat(60));
    println!("✓ Configured {SERVER_NAME} in .mcp.json");
    println!("{}", "=".repeat(60));
    println!("\nNext steps:");
    println!("  1. Restart your MCP client if it's running");
    println!("  2. Ask: \"Which Macroforge macros help with serialization?\"\n");

    Ok(())
}

fn add_server_entry(config_file: &Path, docs_dir: &Path) -> Result<()> {
    // Read existing config or create new
    let mut config: Value = if config_file.exists() {
        let content = fs::read_to_string(config_file).context("failed to read .mcp.json")?;
        serde_json::from_str(&content).context("failed to parse .mcp.json - invalid JSON")?
    } else {
        json!({})
    };

    // Ensure config is an object
    if !config.is_object() {
        config = json!({});
    }
    let config_obj = config
        .as_object_mut()
        .context(".mcp.json root is not an object")?;

    let servers = config_obj
        .entry("mcpServers")
        .or_insert_with(|| Value::Object(Map::new()));
    if !servers.is_object() {
        *servers = Value::Object(Map::new());
    }
    let servers = servers
        .as_object_mut()
        .context("mcpServers is not an object")?;

    if servers.contains_key(SERVER_NAME) {
        bail!(
            "{SERVER_NAME} is already configured in .mcp.json\n\n\
            To reconfigure, first remove the existing entry, then run:\n  \
            macroforge-mcp config"
        );
    }

    servers.insert(
        SERVER_NAME.to_string(),
        json!({
            "command": "macroforge-mcp",
            "args": ["--docs-dir", docs_dir.display().to_string()]
        }),
    );

    // Write atomically (temp file + rename)
    let temp_file = config_file.with_extension("tmp");
    let json_str = serde_json::to_string_pretty(&config).context("failed to serialize JSON")?;
    fs::write(&temp_file, json_str).context("failed to write temporary config file")?;
    fs::rename(&temp_file, config_file).context("failed to rename temporary config file")?;

    Ok(())
}
