//! Macroforge MCP Server
//!
//! An MCP (Model Context Protocol) server that gives AI assistants access to
//! the Macroforge documentation and, when the Macroforge analyzer is
//! installed, lets them validate and expand `@derive` macros in TypeScript.
//!
//! # Overview
//!
//! This library provides:
//! - A documentation retrieval engine over a pre-built `sections.json` catalog
//!   (staged lookup, weighted ranking, chunked sections)
//! - A capability-checked port to the external Macroforge analyzer
//! - An MCP server implementation with stdio transport
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────┐     stdio      ┌──────────────────┐
//! │   LLM Client    │◄──────────────►│    MCP Server    │
//! │  (AI assistant) │     (MCP)      │ (macroforge-mcp) │
//! └─────────────────┘                └───┬──────────┬───┘
//!                                        │          │
//!                              ┌─────────▼──┐  ┌────▼──────────┐
//!                              │  Catalog   │  │   Analyzer    │
//!                              │ (docs/*.md)│  │  (optional)   │
//!                              └────────────┘  └───────────────┘
//! ```
//!
//! # Modules
//!
//! - [`error`] - Error types for the entire application
//! - [`docs`] - Documentation catalog, lookup, ranking and retrieval
//! - [`analyzer`] - Optional macro analyzer collaborator
//! - [`mcp`] - MCP server implementation
//! - [`config`] - Server settings and MCP client configuration
//!
//! # Example
//!
//! ```ignore
//! use macroforge_mcp::{analyzer::ProcessAnalyzer, docs::Catalog, mcp::MacroforgeMcp};
//! use rmcp::{ServiceExt, transport::stdio};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let catalog = Catalog::load("docs");
//!     let analyzer = ProcessAnalyzer::builder().command("macroforge").build();
//!
//!     let service = MacroforgeMcp::new(catalog, analyzer).serve(stdio()).await?;
//!     service.waiting().await?;
//!
//!     Ok(())
//! }
//! ```

// Enforce documentation and other quality attributes
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
// Allow some pedantic lints that are too strict
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::unused_async)]

pub mod analyzer;
pub mod config;
pub mod docs;
pub mod error;
pub mod mcp;

// Re-export commonly used types at the crate root
pub use error::{Error, Result};
