//! MCP (Model Context Protocol) server module.
//!
//! This module implements the MCP server that exposes Macroforge
//! documentation and code tools to AI assistants. The server uses stdio
//! transport to communicate with clients.
//!
//! # Architecture
//!
//! The MCP module is organized into:
//! - `server`: the rmcp handler, tool routing and response formatting
//! - `tools`: tool parameter and structured output types
//!
//! # Usage
//!
//! ```ignore
//! use macroforge_mcp::{analyzer::NoAnalyzer, docs::Catalog, mcp::MacroforgeMcp};
//! use rmcp::{ServiceExt, transport::stdio};
//!
//! let server = MacroforgeMcp::new(Catalog::load("docs"), NoAnalyzer);
//! server.serve(stdio()).await?.waiting().await?;
//! ```

pub mod server;
pub mod tools;

// Re-export the MacroforgeMcp for convenient access
pub use server::MacroforgeMcp;
