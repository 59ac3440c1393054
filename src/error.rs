//! Error types for the macroforge-mcp server.
//!
//! Errors are organized by subsystem: the documentation catalog and the
//! optional analyzer collaborator. Neither kind is ever surfaced to MCP
//! clients as a protocol error; tool handlers turn them into in-band text.

use std::path::PathBuf;
use std::time::Duration;

use thiserror::Error;

/// Errors raised while reading the documentation manifest.
#[derive(Debug, Error)]
pub enum CatalogError {
    /// The manifest file does not exist.
    #[error("documentation manifest not found: {}", .0.display())]
    ManifestMissing(PathBuf),

    /// The manifest exists but could not be read.
    #[error("failed to read documentation manifest {}: {source}", path.display())]
    ManifestRead {
        /// Location of the manifest.
        path: PathBuf,
        /// Underlying IO failure.
        #[source]
        source: std::io::Error,
    },

    /// The manifest is not a JSON array of section records.
    #[error("malformed documentation manifest {}: {source}", path.display())]
    ManifestParse {
        /// Location of the manifest.
        path: PathBuf,
        /// Underlying JSON failure.
        #[source]
        source: serde_json::Error,
    },
}

/// Errors related to the external Macroforge analyzer.
#[derive(Debug, Error)]
pub enum AnalyzerError {
    /// The analyzer is not installed or has been disabled.
    #[error("analyzer not available: {0}")]
    Unavailable(String),

    /// The analyzer executable exists but could not be started.
    #[error("failed to start analyzer '{command}': {source}")]
    Spawn {
        /// The command that was spawned.
        command: String,
        /// Underlying IO failure.
        #[source]
        source: std::io::Error,
    },

    /// Communicating with the analyzer process failed.
    #[error("analyzer IO error: {0}")]
    Io(#[from] std::io::Error),

    /// The analyzer did not finish in time.
    #[error("analyzer timed out after {0:?}")]
    Timeout(Duration),

    /// The analyzer ran and reported a failure.
    #[error("analyzer exited with {status}: {stderr}")]
    Failed {
        /// Exit status description.
        status: String,
        /// Captured standard error, trimmed.
        stderr: String,
    },

    /// The analyzer produced output that does not match the expected shape.
    #[error("invalid analyzer output: {0}")]
    InvalidOutput(#[from] serde_json::Error),
}

impl AnalyzerError {
    /// Whether this error means the capability is absent rather than broken.
    pub fn is_unavailable(&self) -> bool {
        matches!(self, Self::Unavailable(_))
    }
}

/// A unified error type for the library's fallible entry points.
#[derive(Debug, Error)]
pub enum Error {
    /// Catalog-related error.
    #[error("catalog error: {0}")]
    Catalog(#[from] CatalogError),
}

/// A specialized Result type for macroforge-mcp operations.
pub type Result<T> = std::result::Result<T, Error>;
