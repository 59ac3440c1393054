//! Optional Macroforge analyzer collaborator.
//!
//! The analyzer expands `@derive` macros in TypeScript and reports
//! diagnostics. It lives outside this process and may not be installed at
//! all, so every call returns [`AnalyzerResult`] and callers must treat
//! [`AnalyzerError::Unavailable`] as "feature off" rather than a crash.
//!
//! # Architecture
//!
//! - `types`: JSON shapes of expansions, diagnostics and the macro manifest
//! - `process`: implementation backed by an external analyzer executable
//!
//! # Usage
//!
//! ```ignore
//! use macroforge_mcp::analyzer::{Analyzer, ExpandOptions, ProcessAnalyzer};
//!
//! let analyzer = ProcessAnalyzer::builder().command("macroforge").build();
//! match analyzer.expand(source, "input.ts", &ExpandOptions::default()).await {
//!     Ok(expansion) => println!("{}", expansion.code),
//!     Err(err) if err.is_unavailable() => println!("analyzer not installed"),
//!     Err(err) => println!("analysis failed: {err}"),
//! }
//! ```

pub mod process;
pub mod types;

use futures::future::{self, BoxFuture, FutureExt};

pub use crate::error::AnalyzerError;

pub use process::{ProcessAnalyzer, ProcessAnalyzerBuilder};
pub use types::{
    DecoratorEntry, Diagnostic, DiagnosticLevel, ExpandOptions, Expansion, MacroEntry,
    MacroManifest, Position, Span,
};

/// Result type for analyzer operations.
pub type AnalyzerResult<T> = std::result::Result<T, AnalyzerError>;

/// Capability-checked access to the macro analyzer.
pub trait Analyzer: Send + Sync {
    /// Whether the analyzer can be called at all.
    fn is_available(&self) -> bool;

    /// Expands macros in `source`, returning the transformed code and diagnostics.
    fn expand<'a>(
        &'a self,
        source: &'a str,
        filename: &'a str,
        options: &'a ExpandOptions,
    ) -> BoxFuture<'a, AnalyzerResult<Expansion>>;

    /// Lists the macros and decorators the analyzer provides.
    fn manifest(&self) -> BoxFuture<'_, AnalyzerResult<MacroManifest>>;
}

/// An analyzer that is never available.
#[derive(Debug, Clone, Default)]
pub struct NoAnalyzer;

impl NoAnalyzer {
    fn unavailable() -> AnalyzerError {
        AnalyzerError::Unavailable("analyzer disabled".to_string())
    }
}

impl Analyzer for NoAnalyzer {
    fn is_available(&self) -> bool {
        false
    }

    fn expand<'a>(
        &'a self,
        _source: &'a str,
        _filename: &'a str,
        _options: &'a ExpandOptions,
    ) -> BoxFuture<'a, AnalyzerResult<Expansion>> {
        future::ready(Err(Self::unavailable())).boxed()
    }

    fn manifest(&self) -> BoxFuture<'_, AnalyzerResult<MacroManifest>> {
        future::ready(Err(Self::unavailable())).boxed()
    }
}
