//! MCP tool definitions for Macroforge documentation and code assistance.
//!
//! This module defines the parameter and structured output types of the
//! tools exposed by the server. The handlers live in `server`.
//!
//! # Available Tools
//!
//! - `list-sections` - List top-level documentation sections
//! - `get-documentation` - Retrieve one or more sections, chunk-aware
//! - `macroforge-autofixer` - Validate `@derive` usage, JSON diagnostics
//! - `expand-code` - Show macro-expanded code with diagnostics
//! - `get-macro-info` - Describe available macros and field decorators

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::analyzer::{Diagnostic, DiagnosticLevel, Expansion};

/// Filename assumed when a client does not send one.
pub const DEFAULT_FILENAME: &str = "input.ts";

/// Parameters for the `list-sections` tool.
#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct ListSectionsParams {
    /// Optional category filter.
    #[serde(default)]
    #[schemars(description = "Optional category slug or title to list sections from")]
    pub category: Option<String>,
}

/// One or several section names.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(untagged)]
pub enum SectionSelector {
    /// A single section name.
    One(String),
    /// Several section names, fetched in order.
    Many(Vec<String>),
}

impl SectionSelector {
    /// Flattens the selector into a list of queries.
    pub fn into_queries(self) -> Vec<String> {
        match self {
            Self::One(query) => vec![query],
            Self::Many(queries) => queries,
        }
    }
}

/// Parameters for the `get-documentation` tool.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct GetDocumentationParams {
    /// Section id(s) or title(s) to retrieve.
    #[schemars(
        description = "Section name(s) to retrieve. Supports single string or array of strings."
    )]
    pub section: SectionSelector,
}

/// Parameters for the `macroforge-autofixer` and `expand-code` tools.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct CodeParams {
    /// TypeScript source.
    #[schemars(description = "TypeScript code with @derive decorators")]
    pub code: String,
    /// Filename used in diagnostics.
    #[serde(default)]
    #[schemars(description = "Filename for the code (default: input.ts)")]
    pub filename: Option<String>,
}

impl CodeParams {
    /// The filename to report, falling back to `input.ts`.
    pub fn filename(&self) -> &str {
        self.filename
            .as_deref()
            .filter(|f| !f.trim().is_empty())
            .unwrap_or(DEFAULT_FILENAME)
    }
}

/// Parameters for the `get-macro-info` tool.
#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct MacroInfoParams {
    /// Macro or decorator name.
    #[serde(default)]
    #[schemars(description = "Optional: specific macro or decorator name to look up")]
    pub name: Option<String>,
}

/// Line and column of a reported diagnostic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct Location {
    /// Line number (1-indexed).
    pub line: u32,
    /// Column number (1-indexed).
    pub column: u32,
}

/// A diagnostic as returned by the autofixer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct ReportedDiagnostic {
    /// `error`, `warning` or `info`.
    pub level: String,
    /// What is wrong.
    pub message: String,
    /// Where it is wrong.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<Location>,
    /// Suggested fix.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub help: Option<String>,
    /// Additional context, omitted when empty.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<Vec<String>>,
}

impl From<&Diagnostic> for ReportedDiagnostic {
    fn from(d: &Diagnostic) -> Self {
        Self {
            level: d.level.as_str().to_string(),
            message: d.message.clone(),
            location: d.span.map(|span| Location {
                line: span.start.line,
                column: span.start.column,
            }),
            help: d.help.clone().filter(|h| !h.is_empty()),
            notes: (!d.notes.is_empty()).then(|| d.notes.clone()),
        }
    }
}

/// Diagnostic counts by level.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct DiagnosticSummary {
    /// Number of errors.
    pub errors: usize,
    /// Number of warnings.
    pub warnings: usize,
    /// Number of informational messages.
    pub info: usize,
}

/// Structured output of the `macroforge-autofixer` tool.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct AutofixerReport {
    /// Reported issues.
    pub diagnostics: Vec<ReportedDiagnostic>,
    /// Counts by level.
    pub summary: DiagnosticSummary,
    /// True when errors exist and the code should be validated again after fixing.
    pub require_another_tool_call_after_fixing: bool,
}

impl AutofixerReport {
    /// Builds a report from an analyzer expansion.
    pub fn from_expansion(expansion: &Expansion) -> Self {
        let diagnostics = &expansion.diagnostics;
        let count = |level: DiagnosticLevel| diagnostics.iter().filter(|d| d.level == level).count();
        let summary = DiagnosticSummary {
            errors: count(DiagnosticLevel::Error),
            warnings: count(DiagnosticLevel::Warning),
            info: count(DiagnosticLevel::Info),
        };

        Self {
            diagnostics: diagnostics.iter().map(ReportedDiagnostic::from).collect(),
            require_another_tool_call_after_fixing: expansion.has_errors(),
            summary,
        }
    }

    /// A report carrying a single synthetic error, used when analysis could not run.
    pub fn synthetic_error(message: impl Into<String>) -> Self {
        Self {
            diagnostics: vec![ReportedDiagnostic {
                level: DiagnosticLevel::Error.as_str().to_string(),
                message: message.into(),
                location: None,
                help: None,
                notes: None,
            }],
            summary: DiagnosticSummary {
                errors: 1,
                warnings: 0,
                info: 0,
            },
            require_another_tool_call_after_fixing: false,
        }
    }
}
