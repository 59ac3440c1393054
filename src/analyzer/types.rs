//! Data shapes exchanged with the Macroforge analyzer.
//!
//! These mirror the analyzer's JSON output and are validated with serde at
//! the point where that output enters the server.

use serde::{Deserialize, Serialize};

/// Severity of a diagnostic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DiagnosticLevel {
    /// Invalid code that will fail to compile.
    #[serde(alias = "error")]
    Error,
    /// Code that works but may have issues.
    #[serde(alias = "warning")]
    Warning,
    /// Informational message.
    #[serde(alias = "info")]
    Info,
}

impl DiagnosticLevel {
    /// Lowercase name used in tool output.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Error => "error",
            Self::Warning => "warning",
            Self::Info => "info",
        }
    }
}

impl std::fmt::Display for DiagnosticLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A 1-indexed line/column position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Position {
    /// Line number (1-indexed).
    pub line: u32,
    /// Column number (1-indexed).
    pub column: u32,
}

/// A source range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Span {
    /// Start of the range.
    pub start: Position,
    /// End of the range.
    pub end: Position,
}

/// A structured issue reported by the analyzer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Diagnostic {
    /// Severity.
    pub level: DiagnosticLevel,
    /// What is wrong.
    pub message: String,
    /// Where it is wrong, when known.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub span: Option<Span>,
    /// Additional context.
    #[serde(default)]
    pub notes: Vec<String>,
    /// Suggested fix.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub help: Option<String>,
}

/// Result of expanding macros in a source file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Expansion {
    /// The expanded source.
    pub code: String,
    /// Diagnostics produced during expansion.
    #[serde(default)]
    pub diagnostics: Vec<Diagnostic>,
}

impl Expansion {
    /// Whether any error-level diagnostic was produced.
    pub fn has_errors(&self) -> bool {
        self.diagnostics
            .iter()
            .any(|d| d.level == DiagnosticLevel::Error)
    }
}

/// Options forwarded to the analyzer on expansion.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExpandOptions {}

/// A `@derive` macro listed in the manifest.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MacroEntry {
    /// Name as used inside `@derive(...)`.
    pub name: String,
    /// Macro kind, e.g. `derive`.
    #[serde(default)]
    pub kind: String,
    /// What the macro does.
    #[serde(default)]
    pub description: String,
    /// Package providing the macro.
    #[serde(default)]
    pub package: String,
}

/// A field decorator listed in the manifest.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DecoratorEntry {
    /// Module defining the decorator.
    #[serde(default)]
    pub module: String,
    /// Exported decorator name.
    pub export: String,
    /// Decorator kind, e.g. `field`.
    #[serde(default)]
    pub kind: String,
    /// Documentation for the decorator.
    #[serde(default)]
    pub docs: String,
}

/// All macros and decorators the analyzer knows about.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MacroManifest {
    /// Manifest format version.
    #[serde(default)]
    pub version: u32,
    /// Available `@derive` macros.
    #[serde(default)]
    pub macros: Vec<MacroEntry>,
    /// Available field decorators.
    #[serde(default)]
    pub decorators: Vec<DecoratorEntry>,
}

impl MacroManifest {
    /// Finds a macro by name, case-insensitively.
    pub fn find_macro(&self, name: &str) -> Option<&MacroEntry> {
        self.macros.iter().find(|m| m.name.eq_ignore_ascii_case(name))
    }

    /// Finds a decorator by export name, case-insensitively.
    pub fn find_decorator(&self, name: &str) -> Option<&DecoratorEntry> {
        self.decorators
            .iter()
            .find(|d| d.export.eq_ignore_ascii_case(name))
    }
}
