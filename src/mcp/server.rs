//! MCP server implementation for macroforge-mcp.
//!
//! This module contains the `MacroforgeMcp` struct that implements the MCP
//! server: documentation retrieval over the in-memory catalog plus code
//! validation and expansion through the optional analyzer.
use std::fmt::Write as _;
use std::sync::Arc;

use rmcp::handler::server::tool::ToolRouter;
use rmcp::{
    ErrorData as McpError, ServerHandler,
    handler::server::wrapper::Parameters,
    model::{CallToolResult, Content, Implementation, ProtocolVersion, ServerCapabilities, ServerInfo},
    tool, tool_handler, tool_router,
};
use tracing::{debug, warn};

use crate::analyzer::{Analyzer, AnalyzerError, ExpandOptions, Expansion, MacroManifest};
use crate::docs::{Catalog, RenderedDoc, Retrieved, Section, retrieval};

use super::tools::{
    AutofixerReport, CodeParams, GetDocumentationParams, ListSectionsParams, MacroInfoParams,
};

/// Shown by `macroforge-autofixer` when the analyzer is not installed.
pub const AUTOFIXER_UNAVAILABLE: &str =
    "Native Macroforge bindings not available. Install @macroforge/core.";
/// Shown by `expand-code` when the analyzer is not installed.
pub const EXPAND_UNAVAILABLE: &str = "Native Macroforge bindings not available. Install @macroforge/core to enable code expansion.";
/// Shown by `get-macro-info` when the analyzer is not installed.
pub const MACRO_INFO_UNAVAILABLE: &str = "Native Macroforge bindings not available. Install @macroforge/core to access macro documentation.";

/// Separator placed between entries of a multi-section response.
const ENTRY_DIVIDER: &str = "\n\n---\n\n";

/// MCP server for Macroforge documentation and code assistance.
#[derive(Clone)]
pub struct MacroforgeMcp {
    /// Documentation snapshot, loaded once at startup.
    catalog: Arc<Catalog>,
    /// Optional macro analyzer.
    analyzer: Arc<dyn Analyzer>,
    #[allow(dead_code)]
    tool_router: ToolRouter<MacroforgeMcp>,
}

impl MacroforgeMcp {
    /// Creates a new `MacroforgeMcp` instance.
    ///
    /// # Arguments
    ///
    /// * `catalog` - Documentation catalog to serve.
    /// * `analyzer` - Analyzer used by the code tools; may be unavailable.
    pub fn new(catalog: Catalog, analyzer: impl Analyzer + 'static) -> Self {
        Self {
            catalog: Arc::new(catalog),
            analyzer: Arc::new(analyzer),
            tool_router: Self::tool_router(),
        }
    }

    /// Returns the documentation catalog.
    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }
}

/// Formats the `list-sections` listing.
fn format_section_list<'a>(sections: impl IntoIterator<Item = &'a Section>) -> String {
    let lines: Vec<String> = sections
        .into_iter()
        .map(|s| {
            format!(
                "* title: [{}], use_cases: [{}], path: [{}], category: [{}]",
                s.title, s.use_cases, s.path, s.category_title
            )
        })
        .collect();

    if lines.is_empty() {
        return "No documentation sections available.".to_string();
    }

    format!(
        "Available Macroforge documentation sections:\n\n{}",
        lines.join("\n")
    )
}

/// Formats one rendered section, listing further chunks when present.
fn format_rendered_doc(doc: &RenderedDoc) -> String {
    let mut text = format!("# {}\n\n{}", doc.heading, doc.body);

    if !doc.remaining.is_empty() {
        text.push_str(ENTRY_DIVIDER);
        text.push_str("**This section has additional chunks available:**\n");
        for chunk in &doc.remaining {
            let _ = writeln!(text, "- `{}`: {}", chunk.id, chunk.label);
        }
        text.push_str("\nRequest specific chunks with `get-documentation` for more details.");
    }

    text
}

/// Formats the facade output as a single payload.
fn format_retrieved(results: &[Retrieved]) -> String {
    results
        .iter()
        .map(|r| match r {
            Retrieved::Found(doc) => format_rendered_doc(doc),
            Retrieved::NotFound { query } => format!("Documentation for \"{query}\" not found."),
        })
        .collect::<Vec<_>>()
        .join(ENTRY_DIVIDER)
}

/// Formats an expansion as markdown with a diagnostics list.
fn format_expansion(expansion: &Expansion) -> String {
    let mut text = format!(
        "## Expanded Code\n\n```typescript\n{}\n```",
        expansion.code
    );

    if !expansion.diagnostics.is_empty() {
        text.push_str("\n\n## Diagnostics\n\n");
        for d in &expansion.diagnostics {
            let location = d.span.map_or_else(String::new, |span| {
                format!(" (line {}, col {})", span.start.line, span.start.column)
            });
            let _ = writeln!(text, "- **[{}]**{location} {}", d.level, d.message);
            if let Some(help) = d.help.as_deref().filter(|h| !h.is_empty()) {
                let _ = writeln!(text, "  - Help: {help}");
            }
            for note in &d.notes {
                let _ = writeln!(text, "  - Note: {note}");
            }
        }
    }

    text
}

/// Formats the full macro manifest.
fn format_manifest(manifest: &MacroManifest) -> String {
    let mut text = String::from("# Macroforge Macro Manifest\n\n## Available Macros\n\n");
    for m in &manifest.macros {
        let description = non_empty_or(&m.description, "No description");
        let _ = write!(text, "### @derive({})\n{description}\n\n", m.name);
    }

    if !manifest.decorators.is_empty() {
        text.push_str("## Available Field Decorators\n\n");
        for d in &manifest.decorators {
            let docs = non_empty_or(&d.docs, "No documentation");
            let _ = write!(text, "### @{}\n{docs}\n\n", d.export);
        }
    }

    text
}

/// Formats the manifest entries matching `name`, or lists what is available.
fn format_macro_lookup(manifest: &MacroManifest, name: &str) -> String {
    let found_macro = manifest.find_macro(name);
    let found_decorator = manifest.find_decorator(name);

    if found_macro.is_none() && found_decorator.is_none() {
        let macros: Vec<_> = manifest.macros.iter().map(|m| m.name.as_str()).collect();
        let decorators: Vec<_> = manifest.decorators.iter().map(|d| d.export.as_str()).collect();
        return format!(
            "No macro or decorator found with name \"{name}\".\n\nAvailable macros: {}\nAvailable decorators: {}",
            macros.join(", "),
            decorators.join(", ")
        );
    }

    let mut text = String::new();
    if let Some(m) = found_macro {
        let _ = write!(
            text,
            "## Macro: @derive({})\n\n**Description:** {}\n**Kind:** {}\n**Package:** {}\n",
            m.name,
            non_empty_or(&m.description, "No description available"),
            m.kind,
            m.package
        );
    }
    if let Some(d) = found_decorator {
        if !text.is_empty() {
            text.push_str("\n---\n\n");
        }
        let _ = write!(
            text,
            "## Decorator: @{}\n\n**Documentation:** {}\n**Kind:** {}\n**Module:** {}\n",
            d.export,
            non_empty_or(&d.docs, "No documentation available"),
            d.kind,
            d.module
        );
    }
    text
}

fn non_empty_or<'a>(value: &'a str, fallback: &'a str) -> &'a str {
    if value.trim().is_empty() { fallback } else { value }
}

/// Text for an analyzer error: the stable install message when the analyzer
/// is missing, otherwise the failure prefixed with `context`.
fn analyzer_error_text(err: &AnalyzerError, unavailable: &str, context: &str) -> String {
    if err.is_unavailable() {
        debug!(error = %err, "analyzer unavailable");
        unavailable.to_string()
    } else {
        warn!(error = %err, "analyzer call failed");
        format!("{context}: {err}")
    }
}

/// Tool implementations for `MacroforgeMcp`.
#[tool_router]
impl MacroforgeMcp {
    /// List the top-level documentation sections.
    #[tool(
        name = "list-sections",
        description = "Lists all Macroforge documentation sections with title, use_cases, path and category. \
                       Call this FIRST for any Macroforge-related task, analyze use_cases to find relevant sections, \
                       then call get-documentation with ALL relevant section names."
    )]
    pub async fn list_sections(
        &self,
        Parameters(params): Parameters<ListSectionsParams>,
    ) -> Result<CallToolResult, McpError> {
        let text = match params.category.as_deref().filter(|c| !c.trim().is_empty()) {
            Some(category) => {
                let sections = self.catalog.by_category(category);
                if sections.is_empty() {
                    format!("No documentation sections found in category \"{category}\".")
                } else {
                    format_section_list(sections.into_iter().filter(|s| !s.is_chunk()))
                }
            }
            None => format_section_list(self.catalog.top_level()),
        };

        Ok(CallToolResult::success(vec![Content::text(text)]))
    }

    /// Retrieve documentation for one or more sections.
    #[tool(
        name = "get-documentation",
        description = "Retrieves full documentation content for Macroforge sections. Accepts a section id \
                       (e.g. \"vite-plugin\"), a title (e.g. \"Vite Plugin\") or a partial name, either as a \
                       single string or an array. Large sections return their first chunk plus the ids of the rest."
    )]
    pub async fn get_documentation(
        &self,
        Parameters(params): Parameters<GetDocumentationParams>,
    ) -> Result<CallToolResult, McpError> {
        let queries = params.section.into_queries();
        let results = retrieval::get(&self.catalog, &queries);
        Ok(CallToolResult::success(vec![Content::text(format_retrieved(&results))]))
    }

    /// Validate `@derive` usage and return JSON diagnostics.
    #[tool(
        name = "macroforge-autofixer",
        description = "Validates TypeScript code with @derive decorators using Macroforge's native validation. \
                       Returns JSON diagnostics (level, message, location, help, notes) and a summary. \
                       If require_another_tool_call_after_fixing is true, fix the issues and validate again."
    )]
    pub async fn macroforge_autofixer(
        &self,
        Parameters(params): Parameters<CodeParams>,
    ) -> Result<CallToolResult, McpError> {
        let options = ExpandOptions::default();
        let report = match self
            .analyzer
            .expand(&params.code, params.filename(), &options)
            .await
        {
            Ok(expansion) => AutofixerReport::from_expansion(&expansion),
            Err(err) => AutofixerReport::synthetic_error(analyzer_error_text(
                &err,
                AUTOFIXER_UNAVAILABLE,
                "Error during analysis",
            )),
        };

        let json = serde_json::to_string_pretty(&report).map_err(|e| {
            McpError::internal_error(format!("failed to serialize diagnostics: {e}"), None)
        })?;
        Ok(CallToolResult::success(vec![Content::text(json)]))
    }

    /// Expand macros and show the generated code.
    #[tool(
        name = "expand-code",
        description = "Expands Macroforge macros in TypeScript code and returns the transformed result, \
                       with any diagnostics and their line/column locations."
    )]
    pub async fn expand_code(
        &self,
        Parameters(params): Parameters<CodeParams>,
    ) -> Result<CallToolResult, McpError> {
        let options = ExpandOptions::default();
        let text = match self
            .analyzer
            .expand(&params.code, params.filename(), &options)
            .await
        {
            Ok(expansion) => format_expansion(&expansion),
            Err(err) => analyzer_error_text(&err, EXPAND_UNAVAILABLE, "Error expanding code"),
        };

        Ok(CallToolResult::success(vec![Content::text(text)]))
    }

    /// Describe available macros and decorators.
    #[tool(
        name = "get-macro-info",
        description = "Get documentation for Macroforge macros and field decorators. Without a name, returns the \
                       full manifest; with a name, returns info for that macro or decorator."
    )]
    pub async fn get_macro_info(
        &self,
        Parameters(params): Parameters<MacroInfoParams>,
    ) -> Result<CallToolResult, McpError> {
        let text = match self.analyzer.manifest().await {
            Ok(manifest) => match params.name.as_deref().filter(|n| !n.trim().is_empty()) {
                Some(name) => format_macro_lookup(&manifest, name.trim()),
                None => format_manifest(&manifest),
            },
            Err(err) => {
                analyzer_error_text(&err, MACRO_INFO_UNAVAILABLE, "Error getting macro info")
            }
        };

        Ok(CallToolResult::success(vec![Content::text(text)]))
    }
}

#[tool_handler]
impl ServerHandler for MacroforgeMcp {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            protocol_version: ProtocolVersion::LATEST,
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            server_info: Implementation {
                name: "macroforge-mcp".into(),
                version: env!("CARGO_PKG_VERSION").into(),
                ..Default::default()
            },
            instructions: Some(
                "Macroforge documentation and code assistance. Start with list-sections, fetch every \
                 relevant section with get-documentation, validate @derive code with \
                 macroforge-autofixer before showing it to the user, and use expand-code or \
                 get-macro-info to see what macros generate."
                    .into(),
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analyzer::{DecoratorEntry, Diagnostic, DiagnosticLevel, MacroEntry, Position, Span};
    use crate::docs::ChunkRef;

    fn manifest() -> MacroManifest {
        MacroManifest {
            version: 1,
            macros: vec![
                MacroEntry {
                    name: "Debug".to_string(),
                    kind: "derive".to_string(),
                    description: "Generates toString()".to_string(),
                    package: "@macroforge/core".to_string(),
                },
                MacroEntry {
                    name: "Clone".to_string(),
                    kind: "derive".to_string(),
                    description: String::new(),
                    package: "@macroforge/core".to_string(),
                },
            ],
            decorators: vec![DecoratorEntry {
                module: "@macroforge/core".to_string(),
                export: "serde".to_string(),
                kind: "field".to_string(),
                docs: "Field serialization options".to_string(),
            }],
        }
    }

    #[test]
    fn test_format_section_list() {
        let section = Section {
            id: "debug".to_string(),
            title: "Debug".to_string(),
            category_title: "Built-in Macros".to_string(),
            path: "builtin-macros/debug.md".to_string(),
            use_cases: "toString, debugging".to_string(),
            ..Section::default()
        };
        let text = format_section_list([&section]);
        assert!(text.starts_with("Available Macroforge documentation sections:\n\n"));
        assert!(text.contains(
            "* title: [Debug], use_cases: [toString, debugging], path: [builtin-macros/debug.md], category: [Built-in Macros]"
        ));
        assert_eq!(
            format_section_list(std::iter::empty()),
            "No documentation sections available."
        );
    }

    #[test]
    fn test_format_rendered_doc_with_chunks() {
        let doc = RenderedDoc {
            id: "serialize".to_string(),
            heading: "Serialize".to_string(),
            body: "intro".to_string(),
            remaining: vec![ChunkRef {
                id: "serialize/options".to_string(),
                label: "Options".to_string(),
            }],
        };
        let text = format_rendered_doc(&doc);
        assert!(text.starts_with("# Serialize\n\nintro\n\n---\n\n"));
        assert!(text.contains("- `serialize/options`: Options\n"));
        assert!(text.ends_with("for more details."));
    }

    #[test]
    fn test_format_retrieved_joins_with_divider() {
        let results = vec![
            Retrieved::Found(RenderedDoc {
                id: "debug".to_string(),
                heading: "Debug".to_string(),
                body: "Debug docs body".to_string(),
                remaining: vec![],
            }),
            Retrieved::NotFound {
                query: "missing-x".to_string(),
            },
        ];
        assert_eq!(
            format_retrieved(&results),
            "# Debug\n\nDebug docs body\n\n---\n\nDocumentation for \"missing-x\" not found."
        );
    }

    #[test]
    fn test_format_expansion_lists_diagnostics() {
        let expansion = Expansion {
            code: "class User {}".to_string(),
            diagnostics: vec![Diagnostic {
                level: DiagnosticLevel::Error,
                message: "unknown macro Foo".to_string(),
                span: Some(Span {
                    start: Position { line: 2, column: 5 },
                    end: Position { line: 2, column: 8 },
                }),
                notes: vec!["macros are case sensitive".to_string()],
                help: Some("did you mean Debug?".to_string()),
            }],
        };
        let text = format_expansion(&expansion);
        assert!(text.starts_with("## Expanded Code\n\n```typescript\nclass User {}\n```"));
        assert!(text.contains("- **[error]** (line 2, col 5) unknown macro Foo\n"));
        assert!(text.contains("  - Help: did you mean Debug?\n"));
        assert!(text.contains("  - Note: macros are case sensitive\n"));
    }

    #[test]
    fn test_format_expansion_without_diagnostics() {
        let expansion = Expansion {
            code: "x".to_string(),
            diagnostics: vec![],
        };
        assert!(!format_expansion(&expansion).contains("## Diagnostics"));
    }

    #[test]
    fn test_format_manifest_uses_fallbacks() {
        let text = format_manifest(&manifest());
        assert!(text.contains("### @derive(Debug)\nGenerates toString()\n\n"));
        assert!(text.contains("### @derive(Clone)\nNo description\n\n"));
        assert!(text.contains("## Available Field Decorators"));
        assert!(text.contains("### @serde\nField serialization options"));
    }

    #[test]
    fn test_format_macro_lookup() {
        let manifest = manifest();
        let text = format_macro_lookup(&manifest, "debug");
        assert!(text.starts_with("## Macro: @derive(Debug)"));
        assert!(text.contains("**Package:** @macroforge/core"));

        let text = format_macro_lookup(&manifest, "Serde");
        assert!(text.starts_with("## Decorator: @serde"));

        let text = format_macro_lookup(&manifest, "Hash");
        assert!(text.contains("No macro or decorator found with name \"Hash\"."));
        assert!(text.contains("Available macros: Debug, Clone"));
        assert!(text.contains("Available decorators: serde"));
    }

    #[test]
    fn test_analyzer_error_text() {
        let unavailable = AnalyzerError::Unavailable("missing".to_string());
        assert_eq!(
            analyzer_error_text(&unavailable, EXPAND_UNAVAILABLE, "Error expanding code"),
            EXPAND_UNAVAILABLE
        );

        let failed = AnalyzerError::Failed {
            status: "exit status: 2".to_string(),
            stderr: "panic".to_string(),
        };
        assert_eq!(
            analyzer_error_text(&failed, EXPAND_UNAVAILABLE, "Error expanding code"),
            "Error expanding code: analyzer exited with exit status: 2: panic"
        );
    }
}
