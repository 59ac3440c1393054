//! Common test helpers and utilities.

#![allow(dead_code)]

pub mod fake_analyzer;
pub mod temp_docs;

use std::path::PathBuf;

use rmcp::model::{CallToolResult, RawContent};

// Re-export for convenience
#[allow(unused_imports)]
pub use fake_analyzer::FakeAnalyzer;
#[allow(unused_imports)]
pub use temp_docs::TestDocs;

/// Helper to get the fixture documentation root
pub fn fixture_path() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures/docs")
}

/// Extracts the single text payload of a tool result
/// ## Panics
/// Panics if the result is an error or carries no text content
pub fn text_of(result: &CallToolResult) -> &str {
    // CallToolResult::success() sets is_error to Some(false)
    assert_eq!(result.is_error, Some(false), "Should not be an error");
    assert_eq!(result.content.len(), 1, "Should have exactly one content item");

    // Content is Annotated<RawContent>, need to access the raw field
    match &result.content[0].raw {
        RawContent::Text(text_content) => &text_content.text,
        other => panic!("Expected Text content, got: {other:?}"),
    }
}
