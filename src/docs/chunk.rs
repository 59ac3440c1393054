//! Rendering of sections, including chunked parents.
//!
//! A chunked parent is served as its first chunk plus a list of the
//! remaining chunk ids, so clients can fetch the rest one by one.

use serde::Serialize;

use super::{Catalog, Section};

/// Body used when a chunked parent's first chunk is missing from the catalog.
pub const CHUNK_NOT_FOUND: &str = "Chunked content not found.";

/// A further chunk the client may request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChunkRef {
    /// Chunk id, usable as a `get-documentation` query.
    pub id: String,
    /// Chunk title without the repeated parent title prefix.
    pub label: String,
}

/// A section ready to be shown to a client.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RenderedDoc {
    /// Id of the section that was requested.
    pub id: String,
    /// Title of the section that was requested.
    pub heading: String,
    /// Text to show under the heading.
    pub body: String,
    /// Chunks after the first one, in order. Empty for plain sections.
    pub remaining: Vec<ChunkRef>,
}

/// Renders `section`, pulling chunk content from `catalog` when needed.
pub fn expand(catalog: &Catalog, section: &Section) -> RenderedDoc {
    let mut doc = RenderedDoc {
        id: section.id.clone(),
        heading: section.title.clone(),
        body: String::new(),
        remaining: Vec::new(),
    };

    let Some((first, rest)) = section
        .chunk_ids
        .split_first()
        .filter(|_| section.is_chunked)
    else {
        doc.body = section.content.clone().unwrap_or_default();
        return doc;
    };

    let Some(first_chunk) = catalog.get_by_id(first) else {
        doc.body = CHUNK_NOT_FOUND.to_string();
        return doc;
    };

    doc.body = first_chunk.content.clone().unwrap_or_default();
    doc.remaining = rest
        .iter()
        .filter_map(|id| catalog.get_by_id(id))
        .map(|chunk| ChunkRef {
            id: chunk.id.clone(),
            label: chunk_label(&section.title, &chunk.title),
        })
        .collect();
    doc
}

/// Strips a leading `"{parent}: "` from a chunk title.
fn chunk_label(parent_title: &str, chunk_title: &str) -> String {
    chunk_title
        .strip_prefix(parent_title)
        .and_then(|rest| rest.strip_prefix(": "))
        .unwrap_or(chunk_title)
        .to_string()
}
