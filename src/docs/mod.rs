//! Documentation retrieval engine.
//!
//! This module owns the in-memory documentation catalog and everything that
//! answers questions about it: staged lookup, weighted ranking, chunk
//! reassembly and the retrieval facade that ties them together.
//!
//! # Architecture
//!
//! - `catalog`: loads `sections.json` and body files into an immutable snapshot
//! - `lookup`: exact and partial matching on id and title
//! - `rank`: weighted keyword scoring over all sections
//! - `chunk`: renders chunked parents as first chunk plus a manifest of the rest
//! - `retrieval`: per-query lookup, ranking fallback and chunk expansion
//!
//! # Usage
//!
//! ```ignore
//! use macroforge_mcp::docs::{Catalog, retrieval};
//!
//! let catalog = Catalog::load("docs");
//! for entry in retrieval::get(&catalog, ["debug", "serialize"]) {
//!     println!("{entry:?}");
//! }
//! ```

pub mod catalog;
pub mod chunk;
pub mod lookup;
pub mod rank;
pub mod retrieval;

use serde::{Deserialize, Serialize};

pub use catalog::Catalog;
pub use chunk::{ChunkRef, RenderedDoc};
pub use retrieval::Retrieved;

/// A documentation unit as listed in the manifest.
///
/// Chunked parents carry `chunk_ids` and no content of their own; their
/// chunks are regular records with `parent_id` set.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Section {
    /// Unique identifier (e.g. `debug`, `vite-plugin/overview`).
    pub id: String,
    /// Human-readable title.
    pub title: String,
    /// Category slug.
    #[serde(default)]
    pub category: String,
    /// Category display name.
    #[serde(default, alias = "categoryTitle")]
    pub category_title: String,
    /// Body location relative to the documentation root.
    #[serde(default)]
    pub path: String,
    /// Comma-separated keyword hints.
    #[serde(default, alias = "useCases")]
    pub use_cases: String,
    /// Body text. Unset for chunked parents.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    /// Whether this record is split into chunks.
    #[serde(default, alias = "isChunked")]
    pub is_chunked: bool,
    /// Parent section id, only on chunk records.
    #[serde(default, alias = "parentId", skip_serializing_if = "Option::is_none")]
    pub parent_id: Option<String>,
    /// Ordered chunk ids, only on chunked parents.
    #[serde(default, alias = "chunkIds", skip_serializing_if = "Vec::is_empty")]
    pub chunk_ids: Vec<String>,
}

impl Section {
    /// Whether this section is a chunk of some other section.
    pub fn is_chunk(&self) -> bool {
        self.parent_id.is_some()
    }

    /// Whether this section must be rendered through its chunks.
    pub fn has_chunks(&self) -> bool {
        self.is_chunked && !self.chunk_ids.is_empty()
    }
}

/// Case-folds and trims a query or field for comparison.
pub(crate) fn normalize(text: &str) -> String {
    text.trim().to_lowercase()
}
