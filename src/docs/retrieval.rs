//! Retrieval facade used by the `get-documentation` tool.
//!
//! Each query is resolved by staged lookup first, then by the top ranked
//! section, and finally reported as not found. Misses are data, not errors.

use tracing::debug;

use super::chunk::{RenderedDoc, expand};
use super::{Catalog, lookup, rank};

/// Outcome for a single documentation query.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Retrieved {
    /// A section matched and was rendered.
    Found(RenderedDoc),
    /// Nothing matched the query.
    NotFound {
        /// The query exactly as the client sent it.
        query: String,
    },
}

impl Retrieved {
    /// The rendered document, if one was found.
    pub fn doc(&self) -> Option<&RenderedDoc> {
        match self {
            Self::Found(doc) => Some(doc),
            Self::NotFound { .. } => None,
        }
    }
}

/// Retrieves one entry per query, in query order.
pub fn get<I, Q>(catalog: &Catalog, queries: I) -> Vec<Retrieved>
where
    I: IntoIterator<Item = Q>,
    Q: AsRef<str>,
{
    queries
        .into_iter()
        .map(|query| get_one(catalog, query.as_ref()))
        .collect()
}

/// Retrieves a single query.
pub fn get_one(catalog: &Catalog, query: &str) -> Retrieved {
    let sections = catalog.sections();

    let section = lookup::resolve(sections, query).or_else(|| {
        let best = rank::rank(sections, query).into_iter().next();
        if let Some(section) = best {
            debug!(query, id = %section.id, "no direct match, using top ranked section");
        }
        best
    });

    match section {
        Some(section) => Retrieved::Found(expand(catalog, section)),
        None => {
            debug!(query, "no documentation matched");
            Retrieved::NotFound {
                query: query.to_string(),
            }
        }
    }
}
