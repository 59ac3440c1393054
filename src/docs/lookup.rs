//! Staged section lookup by id or title.
//!
//! Stages run in order and the first stage with a match wins:
//! exact id, exact title, id containing the query, title containing the query.
//! Within a stage the first section in catalog order is returned.

use super::{Section, normalize};

type Stage = fn(&Section, &str) -> bool;

const STAGES: [Stage; 4] = [exact_id, exact_title, partial_id, partial_title];

fn exact_id(section: &Section, query: &str) -> bool {
    section.id.to_lowercase() == query
}

fn exact_title(section: &Section, query: &str) -> bool {
    section.title.to_lowercase() == query
}

fn partial_id(section: &Section, query: &str) -> bool {
    section.id.to_lowercase().contains(query)
}

fn partial_title(section: &Section, query: &str) -> bool {
    section.title.to_lowercase().contains(query)
}

/// Resolves a free-text query to at most one section.
///
/// Returns `None` for blank queries.
pub fn resolve<'a>(sections: &'a [Section], query: &str) -> Option<&'a Section> {
    let query = normalize(query);
    if query.is_empty() {
        return None;
    }

    STAGES
        .iter()
        .find_map(|stage| sections.iter().find(|s| stage(s, &query)))
}

/// Resolves several queries, skipping misses and never returning a section twice.
///
/// Order follows the first query that matched each section.
pub fn resolve_many<'a, Q>(sections: &'a [Section], queries: &[Q]) -> Vec<&'a Section>
where
    Q: AsRef<str>,
{
    let mut found: Vec<&Section> = Vec::new();
    for section in queries.iter().filter_map(|q| resolve(sections, q.as_ref())) {
        if !found.iter().any(|f| std::ptr::eq(*f, section)) {
            found.push(section);
        }
    }
    found
}
