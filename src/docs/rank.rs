//! Weighted keyword ranking over all sections.
//!
//! Scoring per section, starting at zero:
//!
//! | Match                                  | Points          |
//! |----------------------------------------|-----------------|
//! | whole query inside `id`                | 10              |
//! | whole query inside `title`             | 10              |
//! | each keyword inside `use_cases`        | 5 per keyword   |
//! | each keyword inside `content` (if any) | 1 per keyword   |
//!
//! Sections scoring zero are dropped. Ties keep catalog order.

use std::cmp::Reverse;

use super::{Section, normalize};

/// Points for the whole query appearing in the id.
pub const ID_WEIGHT: u32 = 10;
/// Points for the whole query appearing in the title.
pub const TITLE_WEIGHT: u32 = 10;
/// Points per keyword appearing in the use-case hints.
pub const USE_CASE_WEIGHT: u32 = 5;
/// Points per keyword appearing in the body text.
pub const CONTENT_WEIGHT: u32 = 1;

/// A section paired with its relevance score.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Scored<'a> {
    /// The matched section.
    pub section: &'a Section,
    /// Accumulated score, always positive in ranked output.
    pub score: u32,
}

/// A normalized query split into keywords.
#[derive(Debug, Clone)]
pub struct Query {
    phrase: String,
    keywords: Vec<String>,
}

impl Query {
    /// Case-folds, trims and splits `raw` on whitespace.
    pub fn new(raw: &str) -> Self {
        let phrase = normalize(raw);
        let keywords = phrase.split_whitespace().map(str::to_string).collect();
        Self { phrase, keywords }
    }

    /// Whether the query has nothing to match on.
    pub fn is_empty(&self) -> bool {
        self.phrase.is_empty()
    }

    /// Scores a single section against this query.
    pub fn score(&self, section: &Section) -> u32 {
        if self.is_empty() {
            return 0;
        }

        let mut score = 0;
        if section.id.to_lowercase().contains(&self.phrase) {
            score += ID_WEIGHT;
        }
        if section.title.to_lowercase().contains(&self.phrase) {
            score += TITLE_WEIGHT;
        }

        let use_cases = section.use_cases.to_lowercase();
        score += USE_CASE_WEIGHT * self.hits(&use_cases);

        if let Some(content) = section.content.as_deref() {
            score += CONTENT_WEIGHT * self.hits(&content.to_lowercase());
        }

        score
    }

    fn hits(&self, haystack: &str) -> u32 {
        let count = self
            .keywords
            .iter()
            .filter(|k| haystack.contains(k.as_str()))
            .count();
        u32::try_from(count).unwrap_or(u32::MAX)
    }
}

/// Scores every section and returns the positive ones, best first.
pub fn rank_scored<'a>(sections: &'a [Section], query: &str) -> Vec<Scored<'a>> {
    let query = Query::new(query);
    let mut scored: Vec<Scored<'a>> = sections
        .iter()
        .map(|section| Scored {
            section,
            score: query.score(section),
        })
        .filter(|s| s.score > 0)
        .collect();

    // Stable, so equal scores stay in catalog order.
    scored.sort_by_key(|s| Reverse(s.score));
    scored
}

/// Sections relevant to `query`, best first.
pub fn rank<'a>(sections: &'a [Section], query: &str) -> Vec<&'a Section> {
    rank_scored(sections, query)
        .into_iter()
        .map(|s| s.section)
        .collect()
}
