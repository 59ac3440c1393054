//! Documentation catalog loading.
//!
//! The catalog is read once at startup from `<docs-root>/sections.json` and
//! the markdown bodies next to it. Missing or malformed data never aborts the
//! server: a bad manifest yields an empty catalog, a missing body yields a
//! placeholder naming the missing file.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use tracing::{info, warn};

use crate::error::CatalogError;

use super::{Section, normalize};

/// File name of the manifest inside the documentation root.
pub const MANIFEST_FILE: &str = "sections.json";

/// Immutable snapshot of all documentation sections.
///
/// Built once and shared by reference; nothing mutates it afterwards.
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    sections: Vec<Section>,
    by_id: HashMap<String, usize>,
}

impl Catalog {
    /// Loads the catalog from a documentation root.
    ///
    /// Never fails. Manifest problems are reported through `tracing` and
    /// produce an empty catalog so the server keeps running without docs.
    pub fn load(docs_root: impl AsRef<Path>) -> Self {
        Self::try_load(docs_root).unwrap_or_else(|err| {
            warn!(
                error = %err,
                "continuing without documentation; run the docs extraction build to generate it"
            );
            Self::default()
        })
    }

    /// Loads the catalog, failing when the manifest is missing or malformed.
    ///
    /// Missing body files still only produce placeholders.
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::Catalog`] when the manifest cannot be read or parsed.
    pub fn try_load(docs_root: impl AsRef<Path>) -> crate::Result<Self> {
        let docs_root = docs_root.as_ref();
        let records = read_manifest(docs_root)?;
        let catalog = Self::from_sections(attach_bodies(docs_root, records));
        info!(
            docs_root = %docs_root.display(),
            sections = catalog.len(),
            "loaded documentation catalog"
        );
        Ok(catalog)
    }

    /// Builds a catalog from records that already carry their content.
    ///
    /// Records whose id was already seen are dropped so ids stay unique.
    pub fn from_sections(records: impl IntoIterator<Item = Section>) -> Self {
        let mut sections = Vec::new();
        let mut by_id = HashMap::new();

        for section in records {
            if by_id.contains_key(&section.id) {
                warn!(id = %section.id, "dropping duplicate documentation section");
                continue;
            }
            by_id.insert(section.id.clone(), sections.len());
            sections.push(section);
        }

        Self { sections, by_id }
    }

    /// All sections in manifest order, chunks included.
    pub fn sections(&self) -> &[Section] {
        &self.sections
    }

    /// Looks up a section by its exact id.
    pub fn get_by_id(&self, id: &str) -> Option<&Section> {
        self.by_id.get(id).map(|&idx| &self.sections[idx])
    }

    /// Sections that are not chunks of another section.
    pub fn top_level(&self) -> impl Iterator<Item = &Section> {
        self.sections.iter().filter(|s| !s.is_chunk())
    }

    /// Sections whose category slug or category title matches, case-folded.
    pub fn by_category(&self, category: &str) -> Vec<&Section> {
        let wanted = normalize(category);
        self.sections
            .iter()
            .filter(|s| normalize(&s.category) == wanted || normalize(&s.category_title) == wanted)
            .collect()
    }

    /// Number of sections, chunks included.
    pub fn len(&self) -> usize {
        self.sections.len()
    }

    /// Whether the catalog has no sections at all.
    pub fn is_empty(&self) -> bool {
        self.sections.is_empty()
    }
}

/// Reads and parses the manifest without touching body files.
///
/// # Errors
///
/// Returns [`CatalogError`] when the manifest is missing, unreadable or not a
/// JSON array of section records.
pub fn read_manifest(docs_root: &Path) -> Result<Vec<Section>, CatalogError> {
    let path = docs_root.join(MANIFEST_FILE);
    let raw = match std::fs::read_to_string(&path) {
        Ok(raw) => raw,
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
            return Err(CatalogError::ManifestMissing(path));
        }
        Err(source) => return Err(CatalogError::ManifestRead { path, source }),
    };

    serde_json::from_str(&raw).map_err(|source| CatalogError::ManifestParse { path, source })
}

/// Fills in `content` for every non-chunked record.
fn attach_bodies(docs_root: &Path, mut records: Vec<Section>) -> Vec<Section> {
    for section in records.iter_mut().filter(|s| !s.is_chunked) {
        section.content = Some(read_body(docs_root, &section.path));
    }
    records
}

fn read_body(docs_root: &Path, relative: &str) -> String {
    let path: PathBuf = docs_root.join(relative);
    match std::fs::read_to_string(&path) {
        Ok(body) => body,
        Err(err) => {
            warn!(path = %path.display(), error = %err, "documentation body unavailable");
            missing_body_placeholder(relative)
        }
    }
}

/// Placeholder content for a section whose body file is missing.
pub fn missing_body_placeholder(relative: &str) -> String {
    format!("Documentation file not found: {relative}")
}
