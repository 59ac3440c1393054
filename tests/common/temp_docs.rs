use std::path::{Path, PathBuf};

use macroforge_mcp::docs::Catalog;
use serde_json::{Value, json};
use tempfile::TempDir;

/// Documentation root written to a temporary directory
pub struct TestDocs {
    /// Temporary folder holding `sections.json` and the bodies
    pub root: TempDir,
}

impl TestDocs {
    /// Creates a new builder for constructing a documentation root
    pub fn builder() -> TestDocsBuilder {
        TestDocsBuilder::new()
    }

    /// Path of the documentation root
    pub fn path(&self) -> &Path {
        self.root.path()
    }

    /// Loads the catalog from this root
    pub fn load(&self) -> Catalog {
        Catalog::load(self.root.path())
    }
}

/// Builder for documentation roots with a manifest and body files
pub struct TestDocsBuilder {
    records: Vec<Value>,
    bodies: Vec<(PathBuf, String)>,
    raw_manifest: Option<String>,
}

impl TestDocsBuilder {
    /// Creates a new builder
    pub fn new() -> Self {
        Self {
            records: Vec::new(),
            bodies: Vec::new(),
            raw_manifest: None,
        }
    }

    /// Adds a plain section whose body lives at `<id>.md`
    #[must_use]
    pub fn section(mut self, id: &str, title: &str, use_cases: &str, body: &str) -> Self {
        let path = format!("{id}.md");
        self.records.push(json!({
            "id": id,
            "title": title,
            "category": "guides",
            "categoryTitle": "Guides",
            "path": path,
            "useCases": use_cases,
        }));
        self.bodies.push((PathBuf::from(path), body.to_string()));
        self
    }

    /// Adds a manifest record as-is, without writing a body
    #[must_use]
    pub fn record(mut self, record: Value) -> Self {
        self.records.push(record);
        self
    }

    /// Writes a body file at `path` relative to the root
    #[must_use]
    pub fn body(mut self, path: &str, content: &str) -> Self {
        self.bodies.push((PathBuf::from(path), content.to_string()));
        self
    }

    /// Replaces the generated manifest with arbitrary text
    #[must_use]
    pub fn raw_manifest(mut self, manifest: &str) -> Self {
        self.raw_manifest = Some(manifest.to_string());
        self
    }

    /// Writes everything to a fresh temporary directory
    /// ## Panics
    /// Panics if the directory or files cannot be written
    pub fn build(self) -> TestDocs {
        let root = TempDir::new().expect("Failed to create temp directory");

        let manifest = self.raw_manifest.unwrap_or_else(|| {
            serde_json::to_string_pretty(&Value::Array(self.records))
                .expect("manifest serializes")
        });
        std::fs::write(root.path().join("sections.json"), manifest).expect("write manifest");

        for (path, content) in &self.bodies {
            let abs = root.path().join(path);
            std::fs::create_dir_all(abs.parent().unwrap()).unwrap();
            std::fs::write(&abs, content).unwrap();
        }

        TestDocs { root }
    }
}

impl Default for TestDocsBuilder {
    fn default() -> Self {
        Self::new()
    }
}
