use std::sync::{Arc, Mutex};

use futures::future::{self, BoxFuture, FutureExt};
use macroforge_mcp::analyzer::{
    Analyzer, AnalyzerError, AnalyzerResult, ExpandOptions, Expansion, MacroManifest,
};

/// Analyzer double returning canned results and recording calls
#[derive(Default)]
pub struct FakeAnalyzer {
    expansion: Option<Expansion>,
    manifest: Option<MacroManifest>,
    failure: Option<String>,
    /// Filenames passed to `expand`, in call order
    pub expanded_files: Arc<Mutex<Vec<String>>>,
}

impl FakeAnalyzer {
    /// Answers every `expand` call with `expansion`
    pub fn with_expansion(expansion: Expansion) -> Self {
        Self {
            expansion: Some(expansion),
            ..Self::default()
        }
    }

    /// Answers every `manifest` call with `manifest`
    pub fn with_manifest(manifest: MacroManifest) -> Self {
        Self {
            manifest: Some(manifest),
            ..Self::default()
        }
    }

    /// Fails every call as if the analyzer exited with status 1
    pub fn failing(stderr: &str) -> Self {
        Self {
            failure: Some(stderr.to_string()),
            ..Self::default()
        }
    }

    fn error(&self) -> AnalyzerError {
        match &self.failure {
            Some(stderr) => AnalyzerError::Failed {
                status: "exit status: 1".to_string(),
                stderr: stderr.clone(),
            },
            None => AnalyzerError::Unavailable("not scripted".to_string()),
        }
    }
}

impl Analyzer for FakeAnalyzer {
    fn is_available(&self) -> bool {
        true
    }

    fn expand<'a>(
        &'a self,
        _source: &'a str,
        filename: &'a str,
        _options: &'a ExpandOptions,
    ) -> BoxFuture<'a, AnalyzerResult<Expansion>> {
        self.expanded_files
            .lock()
            .unwrap()
            .push(filename.to_string());
        let result = self.expansion.clone().ok_or_else(|| self.error());
        future::ready(result).boxed()
    }

    fn manifest(&self) -> BoxFuture<'_, AnalyzerResult<MacroManifest>> {
        let result = self.manifest.clone().ok_or_else(|| self.error());
        future::ready(result).boxed()
    }
}
