//! Analyzer backed by an external executable.
//!
//! The executable is invoked once per request:
//!
//! - `<command> [args] expand --json --filename <F> --options <JSON>` with the
//!   source on stdin, printing `{"code": ..., "diagnostics": [...]}`
//! - `<command> [args] manifest --json`, printing the macro manifest
//!
//! A command that cannot be found is reported as unavailable; anything that
//! goes wrong after the process starts is a failure.
//!
//! # Example
//!
//! ```ignore
//! use macroforge_mcp::analyzer::ProcessAnalyzer;
//! use std::time::Duration;
//!
//! let analyzer = ProcessAnalyzer::builder()
//!     .command("macroforge")
//!     .timeout(Duration::from_secs(10))
//!     .build();
//! ```

use std::path::Path;
use std::process::Stdio;
use std::time::Duration;

use futures::future::{BoxFuture, FutureExt};
use futures::io::AsyncWriteExt;
use tracing::debug;

use crate::error::AnalyzerError;

use super::types::{ExpandOptions, Expansion, MacroManifest};
use super::{Analyzer, AnalyzerResult};

/// Configuration for the analyzer process.
#[derive(Debug, Clone)]
pub struct ProcessAnalyzerConfig {
    /// Executable to run.
    pub command: String,
    /// Arguments placed before the subcommand.
    pub args: Vec<String>,
    /// Upper bound on a single invocation.
    pub timeout: Duration,
}

impl Default for ProcessAnalyzerConfig {
    fn default() -> Self {
        Self {
            command: "macroforge".to_string(),
            args: Vec::new(),
            timeout: Duration::from_secs(30),
        }
    }
}

/// Builder for [`ProcessAnalyzer`].
#[derive(Debug, Default)]
pub struct ProcessAnalyzerBuilder {
    config: ProcessAnalyzerConfig,
}

impl ProcessAnalyzerBuilder {
    /// Creates a new builder with default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the analyzer executable.
    #[must_use]
    pub fn command(mut self, command: impl Into<String>) -> Self {
        self.config.command = command.into();
        self
    }

    /// Sets the arguments passed before every subcommand.
    #[must_use]
    pub fn args(mut self, args: impl IntoIterator<Item = impl Into<String>>) -> Self {
        self.config.args = args.into_iter().map(Into::into).collect();
        self
    }

    /// Sets the per-invocation timeout.
    #[must_use]
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.config.timeout = timeout;
        self
    }

    /// Builds the analyzer. No process is started until the first call.
    pub fn build(self) -> ProcessAnalyzer {
        ProcessAnalyzer {
            config: self.config,
        }
    }
}

/// Analyzer that shells out to the Macroforge executable.
#[derive(Debug, Clone)]
pub struct ProcessAnalyzer {
    config: ProcessAnalyzerConfig,
}

impl ProcessAnalyzer {
    /// Returns a builder with default configuration.
    pub fn builder() -> ProcessAnalyzerBuilder {
        ProcessAnalyzerBuilder::new()
    }

    /// The active configuration.
    pub fn config(&self) -> &ProcessAnalyzerConfig {
        &self.config
    }

    /// Runs the analyzer with `subcommand`, feeding `input` on stdin, and
    /// returns its stdout.
    async fn run(&self, subcommand: &[&str], input: Option<&[u8]>) -> AnalyzerResult<Vec<u8>> {
        let command = &self.config.command;
        debug!(command = %command, subcommand = ?subcommand, "invoking analyzer");

        let mut cmd = async_process::Command::new(command);
        cmd.args(&self.config.args)
            .args(subcommand)
            .stdin(if input.is_some() {
                Stdio::piped()
            } else {
                Stdio::null()
            })
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true);

        let mut child = cmd.spawn().map_err(|source| {
            if source.kind() == std::io::ErrorKind::NotFound {
                AnalyzerError::Unavailable(format!("'{command}' not found"))
            } else {
                AnalyzerError::Spawn {
                    command: command.clone(),
                    source,
                }
            }
        })?;

        let stdin = child.stdin.take();
        let feed = async move {
            if let (Some(mut pipe), Some(bytes)) = (stdin, input) {
                pipe.write_all(bytes).await?;
                pipe.close().await?;
            }
            Ok::<(), std::io::Error>(())
        };

        let exchange = async {
            let (fed, output) = futures::join!(feed, child.output());
            match fed {
                // The analyzer may exit before reading all of stdin; its status says why.
                Err(err) if err.kind() != std::io::ErrorKind::BrokenPipe => Err(err),
                _ => output,
            }
        };

        let output = tokio::time::timeout(self.config.timeout, exchange)
            .await
            .map_err(|_| AnalyzerError::Timeout(self.config.timeout))??;

        if !output.status.success() {
            return Err(AnalyzerError::Failed {
                status: output.status.to_string(),
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }

        Ok(output.stdout)
    }
}

impl Analyzer for ProcessAnalyzer {
    fn is_available(&self) -> bool {
        command_exists(&self.config.command)
    }

    fn expand<'a>(
        &'a self,
        source: &'a str,
        filename: &'a str,
        options: &'a ExpandOptions,
    ) -> BoxFuture<'a, AnalyzerResult<Expansion>> {
        async move {
            let options = serde_json::to_string(options).unwrap_or_else(|_| "{}".to_string());
            let stdout = self
                .run(
                    &[
                        "expand",
                        "--json",
                        "--filename",
                        filename,
                        "--options",
                        options.as_str(),
                    ],
                    Some(source.as_bytes()),
                )
                .await?;
            Ok(serde_json::from_slice(&stdout)?)
        }
        .boxed()
    }

    fn manifest(&self) -> BoxFuture<'_, AnalyzerResult<MacroManifest>> {
        async move {
            let stdout = self.run(&["manifest", "--json"], None).await?;
            Ok(serde_json::from_slice(&stdout)?)
        }
        .boxed()
    }
}

/// Whether `command` names an existing file or an executable on `PATH`.
fn command_exists(command: &str) -> bool {
    let path = Path::new(command);
    if path.components().count() > 1 {
        return path.is_file();
    }

    std::env::var_os("PATH").is_some_and(|paths| {
        std::env::split_paths(&paths).any(|dir| {
            let candidate = dir.join(command);
            candidate.is_file() || (cfg!(windows) && candidate.with_extension("exe").is_file())
        })
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analyzer::DiagnosticLevel;

    fn shell(script: &str) -> ProcessAnalyzer {
        ProcessAnalyzer::builder()
            .command("sh")
            .args(["-c", script, "macroforge"])
            .timeout(Duration::from_secs(5))
            .build()
    }

    #[test]
    fn test_builder_defaults() {
        let analyzer = ProcessAnalyzer::builder().build();
        assert_eq!(analyzer.config().command, "macroforge");
        assert!(analyzer.config().args.is_empty());
        assert_eq!(analyzer.config().timeout, Duration::from_secs(30));
    }

    #[tokio::test]
    async fn test_missing_command_is_unavailable() {
        let analyzer = ProcessAnalyzer::builder()
            .command("macroforge-analyzer-that-does-not-exist")
            .build();
        assert!(!analyzer.is_available());

        let err = analyzer
            .expand("class A {}", "input.ts", &ExpandOptions::default())
            .await
            .unwrap_err();
        assert!(err.is_unavailable(), "unexpected error: {err}");

        let err = analyzer.manifest().await.unwrap_err();
        assert!(err.is_unavailable());
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_expand_parses_stdout() {
        let analyzer = shell(
            r#"cat >/dev/null; echo '{"code":"expanded","diagnostics":[{"level":"Warning","message":"careful","notes":["n"]}]}'"#,
        );
        assert!(analyzer.is_available());

        let expansion = analyzer
            .expand("class A {}", "input.ts", &ExpandOptions::default())
            .await
            .unwrap();
        assert_eq!(expansion.code, "expanded");
        assert_eq!(expansion.diagnostics[0].level, DiagnosticLevel::Warning);
        assert_eq!(expansion.diagnostics[0].notes, vec!["n".to_string()]);
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_source_is_sent_on_stdin() {
        let analyzer = shell(r#"printf '{"code":"%s"}' "$(cat)""#);
        let expansion = analyzer
            .expand("hello", "input.ts", &ExpandOptions::default())
            .await
            .unwrap();
        assert_eq!(expansion.code, "hello");
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_nonzero_exit_is_failure() {
        let analyzer = shell("echo 'parse error' >&2; exit 3");
        let err = analyzer.manifest().await.unwrap_err();
        match err {
            AnalyzerError::Failed { stderr, .. } => assert_eq!(stderr, "parse error"),
            other => panic!("expected failure, got {other:?}"),
        }
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_malformed_stdout_is_invalid_output() {
        let analyzer = shell("echo not-json");
        let err = analyzer.manifest().await.unwrap_err();
        assert!(matches!(err, AnalyzerError::InvalidOutput(_)));
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_slow_analyzer_times_out() {
        let analyzer = ProcessAnalyzer::builder()
            .command("sh")
            .args(["-c", "sleep 5", "macroforge"])
            .timeout(Duration::from_millis(100))
            .build();
        let err = analyzer.manifest().await.unwrap_err();
        assert!(matches!(err, AnalyzerError::Timeout(_)));
    }
}
