//! Compression orchestrator
//!
//! Decides whether a command's output warrants compression, persists the raw
//! output before the oracle runs so it survives oracle failure, and merges
//! the digest or falls back to the full output. Compression failure never
//! hides real output.

use std::fs;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use chrono::Local;

use crate::compress::catalog;
use crate::compress::oracle::{Oracle, SummaryRequest};
use crate::exec::ExecutionResult;

/// Minimum combined line count before a verbose command is compressed
const MIN_LINES: usize = 30;

/// Final output of a request after compression was considered
#[derive(Debug, Clone)]
pub struct CompressionOutcome {
    /// The text returned to the caller
    pub output: String,
    /// Whether a digest replaced the raw output
    pub compressed: bool,
    /// Raw-output artifact, present whenever compression was attempted
    pub artifact: Option<PathBuf>,
}

impl CompressionOutcome {
    fn uncompressed(output: String) -> Self {
        Self {
            output,
            compressed: false,
            artifact: None,
        }
    }
}

/// Orchestrates output compression around a pluggable oracle
pub struct CompressionOrchestrator {
    oracle: Arc<dyn Oracle>,
    log_dir: PathBuf,
    timeout: Duration,
}

impl CompressionOrchestrator {
    /// Create an orchestrator writing artifacts under `log_dir`
    pub fn new(oracle: Arc<dyn Oracle>, log_dir: impl Into<PathBuf>, timeout: Duration) -> Self {
        Self {
            oracle,
            log_dir: log_dir.into(),
            timeout,
        }
    }

    /// Whether output should be compressed
    ///
    /// An explicit request wins in either direction; otherwise the command
    /// must be verbose-classified and the output at least [`MIN_LINES`] long.
    pub fn should_compress(command: &str, line_count: usize, force: Option<bool>) -> bool {
        match force {
            Some(forced) => forced,
            None => catalog::is_verbose(command) && line_count >= MIN_LINES,
        }
    }

    /// Produce the final output text for an execution result
    pub async fn finalize(
        &self,
        command: &str,
        result: &ExecutionResult,
        force: Option<bool>,
    ) -> CompressionOutcome {
        let combined = result.combined_output();
        let line_count = combined.lines().count();

        if !Self::should_compress(command, line_count, force) {
            return CompressionOutcome::uncompressed(combined);
        }

        // Raw output must be on disk before the oracle runs
        let artifact = match self.persist_raw(&combined) {
            Ok(path) => path,
            Err(e) => {
                tracing::warn!("Could not persist raw output, skipping compression: {}", e);
                return CompressionOutcome::uncompressed(combined);
            }
        };

        let request = SummaryRequest::new(command, result.exit_code, combined.as_str());
        let digest = tokio::time::timeout(self.timeout, self.oracle.summarize(&request)).await;

        let output = match digest {
            Ok(Ok(text)) if !text.trim().is_empty() => {
                tracing::info!(
                    "Compressed {} lines to {} for: {}",
                    line_count,
                    text.lines().count(),
                    command
                );
                format!(
                    "[compressed {} lines | exit {} | {:.2}s | full output: {}]\n{}",
                    line_count,
                    result.exit_code,
                    result.duration_secs,
                    artifact.display(),
                    text.trim_end()
                )
            }
            outcome => {
                match outcome {
                    Ok(Ok(_)) => tracing::warn!("Summarizer returned an empty digest"),
                    Ok(Err(e)) => tracing::warn!("Summarizer failed: {}", e),
                    Err(_) => tracing::warn!(
                        "Summarizer timed out after {:.0}s",
                        self.timeout.as_secs_f64()
                    ),
                }
                return CompressionOutcome {
                    output: format!(
                        "[compression failed; full output below | raw output saved: {}]\n{}",
                        artifact.display(),
                        combined
                    ),
                    compressed: false,
                    artifact: Some(artifact),
                };
            }
        };

        CompressionOutcome {
            output,
            compressed: true,
            artifact: Some(artifact),
        }
    }

    /// Write the raw output to a timestamp-named artifact
    fn persist_raw(&self, combined: &str) -> std::io::Result<PathBuf> {
        fs::create_dir_all(&self.log_dir)?;
        let name = format!(
            "command-output-{}.txt",
            Local::now().format("%Y%m%d-%H%M%S%.3f")
        );
        let path = self.log_dir.join(name);
        fs::write(&path, combined)?;
        tracing::debug!("Raw output persisted to {}", path.display());
        Ok(path)
    }
}
