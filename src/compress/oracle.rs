//! Summarization oracle
//!
//! The external capability that turns large command output into a short
//! digest. The broker only defines the orchestration contract around it; the
//! summarization itself is pluggable.

use std::process::Stdio;

use anyhow::Result;
use async_trait::async_trait;
use tokio::io::AsyncWriteExt;
use tokio::process::Command;

/// Hard cap on digest length, in lines
const MAX_SUMMARY_LINES: usize = 15;

/// What the oracle is asked to summarize
#[derive(Debug, Clone)]
pub struct SummaryRequest {
    /// The command that produced the output
    pub command: String,
    /// Its exit code
    pub exit_code: i32,
    /// The full combined output
    pub output: String,
    /// Line count of the full output
    pub line_count: usize,
}

impl SummaryRequest {
    /// Build a request for a command's combined output
    pub fn new(command: impl Into<String>, exit_code: i32, output: impl Into<String>) -> Self {
        let output = output.into();
        let line_count = output.lines().count();
        Self {
            command: command.into(),
            exit_code,
            output,
            line_count,
        }
    }

    /// The fixed instruction payload handed to the oracle
    pub fn instruction_payload(&self) -> String {
        format!(
            "Summarize the following shell command output.\n\
             \n\
             Command: {}\n\
             Exit code: {}\n\
             Output lines: {}\n\
             \n\
             Preserve: error and warning messages, the exit status, file paths that were\n\
             created or modified, counts and totals, timing figures, version numbers.\n\
             Remove: progress indicators, percentage tickers, repeated near-identical\n\
             lines, decorative separators, informational lines that restate other lines.\n\
             \n\
             Respond with at most {} lines. Begin with one of SUCCESS, FAILED, or WARNING.\n\
             \n\
             Output:\n\
             {}",
            self.command, self.exit_code, self.line_count, MAX_SUMMARY_LINES, self.output
        )
    }
}

/// A pluggable summarization capability
#[async_trait]
pub trait Oracle: Send + Sync {
    /// Produce a digest for the request, or fail
    async fn summarize(&self, request: &SummaryRequest) -> Result<String>;
}

/// Oracle backed by an external summarizer process
///
/// The instruction payload is piped to the program's stdin; its stdout is the
/// digest. Any spawn or exit failure surfaces as an error for the
/// orchestrator to absorb.
pub struct ProcessOracle {
    program: String,
    args: Vec<String>,
}

impl ProcessOracle {
    /// Create an oracle invoking `program` with `args`
    pub fn new(program: impl Into<String>, args: Vec<String>) -> Self {
        Self {
            program: program.into(),
            args,
        }
    }
}

#[async_trait]
impl Oracle for ProcessOracle {
    async fn summarize(&self, request: &SummaryRequest) -> Result<String> {
        tracing::debug!(
            "Invoking summarizer {} for {} output lines",
            self.program,
            request.line_count
        );

        let mut child = Command::new(&self.program)
            .args(&self.args)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()?;

        if let Some(mut stdin) = child.stdin.take() {
            stdin
                .write_all(request.instruction_payload().as_bytes())
                .await?;
        }

        let output = child.wait_with_output().await?;
        if !output.status.success() {
            anyhow::bail!(
                "summarizer exited with {}: {}",
                output.status,
                String::from_utf8_lossy(&output.stderr).trim()
            );
        }

        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_payload_carries_context_and_cap() {
        let request = SummaryRequest::new("npm install", 1, "line one\nline two\n");
        let payload = request.instruction_payload();

        assert!(payload.contains("Command: npm install"));
        assert!(payload.contains("Exit code: 1"));
        assert!(payload.contains("Output lines: 2"));
        assert!(payload.contains("at most 15 lines"));
        assert!(payload.contains("SUCCESS, FAILED, or WARNING"));
        assert!(payload.ends_with("line one\nline two\n"));
    }

    #[tokio::test]
    async fn test_process_oracle_pipes_payload() {
        // `cat` echoes the payload back, which is enough to exercise the pipe
        let oracle = ProcessOracle::new("cat", vec![]);
        let request = SummaryRequest::new("ls", 0, "some output");

        let digest = oracle.summarize(&request).await.unwrap();
        assert!(digest.contains("Command: ls"));
        assert!(digest.contains("some output"));
    }

    #[tokio::test]
    async fn test_process_oracle_nonzero_exit_is_error() {
        let oracle = ProcessOracle::new("false", vec![]);
        let request = SummaryRequest::new("ls", 0, "output");

        assert!(oracle.summarize(&request).await.is_err());
    }

    #[tokio::test]
    async fn test_process_oracle_spawn_failure_is_error() {
        let oracle = ProcessOracle::new("/nonexistent/summarizer", vec![]);
        let request = SummaryRequest::new("ls", 0, "output");

        assert!(oracle.summarize(&request).await.is_err());
    }
}
