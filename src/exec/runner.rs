//! Command runner
//!
//! Runs a command to completion in a shell-interpreting subprocess. The shell
//! (not direct argv execution) is deliberate: the command already passed
//! permission checks, and composition operators must behave as written. No
//! timeout is enforced here; long-running commands are the caller's
//! responsibility.

use std::path::Path;
use std::process::Stdio;
use std::time::Instant;

use tokio::io::{AsyncRead, AsyncReadExt};
use tokio::process::Command;

/// Exit code synthesized when the interpreter fails to start
const SPAWN_FAILURE_EXIT_CODE: i32 = 127;

/// Outcome of running a command, immutable once produced
#[derive(Debug, Clone)]
pub struct ExecutionResult {
    /// Process exit code; -1 when terminated by a signal
    pub exit_code: i32,
    /// Full captured stdout
    pub stdout: String,
    /// Full captured stderr
    pub stderr: String,
    /// Elapsed wall-clock seconds, two decimal places
    pub duration_secs: f64,
}

impl ExecutionResult {
    /// Stdout and stderr merged, stdout first
    pub fn combined_output(&self) -> String {
        match (self.stdout.is_empty(), self.stderr.is_empty()) {
            (_, true) => self.stdout.clone(),
            (true, false) => self.stderr.clone(),
            (false, false) => {
                if self.stdout.ends_with('\n') {
                    format!("{}{}", self.stdout, self.stderr)
                } else {
                    format!("{}\n{}", self.stdout, self.stderr)
                }
            }
        }
    }
}

/// Runs commands through a shell interpreter
#[derive(Debug, Clone)]
pub struct CommandRunner {
    shell: String,
}

impl CommandRunner {
    /// Create a runner using the given shell interpreter
    pub fn new(shell: impl Into<String>) -> Self {
        Self {
            shell: shell.into(),
        }
    }

    /// Run a command to completion, capturing both output streams
    ///
    /// The subprocess inherits the caller's environment. Both streams are
    /// drained incrementally while the process runs and merged only after it
    /// exits. A spawn failure produces a synthetic non-zero result rather
    /// than an error.
    pub async fn run(&self, command: &str, cwd: Option<&Path>) -> ExecutionResult {
        tracing::info!("Executing command: {}", command);
        let started = Instant::now();

        let mut cmd = Command::new(&self.shell);
        cmd.arg("-c")
            .arg(command)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped());
        if let Some(dir) = cwd {
            cmd.current_dir(dir);
        }

        let mut child = match cmd.spawn() {
            Ok(child) => child,
            Err(e) => {
                tracing::warn!("Failed to spawn {}: {}", self.shell, e);
                return ExecutionResult {
                    exit_code: SPAWN_FAILURE_EXIT_CODE,
                    stdout: String::new(),
                    stderr: format!("Failed to start {}: {}", self.shell, e),
                    duration_secs: round2(started.elapsed().as_secs_f64()),
                };
            }
        };

        let stdout_pipe = child.stdout.take();
        let stderr_pipe = child.stderr.take();

        let (status, stdout, stderr) =
            tokio::join!(child.wait(), drain(stdout_pipe), drain(stderr_pipe));

        let exit_code = match status {
            Ok(status) => status.code().unwrap_or(-1),
            Err(e) => {
                tracing::warn!("Failed to wait on child: {}", e);
                -1
            }
        };

        let duration_secs = round2(started.elapsed().as_secs_f64());
        tracing::debug!(
            "Command finished: exit {} in {}s ({} stdout bytes, {} stderr bytes)",
            exit_code,
            duration_secs,
            stdout.len(),
            stderr.len()
        );

        ExecutionResult {
            exit_code,
            stdout,
            stderr,
            duration_secs,
        }
    }
}

/// Drain a pipe to a string without buffering the whole stream twice
async fn drain<R: AsyncRead + Unpin>(pipe: Option<R>) -> String {
    let mut buf = Vec::new();
    if let Some(mut reader) = pipe {
        if let Err(e) = reader.read_to_end(&mut buf).await {
            tracing::warn!("Failed to drain output stream: {}", e);
        }
    }
    String::from_utf8_lossy(&buf).into_owned()
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn runner() -> CommandRunner {
        CommandRunner::new("bash")
    }

    #[tokio::test]
    async fn test_captures_stdout_and_exit_code() {
        let result = runner().run("echo hello", None).await;
        assert_eq!(result.exit_code, 0);
        assert_eq!(result.stdout, "hello\n");
        assert!(result.stderr.is_empty());
    }

    #[tokio::test]
    async fn test_captures_stderr_separately() {
        let result = runner().run("echo out; echo err 1>&2", None).await;
        assert_eq!(result.exit_code, 0);
        assert_eq!(result.stdout, "out\n");
        assert_eq!(result.stderr, "err\n");
        assert_eq!(result.combined_output(), "out\nerr\n");
    }

    #[tokio::test]
    async fn test_nonzero_exit_code() {
        let result = runner().run("exit 3", None).await;
        assert_eq!(result.exit_code, 3);
    }

    #[tokio::test]
    async fn test_respects_working_directory() {
        let dir = TempDir::new().unwrap();
        let result = runner().run("pwd", Some(dir.path())).await;
        assert_eq!(result.exit_code, 0);
        let reported = result.stdout.trim();
        let expected = dir.path().canonicalize().unwrap();
        assert_eq!(
            std::path::Path::new(reported).canonicalize().unwrap(),
            expected
        );
    }

    #[tokio::test]
    async fn test_composition_operators_work() {
        let result = runner().run("echo one && echo two | tr 'a-z' 'A-Z'", None).await;
        assert_eq!(result.exit_code, 0);
        assert_eq!(result.stdout, "one\nTWO\n");
    }

    #[tokio::test]
    async fn test_spawn_failure_is_synthesized() {
        let runner = CommandRunner::new("/nonexistent/interpreter");
        let result = runner.run("echo hello", None).await;

        assert_eq!(result.exit_code, 127);
        assert!(result.stdout.is_empty());
        assert!(result.stderr.contains("Failed to start"));
    }

    #[tokio::test]
    async fn test_duration_has_two_decimals() {
        let result = runner().run("true", None).await;
        let scaled = result.duration_secs * 100.0;
        assert!((scaled - scaled.round()).abs() < 1e-9);
    }
}
