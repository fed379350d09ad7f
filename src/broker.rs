//! Shell broker facade
//!
//! Ties the resolution engine, the command runner, and the compression
//! orchestrator into the three inbound operations a protocol adapter calls:
//! `execute`, `grant_once`, `grant_durable`. Every operation resolves to a
//! [`BrokerResponse`]; nothing here can take down the host process.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::compress::{CompressionOrchestrator, Oracle};
use crate::config::BrokerConfig;
use crate::core::{BrokerError, BrokerResponse};
use crate::exec::CommandRunner;
use crate::permissions::{
    GrantOutcome, PermissionEngine, PermissionGrants, Resolution,
};
use crate::store::{DurableRules, OneTimeGrants, StateStore};

/// A request to execute a command
#[derive(Debug, Clone)]
pub struct ExecuteRequest {
    /// The command to run
    pub command: String,
    /// Optional working directory; also scopes durable rule lookup
    pub cwd: Option<PathBuf>,
    /// Explicitly force (`Some(true)`) or suppress (`Some(false)`) compression
    pub compress: Option<bool>,
}

impl ExecuteRequest {
    /// Create a request for a command
    pub fn new(command: impl Into<String>) -> Self {
        Self {
            command: command.into(),
            cwd: None,
            compress: None,
        }
    }

    /// Set the working directory
    pub fn with_cwd(mut self, cwd: impl Into<PathBuf>) -> Self {
        self.cwd = Some(cwd.into());
        self
    }

    /// Force or suppress compression
    pub fn with_compress(mut self, compress: bool) -> Self {
        self.compress = Some(compress);
        self
    }
}

/// Mediates command execution for an automated agent
pub struct ShellBroker {
    engine: PermissionEngine,
    grants: PermissionGrants,
    runner: CommandRunner,
    orchestrator: CompressionOrchestrator,
}

impl ShellBroker {
    /// Create a broker over a state store and a summarization oracle
    pub fn new(config: BrokerConfig, store: Arc<dyn StateStore>, oracle: Arc<dyn Oracle>) -> Self {
        let once = OneTimeGrants::new(
            store.clone(),
            config.once_store_path.to_string_lossy().into_owned(),
        );
        let durable = DurableRules::new(store, config.settings_dir);

        Self {
            engine: PermissionEngine::new(once.clone(), durable.clone()),
            grants: PermissionGrants::new(once, durable),
            runner: CommandRunner::new(config.shell),
            orchestrator: CompressionOrchestrator::new(
                oracle,
                config.log_dir,
                config.oracle_timeout,
            ),
        }
    }

    /// Resolve, run, and finalize a command
    ///
    /// Denial returns the structured remediation text with the error flag
    /// set; it is guidance, not a fault. A command that ran is reported
    /// through the same shape, flagged only by its exit code.
    pub async fn execute(&self, request: ExecuteRequest) -> BrokerResponse {
        let command = request.command.trim().to_string();
        if command.is_empty() {
            return BrokerResponse::error("Validation error: command must not be empty");
        }

        let project_dir = match &request.cwd {
            Some(dir) => dir.clone(),
            None => std::env::current_dir().unwrap_or_else(|_| PathBuf::from(".")),
        };

        match self.engine.resolve(&command, &project_dir) {
            Ok(Resolution::Allowed(reason)) => {
                tracing::debug!("Resolved {:?} for: {}", reason, command);
            }
            Ok(Resolution::Denied(guidance)) => {
                return BrokerResponse::error(guidance.message());
            }
            Err(e) => {
                return BrokerResponse::error(format!("Permission check failed: {}", e));
            }
        }

        let result = self.runner.run(&command, request.cwd.as_deref()).await;
        let outcome = self
            .orchestrator
            .finalize(&command, &result, request.compress)
            .await;

        BrokerResponse {
            output: outcome.output,
            is_error: result.exit_code != 0,
        }
    }

    /// Grant a one-time permission for an exact command
    pub fn grant_once(&self, command: &str) -> BrokerResponse {
        match self.grants.grant_once(command) {
            Ok(true) => BrokerResponse::success(format!(
                "One-time permission recorded for: {}",
                command.trim()
            )),
            Ok(false) => BrokerResponse::success(format!(
                "One-time permission already recorded for: {}",
                command.trim()
            )),
            Err(e) => Self::grant_failure(e),
        }
    }

    /// Grant a durable prefix rule in a project directory
    ///
    /// `cwd` defaults to the process working directory.
    pub fn grant_durable(&self, prefix: &str, cwd: Option<&Path>) -> BrokerResponse {
        let project_dir = match cwd {
            Some(dir) => dir.to_path_buf(),
            None => std::env::current_dir().unwrap_or_else(|_| PathBuf::from(".")),
        };

        match self.grants.grant_durable(prefix, &project_dir) {
            Ok(GrantOutcome::Added) => BrokerResponse::success(format!(
                "Always-allow rule added for prefix \"{}\" in {}",
                crate::permissions::command_prefix(prefix.trim()),
                project_dir.display()
            )),
            Ok(GrantOutcome::AlreadyPresent) => BrokerResponse::success(format!(
                "Rule for prefix \"{}\" already exists in {}",
                crate::permissions::command_prefix(prefix.trim()),
                project_dir.display()
            )),
            Err(e) => Self::grant_failure(e),
        }
    }

    fn grant_failure(e: BrokerError) -> BrokerResponse {
        match e {
            BrokerError::Validation(_) => BrokerResponse::error(e.to_string()),
            other => BrokerResponse::error(format!("Failed to record permission: {}", other)),
        }
    }
}
