//! Broker configuration
//!
//! Paths and limits for the permission stores, the raw-output log directory,
//! and the summarization oracle.
//!
//! Use the builder pattern to configure the broker:
//!
//! ```ignore
//! let config = BrokerConfig::new()
//!     .with_once_store_path("/tmp/approved.json")
//!     .with_log_dir("/tmp/logs")
//!     .with_oracle_timeout(Duration::from_secs(30));
//! ```

use std::path::PathBuf;
use std::time::Duration;

/// File name of the one-time allow list inside the temp directory
const ONCE_STORE_FILE: &str = "shell-broker-approved.json";

/// Directory name for raw-output artifacts inside the temp directory
const LOG_DIR_NAME: &str = "shell-broker-logs";

/// Directory holding project-scoped settings, relative to the project root
const SETTINGS_DIR: &str = ".shell-broker";

/// Default oracle timeout in seconds
const ORACLE_TIMEOUT_SECS: u64 = 30;

/// Configuration for a ShellBroker
#[derive(Debug, Clone)]
pub struct BrokerConfig {
    /// Path of the persisted one-time allow list
    pub once_store_path: PathBuf,

    /// Directory receiving one raw-output artifact per compressed invocation
    pub log_dir: PathBuf,

    /// Name of the per-project settings directory holding durable rules
    pub settings_dir: String,

    /// Shell interpreter used to run commands
    pub shell: String,

    /// How long to wait for the summarization oracle
    pub oracle_timeout: Duration,
}

impl BrokerConfig {
    /// Create a configuration with default paths under the system temp directory
    pub fn new() -> Self {
        let tmp = std::env::temp_dir();
        Self {
            once_store_path: tmp.join(ONCE_STORE_FILE),
            log_dir: tmp.join(LOG_DIR_NAME),
            settings_dir: SETTINGS_DIR.to_string(),
            shell: "bash".to_string(),
            oracle_timeout: Duration::from_secs(ORACLE_TIMEOUT_SECS),
        }
    }

    /// Set the one-time store path
    pub fn with_once_store_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.once_store_path = path.into();
        self
    }

    /// Set the raw-output log directory
    pub fn with_log_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.log_dir = dir.into();
        self
    }

    /// Set the settings directory name used for durable rules
    pub fn with_settings_dir(mut self, dir: impl Into<String>) -> Self {
        self.settings_dir = dir.into();
        self
    }

    /// Set the shell interpreter
    pub fn with_shell(mut self, shell: impl Into<String>) -> Self {
        self.shell = shell.into();
        self
    }

    /// Set the oracle timeout
    pub fn with_oracle_timeout(mut self, timeout: Duration) -> Self {
        self.oracle_timeout = timeout;
        self
    }
}

impl Default for BrokerConfig {
    fn default() -> Self {
        Self::new()
    }
}
