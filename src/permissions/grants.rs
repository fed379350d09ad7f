//! Permission mutation API
//!
//! The only writers of permission state: one-time grants into the shared
//! allow list, durable prefix grants into a project's settings file.

use std::path::Path;

use crate::core::{BrokerError, BrokerResult};
use crate::permissions::rules::{command_prefix, durable_rule};
use crate::store::{DurableRules, OneTimeGrants};

/// Result of a durable grant
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GrantOutcome {
    /// The rule was newly written
    Added,
    /// An identical rule already existed
    AlreadyPresent,
}

/// Grants permissions into the persisted stores
#[derive(Clone)]
pub struct PermissionGrants {
    once: OneTimeGrants,
    durable: DurableRules,
}

impl PermissionGrants {
    /// Create a grant API over the two permission stores
    pub fn new(once: OneTimeGrants, durable: DurableRules) -> Self {
        Self { once, durable }
    }

    /// Record a one-time permission for an exact command
    ///
    /// Trims the command and appends it if absent; granting an already listed
    /// command is a no-op. Returns whether the command was newly added.
    pub fn grant_once(&self, command: &str) -> BrokerResult<bool> {
        let command = command.trim();
        if command.is_empty() {
            return Err(BrokerError::validation("command must not be empty"));
        }
        self.once.grant(command)
    }

    /// Record a durable allow rule for a command prefix in a project
    ///
    /// The prefix is canonicalized to its first two whitespace tokens before
    /// the rule string is built, so the written rule is exactly what the
    /// resolution engine's prefix form matches.
    pub fn grant_durable(&self, prefix: &str, project_dir: &Path) -> BrokerResult<GrantOutcome> {
        let prefix = command_prefix(prefix.trim());
        if prefix.is_empty() {
            return Err(BrokerError::validation("prefix must not be empty"));
        }

        let rule = durable_rule(&prefix);
        if self.durable.append_rule(project_dir, &rule)? {
            Ok(GrantOutcome::Added)
        } else {
            Ok(GrantOutcome::AlreadyPresent)
        }
    }
}
