//! Permission resolution engine
//!
//! Classifies a command against the safe catalog, the one-time allow list,
//! and the project's durable rules, in that order, first match wins. The only
//! side effect is consuming a matched one-time record.

use std::path::Path;

use crate::core::BrokerResult;
use crate::permissions::catalog;
use crate::permissions::rules::{command_prefix, rule_matches, CommandShape};
use crate::store::{DurableRules, OneTimeGrants};

/// Why a command was allowed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AllowReason {
    /// Matched the safe command catalog
    SafeCatalog,
    /// Consumed a one-time permission record
    OneTime,
    /// Matched a durable rule, tagged with the matching form
    Durable(&'static str),
}

/// Remediation metadata carried by a denial
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DenialGuidance {
    /// The denied command
    pub command: String,
    /// The prefix a durable grant would cover
    pub prefix: String,
}

impl DenialGuidance {
    /// Render the denial message offering both grant paths
    pub fn message(&self) -> String {
        format!(
            "Permission denied: {}\n\n\
             To proceed, either:\n\
             - grant_once(\"{}\") to allow this exact command one time\n\
             - grant_durable(\"{}\") to always allow \"{} ...\" in this project",
            self.command, self.command, self.prefix, self.prefix
        )
    }
}

/// Outcome of resolving a command
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution {
    /// The command may run
    Allowed(AllowReason),
    /// No allow path matched
    Denied(DenialGuidance),
}

/// Resolves commands against the permission stores
#[derive(Clone)]
pub struct PermissionEngine {
    once: OneTimeGrants,
    durable: DurableRules,
}

impl PermissionEngine {
    /// Create an engine over the two permission stores
    pub fn new(once: OneTimeGrants, durable: DurableRules) -> Self {
        Self { once, durable }
    }

    /// Resolve a command for a project directory
    ///
    /// Evaluation order: safe catalog, one-time list (consuming on hit),
    /// durable rules, deny. Denial means all three allow paths evaluated
    /// false.
    pub fn resolve(&self, command: &str, project_dir: &Path) -> BrokerResult<Resolution> {
        let shape = CommandShape::parse(command);

        if catalog::is_safe(&shape.command) {
            tracing::debug!("Auto-allowed by safe catalog: {}", shape.command);
            return Ok(Resolution::Allowed(AllowReason::SafeCatalog));
        }

        if self.once.consume(&shape.command)? {
            return Ok(Resolution::Allowed(AllowReason::OneTime));
        }

        let allow = self.durable.load_allow(project_dir);
        for rule in &allow {
            if let Some(form) = rule_matches(rule, &shape) {
                tracing::debug!("Allowed by durable rule {:?} ({})", rule, form);
                return Ok(Resolution::Allowed(AllowReason::Durable(form)));
            }
        }

        tracing::info!("Permission denied for: {}", shape.command);
        Ok(Resolution::Denied(DenialGuidance {
            prefix: command_prefix(&shape.command),
            command: shape.command,
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::{MemoryStore, StateStore};
    use std::sync::Arc;

    const ONCE_KEY: &str = "once.json";

    fn engine() -> (Arc<MemoryStore>, PermissionEngine) {
        let store = Arc::new(MemoryStore::new());
        let once = OneTimeGrants::new(store.clone(), ONCE_KEY);
        let durable = DurableRules::new(store.clone(), ".shell-broker");
        (store, PermissionEngine::new(once, durable))
    }

    fn assert_allowed(resolution: Resolution, reason: AllowReason) {
        assert_eq!(resolution, Resolution::Allowed(reason));
    }

    #[test]
    fn test_safe_catalog_allows_without_touching_stores() {
        let (store, engine) = engine();
        let project = Path::new("/project");

        // Seed a one-time record for a catalog command
        let once = OneTimeGrants::new(store.clone(), ONCE_KEY);
        once.grant("git status").unwrap();

        // Catalog wins, so the record is not consumed on either resolution
        assert_allowed(
            engine.resolve("git status", project).unwrap(),
            AllowReason::SafeCatalog,
        );
        assert_allowed(
            engine.resolve("git status", project).unwrap(),
            AllowReason::SafeCatalog,
        );
        assert_eq!(once.load().commands, vec!["git status".to_string()]);
    }

    #[test]
    fn test_safe_catalog_with_trailing_arguments() {
        let (_, engine) = engine();
        assert_allowed(
            engine.resolve("ls -la /tmp", Path::new("/p")).unwrap(),
            AllowReason::SafeCatalog,
        );
    }

    #[test]
    fn test_one_time_grant_consumed_exactly_once() {
        let (store, engine) = engine();
        let project = Path::new("/project");

        OneTimeGrants::new(store, ONCE_KEY).grant("echo hello").unwrap();

        assert_allowed(
            engine.resolve("echo hello", project).unwrap(),
            AllowReason::OneTime,
        );
        assert!(matches!(
            engine.resolve("echo hello", project).unwrap(),
            Resolution::Denied(_)
        ));
    }

    #[test]
    fn test_durable_prefix_family() {
        let (store, engine) = engine();
        let project = Path::new("/project");

        let durable = DurableRules::new(store, ".shell-broker");
        durable
            .append_rule(project, &crate::permissions::rules::durable_rule("npm install"))
            .unwrap();

        assert_allowed(
            engine.resolve("npm install lodash", project).unwrap(),
            AllowReason::Durable("prefix"),
        );
        assert!(matches!(
            engine.resolve("npm remove lodash", project).unwrap(),
            Resolution::Denied(_)
        ));
        // Scoped to the project it was granted in
        assert!(matches!(
            engine.resolve("npm install lodash", Path::new("/other")).unwrap(),
            Resolution::Denied(_)
        ));
    }

    #[test]
    fn test_external_rule_read_compatible() {
        let (store, engine) = engine();
        let project = Path::new("/project");

        DurableRules::new(store, ".shell-broker")
            .append_rule(project, "Bash(cargo build:*)")
            .unwrap();

        assert_allowed(
            engine.resolve("cargo build --release", project).unwrap(),
            AllowReason::Durable("external"),
        );
    }

    #[test]
    fn test_denial_carries_remediation_metadata() {
        let (_, engine) = engine();

        let resolution = engine.resolve("echo hello", Path::new("/p")).unwrap();
        let Resolution::Denied(guidance) = resolution else {
            panic!("expected denial");
        };
        assert_eq!(guidance.command, "echo hello");
        assert_eq!(guidance.prefix, "echo hello");

        let message = guidance.message();
        assert!(message.contains("grant_once(\"echo hello\")"));
        assert!(message.contains("grant_durable(\"echo hello\")"));
    }

    #[test]
    fn test_corrupt_durable_store_fails_open_to_deny() {
        let (store, engine) = engine();
        let project = Path::new("/project");

        let durable = DurableRules::new(store.clone(), ".shell-broker");
        store.put(&durable.settings_key(project), "not json").unwrap();

        assert!(matches!(
            engine.resolve("npm install", project).unwrap(),
            Resolution::Denied(_)
        ));
    }
}
