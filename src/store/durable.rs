//! Durable rule store
//!
//! Project-scoped, append-only allow rules persisted in the project's
//! `settings.local.json`. Keys outside the permission block are carried
//! through a rewrite untouched.

use std::path::Path;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::core::BrokerResult;
use crate::store::StateStore;

/// File name of the per-project settings file
const SETTINGS_FILE: &str = "settings.local.json";

/// Persisted schema of a project settings file
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SettingsFile {
    /// Permission block holding the allow list
    #[serde(default)]
    pub permissions: PermissionSettings,

    /// Unrelated settings, preserved verbatim
    #[serde(flatten)]
    pub rest: Map<String, Value>,
}

/// Permission block inside the settings file
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PermissionSettings {
    /// Allow-rule strings, append-only and deduplicated
    #[serde(default)]
    pub allow: Vec<String>,

    /// Unrelated permission keys, preserved verbatim
    #[serde(flatten)]
    pub rest: Map<String, Value>,
}

impl SettingsFile {
    /// Parse a raw store value, treating absence or malformed JSON as empty
    pub fn parse(raw: Option<&str>) -> Self {
        let Some(raw) = raw else {
            return Self::default();
        };
        match serde_json::from_str(raw) {
            Ok(settings) => settings,
            Err(e) => {
                tracing::warn!("Settings file unreadable, treating as empty: {}", e);
                Self::default()
            }
        }
    }
}

/// Durable allow rules backed by a state store
#[derive(Clone)]
pub struct DurableRules {
    store: Arc<dyn StateStore>,
    settings_dir: String,
}

impl DurableRules {
    /// Create a durable rule store using `settings_dir` under each project root
    pub fn new(store: Arc<dyn StateStore>, settings_dir: impl Into<String>) -> Self {
        Self {
            store,
            settings_dir: settings_dir.into(),
        }
    }

    /// Store key (settings file path) for a project directory
    pub fn settings_key(&self, project_dir: &Path) -> String {
        project_dir
            .join(&self.settings_dir)
            .join(SETTINGS_FILE)
            .to_string_lossy()
            .into_owned()
    }

    /// Load the allow list for a project; never fails
    pub fn load_allow(&self, project_dir: &Path) -> Vec<String> {
        let key = self.settings_key(project_dir);
        SettingsFile::parse(self.store.get(&key).as_deref())
            .permissions
            .allow
    }

    /// Append `rule` to the project's allow list
    ///
    /// Returns whether the rule was newly added; an identical existing rule
    /// makes this a no-op.
    pub fn append_rule(&self, project_dir: &Path, rule: &str) -> BrokerResult<bool> {
        let key = self.settings_key(project_dir);
        let mut added = false;
        self.store.update(&key, &mut |raw| {
            let mut settings = SettingsFile::parse(raw.as_deref());
            if settings.permissions.allow.iter().any(|r| r == rule) {
                added = false;
                return None;
            }
            settings.permissions.allow.push(rule.to_string());
            added = true;
            serde_json::to_string_pretty(&settings).ok()
        })?;

        if added {
            tracing::info!("Added durable rule {:?} for {}", rule, project_dir.display());
        }
        Ok(added)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryStore;

    fn rules() -> (Arc<MemoryStore>, DurableRules) {
        let store = Arc::new(MemoryStore::new());
        let rules = DurableRules::new(store.clone(), ".shell-broker");
        (store, rules)
    }

    #[test]
    fn test_append_and_load() {
        let (_, rules) = rules();
        let project = Path::new("/project");

        assert!(rules.load_allow(project).is_empty());
        assert!(rules.append_rule(project, "Bash(command:npm install *)").unwrap());
        assert_eq!(
            rules.load_allow(project),
            vec!["Bash(command:npm install *)".to_string()]
        );
    }

    #[test]
    fn test_append_deduplicates() {
        let (_, rules) = rules();
        let project = Path::new("/project");

        assert!(rules.append_rule(project, "Bash(command:npm install *)").unwrap());
        assert!(!rules.append_rule(project, "Bash(command:npm install *)").unwrap());
        assert_eq!(rules.load_allow(project).len(), 1);
    }

    #[test]
    fn test_rules_scoped_per_project() {
        let (_, rules) = rules();

        rules
            .append_rule(Path::new("/a"), "Bash(command:npm install *)")
            .unwrap();
        assert!(rules.load_allow(Path::new("/b")).is_empty());
    }

    #[test]
    fn test_unrelated_settings_survive_rewrite() {
        let (store, rules) = rules();
        let project = Path::new("/project");
        let key = rules.settings_key(project);

        store
            .put(
                &key,
                r#"{"theme":"dark","permissions":{"allow":[],"deny":["Bash(rm *)"]}}"#,
            )
            .unwrap();
        rules.append_rule(project, "Bash(command:npm install *)").unwrap();

        let raw = store.get(&key).unwrap();
        let value: Value = serde_json::from_str(&raw).unwrap();
        assert_eq!(value["theme"], "dark");
        assert_eq!(value["permissions"]["deny"][0], "Bash(rm *)");
        assert_eq!(
            value["permissions"]["allow"][0],
            "Bash(command:npm install *)"
        );
    }

    #[test]
    fn test_malformed_settings_treated_as_empty() {
        let (store, rules) = rules();
        let project = Path::new("/project");
        let key = rules.settings_key(project);

        store.put(&key, "{{{").unwrap();
        assert!(rules.load_allow(project).is_empty());
        assert!(rules.append_rule(project, "Bash(command:ls *)").unwrap());
        assert_eq!(rules.load_allow(project).len(), 1);
    }
}
