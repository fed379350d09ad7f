//! One-time allow list
//!
//! A deduplicated list of exact command strings, each good for a single
//! execution. Consuming an entry removes it and persists the reduced list in
//! the same atomic update.

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::core::BrokerResult;
use crate::store::StateStore;

/// Persisted schema of the one-time allow list
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct OnceList {
    /// Approved command strings, each usable exactly once
    #[serde(default)]
    pub commands: Vec<String>,
}

impl OnceList {
    /// Parse a raw store value, treating absence or malformed JSON as empty
    pub fn parse(raw: Option<&str>) -> Self {
        let Some(raw) = raw else {
            return Self::default();
        };
        match serde_json::from_str(raw) {
            Ok(list) => list,
            Err(e) => {
                tracing::warn!("One-time store unreadable, treating as empty: {}", e);
                Self::default()
            }
        }
    }
}

/// One-time permission records backed by a state store
#[derive(Clone)]
pub struct OneTimeGrants {
    store: Arc<dyn StateStore>,
    key: String,
}

impl OneTimeGrants {
    /// Create a one-time grant list persisted at `key`
    pub fn new(store: Arc<dyn StateStore>, key: impl Into<String>) -> Self {
        Self {
            store,
            key: key.into(),
        }
    }

    /// Load the current list
    pub fn load(&self) -> OnceList {
        OnceList::parse(self.store.get(&self.key).as_deref())
    }

    /// Record a one-time grant for `command`
    ///
    /// Returns whether the command was newly added; re-granting an already
    /// listed command is a no-op.
    pub fn grant(&self, command: &str) -> BrokerResult<bool> {
        let mut added = false;
        self.store.update(&self.key, &mut |raw| {
            let mut list = OnceList::parse(raw.as_deref());
            if list.commands.iter().any(|c| c == command) {
                added = false;
                return None;
            }
            list.commands.push(command.to_string());
            added = true;
            serde_json::to_string_pretty(&list).ok()
        })?;

        if added {
            tracing::info!("Recorded one-time permission for: {}", command);
        }
        Ok(added)
    }

    /// Consume a one-time grant for `command` if one exists
    ///
    /// The removal and the persist of the reduced list happen inside a single
    /// store update, so a consumed entry can never grant a second request.
    pub fn consume(&self, command: &str) -> BrokerResult<bool> {
        let mut consumed = false;
        self.store.update(&self.key, &mut |raw| {
            let mut list = OnceList::parse(raw.as_deref());
            let before = list.commands.len();
            list.commands.retain(|c| c != command);
            if list.commands.len() == before {
                consumed = false;
                return None;
            }
            consumed = true;
            serde_json::to_string_pretty(&list).ok()
        })?;

        if consumed {
            tracing::info!("Consumed one-time permission for: {}", command);
        }
        Ok(consumed)
    }
}
