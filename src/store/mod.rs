//! Persisted permission state
//!
//! Two stores back the permission system: a one-time allow list at a fixed
//! temp path and a durable rule list scoped to each project directory. Both
//! persist through the [`StateStore`] interface so tests can run against an
//! in-memory fake.

mod durable;
mod once;
mod state;

pub use durable::{DurableRules, PermissionSettings, SettingsFile};
pub use once::{OnceList, OneTimeGrants};
pub use state::{FileStore, MemoryStore, StateStore};
