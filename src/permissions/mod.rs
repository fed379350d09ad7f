//! Permission system for command execution
//!
//! Three allow paths are evaluated in order, first match wins:
//! - **Safe catalog**: read-only commands run without a grant
//! - **One-time**: an exact command approved for a single use
//! - **Durable**: a project-scoped prefix rule in `settings.local.json`
//!
//! Anything else is denied with remediation metadata. Grants flow through
//! [`PermissionGrants`], the only writer of permission state.
//!
//! ## Example
//!
//! ```rust,ignore
//! use shell_broker::permissions::{PermissionEngine, PermissionGrants, Resolution};
//!
//! let engine = PermissionEngine::new(once, durable);
//! match engine.resolve("npm install lodash", project_dir)? {
//!     Resolution::Allowed(reason) => { /* execute */ }
//!     Resolution::Denied(guidance) => { /* return guidance.message() */ }
//! }
//! ```

pub mod catalog;
mod engine;
mod grants;
pub mod rules;

pub use engine::{AllowReason, DenialGuidance, PermissionEngine, Resolution};
pub use grants::{GrantOutcome, PermissionGrants};
pub use rules::{command_prefix, durable_rule, CommandShape};
