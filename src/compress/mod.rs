//! Output compression
//!
//! Large output from verbose tools is summarized by an external oracle. The
//! orchestrator owns the decision, the raw-output artifact, and the fallback;
//! the oracle owns nothing but the digest.

pub mod catalog;
mod oracle;
mod orchestrator;

pub use oracle::{Oracle, ProcessOracle, SummaryRequest};
pub use orchestrator::{CompressionOrchestrator, CompressionOutcome};
