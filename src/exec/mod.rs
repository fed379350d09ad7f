//! Process execution service

mod runner;

pub use runner::{CommandRunner, ExecutionResult};
