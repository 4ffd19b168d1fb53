//! Task execution module
//!
//! This module handles the actual execution of tasks including command execution,
//! artifact removal, and sequential plan running.

pub mod command;
pub mod remove;
pub mod runner;

pub use command::{CommandExecutor, Interrupt, InterruptListener};
pub use remove::{remove_artifacts, RemovalOutcome};
pub use runner::{RunSummary, TaskRunner, TaskRunnerConfig};
