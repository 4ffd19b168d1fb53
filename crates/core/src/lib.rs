//! Stint Core Library
//!
//! This is the core library for the stint task runner. It provides all the
//! business logic for loading task configurations, expanding variables,
//! ordering prerequisites and running commands.
//!
//! ## Architecture
//!
//! The core library is organized into several modules:
//!
//! - [`workspace_manager`] - High-level interface used by the CLI
//! - [`configs`] - Configuration files, discovery and parsing
//! - [`presets`] - Embedded ready-made configurations
//! - [`variables`] - `$(NAME)` expansion with override-then-default lookup
//! - [`graph`] - Validated task dependency graph
//! - [`task_execution`] - Resolution of a task into an ordered command plan
//! - [`execution`] - Sequential execution engine
//! - [`tasks`] - Task utilities and color management
//! - [`platform`] - Shell detection
//! - [`results`] - Result types for workspace operations
//! - [`types`] - Common error types and type aliases
//!
//! ## Usage
//!
//! ```rust,no_run
//! use stint_core::workspace_manager::{WorkspaceManager, WorkspaceManagerConfig};
//! use std::path::PathBuf;
//!
//! # fn example() -> stint_core::types::StintResult<()> {
//! let manager = WorkspaceManager::new(WorkspaceManagerConfig {
//!     workspace_root: PathBuf::from("."),
//!     ..Default::default()
//! })?;
//!
//! for (name, description) in manager.help() {
//!     println!("{name}: {description}");
//! }
//! # Ok(())
//! # }
//! ```

pub mod configs;
pub mod execution;
pub mod graph;
pub mod platform;
pub mod presets;
pub mod results;
pub mod task_execution;
pub mod tasks;
pub mod types;
pub mod variables;
pub mod workspace_manager;

// Re-export the main types for easier usage
pub use types::{StintError, StintResult};
pub use workspace_manager::{WorkspaceManager, WorkspaceManagerConfig};
