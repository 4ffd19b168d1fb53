//! High-level workspace management interface
//!
//! This module provides the [`WorkspaceManager`] which serves as the primary
//! interface for all task runner operations. It loads and validates the
//! configuration once, then answers resolution, execution and help queries
//! against it.
//!
//! ## Example
//!
//! ```rust,no_run
//! use stint_core::workspace_manager::{WorkspaceManager, WorkspaceManagerConfig};
//! use std::path::PathBuf;
//!
//! # async fn example() -> stint_core::types::StintResult<()> {
//! let manager = WorkspaceManager::new(WorkspaceManagerConfig {
//!     workspace_root: PathBuf::from("."),
//!     ..Default::default()
//! })?;
//!
//! // Show the commands `test` would run with an overridden variable
//! let overrides = vec![("PY_VERSION".to_string(), "3.11".to_string())];
//! let plan = manager.resolve("test", &overrides)?;
//!
//! // Run it
//! manager.run_task("test", &overrides, Default::default()).await?;
//! # Ok(())
//! # }
//! ```

use std::path::{Path, PathBuf};

use tracing::debug;

use crate::configs::{load_config, ConfigSource};
use crate::execution::runner::{RunSummary, TaskRunnerConfig};
use crate::graph::TaskGraph;
use crate::presets::Preset;
use crate::results::{DependencyGraphResult, TaskInfo, TaskListResult};
use crate::task_execution::{resolve_task_execution_plan, TaskExecutionPlan};
use crate::tasks::run_task;
use crate::types::{StintError, StintResult};
use crate::variables::Variables;

/// Task name and variable overrides parsed from `TASK [NAME=value ...]`
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Invocation {
    pub task: Option<String>,
    pub overrides: Vec<(String, String)>,
}

impl Invocation {
    /// Split command-line words into a task name and `NAME=value` overrides
    pub fn parse<S: AsRef<str>>(args: &[S]) -> StintResult<Self> {
        let mut invocation = Invocation::default();
        for arg in args {
            let arg = arg.as_ref();
            match arg.split_once('=') {
                Some((name, value)) if is_variable_name(name) => {
                    invocation
                        .overrides
                        .push((name.to_string(), value.to_string()));
                }
                _ if arg.starts_with('-') => {
                    return Err(StintError::Config(format!(
                        "Unexpected option '{}': options go before the task name",
                        arg
                    )));
                }
                _ => {
                    if let Some(task) = &invocation.task {
                        return Err(StintError::Config(format!(
                            "Only one task can be run at a time (got '{}' and '{}')",
                            task, arg
                        )));
                    }
                    invocation.task = Some(arg.to_string());
                }
            }
        }
        Ok(invocation)
    }
}

fn is_variable_name(name: &str) -> bool {
    let mut chars = name.chars();
    matches!(chars.next(), Some(c) if c.is_ascii_alphabetic() || c == '_')
        && chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}

/// High-level workspace manager that encapsulates all task runner operations
pub struct WorkspaceManager {
    pub workspace_root: PathBuf,
    pub source: ConfigSource,
    pub graph: TaskGraph,
    variables: Variables,
}

/// Configuration for initializing a workspace manager
#[derive(Debug, Clone, Default)]
pub struct WorkspaceManagerConfig {
    pub workspace_root: PathBuf,
    /// Explicit configuration file, relative to the workspace root if not absolute
    pub config_file: Option<PathBuf>,
    /// Use an embedded preset instead of a file
    pub preset: Option<Preset>,
    /// Let process environment variables override declared defaults
    pub use_environment: bool,
}

impl WorkspaceManager {
    /// Load and validate the configuration for a workspace
    pub fn new(config: WorkspaceManagerConfig) -> StintResult<Self> {
        let (runner_config, source) = load_config(
            &config.workspace_root,
            config.config_file.as_deref(),
            config.preset,
        )?;
        debug!(source = %source, tasks = runner_config.tasks.len(), "configuration loaded");

        let graph = TaskGraph::from_config(&runner_config)?;

        let mut variables = graph.variables().clone();
        if config.use_environment {
            let environment = std::env::vars_os().filter_map(|(name, value)| {
                Some((name.into_string().ok()?, value.into_string().ok()?))
            });
            variables = variables.with_environment(environment);
        }

        Ok(Self {
            workspace_root: config.workspace_root,
            source,
            graph,
            variables,
        })
    }

    pub fn workspace_root(&self) -> &Path {
        &self.workspace_root
    }

    /// Task to run when none is named
    pub fn default_task(&self) -> StintResult<&str> {
        self.graph.default_task().ok_or_else(|| {
            StintError::Config(
                "No task given and the configuration has no defaultTask".to_string(),
            )
        })
    }

    /// Variables with caller overrides applied
    pub fn variables_with(&self, overrides: &[(String, String)]) -> Variables {
        self.variables.clone().with_overrides(overrides.iter().cloned())
    }

    /// Resolve a task into its ordered command list without side effects
    pub fn resolve(
        &self,
        task_name: &str,
        overrides: &[(String, String)],
    ) -> StintResult<TaskExecutionPlan> {
        resolve_task_execution_plan(&self.graph, task_name, &self.variables_with(overrides))
    }

    /// Run a task and its prerequisites
    pub async fn run_task(
        &self,
        task_name: &str,
        overrides: &[(String, String)],
        runner_config: TaskRunnerConfig,
    ) -> StintResult<RunSummary> {
        run_task(
            &self.graph,
            &self.workspace_root,
            task_name,
            &self.variables_with(overrides),
            runner_config,
        )
        .await
    }

    /// `(name, description)` pairs for described tasks
    pub fn help(&self) -> impl Iterator<Item = (&str, &str)> + Clone + '_ {
        self.graph.help()
    }

    /// List tasks; only described ones unless `include_all`
    pub fn list_tasks(&self, include_all: bool) -> TaskListResult {
        let tasks = self
            .graph
            .tasks()
            .filter(|task| include_all || task.description.is_some())
            .map(TaskInfo::from)
            .collect();

        TaskListResult::new(
            tasks,
            self.graph.default_task().map(str::to_string),
            self.source.clone(),
        )
    }

    /// Get dependency graph information
    pub fn get_dependency_graph(&self) -> DependencyGraphResult {
        DependencyGraphResult {
            graph: self.graph.graph().clone(),
        }
    }
}
