//! Result types for workspace operations
//!
//! This module contains the result types returned by workspace manager
//! operations, so the CLI layer only deals with presentation.

use std::collections::HashMap;

use colored::Color;

use crate::configs::ConfigSource;
use crate::configs::tasks::TaskConfig;
use crate::tasks::get_task_color;

/// Information about one configured task
#[derive(Debug, Clone)]
pub struct TaskInfo {
    pub name: String,
    pub description: Option<String>,
    pub dependencies: Vec<String>,
    pub command_count: usize,
}

/// Result of listing tasks
#[derive(Debug)]
pub struct TaskListResult {
    pub tasks: Vec<TaskInfo>,
    pub default_task: Option<String>,
    pub source: ConfigSource,
    pub task_colors: HashMap<String, Color>,
}

/// Result of getting the task dependency graph
#[derive(Debug)]
pub struct DependencyGraphResult {
    pub graph: petgraph::Graph<String, ()>,
}

impl From<&TaskConfig> for TaskInfo {
    fn from(task: &TaskConfig) -> Self {
        Self {
            name: task.name.clone(),
            description: task.description.clone(),
            dependencies: task.dependencies.clone(),
            command_count: task.commands.len(),
        }
    }
}

impl TaskListResult {
    pub fn new(tasks: Vec<TaskInfo>, default_task: Option<String>, source: ConfigSource) -> Self {
        let task_colors = tasks
            .iter()
            .map(|task| (task.name.clone(), get_task_color(&task.name)))
            .collect();
        Self {
            tasks,
            default_task,
            source,
            task_colors,
        }
    }
}
