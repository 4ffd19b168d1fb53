//! Task execution utilities and color management
//!
//! This module provides the one-call entry point for running a task and
//! consistent task colors for terminal output.

use std::path::Path;

use crate::execution::runner::{RunSummary, TaskRunner, TaskRunnerConfig};
use crate::graph::TaskGraph;
use crate::task_execution::resolve_task_execution_plan;
use crate::types::StintResult;
use crate::variables::Variables;
use colored::*;

/// Get a consistent color for a task name
pub fn get_task_color(task_name: &str) -> Color {
    let hash = task_name
        .bytes()
        .fold(0u64, |acc, b| acc.wrapping_mul(31).wrapping_add(b as u64));

    // Jewel tones, kept away from the red/yellow/green used for status lines
    let colors = [
        Color::TrueColor {
            r: 147,
            g: 112,
            b: 219,
        },
        Color::TrueColor {
            r: 64,
            g: 224,
            b: 208,
        },
        Color::TrueColor {
            r: 255,
            g: 140,
            b: 0,
        },
        Color::TrueColor {
            r: 199,
            g: 21,
            b: 133,
        },
        Color::TrueColor {
            r: 72,
            g: 209,
            b: 204,
        },
        Color::TrueColor {
            r: 138,
            g: 43,
            b: 226,
        },
    ];

    colors[(hash % colors.len() as u64) as usize]
}

/// Resolve a task and run it with its prerequisites
pub async fn run_task(
    graph: &TaskGraph,
    workspace_root: &Path,
    task_name: &str,
    variables: &Variables,
    config: TaskRunnerConfig,
) -> StintResult<RunSummary> {
    let plan = resolve_task_execution_plan(graph, task_name, variables)?;
    TaskRunner::with_config(workspace_root, config)
        .run_plan(&plan)
        .await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_task_color_is_stable() {
        assert_eq!(get_task_color("lint"), get_task_color("lint"));
    }
}
