use std::fmt;

use crate::configs::tasks::{CommandConfig, RemoveCommand, RunCommand};
use crate::graph::TaskGraph;
use crate::types::StintResult;
use crate::variables::Variables;

/// A command with every variable reference expanded
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResolvedCommand {
    Shell { line: String, ignore_errors: bool },
    Remove { patterns: Vec<String> },
}

impl fmt::Display for ResolvedCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ResolvedCommand::Shell {
                line,
                ignore_errors: false,
            } => f.write_str(line),
            ResolvedCommand::Shell {
                line,
                ignore_errors: true,
            } => write!(f, "-{}", line),
            ResolvedCommand::Remove { patterns } => write!(f, "remove {}", patterns.join(" ")),
        }
    }
}

/// One task of a plan with its own commands
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlannedTask {
    pub name: String,
    pub commands: Vec<ResolvedCommand>,
}

/// Ordered list of tasks to run for a requested task
#[derive(Debug, Clone)]
pub struct TaskExecutionPlan {
    pub task_name: String,
    /// Prerequisites first, the requested task last
    pub steps: Vec<PlannedTask>,
}

impl TaskExecutionPlan {
    /// All commands of the plan, in execution order
    pub fn commands(&self) -> impl Iterator<Item = &ResolvedCommand> {
        self.steps.iter().flat_map(|step| step.commands.iter())
    }

    pub fn command_count(&self) -> usize {
        self.steps.iter().map(|step| step.commands.len()).sum()
    }
}

fn resolve_command(command: &CommandConfig, variables: &Variables) -> StintResult<ResolvedCommand> {
    Ok(match command {
        CommandConfig::Shell(line) => ResolvedCommand::Shell {
            line: variables.expand(line)?,
            ignore_errors: false,
        },
        CommandConfig::Run(RunCommand { run, ignore_errors }) => ResolvedCommand::Shell {
            line: variables.expand(run)?,
            ignore_errors: *ignore_errors,
        },
        CommandConfig::Remove(RemoveCommand { remove }) => ResolvedCommand::Remove {
            patterns: remove
                .iter()
                .map(|pattern| variables.expand(pattern))
                .collect::<StintResult<Vec<_>>>()?,
        },
    })
}

/// Resolve a task into its ordered command list without running anything
pub fn resolve_task_execution_plan(
    graph: &TaskGraph,
    task_name: &str,
    variables: &Variables,
) -> StintResult<TaskExecutionPlan> {
    let order = graph.execution_order(task_name)?;

    let mut steps = Vec::with_capacity(order.len());
    for name in order {
        let task = graph.task(name)?;
        let commands = task
            .commands
            .iter()
            .map(|command| resolve_command(command, variables))
            .collect::<StintResult<Vec<_>>>()?;
        steps.push(PlannedTask {
            name: name.to_string(),
            commands,
        });
    }

    Ok(TaskExecutionPlan {
        task_name: task_name.to_string(),
        steps,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::presets::Preset;
    use crate::types::StintError;

    fn preset_graph() -> TaskGraph {
        TaskGraph::from_config(&Preset::AstrometryClient.config().unwrap()).unwrap()
    }

    fn lines(plan: &TaskExecutionPlan) -> Vec<String> {
        plan.commands().map(|c| c.to_string()).collect()
    }

    #[test]
    fn test_default_task_prerequisites_in_order() {
        let graph = preset_graph();
        let plan = resolve_task_execution_plan(&graph, "default", graph.variables()).unwrap();
        let names: Vec<&str> = plan.steps.iter().map(|s| s.name.as_str()).collect();
        assert_eq!(
            names,
            vec![
                "check-in-venv",
                "format",
                "lint",
                "type-check",
                "dependencies",
                "package",
                "package-install",
                "install",
                "default",
            ]
        );
    }

    #[test]
    fn test_all_runs_shared_prerequisites_once() {
        let graph = preset_graph();
        let plan = resolve_task_execution_plan(&graph, "all", graph.variables()).unwrap();
        let names: Vec<&str> = plan.steps.iter().map(|s| s.name.as_str()).collect();
        let mut unique = names.clone();
        unique.sort();
        unique.dedup();
        assert_eq!(unique.len(), names.len());
        assert_eq!(names.last(), Some(&"all"));
        let position = |n: &str| names.iter().position(|x| *x == n).unwrap();
        assert!(position("default") < position("test"));
        assert!(position("test") < position("documentation"));
    }

    #[test]
    fn test_marker_filters() {
        let graph = preset_graph();
        for (task, filter) in [
            ("test", "-m \"not online and not long\""),
            ("test-long", "-m \"not online\""),
            ("test-online", "-m \"not long\""),
            ("test-all", "-m \"\""),
        ] {
            let plan = resolve_task_execution_plan(&graph, task, graph.variables()).unwrap();
            let commands = lines(&plan);
            assert_eq!(commands.len(), 1);
            assert!(commands[0].ends_with(filter), "{}: {}", task, commands[0]);
            assert!(commands[0].contains("--cov=astrometry_net_client --cov-report=html"));
            assert!(commands[0].contains(" -v "));
        }
    }

    #[test]
    fn test_format_runs_formatter_before_import_sorter() {
        let graph = preset_graph();
        let plan = resolve_task_execution_plan(&graph, "format", graph.variables()).unwrap();
        let commands = lines(&plan);
        assert!(commands[0].starts_with("black "));
        assert!(commands[1].starts_with("isort "));
    }

    #[test]
    fn test_override_only_changes_referencing_commands() {
        let graph = preset_graph();
        let overridden = graph
            .variables()
            .clone()
            .with_overrides([("PY_VERSION".to_string(), "3.11".to_string())]);

        for task in graph.tasks() {
            let before = resolve_task_execution_plan(&graph, &task.name, graph.variables()).unwrap();
            let after = resolve_task_execution_plan(&graph, &task.name, &overridden).unwrap();
            for (old, new) in before.commands().zip(after.commands()) {
                if old.to_string().contains("--python-version") {
                    assert_eq!(new.to_string(), old.to_string().replace("3.8", "3.11"));
                } else {
                    assert_eq!(old, new);
                }
            }
        }
    }

    #[test]
    fn test_unknown_task_fails() {
        let graph = preset_graph();
        let err = resolve_task_execution_plan(&graph, "deploy", graph.variables()).unwrap_err();
        assert!(matches!(err, StintError::TaskNotFound(_)));
    }

    #[test]
    fn test_pip_freeze_backs_up_before_writing() {
        let graph = preset_graph();
        let plan = resolve_task_execution_plan(&graph, "pip-freeze", graph.variables()).unwrap();
        let commands = lines(&plan);
        assert_eq!(commands[0], "mv requirements.txt requirements.txt.bak");
        assert!(commands[1].ends_with("> requirements.txt"));
    }

    #[test]
    fn test_clean_resolves_to_removals() {
        let graph = preset_graph();
        let plan = resolve_task_execution_plan(&graph, "clean", graph.variables()).unwrap();
        assert!(plan
            .commands()
            .all(|c| matches!(c, ResolvedCommand::Remove { .. })));
        assert_eq!(plan.command_count(), 3);
    }
}
