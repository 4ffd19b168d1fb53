//! High-level task runner
//!
//! Runs an execution plan strictly in order: one task after another, one
//! command after another. The first failure stops the run; nothing that already
//! happened is undone.

use std::path::Path;
use std::time::{Duration, Instant};

use colored::*;
use tracing::{debug, info};

use crate::execution::command::{CommandExecutor, Interrupt, InterruptListener};
use crate::task_execution::{PlannedTask, TaskExecutionPlan};
use crate::tasks::get_task_color;
use crate::types::StintResult;

/// Configuration for the task runner
#[derive(Debug, Clone)]
pub struct TaskRunnerConfig {
    /// Print command lines before running them
    pub echo_commands: bool,
}

impl Default for TaskRunnerConfig {
    fn default() -> Self {
        Self {
            echo_commands: true,
        }
    }
}

/// What a completed run did
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunSummary {
    pub tasks_run: usize,
    pub commands_run: usize,
    pub elapsed: Duration,
}

/// Sequential runner for execution plans
pub struct TaskRunner<'a> {
    workspace_root: &'a Path,
    config: TaskRunnerConfig,
}

impl<'a> TaskRunner<'a> {
    pub fn new(workspace_root: &'a Path) -> Self {
        Self::with_config(workspace_root, TaskRunnerConfig::default())
    }

    pub fn with_config(workspace_root: &'a Path, config: TaskRunnerConfig) -> Self {
        Self {
            workspace_root,
            config,
        }
    }

    /// Run every step of the plan in order, stopping at Ctrl-C
    pub async fn run_plan(&self, plan: &TaskExecutionPlan) -> StintResult<RunSummary> {
        let listener = InterruptListener::ctrl_c();
        self.run_plan_with_interrupt(plan, listener.interrupt()).await
    }

    /// Run every step of the plan in order, checking `interrupt` before each command
    pub async fn run_plan_with_interrupt(
        &self,
        plan: &TaskExecutionPlan,
        interrupt: Interrupt,
    ) -> StintResult<RunSummary> {
        let started = Instant::now();
        info!(task = %plan.task_name, steps = plan.steps.len(), "running plan");

        let mut commands_run = 0;
        for step in &plan.steps {
            commands_run += self.run_task(step, &interrupt).await?;
        }

        Ok(RunSummary {
            tasks_run: plan.steps.len(),
            commands_run,
            elapsed: started.elapsed(),
        })
    }

    /// Run one task's own commands, returning how many ran
    async fn run_task(&self, step: &PlannedTask, interrupt: &Interrupt) -> StintResult<usize> {
        if step.commands.is_empty() {
            debug!(task = %step.name, "no commands of its own");
            return Ok(0);
        }

        if self.config.echo_commands {
            let task_color = get_task_color(&step.name);
            println!();
            println!(
                "┌─ {}",
                format!("Running task '{}'", step.name)
                    .color(task_color)
                    .bold()
            );
        }

        let executor = CommandExecutor::new(self.workspace_root, &step.name)
            .echo(self.config.echo_commands)
            .interrupt(interrupt.clone());
        for command in &step.commands {
            executor.execute(command).await?;
        }

        Ok(step.commands.len())
    }
}
