use anyhow::Result;
use colored::*;
use stint_core::execution::TaskRunnerConfig;
use stint_core::workspace_manager::{Invocation, WorkspaceManager};

use crate::commands::plan;
use crate::commands::OutputOptions;

pub async fn execute(
    manager: &WorkspaceManager,
    invocation: &Invocation,
    options: OutputOptions,
) -> Result<()> {
    if options.dry_run {
        return plan::execute(manager, invocation);
    }

    let task_name = match &invocation.task {
        Some(task) => task.as_str(),
        None => manager.default_task()?,
    };

    let summary = manager
        .run_task(
            task_name,
            &invocation.overrides,
            TaskRunnerConfig {
                echo_commands: !options.quiet,
            },
        )
        .await?;

    if !options.quiet {
        println!();
        println!(
            "{} {}",
            "✓".green().bold(),
            format!(
                "'{}' completed: {} task(s), {} command(s) in {:.1}s",
                task_name,
                summary.tasks_run,
                summary.commands_run,
                summary.elapsed.as_secs_f64()
            )
            .green()
            .bold()
        );
    }

    Ok(())
}
