use anyhow::Result;
use colored::*;
use stint_core::tasks::get_task_color;
use stint_core::workspace_manager::{Invocation, WorkspaceManager};

pub fn execute(manager: &WorkspaceManager, invocation: &Invocation) -> Result<()> {
    let task_name = match &invocation.task {
        Some(task) => task.as_str(),
        None => manager.default_task()?,
    };

    let plan = manager.resolve(task_name, &invocation.overrides)?;

    println!("{} {}", "Execution plan for".bold(), task_name.cyan());

    for (i, step) in plan.steps.iter().enumerate() {
        println!(
            "\n  {}. {}",
            i + 1,
            step.name.color(get_task_color(&step.name)).bold()
        );
        if step.commands.is_empty() {
            println!("     {}", "(prerequisites only)".dimmed());
        }
        for command in &step.commands {
            println!("     {}", command);
        }
    }

    Ok(())
}
