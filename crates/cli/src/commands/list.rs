use anyhow::Result;
use colored::*;
use stint_core::workspace_manager::WorkspaceManager;

pub fn execute(manager: &WorkspaceManager, all: bool) -> Result<()> {
    let result = manager.list_tasks(all);

    println!("{}", "Tasks".bold().underline());
    println!("{}", format!("from {}", result.source).dimmed());

    if result.tasks.is_empty() {
        println!("  {}", "No tasks found".dimmed());
        return Ok(());
    }

    let width = result
        .tasks
        .iter()
        .map(|task| task.name.len())
        .max()
        .unwrap_or(0);

    for task in &result.tasks {
        let color = result
            .task_colors
            .get(&task.name)
            .copied()
            .unwrap_or(Color::Blue);
        let marker = if result.default_task.as_deref() == Some(task.name.as_str()) {
            " (default)".green().to_string()
        } else {
            String::new()
        };

        println!(
            "  {}  {}{}",
            format!("{:width$}", task.name, width = width).color(color).bold(),
            task.description.as_deref().unwrap_or(""),
            marker
        );

        if all && !task.dependencies.is_empty() {
            println!(
                "  {}  {} {}",
                " ".repeat(width),
                "requires:".dimmed(),
                task.dependencies.join(", ")
            );
        }
    }

    Ok(())
}
