use anyhow::Result;
use colored::*;
use stint_core::workspace_manager::WorkspaceManager;

pub fn execute(manager: &WorkspaceManager) -> Result<()> {
    println!("{}", "Task Dependency Graph:".bold().underline());

    let result = manager.get_dependency_graph();
    let graph = &result.graph;

    for (node_index, node_weight) in graph.node_indices().zip(graph.node_weights()) {
        println!("{}", node_weight.blue().bold());

        // petgraph yields neighbors newest edge first
        let mut deps = Vec::new();
        for neighbor in graph.neighbors(node_index) {
            if let Some(dep_name) = graph.node_weight(neighbor) {
                deps.push(dep_name.clone());
            }
        }
        deps.reverse();

        if !deps.is_empty() {
            println!("  {} {}", "depends on:".dimmed(), deps.join(", "));
        } else {
            println!("  {}", "no dependencies".dimmed());
        }
        println!();
    }

    Ok(())
}
