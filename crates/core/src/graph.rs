//! Task dependency graph
//!
//! Tasks are nodes, prerequisites are edges (task -> prerequisite). The graph is
//! validated once when it is built: unknown prerequisites, duplicate task names,
//! cycles and undefined variables are configuration errors, so everything that
//! reaches execution is known to resolve.

use std::collections::{HashMap, HashSet, VecDeque};

use petgraph::algo::kosaraju_scc;
use petgraph::prelude::*;

use crate::configs::runner::RunnerConfig;
use crate::configs::tasks::TaskConfig;
use crate::types::{StintError, StintResult};
use crate::variables::{references, Variables};

#[derive(Debug, Clone)]
pub struct TaskGraph {
    graph: DiGraph<String, ()>,
    node_indices: HashMap<String, NodeIndex>,
    /// Task definitions in declaration order
    tasks: Vec<TaskConfig>,
    variables: Variables,
    default_task: Option<String>,
}

impl TaskGraph {
    /// Build and validate the graph for a configuration
    pub fn from_config(config: &RunnerConfig) -> StintResult<Self> {
        let mut graph = DiGraph::<String, ()>::new();
        let mut node_indices = HashMap::new();

        for task in &config.tasks {
            if node_indices.contains_key(&task.name) {
                return Err(StintError::Config(format!(
                    "Task '{}' is defined more than once",
                    task.name
                )));
            }
            let node_index = graph.add_node(task.name.clone());
            node_indices.insert(task.name.clone(), node_index);
        }

        for task in &config.tasks {
            let from_node = node_indices[&task.name];
            for dep in &task.dependencies {
                match node_indices.get(dep) {
                    Some(&to_node) => {
                        graph.add_edge(from_node, to_node, ());
                    }
                    None => {
                        return Err(StintError::Config(format!(
                            "Task '{}' depends on '{}' which was not found",
                            task.name, dep
                        )));
                    }
                }
            }
        }

        let cycles = find_cycles(&graph);
        if !cycles.is_empty() {
            let message = cycles
                .into_iter()
                .map(|cycle| describe_cycle(&graph, &cycle))
                .collect::<Vec<_>>()
                .join("; ");
            return Err(StintError::Config(format!(
                "Circular task dependency detected: {}",
                message
            )));
        }

        if let Some(default_task) = &config.default_task {
            if !node_indices.contains_key(default_task) {
                return Err(StintError::Config(format!(
                    "Default task '{}' is not defined",
                    default_task
                )));
            }
        }

        let variables = Variables::new(config.variables.clone());
        variables.validate()?;
        check_command_references(&config.tasks, &variables)?;

        Ok(Self {
            graph,
            node_indices,
            tasks: config.tasks.clone(),
            variables,
            default_task: config.default_task.clone(),
        })
    }

    pub fn variables(&self) -> &Variables {
        &self.variables
    }

    pub fn default_task(&self) -> Option<&str> {
        self.default_task.as_deref()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.node_indices.contains_key(name)
    }

    pub fn task(&self, name: &str) -> StintResult<&TaskConfig> {
        self.tasks
            .iter()
            .find(|t| t.name == name)
            .ok_or_else(|| StintError::TaskNotFound(name.to_string()))
    }

    /// All tasks in declaration order
    pub fn tasks(&self) -> impl Iterator<Item = &TaskConfig> {
        self.tasks.iter()
    }

    /// `(name, description)` for every task that has a description.
    ///
    /// The iterator borrows the graph, so calling `help()` again restarts it.
    pub fn help(&self) -> impl Iterator<Item = (&str, &str)> + Clone + '_ {
        self.tasks.iter().filter_map(|task| {
            task.description
                .as_deref()
                .map(|description| (task.name.as_str(), description))
        })
    }

    /// Direct prerequisites of a task, in declaration order
    pub fn prerequisites(&self, name: &str) -> StintResult<&[String]> {
        Ok(&self.task(name)?.dependencies)
    }

    /// The underlying petgraph graph (edges point from task to prerequisite)
    pub fn graph(&self) -> &DiGraph<String, ()> {
        &self.graph
    }

    /// Every task that must run for `name`, prerequisites first, each exactly once.
    ///
    /// Prerequisites are visited in declaration order, so a task reachable through
    /// several paths runs at its first position.
    pub fn execution_order(&self, name: &str) -> StintResult<Vec<&str>> {
        let task = self.task(name)?;
        let mut visited = HashSet::new();
        let mut order = Vec::new();
        self.visit(task.name.as_str(), &mut visited, &mut order)?;
        Ok(order)
    }

    fn visit<'a>(
        &'a self,
        name: &'a str,
        visited: &mut HashSet<&'a str>,
        order: &mut Vec<&'a str>,
    ) -> StintResult<()> {
        if !visited.insert(name) {
            return Ok(());
        }
        let task = self.task(name)?;
        for dep in &task.dependencies {
            self.visit(dep, visited, order)?;
        }
        order.push(task.name.as_str());
        Ok(())
    }
}

fn find_cycles(graph: &DiGraph<String, ()>) -> Vec<Vec<NodeIndex>> {
    let mut cycles: Vec<Vec<NodeIndex>> = kosaraju_scc(graph)
        .into_iter()
        .filter(|component| {
            component.len() > 1 || graph.contains_edge(component[0], component[0])
        })
        .collect();
    cycles.sort_by_key(|component| component.iter().map(|n| graph[*n].clone()).min());
    cycles
}

/// Render a strongly connected component as a closed path, e.g. `a -> b -> a`
fn describe_cycle(graph: &DiGraph<String, ()>, component: &[NodeIndex]) -> String {
    let members: HashSet<NodeIndex> = component.iter().copied().collect();
    let start = component
        .iter()
        .copied()
        .min_by(|a, b| graph[*a].cmp(&graph[*b]))
        .unwrap_or(component[0]);

    // Shortest walk from `start` back to itself inside the component
    let mut parents: HashMap<NodeIndex, NodeIndex> = HashMap::new();
    let mut queue = VecDeque::from([start]);
    let mut last = start;
    while let Some(node) = queue.pop_front() {
        let mut neighbors: Vec<NodeIndex> = graph
            .neighbors(node)
            .filter(|n| members.contains(n))
            .collect();
        neighbors.sort_by(|a, b| graph[*a].cmp(&graph[*b]));

        if neighbors.contains(&start) {
            last = node;
            break;
        }
        for neighbor in neighbors {
            if neighbor != start && !parents.contains_key(&neighbor) {
                parents.insert(neighbor, node);
                queue.push_back(neighbor);
            }
        }
    }

    let mut inner = Vec::new();
    let mut current = last;
    while current != start {
        inner.push(graph[current].clone());
        match parents.get(&current) {
            Some(parent) => current = *parent,
            None => break,
        }
    }
    inner.reverse();

    let mut path = vec![graph[start].clone()];
    path.extend(inner);
    path.push(graph[start].clone());
    path.join(" -> ")
}

fn check_command_references(tasks: &[TaskConfig], variables: &Variables) -> StintResult<()> {
    for task in tasks {
        for command in &task.commands {
            for template in command.templates() {
                for name in references(template)? {
                    if !variables.is_defined(&name) {
                        return Err(StintError::UndefinedVariable {
                            name,
                            context: format!("task '{}'", task.name),
                        });
                    }
                }
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::configs::runner::parse_runner_config;

    fn graph(yaml: &str) -> StintResult<TaskGraph> {
        TaskGraph::from_config(&parse_runner_config(yaml).unwrap())
    }

    #[test]
    fn test_diamond_runs_shared_prerequisite_once() {
        let graph = graph(
            r#"
tasks:
  - name: top
    dependencies: [left, right]
  - name: left
    dependencies: [base]
  - name: right
    dependencies: [base]
  - name: base
"#,
        )
        .unwrap();

        assert_eq!(
            graph.execution_order("top").unwrap(),
            vec!["base", "left", "right", "top"]
        );
    }

    #[test]
    fn test_unknown_task() {
        let graph = graph("tasks:\n  - name: a\n").unwrap();
        assert!(matches!(
            graph.execution_order("b"),
            Err(StintError::TaskNotFound(ref name)) if name == "b"
        ));
    }

    #[test]
    fn test_cycle_rejected_at_load() {
        let err = graph(
            r#"
tasks:
  - name: a
    dependencies: [b]
  - name: b
    dependencies: [a]
"#,
        )
        .unwrap_err();
        assert!(err.to_string().contains("a -> b -> a"), "{}", err);
    }

    #[test]
    fn test_self_dependency_rejected() {
        let err = graph("tasks:\n  - name: a\n    dependencies: [a]\n").unwrap_err();
        assert!(err.to_string().contains("a -> a"), "{}", err);
    }

    #[test]
    fn test_missing_prerequisite_rejected() {
        let err = graph("tasks:\n  - name: a\n    dependencies: [ghost]\n").unwrap_err();
        assert!(err.to_string().contains("'ghost' which was not found"));
    }

    #[test]
    fn test_duplicate_task_rejected() {
        let err = graph("tasks:\n  - name: a\n  - name: a\n").unwrap_err();
        assert!(err.to_string().contains("more than once"));
    }

    #[test]
    fn test_undefined_variable_rejected_at_load() {
        let err = graph("tasks:\n  - name: a\n    commands: [\"echo $(NOPE)\"]\n").unwrap_err();
        assert!(matches!(err, StintError::UndefinedVariable { ref name, .. } if name == "NOPE"));
    }

    #[test]
    fn test_unknown_default_task_rejected() {
        let err = graph("defaultTask: build\ntasks:\n  - name: a\n").unwrap_err();
        assert!(err.to_string().contains("Default task 'build'"));
    }

    #[test]
    fn test_help_only_lists_described_tasks_and_restarts() {
        let graph = graph(
            r#"
tasks:
  - name: hidden
  - name: lint
    description: Run the linter
  - name: test
    description: Run tests
"#,
        )
        .unwrap();

        let help = graph.help();
        let first: Vec<_> = help.clone().collect();
        let second: Vec<_> = help.collect();
        assert_eq!(first, vec![("lint", "Run the linter"), ("test", "Run tests")]);
        assert_eq!(first, second);
    }
}
