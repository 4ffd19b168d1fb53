use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// A single entry in a task's command list
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(untagged)]
pub enum CommandConfig {
    /// Shell line, run through the platform shell
    Shell(String),
    /// Shell line with explicit options
    Run(RunCommand),
    /// Best-effort removal of paths or glob patterns relative to the workspace root
    Remove(RemoveCommand),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct RunCommand {
    pub run: String,
    /// Report a failure and carry on instead of stopping the run
    #[serde(default)]
    pub ignore_errors: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(deny_unknown_fields)]
pub struct RemoveCommand {
    pub remove: Vec<String>,
}

impl CommandConfig {
    /// Templates subject to variable expansion
    pub fn templates(&self) -> Vec<&str> {
        match self {
            CommandConfig::Shell(line) => vec![line.as_str()],
            CommandConfig::Run(command) => vec![command.run.as_str()],
            CommandConfig::Remove(command) => command.remove.iter().map(String::as_str).collect(),
        }
    }
}

#[derive(Debug, Deserialize, Serialize, JsonSchema, Clone)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct TaskConfig {
    pub name: String,
    /// Help text; tasks without one are hidden from `stint list`
    pub description: Option<String>,
    /// Prerequisite tasks, run before this task's own commands
    #[serde(default)]
    pub dependencies: Vec<String>,
    #[serde(default)]
    pub commands: Vec<CommandConfig>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_command_forms_parse() {
        let yaml = r#"
- "black ."
- run: "rm -f missing"
  ignoreErrors: true
- remove: ["dist", "*.egg-info"]
"#;
        let commands: Vec<CommandConfig> = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(commands[0], CommandConfig::Shell("black .".to_string()));
        assert_eq!(
            commands[1],
            CommandConfig::Run(RunCommand {
                run: "rm -f missing".to_string(),
                ignore_errors: true
            })
        );
        assert_eq!(
            commands[2].templates(),
            vec!["dist", "*.egg-info"],
        );
    }

    #[test]
    fn test_misspelled_command_option_rejected() {
        let result: Result<Vec<CommandConfig>, _> =
            serde_yaml::from_str("- run: \"exit 1\"\n  ignoreEror: true\n");
        assert!(result.is_err());

        let result: Result<Vec<CommandConfig>, _> =
            serde_yaml::from_str("- remove: [dist]\n  ignoreErrors: true\n");
        assert!(result.is_err());
    }

    #[test]
    fn test_task_defaults() {
        let task: TaskConfig = serde_yaml::from_str("name: install\n").unwrap();
        assert!(task.dependencies.is_empty());
        assert!(task.commands.is_empty());
        assert!(task.description.is_none());
    }

    #[test]
    fn test_unknown_task_field_rejected() {
        let result: Result<TaskConfig, _> = serde_yaml::from_str("name: a\ndeps: [b]\n");
        assert!(result.is_err());
    }
}
