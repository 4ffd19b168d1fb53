use std::collections::BTreeMap;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::configs::tasks::TaskConfig;
use crate::types::StintResult;

/// Top-level task runner configuration (`stint.yml` / `stint.toml`)
#[derive(Debug, Deserialize, Serialize, JsonSchema, Clone, Default)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct RunnerConfig {
    pub name: Option<String>,
    pub description: Option<String>,
    /// Task run when none is named on the command line
    pub default_task: Option<String>,
    /// Variable defaults, referenced from commands as `$(NAME)`
    #[serde(default)]
    pub variables: BTreeMap<String, String>,
    #[serde(default)]
    pub tasks: Vec<TaskConfig>,
}

pub fn parse_runner_config(yaml_str: &str) -> StintResult<RunnerConfig> {
    let config: RunnerConfig = serde_yaml::from_str(yaml_str)?;
    Ok(config)
}

/// JSON schema describing the configuration file format
pub fn schema() -> serde_json::Value {
    schemars::schema_for!(RunnerConfig).to_value()
}

pub fn parse_runner_config_toml(toml_str: &str) -> StintResult<RunnerConfig> {
    let config: RunnerConfig = toml::from_str(toml_str)?;
    Ok(config)
}
