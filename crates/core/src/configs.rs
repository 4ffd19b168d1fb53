//! Configuration parsing for task runner files
//!
//! A configuration is loaded from `stint.yml`, `stint.yaml` or `stint.toml` in the
//! workspace root, from an explicit file, or from one of the embedded presets.

pub mod runner;
pub mod tasks;

use std::path::{Path, PathBuf};

use tracing::debug;

use crate::presets::Preset;
use crate::types::{StintError, StintResult};
use runner::{parse_runner_config, parse_runner_config_toml, RunnerConfig};

/// File names looked up in the workspace root, in order
pub const CONFIG_FILE_NAMES: &[&str] = &["stint.yml", "stint.yaml", "stint.toml"];

/// Where a configuration was loaded from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigSource {
    File(PathBuf),
    Preset(Preset),
}

impl std::fmt::Display for ConfigSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigSource::File(path) => write!(f, "{}", path.display()),
            ConfigSource::Preset(preset) => write!(f, "preset '{}'", preset.name()),
        }
    }
}

/// Find the configuration file in the workspace root, if any
pub fn find_config_file(workspace_root: &Path) -> Option<PathBuf> {
    CONFIG_FILE_NAMES
        .iter()
        .map(|name| workspace_root.join(name))
        .find(|path| path.is_file())
}

/// Read and parse a configuration file, choosing the format by extension
pub fn load_config_file(path: &Path) -> StintResult<RunnerConfig> {
    let content = std::fs::read_to_string(path).map_err(|e| {
        StintError::Config(format!("Failed to read config {}: {}", path.display(), e))
    })?;

    let is_toml = path.extension().and_then(|s| s.to_str()) == Some("toml");
    debug!(path = %path.display(), toml = is_toml, "parsing configuration");

    let parsed = if is_toml {
        parse_runner_config_toml(&content)
    } else {
        parse_runner_config(&content)
    };

    parsed.map_err(|e| {
        StintError::Config(format!("Failed to parse config {}: {}", path.display(), e))
    })
}

/// Resolve and load the configuration for a workspace.
///
/// An explicit file wins over a preset, which wins over discovery.
pub fn load_config(
    workspace_root: &Path,
    file: Option<&Path>,
    preset: Option<Preset>,
) -> StintResult<(RunnerConfig, ConfigSource)> {
    if let Some(file) = file {
        let path = if file.is_relative() {
            workspace_root.join(file)
        } else {
            file.to_path_buf()
        };
        let config = load_config_file(&path)?;
        return Ok((config, ConfigSource::File(path)));
    }

    if let Some(preset) = preset {
        return Ok((preset.config()?, ConfigSource::Preset(preset)));
    }

    match find_config_file(workspace_root) {
        Some(path) => {
            let config = load_config_file(&path)?;
            Ok((config, ConfigSource::File(path)))
        }
        None => Err(StintError::Config(format!(
            "No task configuration found in {} (looked for {}); run `stint init` to create one",
            workspace_root.display(),
            CONFIG_FILE_NAMES.join(", ")
        ))),
    }
}
