use std::path::Path;

use anyhow::{bail, Context, Result};
use colored::*;
use stint_core::graph::TaskGraph;
use stint_core::presets::Preset;

pub fn execute(workspace: &Path, preset: Preset, force: bool) -> Result<()> {
    let path = workspace.join("stint.yml");

    if path.exists() && !force {
        bail!(
            "{} already exists (use --force to overwrite)",
            path.display()
        );
    }

    // Only write presets that parse and validate
    TaskGraph::from_config(&preset.config()?)?;

    std::fs::write(&path, preset.source())
        .with_context(|| format!("Failed to write {}", path.display()))?;

    println!(
        "{} {}",
        "✓".green().bold(),
        format!("Wrote {} from preset '{}'", path.display(), preset).green()
    );
    Ok(())
}
