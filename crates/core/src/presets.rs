//! Embedded task configurations
//!
//! Presets are complete `stint.yml` files compiled into the binary. They can be
//! used directly with `--preset` or written out with `stint init`.

use std::fmt;
use std::str::FromStr;

use crate::configs::runner::{parse_runner_config, RunnerConfig};
use crate::types::{StintError, StintResult};

const ASTROMETRY_CLIENT: &str = include_str!("../presets/astrometry-client.yml");

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Preset {
    /// Python packaging workflow of the astrometry.net API client
    #[default]
    AstrometryClient,
}

impl Preset {
    pub const ALL: &'static [Preset] = &[Preset::AstrometryClient];

    pub fn name(&self) -> &'static str {
        match self {
            Preset::AstrometryClient => "astrometry-client",
        }
    }

    /// Raw YAML source of the preset
    pub fn source(&self) -> &'static str {
        match self {
            Preset::AstrometryClient => ASTROMETRY_CLIENT,
        }
    }

    pub fn config(&self) -> StintResult<RunnerConfig> {
        parse_runner_config(self.source()).map_err(|e| {
            StintError::Config(format!("Embedded preset '{}' is invalid: {}", self.name(), e))
        })
    }
}

impl fmt::Display for Preset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Preset {
    type Err = StintError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Preset::ALL
            .iter()
            .copied()
            .find(|preset| preset.name() == s)
            .ok_or_else(|| {
                let known = Preset::ALL
                    .iter()
                    .map(|p| p.name())
                    .collect::<Vec<_>>()
                    .join(", ");
                StintError::Config(format!("Unknown preset '{}' (available: {})", s, known))
            })
    }
}
