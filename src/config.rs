use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use crate::error::ControlError;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PlotConfig {
    #[serde(default = "PlotConfig::default_width")]
    pub width: u32,
    #[serde(default = "PlotConfig::default_height")]
    pub height: u32,
}

impl PlotConfig {
    fn default_width() -> u32 {
        800
    }
    fn default_height() -> u32 {
        600
    }
}

impl Default for PlotConfig {
    fn default() -> Self {
        Self {
            width: Self::default_width(),
            height: Self::default_height(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SimulationConfig {
    /// Samples used when a lesson leaves the grid to the default horizon.
    #[serde(default = "SimulationConfig::default_samples")]
    pub default_samples: usize,
}

impl SimulationConfig {
    fn default_samples() -> usize {
        500
    }
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            default_samples: Self::default_samples(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct FrequencyConfig {
    /// Points of a Bode or Nyquist grid whose range is not fixed by a lesson.
    #[serde(default = "FrequencyConfig::default_points")]
    pub points: usize,
}

impl FrequencyConfig {
    fn default_points() -> usize {
        1000
    }
}

impl Default for FrequencyConfig {
    fn default() -> Self {
        Self {
            points: Self::default_points(),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct Settings {
    #[serde(default)]
    pub plot: PlotConfig,
    #[serde(default)]
    pub simulation: SimulationConfig,
    #[serde(default)]
    pub frequency: FrequencyConfig,
}

impl Settings {
    /// Defaults without a path; a missing, unreadable or malformed file is
    /// an error.
    pub fn load_or_default(path: Option<&Path>) -> Result<Self, ControlError> {
        let Some(path) = path else {
            return Ok(Self::default());
        };
        let contents = fs::read_to_string(path)?;
        let settings: Settings = toml::from_str(&contents)?;
        settings.validate()?;
        log::info!("Loaded settings from {}", path.display());
        Ok(settings)
    }

    fn validate(&self) -> Result<(), ControlError> {
        if self.plot.width == 0 || self.plot.height == 0 {
            return Err(ControlError::Config("plot size must be positive".into()));
        }
        if self.simulation.default_samples < 2 {
            return Err(ControlError::Config(
                "simulation.default_samples must be at least 2".into(),
            ));
        }
        if self.frequency.points < 2 {
            return Err(ControlError::Config(
                "frequency.points must be at least 2".into(),
            ));
        }
        Ok(())
    }
}
