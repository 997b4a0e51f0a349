// config.rs - Run configuration: built-in defaults, optional JSON file, CLI overrides

use std::path::Path;

use anyhow::{Context, ensure};
use clap::ValueEnum;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum DisplayKind {
    /// Text dump to a refreshed terminal screen
    #[default]
    Terminal,
    /// Scaled pixel grid in a window
    Window,
}

/// Every knob of a run. Missing fields in a config file take the defaults below.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RunConfig {
    pub display: DisplayKind,
    /// Generations to compute.
    pub iterations: u64,
    /// Seconds between frames.
    pub delay: f64,
    /// Cells of padding around a loaded pattern; half the side of a random world.
    pub pad: usize,
    pub wrap: bool,
    pub rule: String,
    pub alive: String,
    pub dead: String,
    /// Generations buffered between simulation and renderer.
    pub channel_capacity: usize,
    /// Pixels per cell in the window renderer.
    pub scale: f32,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            display: DisplayKind::Terminal,
            iterations: 1000,
            delay: 0.07,
            pad: 20,
            wrap: true,
            rule: "B3/S23".to_string(),
            alive: "•".to_string(),
            dead: " ".to_string(),
            channel_capacity: conway::stream::DEFAULT_CAPACITY,
            scale: 6.0,
        }
    }
}

impl RunConfig {
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config file {}", path.display()))?;
        serde_json::from_str(&text).with_context(|| format!("invalid config file {}", path.display()))
    }

    pub fn validate(&self) -> anyhow::Result<()> {
        ensure!(
            self.delay.is_finite() && self.delay >= 0.0,
            "delay must be a non-negative number of seconds, got {}",
            self.delay
        );
        ensure!(self.channel_capacity > 0, "channel capacity must be at least 1");
        ensure!(self.scale > 0.0, "window scale must be positive, got {}", self.scale);
        Ok(())
    }
}
