// cli.rs - Command-line surface

use std::path::PathBuf;

use clap::Parser;

use crate::config::{DisplayKind, RunConfig};

#[derive(Parser, Debug)]
#[command(name = "lifestream", about = "Cellular automata streamed to a terminal or a window")]
pub struct Cli {
    /// Display to use for the simulation
    #[arg(value_enum)]
    pub display: Option<DisplayKind>,

    /// Path to an RLE life pattern
    #[arg(short, long, conflicts_with = "pattern")]
    pub file: Option<PathBuf>,

    /// Built-in pattern to start from (glider, pulsar, ...)
    #[arg(long)]
    pub pattern: Option<String>,

    /// Number of generations to run; default is 1000
    #[arg(short, long = "iter")]
    pub iterations: Option<u64>,

    /// Delay in seconds between frames; default is 0.07
    #[arg(short, long)]
    pub delay: Option<f64>,

    /// Padding around a pattern, half the side of a random world; default is 20
    #[arg(short, long)]
    pub pad: Option<usize>,

    /// Whether to wrap the world at its edges; default is true
    #[arg(short, long)]
    pub wrap: Option<bool>,

    /// Rule string, e.g. B3/S23 or "high life"; default is B3/S23
    #[arg(short, long)]
    pub rule: Option<String>,

    /// JSON file with run settings; flags override it
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Seed for the random world, for reproducible runs
    #[arg(long)]
    pub seed: Option<u64>,

    /// Glyph for live cells in the terminal
    #[arg(long)]
    pub alive: Option<String>,

    /// Glyph for dead cells in the terminal
    #[arg(long)]
    pub dead: Option<String>,

    /// Generations buffered between simulation and display
    #[arg(long)]
    pub capacity: Option<usize>,

    /// Pixels per cell in the window
    #[arg(long)]
    pub scale: Option<f32>,

    /// Print the available rules and exit
    #[arg(long)]
    pub list_rules: bool,
}

impl Cli {
    /// Loads the config file if one was given and layers the flags on top.
    pub fn run_config(&self) -> anyhow::Result<RunConfig> {
        let mut config = match &self.config {
            Some(path) => RunConfig::load(path)?,
            None => RunConfig::default(),
        };
        self.apply(&mut config);
        config.validate()?;
        Ok(config)
    }

    fn apply(&self, config: &mut RunConfig) {
        if let Some(display) = self.display {
            config.display = display;
        }
        if let Some(iterations) = self.iterations {
            config.iterations = iterations;
        }
        if let Some(delay) = self.delay {
            config.delay = delay;
        }
        if let Some(pad) = self.pad {
            config.pad = pad;
        }
        if let Some(wrap) = self.wrap {
            config.wrap = wrap;
        }
        if let Some(rule) = &self.rule {
            config.rule = rule.clone();
        }
        if let Some(alive) = &self.alive {
            config.alive = alive.clone();
        }
        if let Some(dead) = &self.dead {
            config.dead = dead.clone();
        }
        if let Some(capacity) = self.capacity {
            config.channel_capacity = capacity;
        }
        if let Some(scale) = self.scale {
            config.scale = scale;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_without_flags() {
        let cli = Cli::try_parse_from(["lifestream"]).unwrap();
        assert_eq!(cli.run_config().unwrap(), RunConfig::default());
    }

    #[test]
    fn flags_override_defaults() {
        let cli = Cli::try_parse_from([
            "lifestream", "window", "-i", "10", "-d", "0.5", "-p", "4", "-w", "false", "-r", "seeds",
        ])
        .unwrap();
        let config = cli.run_config().unwrap();
        assert_eq!(config.display, DisplayKind::Window);
        assert_eq!(config.iterations, 10);
        assert_eq!(config.delay, 0.5);
        assert_eq!(config.pad, 4);
        assert!(!config.wrap);
        assert_eq!(config.rule, "seeds");
    }

    #[test]
    fn file_and_pattern_conflict() {
        assert!(Cli::try_parse_from(["lifestream", "-f", "a.rle", "--pattern", "glider"]).is_err());
        assert!(Cli::try_parse_from(["lifestream", "opengl"]).is_err());
    }

    #[test]
    fn invalid_values_fail_validation() {
        let cli = Cli::try_parse_from(["lifestream", "--capacity", "0"]).unwrap();
        assert!(cli.run_config().is_err());
    }
}
