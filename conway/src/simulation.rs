// simulation.rs - Grid + rule + wrap policy, advanced one generation per tick

use std::fmt;

use log::{debug, trace};
use rand::SeedableRng;
use rand::rngs::StdRng;

use crate::error::{BuildError, GridError};
use crate::grid::{ALIVE, Cell, DEAD, Grid, Neighbor, Padding};
use crate::rules::{Rule, RuleCatalog};
use crate::snapshot::Snapshot;

/// Glyphs used when a generation is printed as text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Charmap {
    pub alive: String,
    pub dead: String,
}

impl Charmap {
    pub fn new(alive: impl Into<String>, dead: impl Into<String>) -> Self {
        Self {
            alive: alive.into(),
            dead: dead.into(),
        }
    }
}

impl Default for Charmap {
    fn default() -> Self {
        Self::new("•", " ")
    }
}

#[derive(Debug, Clone)]
enum RuleChoice {
    Rule(Rule),
    Named(String),
}

/// Everything needed to set up a [`Simulation`].
///
/// Setters take and return the config by value; nothing is validated until
/// [`SimulationConfig::build`], which resolves the rule before touching the grid.
#[derive(Debug, Clone)]
pub struct SimulationConfig {
    width: usize,
    height: usize,
    seed: Option<Vec<Vec<Cell>>>,
    wrap: bool,
    rule: RuleChoice,
    charmap: Charmap,
    padding: Option<(Padding, Cell)>,
    rng_seed: Option<u64>,
}

impl SimulationConfig {
    /// A wrapped Conway's Life world of the given size, randomly filled unless a seed is set.
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            seed: None,
            wrap: true,
            rule: RuleChoice::Rule(Rule::conway()),
            charmap: Charmap::default(),
            padding: None,
            rng_seed: None,
        }
    }

    /// Initial cells; must be exactly `height` rows of `width` cells.
    pub fn seed(mut self, seed: Vec<Vec<Cell>>) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn wrap(mut self, wrap: bool) -> Self {
        self.wrap = wrap;
        self
    }

    pub fn rule(mut self, rule: Rule) -> Self {
        self.rule = RuleChoice::Rule(rule);
        self
    }

    /// Rule looked up by alias in the built-in catalog at build time.
    pub fn rule_name(mut self, name: impl Into<String>) -> Self {
        self.rule = RuleChoice::Named(name.into());
        self
    }

    pub fn charmap(mut self, charmap: Charmap) -> Self {
        self.charmap = charmap;
        self
    }

    /// Padding applied to the seeded grid before the first tick.
    pub fn padding(mut self, padding: Padding, value: Cell) -> Self {
        self.padding = Some((padding, value));
        self
    }

    /// Makes the random fill reproducible.
    pub fn rng_seed(mut self, seed: u64) -> Self {
        self.rng_seed = Some(seed);
        self
    }

    pub fn build(self) -> Result<Simulation, BuildError> {
        let rule = match self.rule {
            RuleChoice::Rule(rule) => rule,
            RuleChoice::Named(name) => RuleCatalog::builtin().resolve(&name)?,
        };

        let mut grid = match self.seed {
            Some(seed) => Grid::from_seed(self.width, self.height, seed)?,
            None => match self.rng_seed {
                Some(seed) => {
                    let mut grid = Grid::new(self.width, self.height);
                    grid.fill_random_with(&mut StdRng::seed_from_u64(seed), DEAD, ALIVE);
                    grid
                }
                None => Grid::random(self.width, self.height),
            },
        };

        if let Some((padding, value)) = self.padding {
            grid.pad(padding, value)?;
        }

        debug!(
            "simulation ready: {}x{} rule={:?} wrap={}",
            grid.width(),
            grid.height(),
            rule,
            self.wrap
        );

        Ok(Simulation {
            grid,
            rule,
            wrap: self.wrap,
            charmap: self.charmap,
            generation: 0,
        })
    }
}

/// Owns the current generation exclusively; callers only ever see borrows or snapshots.
#[derive(Debug)]
pub struct Simulation {
    grid: Grid,
    rule: Rule,
    wrap: bool,
    charmap: Charmap,
    generation: u64,
}

impl Simulation {
    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    pub fn rule(&self) -> Rule {
        self.rule
    }

    pub fn wrap(&self) -> bool {
        self.wrap
    }

    pub fn charmap(&self) -> &Charmap {
        &self.charmap
    }

    /// Ticks applied since construction.
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Advances one generation.
    ///
    /// Every cell is computed from the current grid into a fresh one, which
    /// replaces the current grid only once all cells are done.
    pub fn tick(&mut self) -> &Grid {
        let mut next = Grid::new(self.grid.width(), self.grid.height());
        let mut neighbors: Vec<Neighbor> = Vec::with_capacity(8);

        for (y, row) in self.grid.rows().enumerate() {
            for (x, &cell) in row.iter().enumerate() {
                neighbors.clear();
                neighbors.extend(self.grid.neighbors(x, y, self.wrap));
                let live_count = neighbors.iter().map(|n| u32::from(n.value)).sum();
                next.set(x, y, self.rule.apply(cell, live_count, &neighbors));
            }
        }

        self.grid = next;
        self.generation += 1;
        trace!("generation {}", self.generation);
        &self.grid
    }

    /// Runs `ticks` generations back to back.
    pub fn advance(&mut self, ticks: u64) -> &Grid {
        for _ in 0..ticks {
            self.tick();
        }
        &self.grid
    }

    /// Immutable copy of the current generation.
    pub fn snapshot(&self) -> Snapshot {
        Snapshot::new(self.generation, &self.grid)
    }

    pub fn pad(&mut self, padding: Padding, value: Cell) -> Result<&Grid, GridError> {
        self.grid.pad(padding, value)?;
        Ok(&self.grid)
    }

    pub fn resize(&mut self, width: usize, height: usize, value: Cell, center: bool) -> Result<&Grid, GridError> {
        self.grid.resize(width, height, value, center)?;
        Ok(&self.grid)
    }
}

impl fmt::Display for Simulation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in self.grid.rows() {
            for &cell in row {
                let glyph = if cell == ALIVE { &self.charmap.alive } else { &self.charmap.dead };
                f.write_str(glyph)?;
            }
            f.write_str("\n")?;
        }
        Ok(())
    }
}
