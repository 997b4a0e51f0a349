// main.rs - Streams a cellular automaton to a terminal or a window
//
//   lifestream                         random 40x40 Conway world in the terminal
//   lifestream window -f gun.rle -p 10 pattern file in a window
//   lifestream --pattern pulsar -r "high life" -i 200

mod cli;
mod config;

use std::sync::mpsc;

use anyhow::Context;
use clap::Parser;
use conway::{Charmap, DEAD, Padding, RuleCatalog, RunReport, Simulation, SimulationConfig, StreamRunner};
use grid_display::{terminal, window};
use log::info;

use crate::cli::Cli;
use crate::config::{DisplayKind, RunConfig};

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .format_timestamp_micros()
        .init();

    let cli = Cli::parse();
    if cli.list_rules {
        for entry in RuleCatalog::builtin().entries() {
            println!("{:<16} {:<24} {}", entry.notation, entry.name, entry.aliases.join(", "));
        }
        return Ok(());
    }

    let config = cli.run_config()?;
    let sim = build_simulation(&cli, &config).context("failed to set up the simulation")?;
    info!(
        "{}x{} world, rule {:?}, wrap {}, {} generations",
        sim.grid().width(),
        sim.grid().height(),
        sim.rule(),
        sim.wrap(),
        config.iterations
    );

    let runner = StreamRunner::new(config.iterations)
        .delay(config.delay)
        .capacity(config.channel_capacity);
    let runtime = tokio::runtime::Runtime::new().context("failed to start the async runtime")?;

    let report = match config.display {
        DisplayKind::Terminal => run_terminal(&runtime, runner, sim)?,
        DisplayKind::Window => run_window(&runtime, runner, sim, &config)?,
    };

    info!(
        "done after {} generations, {} frames shown{}",
        report.ticks,
        report.frames,
        if report.cancelled { " (cancelled)" } else { "" }
    );
    Ok(())
}

/// Picks the starting world: a pattern file, then a built-in pattern, then a
/// random square of side `2 * pad`.
fn build_simulation(cli: &Cli, config: &RunConfig) -> anyhow::Result<Simulation> {
    let padding = Padding::uniform(config.pad as isize);

    let setup = if let Some(path) = &cli.file {
        let pattern = conway::rle::read(path)
            .with_context(|| format!("failed to load pattern file {}", path.display()))?;
        // An explicit --rule beats the one stored in the file.
        let rule = match (&cli.rule, pattern.rule) {
            (Some(rule), _) => rule.clone(),
            (None, Some(rule)) => rule,
            (None, None) => config.rule.clone(),
        };
        SimulationConfig::new(pattern.width, pattern.height)
            .seed(pattern.seed)
            .rule_name(rule)
            .padding(padding, DEAD)
    } else if let Some(name) = &cli.pattern {
        let pattern =
            conway::patterns::find(name).with_context(|| format!("no built-in pattern named `{name}`"))?;
        let (width, height) = pattern.size();
        SimulationConfig::new(width, height)
            .seed(pattern.seed())
            .rule_name(&config.rule)
            .padding(padding, DEAD)
    } else {
        SimulationConfig::new(config.pad * 2, config.pad * 2).rule_name(&config.rule)
    };

    let setup = setup
        .wrap(config.wrap)
        .charmap(Charmap::new(&config.alive, &config.dead));
    let setup = match cli.seed {
        Some(seed) => setup.rng_seed(seed),
        None => setup,
    };
    Ok(setup.build()?)
}

fn run_terminal(runtime: &tokio::runtime::Runtime, runner: StreamRunner, mut sim: Simulation) -> anyhow::Result<RunReport> {
    let charmap = sim.charmap().clone();
    let (outcome_tx, outcome_rx) = mpsc::channel();

    let report = runtime.block_on(runner.run(&mut sim, move |end| {
        let _ = outcome_tx.send(terminal::display(end, charmap));
    }))?;

    if let Ok(Err(err)) = outcome_rx.try_recv() {
        return Err(err).context("terminal renderer failed");
    }
    Ok(report)
}

/// The window must own the main thread, so the simulation is spawned onto the
/// runtime and the renderer runs here.
fn run_window(
    runtime: &tokio::runtime::Runtime,
    runner: StreamRunner,
    mut sim: Simulation,
    config: &RunConfig,
) -> anyhow::Result<RunReport> {
    let (producer, end) = conway::channel(config.channel_capacity);
    let producer_task = runtime.spawn(async move { runner.drive(&mut sim, producer).await });

    let options = window::WindowOptions {
        scale: config.scale,
        ..Default::default()
    };
    let shown = window::display(end, options);

    let report = runtime
        .block_on(producer_task)
        .context("simulation task failed")??;
    shown.context("window renderer failed")?;
    Ok(report)
}
