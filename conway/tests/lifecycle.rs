// lifecycle.rs - End-to-end checks through the public API

use std::sync::{Arc, Mutex};

use conway::rle::PatternFile;
use conway::{BuildError, Grid, Message, Padding, RuleCatalog, SimulationConfig, StreamRunner};

fn seeded(rule: &str) -> Result<conway::Simulation, BuildError> {
    SimulationConfig::new(12, 12).rng_seed(2024).rule_name(rule).build()
}

#[test]
fn every_conway_alias_evolves_identically() {
    let mut reference = seeded("B3/S23").unwrap();
    reference.advance(10);

    for alias in ["conway", "Conway", "23/3", "conways life"] {
        let mut sim = seeded(alias).unwrap();
        sim.advance(10);
        assert_eq!(sim.grid(), reference.grid(), "alias {alias}");
    }
}

#[test]
fn unknown_rule_never_reaches_the_grid() {
    let err = seeded("nonsense").unwrap_err();
    assert_eq!(err.to_string(), "unknown rule `nonsense`");
    assert!(RuleCatalog::builtin().lookup("nonsense").is_err());
}

#[test]
fn fredkin_replicates_a_single_cell() {
    let mut seed = vec![vec![0; 9]; 9];
    seed[4][4] = 1;
    let mut sim = SimulationConfig::new(9, 9).seed(seed).rule_name("fredkin").build().unwrap();
    sim.advance(2);

    // two generations leave nine copies spaced two cells apart
    let grid = sim.grid();
    for y in [2, 4, 6] {
        for x in [2, 4, 6] {
            assert_eq!(grid.get(x, y), Some(1), "({x}, {y})");
        }
    }
    assert_eq!(grid.iter().filter(|&c| c == 1).count(), 9);
}

#[test]
fn padded_rle_pattern_keeps_its_shape() {
    let pattern: PatternFile = "x = 3, y = 1\n3o!".parse().unwrap();
    let mut grid = Grid::from_seed(pattern.width, pattern.height, pattern.seed).unwrap();
    grid.pad(Padding::uniform(2), 0).unwrap();

    assert_eq!((grid.width(), grid.height()), (7, 5));
    assert_eq!(grid.rows().nth(2).unwrap(), &[0, 0, 1, 1, 1, 0, 0]);
}

#[tokio::test]
async fn pattern_file_streams_to_a_consumer() {
    let pattern: PatternFile = "#N Blinker\nx = 3, y = 1, rule = 23/3\n3o!".parse().unwrap();
    let mut sim = SimulationConfig::new(pattern.width, pattern.height)
        .seed(pattern.seed)
        .rule_name(pattern.rule.unwrap())
        .padding(Padding::uniform(2), 0)
        .build()
        .unwrap();

    let live = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&live);
    let report = StreamRunner::new(4)
        .delay(0.0)
        .run(&mut sim, move |mut end| {
            end.blocking_delay().unwrap();
            while let Some(Message::Frame(snapshot)) = end.blocking_recv() {
                sink.lock().unwrap().push(snapshot.live_cells());
            }
        })
        .await
        .unwrap();

    assert_eq!(report.frames, 4);
    assert_eq!(*live.lock().unwrap(), vec![3, 3, 3, 3]);
}
