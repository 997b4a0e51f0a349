// lib.rs - Cellular automaton engine with generation streaming
//
// The crate is split leaf-first:
//   grid       - owned cell buffer, neighbor enumeration, padding/resizing
//   snapshot   - immutable generation handed to renderers
//   rules      - closed catalog of birth/survival rules
//   simulation - grid + rule + wrap policy, advanced one tick at a time
//   stream     - producer/consumer runner publishing generations over a channel
//   patterns   - built-in seed patterns
//   rle        - RLE pattern-file decoder

pub mod error;
pub mod grid;
pub mod patterns;
pub mod rle;
pub mod rules;
pub mod simulation;
pub mod snapshot;
pub mod stream;

pub use error::{BuildError, Edge, GridError, PatternError, StreamError, UnknownRule};
pub use grid::{Cell, Grid, Neighbor, Padding, ALIVE, DEAD};
pub use rules::{Rule, RuleCatalog, RuleEntry};
pub use simulation::{Charmap, Simulation, SimulationConfig};
pub use snapshot::Snapshot;
pub use stream::{channel, ConsumerEnd, Message, ProducerEnd, RunReport, RunState, StreamRunner};
