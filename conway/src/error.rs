// error.rs - Error types for grid construction, rule lookup and streaming

use thiserror::Error;

/// Which edge of a grid a padding operation touched.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Edge {
    Top,
    Right,
    Bottom,
    Left,
}

impl std::fmt::Display for Edge {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Edge::Top => "top",
            Edge::Right => "right",
            Edge::Bottom => "bottom",
            Edge::Left => "left",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GridError {
    #[error("seed is {rows} rows with a row of {columns} cells, expected {height} rows of {width}")]
    DimensionMismatch {
        width: usize,
        height: usize,
        rows: usize,
        columns: usize,
    },
    #[error("cannot remove {amount} from the {edge} edge, only {available} available")]
    ShrinkUnderflow {
        edge: Edge,
        amount: usize,
        available: usize,
    },
}

/// A rule string that matched no alias in the catalog.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown rule `{0}`")]
pub struct UnknownRule(pub String);

#[derive(Debug, Error)]
pub enum BuildError {
    #[error(transparent)]
    Grid(#[from] GridError),
    #[error(transparent)]
    Rule(#[from] UnknownRule),
}

#[derive(Debug, Error)]
pub enum StreamError {
    /// The consumer dropped its end without asking to cancel.
    #[error("consumer hung up after {ticks} ticks without cancelling")]
    ConsumerGone { ticks: u64 },
    #[error("consumer task panicked: {0}")]
    ConsumerPanicked(String),
}

#[derive(Debug, Error)]
pub enum PatternError {
    #[error("failed to read pattern file: {0}")]
    Io(#[from] std::io::Error),
    #[error("pattern has no `x = .., y = ..` header line")]
    MissingHeader,
    #[error("malformed header `{0}`")]
    BadHeader(String),
    #[error("unexpected `{token}` on line {line}")]
    InvalidToken { token: char, line: usize },
    #[error("run count on line {line} is too long")]
    RunTooLong { line: usize },
    #[error("cell ({x}, {y}) lies outside the declared {width}x{height} area")]
    OutOfBounds {
        x: usize,
        y: usize,
        width: usize,
        height: usize,
    },
}
