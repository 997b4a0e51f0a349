// lib.rs - Renderers that consume a generation stream
//
// Every renderer follows the same protocol on its ConsumerEnd: read the frame
// delay, draw frames until the end-of-stream sentinel arrives, and send a
// cancellation if it stops on its own before that.

use thiserror::Error;

pub mod terminal;
pub mod window;

#[derive(Debug, Error)]
pub enum RenderError {
    #[error("stream did not open with a frame delay")]
    MissingDelay,
    #[error("failed to draw frame: {0}")]
    Io(#[from] std::io::Error),
    #[error("window backend failed: {0}")]
    Window(String),
}
