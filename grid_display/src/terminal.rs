// terminal.rs - Text dump renderer: clear the screen, print the generation, sleep

use std::io::{self, Write};
use std::thread;

use conway::{Charmap, ConsumerEnd, Message, Snapshot};
use log::{debug, warn};

use crate::RenderError;

const CLEAR_SCREEN: &str = "\x1b[2J\x1b[H";

/// Renders to stdout. Blocks until the stream ends; run it off the async runtime.
pub fn display(end: ConsumerEnd, charmap: Charmap) -> Result<(), RenderError> {
    display_to(end, &charmap, io::stdout().lock())
}

pub fn display_to<W: Write>(mut end: ConsumerEnd, charmap: &Charmap, mut out: W) -> Result<(), RenderError> {
    let Some(delay) = end.blocking_delay() else {
        end.cancel();
        return Err(RenderError::MissingDelay);
    };

    let mut frames = 0u64;
    while let Some(message) = end.blocking_recv() {
        match message {
            Message::Frame(snapshot) => {
                if let Err(err) = draw(&mut out, &snapshot, charmap) {
                    end.cancel();
                    return Err(err.into());
                }
                frames += 1;
                thread::sleep(delay);
            }
            Message::Cancel => break,
            Message::Delay(_) => warn!("ignoring repeated frame delay"),
        }
    }
    debug!("terminal renderer drew {} frames", frames);
    Ok(())
}

fn draw<W: Write>(out: &mut W, snapshot: &Snapshot, charmap: &Charmap) -> io::Result<()> {
    out.write_all(CLEAR_SCREEN.as_bytes())?;
    out.write_all(snapshot.render(charmap).as_bytes())?;
    out.flush()
}

#[cfg(test)]
mod tests {
    use super::*;
    use conway::{SimulationConfig, StreamRunner};
    use std::sync::{Arc, Mutex};

    #[derive(Clone, Default)]
    struct SharedBuffer(Arc<Mutex<Vec<u8>>>);

    impl Write for SharedBuffer {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    struct BrokenPipe;

    impl Write for BrokenPipe {
        fn write(&mut self, _: &[u8]) -> io::Result<usize> {
            Err(io::ErrorKind::BrokenPipe.into())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    #[tokio::test]
    async fn draws_every_generation() {
        let mut sim = SimulationConfig::new(3, 3)
            .seed(vec![vec![0, 1, 0]; 3])
            .wrap(false)
            .build()
            .unwrap();
        let buffer = SharedBuffer::default();
        let out = buffer.clone();

        let report = StreamRunner::new(2)
            .delay(0.0)
            .run(&mut sim, move |end| {
                display_to(end, &Charmap::new("#", "."), out).unwrap();
            })
            .await
            .unwrap();

        let text = String::from_utf8(buffer.0.lock().unwrap().clone()).unwrap();
        let frames: Vec<&str> = text.split(CLEAR_SCREEN).filter(|f| !f.is_empty()).collect();
        assert_eq!(frames, vec!["...\n###\n...\n", ".#.\n.#.\n.#.\n"]);
        assert!(!report.cancelled);
    }

    #[test_log::test(tokio::test)]
    async fn write_failure_cancels_the_stream() {
        let mut sim = SimulationConfig::new(4, 4).rng_seed(1).build().unwrap();
        let failed = Arc::new(Mutex::new(false));
        let flag = Arc::clone(&failed);

        let report = StreamRunner::new(500)
            .delay(0.0)
            .capacity(1)
            .run(&mut sim, move |end| {
                let result = display_to(end, &Charmap::default(), BrokenPipe);
                *flag.lock().unwrap() = matches!(result, Err(RenderError::Io(_)));
            })
            .await
            .unwrap();

        assert!(*failed.lock().unwrap());
        assert!(report.cancelled);
        assert!(report.ticks < 500);
    }
}
