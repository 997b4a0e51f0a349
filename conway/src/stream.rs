// stream.rs - Publishes generations to an independently running renderer
//
// The producer (StreamRunner) and the consumer (a renderer) share nothing but
// a duplex channel:
//
//   producer -> consumer   Delay, Frame, Frame, ..., Cancel   (bounded)
//   consumer -> producer   Cancel                              (one slot)
//
// Downstream, Cancel is the end-of-stream sentinel. Upstream, it is the
// consumer asking the producer to stop early. The producer only ever polls
// the upstream side, so a silent consumer cannot hold back the tick loop;
// a consumer that stops reading does hold it back once the downstream
// buffer is full, since publishing then waits for room.

use std::time::Duration;

use log::{debug, trace, warn};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

pub use tokio::sync::mpsc::error::TryRecvError;

use crate::error::StreamError;
use crate::simulation::Simulation;
use crate::snapshot::Snapshot;

/// Default downstream buffer, in messages.
pub const DEFAULT_CAPACITY: usize = 16;

#[derive(Debug, Clone, PartialEq)]
pub enum Message {
    /// Seconds between frames; always the first message downstream.
    Delay(f64),
    Frame(Snapshot),
    /// End of stream downstream, cancellation request upstream.
    Cancel,
}

/// Consumer-facing end of the channel.
#[derive(Debug)]
pub struct ConsumerEnd {
    frames: mpsc::Receiver<Message>,
    signals: mpsc::Sender<Message>,
    cancelled: bool,
}

/// Producer-facing end of the channel.
#[derive(Debug)]
pub struct ProducerEnd {
    frames: mpsc::Sender<Message>,
    signals: mpsc::Receiver<Message>,
}

/// Creates a connected pair. `capacity` bounds the downstream buffer (minimum 1).
pub fn channel(capacity: usize) -> (ProducerEnd, ConsumerEnd) {
    let (frame_tx, frame_rx) = mpsc::channel(capacity.max(1));
    let (signal_tx, signal_rx) = mpsc::channel(1);
    (
        ProducerEnd {
            frames: frame_tx,
            signals: signal_rx,
        },
        ConsumerEnd {
            frames: frame_rx,
            signals: signal_tx,
            cancelled: false,
        },
    )
}

impl ConsumerEnd {
    /// Next message, or `None` once the producer has hung up.
    pub async fn recv(&mut self) -> Option<Message> {
        self.frames.recv().await
    }

    /// Blocking variant of [`ConsumerEnd::recv`] for renderers on plain threads.
    /// Must not be called from within an async task.
    pub fn blocking_recv(&mut self) -> Option<Message> {
        self.frames.blocking_recv()
    }

    pub fn try_recv(&mut self) -> Result<Message, TryRecvError> {
        self.frames.try_recv()
    }

    /// Reads the frame delay, which the producer sends before any generation.
    pub fn blocking_delay(&mut self) -> Option<Duration> {
        match self.blocking_recv()? {
            Message::Delay(seconds) => Duration::try_from_secs_f64(seconds.max(0.0)).ok(),
            other => {
                warn!("expected the frame delay first, got {:?}", other);
                None
            }
        }
    }

    /// Asks the producer to stop. Only the first call sends anything; returns
    /// whether this call did.
    pub fn cancel(&mut self) -> bool {
        if self.cancelled {
            return false;
        }
        self.cancelled = true;
        match self.signals.try_send(Message::Cancel) {
            Ok(()) => true,
            Err(err) => {
                debug!("cancel not delivered: {}", err);
                false
            }
        }
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled
    }
}

impl ProducerEnd {
    /// Sends downstream, waiting for buffer space. Fails once the consumer has dropped its end.
    pub async fn publish(&self, message: Message) -> Result<(), Message> {
        self.frames.send(message).await.map_err(|err| err.0)
    }

    /// Non-blocking check for a cancellation request.
    pub fn cancel_requested(&mut self) -> bool {
        match self.signals.try_recv() {
            Ok(Message::Cancel) => true,
            Ok(other) => {
                warn!("ignoring unexpected upstream message {:?}", other);
                false
            }
            Err(TryRecvError::Empty | TryRecvError::Disconnected) => false,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunState {
    Starting,
    Streaming,
    Draining,
    Terminated,
}

/// What a run did.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunReport {
    pub ticks: u64,
    pub frames: u64,
    pub cancelled: bool,
}

/// Drives a simulation for a fixed number of ticks, publishing every
/// generation to a consumer.
#[derive(Debug, Clone)]
pub struct StreamRunner {
    iterations: u64,
    delay: f64,
    capacity: usize,
}

impl StreamRunner {
    pub fn new(iterations: u64) -> Self {
        Self {
            iterations,
            delay: 0.1,
            capacity: DEFAULT_CAPACITY,
        }
    }

    /// Seconds between frames, passed on to the consumer.
    pub fn delay(mut self, seconds: f64) -> Self {
        self.delay = seconds;
        self
    }

    pub fn capacity(mut self, capacity: usize) -> Self {
        self.capacity = capacity;
        self
    }

    pub fn iterations(&self) -> u64 {
        self.iterations
    }

    /// Launches `consumer` on a blocking worker and streams to it.
    pub async fn run<F>(&self, sim: &mut Simulation, consumer: F) -> Result<RunReport, StreamError>
    where
        F: FnOnce(ConsumerEnd) + Send + 'static,
    {
        let (producer, consumer_end) = channel(self.capacity);
        let handle = tokio::task::spawn_blocking(move || consumer(consumer_end));
        self.stream(sim, producer, Some(handle)).await
    }

    /// Streams to a consumer that the caller runs elsewhere, e.g. on the main
    /// thread when a window system demands it.
    pub async fn drive(&self, sim: &mut Simulation, producer: ProducerEnd) -> Result<RunReport, StreamError> {
        self.stream(sim, producer, None).await
    }

    async fn stream(
        &self,
        sim: &mut Simulation,
        mut producer: ProducerEnd,
        consumer: Option<JoinHandle<()>>,
    ) -> Result<RunReport, StreamError> {
        let mut report = RunReport::default();
        let mut state = RunState::Starting;
        let mut fault = None;

        while state != RunState::Terminated {
            debug!("stream {:?}", state);
            state = match state {
                RunState::Starting => match producer.publish(Message::Delay(self.delay)).await {
                    Ok(()) => RunState::Streaming,
                    Err(_) => {
                        fault = Some(StreamError::ConsumerGone { ticks: 0 });
                        RunState::Terminated
                    }
                },
                RunState::Streaming => {
                    match self.stream_frames(sim, &mut producer, &mut report).await {
                        Ok(()) => RunState::Draining,
                        Err(err) => {
                            fault = Some(err);
                            RunState::Terminated
                        }
                    }
                }
                RunState::Draining => {
                    let sent = producer.publish(Message::Cancel).await.is_ok();
                    // a cancel can still arrive between the last tick and the sentinel
                    if !report.cancelled {
                        report.cancelled = producer.cancel_requested();
                    }
                    if !sent && !report.cancelled {
                        fault = Some(StreamError::ConsumerGone { ticks: report.ticks });
                    }
                    RunState::Terminated
                }
                RunState::Terminated => RunState::Terminated,
            };
        }
        // closes the downstream side
        drop(producer);

        if let Some(handle) = consumer {
            if let Err(err) = handle.await {
                return Err(StreamError::ConsumerPanicked(err.to_string()));
            }
        }
        match fault {
            Some(err) => Err(err),
            None => {
                debug!(
                    "stream done: {} ticks, {} frames, cancelled={}",
                    report.ticks, report.frames, report.cancelled
                );
                Ok(report)
            }
        }
    }

    async fn stream_frames(
        &self,
        sim: &mut Simulation,
        producer: &mut ProducerEnd,
        report: &mut RunReport,
    ) -> Result<(), StreamError> {
        while report.ticks < self.iterations {
            sim.tick();
            report.ticks += 1;

            if producer.publish(Message::Frame(sim.snapshot())).await.is_err() {
                // a consumer that cancelled may already be gone
                if producer.cancel_requested() {
                    report.cancelled = true;
                    return Ok(());
                }
                return Err(StreamError::ConsumerGone { ticks: report.ticks });
            }
            report.frames += 1;
            trace!("published generation {}", sim.generation());

            if producer.cancel_requested() {
                debug!("consumer cancelled after {} ticks", report.ticks);
                report.cancelled = true;
                return Ok(());
            }
        }
        Ok(())
    }
}
