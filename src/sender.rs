//! Stop-and-Wait sender: one connection, one frame in flight.
//!
//! [`Sender`] owns the connection to the receiver for its whole lifetime.
//! `send` splits the message into whitespace-delimited words, frames them
//! with sequence numbers 0,1,2,... and drives each through the
//! transmit/await-ACK exchange before touching the next - at most one frame
//! is ever in flight. A frame is retransmitted on deadline expiry or on any
//! line that is not its exact acknowledgment, up to the configured attempt
//! budget; exhaustion fails the send with
//! [`FramewireError::DeliveryFailed`].
//!
//! For callers that must not block on the exchange, [`spawn_send`] runs it
//! on its own task, streams every [`SessionEvent`] over a channel as it
//! happens, and exposes a cancellation token.
//!
//! # Example
//!
//! ```ignore
//! use framewire::{Sender, SenderConfig};
//!
//! let sender = Sender::connect(SenderConfig::default()).await?;
//! let log = sender.send("625642 615632 65641").await?;
//! for line in log.lines() {
//!     println!("{line}");
//! }
//! ```

use std::time::Duration;

use tokio::io::AsyncWriteExt;
use tokio::net::tcp::{OwnedReadHalf, OwnedWriteHalf};
use tokio::net::TcpStream;
use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;
use tokio::time::timeout;
use tracing::info;

use crate::config::SenderConfig;
use crate::error::{FramewireError, Result};
use crate::protocol::{Ack, Frame, LineReader, EXIT_LINE};
use crate::session::{EventSink, SessionEvent, SessionLog};

/// What came back while waiting for one acknowledgment.
enum AckOutcome {
    /// The exact expected ACK line.
    Acked,
    /// Some other line; retransmit.
    Wrong(String),
    /// Deadline expired; retransmit.
    TimedOut,
}

/// Stop-and-Wait ARQ sender for one session.
#[derive(Debug)]
pub struct Sender {
    config: SenderConfig,
    reader: LineReader<OwnedReadHalf>,
    writer: OwnedWriteHalf,
    sink: EventSink,
    cancel: Option<watch::Receiver<bool>>,
}

impl Sender {
    /// Open the connection to the configured receiver endpoint.
    pub async fn connect(config: SenderConfig) -> Result<Self> {
        let addr = config.addr();
        let stream = TcpStream::connect(&addr)
            .await
            .map_err(|source| FramewireError::Connect {
                addr: addr.clone(),
                source,
            })?;
        info!(%addr, "connected to receiver");

        let (read_half, write_half) = stream.into_split();
        Ok(Self {
            config,
            reader: LineReader::new(read_half),
            writer: write_half,
            sink: EventSink::new(None),
            cancel: None,
        })
    }

    /// Forward every session event live over `tx` in addition to the
    /// returned log.
    pub fn events(mut self, tx: mpsc::UnboundedSender<SessionEvent>) -> Self {
        self.sink = EventSink::new(Some(tx));
        self
    }

    /// Observe a cancellation token. Setting it to `true` aborts the
    /// exchange with [`FramewireError::Cancelled`] at the next attempt
    /// boundary or while waiting for an ACK.
    pub fn cancel_token(mut self, rx: watch::Receiver<bool>) -> Self {
        self.cancel = Some(rx);
        self
    }

    /// Deliver `message`, one word per frame, and return the session log.
    ///
    /// Consumes the sender: the connection is closed with the exit
    /// sentinel once every word has been acknowledged.
    pub async fn send(mut self, message: &str) -> Result<SessionLog> {
        let words: Vec<&str> = message.split_whitespace().collect();
        info!(words = words.len(), "starting stop-and-wait session");

        for (index, word) in words.iter().enumerate() {
            let frame = Frame::new(index as u64, (*word).to_string());
            self.send_with_retry(&frame).await?;

            // throughput throttle between words, not a correctness knob
            if index + 1 < words.len() && !self.config.inter_frame_delay.is_zero() {
                tokio::time::sleep(self.config.inter_frame_delay).await;
            }
        }

        self.writer
            .write_all(format!("{EXIT_LINE}\n").as_bytes())
            .await?;
        self.writer.flush().await?;
        self.sink.record(SessionEvent::SessionClosed);
        info!("session complete");

        Ok(self.sink.into_log())
    }

    /// Transmit one frame until its acknowledgment arrives or the attempt
    /// budget runs out.
    async fn send_with_retry(&mut self, frame: &Frame) -> Result<()> {
        let line = frame.encode();
        let max_attempts = self.config.retry.max_attempts;

        for attempt in 1..=max_attempts {
            if self.is_cancelled() {
                return Err(FramewireError::Cancelled);
            }

            self.writer.write_all(line.as_bytes()).await?;
            self.writer.flush().await?;
            self.sink.record(SessionEvent::FrameSent {
                seq: frame.seq,
                payload: frame.payload.clone(),
                attempt,
            });

            let deadline = self
                .config
                .retry
                .timeout_for_attempt(self.config.ack_timeout, attempt);
            match self.await_ack(frame.seq, deadline).await? {
                AckOutcome::Acked => {
                    self.sink.record(SessionEvent::AckReceived { seq: frame.seq });
                    return Ok(());
                }
                AckOutcome::Wrong(received) => {
                    self.sink.record(SessionEvent::WrongAck {
                        seq: frame.seq,
                        line: received,
                    });
                }
                AckOutcome::TimedOut => {
                    self.sink.record(SessionEvent::AckTimeout {
                        seq: frame.seq,
                        attempt,
                    });
                }
            }
        }

        self.sink.record(SessionEvent::DeliveryFailed {
            seq: frame.seq,
            attempts: max_attempts,
        });
        Err(FramewireError::DeliveryFailed {
            seq: frame.seq,
            attempts: max_attempts,
        })
    }

    /// Block for one line within `deadline`, classifying what arrived.
    ///
    /// The deadline is wall-clock, measured from transmit to receive. A
    /// peer close while waiting is a structural failure of the whole send.
    async fn await_ack(&mut self, seq: u64, deadline: Duration) -> Result<AckOutcome> {
        let Self { reader, cancel, .. } = self;

        tokio::select! {
            () = cancelled(cancel) => Err(FramewireError::Cancelled),
            received = timeout(deadline, reader.next_line()) => match received {
                Ok(Ok(Some(line))) => {
                    if Ack::new(seq).matches_line(&line) {
                        Ok(AckOutcome::Acked)
                    } else {
                        Ok(AckOutcome::Wrong(line))
                    }
                }
                Ok(Ok(None)) => Err(FramewireError::ConnectionClosed),
                Ok(Err(error)) => Err(error),
                Err(_elapsed) => Ok(AckOutcome::TimedOut),
            },
        }
    }

    fn is_cancelled(&self) -> bool {
        self.cancel.as_ref().is_some_and(|rx| *rx.borrow())
    }
}

/// Resolve once the token flips to `true`; pend forever when no token is
/// installed or its sender side is gone.
async fn cancelled(cancel: &mut Option<watch::Receiver<bool>>) {
    if let Some(rx) = cancel {
        loop {
            if *rx.borrow() {
                return;
            }
            if rx.changed().await.is_err() {
                break;
            }
        }
    }
    std::future::pending::<()>().await
}

/// A send running on its own task.
///
/// Subscribe to progress with [`next_event`](SendTask::next_event), abort
/// with [`cancel`](SendTask::cancel), and collect the final outcome with
/// [`join`](SendTask::join).
pub struct SendTask {
    events: mpsc::UnboundedReceiver<SessionEvent>,
    cancel: watch::Sender<bool>,
    handle: JoinHandle<Result<SessionLog>>,
}

impl SendTask {
    /// Next live event, or `None` once the exchange has finished.
    pub async fn next_event(&mut self) -> Option<SessionEvent> {
        self.events.recv().await
    }

    /// Ask the exchange to stop. Takes effect at the next attempt boundary
    /// or while waiting for an ACK; `join` then yields
    /// [`FramewireError::Cancelled`].
    pub fn cancel(&self) {
        let _ = self.cancel.send(true);
    }

    /// Wait for the exchange to finish and return its session log.
    pub async fn join(self) -> Result<SessionLog> {
        match self.handle.await {
            Ok(outcome) => outcome,
            Err(join_error) => Err(FramewireError::Io(std::io::Error::other(join_error))),
        }
    }
}

/// Run the whole connect-and-send exchange on a spawned task.
///
/// Events flow over the returned task's channel as they happen, so a
/// presentation layer can render progress without blocking its own control
/// flow.
pub fn spawn_send(config: SenderConfig, message: String) -> SendTask {
    let (event_tx, events) = mpsc::unbounded_channel();
    let (cancel_tx, cancel_rx) = watch::channel(false);

    let handle = tokio::spawn(async move {
        Sender::connect(config)
            .await?
            .events(event_tx)
            .cancel_token(cancel_rx)
            .send(&message)
            .await
    });

    SendTask {
        events,
        cancel: cancel_tx,
        handle,
    }
}
