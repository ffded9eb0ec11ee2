//! Session log - the ordered record of one Stop-and-Wait exchange.
//!
//! Every transmit attempt, acknowledgment (matching or not), timeout, and
//! session close is recorded as a [`SessionEvent`]. The accumulated
//! [`SessionLog`] is the sender's return value and the only externally
//! observable trace of a session besides the receiver's store. Events are
//! `Serialize` so a presentation layer can render them without imposing any
//! contract back on the protocol code.
//!
//! Events are grouped into three display categories so front ends can
//! render separate tables: frame transmissions, acknowledgments, and
//! generic transmission events.

use std::fmt;

use serde::Serialize;
use tokio::sync::mpsc;
use tracing::debug;

/// One protocol event, in the order it happened.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum SessionEvent {
    /// A frame was written to the wire. `attempt` is 1-based.
    FrameSent {
        seq: u64,
        payload: String,
        attempt: u32,
    },
    /// The matching acknowledgment arrived in time.
    AckReceived { seq: u64 },
    /// A line arrived that is not the expected acknowledgment.
    WrongAck { seq: u64, line: String },
    /// The acknowledgment deadline expired.
    AckTimeout { seq: u64, attempt: u32 },
    /// The retry budget for one frame ran out.
    DeliveryFailed { seq: u64, attempts: u32 },
    /// All words delivered; the exit sentinel was sent.
    SessionClosed,
}

/// Display category of an event, for partitioned rendering.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventCategory {
    /// Frame transmissions.
    Frame,
    /// Acknowledgments, matching or not.
    Ack,
    /// Timeouts, failures, and session lifecycle.
    Transmission,
}

impl SessionEvent {
    /// Which display category this event belongs to.
    pub fn category(&self) -> EventCategory {
        match self {
            Self::FrameSent { .. } => EventCategory::Frame,
            Self::AckReceived { .. } | Self::WrongAck { .. } => EventCategory::Ack,
            Self::AckTimeout { .. } | Self::DeliveryFailed { .. } | Self::SessionClosed => {
                EventCategory::Transmission
            }
        }
    }
}

impl fmt::Display for SessionEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::FrameSent {
                seq,
                payload,
                attempt,
            } => write!(f, "sent frame {seq}:{payload} (attempt {attempt})"),
            Self::AckReceived { seq } => write!(f, "received ACK for seq {seq}"),
            Self::WrongAck { seq, line } => {
                write!(f, "received {line:?} while waiting for ACK {seq}, retransmitting")
            }
            Self::AckTimeout { seq, attempt } => {
                write!(f, "ACK for seq {seq} not received in time (attempt {attempt}), retransmitting")
            }
            Self::DeliveryFailed { seq, attempts } => {
                write!(f, "giving up on frame {seq} after {attempts} attempts")
            }
            Self::SessionClosed => write!(f, "all frames delivered, session closed"),
        }
    }
}

/// Ordered, append-only record of one session's events.
#[derive(Debug, Default, Clone, Serialize)]
pub struct SessionLog {
    events: Vec<SessionEvent>,
}

impl SessionLog {
    /// Create an empty log.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append one event.
    pub fn push(&mut self, event: SessionEvent) {
        self.events.push(event);
    }

    /// All events, in order.
    pub fn events(&self) -> &[SessionEvent] {
        &self.events
    }

    /// All events rendered as human-readable lines, in order.
    pub fn lines(&self) -> Vec<String> {
        self.events.iter().map(SessionEvent::to_string).collect()
    }

    /// Rendered lines of one display category, in order.
    pub fn category_lines(&self, category: EventCategory) -> Vec<String> {
        self.events
            .iter()
            .filter(|event| event.category() == category)
            .map(SessionEvent::to_string)
            .collect()
    }

    /// Number of recorded events.
    pub fn len(&self) -> usize {
        self.events.len()
    }

    /// Whether anything has been recorded.
    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }
}

/// Accumulates the session log and optionally forwards each event live
/// over a channel, so a subscriber can watch progress without blocking the
/// exchange.
#[derive(Debug)]
pub(crate) struct EventSink {
    log: SessionLog,
    tx: Option<mpsc::UnboundedSender<SessionEvent>>,
}

impl EventSink {
    pub(crate) fn new(tx: Option<mpsc::UnboundedSender<SessionEvent>>) -> Self {
        Self {
            log: SessionLog::new(),
            tx,
        }
    }

    /// Record one event: trace it, forward it to any subscriber, keep it.
    pub(crate) fn record(&mut self, event: SessionEvent) {
        debug!(event = %event, "session event");
        if let Some(tx) = &self.tx {
            // A vanished subscriber must not fail the exchange.
            let _ = tx.send(event.clone());
        }
        self.log.push(event);
    }

    pub(crate) fn into_log(self) -> SessionLog {
        self.log
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_log() -> SessionLog {
        let mut log = SessionLog::new();
        log.push(SessionEvent::FrameSent {
            seq: 0,
            payload: "hello".into(),
            attempt: 1,
        });
        log.push(SessionEvent::AckTimeout { seq: 0, attempt: 1 });
        log.push(SessionEvent::FrameSent {
            seq: 0,
            payload: "hello".into(),
            attempt: 2,
        });
        log.push(SessionEvent::AckReceived { seq: 0 });
        log.push(SessionEvent::SessionClosed);
        log
    }

    #[test]
    fn test_events_keep_insertion_order() {
        let log = sample_log();
        assert_eq!(log.len(), 5);
        assert!(matches!(log.events()[0], SessionEvent::FrameSent { .. }));
        assert!(matches!(log.events()[4], SessionEvent::SessionClosed));
    }

    #[test]
    fn test_lines_are_human_readable() {
        let log = sample_log();
        let lines = log.lines();
        assert_eq!(lines[0], "sent frame 0:hello (attempt 1)");
        assert_eq!(lines[3], "received ACK for seq 0");
    }

    #[test]
    fn test_category_partition() {
        let log = sample_log();
        assert_eq!(log.category_lines(EventCategory::Frame).len(), 2);
        assert_eq!(log.category_lines(EventCategory::Ack).len(), 1);
        assert_eq!(log.category_lines(EventCategory::Transmission).len(), 2);
    }

    #[test]
    fn test_events_serialize_with_tag() {
        let event = SessionEvent::FrameSent {
            seq: 2,
            payload: "word".into(),
            attempt: 1,
        };
        let json = serde_json::to_string(&event).unwrap();
        assert_eq!(
            json,
            r#"{"event":"frame_sent","seq":2,"payload":"word","attempt":1}"#
        );
    }

    #[test]
    fn test_sink_forwards_and_accumulates() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let mut sink = EventSink::new(Some(tx));

        sink.record(SessionEvent::AckReceived { seq: 7 });
        assert_eq!(
            rx.try_recv().unwrap(),
            SessionEvent::AckReceived { seq: 7 }
        );

        let log = sink.into_log();
        assert_eq!(log.events(), &[SessionEvent::AckReceived { seq: 7 }]);
    }

    #[test]
    fn test_sink_survives_dropped_subscriber() {
        let (tx, rx) = mpsc::unbounded_channel();
        drop(rx);
        let mut sink = EventSink::new(Some(tx));
        sink.record(SessionEvent::SessionClosed);
        assert_eq!(sink.into_log().len(), 1);
    }
}
