//! Data frames and acknowledgments in their line-oriented wire form.
//!
//! The wire protocol is newline-delimited text:
//! - data frame: `"<seq>:<payload>\n"`
//! - acknowledgment: `"ACK:<seq>\n"`
//! - session end: `"exit\n"` (compared case-insensitively)
//!
//! Parsing splits at the **first** colon, so payloads may themselves contain
//! colons. Payloads must not contain newlines; the sender only ever frames
//! whitespace-split words, which upholds that by construction.
//!
//! # Example
//!
//! ```
//! use framewire::protocol::{Ack, Frame};
//!
//! let frame = Frame::new(3, "hello".to_string());
//! assert_eq!(frame.encode(), "3:hello\n");
//!
//! let parsed = Frame::parse("3:hello").unwrap();
//! assert_eq!(parsed, frame);
//!
//! assert!(Ack::new(3).matches_line("ACK:3"));
//! ```

use crate::error::{FramewireError, Result};

/// Sentinel line that ends a session.
pub const EXIT_LINE: &str = "exit";

/// Prefix of every acknowledgment line.
pub const ACK_PREFIX: &str = "ACK:";

/// Whether a received line is the session-end sentinel.
pub fn is_exit(line: &str) -> bool {
    line.eq_ignore_ascii_case(EXIT_LINE)
}

/// One numbered data frame.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Frame {
    /// Sequence number, starting at 0 per session.
    pub seq: u64,
    /// The framed word. Must not contain a newline.
    pub payload: String,
}

impl Frame {
    /// Create a new frame.
    pub fn new(seq: u64, payload: String) -> Self {
        Self { seq, payload }
    }

    /// Encode to the wire line, including the trailing newline.
    pub fn encode(&self) -> String {
        format!("{}:{}\n", self.seq, self.payload)
    }

    /// Parse a received line (without its newline) into a frame.
    ///
    /// Splits at the first colon; anything after it is payload verbatim.
    pub fn parse(line: &str) -> Result<Self> {
        let (seq, payload) = line.split_once(':').ok_or_else(|| {
            FramewireError::MalformedFrame(format!("missing ':' separator in {line:?}"))
        })?;
        let seq = seq.parse::<u64>().map_err(|_| {
            FramewireError::MalformedFrame(format!("bad sequence number in {line:?}"))
        })?;
        Ok(Self {
            seq,
            payload: payload.to_string(),
        })
    }
}

/// Acknowledgment of one data frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Ack {
    /// Sequence number being acknowledged.
    pub seq: u64,
}

impl Ack {
    /// Create a new acknowledgment.
    pub fn new(seq: u64) -> Self {
        Self { seq }
    }

    /// Encode to the wire line, including the trailing newline.
    pub fn encode(&self) -> String {
        format!("{ACK_PREFIX}{}\n", self.seq)
    }

    /// Whether a received line (without its newline) is exactly this
    /// acknowledgment. The sender requires an exact textual match; anything
    /// else counts as a wrong ACK and triggers a retransmit.
    pub fn matches_line(&self, line: &str) -> bool {
        line.strip_prefix(ACK_PREFIX)
            .is_some_and(|rest| rest == self.seq.to_string())
    }
}
