//! Protocol module - line-oriented wire format and frame types.
//!
//! The Stop-and-Wait exchange is plain newline-delimited text:
//! - [`Frame`] data lines (`"<seq>:<payload>"`)
//! - [`Ack`] acknowledgment lines (`"ACK:<seq>"`)
//! - the `exit` sentinel ending a session
//! - [`LineBuffer`] / [`LineReader`] for accumulating partial socket reads

mod frame;
mod line_buffer;

pub use frame::{is_exit, Ack, Frame, ACK_PREFIX, EXIT_LINE};
pub use line_buffer::{LineBuffer, LineReader, DEFAULT_MAX_LINE_LEN};
