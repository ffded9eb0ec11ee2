//! # framewire
//!
//! Data-link framing codecs and a Stop-and-Wait ARQ transfer over TCP.
//!
//! Two independent teaching pieces live here:
//!
//! - **Framing codecs** ([`framing`]): three stateless transforms that
//!   delimit messages inside a byte or bit stream - length-prefix,
//!   byte-stuffed flag framing, and bit-stuffed flag framing.
//! - **Stop-and-Wait ARQ** ([`sender`], [`receiver`]): a window-size-1
//!   reliable transfer. The sender frames each word with a sequence number,
//!   transmits it, and blocks until the exact acknowledgment arrives within
//!   a deadline, retransmitting otherwise; the receiver accepts only the
//!   in-order frame, persists it durably, and acknowledges it.
//!
//! # Architecture
//!
//! ```text
//!  message ──► framing codec ──► framed text
//!                                    │ split into words
//!  ┌──────────┐  "<seq>:<word>\n"  ┌─▼────────┐
//!  │  Sender  │───────────────────►│ Receiver │──► append-only store
//!  │ (1 frame │◄───────────────────│ (per-conn│
//!  │ in flight)│     "ACK:<seq>\n" │  counter)│
//!  └────┬─────┘                    └──────────┘
//!       └──► session log (every send, ACK, timeout, retransmit)
//! ```
//!
//! # Example
//!
//! ```ignore
//! use framewire::framing::LengthPrefix;
//! use framewire::{Sender, SenderConfig};
//!
//! let framed = LengthPrefix::encode("25642 15632 6541".split_whitespace());
//! let sender = Sender::connect(SenderConfig::default()).await?;
//! let log = sender.send(&framed).await?;
//! println!("{} events", log.len());
//! ```

pub mod config;
pub mod error;
pub mod framing;
pub mod protocol;
pub mod receiver;
pub mod sender;
pub mod session;
pub mod store;

pub use config::{Backoff, ReceiverConfig, RetryPolicy, SenderConfig};
pub use error::{FramewireError, Result};
pub use receiver::Receiver;
pub use sender::{spawn_send, SendTask, Sender};
pub use session::{EventCategory, SessionEvent, SessionLog};
pub use store::FrameStore;
