//! Error types for framewire.

use thiserror::Error;

/// Main error type for all framewire operations.
#[derive(Debug, Error)]
pub enum FramewireError {
    /// I/O error during socket or store operations.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The receiver endpoint could not be reached.
    #[error("failed to connect to {addr}: {source}")]
    Connect {
        addr: String,
        #[source]
        source: std::io::Error,
    },

    /// Invalid input to a framing transform, caught before any network activity.
    #[error("invalid framing input: {0}")]
    Validation(String),

    /// Wire data that does not parse as a frame. Fatal to the affected
    /// connection only.
    #[error("malformed frame: {0}")]
    MalformedFrame(String),

    /// Retry budget exhausted without a matching acknowledgment.
    #[error("frame {seq} not acknowledged after {attempts} attempts")]
    DeliveryFailed { seq: u64, attempts: u32 },

    /// Connection closed by the peer mid-exchange.
    #[error("connection closed")]
    ConnectionClosed,

    /// The send task was cancelled through its token.
    #[error("send cancelled")]
    Cancelled,

    /// Invalid configuration value (environment variable).
    #[error("invalid configuration: {0}")]
    Config(String),
}

/// Result type alias using FramewireError.
pub type Result<T> = std::result::Result<T, FramewireError>;
