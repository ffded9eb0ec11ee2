//! Configuration for the sender and receiver.
//!
//! Everything is environment-driven (no CLI flags). Each config has a
//! `Default` suited to a localhost deployment and a `from_env()` that
//! overlays `FRAMEWIRE_*` variables on top of it. Unparseable values are
//! configuration errors, never silent fallbacks.
//!
//! | Variable | Default | Used by |
//! |---|---|---|
//! | `FRAMEWIRE_HOST` | `127.0.0.1` | sender |
//! | `FRAMEWIRE_BIND` | `0.0.0.0` | receiver |
//! | `FRAMEWIRE_PORT` | `65432` | both |
//! | `FRAMEWIRE_ACK_TIMEOUT_MS` | `5000` | sender |
//! | `FRAMEWIRE_SEND_DELAY_MS` | `100` | sender |
//! | `FRAMEWIRE_MAX_ATTEMPTS` | `8` | sender |
//! | `FRAMEWIRE_BACKOFF_FACTOR` | unset (fixed deadline) | sender |
//! | `FRAMEWIRE_OUTPUT` | `received.txt` | receiver |

use std::env::{self, VarError};
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use crate::error::{FramewireError, Result};

/// Default port the receiver listens on.
pub const DEFAULT_PORT: u16 = 65432;

/// Default per-attempt acknowledgment deadline.
pub const DEFAULT_ACK_TIMEOUT: Duration = Duration::from_millis(5000);

/// Default pause between successive word sends (throughput throttle).
pub const DEFAULT_INTER_FRAME_DELAY: Duration = Duration::from_millis(100);

/// Default transmission budget per frame.
pub const DEFAULT_MAX_ATTEMPTS: u32 = 8;

/// Default ceiling for backed-off deadlines.
pub const DEFAULT_MAX_BACKOFF: Duration = Duration::from_secs(60);

/// Default path of the append-only output store.
pub const DEFAULT_OUTPUT_PATH: &str = "received.txt";

/// Exponential growth of the acknowledgment deadline across retries.
#[derive(Debug, Clone)]
pub struct Backoff {
    /// Deadline multiplier applied once per failed attempt.
    pub factor: u32,
    /// Upper bound for the scaled deadline.
    pub max_timeout: Duration,
}

/// Bounded retransmission policy for one frame.
///
/// The reference behavior (retry forever with a fixed deadline) is replaced
/// by a hard attempt cap; exhaustion surfaces as
/// [`FramewireError::DeliveryFailed`] so callers get a defined failure path.
#[derive(Debug, Clone)]
pub struct RetryPolicy {
    /// Maximum transmissions of one frame, including the first.
    pub max_attempts: u32,
    /// `None` keeps the deadline fixed across attempts.
    pub backoff: Option<Backoff>,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: DEFAULT_MAX_ATTEMPTS,
            backoff: None,
        }
    }
}

impl RetryPolicy {
    /// Acknowledgment deadline for the given 1-based attempt number.
    pub fn timeout_for_attempt(&self, base: Duration, attempt: u32) -> Duration {
        match &self.backoff {
            None => base,
            Some(backoff) => {
                // Cap the exponent so the u32 multiplier cannot overflow.
                let exponent = attempt.saturating_sub(1).min(16);
                base.saturating_mul(backoff.factor.saturating_pow(exponent))
                    .min(backoff.max_timeout)
            }
        }
    }
}

/// Configuration for [`crate::sender::Sender`].
#[derive(Debug, Clone)]
pub struct SenderConfig {
    /// Receiver host or address.
    pub host: String,
    /// Receiver port.
    pub port: u16,
    /// Base per-attempt deadline, measured from transmit to receive.
    pub ack_timeout: Duration,
    /// Fixed pause between successive word sends.
    pub inter_frame_delay: Duration,
    /// Retransmission policy.
    pub retry: RetryPolicy,
}

impl Default for SenderConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: DEFAULT_PORT,
            ack_timeout: DEFAULT_ACK_TIMEOUT,
            inter_frame_delay: DEFAULT_INTER_FRAME_DELAY,
            retry: RetryPolicy::default(),
        }
    }
}

impl SenderConfig {
    /// Build a config from `FRAMEWIRE_*` environment variables.
    pub fn from_env() -> Result<Self> {
        let mut config = Self::default();
        if let Some(host) = read_env("FRAMEWIRE_HOST")? {
            config.host = host;
        }
        config.port = parse_env("FRAMEWIRE_PORT", config.port)?;
        config.ack_timeout = Duration::from_millis(parse_env(
            "FRAMEWIRE_ACK_TIMEOUT_MS",
            config.ack_timeout.as_millis() as u64,
        )?);
        config.inter_frame_delay = Duration::from_millis(parse_env(
            "FRAMEWIRE_SEND_DELAY_MS",
            config.inter_frame_delay.as_millis() as u64,
        )?);
        config.retry.max_attempts =
            parse_env("FRAMEWIRE_MAX_ATTEMPTS", config.retry.max_attempts)?;
        if let Some(raw) = read_env("FRAMEWIRE_BACKOFF_FACTOR")? {
            let factor = raw.parse::<u32>().map_err(|_| {
                FramewireError::Config(format!(
                    "FRAMEWIRE_BACKOFF_FACTOR must be an integer, got {raw:?}"
                ))
            })?;
            config.retry.backoff = Some(Backoff {
                factor,
                max_timeout: DEFAULT_MAX_BACKOFF,
            });
        }
        Ok(config)
    }

    /// `host:port` of the receiver endpoint.
    pub fn addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// Configuration for [`crate::receiver::Receiver`].
#[derive(Debug, Clone)]
pub struct ReceiverConfig {
    /// Address to bind the listener to.
    pub host: String,
    /// Port to listen on. Port 0 picks an ephemeral port.
    pub port: u16,
    /// Path of the append-only output store.
    pub output_path: PathBuf,
}

impl Default for ReceiverConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: DEFAULT_PORT,
            output_path: PathBuf::from(DEFAULT_OUTPUT_PATH),
        }
    }
}

impl ReceiverConfig {
    /// Build a config from `FRAMEWIRE_*` environment variables.
    pub fn from_env() -> Result<Self> {
        let mut config = Self::default();
        if let Some(host) = read_env("FRAMEWIRE_BIND")? {
            config.host = host;
        }
        config.port = parse_env("FRAMEWIRE_PORT", config.port)?;
        if let Some(path) = read_env("FRAMEWIRE_OUTPUT")? {
            config.output_path = PathBuf::from(path);
        }
        Ok(config)
    }

    /// `host:port` to bind the listener to.
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// Read an optional environment variable as a string.
fn read_env(key: &str) -> Result<Option<String>> {
    match env::var(key) {
        Ok(value) => Ok(Some(value)),
        Err(VarError::NotPresent) => Ok(None),
        Err(VarError::NotUnicode(_)) => Err(FramewireError::Config(format!(
            "{key} is not valid unicode"
        ))),
    }
}

/// Read an environment variable and parse it, falling back to `default`
/// when the variable is unset.
fn parse_env<T: FromStr>(key: &str, default: T) -> Result<T> {
    match read_env(key)? {
        Some(raw) => raw.trim().parse().map_err(|_| {
            FramewireError::Config(format!("{key} has an unparseable value {raw:?}"))
        }),
        None => Ok(default),
    }
}
