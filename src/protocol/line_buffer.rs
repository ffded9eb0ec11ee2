//! Line buffer for accumulating partial reads.
//!
//! Uses `bytes::BytesMut` for buffer management. TCP hands the protocol
//! arbitrary byte chunks; this buffer accumulates them and yields complete
//! newline-terminated lines, stripped of `\n` and an optional preceding
//! `\r`. A line that grows past the configured maximum, or that is not
//! valid UTF-8, is a malformed-frame error.
//!
//! # Example
//!
//! ```
//! use framewire::protocol::LineBuffer;
//!
//! let mut buffer = LineBuffer::new();
//! assert!(buffer.push(b"0:he").unwrap().is_empty());
//! assert_eq!(buffer.push(b"llo\n1:world\n").unwrap(), vec!["0:hello", "1:world"]);
//! ```

use bytes::BytesMut;
use tokio::io::{AsyncRead, AsyncReadExt};

use crate::error::{FramewireError, Result};

/// Maximum accepted line length in bytes.
pub const DEFAULT_MAX_LINE_LEN: usize = 64 * 1024;

/// Buffer for accumulating incoming bytes and extracting complete lines.
#[derive(Debug)]
pub struct LineBuffer {
    /// Accumulated bytes from socket reads.
    buffer: BytesMut,
    /// Maximum allowed line length.
    max_line_len: usize,
}

impl LineBuffer {
    /// Create a new line buffer with the default line limit.
    pub fn new() -> Self {
        Self::with_max_line(DEFAULT_MAX_LINE_LEN)
    }

    /// Create a new line buffer with a custom line limit.
    pub fn with_max_line(max_line_len: usize) -> Self {
        Self {
            buffer: BytesMut::with_capacity(4 * 1024),
            max_line_len,
        }
    }

    /// Push data into the buffer and extract all complete lines.
    ///
    /// Partial trailing data is kept for the next push. Returns an empty
    /// vector while no full line has arrived yet.
    pub fn push(&mut self, data: &[u8]) -> Result<Vec<String>> {
        self.buffer.extend_from_slice(data);

        let mut lines = Vec::new();
        while let Some(line) = self.try_extract_one()? {
            lines.push(line);
        }
        Ok(lines)
    }

    /// Try to extract a single line from the buffer.
    fn try_extract_one(&mut self) -> Result<Option<String>> {
        let Some(newline) = self.buffer.iter().position(|&b| b == b'\n') else {
            if self.buffer.len() > self.max_line_len {
                return Err(FramewireError::MalformedFrame(format!(
                    "line exceeds {} bytes without a newline",
                    self.max_line_len
                )));
            }
            return Ok(None);
        };

        if newline > self.max_line_len {
            return Err(FramewireError::MalformedFrame(format!(
                "line exceeds {} bytes",
                self.max_line_len
            )));
        }

        let mut raw = self.buffer.split_to(newline + 1);
        raw.truncate(newline);
        if raw.last() == Some(&b'\r') {
            raw.truncate(raw.len() - 1);
        }

        let line = String::from_utf8(raw.to_vec())
            .map_err(|_| FramewireError::MalformedFrame("line is not valid UTF-8".to_string()))?;
        Ok(Some(line))
    }

    /// Get the number of buffered bytes.
    pub fn len(&self) -> usize {
        self.buffer.len()
    }

    /// Check if the buffer is empty.
    pub fn is_empty(&self) -> bool {
        self.buffer.is_empty()
    }

    /// Drop any buffered partial line.
    pub fn clear(&mut self) {
        self.buffer.clear();
    }
}

impl Default for LineBuffer {
    fn default() -> Self {
        Self::new()
    }
}

/// Reads lines one at a time from an async byte stream.
///
/// Thin wrapper pairing an [`AsyncRead`] with a [`LineBuffer`]; both the
/// sender (waiting for ACK lines) and the receiver (reading frame lines)
/// drive their sockets through this.
#[derive(Debug)]
pub struct LineReader<R> {
    reader: R,
    buffer: LineBuffer,
    pending: std::collections::VecDeque<String>,
    eof: bool,
}

impl<R: AsyncRead + Unpin> LineReader<R> {
    /// Wrap a byte stream.
    pub fn new(reader: R) -> Self {
        Self {
            reader,
            buffer: LineBuffer::new(),
            pending: std::collections::VecDeque::new(),
            eof: false,
        }
    }

    /// Read the next complete line.
    ///
    /// Returns `Ok(None)` once the peer has closed the stream. A partial
    /// line left without its newline at close is discarded, since every
    /// protocol message is newline-terminated.
    pub async fn next_line(&mut self) -> Result<Option<String>> {
        loop {
            if let Some(line) = self.pending.pop_front() {
                return Ok(Some(line));
            }
            if self.eof {
                return Ok(None);
            }

            let mut chunk = [0u8; 4096];
            let n = self.reader.read(&mut chunk).await?;
            if n == 0 {
                self.eof = true;
                continue;
            }
            self.pending.extend(self.buffer.push(&chunk[..n])?);
        }
    }
}
