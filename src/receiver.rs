//! Stop-and-Wait receiver: listener, per-connection sessions, durable store.
//!
//! [`Receiver`] accepts connections indefinitely and serves each one on its
//! own task, so a stalled peer never blocks acceptance. Every connection
//! owns its own expected-sequence counter, scoped exactly to that
//! connection's lifetime - concurrent sessions cannot interfere with each
//! other. The only state shared across connections is the append-only
//! [`FrameStore`].
//!
//! Per connection: an in-order frame is persisted, then acknowledged, then
//! the counter advances - an ACK always implies the payload is on disk.
//! Out-of-order and duplicate frames are discarded without acknowledgment
//! (no buffering, no NACK); the sender's timeout drives recovery. A
//! malformed line terminates only the affected connection.

use std::net::SocketAddr;

use tokio::io::{AsyncRead, AsyncWrite, AsyncWriteExt};
use tokio::net::TcpListener;
use tracing::{debug, info, warn};

use crate::config::ReceiverConfig;
use crate::error::Result;
use crate::protocol::{is_exit, Ack, Frame, LineReader};
use crate::store::FrameStore;

/// Listening side of the Stop-and-Wait exchange.
pub struct Receiver {
    listener: TcpListener,
    store: FrameStore,
}

impl Receiver {
    /// Bind the listener and open the output store.
    pub async fn bind(config: &ReceiverConfig) -> Result<Self> {
        let store = FrameStore::open(&config.output_path).await?;
        let listener = TcpListener::bind(config.bind_addr()).await?;
        info!(
            addr = %listener.local_addr()?,
            store = %store.path().display(),
            "receiver listening"
        );
        Ok(Self { listener, store })
    }

    /// Address the listener is bound to. Useful with port 0.
    pub fn local_addr(&self) -> Result<SocketAddr> {
        Ok(self.listener.local_addr()?)
    }

    /// Accept and serve connections until the task is dropped.
    ///
    /// One failed accept or one misbehaving connection never brings the
    /// listener down.
    pub async fn run(self) -> Result<()> {
        loop {
            match self.listener.accept().await {
                Ok((stream, peer)) => {
                    info!(%peer, "client connected");
                    let store = self.store.clone();
                    tokio::spawn(async move {
                        let (read_half, write_half) = stream.into_split();
                        let session = Session::new(LineReader::new(read_half), write_half, store);
                        if let Err(error) = session.run().await {
                            warn!(%peer, %error, "connection terminated");
                        }
                        info!(%peer, "connection closed");
                    });
                }
                Err(error) => {
                    warn!(%error, "accept failed");
                }
            }
        }
    }
}

/// One connection's receive loop and its own expected-sequence counter.
pub(crate) struct Session<R, W> {
    reader: LineReader<R>,
    writer: W,
    store: FrameStore,
    expected_seq: u64,
}

impl<R, W> Session<R, W>
where
    R: AsyncRead + Unpin,
    W: AsyncWrite + Unpin,
{
    pub(crate) fn new(reader: LineReader<R>, writer: W, store: FrameStore) -> Self {
        Self {
            reader,
            writer,
            store,
            expected_seq: 0,
        }
    }

    /// Serve until the peer closes, sends the exit sentinel, or sends a
    /// malformed line.
    pub(crate) async fn run(mut self) -> Result<()> {
        while let Some(line) = self.reader.next_line().await? {
            if is_exit(&line) {
                debug!("peer ended the session");
                break;
            }

            let frame = Frame::parse(&line)?;
            if frame.seq == self.expected_seq {
                // persist, then acknowledge: the ACK promises durability
                self.store.append(&frame.payload).await?;
                self.writer
                    .write_all(Ack::new(self.expected_seq).encode().as_bytes())
                    .await?;
                self.writer.flush().await?;
                debug!(seq = frame.seq, payload = %frame.payload, "frame accepted");
                self.expected_seq += 1;
            } else {
                warn!(
                    expected = self.expected_seq,
                    got = frame.seq,
                    "out-of-order frame discarded"
                );
            }
        }
        Ok(())
    }
}
