//! Sender front end: frame a message from stdin and deliver it.
//!
//! The message is read from stdin, framed with the scheme named by
//! `FRAMEWIRE_FRAMING` (`length-prefix`, `byte-stuff` or `bit-stuff`), and
//! driven through the Stop-and-Wait exchange. Session events stream to
//! stdout as they happen - human-readable by default, JSON lines with
//! `FRAMEWIRE_JSON=1`. Endpoint and timing come from the `FRAMEWIRE_*`
//! variables documented in `framewire::config`.

use std::io::Read;

use anyhow::Context;
use framewire::framing::FramingMethod;
use framewire::{spawn_send, SenderConfig};
use tracing_subscriber::EnvFilter;

/// Length with spaces removed, for the input-vs-framed size comparison.
fn squeezed_len(text: &str) -> usize {
    text.chars().filter(|ch| *ch != ' ').count()
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .init();

    let config = SenderConfig::from_env().context("invalid sender configuration")?;
    let method: FramingMethod = std::env::var("FRAMEWIRE_FRAMING")
        .unwrap_or_else(|_| "length-prefix".to_string())
        .parse()
        .context("invalid FRAMEWIRE_FRAMING")?;
    let as_json = std::env::var("FRAMEWIRE_JSON").is_ok_and(|value| value == "1");

    let mut message = String::new();
    std::io::stdin()
        .read_to_string(&mut message)
        .context("failed to read message from stdin")?;
    let message = message.trim();

    let framed = method.encode(message)?;
    println!("framed message: {framed}");
    println!(
        "input length: {}, framed length: {}",
        squeezed_len(message),
        squeezed_len(&framed)
    );

    let mut task = spawn_send(config, framed);
    while let Some(event) = task.next_event().await {
        if as_json {
            println!("{}", serde_json::to_string(&event)?);
        } else {
            println!("{event}");
        }
    }

    let log = task.join().await.context("send failed")?;
    println!("session finished with {} events", log.len());
    Ok(())
}
