//! Receiver service: listen, accept, persist, acknowledge.
//!
//! Configuration comes from `FRAMEWIRE_*` environment variables; see
//! `framewire::config` for the full table.

use anyhow::Context;
use framewire::{Receiver, ReceiverConfig};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = ReceiverConfig::from_env().context("invalid receiver configuration")?;
    let receiver = Receiver::bind(&config)
        .await
        .context("failed to start receiver")?;
    receiver.run().await.context("receiver failed")
}
