//! Append-only store for accepted payloads.
//!
//! The receiver persists every accepted payload, one per line, in
//! acceptance order, and only acknowledges a frame after the write has been
//! flushed and synced - an ACK implies the payload is on disk. The store is
//! shared by all connection tasks; a mutex serializes writers so concurrent
//! sessions interleave at line granularity.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use tokio::fs::{File, OpenOptions};
use tokio::io::AsyncWriteExt;
use tokio::sync::Mutex;

use crate::error::Result;

/// Durable, append-only line store. Cheap to clone; all clones share the
/// same underlying file handle.
#[derive(Clone)]
pub struct FrameStore {
    path: PathBuf,
    file: Arc<Mutex<File>>,
}

impl FrameStore {
    /// Open the store in append mode, creating the file if needed.
    pub async fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        let file = OpenOptions::new()
            .append(true)
            .create(true)
            .open(&path)
            .await?;
        Ok(Self {
            path,
            file: Arc::new(Mutex::new(file)),
        })
    }

    /// Append one payload line and make it durable before returning.
    pub async fn append(&self, payload: &str) -> Result<()> {
        let mut file = self.file.lock().await;
        file.write_all(payload.as_bytes()).await?;
        file.write_all(b"\n").await?;
        file.flush().await?;
        file.sync_data().await?;
        Ok(())
    }

    /// Path of the backing file.
    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_store_path() -> (tempfile::TempDir, PathBuf) {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("received.txt");
        (dir, path)
    }

    #[tokio::test]
    async fn test_appends_lines_in_order() {
        let (_dir, path) = temp_store_path();
        let store = FrameStore::open(&path).await.unwrap();

        store.append("alpha").await.unwrap();
        store.append("beta").await.unwrap();

        let contents = std::fs::read_to_string(&path).unwrap();
        assert_eq!(contents, "alpha\nbeta\n");
    }

    #[tokio::test]
    async fn test_reopen_appends_rather_than_truncates() {
        let (_dir, path) = temp_store_path();

        let store = FrameStore::open(&path).await.unwrap();
        store.append("first").await.unwrap();
        drop(store);

        let store = FrameStore::open(&path).await.unwrap();
        store.append("second").await.unwrap();

        let contents = std::fs::read_to_string(&path).unwrap();
        assert_eq!(contents, "first\nsecond\n");
    }

    #[tokio::test]
    async fn test_concurrent_writers_interleave_whole_lines() {
        let (_dir, path) = temp_store_path();
        let store = FrameStore::open(&path).await.unwrap();

        let mut tasks = Vec::new();
        for writer in 0..4 {
            let store = store.clone();
            tasks.push(tokio::spawn(async move {
                for i in 0..10 {
                    store.append(&format!("w{writer}-{i}")).await.unwrap();
                }
            }));
        }
        for task in tasks {
            task.await.unwrap();
        }

        let contents = std::fs::read_to_string(&path).unwrap();
        let lines: Vec<&str> = contents.lines().collect();
        assert_eq!(lines.len(), 40);
        // each writer's lines stay in its own order even though the
        // interleaving across writers is undefined
        for writer in 0..4 {
            let seen: Vec<&str> = lines
                .iter()
                .filter(|line| line.starts_with(&format!("w{writer}-")))
                .copied()
                .collect();
            let expected: Vec<String> = (0..10).map(|i| format!("w{writer}-{i}")).collect();
            assert_eq!(seen, expected);
        }
    }
}
