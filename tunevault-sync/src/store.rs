//! Synchronized store access
//!
//! The store is an external, eventually-consistent file storage service: a
//! local folder mirrored to a remote authority by a sync agent outside this
//! process. The core only lists entry names and writes complete entries.

use crate::progress::ProgressSink;
use async_trait::async_trait;
use std::path::PathBuf;
use thiserror::Error;
use tokio::io::AsyncWriteExt;
use tracing::debug;

/// Chunk size for store writes; chunking exists only for progress reporting
const WRITE_CHUNK: usize = 256 * 1024;

/// Store errors
#[derive(Debug, Error)]
pub enum StoreError {
    /// I/O failure while listing or writing
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Entry name would escape the store root
    #[error("Invalid entry name: {0}")]
    InvalidName(String),
}

/// Capability to enumerate and persist entries in the synchronized store
#[async_trait]
pub trait SyncStore: Send + Sync {
    /// List the names of all entries currently in the store
    async fn list(&self) -> Result<Vec<String>, StoreError>;

    /// Persist `bytes` under `name`, creating the entry if absent and
    /// replacing it otherwise, reporting advisory write progress
    async fn write(
        &self,
        name: &str,
        bytes: &[u8],
        progress: &dyn ProgressSink,
    ) -> Result<(), StoreError>;
}

/// Store backed by the locally mirrored folder
pub struct LocalStore {
    root: PathBuf,
}

impl LocalStore {
    pub fn new(root: PathBuf) -> Self {
        Self { root }
    }

    /// Entry names come from user-supplied metadata; anything that would
    /// resolve outside the store root is rejected.
    fn entry_path(&self, name: &str) -> Result<PathBuf, StoreError> {
        if name.is_empty()
            || name.contains('/')
            || name.contains('\\')
            || name == "."
            || name == ".."
        {
            return Err(StoreError::InvalidName(name.to_string()));
        }
        Ok(self.root.join(name))
    }
}

#[async_trait]
impl SyncStore for LocalStore {
    async fn list(&self) -> Result<Vec<String>, StoreError> {
        let mut names = Vec::new();
        let mut entries = tokio::fs::read_dir(&self.root).await?;

        while let Some(entry) = entries.next_entry().await? {
            if entry.file_type().await?.is_file() {
                if let Some(name) = entry.file_name().to_str() {
                    names.push(name.to_string());
                }
            }
        }

        Ok(names)
    }

    async fn write(
        &self,
        name: &str,
        bytes: &[u8],
        progress: &dyn ProgressSink,
    ) -> Result<(), StoreError> {
        let path = self.entry_path(name)?;
        let mut file = tokio::fs::File::create(&path).await?;

        let total = bytes.len().max(1);
        let mut written = 0usize;

        for chunk in bytes.chunks(WRITE_CHUNK) {
            file.write_all(chunk).await?;
            written += chunk.len();

            let percent = ((written * 100) / total).min(100) as u8;
            debug!(entry = %name, "{} percent written", percent);
            progress.percent(percent);
        }

        file.flush().await?;
        Ok(())
    }
}
