//! Save orchestration
//!
//! Drives one save operation end-to-end:
//! `Queued → Downloading → Inspecting → Writing → Done`, with `Failed`
//! terminal from `Downloading` or `Writing`. Each admitted request runs as
//! its own background task; a failure is scoped to that attempt and never
//! fatal to the process.

use super::{SyncTracker, AUDIO_EXT};
use crate::fetch::{AudioFetcher, FetchError};
use crate::store::{StoreError, SyncStore};
use crate::tag::id3v1;
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, error, info};
use tunevault_common::events::{EventBus, SaveStage, TvEvent};
use uuid::Uuid;

/// Save pipeline errors
#[derive(Debug, Error)]
pub enum SaveError {
    /// Download failed; the pending entry is released, nothing was written
    #[error("Download failed: {0}")]
    Fetch(#[from] FetchError),

    /// Persistence failed; the pending entry is released, the counter is
    /// left unmodified since no entry was created
    #[error("Store write failed: {0}")]
    Store(#[from] StoreError),
}

impl SaveError {
    /// Stage in which this error terminates the save
    fn stage(&self) -> SaveStage {
        match self {
            SaveError::Fetch(_) => SaveStage::Downloading,
            SaveError::Store(_) => SaveStage::Writing,
        }
    }
}

/// Download/write orchestrator
///
/// Cheaply cloneable; clones share the fetcher, store and tracker.
#[derive(Clone)]
pub struct Saver {
    fetcher: Arc<dyn AudioFetcher>,
    store: Arc<dyn SyncStore>,
    tracker: SyncTracker,
    bus: EventBus,
}

impl Saver {
    pub fn new(
        fetcher: Arc<dyn AudioFetcher>,
        store: Arc<dyn SyncStore>,
        tracker: SyncTracker,
        bus: EventBus,
    ) -> Self {
        Self {
            fetcher,
            store,
            tracker,
            bus,
        }
    }

    /// Enqueue a save for `locator` with the given metadata fields.
    ///
    /// Both text fields are trimmed before use. A second request for a
    /// locator that is still in flight is a silent no-op. Errors are never
    /// surfaced synchronously; they arrive as `SaveFailed` events.
    pub fn request_save(&self, artist: &str, title: &str, locator: &str) {
        let artist = artist.trim().to_string();
        let title = title.trim().to_string();
        let locator = locator.to_string();

        if !self.tracker.admit(&locator) {
            debug!(locator = %locator, "Save already in flight, ignoring duplicate request");
            return;
        }

        let save_id = Uuid::new_v4();
        info!(save_id = %save_id, locator = %locator, "Save request admitted");
        self.bus.emit_lossy(TvEvent::SaveStarted {
            save_id,
            locator: locator.clone(),
            timestamp: chrono::Utc::now(),
        });

        let this = self.clone();
        tokio::spawn(async move {
            match this.execute(save_id, &artist, &title, &locator).await {
                Ok(file_name) => {
                    this.tracker.release(&locator);
                    this.tracker.increment();
                    info!(save_id = %save_id, file = %file_name, "Save completed");
                    this.bus.emit_lossy(TvEvent::SaveCompleted {
                        save_id,
                        locator,
                        file_name,
                        timestamp: chrono::Utc::now(),
                    });
                }
                Err(e) => {
                    this.tracker.release(&locator);
                    error!(save_id = %save_id, locator = %locator, "Save failed: {}", e);
                    this.bus.emit_lossy(TvEvent::SaveFailed {
                        save_id,
                        locator,
                        stage: e.stage(),
                        error: e.to_string(),
                        timestamp: chrono::Utc::now(),
                    });
                }
            }
        });
    }

    /// Run the download → inspect → write pipeline for one admitted request.
    async fn execute(
        &self,
        save_id: Uuid,
        artist: &str,
        title: &str,
        locator: &str,
    ) -> Result<String, SaveError> {
        let download_sink = self.progress_sink(save_id, locator, SaveStage::Downloading);
        let bytes = self.fetcher.fetch(locator, &download_sink).await?;
        debug!(save_id = %save_id, size = bytes.len(), "Download complete, inspecting trailer");

        self.emit_progress(save_id, locator, SaveStage::Inspecting, 0);
        let bytes = id3v1::finalize(bytes, artist, title);

        let file_name = format!("{} - {}{}", artist, title, AUDIO_EXT);
        let write_sink = self.progress_sink(save_id, locator, SaveStage::Writing);
        self.store.write(&file_name, &bytes, &write_sink).await?;

        Ok(file_name)
    }

    fn progress_sink(
        &self,
        save_id: Uuid,
        locator: &str,
        stage: SaveStage,
    ) -> impl Fn(u8) + Send + Sync {
        let bus = self.bus.clone();
        let locator = locator.to_string();
        move |percent| {
            bus.emit_lossy(TvEvent::SaveProgress {
                save_id,
                locator: locator.clone(),
                stage,
                percent,
                timestamp: chrono::Utc::now(),
            });
        }
    }

    fn emit_progress(&self, save_id: Uuid, locator: &str, stage: SaveStage, percent: u8) {
        self.bus.emit_lossy(TvEvent::SaveProgress {
            save_id,
            locator: locator.to_string(),
            stage,
            percent,
            timestamp: chrono::Utc::now(),
        });
    }
}
