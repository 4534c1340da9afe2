//! Shared test collaborators for the save pipeline suites

// Each test binary uses a different subset of these helpers
#![allow(dead_code)]

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::sync::broadcast;
use tokio::sync::Notify;
use tunevault_common::events::{EventBus, TvEvent};
use tunevault_sync::fetch::{AudioFetcher, FetchError};
use tunevault_sync::progress::ProgressSink;
use tunevault_sync::store::{StoreError, SyncStore};
use tunevault_sync::sync::{Saver, SyncTracker};

/// Fetcher returning a fixed payload, optionally gated or failing
pub struct MockFetcher {
    pub payload: Vec<u8>,
    pub calls: AtomicUsize,
    pub gate: Option<Arc<Notify>>,
    pub fail: bool,
}

impl MockFetcher {
    pub fn returning(payload: Vec<u8>) -> Self {
        Self {
            payload,
            calls: AtomicUsize::new(0),
            gate: None,
            fail: false,
        }
    }

    pub fn gated(payload: Vec<u8>, gate: Arc<Notify>) -> Self {
        Self {
            gate: Some(gate),
            ..Self::returning(payload)
        }
    }

    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Self::returning(Vec::new())
        }
    }
}

#[async_trait]
impl AudioFetcher for MockFetcher {
    async fn fetch(
        &self,
        _locator: &str,
        progress: &dyn ProgressSink,
    ) -> Result<Vec<u8>, FetchError> {
        self.calls.fetch_add(1, Ordering::SeqCst);

        if let Some(gate) = &self.gate {
            gate.notified().await;
        }
        if self.fail {
            return Err(FetchError::Status(500));
        }

        progress.percent(100);
        Ok(self.payload.clone())
    }
}

/// In-memory store with optional write-failure injection
#[derive(Default)]
pub struct MemStore {
    pub entries: Mutex<HashMap<String, Vec<u8>>>,
    pub fail_writes: bool,
}

impl MemStore {
    pub fn failing_writes() -> Self {
        Self {
            fail_writes: true,
            ..Self::default()
        }
    }

    pub fn entry(&self, name: &str) -> Option<Vec<u8>> {
        self.entries.lock().unwrap().get(name).cloned()
    }

    pub fn len(&self) -> usize {
        self.entries.lock().unwrap().len()
    }
}

#[async_trait]
impl SyncStore for MemStore {
    async fn list(&self) -> Result<Vec<String>, StoreError> {
        Ok(self.entries.lock().unwrap().keys().cloned().collect())
    }

    async fn write(
        &self,
        name: &str,
        bytes: &[u8],
        progress: &dyn ProgressSink,
    ) -> Result<(), StoreError> {
        if self.fail_writes {
            return Err(StoreError::Io(std::io::Error::other(
                "injected write failure",
            )));
        }

        self.entries
            .lock()
            .unwrap()
            .insert(name.to_string(), bytes.to_vec());
        progress.percent(100);
        Ok(())
    }
}

/// Wired-up core with mock collaborators
pub struct Fixture {
    pub bus: EventBus,
    pub fetcher: Arc<MockFetcher>,
    pub store: Arc<MemStore>,
    pub tracker: SyncTracker,
    pub saver: Saver,
}

pub fn fixture(fetcher: MockFetcher, store: MemStore) -> Fixture {
    let bus = EventBus::new(256);
    let fetcher = Arc::new(fetcher);
    let store = Arc::new(store);
    let tracker = SyncTracker::new(store.clone() as Arc<dyn SyncStore>, bus.clone());
    let saver = Saver::new(
        fetcher.clone() as Arc<dyn AudioFetcher>,
        store.clone() as Arc<dyn SyncStore>,
        tracker.clone(),
        bus.clone(),
    );
    Fixture {
        bus,
        fetcher,
        store,
        tracker,
        saver,
    }
}

/// Wait for the next event matching `pred`, draining everything else
pub async fn wait_for(
    rx: &mut broadcast::Receiver<TvEvent>,
    pred: impl Fn(&TvEvent) -> bool,
) -> TvEvent {
    tokio::time::timeout(Duration::from_secs(5), async {
        loop {
            let event = rx.recv().await.expect("event bus closed");
            if pred(&event) {
                return event;
            }
        }
    })
    .await
    .expect("timed out waiting for event")
}

/// Settle the counter cache to a known value before driving saves
pub async fn settle_counter(f: &Fixture) {
    f.tracker.display();
    tokio::time::sleep(Duration::from_millis(20)).await;
}
