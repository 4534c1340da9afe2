//! Pending set and synchronized-file counter cache
//!
//! The pending set guarantees at most one concurrent save per source
//! locator. The counter caches the number of audio entries in the
//! synchronized store; it starts unknown, is recomputed on demand by
//! enumerating the store, and is invalidated by remote-originated change
//! notifications. A completed recount is authoritative and overwrites any
//! interim incremented value.

use super::AUDIO_EXT;
use crate::store::SyncStore;
use std::collections::HashSet;
use std::sync::{Arc, Mutex};
use tracing::{debug, warn};
use tunevault_common::events::{EventBus, TvEvent};

/// Pending-set and counter-cache service object
///
/// Constructed once at startup and cloned into the saver and the API layer
/// (clones share the same state). Both locks are held only for short
/// non-suspending sections.
#[derive(Clone)]
pub struct SyncTracker {
    /// Source locators currently being downloaded/written
    pending: Arc<Mutex<HashSet<String>>>,
    /// Count of synchronized audio entries; `None` = unknown
    counter: Arc<Mutex<Option<u64>>>,
    store: Arc<dyn SyncStore>,
    bus: EventBus,
}

impl SyncTracker {
    pub fn new(store: Arc<dyn SyncStore>, bus: EventBus) -> Self {
        Self {
            pending: Arc::new(Mutex::new(HashSet::new())),
            counter: Arc::new(Mutex::new(None)),
            store,
            bus,
        }
    }

    /// Admit a locator into the pending set.
    ///
    /// Returns true when the locator was newly added, false when a save for
    /// it is already in flight. Admission broadcasts the updated display
    /// value; a rejected admission changes nothing and stays silent.
    pub fn admit(&self, locator: &str) -> bool {
        let added = self.pending.lock().unwrap().insert(locator.to_string());
        if added {
            self.broadcast();
        }
        added
    }

    /// Remove a locator from the pending set unconditionally.
    pub fn release(&self, locator: &str) {
        self.pending.lock().unwrap().remove(locator);
        self.broadcast();
    }

    /// Bump a known count by one.
    ///
    /// No-op while the count is unknown: the in-flight recount enumerates
    /// the store after the write landed and picks the new entry up.
    pub fn increment(&self) {
        {
            let mut counter = self.counter.lock().unwrap();
            match counter.as_mut() {
                Some(n) => *n += 1,
                None => return,
            }
        }
        self.broadcast();
    }

    /// Mark the count unknown and start an asynchronous recount.
    pub fn invalidate(&self) {
        *self.counter.lock().unwrap() = None;
        self.broadcast();
        self.spawn_recount();
    }

    /// Current display value.
    ///
    /// Reading while the count is unknown triggers a recount and returns the
    /// provisional marker in the meantime.
    pub fn display(&self) -> String {
        if self.counter.lock().unwrap().is_none() {
            self.spawn_recount();
        }
        self.current_display()
    }

    /// Number of in-flight saves
    pub fn pending_count(&self) -> usize {
        self.pending.lock().unwrap().len()
    }

    fn spawn_recount(&self) {
        let this = self.clone();
        tokio::spawn(async move {
            this.recount().await;
        });
    }

    /// Enumerate the store and overwrite the cached count with the result.
    async fn recount(&self) {
        let names = match self.store.list().await {
            Ok(names) => names,
            Err(e) => {
                // Count stays unknown; the next read retries
                warn!("Store enumeration failed: {}", e);
                return;
            }
        };

        let count = names.iter().filter(|n| n.ends_with(AUDIO_EXT)).count() as u64;
        debug!(count, "Recount complete");

        *self.counter.lock().unwrap() = Some(count);
        self.broadcast();
    }

    /// Broadcast the current display value to all observers.
    fn broadcast(&self) {
        self.bus.emit_lossy(TvEvent::CounterUpdated {
            value: self.current_display(),
            timestamp: chrono::Utc::now(),
        });
    }

    fn current_display(&self) -> String {
        let count = *self.counter.lock().unwrap();
        let pending = self.pending.lock().unwrap().len();
        compose_display(count, pending)
    }
}

/// Human-facing counter string: "" (zero, idle), "3" (known count),
/// "3+" (known count, pending work), "..." (unknown, or pending with zero
/// known entries).
fn compose_display(count: Option<u64>, pending: usize) -> String {
    match count {
        None => "...".to_string(),
        Some(0) => {
            if pending > 0 {
                "...".to_string()
            } else {
                String::new()
            }
        }
        Some(n) => {
            if pending > 0 {
                format!("{}+", n)
            } else {
                n.to_string()
            }
        }
    }
}
