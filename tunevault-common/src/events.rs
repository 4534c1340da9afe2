//! Event types for the tunevault event system
//!
//! Provides shared event definitions and EventBus for the sync service and
//! any player UI process listening on its event stream.

use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;
use uuid::Uuid;

/// Stage of an in-flight save operation
///
/// A save progresses `Queued → Downloading → Inspecting → Writing → Done`,
/// with `Failed` reachable from `Downloading` or `Writing`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SaveStage {
    /// Admitted to the pending set, not yet started
    Queued,
    /// Resource bytes are being fetched from the source locator
    Downloading,
    /// Trailing tag block is being inspected/constructed
    Inspecting,
    /// Final byte sequence is being persisted to the synchronized store
    Writing,
    /// Save completed successfully
    Done,
    /// Save failed (terminal; the pending entry has been released)
    Failed,
}

impl std::fmt::Display for SaveStage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            SaveStage::Queued => "Queued",
            SaveStage::Downloading => "Downloading",
            SaveStage::Inspecting => "Inspecting",
            SaveStage::Writing => "Writing",
            SaveStage::Done => "Done",
            SaveStage::Failed => "Failed",
        };
        f.write_str(s)
    }
}

/// Tunevault event types
///
/// Events are broadcast via EventBus and can be serialized for SSE
/// transmission. All cross-process notifications use this central enum for
/// type safety and exhaustive matching.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum TvEvent {
    /// Synchronized-file counter display value changed
    ///
    /// Triggers:
    /// - SSE: Update the cloud counter badge in every connected UI
    CounterUpdated {
        /// Display value: "" (zero, idle), "3" (known count), "3+" (known
        /// count with pending work) or "..." (unknown / recomputing)
        value: String,
        /// When the value changed
        timestamp: chrono::DateTime<chrono::Utc>,
    },

    /// Save request admitted and queued
    ///
    /// Triggers:
    /// - SSE: Mark the track's cloud control as pending
    SaveStarted {
        /// Save attempt UUID
        save_id: Uuid,
        /// Source locator being saved
        locator: String,
        /// When the save was admitted
        timestamp: chrono::DateTime<chrono::Utc>,
    },

    /// Advisory progress for an in-flight save
    ///
    /// Emitted on download/write percentage changes. Never gates state
    /// transitions; lost progress events are harmless.
    SaveProgress {
        /// Save attempt UUID
        save_id: Uuid,
        /// Source locator being saved
        locator: String,
        /// Current stage of the save
        stage: SaveStage,
        /// Percentage of bytes transferred in this stage (0-100)
        percent: u8,
        /// When progress was observed
        timestamp: chrono::DateTime<chrono::Utc>,
    },

    /// Save persisted to the synchronized store
    ///
    /// Triggers:
    /// - SSE: Clear the pending marker, refresh counter badge
    SaveCompleted {
        /// Save attempt UUID
        save_id: Uuid,
        /// Source locator that was saved
        locator: String,
        /// Entry name created in the synchronized store
        file_name: String,
        /// When the write completed
        timestamp: chrono::DateTime<chrono::Utc>,
    },

    /// Save failed during download or write
    ///
    /// The pending entry has been released; the caller may retry by issuing
    /// a fresh save request.
    SaveFailed {
        /// Save attempt UUID
        save_id: Uuid,
        /// Source locator that failed
        locator: String,
        /// Stage in which the failure occurred
        stage: SaveStage,
        /// Error message details
        error: String,
        /// When the failure occurred
        timestamp: chrono::DateTime<chrono::Utc>,
    },
}

impl TvEvent {
    /// Get event type as string for filtering
    pub fn event_type(&self) -> &str {
        match self {
            TvEvent::CounterUpdated { .. } => "CounterUpdated",
            TvEvent::SaveStarted { .. } => "SaveStarted",
            TvEvent::SaveProgress { .. } => "SaveProgress",
            TvEvent::SaveCompleted { .. } => "SaveCompleted",
            TvEvent::SaveFailed { .. } => "SaveFailed",
        }
    }
}

/// Central event distribution bus for application-wide events
///
/// The EventBus uses tokio::broadcast internally, providing:
/// - Non-blocking publish (slow subscribers don't block producers)
/// - Multiple concurrent subscribers
/// - Automatic cleanup when subscribers drop
/// - Lagged message detection for slow subscribers
#[derive(Clone)]
pub struct EventBus {
    tx: broadcast::Sender<TvEvent>,
    capacity: usize,
}

impl EventBus {
    /// Creates a new EventBus with specified channel capacity
    ///
    /// `capacity` is the number of events buffered before old events are
    /// dropped for lagging subscribers.
    pub fn new(capacity: usize) -> Self {
        let (tx, _) = broadcast::channel(capacity);
        Self { tx, capacity }
    }

    /// Subscribe to all future events
    ///
    /// Events emitted before subscription are not received.
    pub fn subscribe(&self) -> broadcast::Receiver<TvEvent> {
        self.tx.subscribe()
    }

    /// Emit an event to all subscribers
    ///
    /// Returns `Ok(subscriber_count)` if at least one subscriber exists,
    /// `Err` if no subscribers are listening.
    #[allow(clippy::result_large_err)]
    pub fn emit(&self, event: TvEvent) -> Result<usize, broadcast::error::SendError<TvEvent>> {
        self.tx.send(event)
    }

    /// Emit an event, ignoring if no subscribers are listening
    ///
    /// Counter updates and progress events are acceptable to lose when no
    /// component is currently listening.
    pub fn emit_lossy(&self, event: TvEvent) {
        let _ = self.tx.send(event);
    }

    /// Get the current number of active subscribers
    pub fn subscriber_count(&self) -> usize {
        self.tx.receiver_count()
    }

    /// Get the configured channel capacity
    pub fn capacity(&self) -> usize {
        self.capacity
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_eventbus_new() {
        let bus = EventBus::new(100);
        assert_eq!(bus.capacity(), 100);
        assert_eq!(bus.subscriber_count(), 0);
    }

    #[test]
    fn test_eventbus_subscribe() {
        let bus = EventBus::new(10);
        let _rx = bus.subscribe();
        assert_eq!(bus.subscriber_count(), 1);

        let _rx2 = bus.subscribe();
        assert_eq!(bus.subscriber_count(), 2);
    }

    #[test]
    fn test_eventbus_emit() {
        let bus = EventBus::new(10);
        let mut rx = bus.subscribe();

        bus.emit(TvEvent::CounterUpdated {
            value: "3+".to_string(),
            timestamp: chrono::Utc::now(),
        })
        .expect("emit should succeed");

        let received = rx.try_recv().expect("should receive event");
        assert_eq!(received.event_type(), "CounterUpdated");
    }

    #[test]
    fn test_eventbus_emit_lossy_without_subscribers() {
        let bus = EventBus::new(2);

        // No subscribers: emit_lossy must not panic or error
        bus.emit_lossy(TvEvent::SaveStarted {
            save_id: Uuid::new_v4(),
            locator: "https://example.com/a.mp3".to_string(),
            timestamp: chrono::Utc::now(),
        });
    }

    #[test]
    fn test_eventbus_multiple_subscribers() {
        let bus = EventBus::new(10);
        let mut rx1 = bus.subscribe();
        let mut rx2 = bus.subscribe();

        bus.emit(TvEvent::CounterUpdated {
            value: "".to_string(),
            timestamp: chrono::Utc::now(),
        })
        .expect("emit should succeed");

        assert_eq!(rx1.try_recv().unwrap().event_type(), "CounterUpdated");
        assert_eq!(rx2.try_recv().unwrap().event_type(), "CounterUpdated");
    }

    #[test]
    fn test_event_serialization_tagged() {
        let event = TvEvent::SaveProgress {
            save_id: Uuid::new_v4(),
            locator: "https://example.com/a.mp3".to_string(),
            stage: SaveStage::Downloading,
            percent: 42,
            timestamp: chrono::Utc::now(),
        };

        let json = serde_json::to_string(&event).expect("serialization should succeed");
        assert!(json.contains("\"type\":\"SaveProgress\""));
        assert!(json.contains("\"stage\":\"Downloading\""));
        assert!(json.contains("\"percent\":42"));

        let back: TvEvent = serde_json::from_str(&json).expect("deserialization should succeed");
        assert_eq!(back.event_type(), "SaveProgress");
    }

    #[test]
    fn test_event_type_method() {
        let events = vec![
            (
                TvEvent::CounterUpdated {
                    value: "1".to_string(),
                    timestamp: chrono::Utc::now(),
                },
                "CounterUpdated",
            ),
            (
                TvEvent::SaveCompleted {
                    save_id: Uuid::new_v4(),
                    locator: "u".to_string(),
                    file_name: "Artist - Title.mp3".to_string(),
                    timestamp: chrono::Utc::now(),
                },
                "SaveCompleted",
            ),
            (
                TvEvent::SaveFailed {
                    save_id: Uuid::new_v4(),
                    locator: "u".to_string(),
                    stage: SaveStage::Writing,
                    error: "disk full".to_string(),
                    timestamp: chrono::Utc::now(),
                },
                "SaveFailed",
            ),
        ];

        for (event, expected_type) in events {
            assert_eq!(event.event_type(), expected_type);
        }
    }
}
