//! Synchronized-file-store uploader core
//!
//! One save request flows: pending-set admission → download → trailing tag
//! inspection → store write → counter increment. The tracker and saver are
//! constructed once at startup and shared by reference.

pub mod saver;
pub mod tracker;

pub use saver::Saver;
pub use tracker::SyncTracker;

/// Extension of every audio entry this service creates and counts
pub const AUDIO_EXT: &str = ".mp3";
