//! Advisory progress reporting
//!
//! Progress observation never gates a save's state transitions; a sink that
//! drops updates is acceptable.

/// Receiver for transfer progress updates
pub trait ProgressSink: Send + Sync {
    /// Report the current percentage of bytes transferred (0-100)
    fn percent(&self, percent: u8);
}

impl<F: Fn(u8) + Send + Sync> ProgressSink for F {
    fn percent(&self, percent: u8) {
        self(percent);
    }
}

/// Sink that discards all updates
pub struct NullSink;

impl ProgressSink for NullSink {
    fn percent(&self, _percent: u8) {}
}
