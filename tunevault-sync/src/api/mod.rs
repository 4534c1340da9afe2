//! HTTP API handlers for tunevault-sync
//!
//! The player UI and other processes integrate via HTTP REST + SSE.

pub mod changes;
pub mod counter;
pub mod health;
pub mod save;
pub mod sse;

pub use changes::store_routes;
pub use counter::counter_routes;
pub use health::health_routes;
pub use save::save_routes;
pub use sse::event_stream;
