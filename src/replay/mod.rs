//! Offline replay of recorded pointer traces
//!
//! Feeds a recorded sequence of mouse positions through an
//! [`IntentTracker`](crate::tracker::IntentTracker) on a virtual clock to
//! see whether, when and why the session would have resolved.

pub mod runner;
pub mod types;

pub use runner::{load_trace, replay_trace, ReplayReport};
pub use types::PointerSample;
