//! Intent tracking
//!
//! An [`IntentTracker`] is bound to an active element (e.g. a menu item)
//! and a tracking element (e.g. its submenu). After `watch()` it decides
//! when the cursor has stopped heading toward the tracking element and
//! fires the callbacks registered on the returned [`IntentHandle`].

pub mod config;
pub mod intent;
pub mod queue;

pub use config::{IntentConfig, IntentOptions, DEFAULT_TIMEOUT_MS};
pub use intent::{CancelReason, IntentHandle, IntentTracker, TrackerPhase};
pub use queue::{Callback, CallbackQueue};
