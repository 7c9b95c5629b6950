//! Intent Tracker - keep menus open while the cursor heads for them.
//!
//! When the pointer leaves a menu item on its way to the item's submenu it
//! usually crosses neighbouring items. This crate decides whether that
//! movement is still aimed at the submenu by testing it against a triangle
//! spanned by the cursor and the submenu's near edge, and signals once when
//! the user has strayed or the timeout has passed.

pub mod error;
pub mod geometry;
pub mod host;
pub mod replay;
pub mod tracker;

pub use error::{IntentError, IntentResult};
pub use geometry::{point_in_triangle, Bounds, Point, Triangle};
pub use host::{
    BoundsSource, DebugFrame, DebugRenderer, ElementId, Environment, ManualHost, PointerSource,
    TimerScheduler, TokioTimers, TracingRenderer,
};
pub use replay::{load_trace, replay_trace, PointerSample, ReplayReport};
pub use tracker::{CancelReason, IntentConfig, IntentHandle, IntentOptions, IntentTracker, TrackerPhase};

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Initialize tracing/logging
///
/// Honors `RUST_LOG`; defaults to debug output for this crate. Calling it
/// again after a subscriber is installed leaves that subscriber in place.
pub fn init_tracing() {
    if let Err(e) = tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "intent_tracker=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .try_init()
    {
        tracing::debug!("Tracing subscriber already installed: {}", e);
    }
}
