//! Host environment capabilities
//!
//! The tracker never touches a real UI toolkit. Everything it needs from
//! the outside world (element geometry, pointer movement, timers, and an
//! optional debug overlay) goes through the traits defined here.

pub mod debug;
pub mod manual;
pub mod tokio_timer;

pub use debug::{DebugFrame, DebugMarker, DebugRenderer, MarkerColor, OverlayBox, TracingRenderer};
pub use manual::ManualHost;
pub use tokio_timer::TokioTimers;

use crate::geometry::{Bounds, Point};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;

/// Opaque handle to a host element
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ElementId(pub u64);

/// Handle returned by [`PointerSource::subscribe`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(pub u64);

/// Handle returned by [`TimerScheduler::schedule`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TimerId(pub u64);

/// Pointer-movement handler, invoked with page coordinates
pub type PointerHandler = Arc<dyn Fn(Point) + Send + Sync>;

/// One-shot timer callback
pub type TimerCallback = Box<dyn FnOnce() + Send>;

/// Synchronous element geometry queries
pub trait BoundsSource: Send + Sync {
    /// Current bounding box of `element`, or `None` if it is detached
    fn bounding_box(&self, element: ElementId) -> Option<Bounds>;
}

/// Global pointer-movement event stream
///
/// `subscribe` may deliver a movement to the new handler before returning.
pub trait PointerSource: Send + Sync {
    fn subscribe(&self, handler: PointerHandler) -> SubscriptionId;

    /// Remove a handler. Unknown or already-removed ids are ignored.
    fn unsubscribe(&self, id: SubscriptionId);
}

/// One-shot timers
///
/// A zero or elapsed delay may run the callback from inside `schedule`.
pub trait TimerScheduler: Send + Sync {
    fn schedule(&self, delay: Duration, callback: TimerCallback) -> TimerId;

    /// Cancel a pending timer. Fired or unknown ids are ignored.
    fn cancel(&self, id: TimerId);
}

/// The set of host capabilities a tracker is bound to
#[derive(Clone)]
pub struct Environment {
    pub bounds: Arc<dyn BoundsSource>,
    pub pointer: Arc<dyn PointerSource>,
    pub timers: Arc<dyn TimerScheduler>,
    pub renderer: Option<Arc<dyn DebugRenderer>>,
}

impl Environment {
    pub fn new(
        bounds: Arc<dyn BoundsSource>,
        pointer: Arc<dyn PointerSource>,
        timers: Arc<dyn TimerScheduler>,
    ) -> Self {
        Self {
            bounds,
            pointer,
            timers,
            renderer: None,
        }
    }

    /// Attach a debug overlay renderer (used only when `debug` is enabled)
    pub fn with_renderer(mut self, renderer: Arc<dyn DebugRenderer>) -> Self {
        self.renderer = Some(renderer);
        self
    }

    /// Replace the timer scheduler, e.g. with [`TokioTimers`]
    pub fn with_timers(mut self, timers: Arc<dyn TimerScheduler>) -> Self {
        self.timers = timers;
        self
    }
}

impl std::fmt::Debug for Environment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Environment")
            .field("renderer", &self.renderer.is_some())
            .finish_non_exhaustive()
    }
}
