//! Intent tracker state machine
//!
//! ```text
//! Idle -> Armed -> Tracking -> Resolved
//!           \______________/
//!              timeout
//! ```
//!
//! `watch()` arms a timer and subscribes to pointer movement. The first
//! movement measures the tracked element and fixes the intent triangle.
//! Every movement is tested against it; leaving the triangle, or the timer
//! elapsing, resolves the session and fires the queued callbacks once.

use super::config::{IntentConfig, IntentOptions};
use super::queue::{Callback, CallbackQueue};
use crate::geometry::{Bounds, Point, Triangle};
use crate::host::{DebugFrame, ElementId, Environment, PointerHandler, SubscriptionId, TimerId};
use parking_lot::Mutex as ParkingMutex;
use serde::{Deserialize, Serialize};
use std::sync::{Arc, Weak};
use uuid::Uuid;

/// Lifecycle phase of a tracker
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TrackerPhase {
    /// Constructed, not watching
    Idle,
    /// Timer running and subscribed; triangle not yet established
    Armed,
    /// Triangle established on the first movement
    Tracking,
    /// Session over: callbacks fired, timer cleared, unsubscribed
    Resolved,
}

impl TrackerPhase {
    pub fn is_live(&self) -> bool {
        matches!(self, TrackerPhase::Armed | TrackerPhase::Tracking)
    }
}

/// Why a session resolved
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum CancelReason {
    /// The timeout elapsed first
    Timeout,
    /// The cursor moved outside the intent triangle
    LeftTriangle,
    /// [`IntentTracker::cancel`] was called
    Manual,
}

struct TrackerState {
    phase: TrackerPhase,
    /// Incremented by every `watch()` that starts a new session
    session: u64,
    mouse: Option<Point>,
    triangle: Option<Triangle>,
    queue: CallbackQueue,
    timer: Option<TimerId>,
    subscription: Option<SubscriptionId>,
    last_reason: Option<CancelReason>,
}

struct Inner {
    id: Uuid,
    active: ElementId,
    tracking: ElementId,
    config: IntentConfig,
    env: Environment,
    state: ParkingMutex<TrackerState>,
}

impl Inner {
    fn tracking_bounds(&self) -> Bounds {
        self.env.bounds.bounding_box(self.tracking).unwrap_or_else(|| {
            tracing::warn!(
                "Intent tracker {}: tracking element {:?} has no bounds, treating as empty",
                self.id,
                self.tracking
            );
            Bounds::default()
        })
    }

    fn on_move(&self, session: u64, p: Point) {
        let established = {
            let mut state = self.state.lock();
            if state.session != session || !state.phase.is_live() {
                return;
            }
            state.mouse = Some(p);
            state.triangle
        };

        let triangle = match established {
            Some(triangle) => triangle,
            None => match self.establish(session, p) {
                Some(triangle) => triangle,
                None => return,
            },
        };

        if self.config.debug {
            if let Some(renderer) = &self.env.renderer {
                renderer.render(&DebugFrame::new(p, &triangle));
            }
        }

        let inside = triangle.contains(p);
        tracing::trace!(
            "Intent tracker {}: move to ({}, {}) inside={}",
            self.id,
            p.x,
            p.y,
            inside
        );

        if !inside {
            self.resolve(session, CancelReason::LeftTriangle);
        }
    }

    /// Record the subscription for a still-live session
    fn store_subscription(&self, session: u64, id: SubscriptionId) -> bool {
        let mut state = self.state.lock();
        if state.session != session || !state.phase.is_live() {
            return false;
        }
        state.subscription = Some(id);
        true
    }

    fn store_timer(&self, session: u64, id: TimerId) -> bool {
        let mut state = self.state.lock();
        if state.session != session || !state.phase.is_live() {
            return false;
        }
        state.timer = Some(id);
        true
    }

    /// Measure the tracked element and fix the triangle with `p` as apex
    ///
    /// Bounds are read without holding the state lock. Returns `None` if
    /// the session ended meanwhile; if another movement fixed the triangle
    /// first, that triangle is kept.
    fn establish(&self, session: u64, p: Point) -> Option<Triangle> {
        let bounds = self.tracking_bounds();

        let mut state = self.state.lock();
        if state.session != session || !state.phase.is_live() {
            return None;
        }
        if let Some(triangle) = state.triangle {
            return Some(triangle);
        }

        let triangle = Triangle::from_mouse(p, &bounds);
        if triangle.is_degenerate() {
            tracing::warn!(
                "Intent tracker {}: degenerate triangle {:?}, containment will always fail",
                self.id,
                triangle
            );
        }
        state.triangle = Some(triangle);
        state.phase = TrackerPhase::Tracking;
        tracing::debug!(
            "Intent tracker {} tracking: p0=({}, {}) p1=({}, {}) p2=({}, {})",
            self.id,
            triangle.p0.x,
            triangle.p0.y,
            triangle.p1.x,
            triangle.p1.y,
            triangle.p2.x,
            triangle.p2.y
        );
        Some(triangle)
    }

    /// Tear down `session` if it is still live
    ///
    /// Unsubscribes, clears the timer and hides the overlay, then fires the
    /// callbacks outside the lock. Returns `false` if the session had
    /// already resolved.
    fn resolve(&self, session: u64, reason: CancelReason) -> bool {
        let (subscription, timer, callbacks) = {
            let mut state = self.state.lock();
            if state.session != session || !state.phase.is_live() {
                return false;
            }
            state.phase = TrackerPhase::Resolved;
            state.last_reason = Some(reason);
            (
                state.subscription.take(),
                state.timer.take(),
                state.queue.take_for_firing(),
            )
        };

        if let Some(id) = subscription {
            self.env.pointer.unsubscribe(id);
        }
        if let Some(id) = timer {
            self.env.timers.cancel(id);
        }
        if self.config.debug {
            if let Some(renderer) = &self.env.renderer {
                renderer.hide();
            }
        }

        tracing::debug!(
            "Intent tracker {} resolved ({:?}), firing {} callbacks",
            self.id,
            reason,
            callbacks.len()
        );
        // A callback may call watch() again and start the next session
        for callback in callbacks {
            callback();
        }

        true
    }
}

impl Drop for Inner {
    fn drop(&mut self) {
        let state = self.state.get_mut();
        if !state.phase.is_live() {
            return;
        }
        if let Some(id) = state.subscription.take() {
            self.env.pointer.unsubscribe(id);
        }
        if let Some(id) = state.timer.take() {
            self.env.timers.cancel(id);
        }
        tracing::debug!("Intent tracker {} dropped while watching", self.id);
    }
}

/// Watches pointer movement from an active element toward a tracked one
///
/// Each tracker owns its own position, triangle and callback queue; trackers
/// sharing a host never see each other's state.
pub struct IntentTracker {
    inner: Arc<Inner>,
}

impl IntentTracker {
    pub fn new(
        env: Environment,
        active: ElementId,
        tracking: ElementId,
        options: IntentOptions,
    ) -> Self {
        let config = IntentConfig::from_options(&options);
        let id = Uuid::new_v4();

        tracing::debug!(
            "Intent tracker {} created (active={:?}, tracking={:?}, timeout={}ms, debug={})",
            id,
            active,
            tracking,
            config.timeout_ms,
            config.debug
        );

        Self {
            inner: Arc::new(Inner {
                id,
                active,
                tracking,
                config,
                env,
                state: ParkingMutex::new(TrackerState {
                    phase: TrackerPhase::Idle,
                    session: 0,
                    mouse: None,
                    triangle: None,
                    queue: CallbackQueue::new(),
                    timer: None,
                    subscription: None,
                    last_reason: None,
                }),
            }),
        }
    }

    /// Arm the timer, start listening to movement, and return a handle
    /// for registering teardown callbacks
    ///
    /// While a session is live this returns a handle onto it without
    /// re-arming. After resolution it starts a fresh session.
    pub fn watch(&self) -> IntentHandle {
        let session = {
            let mut state = self.inner.state.lock();

            if state.phase.is_live() {
                tracing::warn!(
                    "Intent tracker {}: watch() while already watching, reusing session",
                    self.inner.id
                );
                return self.handle(state.session);
            }

            state.session += 1;
            state.phase = TrackerPhase::Armed;
            state.triangle = None;
            state.queue = CallbackQueue::new();
            state.last_reason = None;
            state.session
        };

        // Hosts may deliver a movement or fire the timer from inside
        // subscribe/schedule, so neither is called with the state locked.
        let weak = Arc::downgrade(&self.inner);
        let handler: PointerHandler = Arc::new(move |p| {
            if let Some(inner) = weak.upgrade() {
                inner.on_move(session, p);
            }
        });
        let subscription = self.inner.env.pointer.subscribe(handler);
        if !self.inner.store_subscription(session, subscription) {
            self.inner.env.pointer.unsubscribe(subscription);
            return self.handle(session);
        }

        let weak = Arc::downgrade(&self.inner);
        let timer = self.inner.env.timers.schedule(
            self.inner.config.timeout(),
            Box::new(move || {
                if let Some(inner) = weak.upgrade() {
                    inner.resolve(session, CancelReason::Timeout);
                }
            }),
        );
        if !self.inner.store_timer(session, timer) {
            self.inner.env.timers.cancel(timer);
            return self.handle(session);
        }

        tracing::debug!(
            "Intent tracker {} armed (session={}, timeout={}ms)",
            self.inner.id,
            session,
            self.inner.config.timeout_ms
        );

        self.handle(session)
    }

    fn handle(&self, session: u64) -> IntentHandle {
        IntentHandle {
            inner: Arc::downgrade(&self.inner),
            session,
        }
    }

    /// Resolve the current session now
    ///
    /// Returns `false` if nothing was being watched, so repeated calls are
    /// harmless and never fire callbacks twice.
    pub fn cancel(&self) -> bool {
        let session = self.inner.state.lock().session;
        self.inner.resolve(session, CancelReason::Manual)
    }

    pub fn id(&self) -> Uuid {
        self.inner.id
    }

    pub fn config(&self) -> IntentConfig {
        self.inner.config
    }

    pub fn active_element(&self) -> ElementId {
        self.inner.active
    }

    pub fn tracking_element(&self) -> ElementId {
        self.inner.tracking
    }

    pub fn phase(&self) -> TrackerPhase {
        self.inner.state.lock().phase
    }

    /// Last cursor position seen by this tracker
    pub fn mouse(&self) -> Option<Point> {
        self.inner.state.lock().mouse
    }

    pub fn triangle(&self) -> Option<Triangle> {
        self.inner.state.lock().triangle
    }

    pub fn has_triangle(&self) -> bool {
        self.inner.state.lock().triangle.is_some()
    }

    /// Triangle established and at least one callback waiting
    pub fn is_active(&self) -> bool {
        let state = self.inner.state.lock();
        state.phase.is_live() && state.triangle.is_some() && !state.queue.is_empty()
    }

    pub fn queued_callbacks(&self) -> usize {
        self.inner.state.lock().queue.len()
    }

    pub fn last_cancel_reason(&self) -> Option<CancelReason> {
        self.inner.state.lock().last_reason
    }
}

impl std::fmt::Debug for IntentTracker {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let state = self.inner.state.lock();
        f.debug_struct("IntentTracker")
            .field("id", &self.inner.id)
            .field("phase", &state.phase)
            .field("mouse", &state.mouse)
            .field("triangle", &state.triangle)
            .field("queue", &state.queue)
            .finish()
    }
}

/// Registration handle for one watch session
#[derive(Clone)]
pub struct IntentHandle {
    inner: Weak<Inner>,
    session: u64,
}

impl IntentHandle {
    /// Queue a callback to run when the session resolves
    ///
    /// Callbacks run once, in registration order. Registering on a session
    /// that already resolved (or whose tracker was dropped) does nothing.
    pub fn then<F>(&self, callback: F)
    where
        F: FnOnce() + Send + 'static,
    {
        self.push(Box::new(callback));
    }

    fn push(&self, callback: Callback) {
        let Some(inner) = self.inner.upgrade() else {
            return;
        };
        let mut state = inner.state.lock();
        if state.session != self.session || !state.phase.is_live() {
            tracing::trace!(
                "Intent tracker {}: dropping callback for finished session {}",
                inner.id,
                self.session
            );
            return;
        }
        state.queue.push(callback);
    }

    /// True once this handle's session can no longer fire
    pub fn is_resolved(&self) -> bool {
        match self.inner.upgrade() {
            Some(inner) => {
                let state = inner.state.lock();
                state.session != self.session || !state.phase.is_live()
            }
            None => true,
        }
    }
}

impl std::fmt::Debug for IntentHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("IntentHandle")
            .field("session", &self.session)
            .finish()
    }
}
