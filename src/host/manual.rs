//! Deterministic in-memory host
//!
//! Element geometry is set explicitly, pointer movement is injected with
//! [`ManualHost::move_pointer`], and time only moves when
//! [`ManualHost::advance`] is called. Used by trace replay and tests.

use super::{
    BoundsSource, ElementId, Environment, PointerHandler, PointerSource, SubscriptionId,
    TimerCallback, TimerId, TimerScheduler,
};
use crate::geometry::{Bounds, Point};
use parking_lot::Mutex as ParkingMutex;
use std::collections::{BTreeMap, HashMap};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

struct PendingTimer {
    id: TimerId,
    deadline: Duration,
    callback: TimerCallback,
}

#[derive(Default)]
struct VirtualClock {
    now: Duration,
    pending: Vec<PendingTimer>,
}

impl VirtualClock {
    /// Remove the earliest timer due at or before `limit`, advancing `now` to it
    fn pop_due(&mut self, limit: Duration) -> Option<TimerCallback> {
        let index = self
            .pending
            .iter()
            .enumerate()
            .filter(|(_, t)| t.deadline <= limit)
            .min_by_key(|(_, t)| (t.deadline, t.id))
            .map(|(i, _)| i)?;

        let timer = self.pending.swap_remove(index);
        self.now = self.now.max(timer.deadline);
        Some(timer.callback)
    }
}

/// In-memory host with a virtual clock
#[derive(Default)]
pub struct ManualHost {
    elements: ParkingMutex<HashMap<ElementId, Bounds>>,
    // BTreeMap keeps dispatch in subscription order
    subscribers: ParkingMutex<BTreeMap<u64, PointerHandler>>,
    clock: ParkingMutex<VirtualClock>,
    next_id: AtomicU64,
}

impl ManualHost {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// Bundle this host's capabilities for a tracker
    pub fn environment(self: &Arc<Self>) -> Environment {
        Environment::new(self.clone(), self.clone(), self.clone())
    }

    fn next_id(&self) -> u64 {
        self.next_id.fetch_add(1, Ordering::Relaxed) + 1
    }

    /// Register an element with the given bounds and return its handle
    pub fn add_element(&self, bounds: Bounds) -> ElementId {
        let id = ElementId(self.next_id());
        self.elements.lock().insert(id, bounds);
        id
    }

    /// Move or resize an existing element
    pub fn set_bounds(&self, element: ElementId, bounds: Bounds) {
        self.elements.lock().insert(element, bounds);
    }

    /// Detach an element; its bounds query returns `None` afterwards
    pub fn detach(&self, element: ElementId) {
        self.elements.lock().remove(&element);
    }

    /// Deliver a pointer-movement event to every current subscriber
    ///
    /// Handlers removed by an earlier handler during the same dispatch are
    /// skipped.
    pub fn move_pointer(&self, point: Point) {
        let snapshot: Vec<(u64, PointerHandler)> = self
            .subscribers
            .lock()
            .iter()
            .map(|(id, handler)| (*id, handler.clone()))
            .collect();

        for (id, handler) in snapshot {
            if !self.subscribers.lock().contains_key(&id) {
                continue;
            }
            handler(point);
        }
    }

    /// Advance the virtual clock, firing due timers in deadline order
    pub fn advance(&self, by: Duration) {
        let target = self.clock.lock().now + by;
        self.advance_to(target);
    }

    /// Advance the virtual clock to an absolute time since creation
    ///
    /// Times in the past are ignored.
    pub fn advance_to(&self, target: Duration) {
        loop {
            // Lock is released before the callback runs; callbacks may
            // schedule or cancel timers on this host.
            let due = self.clock.lock().pop_due(target);
            match due {
                Some(callback) => callback(),
                None => break,
            }
        }

        let mut clock = self.clock.lock();
        clock.now = clock.now.max(target);
    }

    /// Current virtual time since creation
    pub fn now(&self) -> Duration {
        self.clock.lock().now
    }

    pub fn subscriber_count(&self) -> usize {
        self.subscribers.lock().len()
    }

    pub fn pending_timers(&self) -> usize {
        self.clock.lock().pending.len()
    }
}

impl BoundsSource for ManualHost {
    fn bounding_box(&self, element: ElementId) -> Option<Bounds> {
        self.elements.lock().get(&element).copied()
    }
}

impl PointerSource for ManualHost {
    fn subscribe(&self, handler: PointerHandler) -> SubscriptionId {
        let id = self.next_id();
        self.subscribers.lock().insert(id, handler);
        SubscriptionId(id)
    }

    fn unsubscribe(&self, id: SubscriptionId) {
        self.subscribers.lock().remove(&id.0);
    }
}

impl TimerScheduler for ManualHost {
    fn schedule(&self, delay: Duration, callback: TimerCallback) -> TimerId {
        let id = TimerId(self.next_id());
        let mut clock = self.clock.lock();
        let deadline = clock.now + delay;
        clock.pending.push(PendingTimer {
            id,
            deadline,
            callback,
        });
        id
    }

    fn cancel(&self, id: TimerId) {
        self.clock.lock().pending.retain(|t| t.id != id);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::AtomicUsize;

    #[test]
    fn test_bounds_lookup_and_detach() {
        let host = ManualHost::new();
        let el = host.add_element(Bounds::new(1.0, 2.0, 3.0, 4.0));

        assert_eq!(host.bounding_box(el), Some(Bounds::new(1.0, 2.0, 3.0, 4.0)));

        host.detach(el);
        assert_eq!(host.bounding_box(el), None);
    }

    #[test]
    fn test_pointer_dispatch_and_unsubscribe() {
        let host = ManualHost::new();
        let seen = Arc::new(ParkingMutex::new(Vec::new()));

        let sink = seen.clone();
        let id = host.subscribe(Arc::new(move |p| sink.lock().push(p)));

        host.move_pointer(Point::new(1.0, 1.0));
        host.unsubscribe(id);
        host.move_pointer(Point::new(2.0, 2.0));

        assert_eq!(*seen.lock(), vec![Point::new(1.0, 1.0)]);
        assert_eq!(host.subscriber_count(), 0);

        // Second removal is a no-op
        host.unsubscribe(id);
    }

    #[test]
    fn test_handler_removed_mid_dispatch_is_skipped() {
        let host = ManualHost::new();
        let calls = Arc::new(AtomicUsize::new(0));

        let victim: Arc<ParkingMutex<Option<SubscriptionId>>> = Arc::new(ParkingMutex::new(None));

        let h = host.clone();
        let target = victim.clone();
        host.subscribe(Arc::new(move |_| {
            if let Some(id) = *target.lock() {
                h.unsubscribe(id);
            }
        }));

        let counter = calls.clone();
        let second = host.subscribe(Arc::new(move |_| {
            counter.fetch_add(1, Ordering::SeqCst);
        }));
        *victim.lock() = Some(second);

        host.move_pointer(Point::new(0.0, 0.0));
        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_timers_fire_in_deadline_order() {
        let host = ManualHost::new();
        let order = Arc::new(ParkingMutex::new(Vec::new()));

        for (label, ms) in [("late", 300u64), ("early", 100), ("mid", 200)] {
            let order = order.clone();
            host.schedule(
                Duration::from_millis(ms),
                Box::new(move || order.lock().push(label)),
            );
        }

        host.advance(Duration::from_millis(150));
        assert_eq!(*order.lock(), vec!["early"]);
        assert_eq!(host.now(), Duration::from_millis(150));

        host.advance(Duration::from_millis(1000));
        assert_eq!(*order.lock(), vec!["early", "mid", "late"]);
        assert_eq!(host.pending_timers(), 0);
    }

    #[test]
    fn test_cancelled_timer_never_fires() {
        let host = ManualHost::new();
        let fired = Arc::new(AtomicUsize::new(0));

        let counter = fired.clone();
        let id = host.schedule(
            Duration::from_millis(10),
            Box::new(move || {
                counter.fetch_add(1, Ordering::SeqCst);
            }),
        );
        host.cancel(id);
        host.cancel(id);
        host.advance(Duration::from_millis(20));

        assert_eq!(fired.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_timer_callback_can_use_host() {
        let host = ManualHost::new();
        let fired = Arc::new(AtomicUsize::new(0));

        let h = host.clone();
        let counter = fired.clone();
        host.schedule(
            Duration::from_millis(10),
            Box::new(move || {
                let counter = counter.clone();
                h.schedule(
                    Duration::from_millis(5),
                    Box::new(move || {
                        counter.fetch_add(1, Ordering::SeqCst);
                    }),
                );
            }),
        );

        host.advance(Duration::from_millis(15));
        assert_eq!(fired.load(Ordering::SeqCst), 1);
    }
}
