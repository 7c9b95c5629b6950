//! Timer scheduler backed by the tokio runtime
//!
//! Each timer is a spawned task that sleeps and then runs its callback.
//! Cancelling aborts the task.

use super::{TimerCallback, TimerId, TimerScheduler};
use crate::error::{IntentError, IntentResult};
use parking_lot::Mutex as ParkingMutex;
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::runtime::Handle;
use tokio::task::JoinHandle;

pub struct TokioTimers {
    handle: Handle,
    tasks: Arc<ParkingMutex<HashMap<TimerId, JoinHandle<()>>>>,
    next_id: AtomicU64,
}

impl TokioTimers {
    /// Bind to the runtime of the calling context
    pub fn new() -> IntentResult<Self> {
        let handle = Handle::try_current().map_err(|e| IntentError::NoRuntime(e.to_string()))?;
        Ok(Self::with_handle(handle))
    }

    pub fn with_handle(handle: Handle) -> Self {
        Self {
            handle,
            tasks: Arc::new(ParkingMutex::new(HashMap::new())),
            next_id: AtomicU64::new(0),
        }
    }

    /// Number of timers that have neither fired nor been cancelled
    pub fn pending(&self) -> usize {
        self.tasks.lock().len()
    }
}

impl TimerScheduler for TokioTimers {
    fn schedule(&self, delay: Duration, callback: TimerCallback) -> TimerId {
        let id = TimerId(self.next_id.fetch_add(1, Ordering::Relaxed) + 1);

        // Hold the table while spawning so the task can't finish and remove
        // itself before its handle is inserted.
        let mut tasks = self.tasks.lock();
        let registry = self.tasks.clone();
        let join = self.handle.spawn(async move {
            tokio::time::sleep(delay).await;
            registry.lock().remove(&id);
            callback();
        });
        tasks.insert(id, join);

        tracing::trace!("Scheduled timer {:?} in {:?}", id, delay);
        id
    }

    fn cancel(&self, id: TimerId) {
        if let Some(join) = self.tasks.lock().remove(&id) {
            join.abort();
            tracing::trace!("Cancelled timer {:?}", id);
        }
    }
}

impl Drop for TokioTimers {
    fn drop(&mut self) {
        for (_, join) in self.tasks.lock().drain() {
            join.abort();
        }
    }
}
