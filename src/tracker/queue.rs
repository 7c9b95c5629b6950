//! Single-fire callback queue
//!
//! Callbacks are registered in order and fired at most once, all together,
//! in registration order. After firing the queue is closed and later
//! registrations are dropped.

/// Zero-argument teardown callback
pub type Callback = Box<dyn FnOnce() + Send>;

#[derive(Default)]
pub struct CallbackQueue {
    callbacks: Vec<Callback>,
    fired: bool,
}

impl CallbackQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a callback. Returns `false` if the queue already fired.
    pub fn push(&mut self, callback: Callback) -> bool {
        if self.fired {
            return false;
        }
        self.callbacks.push(callback);
        true
    }

    /// Close the queue and hand back its callbacks for invocation
    ///
    /// The caller runs them; this lets the owner release any lock first.
    /// Returns an empty list if the queue already fired.
    pub fn take_for_firing(&mut self) -> Vec<Callback> {
        if self.fired {
            return Vec::new();
        }
        self.fired = true;
        std::mem::take(&mut self.callbacks)
    }

    pub fn len(&self) -> usize {
        self.callbacks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.callbacks.is_empty()
    }
}

impl std::fmt::Debug for CallbackQueue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CallbackQueue")
            .field("len", &self.callbacks.len())
            .field("fired", &self.fired)
            .finish()
    }
}
