//! Trailing-edge debounce.
//!
//! A [`Debouncer`] wraps an async action. Every [`call`](Debouncer::call)
//! stores its argument in a single slot and restarts the timer; when the
//! timer elapses without another call, the action runs once with the most
//! recent argument.
//!
//! The slot, the timer handle and a generation counter live together
//! behind one mutex. A timer only takes the argument if its generation is
//! still current, so a timer that already woke up cannot race a later
//! `call`, `cancel` or `flush`. Once an action has started it is never
//! aborted; only pending timers are.

use std::future::Future;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError, Weak};
use std::time::Duration;

use futures::future::BoxFuture;
use tokio::task::JoinHandle;

type Action<T> = Arc<dyn Fn(T) -> BoxFuture<'static, ()> + Send + Sync>;

/// Debounced wrapper around an async action taking `T`.
pub struct Debouncer<T> {
    inner: Arc<Inner<T>>,
}

struct Inner<T> {
    delay: Duration,
    action: Action<T>,
    slot: Mutex<Slot<T>>,
}

struct Slot<T> {
    pending: Option<T>,
    timer: Option<JoinHandle<()>>,
    generation: u64,
}

impl<T> Slot<T> {
    /// Invalidate any scheduled timer and hand back the pending argument.
    fn clear(&mut self) -> Option<T> {
        self.generation = self.generation.wrapping_add(1);
        if let Some(timer) = self.timer.take() {
            timer.abort();
        }
        self.pending.take()
    }
}

impl<T> Inner<T> {
    fn slot(&self) -> MutexGuard<'_, Slot<T>> {
        self.slot.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Called by a timer when it fires. Returns the argument only if no
    /// later call, cancel or flush superseded this timer.
    fn take_due(&self, generation: u64) -> Option<T> {
        let mut slot = self.slot();
        if slot.generation != generation {
            return None;
        }
        // Detach rather than abort: the action is about to run on this task.
        slot.timer = None;
        slot.pending.take()
    }
}

impl<T: Send + 'static> Debouncer<T> {
    /// Create a debouncer that runs `action` after `delay` of quiet.
    pub fn new<F, Fut>(delay: Duration, action: F) -> Self
    where
        F: Fn(T) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = ()> + Send + 'static,
    {
        let action: Action<T> = Arc::new(move |arg| Box::pin(action(arg)));
        Self {
            inner: Arc::new(Inner {
                delay,
                action,
                slot: Mutex::new(Slot {
                    pending: None,
                    timer: None,
                    generation: 0,
                }),
            }),
        }
    }

    /// The quiet period.
    pub fn delay(&self) -> Duration {
        self.inner.delay
    }

    /// Record `arg` as the latest argument and restart the timer.
    ///
    /// Nothing else happens synchronously; the action runs later on a
    /// spawned task.
    ///
    /// # Panics
    ///
    /// Panics if called outside a Tokio runtime.
    pub fn call(&self, arg: T) {
        let mut slot = self.inner.slot();
        slot.clear();
        slot.pending = Some(arg);

        let generation = slot.generation;
        let delay = self.inner.delay;
        let weak: Weak<Inner<T>> = Arc::downgrade(&self.inner);

        slot.timer = Some(tokio::spawn(async move {
            tokio::time::sleep(delay).await;

            let Some(inner) = weak.upgrade() else {
                return;
            };
            let Some(arg) = inner.take_due(generation) else {
                return;
            };
            let action = Arc::clone(&inner.action);
            drop(inner);

            action(arg).await;
        }));
    }

    /// Run the pending call now, if there is one, and wait for it.
    ///
    /// The scheduled timer is cancelled so the action does not run twice.
    pub async fn flush(&self) {
        let pending = self.inner.slot().clear();
        if let Some(arg) = pending {
            (self.inner.action)(arg).await;
        }
    }

    /// Drop the pending call without running it.
    pub fn cancel(&self) {
        self.inner.slot().clear();
    }

    /// Whether a call is waiting for its timer.
    pub fn is_pending(&self) -> bool {
        self.inner.slot().pending.is_some()
    }
}

impl<T> Drop for Debouncer<T> {
    fn drop(&mut self) {
        self.inner.slot().clear();
    }
}

impl<T> std::fmt::Debug for Debouncer<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let slot = self.inner.slot();
        f.debug_struct("Debouncer")
            .field("delay", &self.inner.delay)
            .field("pending", &slot.pending.is_some())
            .finish()
    }
}
