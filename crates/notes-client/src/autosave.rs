//! Debounced persistence of a single editable value.
//!
//! [`AutoSave`] holds the value being edited, the last value known to be
//! persisted, and the saving/error state. Edits are visible immediately;
//! persistence trails behind through a [`Debouncer`].

use std::future::Future;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError, Weak};
use std::time::Duration;

use futures::future::BoxFuture;

use crate::debounce::Debouncer;
use crate::error::NoteError;

type Persist = Arc<dyn Fn(String) -> BoxFuture<'static, Result<(), NoteError>> + Send + Sync>;

#[derive(Debug)]
struct State {
    value: String,
    persisted: String,
    /// Last value handed to the persist function; equals `persisted` once
    /// every save has settled successfully.
    sent: String,
    in_flight: usize,
    error: Option<NoteError>,
}

#[derive(Debug)]
struct Shared {
    initial: String,
    state: Mutex<State>,
}

impl Shared {
    fn state(&self) -> MutexGuard<'_, State> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// Editable string value bound to a debounced persist function.
///
/// Dropping an `AutoSave` cancels any pending save. A save already in
/// flight runs to completion, but its result is discarded.
pub struct AutoSave {
    shared: Arc<Shared>,
    debouncer: Debouncer<String>,
}

impl AutoSave {
    /// Bind `initial` to `persist`, saving after `delay` without edits.
    pub fn new<F, Fut>(initial: impl Into<String>, delay: Duration, persist: F) -> Self
    where
        F: Fn(String) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<(), NoteError>> + Send + 'static,
    {
        let initial = initial.into();
        let shared = Arc::new(Shared {
            state: Mutex::new(State {
                value: initial.clone(),
                persisted: initial.clone(),
                sent: initial.clone(),
                in_flight: 0,
                error: None,
            }),
            initial,
        });

        let persist: Persist = Arc::new(move |value| Box::pin(persist(value)));
        let weak = Arc::downgrade(&shared);
        let debouncer = Debouncer::new(delay, move |value: String| {
            save(weak.clone(), Arc::clone(&persist), value)
        });

        Self { shared, debouncer }
    }

    /// Replace the value and schedule a save if it differs from the last
    /// persisted value or from a save still in flight. Setting a value the
    /// server already holds, or is about to, drops any pending save.
    ///
    /// # Panics
    ///
    /// Panics if called outside a Tokio runtime.
    pub fn set_value(&self, value: impl Into<String>) {
        let value = value.into();
        let dirty = {
            let mut state = self.shared.state();
            state.value = value.clone();
            state.value != state.persisted || state.value != state.sent
        };

        if dirty {
            self.debouncer.call(value);
        } else {
            self.debouncer.cancel();
        }
    }

    /// Run the pending save now and wait for it.
    pub async fn flush(&self) {
        self.debouncer.flush().await;
    }

    /// Drop the pending save without running it. The value stays as edited.
    pub fn cancel(&self) {
        self.debouncer.cancel();
    }

    /// Cancel pending work and revert to the initial value.
    pub fn reset(&self) {
        self.debouncer.cancel();
        let mut state = self.shared.state();
        state.value = self.shared.initial.clone();
        state.error = None;
    }

    /// The current, possibly unsaved, value.
    pub fn value(&self) -> String {
        self.shared.state().value.clone()
    }

    /// The last value saved successfully.
    pub fn persisted(&self) -> String {
        self.shared.state().persisted.clone()
    }

    pub fn is_saving(&self) -> bool {
        self.shared.state().in_flight > 0
    }

    /// Whether a save is scheduled but has not started.
    pub fn is_pending(&self) -> bool {
        self.debouncer.is_pending()
    }

    /// The error from the last failed save, cleared by a successful save or
    /// [`reset`](Self::reset).
    pub fn error(&self) -> Option<NoteError> {
        self.shared.state().error.clone()
    }
}

impl std::fmt::Debug for AutoSave {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AutoSave")
            .field("state", &*self.shared.state())
            .field("debouncer", &self.debouncer)
            .finish()
    }
}

async fn save(shared: Weak<Shared>, persist: Persist, value: String) {
    match shared.upgrade() {
        Some(shared) => {
            let mut state = shared.state();
            state.in_flight += 1;
            state.sent = value.clone();
        }
        None => return,
    }

    let result = persist(value.clone()).await;

    let Some(shared) = shared.upgrade() else {
        tracing::debug!("Auto-save finished after its owner was dropped");
        return;
    };
    let mut state = shared.state();
    state.in_flight = state.in_flight.saturating_sub(1);
    match result {
        Ok(()) => {
            state.persisted = value;
            state.error = None;
        }
        Err(err) => {
            tracing::warn!(error = %err, "Auto-save failed");
            if state.sent == value {
                state.sent = state.persisted.clone();
            }
            state.error = Some(NoteError::NotPersisted(err.message()));
        }
    }
}
