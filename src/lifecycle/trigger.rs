//! Single-use completion signal.
//!
//! A [`Trigger`] holds a value that can be set exactly once and read any
//! number of times. Every clone shares the same slot, so the first `fire`
//! from any clone wins and all waiters observe that value.

use std::future::Future;
use std::sync::{Arc, OnceLock};
use tokio::sync::Notify;

struct Inner<T> {
    value: OnceLock<T>,
    notify: Notify,
}

/// A value settable exactly once, observable by many waiters.
pub struct Trigger<T> {
    inner: Arc<Inner<T>>,
}

impl<T> Clone for Trigger<T> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<T> std::fmt::Debug for Trigger<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Trigger")
            .field("fired", &self.is_fired())
            .finish()
    }
}

impl<T> Default for Trigger<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Trigger<T> {
    /// Create an unfired trigger.
    pub fn new() -> Self {
        Self {
            inner: Arc::new(Inner {
                value: OnceLock::new(),
                notify: Notify::new(),
            }),
        }
    }

    /// Set the value and wake every waiter.
    ///
    /// Returns `false` without touching the stored value if the trigger
    /// already fired.
    pub fn fire(&self, value: T) -> bool {
        if self.inner.value.set(value).is_err() {
            return false;
        }
        self.inner.notify.notify_waiters();
        true
    }

    /// Whether the trigger has fired.
    pub fn is_fired(&self) -> bool {
        self.inner.value.get().is_some()
    }
}

impl<T: Clone + Send + Sync + 'static> Trigger<T> {
    /// The fired value, if any.
    pub fn get(&self) -> Option<T> {
        self.inner.value.get().cloned()
    }

    /// Wait for the trigger to fire and return its value.
    ///
    /// The returned future owns a handle to the trigger, so it can outlive
    /// `self` and be moved into spawned tasks.
    pub fn wait(&self) -> impl Future<Output = T> + Send + 'static {
        let inner = Arc::clone(&self.inner);
        async move {
            loop {
                let notified = inner.notify.notified();
                tokio::pin!(notified);
                // Register before checking so a fire between the check and
                // the await is not lost.
                notified.as_mut().enable();

                if let Some(value) = inner.value.get() {
                    return value.clone();
                }
                notified.await;
            }
        }
    }
}
