//! The contract between the coordinator and the listeners it runs.

use futures_util::future::BoxFuture;
use std::future::Future;
use std::sync::Arc;
use tokio::sync::watch;

use crate::lifecycle::state::{ListenerEvent, ListenerState};
use crate::lifecycle::trigger::Trigger;
use crate::net::ListenerError;

/// A network endpoint the coordinator can start and stop.
///
/// `serve` runs until `ctx.stopped()` resolves or the listener fails. It
/// should call [`ListenerContext::mark_running`] once it is accepting
/// traffic. Returning (with or without an error) before a stop was
/// requested shuts down every other listener in the group.
pub trait Listener: Send + 'static {
    /// Name used in logs, metrics and reports.
    fn name(&self) -> &str;

    /// Bind and serve until asked to stop.
    fn serve(self: Box<Self>, ctx: ListenerContext) -> BoxFuture<'static, Result<(), ListenerError>>;
}

/// Per-listener view of the coordinator.
///
/// Carries the listener's stop request, its own stop notification and its
/// lifecycle state. Each listener gets an independent context.
#[derive(Clone)]
pub struct ListenerContext {
    name: Arc<str>,
    stop: Trigger<()>,
    notify: Trigger<ListenerEvent>,
    state: Arc<watch::Sender<ListenerState>>,
}

impl ListenerContext {
    pub(crate) fn new(name: &str) -> Self {
        let (state, _) = watch::channel(ListenerState::Starting);
        Self {
            name: Arc::from(name),
            stop: Trigger::new(),
            notify: Trigger::new(),
            state: Arc::new(state),
        }
    }

    /// The listener's name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Record that the listener is bound and serving.
    pub fn mark_running(&self) {
        self.advance(ListenerState::Running);
    }

    /// Current lifecycle state.
    pub fn state(&self) -> ListenerState {
        *self.state.borrow()
    }

    /// Resolves once the coordinator asks this listener to stop.
    pub fn stopped(&self) -> impl Future<Output = ()> + Send + 'static {
        self.stop.wait()
    }

    /// Whether a stop has been requested.
    pub fn stop_requested(&self) -> bool {
        self.stop.is_fired()
    }

    /// Handle for request handlers that want to close this listener.
    pub fn close_handle(&self) -> CloseHandle {
        CloseHandle {
            name: Arc::clone(&self.name),
            notify: self.notify.clone(),
        }
    }

    /// Move to `next` if that is a forward transition.
    pub(crate) fn advance(&self, next: ListenerState) -> bool {
        let name = &self.name;
        self.state.send_if_modified(|current| {
            if !current.can_advance_to(next) {
                return false;
            }
            tracing::debug!(listener = %name, from = %current, to = %next, "Listener state changed");
            *current = next;
            true
        })
    }

    pub(crate) fn request_stop(&self) -> bool {
        self.stop.fire(())
    }

    /// Publish this listener's stop notification. Later calls are no-ops.
    pub(crate) fn notify(&self, event: ListenerEvent) -> bool {
        self.notify.fire(event)
    }

    pub(crate) fn notified(&self) -> impl Future<Output = ListenerEvent> + Send + 'static {
        self.notify.wait()
    }
}

impl std::fmt::Debug for ListenerContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ListenerContext")
            .field("name", &self.name)
            .field("state", &self.state())
            .field("stop_requested", &self.stop_requested())
            .finish()
    }
}

/// Fires a listener's own stop notification with [`ListenerEvent::CloseRequested`].
#[derive(Debug, Clone)]
pub struct CloseHandle {
    name: Arc<str>,
    notify: Trigger<ListenerEvent>,
}

impl CloseHandle {
    /// Ask for this listener, and with it the whole group, to shut down.
    ///
    /// Returns `false` if the listener already reported a close, failure or
    /// exit; the request is then ignored.
    pub fn request(&self) -> bool {
        self.notify.fire(ListenerEvent::CloseRequested)
    }

    /// Name of the listener this handle closes.
    pub fn listener(&self) -> &str {
        &self.name
    }
}
