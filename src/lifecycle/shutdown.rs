//! In-process shutdown requests.

use std::sync::Arc;
use tokio::sync::watch;

use crate::lifecycle::state::Phase;
use crate::lifecycle::trigger::Trigger;

/// Handle for requesting a group shutdown from inside the process and for
/// observing how far a run has progressed.
///
/// Cheap to clone; every clone talks to the same coordinator.
#[derive(Debug, Clone)]
pub struct ShutdownHandle {
    request: Trigger<()>,
    phase: Arc<watch::Sender<Phase>>,
}

impl ShutdownHandle {
    pub(crate) fn new() -> Self {
        let (phase, _) = watch::channel(Phase::Idle);
        Self {
            request: Trigger::new(),
            phase: Arc::new(phase),
        }
    }

    /// Request a shutdown.
    ///
    /// Returns `false` if a shutdown was already requested through a handle.
    /// Requests made while a sweep is running, or after it finished, are
    /// ignored by the coordinator.
    pub fn trigger(&self) -> bool {
        let first = self.request.fire(());
        if !first || self.phase() > Phase::Watching {
            tracing::debug!(phase = ?self.phase(), "Shutdown already in progress, request ignored");
        }
        first
    }

    /// Current phase of the run.
    pub fn phase(&self) -> Phase {
        *self.phase.borrow()
    }

    /// Subscribe to phase changes.
    pub fn subscribe(&self) -> watch::Receiver<Phase> {
        self.phase.subscribe()
    }

    pub(crate) fn requested(&self) -> impl std::future::Future<Output = ()> + Send + 'static {
        self.request.wait()
    }

    pub(crate) fn set_phase(&self, next: Phase) {
        self.phase.send_if_modified(|current| {
            if next <= *current {
                return false;
            }
            tracing::debug!(from = ?current, to = ?next, "Coordinator phase changed");
            *current = next;
            true
        });
    }
}
