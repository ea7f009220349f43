//! Listener and process state machines, and the results a run produces.

use std::time::Duration;

use crate::lifecycle::signals::TerminationSignal;

/// Lifecycle of a single listener.
///
/// `Starting → Running → Stopping → Stopped | TimedOut | Failed`.
/// A listener may skip ahead (a bind failure goes straight from `Starting`
/// to `Failed`) but never moves backwards, and terminal states are final.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListenerState {
    Starting,
    Running,
    Stopping,
    Stopped,
    TimedOut,
    Failed,
}

impl ListenerState {
    fn rank(self) -> u8 {
        match self {
            ListenerState::Starting => 0,
            ListenerState::Running => 1,
            ListenerState::Stopping => 2,
            ListenerState::Stopped | ListenerState::TimedOut | ListenerState::Failed => 3,
        }
    }

    /// Whether this is a final state.
    pub fn is_terminal(self) -> bool {
        self.rank() == 3
    }

    /// Whether moving from `self` to `next` is a forward transition.
    pub fn can_advance_to(self, next: ListenerState) -> bool {
        next.rank() > self.rank()
    }
}

impl std::fmt::Display for ListenerState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            ListenerState::Starting => "starting",
            ListenerState::Running => "running",
            ListenerState::Stopping => "stopping",
            ListenerState::Stopped => "stopped",
            ListenerState::TimedOut => "timed_out",
            ListenerState::Failed => "failed",
        };
        f.write_str(s)
    }
}

/// Lifecycle of a coordinator run: `Idle → Watching → Sweeping → Done`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Phase {
    Idle,
    Watching,
    Sweeping,
    Done,
}

/// What a listener reports on its stop notification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ListenerEvent {
    /// A client asked the listener to close.
    CloseRequested,
    /// The listener could not start, or its serve loop failed.
    Failed(String),
    /// The serve loop returned without an error.
    Exited,
}

/// The event that started the shutdown sweep.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ShutdownCause {
    /// The process received a termination signal.
    Signal(TerminationSignal),
    /// Shutdown was requested in-process through a `ShutdownHandle`.
    Requested,
    /// A listener's close endpoint was invoked.
    CloseRequested { listener: String },
    /// A listener failed to bind or serve.
    ListenerFailed { listener: String, error: String },
    /// A listener's serve loop returned on its own.
    ListenerExited { listener: String },
    /// There was nothing to run.
    NoListeners,
}

impl ShutdownCause {
    pub(crate) fn from_event(listener: &str, event: ListenerEvent) -> Self {
        let listener = listener.to_string();
        match event {
            ListenerEvent::CloseRequested => ShutdownCause::CloseRequested { listener },
            ListenerEvent::Failed(error) => ShutdownCause::ListenerFailed { listener, error },
            ListenerEvent::Exited => ShutdownCause::ListenerExited { listener },
        }
    }

    /// Short label used for metrics.
    pub fn label(&self) -> &'static str {
        match self {
            ShutdownCause::Signal(_) => "signal",
            ShutdownCause::Requested => "requested",
            ShutdownCause::CloseRequested { .. } => "close_requested",
            ShutdownCause::ListenerFailed { .. } => "listener_failed",
            ShutdownCause::ListenerExited { .. } => "listener_exited",
            ShutdownCause::NoListeners => "no_listeners",
        }
    }

    /// The listener responsible for the shutdown, if any.
    pub fn listener(&self) -> Option<&str> {
        match self {
            ShutdownCause::CloseRequested { listener }
            | ShutdownCause::ListenerFailed { listener, .. }
            | ShutdownCause::ListenerExited { listener } => Some(listener),
            _ => None,
        }
    }
}

impl std::fmt::Display for ShutdownCause {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ShutdownCause::Signal(signal) => write!(f, "received {}", signal),
            ShutdownCause::Requested => write!(f, "shutdown requested"),
            ShutdownCause::CloseRequested { listener } => {
                write!(f, "close requested on {}", listener)
            }
            ShutdownCause::ListenerFailed { listener, error } => {
                write!(f, "{} failed: {}", listener, error)
            }
            ShutdownCause::ListenerExited { listener } => write!(f, "{} exited", listener),
            ShutdownCause::NoListeners => write!(f, "no listeners"),
        }
    }
}

/// How a listener's stop ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StopOutcome {
    Stopped,
    Failed(String),
    TimedOut,
}

impl StopOutcome {
    /// Short label used for metrics.
    pub fn label(&self) -> &'static str {
        match self {
            StopOutcome::Stopped => "stopped",
            StopOutcome::Failed(_) => "failed",
            StopOutcome::TimedOut => "timed_out",
        }
    }

    pub(crate) fn state(&self) -> ListenerState {
        match self {
            StopOutcome::Stopped => ListenerState::Stopped,
            StopOutcome::Failed(_) => ListenerState::Failed,
            StopOutcome::TimedOut => ListenerState::TimedOut,
        }
    }
}

/// Final result for one listener.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListenerReport {
    pub name: String,
    pub outcome: StopOutcome,
}

/// Aggregate result of [`Coordinator::run`](crate::lifecycle::Coordinator::run).
#[derive(Debug, Clone)]
pub struct RunOutcome {
    /// The event the watcher acted on.
    pub cause: ShutdownCause,
    /// One report per listener, in the order the listeners were given.
    pub listeners: Vec<ListenerReport>,
    /// Wall time of the shutdown sweep.
    pub sweep_duration: Duration,
}

impl RunOutcome {
    /// Report for the named listener.
    pub fn report(&self, name: &str) -> Option<&ListenerReport> {
        self.listeners.iter().find(|r| r.name == name)
    }

    /// True when every listener stopped without error or timeout.
    pub fn is_clean(&self) -> bool {
        self.listeners
            .iter()
            .all(|r| r.outcome == StopOutcome::Stopped)
    }

    /// Listeners abandoned at the grace-period deadline.
    pub fn timed_out(&self) -> impl Iterator<Item = &ListenerReport> {
        self.listeners
            .iter()
            .filter(|r| r.outcome == StopOutcome::TimedOut)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn listener_state_only_moves_forward() {
        use ListenerState::*;

        assert!(Starting.can_advance_to(Running));
        assert!(Running.can_advance_to(Stopping));
        assert!(Stopping.can_advance_to(Stopped));
        assert!(Stopping.can_advance_to(TimedOut));
        assert!(Starting.can_advance_to(Failed));

        assert!(!Running.can_advance_to(Starting));
        assert!(!Stopping.can_advance_to(Running));
        assert!(!Failed.can_advance_to(Stopping));
        assert!(!Stopped.can_advance_to(TimedOut));
        assert!(!Running.can_advance_to(Running));
    }

    #[test]
    fn terminal_states() {
        assert!(ListenerState::Stopped.is_terminal());
        assert!(ListenerState::TimedOut.is_terminal());
        assert!(ListenerState::Failed.is_terminal());
        assert!(!ListenerState::Stopping.is_terminal());
    }

    #[test]
    fn phases_are_ordered() {
        assert!(Phase::Idle < Phase::Watching);
        assert!(Phase::Watching < Phase::Sweeping);
        assert!(Phase::Sweeping < Phase::Done);
    }

    #[test]
    fn cause_from_listener_event() {
        let cause = ShutdownCause::from_event("index2", ListenerEvent::Failed("in use".into()));
        assert_eq!(cause.listener(), Some("index2"));
        assert_eq!(cause.label(), "listener_failed");
        assert_eq!(cause.to_string(), "index2 failed: in use");

        let cause = ShutdownCause::from_event("index1", ListenerEvent::CloseRequested);
        assert_eq!(cause.to_string(), "close requested on index1");
        assert_eq!(ShutdownCause::Requested.listener(), None);
    }

    #[test]
    fn run_outcome_summaries() {
        let outcome = RunOutcome {
            cause: ShutdownCause::Requested,
            listeners: vec![
                ListenerReport {
                    name: "a".into(),
                    outcome: StopOutcome::Stopped,
                },
                ListenerReport {
                    name: "b".into(),
                    outcome: StopOutcome::TimedOut,
                },
            ],
            sweep_duration: Duration::from_millis(5),
        };

        assert!(!outcome.is_clean());
        assert_eq!(outcome.timed_out().count(), 1);
        assert_eq!(outcome.report("b").unwrap().outcome, StopOutcome::TimedOut);
        assert!(outcome.report("c").is_none());
    }
}
