//! Lifecycle management subsystem.
//!
//! # Data Flow
//! ```text
//! Startup (coordinator.rs):
//!     Install signal watch → Spawn one task per listener
//!
//! Watching (fan_in.rs):
//!     first of { SIGINT/SIGTERM/SIGHUP, ShutdownHandle::trigger,
//!                listener[i] close / failure / exit }
//!
//! Sweep (coordinator.rs):
//!     Release signal watch → Stop every listener, each bounded by the
//!     grace period → Collect per-listener outcomes
//! ```
//!
//! # Design Decisions
//! - Each listener reports on its own set-once notification (trigger.rs)
//! - Only the first trigger is acted on; later ones are no-ops
//! - Stops are independent: no shared deadline, no ordering between listeners

pub mod coordinator;
pub mod fan_in;
pub mod listener;
pub mod shutdown;
pub mod signals;
pub mod state;
pub mod trigger;

pub use coordinator::{Coordinator, CoordinatorConfig};
pub use fan_in::first_of;
pub use listener::{CloseHandle, Listener, ListenerContext};
pub use shutdown::ShutdownHandle;
pub use signals::{SignalWatch, TerminationSignal};
pub use state::{
    ListenerEvent, ListenerReport, ListenerState, Phase, RunOutcome, ShutdownCause, StopOutcome,
};
pub use trigger::Trigger;
