//! Coordinated startup and shutdown of a group of network listeners.
//!
//! ```text
//!        SIGINT / SIGTERM / SIGHUP      ShutdownHandle::trigger
//!                    │                           │
//!                    ▼                           ▼
//!   ┌──────────────────────────────────────────────────────┐
//!   │                    Coordinator                       │
//!   │   watcher: first of { signal, request, listener[i] } │
//!   │   sweep:   stop every listener, each within grace    │
//!   └───────┬──────────────────┬──────────────────┬────────┘
//!           │                  │                  │
//!      ┌────▼─────┐       ┌────▼─────┐       ┌────▼─────┐
//!      │listener 1│       │listener 2│  ...  │listener N│
//!      │ /  /close│       │ /  /close│       │ /  /close│
//!      └──────────┘       └──────────┘       └──────────┘
//! ```
//!
//! If any listener is closed, fails, or exits, or the process is signalled,
//! every listener is stopped and [`Coordinator::run`] returns a
//! [`RunOutcome`](lifecycle::RunOutcome) describing how each one ended.

pub mod config;
pub mod http;
pub mod lifecycle;
pub mod net;
pub mod observability;

pub use config::AppConfig;
pub use http::HttpListener;
pub use lifecycle::{Coordinator, CoordinatorConfig, ShutdownHandle};
