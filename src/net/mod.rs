//! Network layer subsystem.
//!
//! # Data Flow
//! ```text
//! Configured bind address
//!     → listener.rs (parse, bind, typed errors)
//!     → Hand off to HTTP layer
//! ```
//!
//! # Design Decisions
//! - Bind failures are values, not panics: the coordinator turns them into
//!   a group shutdown

pub mod listener;

pub use listener::{bind, ListenerError};
