//! HTTP protocol handling subsystem.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → server.rs (Axum setup, graceful shutdown on stop request)
//!     → request.rs (request ID)
//!     → handlers: `/close` fires the listener's notification,
//!       everything else answers with the listener's name
//! ```

pub mod request;
pub mod server;

pub use request::{MakeRequestUuidV4, X_REQUEST_ID};
pub use server::{listeners_from_config, AppState, HttpListener};
