//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! Coordinator and listeners produce:
//!     → logging.rs (structured log events)
//!     → metrics.rs (counters, histograms)
//!
//! Consumers:
//!     → stdout (pretty or JSON)
//!     → Metrics endpoint (Prometheus scrape), when enabled
//! ```
//!
//! # Design Decisions
//! - Structured logging (JSON) for machine parsing
//! - Request ID on every HTTP request span
//! - Metrics are cheap (atomic increments)

pub mod logging;
pub mod metrics;
