//! Metrics collection and exposition.
//!
//! # Metrics
//! - `listener_group_requests_total` (counter): requests by listener, path
//! - `listener_group_shutdown_triggers_total` (counter): sweeps by cause
//! - `listener_group_listener_stops_total` (counter): stops by listener, outcome
//! - `listener_group_sweep_duration_seconds` (histogram): sweep wall time
//!
//! Recording is a no-op until a recorder is installed, so library users and
//! tests pay nothing unless they call [`init_metrics`].

use std::net::SocketAddr;
use std::time::Duration;

use metrics_exporter_prometheus::{BuildError, PrometheusBuilder};

use crate::lifecycle::{ShutdownCause, StopOutcome};

/// Install the Prometheus recorder and its scrape endpoint on `addr`.
pub fn init_metrics(addr: SocketAddr) -> Result<(), BuildError> {
    PrometheusBuilder::new().with_http_listener(addr).install()?;
    tracing::info!(address = %addr, "Metrics endpoint listening");
    Ok(())
}

pub fn record_request(listener: &str, path: &str) {
    metrics::counter!(
        "listener_group_requests_total",
        "listener" => listener.to_string(),
        "path" => path.to_string()
    )
    .increment(1);
}

pub fn record_trigger(cause: &ShutdownCause) {
    metrics::counter!("listener_group_shutdown_triggers_total", "cause" => cause.label())
        .increment(1);
}

pub fn record_stop(listener: &str, outcome: &StopOutcome) {
    metrics::counter!(
        "listener_group_listener_stops_total",
        "listener" => listener.to_string(),
        "outcome" => outcome.label()
    )
    .increment(1);
}

pub fn record_sweep(duration: Duration) {
    metrics::histogram!("listener_group_sweep_duration_seconds").record(duration.as_secs_f64());
}
