//! Shutdown coordination for a group of listeners.
//!
//! # Responsibilities
//! - Start every listener on its own task
//! - Watch signals, in-process requests and per-listener notifications
//! - Act on the first event only, then sweep every listener to a stop
//! - Bound each listener's stop by an independent grace period
//!
//! # Design Decisions
//! - `run` consumes the coordinator, so one coordinator sweeps at most once
//! - A failing or slow listener never prevents the others from stopping
//! - Listeners abandoned at the deadline are aborted, not awaited

use futures_util::future::{join_all, BoxFuture, FutureExt};
use std::any::Any;
use std::panic::AssertUnwindSafe;
use std::time::{Duration, Instant};
use tokio::task::JoinHandle;

use crate::config::ShutdownConfig;
use crate::lifecycle::fan_in::first_of;
use crate::lifecycle::listener::{Listener, ListenerContext};
use crate::lifecycle::shutdown::ShutdownHandle;
use crate::lifecycle::signals::SignalWatch;
use crate::lifecycle::state::{
    ListenerEvent, ListenerReport, ListenerState, Phase, RunOutcome, ShutdownCause, StopOutcome,
};
use crate::net::ListenerError;
use crate::observability::metrics;

/// Coordinator settings.
#[derive(Debug, Clone)]
pub struct CoordinatorConfig {
    /// Time each listener gets to stop gracefully.
    pub grace_period: Duration,
    /// Whether SIGINT/SIGTERM/SIGHUP trigger a shutdown.
    pub handle_signals: bool,
}

impl Default for CoordinatorConfig {
    fn default() -> Self {
        Self {
            grace_period: Duration::from_secs(5),
            handle_signals: true,
        }
    }
}

impl From<&ShutdownConfig> for CoordinatorConfig {
    fn from(config: &ShutdownConfig) -> Self {
        Self {
            grace_period: Duration::from_millis(config.grace_period_ms),
            handle_signals: config.handle_signals,
        }
    }
}

/// Runs a fixed set of listeners and shuts all of them down as soon as any
/// one of them stops, a signal arrives, or a shutdown is requested.
pub struct Coordinator {
    config: CoordinatorConfig,
    handle: ShutdownHandle,
}

impl Coordinator {
    /// Create a coordinator with the given settings.
    pub fn new(config: CoordinatorConfig) -> Self {
        Self {
            config,
            handle: ShutdownHandle::new(),
        }
    }

    /// Handle for requesting a shutdown while `run` is in progress.
    pub fn handle(&self) -> ShutdownHandle {
        self.handle.clone()
    }

    /// Run `listeners` until the first shutdown trigger, then stop them all.
    ///
    /// Returns after every listener has stopped or been abandoned at its
    /// deadline. The signal watch, when enabled, is held only while waiting
    /// for the trigger.
    pub async fn run(self, listeners: Vec<Box<dyn Listener>>) -> RunOutcome {
        if listeners.is_empty() {
            tracing::warn!("No listeners to run");
            self.handle.set_phase(Phase::Done);
            return RunOutcome {
                cause: ShutdownCause::NoListeners,
                listeners: Vec::new(),
                sweep_duration: Duration::ZERO,
            };
        }

        let mut signals = if self.config.handle_signals {
            match SignalWatch::install() {
                Ok(watch) => Some(watch),
                Err(e) => {
                    tracing::warn!(error = %e, "Failed to install signal handlers, continuing without them");
                    None
                }
            }
        } else {
            None
        };

        let running: Vec<RunningListener> = listeners.into_iter().map(spawn_listener).collect();

        self.handle.set_phase(Phase::Watching);
        tracing::info!(
            listeners = running.len(),
            grace_period = ?self.config.grace_period,
            signals = signals.is_some(),
            "Listener group running"
        );

        let cause = self.watch(&running, signals.as_mut()).await;
        drop(signals);

        metrics::record_trigger(&cause);
        tracing::info!(cause = %cause, "Shutdown triggered, stopping all listeners");

        self.handle.set_phase(Phase::Sweeping);
        let started = Instant::now();
        let grace_period = self.config.grace_period;
        let reports = join_all(running.into_iter().map(|listener| listener.stop(grace_period))).await;
        let sweep_duration = started.elapsed();
        metrics::record_sweep(sweep_duration);
        self.handle.set_phase(Phase::Done);

        let outcome = RunOutcome {
            cause,
            listeners: reports,
            sweep_duration,
        };

        if outcome.is_clean() {
            tracing::info!(duration = ?sweep_duration, "All listeners stopped");
        } else {
            tracing::warn!(
                duration = ?sweep_duration,
                timed_out = outcome.timed_out().count(),
                "Shutdown completed with failures"
            );
        }
        outcome
    }

    /// Wait for the first trigger from any source.
    async fn watch(
        &self,
        running: &[RunningListener],
        signals: Option<&mut SignalWatch>,
    ) -> ShutdownCause {
        let mut events: Vec<BoxFuture<'_, ShutdownCause>> = Vec::with_capacity(running.len() + 2);

        let requested = self.handle.requested();
        events.push(
            async move {
                requested.await;
                ShutdownCause::Requested
            }
            .boxed(),
        );

        if let Some(signals) = signals {
            events.push(async move { ShutdownCause::Signal(signals.recv().await) }.boxed());
        }

        for listener in running {
            let name = listener.ctx.name();
            let notified = listener.ctx.notified();
            events.push(async move { ShutdownCause::from_event(name, notified.await) }.boxed());
        }

        // The in-process request is always among the events, so the set is never empty.
        first_of(events)
            .await
            .map(|(_, cause)| cause)
            .unwrap_or(ShutdownCause::Requested)
    }
}

impl Default for Coordinator {
    fn default() -> Self {
        Self::new(CoordinatorConfig::default())
    }
}

/// A started listener: its context and the task serving it.
struct RunningListener {
    ctx: ListenerContext,
    task: JoinHandle<Result<(), ListenerError>>,
}

fn spawn_listener(listener: Box<dyn Listener>) -> RunningListener {
    let ctx = ListenerContext::new(listener.name());
    let task_ctx = ctx.clone();

    let task = tokio::spawn(async move {
        // A panic counts as a failure so the group still shuts down.
        let result = match AssertUnwindSafe(listener.serve(task_ctx.clone()))
            .catch_unwind()
            .await
        {
            Ok(result) => result,
            Err(payload) => Err(ListenerError::Panicked(panic_message(payload.as_ref()))),
        };

        let event = match &result {
            Ok(()) => {
                tracing::debug!(listener = %task_ctx.name(), "Serve loop returned");
                ListenerEvent::Exited
            }
            Err(e) => {
                tracing::error!(listener = %task_ctx.name(), error = %e, "Listener failed");
                task_ctx.advance(ListenerState::Failed);
                ListenerEvent::Failed(e.to_string())
            }
        };
        // Reaching here after a close request or a stop is expected.
        if !task_ctx.notify(event) {
            tracing::trace!(listener = %task_ctx.name(), "Stop notification already sent");
        }

        result
    });

    RunningListener { ctx, task }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        (*message).to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "unknown panic payload".to_string()
    }
}

impl RunningListener {
    /// Ask the listener to stop and wait for it, up to `grace_period`.
    async fn stop(self, grace_period: Duration) -> ListenerReport {
        let RunningListener { ctx, mut task } = self;

        ctx.advance(ListenerState::Stopping);
        ctx.request_stop();

        let outcome = match tokio::time::timeout(grace_period, &mut task).await {
            Ok(Ok(Ok(()))) => StopOutcome::Stopped,
            Ok(Ok(Err(e))) => StopOutcome::Failed(e.to_string()),
            Ok(Err(e)) => StopOutcome::Failed(format!("listener task ended abnormally: {}", e)),
            Err(_) => {
                task.abort();
                StopOutcome::TimedOut
            }
        };
        ctx.advance(outcome.state());
        metrics::record_stop(ctx.name(), &outcome);

        match &outcome {
            StopOutcome::Stopped => {
                tracing::info!(listener = %ctx.name(), "Listener stopped");
            }
            StopOutcome::Failed(error) => {
                tracing::warn!(listener = %ctx.name(), error = %error, "Listener stopped with error");
            }
            StopOutcome::TimedOut => {
                tracing::warn!(
                    listener = %ctx.name(),
                    grace_period = ?grace_period,
                    "Listener did not stop within grace period, abandoned"
                );
            }
        }

        ListenerReport {
            name: ctx.name().to_string(),
            outcome,
        }
    }
}
