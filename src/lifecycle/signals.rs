//! OS signal handling.
//!
//! # Responsibilities
//! - Register for SIGINT, SIGTERM and SIGHUP
//! - Translate the first delivered signal into a [`TerminationSignal`]
//! - Stop listening when the watch is dropped
//!
//! # Design Decisions
//! - Uses Tokio's signal handling (async-safe)
//! - SIGHUP is a shutdown trigger, not a reload
//! - The watch is a scoped guard: whoever holds it owns signal delivery

/// A termination signal the coordinator reacts to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TerminationSignal {
    Interrupt,
    Terminate,
    Hangup,
}

impl std::fmt::Display for TerminationSignal {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            TerminationSignal::Interrupt => "SIGINT",
            TerminationSignal::Terminate => "SIGTERM",
            TerminationSignal::Hangup => "SIGHUP",
        };
        f.write_str(s)
    }
}

/// Process-wide signal registration held for the lifetime of a run.
#[cfg(unix)]
pub struct SignalWatch {
    interrupt: tokio::signal::unix::Signal,
    terminate: tokio::signal::unix::Signal,
    hangup: tokio::signal::unix::Signal,
}

#[cfg(unix)]
impl SignalWatch {
    /// Start listening for termination signals.
    pub fn install() -> std::io::Result<Self> {
        use tokio::signal::unix::{signal, SignalKind};

        let watch = Self {
            interrupt: signal(SignalKind::interrupt())?,
            terminate: signal(SignalKind::terminate())?,
            hangup: signal(SignalKind::hangup())?,
        };
        tracing::debug!("Signal watch installed");
        Ok(watch)
    }

    /// Wait for the next termination signal.
    pub async fn recv(&mut self) -> TerminationSignal {
        tokio::select! {
            _ = self.interrupt.recv() => TerminationSignal::Interrupt,
            _ = self.terminate.recv() => TerminationSignal::Terminate,
            _ = self.hangup.recv() => TerminationSignal::Hangup,
        }
    }
}

/// Process-wide signal registration held for the lifetime of a run.
#[cfg(not(unix))]
pub struct SignalWatch {
    _private: (),
}

#[cfg(not(unix))]
impl SignalWatch {
    /// Start listening for Ctrl-C.
    pub fn install() -> std::io::Result<Self> {
        tracing::debug!("Signal watch installed");
        Ok(Self { _private: () })
    }

    /// Wait for Ctrl-C.
    pub async fn recv(&mut self) -> TerminationSignal {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::warn!(error = %e, "Ctrl-C handler unavailable");
            std::future::pending::<()>().await;
        }
        TerminationSignal::Interrupt
    }
}

impl Drop for SignalWatch {
    fn drop(&mut self) {
        tracing::debug!("Signal watch removed");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn signal_names() {
        assert_eq!(TerminationSignal::Interrupt.to_string(), "SIGINT");
        assert_eq!(TerminationSignal::Terminate.to_string(), "SIGTERM");
        assert_eq!(TerminationSignal::Hangup.to_string(), "SIGHUP");
    }

    #[tokio::test]
    async fn install_and_release() {
        let watch = SignalWatch::install().expect("signal registration");
        drop(watch);
        // A second registration after release works too.
        let _watch = SignalWatch::install().expect("signal registration");
    }
}
