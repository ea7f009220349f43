//! Shared utilities for integration tests.

#![allow(dead_code)]

use std::time::Duration;

use futures_util::future::{BoxFuture, FutureExt};
use listener_group::lifecycle::{CoordinatorConfig, Listener, ListenerContext};
use listener_group::net::ListenerError;
use listener_group::HttpListener;

/// Coordinator settings for tests: short grace period, no signal handling.
pub fn test_config(grace_period: Duration) -> CoordinatorConfig {
    CoordinatorConfig {
        grace_period,
        handle_signals: false,
    }
}

/// Build HTTP listeners from `(name, address)` pairs.
pub fn http_group(pairs: &[(&str, &str)]) -> Vec<Box<dyn Listener>> {
    pairs
        .iter()
        .map(|(name, addr)| Box::new(HttpListener::new(*name, *addr)) as Box<dyn Listener>)
        .collect()
}

/// A client that never reuses connections, so shutdown is not held up by
/// idle keep-alive sockets.
pub fn client() -> reqwest::Client {
    reqwest::Client::builder()
        .pool_max_idle_per_host(0)
        .no_proxy()
        .timeout(Duration::from_secs(2))
        .build()
        .unwrap()
}

/// Poll `addr` until it answers, panicking after a few seconds.
pub async fn wait_until_serving(addr: &str) {
    let client = client();
    for _ in 0..100 {
        if let Ok(res) = client.get(format!("http://{}/", addr)).send().await {
            if res.status().is_success() {
                return;
            }
        }
        tokio::time::sleep(Duration::from_millis(50)).await;
    }
    panic!("listener at {} never started serving", addr);
}

/// Serves until asked to stop.
pub struct Polite {
    pub name: &'static str,
}

impl Listener for Polite {
    fn name(&self) -> &str {
        self.name
    }

    fn serve(self: Box<Self>, ctx: ListenerContext) -> BoxFuture<'static, Result<(), ListenerError>> {
        async move {
            ctx.mark_running();
            ctx.stopped().await;
            Ok(())
        }
        .boxed()
    }
}

/// Takes `delay` to wind down after a stop request.
pub struct SlowStop {
    pub name: &'static str,
    pub delay: Duration,
}

impl Listener for SlowStop {
    fn name(&self) -> &str {
        self.name
    }

    fn serve(self: Box<Self>, ctx: ListenerContext) -> BoxFuture<'static, Result<(), ListenerError>> {
        async move {
            ctx.mark_running();
            ctx.stopped().await;
            tokio::time::sleep(self.delay).await;
            Ok(())
        }
        .boxed()
    }
}

/// Ignores stop requests entirely.
pub struct Stubborn {
    pub name: &'static str,
}

impl Listener for Stubborn {
    fn name(&self) -> &str {
        self.name
    }

    fn serve(self: Box<Self>, ctx: ListenerContext) -> BoxFuture<'static, Result<(), ListenerError>> {
        async move {
            ctx.mark_running();
            std::future::pending::<()>().await;
            Ok(())
        }
        .boxed()
    }
}

/// Fails with a serve error after `delay`.
pub struct FailsAfter {
    pub name: &'static str,
    pub delay: Duration,
}

impl Listener for FailsAfter {
    fn name(&self) -> &str {
        self.name
    }

    fn serve(self: Box<Self>, ctx: ListenerContext) -> BoxFuture<'static, Result<(), ListenerError>> {
        async move {
            ctx.mark_running();
            tokio::time::sleep(self.delay).await;
            Err(ListenerError::Serve(std::io::Error::other("boom")))
        }
        .boxed()
    }
}

/// Returns cleanly on its own, without being asked to stop.
pub struct ExitsAfter {
    pub name: &'static str,
    pub delay: Duration,
}

impl Listener for ExitsAfter {
    fn name(&self) -> &str {
        self.name
    }

    fn serve(self: Box<Self>, ctx: ListenerContext) -> BoxFuture<'static, Result<(), ListenerError>> {
        async move {
            ctx.mark_running();
            tokio::time::sleep(self.delay).await;
            Ok(())
        }
        .boxed()
    }
}

/// Requests its own close while being stopped, i.e. a trigger that arrives
/// during the sweep.
pub struct ClosesDuringStop {
    pub name: &'static str,
}

impl Listener for ClosesDuringStop {
    fn name(&self) -> &str {
        self.name
    }

    fn serve(self: Box<Self>, ctx: ListenerContext) -> BoxFuture<'static, Result<(), ListenerError>> {
        async move {
            ctx.mark_running();
            ctx.stopped().await;
            assert!(ctx.close_handle().request(), "late close should still fire once");
            assert!(!ctx.close_handle().request());
            Ok(())
        }
        .boxed()
    }
}

/// Panics in its serve loop after `delay`.
pub struct Panics {
    pub name: &'static str,
    pub delay: Duration,
}

impl Listener for Panics {
    fn name(&self) -> &str {
        self.name
    }

    fn serve(self: Box<Self>, ctx: ListenerContext) -> BoxFuture<'static, Result<(), ListenerError>> {
        async move {
            ctx.mark_running();
            tokio::time::sleep(self.delay).await;
            panic!("serve loop exploded");
        }
        .boxed()
    }
}
