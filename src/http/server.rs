//! HTTP listener.
//!
//! # Responsibilities
//! - Create Axum Router with the index and close handlers
//! - Wire up middleware (tracing, timeout, request ID)
//! - Bind through the net layer and report readiness
//! - Stop gracefully when the coordinator asks

use axum::{
    extract::{Request, State},
    http::header,
    response::IntoResponse,
    routing::any,
    Router,
};
use futures_util::future::{BoxFuture, FutureExt};
use std::sync::Arc;
use std::time::Duration;
use tower_http::{
    request_id::{PropagateRequestIdLayer, SetRequestIdLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};

use crate::config::{AppConfig, HttpConfig, ListenerConfig};
use crate::http::request::{MakeRequestUuidV4, X_REQUEST_ID};
use crate::lifecycle::{CloseHandle, Listener, ListenerContext};
use crate::net::{self, ListenerError};
use crate::observability::metrics;

const PLAIN_TEXT: &str = "text/plain; charset=utf-8";

/// State injected into handlers.
#[derive(Clone)]
pub struct AppState {
    pub name: Arc<str>,
    pub close: CloseHandle,
}

/// An HTTP endpoint that names itself at `/` and closes the group at `/close`.
#[derive(Debug, Clone)]
pub struct HttpListener {
    name: String,
    bind_address: String,
    request_timeout: Duration,
}

impl HttpListener {
    /// Create a listener with the default request timeout.
    pub fn new(name: impl Into<String>, bind_address: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            bind_address: bind_address.into(),
            request_timeout: Duration::from_secs(HttpConfig::default().request_timeout_secs),
        }
    }

    pub fn from_config(listener: &ListenerConfig, http: &HttpConfig) -> Self {
        Self::new(&listener.name, &listener.bind_address)
            .with_request_timeout(Duration::from_secs(http.request_timeout_secs))
    }

    pub fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = timeout;
        self
    }

    /// Build the Axum router with all middleware layers.
    #[allow(deprecated)]
    pub fn build_router(state: AppState, request_timeout: Duration) -> Router {
        Router::new()
            .route("/", any(index_handler))
            .route("/close", any(close_handler))
            .fallback(index_handler)
            .with_state(state)
            .layer(TimeoutLayer::new(request_timeout))
            .layer(PropagateRequestIdLayer::x_request_id())
            .layer(TraceLayer::new_for_http().make_span_with(|request: &Request| {
                let request_id = request
                    .headers()
                    .get(X_REQUEST_ID)
                    .and_then(|v| v.to_str().ok())
                    .unwrap_or("unknown");
                tracing::info_span!(
                    "request",
                    method = %request.method(),
                    uri = %request.uri(),
                    request_id = %request_id,
                )
            }))
            .layer(SetRequestIdLayer::x_request_id(MakeRequestUuidV4))
    }

    async fn run(self, ctx: ListenerContext) -> Result<(), ListenerError> {
        let listener = net::bind(&self.bind_address).await?;
        let local_addr = listener.local_addr().map_err(ListenerError::Serve)?;

        ctx.mark_running();
        tracing::info!(listener = %self.name, address = %local_addr, "HTTP server starting");

        let state = AppState {
            name: Arc::from(self.name.as_str()),
            close: ctx.close_handle(),
        };
        let app = Self::build_router(state, self.request_timeout);

        axum::serve(listener, app.into_make_service())
            .with_graceful_shutdown(ctx.stopped())
            .await
            .map_err(ListenerError::Serve)?;

        tracing::info!(listener = %self.name, "HTTP server stopped");
        Ok(())
    }
}

impl Listener for HttpListener {
    fn name(&self) -> &str {
        &self.name
    }

    fn serve(self: Box<Self>, ctx: ListenerContext) -> BoxFuture<'static, Result<(), ListenerError>> {
        (*self).run(ctx).boxed()
    }
}

/// One HTTP listener per configured entry, in config order.
pub fn listeners_from_config(config: &AppConfig) -> Vec<Box<dyn Listener>> {
    config
        .listeners
        .iter()
        .map(|listener| {
            Box::new(HttpListener::from_config(listener, &config.http)) as Box<dyn Listener>
        })
        .collect()
}

/// Answers every path other than `/close` with the listener's name.
async fn index_handler(State(state): State<AppState>) -> impl IntoResponse {
    metrics::record_request(&state.name, "/");
    ([(header::CONTENT_TYPE, PLAIN_TEXT)], state.name.to_string())
}

/// Asks the group to shut down through this listener's own notification.
async fn close_handler(State(state): State<AppState>) -> impl IntoResponse {
    metrics::record_request(&state.name, "/close");

    if state.close.request() {
        tracing::info!(listener = %state.name, "Close requested over HTTP");
    } else {
        tracing::debug!(listener = %state.name, "Close already requested, ignoring");
    }

    ([(header::CONTENT_TYPE, PLAIN_TEXT)], "closing")
}
