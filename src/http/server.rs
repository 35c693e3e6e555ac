//! HTTP server setup and the relay handler.
//!
//! # Responsibilities
//! - Create the Axum router with a catch-all relay handler
//! - Wire up middleware (tracing, request timeout)
//! - Bind the server to a listener
//! - Per request: translate, classify, execute upstream, emit
//!
//! # Flow per request
//! ```text
//! inbound request
//!     → request.rs  (upstream URL, body classification)
//!     → transport   (single upstream call)
//!     → response.rs (mirror status/content-type/body)
//! ```

use std::sync::Arc;
use std::time::Duration;

use axum::{
    body::Body,
    extract::State,
    http::{Request, StatusCode},
    response::{IntoResponse, Response},
    routing::any,
    Router,
};
use tokio::net::TcpListener;
use tokio::sync::broadcast;
use tower_http::{timeout::TimeoutLayer, trace::TraceLayer};
use uuid::Uuid;

use crate::config::{RelayConfig, UpstreamConfig};
use crate::diagnostics::DiagnosticSink;
use crate::http::request::{classify, upstream_url};
use crate::http::response::{bad_gateway, emit};
use crate::transport::TransportExecutor;

/// Application state injected into the handler.
#[derive(Clone)]
pub struct AppState {
    pub upstream: Arc<UpstreamConfig>,
    pub executor: TransportExecutor,
    pub diagnostics: DiagnosticSink,
    pub max_body_bytes: usize,
}

/// HTTP server for the relay.
pub struct HttpServer {
    router: Router,
}

impl HttpServer {
    /// Create a new HTTP server with the given configuration.
    pub fn new(config: RelayConfig) -> Self {
        let state = AppState {
            upstream: Arc::new(config.upstream.clone()),
            executor: TransportExecutor::new(),
            diagnostics: DiagnosticSink::from_config(&config.diagnostics),
            max_body_bytes: config.listener.max_body_bytes,
        };

        let router = Self::build_router(&config, state);
        Self { router }
    }

    /// Build the Axum router with all middleware layers.
    fn build_router(config: &RelayConfig, state: AppState) -> Router {
        Router::new()
            .route("/{*path}", any(relay_handler))
            .route("/", any(relay_handler))
            .with_state(state)
            .layer(TimeoutLayer::new(Duration::from_secs(
                config.timeouts.request_secs,
            )))
            .layer(TraceLayer::new_for_http())
    }

    /// Run the server, accepting connections on the given listener
    /// until the shutdown signal fires.
    pub async fn run(
        self,
        listener: TcpListener,
        mut shutdown: broadcast::Receiver<()>,
    ) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(address = %addr, "HTTP server starting");

        axum::serve(listener, self.router)
            .with_graceful_shutdown(async move {
                let _ = shutdown.recv().await;
            })
            .await?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }
}

/// Relay handler: one inbound request, one upstream call, one response.
async fn relay_handler(State(state): State<AppState>, request: Request<Body>) -> Response {
    let request_id = Uuid::new_v4();
    let method = request.method().clone();
    let path_and_query = request
        .uri()
        .path_and_query()
        .map(|pq| pq.as_str())
        .unwrap_or("/")
        .to_string();
    let headers = request.headers().clone();

    let url = upstream_url(
        &state.upstream.base_url,
        &state.upstream.mount_prefix,
        &path_and_query,
    );

    state.diagnostics.query_init(&url);
    state.diagnostics.inbound_method(method.as_str());

    let body_bytes = match axum::body::to_bytes(request.into_body(), state.max_body_bytes).await {
        Ok(bytes) => bytes,
        Err(e) if is_length_limit_error(&e) => {
            tracing::warn!(request_id = %request_id, error = %e, "Request body exceeds limit");
            return (StatusCode::PAYLOAD_TOO_LARGE, "Request body too large").into_response();
        }
        Err(e) => {
            tracing::warn!(request_id = %request_id, error = %e, "Failed to read request body");
            return (StatusCode::BAD_REQUEST, "Failed to read request body").into_response();
        }
    };
    state.diagnostics.inbound_body(&body_bytes);

    let body = classify(&method, &headers, body_bytes).await;
    state.diagnostics.outbound_body(&body);
    let size_upload = body.payload_len();

    tracing::debug!(
        request_id = %request_id,
        method = %method,
        url = %url,
        "Relaying request"
    );

    match state.executor.execute(method, &url, body).await {
        Ok(upstream) => {
            state.diagnostics.response_meta(
                upstream.status.as_u16(),
                &upstream.content_type,
                size_upload,
                upstream.body.len(),
            );
            state.diagnostics.response_body(&upstream.body);
            state.diagnostics.separator();

            tracing::debug!(
                request_id = %request_id,
                status = %upstream.status,
                content_type = %upstream.content_type,
                "Relaying upstream response"
            );
            emit(upstream)
        }
        Err(e) => {
            tracing::error!(request_id = %request_id, url = %url, error = %e, "Upstream error");
            state.diagnostics.separator();
            bad_gateway()
        }
    }
}

/// True when a body read failed because it outgrew the configured limit,
/// as opposed to a disconnect or protocol error mid-body.
fn is_length_limit_error(err: &axum::Error) -> bool {
    let mut source: Option<&(dyn std::error::Error + 'static)> = Some(err);
    while let Some(e) = source {
        if e.downcast_ref::<http_body_util::LengthLimitError>().is_some() {
            return true;
        }
        source = e.source();
    }
    false
}
