//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Create Axum Router with all handlers
//! - Wire up middleware (tracing, timeout, request ID, metrics)
//! - Bind server to listener
//! - Stop on the shutdown broadcast

use std::sync::Arc;
use std::time::{Duration, Instant};

use axum::{
    extract::{MatchedPath, Request, State},
    http::{header, StatusCode},
    middleware::{self, Next},
    response::{IntoResponse, Response},
    routing::get,
    Router,
};
use tokio::net::TcpListener;
use tokio::sync::broadcast;
use tower_http::{
    request_id::{PropagateRequestIdLayer, SetRequestIdLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};

use crate::admin;
use crate::config::{AdminConfig, ClientConfig};
use crate::http::request::{make_request_span, MakeRequestUuid, X_REQUEST_ID};
use crate::message::MessageEndpoint;
use crate::observability::metrics;

/// Application state injected into handlers.
#[derive(Clone)]
pub struct AppState {
    pub endpoint: Arc<MessageEndpoint>,
    pub admin: AdminConfig,
}

/// HTTP server exposing the message endpoint.
pub struct HttpServer {
    router: Router,
    config: ClientConfig,
}

impl HttpServer {
    /// Create a new HTTP server serving `endpoint`.
    pub fn new(config: ClientConfig, endpoint: Arc<MessageEndpoint>) -> Self {
        let state = AppState {
            endpoint,
            admin: config.admin.clone(),
        };

        let router = Self::build_router(&config, state);
        Self { router, config }
    }

    /// Build the Axum router with all middleware layers.
    #[allow(deprecated)]
    fn build_router(config: &ClientConfig, state: AppState) -> Router {
        let mut routes = Router::new()
            .route("/message", get(get_message))
            .merge(admin::health_router());
        if config.admin.enabled {
            routes = routes.merge(admin::refresh_router(state.clone()));
        }

        routes
            .route_layer(middleware::from_fn(track_metrics))
            .with_state(state)
            .layer(TimeoutLayer::new(Duration::from_secs(config.timeouts.request_secs)))
            .layer(TraceLayer::new_for_http().make_span_with(make_request_span))
            // Outside the timeout so a 408 still carries the id.
            .layer(PropagateRequestIdLayer::new(X_REQUEST_ID))
            .layer(SetRequestIdLayer::new(X_REQUEST_ID, MakeRequestUuid))
    }

    /// The fully layered router, for serving on a custom transport.
    pub fn router(&self) -> Router {
        self.router.clone()
    }

    /// Run the server until `shutdown` fires.
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

    /// Get a reference to the config.
    pub fn config(&self) -> &ClientConfig {
        &self.config
    }
}

/// `GET /message`: the current value as plain text.
///
/// Before the first successful load this answers 503 with a short
/// placeholder body.
async fn get_message(State(state): State<AppState>) -> Response {
    match state.endpoint.current() {
        Ok(current) => (
            [(header::CONTENT_TYPE, "text/plain; charset=utf-8")],
            current.value.clone(),
        )
            .into_response(),
        Err(e) => {
            tracing::debug!(error = %e, "Message requested before first load");
            (
                StatusCode::SERVICE_UNAVAILABLE,
                [(header::CONTENT_TYPE, "text/plain; charset=utf-8")],
                e.to_string(),
            )
                .into_response()
        }
    }
}

async fn track_metrics(request: Request, next: Next) -> Response {
    let start = Instant::now();
    let path = request
        .extensions()
        .get::<MatchedPath>()
        .map(|p| p.as_str().to_owned())
        .unwrap_or_else(|| request.uri().path().to_owned());

    let response = next.run(request).await;
    metrics::record_request(&path, response.status().as_u16(), start);
    response
}
