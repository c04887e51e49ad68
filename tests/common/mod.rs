//! Shared utilities for integration tests.

#![allow(dead_code)]

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use arc_swap::ArcSwapOption;
use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use config_client::lifecycle::Shutdown;
use config_client::{ClientConfig, HttpServer, MessageEndpoint};
use tokio::net::TcpListener;

/// A config server answering the environment endpoint with one property.
pub struct MockConfigServer {
    pub addr: SocketAddr,
    message: Arc<ArcSwapOption<String>>,
}

impl MockConfigServer {
    pub fn uri(&self) -> String {
        format!("http://{}", self.addr)
    }

    /// Serve `value` from now on.
    pub fn set(&self, value: &str) {
        self.message.store(Some(Arc::new(value.to_string())));
    }

    /// Answer 503 from now on.
    pub fn go_down(&self) {
        self.message.store(None);
    }
}

/// Start a mock config server on an ephemeral port.
pub async fn start_mock_config_server(initial: Option<&str>) -> MockConfigServer {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let message = Arc::new(ArcSwapOption::from_pointee(initial.map(str::to_string)));

    let app = Router::new()
        .route("/{application}/{profile}", get(environment))
        .with_state(message.clone());

    tokio::spawn(async move {
        let _ = axum::serve(listener, app).await;
    });

    MockConfigServer { addr, message }
}

async fn environment(
    State(message): State<Arc<ArcSwapOption<String>>>,
    Path((application, profile)): Path<(String, String)>,
) -> Response {
    match message.load_full() {
        Some(value) => Json(serde_json::json!({
            "name": application,
            "profiles": [profile],
            "label": null,
            "version": "test",
            "propertySources": [
                {
                    "name": format!("{}-{}.yml", application, profile),
                    "source": { "example.message": value.as_str() }
                },
                {
                    "name": "application.yml",
                    "source": { "example.message": "shadowed", "example.other": "x" }
                }
            ]
        }))
        .into_response(),
        None => StatusCode::SERVICE_UNAVAILABLE.into_response(),
    }
}

/// Serve `endpoint` on an ephemeral port; returns its address.
pub async fn start_client(endpoint: Arc<MessageEndpoint>, shutdown: &Shutdown) -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let server = HttpServer::new(ClientConfig::default(), endpoint);
    let server_shutdown = shutdown.subscribe();

    tokio::spawn(async move {
        let _ = server.run(listener, server_shutdown).await;
    });

    addr
}

pub fn http_client() -> reqwest::Client {
    reqwest::Client::builder()
        .no_proxy()
        .timeout(Duration::from_secs(5))
        .build()
        .unwrap()
}
