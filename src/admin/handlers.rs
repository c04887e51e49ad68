use axum::{extract::State, Json};
use serde::Serialize;

use crate::http::server::AppState;

#[derive(Debug, Serialize)]
pub struct HealthStatus {
    pub status: &'static str,
    pub version: &'static str,
    pub key: String,
    pub source: String,
    pub loaded: bool,
}

/// `GET /actuator/health`
pub async fn get_health(State(state): State<AppState>) -> Json<HealthStatus> {
    Json(HealthStatus {
        status: "UP",
        version: env!("CARGO_PKG_VERSION"),
        key: state.endpoint.key().to_string(),
        source: state.endpoint.source_name().to_string(),
        loaded: state.endpoint.is_loaded(),
    })
}

/// `POST /actuator/refresh`: re-fetch now and list the keys that changed.
///
/// A failed fetch answers an empty list; the failure is logged by the
/// endpoint and the old value stays in place.
pub async fn post_refresh(State(state): State<AppState>) -> Json<Vec<String>> {
    match state.endpoint.refresh().await {
        Ok(changed) => Json(changed),
        Err(_) => Json(Vec::new()),
    }
}
