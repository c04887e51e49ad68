//! Actuator style admin endpoints.

pub mod auth;
pub mod handlers;

use axum::{
    middleware,
    routing::{get, post},
    Router,
};

use self::auth::admin_auth_middleware;
use self::handlers::*;
use crate::http::server::AppState;

pub fn health_router() -> Router<AppState> {
    Router::new().route("/actuator/health", get(get_health))
}

pub fn refresh_router(state: AppState) -> Router<AppState> {
    Router::new()
        .route("/actuator/refresh", post(post_refresh))
        .route_layer(middleware::from_fn_with_state(state, admin_auth_middleware))
}
