//! HTTP API application wiring (Axum router + service wiring).
//!
//! This folder is structured like:
//! - `services.rs`: infrastructure wiring (stores, text generator)
//! - `routes/`: HTTP routes + handlers (one file per domain area)
//! - `dto.rs`: request/response DTOs and JSON mapping helpers
//! - `errors.rs`: consistent error responses

use std::sync::Arc;

use axum::{
    routing::{get, post},
    Extension, Router,
};

use crate::middleware;

pub mod dto;
pub mod errors;
pub mod routes;
pub mod services;

/// Build the full HTTP router (public entrypoint used by `main.rs` and the
/// black-box tests).
pub fn build_app(services: Arc<services::AppServices>, service_key: String) -> Router {
    let key_state = middleware::ServiceKeyState {
        service_key: service_key.into(),
    };

    // Tenant routes: require a bearer access token.
    let protected = routes::router()
        .layer(Extension(services.clone()))
        .layer(axum::middleware::from_fn(middleware::auth_middleware));

    // The batch trigger authenticates with the shared service key instead.
    let trigger = Router::new()
        .route("/agent/run", post(routes::agent::run))
        .layer(Extension(services))
        .layer(axum::middleware::from_fn_with_state(
            key_state,
            middleware::service_key_middleware,
        ));

    Router::new()
        .route("/health", get(routes::system::health))
        .merge(trigger)
        .merge(protected)
}
