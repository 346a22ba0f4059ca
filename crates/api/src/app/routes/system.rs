use axum::{response::IntoResponse, Json};

pub async fn health() -> impl IntoResponse {
    Json(serde_json::json!({
        "message": "FreshTrack API",
        "status": "healthy",
        "version": env!("CARGO_PKG_VERSION"),
    }))
}
