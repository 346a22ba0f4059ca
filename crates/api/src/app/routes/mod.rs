use axum::{
    routing::{get, post, put},
    Router,
};

pub mod agent;
pub mod foods;
pub mod insights;
pub mod system;

/// Router for all authenticated (tenant-scoped) endpoints.
///
/// `/agent/run` is wired separately: it is gated by the service key, not a
/// tenant token.
pub fn router() -> Router {
    Router::new()
        .route("/food", post(foods::create_food).get(foods::list_foods))
        .route(
            "/food/:id",
            put(foods::update_food).delete(foods::delete_food),
        )
        .route("/agent/logs", get(agent::logs))
        .route("/insights", get(insights::insights))
}
