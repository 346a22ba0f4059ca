use std::sync::Arc;

use axum::{
    extract::{Extension, Query},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use chrono::Utc;

use crate::app::services::AppServices;
use crate::app::{dto, errors};
use crate::context::TenantContext;

const DEFAULT_LOGS_LIMIT: i64 = 20;

/// One batch run across all tenants.
///
/// Any internal failure surfaces as a single opaque 500; writes already
/// applied stay committed.
pub async fn run(Extension(services): Extension<Arc<AppServices>>) -> axum::response::Response {
    let runner = services.runner();

    match runner.run(Utc::now().date_naive()).await {
        Ok(summary) => Json(dto::AgentRunResponse::completed(summary)).into_response(),
        Err(e) => errors::json_error(
            StatusCode::INTERNAL_SERVER_ERROR,
            "internal_error",
            format!("Error running agent: {e}"),
        ),
    }
}

pub async fn logs(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(tenant): Extension<TenantContext>,
    Query(query): Query<dto::LogsQuery>,
) -> axum::response::Response {
    let limit = query.limit.unwrap_or(DEFAULT_LOGS_LIMIT);

    match services.logs.list_recent(tenant.tenant_id(), limit).await {
        Ok(entries) => Json(
            entries
                .into_iter()
                .map(dto::AgentLogResponse::from)
                .collect::<Vec<_>>(),
        )
        .into_response(),
        Err(e) => errors::store_error_to_response(e),
    }
}
