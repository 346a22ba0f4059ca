use std::sync::Arc;

use axum::{extract::Extension, response::IntoResponse, Json};

use freshtrack_foods::FoodStatus;

use crate::app::services::AppServices;
use crate::app::{dto, errors};
use crate::context::TenantContext;

const RECENT_RECOMMENDATIONS: i64 = 5;

/// Per-tenant statistics over stored statuses plus the most recent
/// recommendations. Counts reflect the stored `status` field, which may be
/// transiently stale between batch runs.
pub async fn insights(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(tenant): Extension<TenantContext>,
) -> axum::response::Response {
    let foods = match services.foods.list(tenant.tenant_id()).await {
        Ok(foods) => foods,
        Err(e) => return errors::store_error_to_response(e),
    };

    let logs = match services
        .logs
        .list_recent(tenant.tenant_id(), RECENT_RECOMMENDATIONS)
        .await
    {
        Ok(logs) => logs,
        Err(e) => return errors::store_error_to_response(e),
    };

    let count = |status: FoodStatus| foods.iter().filter(|f| f.status == status).count();
    let expired = count(FoodStatus::Expired);

    Json(dto::InsightsResponse {
        total_items: foods.len(),
        safe: count(FoodStatus::Safe),
        expiring: count(FoodStatus::Expiring),
        expired,
        waste_count: expired,
        recent_recommendations: logs.into_iter().map(dto::AgentLogResponse::from).collect(),
    })
    .into_response()
}
