use std::sync::Arc;

use axum::{
    extract::{Extension, Path},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use chrono::Utc;

use freshtrack_core::FoodItemId;
use freshtrack_foods::{FoodUpdate, NewFood};

use crate::app::services::AppServices;
use crate::app::{dto, errors};
use crate::context::TenantContext;

pub async fn create_food(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(tenant): Extension<TenantContext>,
    Json(body): Json<dto::CreateFoodRequest>,
) -> axum::response::Response {
    let food = match NewFood::new(body.name, body.quantity, body.expiry_date) {
        Ok(food) => food,
        Err(e) => return errors::domain_error_to_response(e),
    };

    // Status is derived at write time; the batch run keeps it current later.
    let status = food.status(Utc::now().date_naive());

    match services.foods.create(tenant.tenant_id(), food, status).await {
        Ok(item) => (
            StatusCode::CREATED,
            Json(dto::FoodItemResponse::from(item)),
        )
            .into_response(),
        Err(e) => errors::store_error_to_response(e),
    }
}

pub async fn list_foods(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(tenant): Extension<TenantContext>,
) -> axum::response::Response {
    match services.foods.list(tenant.tenant_id()).await {
        Ok(items) => Json(
            items
                .into_iter()
                .map(dto::FoodItemResponse::from)
                .collect::<Vec<_>>(),
        )
        .into_response(),
        Err(e) => errors::store_error_to_response(e),
    }
}

pub async fn update_food(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(tenant): Extension<TenantContext>,
    Path(id): Path<String>,
    Json(body): Json<dto::UpdateFoodRequest>,
) -> axum::response::Response {
    let id: FoodItemId = match id.parse() {
        Ok(id) => id,
        Err(_) => {
            return errors::json_error(StatusCode::BAD_REQUEST, "invalid_id", "invalid food id")
        }
    };

    let update = match FoodUpdate::new(
        body.name,
        body.quantity,
        body.expiry_date,
        Utc::now().date_naive(),
    ) {
        Ok(update) => update,
        Err(e) => return errors::domain_error_to_response(e),
    };

    // An empty patch returns the stored record unchanged.
    if update.is_empty() {
        return match services.foods.get(tenant.tenant_id(), id).await {
            Ok(Some(item)) => Json(dto::FoodItemResponse::from(item)).into_response(),
            Ok(None) => not_found(),
            Err(e) => errors::store_error_to_response(e),
        };
    }

    match services.foods.update(tenant.tenant_id(), id, update).await {
        Ok(Some(item)) => Json(dto::FoodItemResponse::from(item)).into_response(),
        Ok(None) => not_found(),
        Err(e) => errors::store_error_to_response(e),
    }
}

pub async fn delete_food(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(tenant): Extension<TenantContext>,
    Path(id): Path<String>,
) -> axum::response::Response {
    let id: FoodItemId = match id.parse() {
        Ok(id) => id,
        Err(_) => {
            return errors::json_error(StatusCode::BAD_REQUEST, "invalid_id", "invalid food id")
        }
    };

    match services.foods.delete(tenant.tenant_id(), id).await {
        Ok(true) => Json(dto::MessageResponse {
            message: "Food item deleted successfully".to_string(),
        })
        .into_response(),
        Ok(false) => not_found(),
        Err(e) => errors::store_error_to_response(e),
    }
}

fn not_found() -> axum::response::Response {
    errors::json_error(StatusCode::NOT_FOUND, "not_found", "Food item not found")
}
