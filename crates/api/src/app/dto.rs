//! Request/response DTOs and JSON mapping.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use freshtrack_agent::{AgentAction, AgentLogEntry, RunSummary};
use freshtrack_core::{AgentLogId, FoodItemId, TenantId};
use freshtrack_foods::{FoodItem, FoodStatus};

#[derive(Debug, Deserialize)]
pub struct CreateFoodRequest {
    pub name: String,
    pub quantity: String,
    pub expiry_date: NaiveDate,
}

#[derive(Debug, Default, Deserialize)]
pub struct UpdateFoodRequest {
    pub name: Option<String>,
    pub quantity: Option<String>,
    pub expiry_date: Option<NaiveDate>,
}

#[derive(Debug, Serialize)]
pub struct FoodItemResponse {
    pub id: FoodItemId,
    pub user_id: TenantId,
    pub name: String,
    pub quantity: String,
    pub expiry_date: String,
    pub status: FoodStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<FoodItem> for FoodItemResponse {
    fn from(item: FoodItem) -> Self {
        Self {
            id: item.id,
            user_id: item.user_id,
            name: item.name,
            quantity: item.quantity,
            expiry_date: item.expiry_date,
            status: item.status,
            created_at: item.created_at,
            updated_at: item.updated_at,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct AgentLogResponse {
    pub id: AgentLogId,
    pub user_id: TenantId,
    pub action: AgentAction,
    pub reasoning: String,
    pub created_at: DateTime<Utc>,
}

impl From<AgentLogEntry> for AgentLogResponse {
    fn from(entry: AgentLogEntry) -> Self {
        Self {
            id: entry.id,
            user_id: entry.user_id,
            action: entry.action,
            reasoning: entry.reasoning,
            created_at: entry.created_at,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct LogsQuery {
    pub limit: Option<i64>,
}

#[derive(Debug, Serialize)]
pub struct AgentRunResponse {
    pub message: String,
    pub items_processed: u64,
    pub logs_created: u64,
}

impl AgentRunResponse {
    pub fn completed(summary: RunSummary) -> Self {
        Self {
            message: "Agent run completed successfully".to_string(),
            items_processed: summary.items_processed,
            logs_created: summary.logs_created,
        }
    }
}

/// Per-tenant statistics plus the most recent recommendations.
#[derive(Debug, Serialize)]
pub struct InsightsResponse {
    pub total_items: usize,
    pub safe: usize,
    pub expiring: usize,
    pub expired: usize,
    pub waste_count: usize,
    pub recent_recommendations: Vec<AgentLogResponse>,
}

#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: String,
}
