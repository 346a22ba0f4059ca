//! Postgres-backed store implementations.
//!
//! Tenant isolation is enforced in SQL: every query on `foods` and
//! `agent_logs` includes `user_id` in its WHERE clause, so cross-tenant
//! access is not expressible through these adapters.
//!
//! Expected schema:
//!
//! ```sql
//! CREATE TABLE foods (
//!     id          UUID PRIMARY KEY,
//!     user_id     UUID NOT NULL,
//!     name        TEXT NOT NULL,
//!     quantity    TEXT NOT NULL,
//!     expiry_date TEXT NOT NULL,
//!     status      TEXT NOT NULL,
//!     created_at  TIMESTAMPTZ NOT NULL,
//!     updated_at  TIMESTAMPTZ NOT NULL
//! );
//!
//! CREATE TABLE agent_logs (
//!     id         UUID PRIMARY KEY,
//!     user_id    UUID NOT NULL,
//!     action     TEXT NOT NULL,
//!     reasoning  TEXT NOT NULL,
//!     created_at TIMESTAMPTZ NOT NULL
//! );
//! ```
//!
//! `expiry_date` is TEXT on purpose: the stored representation may be a
//! calendar date or a full timestamp, and consumers parse it rather than
//! trust it. ISO-8601 text still orders chronologically.
//!
//! All SQLx failures map to the opaque `StoreError::Backend`; callers cannot
//! distinguish causes programmatically.

use std::str::FromStr;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::postgres::PgRow;
use sqlx::{PgPool, Row};
use uuid::Uuid;

use freshtrack_agent::{AgentAction, AgentLogEntry, AgentLogStore};
use freshtrack_core::{AgentLogId, FoodItemId, StoreError, TenantId};
use freshtrack_foods::{FoodItem, FoodStatus, FoodStore, FoodUpdate, NewFood};

fn map_sqlx_error(operation: &str, e: sqlx::Error) -> StoreError {
    StoreError::backend(format!("{operation}: {e}"))
}

fn food_from_row(operation: &str, row: &PgRow) -> Result<FoodItem, StoreError> {
    let status_raw: String = row
        .try_get("status")
        .map_err(|e| map_sqlx_error(operation, e))?;
    let status = FoodStatus::from_str(&status_raw)
        .map_err(|e| StoreError::backend(format!("{operation}: {e}")))?;

    Ok(FoodItem {
        id: FoodItemId::from_uuid(
            row.try_get::<Uuid, _>("id")
                .map_err(|e| map_sqlx_error(operation, e))?,
        ),
        user_id: TenantId::from_uuid(
            row.try_get::<Uuid, _>("user_id")
                .map_err(|e| map_sqlx_error(operation, e))?,
        ),
        name: row
            .try_get("name")
            .map_err(|e| map_sqlx_error(operation, e))?,
        quantity: row
            .try_get("quantity")
            .map_err(|e| map_sqlx_error(operation, e))?,
        expiry_date: row
            .try_get("expiry_date")
            .map_err(|e| map_sqlx_error(operation, e))?,
        status,
        created_at: row
            .try_get::<DateTime<Utc>, _>("created_at")
            .map_err(|e| map_sqlx_error(operation, e))?,
        updated_at: row
            .try_get::<DateTime<Utc>, _>("updated_at")
            .map_err(|e| map_sqlx_error(operation, e))?,
    })
}

/// Postgres-backed `FoodStore`.
///
/// Uses the SQLx connection pool, so the adapter is `Send + Sync` and cheap
/// to clone across handlers.
#[derive(Debug, Clone)]
pub struct PostgresFoodStore {
    pool: Arc<PgPool>,
}

impl PostgresFoodStore {
    pub fn new(pool: PgPool) -> Self {
        Self {
            pool: Arc::new(pool),
        }
    }
}

#[async_trait]
impl FoodStore for PostgresFoodStore {
    async fn create(
        &self,
        tenant_id: TenantId,
        food: NewFood,
        status: FoodStatus,
    ) -> Result<FoodItem, StoreError> {
        let now = Utc::now();
        let item = FoodItem {
            id: FoodItemId::new(),
            user_id: tenant_id,
            name: food.name().to_string(),
            quantity: food.quantity().to_string(),
            expiry_date: food.expiry_date().format("%Y-%m-%d").to_string(),
            status,
            created_at: now,
            updated_at: now,
        };

        sqlx::query(
            r#"
            INSERT INTO foods (id, user_id, name, quantity, expiry_date, status, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            "#,
        )
        .bind(item.id.as_uuid())
        .bind(item.user_id.as_uuid())
        .bind(&item.name)
        .bind(&item.quantity)
        .bind(&item.expiry_date)
        .bind(item.status.as_str())
        .bind(item.created_at)
        .bind(item.updated_at)
        .execute(&*self.pool)
        .await
        .map_err(|e| map_sqlx_error("foods.create", e))?;

        Ok(item)
    }

    async fn list(&self, tenant_id: TenantId) -> Result<Vec<FoodItem>, StoreError> {
        let rows = sqlx::query(
            r#"
            SELECT id, user_id, name, quantity, expiry_date, status, created_at, updated_at
            FROM foods
            WHERE user_id = $1
            ORDER BY expiry_date ASC
            "#,
        )
        .bind(tenant_id.as_uuid())
        .fetch_all(&*self.pool)
        .await
        .map_err(|e| map_sqlx_error("foods.list", e))?;

        rows.iter().map(|r| food_from_row("foods.list", r)).collect()
    }

    async fn get(
        &self,
        tenant_id: TenantId,
        id: FoodItemId,
    ) -> Result<Option<FoodItem>, StoreError> {
        let row = sqlx::query(
            r#"
            SELECT id, user_id, name, quantity, expiry_date, status, created_at, updated_at
            FROM foods
            WHERE user_id = $1 AND id = $2
            "#,
        )
        .bind(tenant_id.as_uuid())
        .bind(id.as_uuid())
        .fetch_optional(&*self.pool)
        .await
        .map_err(|e| map_sqlx_error("foods.get", e))?;

        row.map(|r| food_from_row("foods.get", &r)).transpose()
    }

    async fn update(
        &self,
        tenant_id: TenantId,
        id: FoodItemId,
        update: FoodUpdate,
    ) -> Result<Option<FoodItem>, StoreError> {
        let row = sqlx::query(
            r#"
            UPDATE foods
            SET name        = COALESCE($3, name),
                quantity    = COALESCE($4, quantity),
                expiry_date = COALESCE($5, expiry_date),
                status      = COALESCE($6, status),
                updated_at  = $7
            WHERE user_id = $1 AND id = $2
            RETURNING id, user_id, name, quantity, expiry_date, status, created_at, updated_at
            "#,
        )
        .bind(tenant_id.as_uuid())
        .bind(id.as_uuid())
        .bind(update.name.as_deref())
        .bind(update.quantity.as_deref())
        .bind(
            update
                .expiry_date
                .map(|d| d.format("%Y-%m-%d").to_string()),
        )
        .bind(update.status.map(|s| s.as_str()))
        .bind(Utc::now())
        .fetch_optional(&*self.pool)
        .await
        .map_err(|e| map_sqlx_error("foods.update", e))?;

        row.map(|r| food_from_row("foods.update", &r)).transpose()
    }

    async fn delete(&self, tenant_id: TenantId, id: FoodItemId) -> Result<bool, StoreError> {
        let result = sqlx::query("DELETE FROM foods WHERE user_id = $1 AND id = $2")
            .bind(tenant_id.as_uuid())
            .bind(id.as_uuid())
            .execute(&*self.pool)
            .await
            .map_err(|e| map_sqlx_error("foods.delete", e))?;

        Ok(result.rows_affected() > 0)
    }

    async fn tenants(&self) -> Result<Vec<TenantId>, StoreError> {
        let rows = sqlx::query("SELECT DISTINCT user_id FROM foods ORDER BY user_id")
            .fetch_all(&*self.pool)
            .await
            .map_err(|e| map_sqlx_error("foods.tenants", e))?;

        rows.iter()
            .map(|r| {
                r.try_get::<Uuid, _>("user_id")
                    .map(TenantId::from_uuid)
                    .map_err(|e| map_sqlx_error("foods.tenants", e))
            })
            .collect()
    }

    async fn set_status(
        &self,
        tenant_id: TenantId,
        id: FoodItemId,
        status: FoodStatus,
    ) -> Result<(), StoreError> {
        sqlx::query(
            "UPDATE foods SET status = $3, updated_at = $4 WHERE user_id = $1 AND id = $2",
        )
        .bind(tenant_id.as_uuid())
        .bind(id.as_uuid())
        .bind(status.as_str())
        .bind(Utc::now())
        .execute(&*self.pool)
        .await
        .map_err(|e| map_sqlx_error("foods.set_status", e))?;

        Ok(())
    }
}

/// Postgres-backed `AgentLogStore`.
#[derive(Debug, Clone)]
pub struct PostgresAgentLogStore {
    pool: Arc<PgPool>,
}

impl PostgresAgentLogStore {
    pub fn new(pool: PgPool) -> Self {
        Self {
            pool: Arc::new(pool),
        }
    }
}

fn log_from_row(operation: &str, row: &PgRow) -> Result<AgentLogEntry, StoreError> {
    let action_raw: String = row
        .try_get("action")
        .map_err(|e| map_sqlx_error(operation, e))?;
    let action = AgentAction::from_str(&action_raw)
        .map_err(|e| StoreError::backend(format!("{operation}: {e}")))?;

    Ok(AgentLogEntry {
        id: AgentLogId::from_uuid(
            row.try_get::<Uuid, _>("id")
                .map_err(|e| map_sqlx_error(operation, e))?,
        ),
        user_id: TenantId::from_uuid(
            row.try_get::<Uuid, _>("user_id")
                .map_err(|e| map_sqlx_error(operation, e))?,
        ),
        action,
        reasoning: row
            .try_get("reasoning")
            .map_err(|e| map_sqlx_error(operation, e))?,
        created_at: row
            .try_get::<DateTime<Utc>, _>("created_at")
            .map_err(|e| map_sqlx_error(operation, e))?,
    })
}

#[async_trait]
impl AgentLogStore for PostgresAgentLogStore {
    async fn append(
        &self,
        tenant_id: TenantId,
        action: AgentAction,
        reasoning: String,
    ) -> Result<AgentLogEntry, StoreError> {
        let entry = AgentLogEntry {
            id: AgentLogId::new(),
            user_id: tenant_id,
            action,
            reasoning,
            created_at: Utc::now(),
        };

        sqlx::query(
            r#"
            INSERT INTO agent_logs (id, user_id, action, reasoning, created_at)
            VALUES ($1, $2, $3, $4, $5)
            "#,
        )
        .bind(entry.id.as_uuid())
        .bind(entry.user_id.as_uuid())
        .bind(entry.action.as_str())
        .bind(&entry.reasoning)
        .bind(entry.created_at)
        .execute(&*self.pool)
        .await
        .map_err(|e| map_sqlx_error("agent_logs.append", e))?;

        Ok(entry)
    }

    async fn list_recent(
        &self,
        tenant_id: TenantId,
        limit: i64,
    ) -> Result<Vec<AgentLogEntry>, StoreError> {
        let rows = sqlx::query(
            r#"
            SELECT id, user_id, action, reasoning, created_at
            FROM agent_logs
            WHERE user_id = $1
            ORDER BY created_at DESC
            LIMIT $2
            "#,
        )
        .bind(tenant_id.as_uuid())
        .bind(limit)
        .fetch_all(&*self.pool)
        .await
        .map_err(|e| map_sqlx_error("agent_logs.list_recent", e))?;

        rows.iter()
            .map(|r| log_from_row("agent_logs.list_recent", r))
            .collect()
    }
}
