//! Storage port for food items.
//!
//! Implementations live in `freshtrack-infra`. Keeping the trait here lets the
//! batch runner and the HTTP layer depend on the capability without depending
//! on any particular backend.

use async_trait::async_trait;
use chrono::NaiveDate;

use freshtrack_core::{DomainResult, FoodItemId, StoreError, TenantId};

use crate::item::{validate_name, validate_quantity, FoodItem, NewFood};
use crate::status::FoodStatus;

/// Partial update for a food item. `None` fields are left untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FoodUpdate {
    pub name: Option<String>,
    pub quantity: Option<String>,
    pub expiry_date: Option<NaiveDate>,
    /// Set together with `expiry_date` when the caller re-derives freshness.
    pub status: Option<FoodStatus>,
}

impl FoodUpdate {
    /// Validated patch. An expiry change re-derives `status` against `today`.
    pub fn new(
        name: Option<String>,
        quantity: Option<String>,
        expiry_date: Option<NaiveDate>,
        today: NaiveDate,
    ) -> DomainResult<Self> {
        if let Some(name) = &name {
            validate_name(name)?;
        }
        if let Some(quantity) = &quantity {
            validate_quantity(quantity)?;
        }
        let status = expiry_date.map(|d| FoodStatus::classify(d, today));

        Ok(Self {
            name,
            quantity,
            expiry_date,
            status,
        })
    }

    pub fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.quantity.is_none()
            && self.expiry_date.is_none()
            && self.status.is_none()
    }
}

/// Tenant-scoped food item storage.
///
/// Every operation is filtered by `tenant_id`; cross-tenant access is not
/// expressible through this interface.
#[async_trait]
pub trait FoodStore: Send + Sync {
    /// Insert a new item. The store assigns identity and timestamps.
    async fn create(
        &self,
        tenant_id: TenantId,
        food: NewFood,
        status: FoodStatus,
    ) -> Result<FoodItem, StoreError>;

    /// All items owned by the tenant, ordered by expiry date ascending.
    async fn list(&self, tenant_id: TenantId) -> Result<Vec<FoodItem>, StoreError>;

    /// Look up one item; `None` when missing or owned by another tenant.
    async fn get(
        &self,
        tenant_id: TenantId,
        id: FoodItemId,
    ) -> Result<Option<FoodItem>, StoreError>;

    /// Apply a partial update; `None` when missing or owned by another tenant.
    async fn update(
        &self,
        tenant_id: TenantId,
        id: FoodItemId,
        update: FoodUpdate,
    ) -> Result<Option<FoodItem>, StoreError>;

    /// Delete an item; returns whether a row was removed.
    async fn delete(&self, tenant_id: TenantId, id: FoodItemId) -> Result<bool, StoreError>;

    /// Distinct tenants currently owning at least one item.
    async fn tenants(&self) -> Result<Vec<TenantId>, StoreError>;

    /// Persist a recomputed freshness state for one item.
    async fn set_status(
        &self,
        tenant_id: TenantId,
        id: FoodItemId,
        status: FoodStatus,
    ) -> Result<(), StoreError>;
}
