//! In-memory store implementations for dev and tests.

use std::collections::HashMap;
use std::sync::RwLock;

use async_trait::async_trait;
use chrono::Utc;

use freshtrack_agent::{AgentAction, AgentLogEntry, AgentLogStore};
use freshtrack_core::{AgentLogId, FoodItemId, StoreError, TenantId};
use freshtrack_foods::{FoodItem, FoodStatus, FoodStore, FoodUpdate, NewFood};

fn poisoned() -> StoreError {
    StoreError::backend("in-memory store lock poisoned")
}

/// In-memory `FoodStore` for tests/dev.
#[derive(Debug, Default)]
pub struct InMemoryFoodStore {
    inner: RwLock<HashMap<(TenantId, FoodItemId), FoodItem>>,
}

impl InMemoryFoodStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl FoodStore for InMemoryFoodStore {
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

        let mut map = self.inner.write().map_err(|_| poisoned())?;
        map.insert((tenant_id, item.id), item.clone());
        Ok(item)
    }

    async fn list(&self, tenant_id: TenantId) -> Result<Vec<FoodItem>, StoreError> {
        let map = self.inner.read().map_err(|_| poisoned())?;
        let mut items: Vec<FoodItem> = map
            .iter()
            .filter_map(|((t, _), v)| (*t == tenant_id).then(|| v.clone()))
            .collect();
        // ISO-8601 strings sort chronologically.
        items.sort_by(|a, b| a.expiry_date.cmp(&b.expiry_date));
        Ok(items)
    }

    async fn get(
        &self,
        tenant_id: TenantId,
        id: FoodItemId,
    ) -> Result<Option<FoodItem>, StoreError> {
        let map = self.inner.read().map_err(|_| poisoned())?;
        Ok(map.get(&(tenant_id, id)).cloned())
    }

    async fn update(
        &self,
        tenant_id: TenantId,
        id: FoodItemId,
        update: FoodUpdate,
    ) -> Result<Option<FoodItem>, StoreError> {
        let mut map = self.inner.write().map_err(|_| poisoned())?;
        let Some(item) = map.get_mut(&(tenant_id, id)) else {
            return Ok(None);
        };

        if let Some(name) = update.name {
            item.name = name;
        }
        if let Some(quantity) = update.quantity {
            item.quantity = quantity;
        }
        if let Some(expiry) = update.expiry_date {
            item.expiry_date = expiry.format("%Y-%m-%d").to_string();
        }
        if let Some(status) = update.status {
            item.status = status;
        }
        item.updated_at = Utc::now();

        Ok(Some(item.clone()))
    }

    async fn delete(&self, tenant_id: TenantId, id: FoodItemId) -> Result<bool, StoreError> {
        let mut map = self.inner.write().map_err(|_| poisoned())?;
        Ok(map.remove(&(tenant_id, id)).is_some())
    }

    async fn tenants(&self) -> Result<Vec<TenantId>, StoreError> {
        let map = self.inner.read().map_err(|_| poisoned())?;
        let mut out: Vec<TenantId> = Vec::new();
        for (tenant_id, _) in map.keys() {
            if !out.contains(tenant_id) {
                out.push(*tenant_id);
            }
        }
        out.sort_by_key(|t| *t.as_uuid());
        Ok(out)
    }

    async fn set_status(
        &self,
        tenant_id: TenantId,
        id: FoodItemId,
        status: FoodStatus,
    ) -> Result<(), StoreError> {
        let mut map = self.inner.write().map_err(|_| poisoned())?;
        if let Some(item) = map.get_mut(&(tenant_id, id)) {
            item.status = status;
            item.updated_at = Utc::now();
        }
        Ok(())
    }
}

/// In-memory `AgentLogStore` for tests/dev.
#[derive(Debug, Default)]
pub struct InMemoryAgentLogStore {
    inner: RwLock<Vec<AgentLogEntry>>,
}

impl InMemoryAgentLogStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl AgentLogStore for InMemoryAgentLogStore {
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

        let mut entries = self.inner.write().map_err(|_| poisoned())?;
        entries.push(entry.clone());
        Ok(entry)
    }

    async fn list_recent(
        &self,
        tenant_id: TenantId,
        limit: i64,
    ) -> Result<Vec<AgentLogEntry>, StoreError> {
        let entries = self.inner.read().map_err(|_| poisoned())?;
        let mut out: Vec<AgentLogEntry> = entries
            .iter()
            .filter(|e| e.user_id == tenant_id)
            .cloned()
            .collect();
        // Appended in order; newest first means reversed insertion order.
        out.reverse();
        out.truncate(limit.max(0) as usize);
        Ok(out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn new_food(name: &str, expiry: NaiveDate) -> NewFood {
        NewFood::new(name, "1", expiry).unwrap()
    }

    #[tokio::test]
    async fn create_assigns_identity_and_timestamps() {
        let store = InMemoryFoodStore::new();
        let tenant = TenantId::new();

        let item = store
            .create(tenant, new_food("Milk", date(2024, 12, 25)), FoodStatus::Safe)
            .await
            .unwrap();

        assert_eq!(item.user_id, tenant);
        assert_eq!(item.expiry_date, "2024-12-25");
        assert_eq!(item.created_at, item.updated_at);

        let fetched = store.get(tenant, item.id).await.unwrap().unwrap();
        assert_eq!(fetched, item);
    }

    #[tokio::test]
    async fn list_is_tenant_scoped_and_ordered_by_expiry() {
        let store = InMemoryFoodStore::new();
        let tenant_a = TenantId::new();
        let tenant_b = TenantId::new();

        store
            .create(tenant_a, new_food("Later", date(2024, 12, 25)), FoodStatus::Safe)
            .await
            .unwrap();
        store
            .create(tenant_a, new_food("Sooner", date(2024, 6, 1)), FoodStatus::Safe)
            .await
            .unwrap();
        store
            .create(tenant_b, new_food("Other", date(2024, 1, 1)), FoodStatus::Safe)
            .await
            .unwrap();

        let items = store.list(tenant_a).await.unwrap();
        assert_eq!(items.len(), 2);
        assert_eq!(items[0].name, "Sooner");
        assert_eq!(items[1].name, "Later");
    }

    #[tokio::test]
    async fn update_and_delete_do_not_cross_tenants() {
        let store = InMemoryFoodStore::new();
        let owner = TenantId::new();
        let intruder = TenantId::new();

        let item = store
            .create(owner, new_food("Milk", date(2024, 12, 25)), FoodStatus::Safe)
            .await
            .unwrap();

        let update = FoodUpdate {
            name: Some("Cream".to_string()),
            ..Default::default()
        };
        assert!(store
            .update(intruder, item.id, update.clone())
            .await
            .unwrap()
            .is_none());
        assert!(!store.delete(intruder, item.id).await.unwrap());

        let updated = store.update(owner, item.id, update).await.unwrap().unwrap();
        assert_eq!(updated.name, "Cream");
        assert!(store.delete(owner, item.id).await.unwrap());
        assert!(store.get(owner, item.id).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn set_status_persists_the_transition() {
        let store = InMemoryFoodStore::new();
        let tenant = TenantId::new();

        let item = store
            .create(tenant, new_food("Milk", date(2024, 12, 25)), FoodStatus::Safe)
            .await
            .unwrap();
        store
            .set_status(tenant, item.id, FoodStatus::Expired)
            .await
            .unwrap();

        let fetched = store.get(tenant, item.id).await.unwrap().unwrap();
        assert_eq!(fetched.status, FoodStatus::Expired);
    }

    #[tokio::test]
    async fn tenants_returns_distinct_owners() {
        let store = InMemoryFoodStore::new();
        let tenant = TenantId::new();

        store
            .create(tenant, new_food("Milk", date(2024, 12, 25)), FoodStatus::Safe)
            .await
            .unwrap();
        store
            .create(tenant, new_food("Eggs", date(2024, 12, 26)), FoodStatus::Safe)
            .await
            .unwrap();

        assert_eq!(store.tenants().await.unwrap(), vec![tenant]);
    }

    #[tokio::test]
    async fn log_append_assigns_identity_and_lists_newest_first() {
        let store = InMemoryAgentLogStore::new();
        let tenant = TenantId::new();

        let first = store
            .append(tenant, AgentAction::WasteLogged, "first".to_string())
            .await
            .unwrap();
        let second = store
            .append(tenant, AgentAction::UrgentAlert, "second".to_string())
            .await
            .unwrap();
        assert_ne!(first.id, second.id);

        let recent = store.list_recent(tenant, 20).await.unwrap();
        assert_eq!(recent.len(), 2);
        assert_eq!(recent[0].reasoning, "second");
        assert_eq!(recent[1].reasoning, "first");

        let capped = store.list_recent(tenant, 1).await.unwrap();
        assert_eq!(capped.len(), 1);
        assert_eq!(capped[0].reasoning, "second");
    }

    #[tokio::test]
    async fn logs_are_tenant_scoped() {
        let store = InMemoryAgentLogStore::new();
        let tenant_a = TenantId::new();
        let tenant_b = TenantId::new();

        store
            .append(tenant_a, AgentAction::WasteLogged, "a".to_string())
            .await
            .unwrap();

        assert!(store.list_recent(tenant_b, 20).await.unwrap().is_empty());
    }
}
