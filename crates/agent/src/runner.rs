//! The batch processor: one run across all tenants.

use std::sync::Arc;

use chrono::NaiveDate;
use serde::Serialize;
use thiserror::Error;

use freshtrack_core::{DomainError, StoreError, TenantId};
use freshtrack_foods::{parse_expiry_date, FoodItem, FoodStatus, FoodStore};

use crate::log::{AgentAction, AgentLogStore};
use crate::reasoning;
use crate::suggest::MealSuggester;

/// Totals for one batch run, summed across all tenants.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct RunSummary {
    pub items_processed: u64,
    pub logs_created: u64,
}

/// A batch run failed. The first error aborts the run; writes already applied
/// stay committed (at-least-once, non-atomic semantics).
#[derive(Debug, Error)]
pub enum AgentRunError {
    #[error(transparent)]
    Store(#[from] StoreError),

    /// A stored value could not be interpreted (e.g. an unparsable expiry).
    #[error(transparent)]
    Domain(#[from] DomainError),
}

/// Re-classifies every tenant's items, persists state transitions, and
/// appends one audit row per triggered action per tenant.
///
/// Dependencies are explicit so tests can substitute fakes. Tenants are
/// processed sequentially; overlapping runs are not mutually excluded and may
/// duplicate log rows (accepted race).
pub struct AgentRunner {
    foods: Arc<dyn FoodStore>,
    logs: Arc<dyn AgentLogStore>,
    suggester: MealSuggester,
}

impl AgentRunner {
    pub fn new(
        foods: Arc<dyn FoodStore>,
        logs: Arc<dyn AgentLogStore>,
        suggester: MealSuggester,
    ) -> Self {
        Self {
            foods,
            logs,
            suggester,
        }
    }

    /// Execute one run against `today`.
    ///
    /// Fail-fast: the first datastore or parse error is returned as-is and
    /// stops processing; there is no rollback of earlier writes.
    pub async fn run(&self, today: NaiveDate) -> Result<RunSummary, AgentRunError> {
        let tenants = self.foods.tenants().await?;
        let mut summary = RunSummary::default();

        for tenant_id in tenants {
            self.run_tenant(tenant_id, today, &mut summary).await?;
        }

        tracing::info!(
            items_processed = summary.items_processed,
            logs_created = summary.logs_created,
            "agent run completed"
        );
        Ok(summary)
    }

    async fn run_tenant(
        &self,
        tenant_id: TenantId,
        today: NaiveDate,
        summary: &mut RunSummary,
    ) -> Result<(), AgentRunError> {
        let items = self.foods.list(tenant_id).await?;
        if items.is_empty() {
            return Ok(());
        }

        let mut expired: Vec<FoodItem> = Vec::new();
        let mut expiring: Vec<FoodItem> = Vec::new();

        for item in &items {
            let expiry = parse_expiry_date(&item.expiry_date)?;
            let status = FoodStatus::classify(expiry, today);

            // Persist the transition immediately, independent of logging.
            if status != item.status {
                self.foods.set_status(tenant_id, item.id, status).await?;
            }

            match status {
                FoodStatus::Expired => expired.push(item.clone()),
                FoodStatus::Expiring => expiring.push(item.clone()),
                FoodStatus::Safe => {}
            }
        }

        if !expired.is_empty() {
            let reasoning = reasoning::waste_logged(expired.len());
            self.logs
                .append(tenant_id, AgentAction::WasteLogged, reasoning)
                .await?;
            summary.logs_created += 1;
        }

        if !expiring.is_empty() {
            let suggestion = self.suggester.suggest(&expiring).await;
            let reasoning = reasoning::urgent_alert(expiring.len(), &suggestion);
            self.logs
                .append(tenant_id, AgentAction::UrgentAlert, reasoning)
                .await?;
            summary.logs_created += 1;
        }

        summary.items_processed += items.len() as u64;

        tracing::debug!(
            tenant_id = %tenant_id,
            items = items.len(),
            expired = expired.len(),
            expiring = expiring.len(),
            "processed tenant"
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use chrono::{Duration, Utc};
    use std::sync::Mutex;

    use freshtrack_core::{AgentLogId, FoodItemId};
    use freshtrack_foods::{FoodUpdate, NewFood};

    use crate::generate::{TextGenError, TextGenerator};
    use crate::log::AgentLogEntry;

    struct FakeFoods {
        items: Mutex<Vec<FoodItem>>,
        extra_tenants: Vec<TenantId>,
        status_writes: Mutex<Vec<(FoodItemId, FoodStatus)>>,
    }

    impl FakeFoods {
        fn new(items: Vec<FoodItem>) -> Self {
            Self {
                items: Mutex::new(items),
                extra_tenants: Vec::new(),
                status_writes: Mutex::new(Vec::new()),
            }
        }

        fn with_extra_tenant(mut self, tenant_id: TenantId) -> Self {
            self.extra_tenants.push(tenant_id);
            self
        }

        fn status_write_count(&self) -> usize {
            self.status_writes.lock().unwrap().len()
        }

        fn status_of(&self, id: FoodItemId) -> FoodStatus {
            self.items
                .lock()
                .unwrap()
                .iter()
                .find(|i| i.id == id)
                .unwrap()
                .status
        }
    }

    #[async_trait]
    impl FoodStore for FakeFoods {
        async fn create(
            &self,
            _tenant_id: TenantId,
            _food: NewFood,
            _status: FoodStatus,
        ) -> Result<FoodItem, StoreError> {
            unimplemented!("not used by the runner")
        }

        async fn list(&self, tenant_id: TenantId) -> Result<Vec<FoodItem>, StoreError> {
            Ok(self
                .items
                .lock()
                .unwrap()
                .iter()
                .filter(|i| i.user_id == tenant_id)
                .cloned()
                .collect())
        }

        async fn get(
            &self,
            _tenant_id: TenantId,
            _id: FoodItemId,
        ) -> Result<Option<FoodItem>, StoreError> {
            unimplemented!("not used by the runner")
        }

        async fn update(
            &self,
            _tenant_id: TenantId,
            _id: FoodItemId,
            _update: FoodUpdate,
        ) -> Result<Option<FoodItem>, StoreError> {
            unimplemented!("not used by the runner")
        }

        async fn delete(&self, _tenant_id: TenantId, _id: FoodItemId) -> Result<bool, StoreError> {
            unimplemented!("not used by the runner")
        }

        async fn tenants(&self) -> Result<Vec<TenantId>, StoreError> {
            let mut out: Vec<TenantId> = Vec::new();
            for item in self.items.lock().unwrap().iter() {
                if !out.contains(&item.user_id) {
                    out.push(item.user_id);
                }
            }
            for t in &self.extra_tenants {
                if !out.contains(t) {
                    out.push(*t);
                }
            }
            Ok(out)
        }

        async fn set_status(
            &self,
            tenant_id: TenantId,
            id: FoodItemId,
            status: FoodStatus,
        ) -> Result<(), StoreError> {
            let mut items = self.items.lock().unwrap();
            if let Some(item) = items
                .iter_mut()
                .find(|i| i.user_id == tenant_id && i.id == id)
            {
                item.status = status;
            }
            self.status_writes.lock().unwrap().push((id, status));
            Ok(())
        }
    }

    #[derive(Default)]
    struct FakeLogs {
        entries: Mutex<Vec<AgentLogEntry>>,
    }

    impl FakeLogs {
        fn all(&self) -> Vec<AgentLogEntry> {
            self.entries.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl AgentLogStore for FakeLogs {
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
            self.entries.lock().unwrap().push(entry.clone());
            Ok(entry)
        }

        async fn list_recent(
            &self,
            tenant_id: TenantId,
            limit: i64,
        ) -> Result<Vec<AgentLogEntry>, StoreError> {
            let mut out: Vec<AgentLogEntry> = self
                .entries
                .lock()
                .unwrap()
                .iter()
                .filter(|e| e.user_id == tenant_id)
                .cloned()
                .collect();
            out.reverse();
            out.truncate(limit as usize);
            Ok(out)
        }
    }

    struct FailingGenerator;

    #[async_trait]
    impl TextGenerator for FailingGenerator {
        async fn generate(&self, _prompt: &str) -> Result<String, TextGenError> {
            Err(TextGenError::Unavailable)
        }
    }

    fn runner(foods: Arc<FakeFoods>, logs: Arc<FakeLogs>) -> AgentRunner {
        AgentRunner::new(
            foods,
            logs,
            MealSuggester::new(Arc::new(FailingGenerator)),
        )
    }

    fn item(tenant_id: TenantId, name: &str, expiry: &str, status: FoodStatus) -> FoodItem {
        let now = Utc::now();
        FoodItem {
            id: FoodItemId::new(),
            user_id: tenant_id,
            name: name.to_string(),
            quantity: "1".to_string(),
            expiry_date: expiry.to_string(),
            status,
            created_at: now,
            updated_at: now,
        }
    }

    fn today() -> NaiveDate {
        Utc::now().date_naive()
    }

    fn days_from_today(days: i64) -> String {
        (today() + Duration::days(days)).format("%Y-%m-%d").to_string()
    }

    #[tokio::test]
    async fn two_tenant_scenario_counts_and_logs() {
        let tenant_a = TenantId::new();
        let tenant_b = TenantId::new();
        let foods = Arc::new(
            FakeFoods::new(vec![
                item(tenant_a, "Milk", &days_from_today(-1), FoodStatus::Safe),
                item(tenant_a, "Eggs", &days_from_today(1), FoodStatus::Safe),
            ])
            .with_extra_tenant(tenant_b),
        );
        let logs = Arc::new(FakeLogs::default());

        let summary = runner(foods.clone(), logs.clone()).run(today()).await.unwrap();

        assert_eq!(summary.items_processed, 2);
        assert_eq!(summary.logs_created, 2);

        let entries = logs.all();
        assert_eq!(entries.len(), 2);
        assert!(entries.iter().all(|e| e.user_id == tenant_a));
        assert!(entries.iter().any(|e| e.action == AgentAction::WasteLogged));
        assert!(entries.iter().any(|e| e.action == AgentAction::UrgentAlert));

        let urgent = entries
            .iter()
            .find(|e| e.action == AgentAction::UrgentAlert)
            .unwrap();
        assert!(urgent.reasoning.starts_with("URGENT: 1 item(s)"));
        assert!(urgent.reasoning.contains("Eggs"));
    }

    #[tokio::test]
    async fn safe_only_tenant_counts_items_but_logs_nothing() {
        let tenant = TenantId::new();
        let foods = Arc::new(FakeFoods::new(vec![
            item(tenant, "Rice", &days_from_today(10), FoodStatus::Safe),
            item(tenant, "Beans", &days_from_today(30), FoodStatus::Safe),
        ]));
        let logs = Arc::new(FakeLogs::default());

        let summary = runner(foods, logs.clone()).run(today()).await.unwrap();

        assert_eq!(summary.items_processed, 2);
        assert_eq!(summary.logs_created, 0);
        assert!(logs.all().is_empty());
    }

    #[tokio::test]
    async fn state_transitions_are_persisted_immediately() {
        let tenant = TenantId::new();
        let stale = item(tenant, "Milk", &days_from_today(-1), FoodStatus::Safe);
        let stale_id = stale.id;
        let current = item(tenant, "Eggs", &days_from_today(1), FoodStatus::Expiring);
        let foods = Arc::new(FakeFoods::new(vec![stale, current]));
        let logs = Arc::new(FakeLogs::default());

        runner(foods.clone(), logs).run(today()).await.unwrap();

        // Only the stale item needed a write.
        assert_eq!(foods.status_write_count(), 1);
        assert_eq!(foods.status_of(stale_id), FoodStatus::Expired);
    }

    #[tokio::test]
    async fn second_run_writes_no_statuses_but_duplicates_logs() {
        let tenant = TenantId::new();
        let foods = Arc::new(FakeFoods::new(vec![
            item(tenant, "Milk", &days_from_today(-1), FoodStatus::Safe),
            item(tenant, "Eggs", &days_from_today(1), FoodStatus::Safe),
        ]));
        let logs = Arc::new(FakeLogs::default());
        let runner = runner(foods.clone(), logs.clone());

        let first = runner.run(today()).await.unwrap();
        let writes_after_first = foods.status_write_count();
        let second = runner.run(today()).await.unwrap();

        assert_eq!(first, second);
        // Statuses already match on the second pass; no redundant writes.
        assert_eq!(foods.status_write_count(), writes_after_first);
        // Logging is not idempotent: rows accumulate per run.
        assert_eq!(logs.all().len(), 4);
    }

    #[tokio::test]
    async fn malformed_expiry_fails_the_run_but_keeps_prior_writes() {
        let tenant = TenantId::new();
        let foods = Arc::new(FakeFoods::new(vec![
            item(tenant, "Milk", &days_from_today(-1), FoodStatus::Safe),
            item(tenant, "Mystery", "not-a-date", FoodStatus::Safe),
        ]));
        let logs = Arc::new(FakeLogs::default());

        let err = runner(foods.clone(), logs.clone())
            .run(today())
            .await
            .unwrap_err();

        assert!(matches!(err, AgentRunError::Domain(_)));
        // The status update applied before the failure stays committed.
        assert_eq!(foods.status_write_count(), 1);
        // The tenant never reached its logging step.
        assert!(logs.all().is_empty());
    }

    #[tokio::test]
    async fn timestamp_expiry_values_are_truncated_to_dates() {
        let tenant = TenantId::new();
        let expiry_ts = format!("{}T08:30:00Z", days_from_today(1));
        let foods = Arc::new(FakeFoods::new(vec![item(
            tenant,
            "Yogurt",
            &expiry_ts,
            FoodStatus::Expiring,
        )]));
        let logs = Arc::new(FakeLogs::default());

        let summary = runner(foods, logs.clone()).run(today()).await.unwrap();

        assert_eq!(summary.items_processed, 1);
        assert_eq!(summary.logs_created, 1);
        assert_eq!(logs.all()[0].action, AgentAction::UrgentAlert);
    }
}
