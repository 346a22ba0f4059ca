//! Agent audit log: records and the storage port.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use core::str::FromStr;
use serde::{Deserialize, Serialize};

use freshtrack_core::{AgentLogId, DomainError, StoreError, TenantId};

/// Action recorded by the batch run.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AgentAction {
    /// Expired items were detected and logged as waste.
    WasteLogged,
    /// Items expiring within the warning window triggered an alert.
    UrgentAlert,
}

impl AgentAction {
    pub fn as_str(&self) -> &'static str {
        match self {
            AgentAction::WasteLogged => "waste_logged",
            AgentAction::UrgentAlert => "urgent_alert",
        }
    }
}

impl core::fmt::Display for AgentAction {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AgentAction {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "waste_logged" => Ok(AgentAction::WasteLogged),
            "urgent_alert" => Ok(AgentAction::UrgentAlert),
            other => Err(DomainError::validation(format!(
                "unknown agent action: {other}"
            ))),
        }
    }
}

/// One append-only audit row. Created exclusively by the batch run; never
/// updated or deleted, and never deduplicated across runs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AgentLogEntry {
    pub id: AgentLogId,
    pub user_id: TenantId,
    pub action: AgentAction,
    pub reasoning: String,
    pub created_at: DateTime<Utc>,
}

/// Tenant-scoped audit log storage.
#[async_trait]
pub trait AgentLogStore: Send + Sync {
    /// Append one entry. The store assigns identity and timestamp.
    async fn append(
        &self,
        tenant_id: TenantId,
        action: AgentAction,
        reasoning: String,
    ) -> Result<AgentLogEntry, StoreError>;

    /// The tenant's entries, newest first, capped at `limit`.
    async fn list_recent(
        &self,
        tenant_id: TenantId,
        limit: i64,
    ) -> Result<Vec<AgentLogEntry>, StoreError>;
}
