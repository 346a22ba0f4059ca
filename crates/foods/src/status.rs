//! Freshness classification.

use core::str::FromStr;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use freshtrack_core::DomainError;

/// Items expiring within this many days (inclusive) are `Expiring`.
pub const EXPIRING_WINDOW_DAYS: i64 = 2;

/// Freshness state of a food item relative to a reference date.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FoodStatus {
    Safe,
    Expiring,
    Expired,
}

impl FoodStatus {
    /// Classify an expiry date against `today`.
    ///
    /// Pure and total: every (expiry, today) pair maps to exactly one state.
    /// Exactly [`EXPIRING_WINDOW_DAYS`] days remaining still counts as
    /// `Expiring`, not `Safe`.
    pub fn classify(expiry_date: NaiveDate, today: NaiveDate) -> Self {
        let days_remaining = (expiry_date - today).num_days();

        if days_remaining < 0 {
            FoodStatus::Expired
        } else if days_remaining <= EXPIRING_WINDOW_DAYS {
            FoodStatus::Expiring
        } else {
            FoodStatus::Safe
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            FoodStatus::Safe => "safe",
            FoodStatus::Expiring => "expiring",
            FoodStatus::Expired => "expired",
        }
    }
}

impl core::fmt::Display for FoodStatus {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for FoodStatus {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "safe" => Ok(FoodStatus::Safe),
            "expiring" => Ok(FoodStatus::Expiring),
            "expired" => Ok(FoodStatus::Expired),
            other => Err(DomainError::validation(format!(
                "unknown food status: {other}"
            ))),
        }
    }
}
