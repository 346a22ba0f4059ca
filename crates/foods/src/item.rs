//! Food item records and expiry-value parsing.

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};

use freshtrack_core::{DomainError, DomainResult, FoodItemId, TenantId};

use crate::status::FoodStatus;

const NAME_MAX_LEN: usize = 200;
const QUANTITY_MAX_LEN: usize = 100;

/// A stored food item.
///
/// `expiry_date` keeps the *stored representation*: the datastore may hold a
/// calendar date (`2024-12-25`) or a full timestamp. Consumers parse it with
/// [`parse_expiry_date`] rather than trusting it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FoodItem {
    pub id: FoodItemId,
    pub user_id: TenantId,
    pub name: String,
    pub quantity: String,
    pub expiry_date: String,
    pub status: FoodStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Validated payload for creating a food item.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewFood {
    name: String,
    quantity: String,
    expiry_date: NaiveDate,
}

impl NewFood {
    pub fn new(
        name: impl Into<String>,
        quantity: impl Into<String>,
        expiry_date: NaiveDate,
    ) -> DomainResult<Self> {
        let name = name.into();
        let quantity = quantity.into();

        validate_name(&name)?;
        validate_quantity(&quantity)?;

        Ok(Self {
            name,
            quantity,
            expiry_date,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn quantity(&self) -> &str {
        &self.quantity
    }

    pub fn expiry_date(&self) -> NaiveDate {
        self.expiry_date
    }

    /// Freshness state of this item as of `today`.
    pub fn status(&self, today: NaiveDate) -> FoodStatus {
        FoodStatus::classify(self.expiry_date, today)
    }
}

pub(crate) fn validate_name(name: &str) -> DomainResult<()> {
    if name.trim().is_empty() {
        return Err(DomainError::validation("name cannot be empty"));
    }
    if name.len() > NAME_MAX_LEN {
        return Err(DomainError::validation(format!(
            "name cannot exceed {NAME_MAX_LEN} characters"
        )));
    }
    Ok(())
}

pub(crate) fn validate_quantity(quantity: &str) -> DomainResult<()> {
    if quantity.trim().is_empty() {
        return Err(DomainError::validation("quantity cannot be empty"));
    }
    if quantity.len() > QUANTITY_MAX_LEN {
        return Err(DomainError::validation(format!(
            "quantity cannot exceed {QUANTITY_MAX_LEN} characters"
        )));
    }
    Ok(())
}

/// Parse a stored expiry value into a calendar date.
///
/// Accepts a plain calendar date (`YYYY-MM-DD`) or a full timestamp (RFC 3339,
/// with or without an offset); timestamps are truncated to their date portion.
/// Anything else is a validation error — the caller decides whether that
/// aborts a whole run.
pub fn parse_expiry_date(value: &str) -> DomainResult<NaiveDate> {
    if value.contains('T') {
        if let Ok(dt) = DateTime::parse_from_rfc3339(value) {
            return Ok(dt.date_naive());
        }
        if let Ok(dt) = NaiveDateTime::parse_from_str(value, "%Y-%m-%dT%H:%M:%S%.f") {
            return Ok(dt.date());
        }
        return Err(DomainError::validation(format!(
            "unparsable expiry timestamp: {value}"
        )));
    }

    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .map_err(|e| DomainError::validation(format!("unparsable expiry date {value}: {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn parses_calendar_dates() {
        assert_eq!(parse_expiry_date("2024-12-25").unwrap(), date(2024, 12, 25));
    }

    #[test]
    fn truncates_utc_timestamps_to_date() {
        assert_eq!(
            parse_expiry_date("2024-12-25T18:30:00Z").unwrap(),
            date(2024, 12, 25)
        );
    }

    #[test]
    fn truncates_offset_timestamps_to_date() {
        // The date portion is taken as written, not shifted to UTC.
        assert_eq!(
            parse_expiry_date("2024-12-25T01:00:00+05:00").unwrap(),
            date(2024, 12, 25)
        );
    }

    #[test]
    fn truncates_naive_timestamps_to_date() {
        assert_eq!(
            parse_expiry_date("2024-12-25T18:30:00").unwrap(),
            date(2024, 12, 25)
        );
    }

    #[test]
    fn rejects_garbage() {
        assert!(parse_expiry_date("next tuesday").is_err());
        assert!(parse_expiry_date("2024-13-40").is_err());
        assert!(parse_expiry_date("2024-12-25Tnoon").is_err());
    }

    #[test]
    fn new_food_rejects_blank_name() {
        let err = NewFood::new("  ", "1 liter", date(2024, 12, 25)).unwrap_err();
        assert!(matches!(err, DomainError::Validation(_)));
    }

    #[test]
    fn new_food_rejects_oversized_fields() {
        let long = "x".repeat(201);
        assert!(NewFood::new(long, "1", date(2024, 12, 25)).is_err());

        let long = "x".repeat(101);
        assert!(NewFood::new("Milk", long, date(2024, 12, 25)).is_err());
    }

    #[test]
    fn new_food_derives_status_from_today() {
        let food = NewFood::new("Milk", "1 liter", date(2024, 6, 16)).unwrap();
        assert_eq!(food.status(date(2024, 6, 15)), FoodStatus::Expiring);
        assert_eq!(food.status(date(2024, 6, 10)), FoodStatus::Safe);
        assert_eq!(food.status(date(2024, 6, 20)), FoodStatus::Expired);
    }
}
