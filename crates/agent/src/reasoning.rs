//! Human-readable reasoning strings for audit rows.
//!
//! These are templated, not AI-generated; the only model-produced text is the
//! meal suggestion embedded into the urgent alert.

/// Reasoning for a `waste_logged` row.
pub fn waste_logged(expired_count: usize) -> String {
    format!(
        "Detected {expired_count} expired item(s). Food waste has been logged. \
         Consider better planning to reduce future waste."
    )
}

/// Reasoning for an `urgent_alert` row, embedding the meal suggestion.
pub fn urgent_alert(expiring_count: usize, meal_suggestion: &str) -> String {
    format!("URGENT: {expiring_count} item(s) expiring within 2 days. {meal_suggestion}")
}
