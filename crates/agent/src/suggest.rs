//! Meal suggestions from expiring items.

use std::sync::Arc;

use freshtrack_foods::FoodItem;

use crate::generate::TextGenerator;

/// At most this many items are listed in the model prompt.
const MAX_PROMPT_ITEMS: usize = 10;

/// At most this many item names appear in the fallback suggestion.
const MAX_FALLBACK_ITEMS: usize = 5;

/// Fixed reply for an empty bucket.
pub const NO_ITEMS_MESSAGE: &str = "No items available for meal suggestions.";

/// Produces a meal suggestion for a bucket of expiring items.
///
/// External failures never escape this type: any generator error degrades to
/// a deterministic template naming the first few items.
#[derive(Clone)]
pub struct MealSuggester {
    generator: Arc<dyn TextGenerator>,
}

impl MealSuggester {
    pub fn new(generator: Arc<dyn TextGenerator>) -> Self {
        Self { generator }
    }

    /// Suggest a meal using `items`. Infallible by contract.
    pub async fn suggest(&self, items: &[FoodItem]) -> String {
        if items.is_empty() {
            return NO_ITEMS_MESSAGE.to_string();
        }

        let prompt = render_prompt(items);

        match self.generator.generate(&prompt).await {
            Ok(text) => {
                let text = text.trim();
                if text.is_empty() {
                    tracing::warn!("text generator returned empty suggestion, using fallback");
                    fallback_suggestion(items)
                } else {
                    text.to_string()
                }
            }
            Err(e) => {
                tracing::warn!("meal suggestion generation failed, using fallback: {e}");
                fallback_suggestion(items)
            }
        }
    }
}

fn render_prompt(items: &[FoodItem]) -> String {
    let items_text = items
        .iter()
        .take(MAX_PROMPT_ITEMS)
        .map(|item| format!("- {} ({}) - Expires: {}", item.name, item.quantity, item.expiry_date))
        .collect::<Vec<_>>()
        .join("\n");

    format!(
        "You are a helpful meal planning assistant. Suggest a simple meal idea \
         using these ingredients that are expiring soon:\n\n{items_text}\n\n\
         Provide a brief, simple meal suggestion (1-2 sentences) that uses these \
         items to prevent waste. Keep it practical and easy to prepare."
    )
}

fn fallback_suggestion(items: &[FoodItem]) -> String {
    let names = items
        .iter()
        .take(MAX_FALLBACK_ITEMS)
        .map(|item| item.name.as_str())
        .collect::<Vec<_>>()
        .join(", ");

    format!("Quick meal idea: Use {names} to prepare a simple dish before they expire.")
}
