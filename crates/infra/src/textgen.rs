//! Text-generation clients.

use async_trait::async_trait;
use reqwest::Client;
use serde_json::{json, Value};

use freshtrack_agent::{TextGenError, TextGenerator};

const GEMINI_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";

/// Gemini `generateContent` client.
///
/// No retry and no internal timeout: a failed or slow call surfaces as a
/// `TextGenError` and the caller decides what to do with it (the meal
/// suggester falls back to its deterministic template). The reqwest client
/// default timeout applies.
pub struct GeminiGenerator {
    client: Client,
    base_url: String,
    model: String,
    api_key: String,
}

impl GeminiGenerator {
    pub fn new(api_key: impl Into<String>, model: impl Into<String>) -> Self {
        Self::with_base_url(GEMINI_BASE_URL, api_key, model)
    }

    /// Point the client at a different endpoint (test servers).
    pub fn with_base_url(
        base_url: impl Into<String>,
        api_key: impl Into<String>,
        model: impl Into<String>,
    ) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url.into(),
            model: model.into(),
            api_key: api_key.into(),
        }
    }
}

#[async_trait]
impl TextGenerator for GeminiGenerator {
    async fn generate(&self, prompt: &str) -> Result<String, TextGenError> {
        let url = format!(
            "{}/models/{}:generateContent?key={}",
            self.base_url.trim_end_matches('/'),
            self.model,
            self.api_key
        );
        let payload = json!({
            "contents": [
                {
                    "parts": [
                        {
                            "text": prompt
                        }
                    ]
                }
            ]
        });

        let response = self
            .client
            .post(&url)
            .json(&payload)
            .send()
            .await
            .map_err(|e| TextGenError::Transport(e.to_string()))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(TextGenError::Transport(format!(
                "gemini error {status}: {}",
                truncate(&body, 320)
            )));
        }

        let body: Value = response
            .json()
            .await
            .map_err(|e| TextGenError::MalformedResponse(e.to_string()))?;

        extract_candidate_text(&body)
            .ok_or_else(|| TextGenError::MalformedResponse("no candidate text".to_string()))
    }
}

/// Pull the first candidate's text parts out of a `generateContent` response.
fn extract_candidate_text(body: &Value) -> Option<String> {
    let text = body["candidates"]
        .as_array()
        .and_then(|candidates| candidates.first())
        .and_then(|candidate| candidate["content"]["parts"].as_array())
        .map(|parts| {
            parts
                .iter()
                .filter_map(|part| part["text"].as_str())
                .collect::<Vec<_>>()
                .join("\n")
        })?;

    let text = text.trim();
    if text.is_empty() {
        None
    } else {
        Some(text.to_string())
    }
}

fn truncate(s: &str, max: usize) -> String {
    if s.len() <= max {
        s.to_string()
    } else {
        let mut end = max;
        while !s.is_char_boundary(end) {
            end -= 1;
        }
        format!("{}…", &s[..end])
    }
}

/// Generator wired when no API key is configured. Always fails, so every
/// suggestion takes the deterministic fallback path.
#[derive(Debug, Default, Clone, Copy)]
pub struct UnavailableGenerator;

#[async_trait]
impl TextGenerator for UnavailableGenerator {
    async fn generate(&self, _prompt: &str) -> Result<String, TextGenError> {
        Err(TextGenError::Unavailable)
    }
}
