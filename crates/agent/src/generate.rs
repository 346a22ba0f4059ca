//! Text-generation port.

use async_trait::async_trait;
use thiserror::Error;

/// Failure modes of an external text-generation service.
///
/// Callers inside this crate absorb these; they never cross the batch-run
/// boundary.
#[derive(Debug, Error)]
pub enum TextGenError {
    /// The request never produced a usable HTTP response.
    #[error("transport error: {0}")]
    Transport(String),

    /// The service answered, but not in a shape we can extract text from.
    #[error("malformed response: {0}")]
    MalformedResponse(String),

    /// No generation backend is configured.
    #[error("text generation unavailable")]
    Unavailable,
}

/// A service that turns a prompt into text. May fail; no retry or
/// rate-limit handling at this layer.
#[async_trait]
pub trait TextGenerator: Send + Sync {
    async fn generate(&self, prompt: &str) -> Result<String, TextGenError>;
}
