//! Infrastructure wiring: storage adapters and the text generator.

use std::sync::Arc;

use anyhow::Context;

use freshtrack_agent::{AgentLogStore, AgentRunner, MealSuggester, TextGenerator};
use freshtrack_foods::FoodStore;
use freshtrack_infra::{
    GeminiGenerator, InMemoryAgentLogStore, InMemoryFoodStore, PostgresAgentLogStore,
    PostgresFoodStore, UnavailableGenerator,
};

const DEFAULT_GEMINI_MODEL: &str = "gemini-2.0-flash";

/// Everything the handlers need, behind ports so tests can substitute fakes.
#[derive(Clone)]
pub struct AppServices {
    pub foods: Arc<dyn FoodStore>,
    pub logs: Arc<dyn AgentLogStore>,
    pub suggester: MealSuggester,
}

impl AppServices {
    pub fn new(
        foods: Arc<dyn FoodStore>,
        logs: Arc<dyn AgentLogStore>,
        generator: Arc<dyn TextGenerator>,
    ) -> Self {
        Self {
            foods,
            logs,
            suggester: MealSuggester::new(generator),
        }
    }

    /// In-memory stores, no generation backend. Used by tests and dev runs
    /// without external services.
    pub fn in_memory() -> Self {
        Self::new(
            Arc::new(InMemoryFoodStore::new()),
            Arc::new(InMemoryAgentLogStore::new()),
            Arc::new(UnavailableGenerator),
        )
    }

    /// A batch runner over these services.
    pub fn runner(&self) -> AgentRunner {
        AgentRunner::new(self.foods.clone(), self.logs.clone(), self.suggester.clone())
    }
}

/// Build services from the environment.
///
/// `USE_PERSISTENT_STORES=true` selects Postgres (requires `DATABASE_URL`);
/// anything else selects in-memory stores. `GEMINI_API_KEY` selects the real
/// generator; when absent every suggestion takes the deterministic fallback.
pub async fn build_services() -> anyhow::Result<AppServices> {
    let generator: Arc<dyn TextGenerator> = match std::env::var("GEMINI_API_KEY") {
        Ok(key) if !key.trim().is_empty() => {
            let model = std::env::var("GEMINI_MODEL")
                .unwrap_or_else(|_| DEFAULT_GEMINI_MODEL.to_string());
            Arc::new(GeminiGenerator::new(key, model))
        }
        _ => {
            tracing::warn!(
                "GEMINI_API_KEY not set; meal suggestions use the deterministic fallback"
            );
            Arc::new(UnavailableGenerator)
        }
    };

    let use_persistent = std::env::var("USE_PERSISTENT_STORES")
        .map(|v| v == "true" || v == "1")
        .unwrap_or(false);

    if use_persistent {
        let url = std::env::var("DATABASE_URL")
            .context("DATABASE_URL must be set when USE_PERSISTENT_STORES=true")?;
        let pool = sqlx::postgres::PgPoolOptions::new()
            .max_connections(5)
            .connect(&url)
            .await
            .context("failed to connect to DATABASE_URL")?;

        tracing::info!("using postgres stores");
        Ok(AppServices::new(
            Arc::new(PostgresFoodStore::new(pool.clone())),
            Arc::new(PostgresAgentLogStore::new(pool)),
            generator,
        ))
    } else {
        tracing::info!("using in-memory stores");
        Ok(AppServices::new(
            Arc::new(InMemoryFoodStore::new()),
            Arc::new(InMemoryAgentLogStore::new()),
            generator,
        ))
    }
}
