//! Infrastructure layer: datastore adapters and external service clients.

pub mod store;
pub mod textgen;

pub use store::{
    InMemoryAgentLogStore, InMemoryFoodStore, PostgresAgentLogStore, PostgresFoodStore,
};
pub use textgen::{GeminiGenerator, UnavailableGenerator};
