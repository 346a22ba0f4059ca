//! Storage adapters for the `FoodStore` and `AgentLogStore` ports.

pub mod memory;
pub mod postgres;

pub use memory::{InMemoryAgentLogStore, InMemoryFoodStore};
pub use postgres::{PostgresAgentLogStore, PostgresFoodStore};
