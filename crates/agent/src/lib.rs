//! `freshtrack-agent`
//!
//! **Responsibility:** the expiry-classification batch subsystem.
//!
//! This crate owns the batch run over all tenants: re-classifying items,
//! persisting state transitions, and appending the audit log. Text generation
//! is reached only through the [`TextGenerator`] port; storage only through
//! the ports in this crate and `freshtrack-foods`. No HTTP, no SQL, no
//! concrete clients here.

pub mod generate;
pub mod log;
pub mod reasoning;
pub mod runner;
pub mod suggest;

pub use generate::{TextGenError, TextGenerator};
pub use log::{AgentAction, AgentLogEntry, AgentLogStore};
pub use runner::{AgentRunError, AgentRunner, RunSummary};
pub use suggest::MealSuggester;
