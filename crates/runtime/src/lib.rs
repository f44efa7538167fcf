//! Waypoint runtime — the trip-planning agent and its model plumbing.
//!
//! This crate hosts the pieces between a user query and its answer:
//!
//! - **Model abstraction** ([`model`]): provider-agnostic conversation
//!   types and the [`Backend`] trait, with an Anthropic implementation
//!   in [`providers`].
//! - **Tools** ([`tools`]): the [`ToolHost`] boundary and
//!   [`TripToolHost`], which exposes business partner lookup and
//!   weather forecasts to the model.
//! - **Agent** ([`Agent`]): the bounded decision loop — ask the model,
//!   run any requested tools, ask again, stop at a plain-text answer.
//! - **Tasks** ([`TaskExecutor`]): wraps one agent run in the streaming
//!   status protocol (working → completed) and guarantees every task
//!   completes with a human-readable message, whatever went wrong.
//!
//! # Example
//!
//! ```ignore
//! use partners::PartnerDirectory;
//! use runtime::{Agent, AnthropicBackend, TaskExecutor, TaskRequest, TripToolHost};
//! use storage::EventStore;
//! use weather::WeatherClient;
//!
//! # async fn example() {
//! let backend = AnthropicBackend::builder("sk-ant-...", "claude-sonnet-4-20250514").build();
//! let tools = TripToolHost::new(PartnerDirectory::seeded(), WeatherClient::offline());
//! let store = EventStore::in_memory().unwrap();
//! let executor = TaskExecutor::new(Agent::new(backend, tools, store));
//!
//! let (tx, mut rx) = tokio::sync::mpsc::channel(8);
//! executor
//!     .execute(TaskRequest::new("What's the weather at Acme Corp?", "ctx-1"), tx)
//!     .await;
//! while let Some(update) = rx.recv().await {
//!     println!("[{:?}] {}", update.state, update.content);
//! }
//! # }
//! ```

mod agent;
mod error;
pub mod model;
mod providers;
mod task;
pub mod tools;

#[cfg(test)]
pub(crate) mod testing;

pub use agent::{Agent, MAX_CONTEXT_TURNS};
pub use error::{Error, Result};
pub use model::{Backend, Message, ModelError, ModelReply, Part, Role, ToolCall, ToolSpec};
pub use providers::{AnthropicBackend, AnthropicBackendBuilder};
pub use task::{TaskExecutor, TaskRequest, TaskState, TaskUpdate};
pub use tools::{PARTNER_LOOKUP_TOOL, ToolError, ToolHost, TripToolHost, WEATHER_FORECAST_TOOL};
