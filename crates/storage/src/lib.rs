//! SQLite-backed event storage for Waypoint tasks.
//!
//! Every task the agent executes leaves an audit trail here: the task
//! lifecycle, the user and assistant messages, and each tool invocation
//! with its result. The trail answers "why did it say that?" after the
//! fact; it is never read back into a running conversation — callers
//! resupply context explicitly on each request.
//!
//! # Core types
//!
//! - [`EventStore`] — wraps a SQLite database; append events, load a
//!   task's history, list task summaries.
//! - [`Event`] / [`EventKind`] — one thing that happened during a task.
//! - [`TaskId`] — UUID identifying one task; printable and parseable,
//!   which enables CLI commands like `waypoint logs --task abc123`.
//!
//! # Example
//!
//! ```no_run
//! use storage::{Event, EventKind, EventStore, Role, TaskId};
//!
//! let store = EventStore::open("events.db")?;
//!
//! let task_id = TaskId::new();
//! store.append(&Event::new(task_id, EventKind::TaskStart { context_id: "ctx-1".into() }))?;
//! store.append(&Event::message(task_id, Role::User, "What's the weather in Berlin?"))?;
//! store.append(&Event::new(task_id, EventKind::TaskEnd))?;
//!
//! for event in store.load_task(task_id)? {
//!     println!("{}: {:?}", event.timestamp, event.kind);
//! }
//! # Ok::<(), storage::Error>(())
//! ```

mod error;
mod event;
mod store;

pub use error::{Error, Result};
pub use event::{Event, EventKind, Role, TaskId};
pub use store::{EventStore, TaskSummary};
