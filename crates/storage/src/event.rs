//! Event types for the task event log.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A unique identifier for a task.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TaskId(pub Uuid);

impl TaskId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for TaskId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for TaskId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// The role of a message in the conversation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
    System,
}

/// The kind of event that occurred.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum EventKind {
    /// A task started for a user query.
    TaskStart { context_id: String },
    /// A task finished. Tasks always finish; failures are reported in
    /// the final message, not as a separate terminal state.
    TaskEnd,
    /// A message was added to the conversation.
    Message { role: Role, content: String },
    /// A tool was invoked by the model.
    ToolCall {
        name: String,
        input: serde_json::Value,
    },
    /// A tool returned a result.
    ToolResult {
        name: String,
        output: serde_json::Value,
    },
}

/// An event in the task log.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Event {
    pub id: Uuid,
    pub task_id: TaskId,
    pub timestamp: DateTime<Utc>,
    pub kind: EventKind,
}

impl Event {
    pub fn new(task_id: TaskId, kind: EventKind) -> Self {
        Self {
            id: Uuid::new_v4(),
            task_id,
            timestamp: Utc::now(),
            kind,
        }
    }

    pub fn message(task_id: TaskId, role: Role, content: impl Into<String>) -> Self {
        Self::new(
            task_id,
            EventKind::Message {
                role,
                content: content.into(),
            },
        )
    }

    pub fn tool_call(task_id: TaskId, name: impl Into<String>, input: serde_json::Value) -> Self {
        Self::new(
            task_id,
            EventKind::ToolCall {
                name: name.into(),
                input,
            },
        )
    }

    pub fn tool_result(
        task_id: TaskId,
        name: impl Into<String>,
        output: serde_json::Value,
    ) -> Self {
        Self::new(
            task_id,
            EventKind::ToolResult {
                name: name.into(),
                output,
            },
        )
    }
}
