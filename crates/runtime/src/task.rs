//! Task execution protocol: status updates around one agent run.

use tokio::sync::mpsc;

use storage::{Event, EventKind, TaskId};

use crate::agent::Agent;
use crate::model::{Backend, Message};
use crate::tools::ToolHost;
use crate::{Error, Result};

const PROCESSING_NOTICE: &str = "Processing your request...";
const NO_ANSWER_NOTICE: &str =
    "I processed your request but couldn't generate a response. Please try again.";

/// Lifecycle state attached to a task update.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TaskState {
    /// The agent is working; more updates follow.
    Working,
    /// The agent needs more input from the user. Part of the outbound
    /// contract but currently never produced.
    InputRequired,
    /// Terminal; the content is the answer (or a failure explanation).
    Completed,
}

/// One status notice streamed to the caller.
#[derive(Debug, Clone)]
pub struct TaskUpdate {
    pub state: TaskState,
    pub content: String,
    /// No further updates follow when set.
    pub is_final: bool,
}

impl TaskUpdate {
    pub fn working(content: impl Into<String>) -> Self {
        Self {
            state: TaskState::Working,
            content: content.into(),
            is_final: false,
        }
    }

    pub fn completed(content: impl Into<String>) -> Self {
        Self {
            state: TaskState::Completed,
            content: content.into(),
            is_final: true,
        }
    }

    pub fn input_required(content: impl Into<String>) -> Self {
        Self {
            state: TaskState::InputRequired,
            content: content.into(),
            is_final: true,
        }
    }
}

/// An inbound request: a query plus caller-resupplied context.
#[derive(Debug, Clone)]
pub struct TaskRequest {
    pub query: String,
    /// Opaque conversation identifier supplied by the caller.
    pub context_id: String,
    /// Prior turns; only the most recent few are used.
    pub context: Vec<Message>,
}

impl TaskRequest {
    pub fn new(query: impl Into<String>, context_id: impl Into<String>) -> Self {
        Self {
            query: query.into(),
            context_id: context_id.into(),
            context: Vec::new(),
        }
    }

    pub fn with_context(mut self, context: Vec<Message>) -> Self {
        self.context = context;
        self
    }
}

/// Drives one agent run per task and streams status updates.
///
/// Every task completes: an initial working notice, then exactly one
/// final completed update. Failures anywhere inside the run are caught
/// here and reported as the completed content, never as a crash.
pub struct TaskExecutor<B: Backend, H: ToolHost> {
    agent: Agent<B, H>,
}

impl<B: Backend, H: ToolHost> TaskExecutor<B, H> {
    pub fn new(agent: Agent<B, H>) -> Self {
        Self { agent }
    }

    pub fn agent(&self) -> &Agent<B, H> {
        &self.agent
    }

    /// Execute a task, streaming updates into `updates`.
    ///
    /// Returns the id assigned to the task. A dropped receiver stops
    /// the stream but not the bookkeeping.
    pub async fn execute(
        &self,
        request: TaskRequest,
        updates: mpsc::Sender<TaskUpdate>,
    ) -> TaskId {
        let task_id = TaskId::new();
        self.log(Event::new(
            task_id,
            EventKind::TaskStart {
                context_id: request.context_id.clone(),
            },
        ));

        let _ = updates.send(TaskUpdate::working(PROCESSING_NOTICE)).await;

        let content = match self
            .agent
            .run(task_id, &request.query, &request.context)
            .await
        {
            Ok(answer) if answer.trim().is_empty() => NO_ANSWER_NOTICE.to_string(),
            Ok(answer) => answer,
            Err(e) => {
                tracing::error!(%task_id, error = %e, "task failed");
                format!("I encountered an error: {e}. Please try again.")
            }
        };

        self.log(Event::new(task_id, EventKind::TaskEnd));
        let _ = updates.send(TaskUpdate::completed(content)).await;

        task_id
    }

    /// Cancellation is not supported; in-flight tasks always run to
    /// completion.
    pub fn cancel(&self, task_id: TaskId) -> Result<()> {
        tracing::warn!(%task_id, "cancel requested but not supported");
        Err(Error::Unsupported("cancel"))
    }

    fn log(&self, event: Event) {
        if let Err(e) = self.agent.store().append(&event) {
            tracing::warn!(error = %e, "failed to append task event");
        }
    }
}
