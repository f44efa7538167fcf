//! Scripted model backend for exercising the loop without a provider.

use std::collections::VecDeque;
use std::sync::Mutex;

use crate::model::{
    Backend, Message, ModelError, ModelRequest, ModelResponse, Part, ToolResult, Usage,
};

/// One step of a scripted conversation.
pub enum ScriptStep {
    /// Return this message verbatim.
    Reply(Message),
    /// Return a final answer built from every tool result seen so far,
    /// mimicking a model that narrates its tool output.
    SummarizeToolResults,
    /// Return a final answer stating how many messages were in the
    /// request. Used to assert context windowing.
    EchoMessageCount,
}

/// A backend that replays a fixed script.
pub struct ScriptedBackend {
    steps: Mutex<VecDeque<ScriptStep>>,
    repeat: Option<Message>,
}

impl ScriptedBackend {
    pub fn new(steps: Vec<ScriptStep>) -> Self {
        Self {
            steps: Mutex::new(steps.into()),
            repeat: None,
        }
    }

    /// A backend that returns the same message forever.
    pub fn repeating(message: Message) -> Self {
        Self {
            steps: Mutex::new(VecDeque::new()),
            repeat: Some(message),
        }
    }
}

fn tool_result_texts(messages: &[Message]) -> Vec<String> {
    messages
        .iter()
        .flat_map(|m| m.parts.iter())
        .filter_map(|part| match part {
            Part::ToolResult(ToolResult::Success { output, .. }) => Some(
                output
                    .as_str()
                    .map(str::to_string)
                    .unwrap_or_else(|| output.to_string()),
            ),
            Part::ToolResult(ToolResult::Failure { error, .. }) => Some(error.to_string()),
            _ => None,
        })
        .collect()
}

impl Backend for ScriptedBackend {
    async fn call(&self, request: ModelRequest<'_>) -> Result<ModelResponse, ModelError> {
        let step = {
            let mut steps = self.steps.lock().expect("script mutex poisoned");
            steps.pop_front()
        };

        let message = match step {
            Some(ScriptStep::Reply(message)) => message,
            Some(ScriptStep::SummarizeToolResults) => {
                let texts = tool_result_texts(request.messages);
                Message::assistant(format!(
                    "Here's what I found for your trip: {}",
                    texts.join(" ")
                ))
            }
            Some(ScriptStep::EchoMessageCount) => {
                Message::assistant(format!("{} messages", request.messages.len()))
            }
            None => match &self.repeat {
                Some(message) => message.clone(),
                None => return Err(ModelError::Api("script exhausted".to_string())),
            },
        };

        Ok(ModelResponse {
            message,
            usage: Usage::default(),
        })
    }
}
