//! The trip-planning agent: one bounded model/tool loop per request.

use storage::{Event, EventStore, TaskId};

use crate::model::{Backend, Message, ModelReply, ModelRequest, ToolResult};
use crate::tools::ToolHost;
use crate::{Error, Result};

/// How many prior conversation turns are resupplied to the model.
pub const MAX_CONTEXT_TURNS: usize = 5;

/// Hard cap on model→tool→model rounds within one request. The model
/// normally needs at most two (partner lookup, then weather); a request
/// that hits the cap fails rather than looping forever.
const MAX_TOOL_ROUNDS: usize = 8;

const SYSTEM_PROMPT: &str = "\
You are a helpful AI assistant that helps users plan business trips by combining \
business partner information with weather forecasts.

Your capabilities:
1. Look up business partners by name and find their locations
2. Retrieve weather forecasts for any location
3. Combine partner data with weather information to provide integrated trip planning insights

When a user asks about weather for a partner visit:
1. First look up the business partner to find their location
2. Then get the weather forecast for that location
3. Provide a comprehensive response that includes both partner and weather information

Be conversational, friendly, and provide actionable travel advice based on weather \
conditions. For example, if there's a high chance of rain, suggest packing an umbrella.

Remember: You have access to tools for business partner lookup and weather forecasts. \
Use them to provide accurate, helpful information.";

/// The decision loop: ask the model, dispatch any requested tools,
/// repeat until the model answers in plain text.
///
/// Each [`run`](Agent::run) owns its conversation exclusively; nothing
/// is shared across requests and nothing is read back from storage.
pub struct Agent<B: Backend, H: ToolHost> {
    backend: B,
    tools: H,
    store: EventStore,
    system: String,
}

impl<B: Backend, H: ToolHost> Agent<B, H> {
    pub fn new(backend: B, tools: H, store: EventStore) -> Self {
        Self {
            backend,
            tools,
            store,
            system: SYSTEM_PROMPT.to_string(),
        }
    }

    /// Replace the default system prompt.
    pub fn with_system(mut self, system: impl Into<String>) -> Self {
        self.system = system.into();
        self
    }

    pub fn store(&self) -> &EventStore {
        &self.store
    }

    /// Answer a user query, given the caller-supplied prior turns.
    ///
    /// Only the most recent [`MAX_CONTEXT_TURNS`] context turns are kept.
    /// Returns the model's final text; the text may be empty if the
    /// model produced no text parts.
    pub async fn run(&self, task_id: TaskId, query: &str, context: &[Message]) -> Result<String> {
        tracing::info!(%task_id, query, "processing query");

        let mut messages = Vec::with_capacity(context.len() + 2);
        messages.push(Message::system(&self.system));
        let tail = context.len().saturating_sub(MAX_CONTEXT_TURNS);
        messages.extend_from_slice(&context[tail..]);
        messages.push(Message::user(query));

        self.store
            .append(&Event::message(task_id, storage::Role::User, query))?;

        for round in 0..MAX_TOOL_ROUNDS {
            let response = self
                .backend
                .call(ModelRequest {
                    messages: &messages,
                    tools: self.tools.specs(),
                })
                .await?;

            tracing::debug!(
                round,
                input_tokens = response.usage.input_tokens,
                output_tokens = response.usage.output_tokens,
                "model responded"
            );

            match ModelReply::classify(&response.message) {
                ModelReply::Final(text) => {
                    self.store.append(&Event::message(
                        task_id,
                        storage::Role::Assistant,
                        &text,
                    ))?;
                    return Ok(text);
                }
                ModelReply::ToolRequests(calls) => {
                    messages.push(response.message);

                    let mut results = Vec::with_capacity(calls.len());
                    for call in calls {
                        tracing::info!(tool = %call.name, "dispatching tool call");
                        self.store
                            .append(&Event::tool_call(task_id, &call.name, call.input.clone()))?;

                        let result = match self.tools.execute(&call).await {
                            Ok(output) => {
                                self.store.append(&Event::tool_result(
                                    task_id,
                                    &call.name,
                                    output.clone(),
                                ))?;
                                ToolResult::Success {
                                    tool_call_id: call.id,
                                    output,
                                }
                            }
                            Err(error) => {
                                tracing::warn!(tool = %call.name, %error, "tool call failed");
                                self.store.append(&Event::tool_result(
                                    task_id,
                                    &call.name,
                                    serde_json::json!({"error": error.to_string()}),
                                ))?;
                                ToolResult::Failure {
                                    tool_call_id: call.id,
                                    error,
                                }
                            }
                        };
                        results.push(result);
                    }

                    messages.push(Message::tool_results(results));
                }
            }
        }

        Err(Error::ToolLoopExceeded(MAX_TOOL_ROUNDS))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::ToolCall;
    use crate::testing::{ScriptStep, ScriptedBackend};
    use crate::tools::TripToolHost;
    use partners::PartnerDirectory;
    use serde_json::json;
    use weather::WeatherClient;

    fn agent(backend: ScriptedBackend) -> Agent<ScriptedBackend, TripToolHost> {
        let tools = TripToolHost::new(PartnerDirectory::seeded(), WeatherClient::offline());
        Agent::new(backend, tools, EventStore::in_memory().unwrap())
    }

    fn tool_call_message(id: &str, name: &str, input: serde_json::Value) -> Message {
        Message {
            role: crate::model::Role::Assistant,
            parts: vec![crate::model::Part::ToolCall(ToolCall {
                id: id.into(),
                name: name.into(),
                input,
            })],
        }
    }

    #[tokio::test]
    async fn direct_answer_without_tools() {
        let backend = ScriptedBackend::new(vec![ScriptStep::Reply(Message::assistant(
            "Hello! How can I help with your trip?",
        ))]);
        let agent = agent(backend);
        let answer = agent.run(TaskId::new(), "hi", &[]).await.unwrap();
        assert_eq!(answer, "Hello! How can I help with your trip?");
    }

    #[tokio::test]
    async fn partner_then_weather_flow() {
        // The scripted model looks up Acme Corp, then asks for weather at
        // its location, then summarizes whatever the tools reported.
        let backend = ScriptedBackend::new(vec![
            ScriptStep::Reply(tool_call_message(
                "c1",
                "business_partner_lookup",
                json!({"partner_name": "Acme Corp"}),
            )),
            ScriptStep::Reply(tool_call_message(
                "c2",
                "weather_forecast",
                json!({"location": "New York, USA"}),
            )),
            ScriptStep::SummarizeToolResults,
        ]);
        let agent = agent(backend);
        let answer = agent
            .run(
                TaskId::new(),
                "What's the weather for my visit to Acme Corp next week?",
                &[],
            )
            .await
            .unwrap();

        assert!(answer.contains("Acme Corp"));
        assert!(answer.contains("New York"));
        assert!(
            ["weather", "temperature", "°c", "°f", "conditions"]
                .iter()
                .any(|w| answer.to_lowercase().contains(w))
        );
        assert!(answer.len() > 50);
    }

    #[tokio::test]
    async fn tool_events_are_logged() {
        let backend = ScriptedBackend::new(vec![
            ScriptStep::Reply(tool_call_message(
                "c1",
                "business_partner_lookup",
                json!({"partner_name": "TechVentures GmbH"}),
            )),
            ScriptStep::SummarizeToolResults,
        ]);
        let agent = agent(backend);
        let task_id = TaskId::new();
        agent
            .run(task_id, "Where is TechVentures GmbH located?", &[])
            .await
            .unwrap();

        let calls = agent.store().load_events(task_id, Some("tool_call")).unwrap();
        assert_eq!(calls.len(), 1);
        let results = agent
            .store()
            .load_events(task_id, Some("tool_result"))
            .unwrap();
        assert_eq!(results.len(), 1);
        let messages = agent.store().load_events(task_id, Some("message")).unwrap();
        assert_eq!(messages.len(), 2); // user + final assistant
    }

    #[tokio::test]
    async fn context_is_capped_to_recent_turns() {
        let backend = ScriptedBackend::new(vec![ScriptStep::EchoMessageCount]);
        let agent = agent(backend);

        let context: Vec<Message> = (0..9)
            .map(|i| Message::user(format!("turn {i}")))
            .collect();
        let answer = agent.run(TaskId::new(), "latest", &context).await.unwrap();
        // system + 5 context turns + current query
        assert_eq!(answer, "7 messages");
    }

    #[tokio::test]
    async fn unknown_tool_failure_is_returned_to_model() {
        let backend = ScriptedBackend::new(vec![
            ScriptStep::Reply(tool_call_message("c1", "launch_rockets", json!({}))),
            ScriptStep::SummarizeToolResults,
        ]);
        let agent = agent(backend);
        // The loop keeps going; the failure is material for the model,
        // not an error for the caller.
        let answer = agent.run(TaskId::new(), "do something odd", &[]).await;
        assert!(answer.is_ok());
    }

    #[tokio::test]
    async fn runaway_tool_loop_is_capped() {
        let backend = ScriptedBackend::repeating(tool_call_message(
            "c1",
            "business_partner_lookup",
            json!({"partner_name": "Acme Corp"}),
        ));
        let agent = agent(backend);
        let err = agent.run(TaskId::new(), "loop forever", &[]).await.unwrap_err();
        assert!(matches!(err, Error::ToolLoopExceeded(_)));
    }
}
