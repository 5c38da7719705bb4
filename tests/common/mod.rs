// Shared test helpers; not all items are used by every test binary.
#![allow(unused)]

use async_trait::async_trait;
use react_agent::agent::{AgentLoop, AgentLoopConfig};
use react_agent::agent::tools::{Tool, ToolRegistry};
use react_agent::errors::AgentError;
use react_agent::providers::base::{
    CompletionClient, CompletionRequest, Message, ToolCallRequest, ToolDefinition,
};
use serde_json::{Value, json};
use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

#[derive(Debug, Clone)]
pub struct RecordedCall {
    pub messages: Vec<Message>,
    pub tools: Vec<ToolDefinition>,
}

/// Completion client that replays a fixed script, one entry per call.
///
/// Once the script is exhausted every call answers with `"Mock response"`.
pub struct ScriptedClient {
    responses: Mutex<VecDeque<Result<Message, AgentError>>>,
    pub calls: Mutex<Vec<RecordedCall>>,
    delay: Option<Duration>,
}

impl ScriptedClient {
    pub fn with_responses(responses: Vec<Message>) -> Self {
        Self::with_results(responses.into_iter().map(Ok).collect())
    }

    pub fn with_results(results: Vec<Result<Message, AgentError>>) -> Self {
        Self {
            responses: Mutex::new(VecDeque::from(results)),
            calls: Mutex::new(Vec::new()),
            delay: None,
        }
    }

    /// Sleep before answering each call.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }

    pub fn recorded(&self, index: usize) -> RecordedCall {
        self.calls.lock().unwrap()[index].clone()
    }
}

#[async_trait]
impl CompletionClient for ScriptedClient {
    async fn complete(&self, req: CompletionRequest<'_>) -> anyhow::Result<Message> {
        self.calls.lock().unwrap().push(RecordedCall {
            messages: req.messages.to_vec(),
            tools: req.tools.to_vec(),
        });
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        let next = self.responses.lock().unwrap().pop_front();
        match next {
            Some(Ok(message)) => Ok(message),
            Some(Err(e)) => Err(e.into()),
            None => Ok(text_response("Mock response")),
        }
    }

    fn model(&self) -> &str {
        "scripted"
    }
}

// --- Response builders ---

pub fn text_response(content: &str) -> Message {
    Message::assistant(content, vec![])
}

pub fn tool_call(id: &str, name: &str, arguments: Value) -> ToolCallRequest {
    ToolCallRequest::new(id, name, arguments.to_string())
}

pub fn tool_response(calls: Vec<ToolCallRequest>) -> Message {
    Message::assistant("", calls)
}

// --- Test tools ---

/// Echoes `text` back; counts invocations.
#[derive(Default)]
pub struct EchoTool {
    pub calls: AtomicUsize,
}

#[async_trait]
impl Tool for EchoTool {
    fn name(&self) -> &str {
        "echo"
    }
    fn description(&self) -> &str {
        "Echoes the input"
    }
    fn parameters(&self) -> Value {
        json!({
            "type": "object",
            "properties": { "text": { "type": "string" } },
            "required": ["text"]
        })
    }
    async fn execute(&self, params: Value) -> anyhow::Result<Value> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(json!({ "echo": params["text"] }))
    }
}

pub struct FailingTool;

#[async_trait]
impl Tool for FailingTool {
    fn name(&self) -> &str {
        "failing"
    }
    fn description(&self) -> &str {
        "Always fails"
    }
    fn parameters(&self) -> Value {
        json!({ "type": "object", "properties": {} })
    }
    async fn execute(&self, _params: Value) -> anyhow::Result<Value> {
        anyhow::bail!("upstream service unavailable")
    }
}

/// Sleeps for the given duration, then reports success.
pub struct SlowTool(pub Duration);

#[async_trait]
impl Tool for SlowTool {
    fn name(&self) -> &str {
        "slow"
    }
    fn description(&self) -> &str {
        "Takes its time"
    }
    fn parameters(&self) -> Value {
        json!({ "type": "object", "properties": {} })
    }
    async fn execute(&self, _params: Value) -> anyhow::Result<Value> {
        tokio::time::sleep(self.0).await;
        Ok(json!({ "done": true }))
    }
}

/// Fake weather lookup used by the end-to-end scenarios.
pub struct TemperatureTool;

#[async_trait]
impl Tool for TemperatureTool {
    fn name(&self) -> &str {
        "get_current_temperature_for_city"
    }
    fn description(&self) -> &str {
        "Current temperature in Celsius"
    }
    fn parameters(&self) -> Value {
        json!({
            "type": "object",
            "properties": { "city_name": { "type": "string" } },
            "required": ["city_name"]
        })
    }
    async fn execute(&self, params: Value) -> anyhow::Result<Value> {
        Ok(json!({ "city": params["city_name"], "temperature_c": 12.5 }))
    }
}

pub fn registry_with(tools: Vec<Arc<dyn Tool>>) -> ToolRegistry {
    let mut registry = ToolRegistry::new();
    for tool in tools {
        registry.register(tool).unwrap();
    }
    registry
}

pub fn create_agent(client: Arc<ScriptedClient>, registry: ToolRegistry) -> AgentLoop {
    AgentLoop::new(AgentLoopConfig::new(client, Arc::new(registry)))
}

pub fn error_kind(message: &Message) -> Option<String> {
    let payload: Value = serde_json::from_str(&message.content).ok()?;
    payload["error"]["kind"].as_str().map(str::to_string)
}
