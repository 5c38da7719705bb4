use crate::errors::AgentError;
use crate::providers::base::{
    CompletionClient, CompletionRequest, Message, Role, ToolCallRequest, ToolDefinition,
};
use crate::providers::errors::HttpErrorMapper;
use crate::providers::provider_http_client;
use anyhow::Result;
use async_trait::async_trait;
use reqwest::Client;
use serde_json::{Value, json};
use tracing::debug;

pub const DEFAULT_API_BASE: &str = "https://api.openai.com/v1";

/// `CompletionClient` for any OpenAI-compatible `/chat/completions` endpoint.
pub struct OpenAIClient {
    api_key: String,
    model: String,
    endpoint: String,
    max_tokens: u32,
    temperature: f32,
    client: Client,
}

impl OpenAIClient {
    pub fn new(
        api_key: impl Into<String>,
        model: impl Into<String>,
        api_base: &str,
        max_tokens: u32,
        temperature: f32,
    ) -> Self {
        Self {
            api_key: api_key.into(),
            model: model.into(),
            endpoint: format!("{}/chat/completions", api_base.trim_end_matches('/')),
            max_tokens,
            temperature,
            client: provider_http_client(),
        }
    }

    fn message_to_wire(msg: &Message) -> Value {
        let mut m = json!({
            "role": msg.role.as_str(),
            "content": msg.content,
        });

        if msg.has_tool_calls() {
            m["tool_calls"] = msg
                .tool_calls
                .iter()
                .map(|tc| {
                    json!({
                        "id": tc.id,
                        "type": "function",
                        "function": {
                            "name": tc.name,
                            "arguments": tc.arguments,
                        }
                    })
                })
                .collect();
        }

        if let Some(ref id) = msg.tool_call_id {
            m["tool_call_id"] = json!(id);
        }
        if msg.role == Role::Tool
            && let Some(ref name) = msg.tool_name
        {
            m["name"] = json!(name);
        }

        m
    }

    fn tool_to_wire(tool: &ToolDefinition) -> Value {
        json!({
            "type": "function",
            "function": {
                "name": tool.name,
                "description": tool.description,
                "parameters": tool.parameters,
            }
        })
    }

    fn build_payload(&self, req: CompletionRequest<'_>) -> Value {
        let mut payload = json!({
            "model": self.model,
            "messages": req.messages.iter().map(Self::message_to_wire).collect::<Vec<_>>(),
            "max_tokens": self.max_tokens,
            "temperature": self.temperature,
        });

        // Endpoints reject tool_choice/parallel_tool_calls without tools.
        if !req.tools.is_empty() {
            payload["tools"] = req.tools.iter().map(Self::tool_to_wire).collect();
            payload["tool_choice"] = json!("auto");
            payload["parallel_tool_calls"] = json!(false);
        }

        payload
    }

    fn parse_response(json: &Value) -> Result<Message> {
        let message = json["choices"]
            .as_array()
            .and_then(|arr| arr.first())
            .map(|choice| &choice["message"])
            .filter(|m| m.is_object())
            .ok_or_else(|| {
                AgentError::transport("malformed response: no choices in completion body", false)
            })?;

        let content = message["content"].as_str().unwrap_or_default().to_string();

        let mut tool_calls = Vec::new();
        if let Some(calls) = message["tool_calls"].as_array() {
            for tc in calls {
                let Some(function) = tc["function"].as_object() else {
                    return Err(AgentError::transport(
                        "malformed response: tool call without function",
                        false,
                    )
                    .into());
                };
                let Some(name) = function.get("name").and_then(Value::as_str) else {
                    return Err(AgentError::transport(
                        "malformed response: tool call without function name",
                        false,
                    )
                    .into());
                };
                // Arguments stay raw; only the registry parses them.
                let arguments = match function.get("arguments") {
                    Some(Value::String(s)) => s.clone(),
                    Some(Value::Null) | None => String::new(),
                    Some(other) => other.to_string(),
                };
                tool_calls.push(ToolCallRequest {
                    id: tc["id"].as_str().unwrap_or_default().to_string(),
                    name: name.to_string(),
                    arguments,
                });
            }
        }

        // Role is taken from the body so the loop can reject non-assistant replies.
        let role = match message["role"].as_str() {
            Some("user") => Role::User,
            Some("system") => Role::System,
            Some("tool") => Role::Tool,
            _ => Role::Assistant,
        };

        Ok(Message {
            role,
            ..Message::assistant(content, tool_calls)
        })
    }
}

#[async_trait]
impl CompletionClient for OpenAIClient {
    async fn complete(&self, req: CompletionRequest<'_>) -> Result<Message> {
        let payload = self.build_payload(req);
        debug!(
            "POST {} ({} messages, {} tools)",
            self.endpoint,
            req.messages.len(),
            req.tools.len()
        );

        let resp = self
            .client
            .post(&self.endpoint)
            .bearer_auth(&self.api_key)
            .json(&payload)
            .send()
            .await
            .map_err(|e| {
                let retryable = e.is_timeout() || e.is_connect();
                AgentError::transport(format!("Failed to send completion request: {}", e), retryable)
            })?;

        let json = HttpErrorMapper::check_response(resp, "chat/completions").await?;
        if let Some(tokens) = json["usage"]["total_tokens"].as_u64() {
            debug!("completion used {} tokens", tokens);
        }

        Self::parse_response(&json)
    }

    fn model(&self) -> &str {
        &self.model
    }
}
