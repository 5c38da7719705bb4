use crate::errors::AgentError;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, warn};

/// A function invocation requested by the model.
///
/// `arguments` is the serialized JSON exactly as the endpoint produced it. The loop
/// never looks inside; only the tool registry parses it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ToolCallRequest {
    pub id: String,
    pub name: String,
    pub arguments: String,
}

impl ToolCallRequest {
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        arguments: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            arguments: arguments.into(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    System,
    User,
    Assistant,
    Tool,
}

impl Role {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::System => "system",
            Self::User => "user",
            Self::Assistant => "assistant",
            Self::Tool => "tool",
        }
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One entry of the conversation log.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Message {
    pub role: Role,
    /// May be empty, e.g. an assistant message that only requests tool calls.
    pub content: String,
    /// Only populated on assistant messages.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tool_calls: Vec<ToolCallRequest>,
    /// Only populated on tool messages.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tool_call_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tool_name: Option<String>,
    /// Whether this tool result carries a structured failure (for role="tool" messages)
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub is_error: bool,
}

impl Message {
    fn with_role(role: Role, content: impl Into<String>) -> Self {
        Self {
            role,
            content: content.into(),
            tool_calls: Vec::new(),
            tool_call_id: None,
            tool_name: None,
            is_error: false,
        }
    }

    pub fn system(content: impl Into<String>) -> Self {
        Self::with_role(Role::System, content)
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self::with_role(Role::User, content)
    }

    pub fn assistant(content: impl Into<String>, tool_calls: Vec<ToolCallRequest>) -> Self {
        Self {
            tool_calls,
            ..Self::with_role(Role::Assistant, content)
        }
    }

    pub fn tool_result(
        tool_call_id: impl Into<String>,
        tool_name: impl Into<String>,
        content: impl Into<String>,
        is_error: bool,
    ) -> Self {
        Self {
            tool_call_id: Some(tool_call_id.into()),
            tool_name: Some(tool_name.into()),
            is_error,
            ..Self::with_role(Role::Tool, content)
        }
    }

    pub fn has_tool_calls(&self) -> bool {
        !self.tool_calls.is_empty()
    }
}

/// What the model is told about a registered tool.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolDefinition {
    pub name: String,
    pub description: String,
    pub parameters: Value, // JSON Schema
}

/// Parameters for one completion call.
#[derive(Debug, Clone, Copy)]
pub struct CompletionRequest<'a> {
    pub messages: &'a [Message],
    pub tools: &'a [ToolDefinition],
}

/// Configuration for re-sending a single failed completion request.
#[derive(Debug, Clone)]
pub struct RetryConfig {
    pub max_retries: usize,
    pub initial_delay_ms: u64,
    pub max_delay_ms: u64,
    pub backoff_multiplier: f64,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_retries: 3,
            initial_delay_ms: 1000,
            max_delay_ms: 10000,
            backoff_multiplier: 2.0,
        }
    }
}

impl RetryConfig {
    fn backoff_ms(&self, attempt: usize) -> u64 {
        let base = (self.initial_delay_ms as f64 * self.backoff_multiplier.powi(attempt as i32))
            .min(self.max_delay_ms as f64) as u64;
        // Up to 25% jitter so concurrent sessions don't retry in lockstep
        let jitter = (base as f64 * 0.25 * fastrand::f64()) as u64;
        base + jitter
    }
}

/// The language-model endpoint.
///
/// Given the full history and the available tools, returns the next assistant
/// message. Each call is independent: the endpoint reconstructs context purely
/// from `messages`.
#[async_trait]
pub trait CompletionClient: Send + Sync {
    async fn complete(&self, req: CompletionRequest<'_>) -> anyhow::Result<Message>;

    /// Model identifier, for logging.
    fn model(&self) -> &str;

    /// Complete with automatic re-send on retryable errors.
    ///
    /// Only the single request is repeated; no tool is ever re-executed.
    async fn complete_with_retry(
        &self,
        req: CompletionRequest<'_>,
        config: &RetryConfig,
    ) -> Result<Message, AgentError> {
        let mut attempt = 0;
        loop {
            debug!("Sending completion request (attempt {})", attempt);
            let err = match self.complete(req).await {
                Ok(message) => return Ok(message),
                Err(e) => AgentError::from_completion(e),
            };
            if !err.is_retryable() || attempt >= config.max_retries {
                return Err(err);
            }
            let delay = match err {
                AgentError::RateLimit {
                    retry_after: Some(secs),
                } => secs.saturating_mul(1000).min(config.max_delay_ms),
                _ => config.backoff_ms(attempt),
            };
            attempt += 1;
            warn!(
                "Completion request failed ({}), retry {}/{} in {}ms",
                err, attempt, config.max_retries, delay
            );
            tokio::time::sleep(std::time::Duration::from_millis(delay)).await;
        }
    }
}
