use crate::agent::conversation::Conversation;
use crate::agent::tools::{ToolFailure, ToolRegistry, ToolResult};
use crate::errors::{AgentError, AgentResult};
use crate::providers::base::{
    CompletionClient, CompletionRequest, Message, RetryConfig, Role, ToolCallRequest,
    ToolDefinition,
};
use std::collections::HashSet;
use std::sync::Arc;
use std::time::Duration;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

pub const DEFAULT_COMPLETION_TIMEOUT: Duration = Duration::from_secs(120);

/// Configuration for creating an [`AgentLoop`] instance.
pub struct AgentLoopConfig {
    pub client: Arc<dyn CompletionClient>,
    pub tools: Arc<ToolRegistry>,
    /// Upper bound on one completion call, retries included.
    pub completion_timeout: Duration,
    /// Re-send a failed completion request on retryable errors. Off by default.
    pub retry: Option<RetryConfig>,
}

impl AgentLoopConfig {
    pub fn new(client: Arc<dyn CompletionClient>, tools: Arc<ToolRegistry>) -> Self {
        Self {
            client,
            tools,
            completion_timeout: DEFAULT_COMPLETION_TIMEOUT,
            retry: None,
        }
    }

    /// Build from the application [`Config`](crate::config::Config).
    pub fn from_config(
        config: &crate::config::Config,
        client: Arc<dyn CompletionClient>,
        tools: Arc<ToolRegistry>,
    ) -> Self {
        let agent = &config.agent;
        Self {
            client,
            tools,
            completion_timeout: Duration::from_secs(agent.completion_timeout_secs),
            retry: (agent.max_retries > 0).then(|| RetryConfig {
                max_retries: agent.max_retries,
                ..RetryConfig::default()
            }),
        }
    }
}

/// How a run ended without an error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Termination {
    /// The model replied without requesting tools.
    Answered,
    /// `max_iterations` turns were used without a final answer.
    IterationLimitReached,
    /// The cancellation token fired. The log is still protocol-valid.
    Cancelled,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoopResult {
    /// Content of the final assistant message; `None` unless `Answered`.
    pub final_text: Option<String>,
    /// Number of completed model calls.
    pub iterations_used: usize,
    pub terminated: Termination,
}

impl LoopResult {
    fn unanswered(iterations_used: usize, terminated: Termination) -> Self {
        Self {
            final_text: None,
            iterations_used,
            terminated,
        }
    }
}

#[derive(Debug, PartialEq, Eq)]
enum Dispatch {
    Completed,
    Cancelled,
}

/// Drives one conversation turn to completion: ask the model, run the tools it
/// requests, feed the results back, until it answers or the turn budget runs out.
///
/// Holds no per-run state, so one instance can serve many concurrent runs.
pub struct AgentLoop {
    client: Arc<dyn CompletionClient>,
    tools: Arc<ToolRegistry>,
    completion_timeout: Duration,
    retry: Option<RetryConfig>,
}

impl AgentLoop {
    pub fn new(config: AgentLoopConfig) -> Self {
        Self {
            client: config.client,
            tools: config.tools,
            completion_timeout: config.completion_timeout,
            retry: config.retry,
        }
    }

    pub fn tools(&self) -> &Arc<ToolRegistry> {
        &self.tools
    }

    /// Run until the model answers or `max_iterations` model calls have been made.
    ///
    /// On `Err` the conversation keeps every message appended before the failure.
    pub async fn run(
        &self,
        conversation: &mut Conversation,
        max_iterations: usize,
    ) -> AgentResult<LoopResult> {
        self.run_with_cancel(conversation, max_iterations, &CancellationToken::new())
            .await
    }

    /// Like [`run`](Self::run), but stops early when `cancel` fires.
    ///
    /// The token is checked between turns and raced against the completion call
    /// and each tool call. Calls left unanswered by a cancellation are answered
    /// with `cancelled` failures so the log can be resumed later.
    pub async fn run_with_cancel(
        &self,
        conversation: &mut Conversation,
        max_iterations: usize,
        cancel: &CancellationToken,
    ) -> AgentResult<LoopResult> {
        conversation.validate_pairing()?;

        let definitions = self.tools.definitions();
        let mut iterations_used = 0;

        while iterations_used < max_iterations {
            if cancel.is_cancelled() {
                info!("Run cancelled after {} iterations", iterations_used);
                return Ok(LoopResult::unanswered(iterations_used, Termination::Cancelled));
            }

            debug!(
                "Iteration {}/{} ({} messages)",
                iterations_used + 1,
                max_iterations,
                conversation.len()
            );

            let response = tokio::select! {
                biased;
                () = cancel.cancelled() => {
                    info!("Run cancelled while awaiting the model");
                    return Ok(LoopResult::unanswered(iterations_used, Termination::Cancelled));
                }
                response = self.request_completion(conversation.messages(), &definitions) => response?,
            };
            iterations_used += 1;

            Self::check_response(conversation, &response)?;

            if !response.has_tool_calls() {
                let final_text = response.content.clone();
                conversation.push(response);
                info!(
                    "Run answered after {} iteration(s) ({} chars)",
                    iterations_used,
                    final_text.len()
                );
                return Ok(LoopResult {
                    final_text: Some(final_text),
                    iterations_used,
                    terminated: Termination::Answered,
                });
            }

            let calls = response.tool_calls.clone();
            conversation.push(response);

            if self.dispatch(conversation, &calls, cancel).await == Dispatch::Cancelled {
                info!("Run cancelled during tool dispatch");
                return Ok(LoopResult::unanswered(iterations_used, Termination::Cancelled));
            }
        }

        warn!(
            "Iteration limit reached ({}) without a final answer",
            max_iterations
        );
        Ok(LoopResult::unanswered(
            iterations_used,
            Termination::IterationLimitReached,
        ))
    }

    async fn request_completion(
        &self,
        messages: &[Message],
        tools: &[ToolDefinition],
    ) -> AgentResult<Message> {
        let req = CompletionRequest { messages, tools };
        let call = async {
            match &self.retry {
                Some(retry) => self.client.complete_with_retry(req, retry).await,
                None => self
                    .client
                    .complete(req)
                    .await
                    .map_err(AgentError::from_completion),
            }
        };

        match tokio::time::timeout(self.completion_timeout, call).await {
            Ok(result) => result,
            Err(_) => {
                warn!(
                    "Completion call to {} timed out after {}ms",
                    self.client.model(),
                    self.completion_timeout.as_millis()
                );
                Err(AgentError::transport(
                    format!(
                        "completion timed out after {}ms",
                        self.completion_timeout.as_millis()
                    ),
                    true,
                ))
            }
        }
    }

    /// A response must be an assistant message whose call ids are non-empty and
    /// unique, both within the response and across the log.
    fn check_response(conversation: &Conversation, response: &Message) -> AgentResult<()> {
        if response.role != Role::Assistant {
            return Err(AgentError::Protocol(format!(
                "expected an assistant message from the model, got role '{}'",
                response.role
            )));
        }

        let mut ids = HashSet::new();
        for call in &response.tool_calls {
            if call.id.is_empty() {
                return Err(AgentError::Protocol(format!(
                    "tool call to '{}' has an empty id",
                    call.name
                )));
            }
            if !ids.insert(call.id.as_str()) || conversation.has_call_id(&call.id) {
                return Err(AgentError::Protocol(format!(
                    "duplicate tool call id '{}'",
                    call.id
                )));
            }
        }
        Ok(())
    }

    /// Answer every call in issue order, one at a time.
    async fn dispatch(
        &self,
        conversation: &mut Conversation,
        calls: &[ToolCallRequest],
        cancel: &CancellationToken,
    ) -> Dispatch {
        for (index, call) in calls.iter().enumerate() {
            info!("Tool call: {} (id={})", call.name, call.id);

            let outcome = tokio::select! {
                biased;
                () = cancel.cancelled() => None,
                outcome = self.tools.invoke(&call.name, &call.arguments) => Some(outcome),
            };

            let Some(outcome) = outcome else {
                for pending in &calls[index..] {
                    conversation.push_tool_result(
                        pending,
                        ToolResult::from(Err(ToolFailure::cancelled(&pending.name))),
                    );
                }
                return Dispatch::Cancelled;
            };
            conversation.push_tool_result(call, ToolResult::from(outcome));
        }
        Dispatch::Completed
    }
}

#[cfg(test)]
mod tests;
