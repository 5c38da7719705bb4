use crate::agent::tools::Tool;
use crate::agent::tools::base::{ToolFailure, ToolFailureKind, parse_arguments, validate_params};
use crate::errors::{AgentError, AgentResult};
use crate::providers::base::ToolDefinition;
use serde_json::Value;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::task::AbortHandle;
use tracing::{debug, error, info, warn};

pub const DEFAULT_TOOL_TIMEOUT: Duration = Duration::from_secs(60);
const MAX_TOOL_NAME_LEN: usize = 64;

/// Aborts the spawned tool task if the invoking future is dropped (run cancelled).
struct AbortOnDrop(AbortHandle);

impl Drop for AbortOnDrop {
    fn drop(&mut self) {
        self.0.abort();
    }
}

/// Name-keyed set of tools available to a run.
///
/// Built once, then shared read-only (`Arc<ToolRegistry>`) between concurrent runs.
pub struct ToolRegistry {
    tools: HashMap<String, Arc<dyn Tool>>,
    default_timeout: Duration,
}

impl ToolRegistry {
    pub fn new() -> Self {
        Self::with_default_timeout(DEFAULT_TOOL_TIMEOUT)
    }

    pub fn with_default_timeout(default_timeout: Duration) -> Self {
        Self {
            tools: HashMap::new(),
            default_timeout,
        }
    }

    /// Add a tool. Names must be unique, at most 64 characters of `[A-Za-z0-9_-]`,
    /// and the parameter schema must be a JSON object.
    pub fn register(&mut self, tool: Arc<dyn Tool>) -> AgentResult<()> {
        let name = tool.name().to_string();
        if name.is_empty()
            || name.len() > MAX_TOOL_NAME_LEN
            || !name
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-')
        {
            return Err(AgentError::Config(format!(
                "invalid tool name '{}': expected 1-{} characters of [A-Za-z0-9_-]",
                name.escape_debug(),
                MAX_TOOL_NAME_LEN
            )));
        }
        if !tool.parameters().is_object() {
            return Err(AgentError::Config(format!(
                "tool '{}' has a parameter schema that is not a JSON object",
                name
            )));
        }
        if self.tools.contains_key(&name) {
            return Err(AgentError::DuplicateTool(name));
        }
        debug!("tool registry: registered '{}'", name);
        self.tools.insert(name, tool);
        Ok(())
    }

    pub fn get(&self, name: &str) -> Option<Arc<dyn Tool>> {
        self.tools.get(name).cloned()
    }

    /// Returns a sorted list of all registered tool names.
    pub fn tool_names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.tools.keys().cloned().collect();
        names.sort();
        names
    }

    pub fn len(&self) -> usize {
        self.tools.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tools.is_empty()
    }

    /// Definitions surfaced to the model, sorted by name so every call sees the
    /// same order.
    pub fn definitions(&self) -> Vec<ToolDefinition> {
        let mut defs: Vec<_> = self.tools.values().map(|t| t.to_definition()).collect();
        defs.sort_by(|a, b| a.name.cmp(&b.name));
        defs
    }

    /// Resolve, parse, validate and run one tool call.
    ///
    /// Never fails the caller: every problem comes back as a [`ToolFailure`]
    /// destined for the conversation.
    pub async fn invoke(&self, name: &str, raw_arguments: &str) -> Result<Value, ToolFailure> {
        let Some(tool) = self.get(name) else {
            warn!("Model requested unknown tool '{}'", name);
            return Err(ToolFailure::unknown_tool(name, &self.tool_names()));
        };

        let params = parse_arguments(name, raw_arguments)?;
        validate_params(tool.as_ref(), &params)?;

        debug!("Executing tool: {} with arguments: {}", name, params);
        let start = Instant::now();
        let outcome = self.execute_with_guards(name, tool, params).await;
        match &outcome {
            Ok(value) => info!(
                "Tool '{}' completed in {}ms ({} bytes)",
                name,
                start.elapsed().as_millis(),
                value.to_string().len()
            ),
            Err(failure) => warn!("Tool call failed: {}", failure),
        }
        outcome
    }

    /// Run the tool in its own task so a panic is contained (`JoinError::is_panic`)
    /// and the timeout is enforced.
    async fn execute_with_guards(
        &self,
        name: &str,
        tool: Arc<dyn Tool>,
        params: Value,
    ) -> Result<Value, ToolFailure> {
        let timeout = tool.execution_timeout().unwrap_or(self.default_timeout);

        let handle = tokio::task::spawn(async move {
            tokio::time::timeout(timeout, tool.execute(params)).await
        });
        let _guard = AbortOnDrop(handle.abort_handle());

        match handle.await {
            Ok(Ok(Ok(value))) => Ok(value),
            Ok(Ok(Err(e))) => Err(ToolFailure::new(
                ToolFailureKind::Invocation,
                name,
                format!("{:#}", e),
            )),
            Ok(Err(_)) => Err(ToolFailure::new(
                ToolFailureKind::Timeout,
                name,
                format!("Tool '{}' timed out after {}ms", name, timeout.as_millis()),
            )),
            Err(join_err) if join_err.is_panic() => {
                // into_panic() consumes the JoinError so extract in one step.
                let payload = join_err.into_panic();
                let panic_msg = payload
                    .downcast_ref::<String>()
                    .map(String::as_str)
                    .or_else(|| payload.downcast_ref::<&str>().copied())
                    .unwrap_or("unknown cause");
                error!("Tool '{}' panicked: {}", name, panic_msg);
                Err(ToolFailure::new(
                    ToolFailureKind::Panicked,
                    name,
                    format!("Tool '{}' crashed: {}", name, panic_msg),
                ))
            }
            Err(_) => Err(ToolFailure::cancelled(name)),
        }
    }
}

impl Default for ToolRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for ToolRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ToolRegistry")
            .field("tools", &self.tool_names())
            .field("default_timeout", &self.default_timeout)
            .finish()
    }
}
