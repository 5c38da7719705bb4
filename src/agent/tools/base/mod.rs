use crate::providers::base::ToolDefinition;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use std::time::Duration;

/// A capability the model can invoke by name.
///
/// Tools receive the already parsed and schema-checked argument object and must
/// not touch the conversation. Any `Err` they return becomes an `invocation`
/// failure payload; it never aborts the run.
#[async_trait]
pub trait Tool: Send + Sync {
    fn name(&self) -> &str;
    fn description(&self) -> &str;
    fn parameters(&self) -> Value; // JSON Schema

    async fn execute(&self, params: Value) -> anyhow::Result<Value>;

    /// Per-tool execution timeout. `None` uses the registry default.
    fn execution_timeout(&self) -> Option<Duration> {
        None
    }

    fn to_definition(&self) -> ToolDefinition {
        ToolDefinition {
            name: self.name().to_string(),
            description: self.description().to_string(),
            parameters: self.parameters(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ToolFailureKind {
    UnknownTool,
    ArgumentParse,
    Invocation,
    Timeout,
    Panicked,
    Cancelled,
}

impl ToolFailureKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::UnknownTool => "unknown_tool",
            Self::ArgumentParse => "argument_parse",
            Self::Invocation => "invocation",
            Self::Timeout => "timeout",
            Self::Panicked => "panicked",
            Self::Cancelled => "cancelled",
        }
    }
}

/// A tool call that did not produce a value.
///
/// Rendered into the tool message as
/// `{"error": {"kind": ..., "tool": ..., "message": ...}}` so the model can
/// see what went wrong and recover.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ToolFailure {
    pub kind: ToolFailureKind,
    pub tool: String,
    pub message: String,
}

impl ToolFailure {
    pub fn new(kind: ToolFailureKind, tool: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            kind,
            tool: tool.into(),
            message: message.into(),
        }
    }

    pub fn unknown_tool(name: &str, available: &[String]) -> Self {
        let message = if available.is_empty() {
            format!("Tool '{}' does not exist. No tools are available.", name)
        } else {
            format!(
                "Tool '{}' does not exist. Available tools: {}",
                name,
                available.join(", ")
            )
        };
        Self::new(ToolFailureKind::UnknownTool, name, message)
    }

    pub fn cancelled(name: &str) -> Self {
        Self::new(
            ToolFailureKind::Cancelled,
            name,
            "Run was cancelled before this call completed",
        )
    }

    pub fn to_payload(&self) -> Value {
        json!({
            "error": {
                "kind": self.kind,
                "tool": self.tool,
                "message": self.message,
            }
        })
    }
}

impl std::fmt::Display for ToolFailure {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} ({}): {}", self.tool, self.kind.as_str(), self.message)
    }
}

impl std::error::Error for ToolFailure {}

/// What goes into the content of a tool message.
#[derive(Debug, Clone)]
pub struct ToolResult {
    pub content: String,
    pub is_error: bool,
}

impl ToolResult {
    pub fn new(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            is_error: false,
        }
    }

    pub fn error(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            is_error: true,
        }
    }
}

impl From<Result<Value, ToolFailure>> for ToolResult {
    fn from(outcome: Result<Value, ToolFailure>) -> Self {
        match outcome {
            // Compact form; serializing a Value cannot fail.
            Ok(value) => Self::new(value.to_string()),
            Err(failure) => Self::error(failure.to_payload().to_string()),
        }
    }
}

impl std::fmt::Display for ToolResult {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.content)
    }
}

/// Parse the raw argument string of a tool call into a JSON object.
///
/// Empty or whitespace-only input is treated as `{}`.
pub fn parse_arguments(tool: &str, raw: &str) -> Result<Value, ToolFailure> {
    if raw.trim().is_empty() {
        return Ok(json!({}));
    }
    match serde_json::from_str::<Value>(raw) {
        Ok(value @ Value::Object(_)) => Ok(value),
        Ok(other) => Err(ToolFailure::new(
            ToolFailureKind::ArgumentParse,
            tool,
            format!(
                "Arguments must be a JSON object, got {}",
                value_type_name(&other)
            ),
        )),
        Err(e) => Err(ToolFailure::new(
            ToolFailureKind::ArgumentParse,
            tool,
            format!("Arguments are not valid JSON: {}", e),
        )),
    }
}

/// Check `params` against the subset of JSON Schema tools declare: `required`,
/// primitive `type` of each property, and `enum`.
pub fn validate_params(tool: &dyn Tool, params: &Value) -> Result<(), ToolFailure> {
    let schema = tool.parameters();
    let mut errors = Vec::new();

    if let Some(required) = schema["required"].as_array() {
        for field in required {
            if let Some(field_name) = field.as_str()
                && params.get(field_name).is_none_or(Value::is_null)
            {
                errors.push(format!("missing required parameter '{}'", field_name));
            }
        }
    }

    if let Some(properties) = schema["properties"].as_object() {
        for (field_name, field_schema) in properties {
            let Some(value) = params.get(field_name).filter(|v| !v.is_null()) else {
                continue;
            };
            if let Some(expected_type) = field_schema["type"].as_str()
                && !type_matches(expected_type, value)
            {
                errors.push(format!(
                    "parameter '{}' should be {} but got {}",
                    field_name,
                    expected_type,
                    value_type_name(value)
                ));
                continue;
            }
            if let Some(allowed) = field_schema["enum"].as_array()
                && !allowed.contains(value)
            {
                errors.push(format!(
                    "parameter '{}' must be one of {}",
                    field_name,
                    Value::Array(allowed.clone())
                ));
            }
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(ToolFailure::new(
            ToolFailureKind::ArgumentParse,
            tool.name(),
            format!("Invalid arguments: {}", errors.join("; ")),
        ))
    }
}

fn type_matches(expected: &str, value: &Value) -> bool {
    match expected {
        "string" => value.is_string(),
        "number" => value.is_number(),
        "integer" => {
            value.is_i64() || value.is_u64() || value.as_f64().is_some_and(|f| f.fract() == 0.0)
        }
        "boolean" => value.is_boolean(),
        "array" => value.is_array(),
        "object" => value.is_object(),
        _ => true,
    }
}

fn value_type_name(v: &Value) -> &'static str {
    match v {
        Value::String(_) => "string",
        Value::Number(_) => "number",
        Value::Bool(_) => "boolean",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
        Value::Null => "null",
    }
}

#[cfg(test)]
mod tests;
