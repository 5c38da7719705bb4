use serde::{Deserialize, Serialize};

pub const DEFAULT_SYSTEM_PROMPT: &str = "You are a helpful assistant. Use the available tools \
when they help answer the user's question, and answer directly when they do not.";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AgentConfig {
    #[serde(default = "default_model")]
    pub model: String,
    #[serde(default = "default_max_iterations", rename = "maxIterations")]
    pub max_iterations: usize,
    #[serde(default = "default_max_tokens", rename = "maxTokens")]
    pub max_tokens: u32,
    #[serde(default = "default_temperature")]
    pub temperature: f32,
    #[serde(default = "default_system_prompt", rename = "systemPrompt")]
    pub system_prompt: String,
    #[serde(
        default = "default_completion_timeout_secs",
        rename = "completionTimeoutSecs"
    )]
    pub completion_timeout_secs: u64,
    #[serde(default = "default_tool_timeout_secs", rename = "toolTimeoutSecs")]
    pub tool_timeout_secs: u64,
    /// Re-sends of one failed completion request. 0 disables retry.
    #[serde(default, rename = "maxRetries")]
    pub max_retries: usize,
}

impl Default for AgentConfig {
    fn default() -> Self {
        Self {
            model: default_model(),
            max_iterations: default_max_iterations(),
            max_tokens: default_max_tokens(),
            temperature: default_temperature(),
            system_prompt: default_system_prompt(),
            completion_timeout_secs: default_completion_timeout_secs(),
            tool_timeout_secs: default_tool_timeout_secs(),
            max_retries: 0,
        }
    }
}

fn default_model() -> String {
    "gpt-4o-mini".to_string()
}

fn default_max_iterations() -> usize {
    10
}

fn default_max_tokens() -> u32 {
    4096
}

fn default_temperature() -> f32 {
    0.7
}

fn default_system_prompt() -> String {
    DEFAULT_SYSTEM_PROMPT.to_string()
}

fn default_completion_timeout_secs() -> u64 {
    120
}

fn default_tool_timeout_secs() -> u64 {
    60
}
