use crate::errors::AgentError;
use serde::{Deserialize, Serialize};

/// Generates a `Debug` impl that redacts secret fields.
///
/// Field specifiers:
/// - `field_name`: printed normally via `&self.field_name`
/// - `redact(field_name)`: `String` field, shows `[empty]` or `[REDACTED]`
macro_rules! redact_debug {
    (@field $builder:ident, $self:ident, redact($field:ident)) => {
        $builder.field(
            stringify!($field),
            &if $self.$field.is_empty() {
                "[empty]"
            } else {
                "[REDACTED]"
            },
        );
    };
    (@field $builder:ident, $self:ident, $field:ident) => {
        $builder.field(stringify!($field), &$self.$field);
    };

    (@fields $builder:ident, $self:ident,) => {};
    (@fields $builder:ident, $self:ident, redact($field:ident), $($rest:tt)*) => {
        redact_debug!(@field $builder, $self, redact($field));
        redact_debug!(@fields $builder, $self, $($rest)*);
    };
    (@fields $builder:ident, $self:ident, $field:ident, $($rest:tt)*) => {
        redact_debug!(@field $builder, $self, $field);
        redact_debug!(@fields $builder, $self, $($rest)*);
    };

    ($struct_name:ident, $($fields:tt)*) => {
        impl std::fmt::Debug for $struct_name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                let mut builder = f.debug_struct(stringify!($struct_name));
                redact_debug!(@fields builder, self, $($fields)*);
                builder.finish()
            }
        }
    };
}

// Declared after the macro so they can use `redact_debug!`
mod agent;
mod providers;
mod tools;

pub use agent::*;
pub use providers::*;
pub use tools::*;

fn default_true() -> bool {
    true
}

const MAX_ITERATIONS_LIMIT: usize = 1000;
const MAX_TOKENS_LIMIT: u32 = 1_000_000;

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub agent: AgentConfig,
    #[serde(default)]
    pub providers: ProvidersConfig,
    #[serde(default)]
    pub tools: ToolsConfig,
}

impl Config {
    pub fn validate(&self) -> Result<(), AgentError> {
        self.validate_agent()?;
        self.validate_tools()?;
        Ok(())
    }

    fn validate_agent(&self) -> Result<(), AgentError> {
        let a = &self.agent;

        if a.model.trim().is_empty() {
            return Err(AgentError::Config("agent.model must not be empty".into()));
        }
        if a.max_iterations == 0 {
            return Err(AgentError::Config("agent.maxIterations must be > 0".into()));
        }
        if a.max_iterations > MAX_ITERATIONS_LIMIT {
            return Err(AgentError::Config(format!(
                "agent.maxIterations is unreasonably large (> {})",
                MAX_ITERATIONS_LIMIT
            )));
        }
        if a.max_tokens == 0 {
            return Err(AgentError::Config("agent.maxTokens must be > 0".into()));
        }
        if a.max_tokens > MAX_TOKENS_LIMIT {
            return Err(AgentError::Config(
                "agent.maxTokens is unreasonably large (> 1,000,000)".into(),
            ));
        }
        if !a.temperature.is_finite() || !(0.0..=2.0).contains(&a.temperature) {
            return Err(AgentError::Config(format!(
                "agent.temperature must be between 0.0 and 2.0, got {}",
                a.temperature
            )));
        }
        if a.completion_timeout_secs == 0 {
            return Err(AgentError::Config(
                "agent.completionTimeoutSecs must be > 0".into(),
            ));
        }
        if a.tool_timeout_secs == 0 {
            return Err(AgentError::Config("agent.toolTimeoutSecs must be > 0".into()));
        }
        Ok(())
    }

    fn validate_tools(&self) -> Result<(), AgentError> {
        let c = &self.tools.clients;
        if c.enabled && c.database_path.trim().is_empty() {
            return Err(AgentError::Config(
                "tools.clients.databasePath must be set when the clients tools are enabled"
                    .into(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests;
