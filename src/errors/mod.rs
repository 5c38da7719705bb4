use thiserror::Error;

/// Typed error hierarchy for react-agent.
///
/// Use at module boundaries (completion calls, tool registration, config validation).
/// Internal/leaf functions can continue using `anyhow::Result`; the `Internal` variant
/// allows seamless conversion via the `?` operator.
///
/// Tool failures are deliberately absent: those become structured payloads in the
/// conversation (see [`crate::agent::tools::ToolFailure`]) and never abort a run.
#[derive(Debug, Error)]
pub enum AgentError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Transport error: {message}")]
    Transport { message: String, retryable: bool },

    #[error("Rate limit exceeded")]
    RateLimit { retry_after: Option<u64> },

    #[error("Authentication failed: {0}")]
    Auth(String),

    /// The request/response pairing of the message log was violated. Fatal:
    /// continuing would send a structurally invalid sequence to the endpoint.
    #[error("Protocol violation: {0}")]
    Protocol(String),

    #[error("Tool '{0}' is already registered")]
    DuplicateTool(String),

    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

/// Convenience alias for results using `AgentError`.
pub type AgentResult<T> = std::result::Result<T, AgentError>;

impl AgentError {
    pub fn transport(message: impl Into<String>, retryable: bool) -> Self {
        Self::Transport {
            message: message.into(),
            retryable,
        }
    }

    /// Whether a single completion request that failed with this error may be re-sent.
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::Transport { retryable, .. } => *retryable,
            Self::RateLimit { .. } => true,
            Self::Auth(_)
            | Self::Config(_)
            | Self::Protocol(_)
            | Self::DuplicateTool(_)
            | Self::Internal(_) => false,
        }
    }

    /// Whether the error came from talking to the completion endpoint.
    pub fn is_transport(&self) -> bool {
        matches!(
            self,
            Self::Transport { .. } | Self::RateLimit { .. } | Self::Auth(_)
        )
    }

    /// Classify an error returned by a `CompletionClient`.
    ///
    /// Typed errors raised by a client (rate limit, auth, ...) survive the trip through
    /// `anyhow`; anything else is reported as a non-retryable transport failure.
    pub fn from_completion(err: anyhow::Error) -> Self {
        match err.downcast::<AgentError>() {
            Ok(typed) => typed,
            Err(other) => Self::Transport {
                message: format!("{:#}", other),
                retryable: false,
            },
        }
    }
}
