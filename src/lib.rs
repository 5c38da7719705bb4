#![warn(clippy::pedantic)]
// Noisy doc/signature lints
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::must_use_candidate)]
// Keeping format!("{}", x) over format!("{x}") for complex exprs
#![allow(clippy::uninlined_format_args)]
// Token counts, timeouts and temperatures cross numeric types at the API boundary
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::cast_sign_loss)]
#![allow(clippy::cast_precision_loss)]
#![allow(clippy::cast_possible_wrap)]
#![allow(clippy::too_many_lines)]
// Tool modules follow the foo::FooTool pattern
#![allow(clippy::module_name_repetitions)]

pub mod agent;
pub mod cli;
pub mod config;
pub mod errors;
pub mod providers;
pub(crate) mod utils;

pub use agent::tools::{Tool, ToolFailure, ToolFailureKind, ToolRegistry, ToolResult};
pub use agent::{AgentLoop, AgentLoopConfig, Conversation, LoopResult, Termination};
pub use errors::{AgentError, AgentResult};
pub use providers::base::{
    CompletionClient, CompletionRequest, Message, RetryConfig, Role, ToolCallRequest,
    ToolDefinition,
};

pub const VERSION: &str = env!("CARGO_PKG_VERSION");
