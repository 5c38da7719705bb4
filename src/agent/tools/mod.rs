pub mod base;
pub mod clients;
pub mod registry;
pub mod setup;
pub mod weather;

pub use base::{Tool, ToolFailure, ToolFailureKind, ToolResult};
pub use registry::ToolRegistry;
pub use setup::register_all_tools;
