//! Tool system for function calling.

pub mod arguments;
pub mod registry;
pub mod tool;
pub mod types;
pub mod validation;

pub use arguments::ToolArguments;
pub use registry::{ExecutionPolicy, ToolRegistry};
pub use tool::{AgentTool, Tool, ToolContext, ToolKind, ToolOutput};
pub use types::ToolParameters;
