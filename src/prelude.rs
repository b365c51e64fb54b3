//! Common imports for working with Drover.

pub use crate::agent::{
    ActivityEvent, ActivitySink, AgentDefinition, AgentExecutor, AgentInputs, AgentOutput,
    InputSpec, InputType, ModelConfig, OutputConfig, PromptConfig, RunConfig, TerminateReason,
    FINISH_TOOL_NAME,
};
pub use crate::config::DroverConfig;
pub use crate::error::{DroverError, Result};
pub use crate::provider::{ChunkStream, ModelTransport, ToolDeclaration, TurnRequest};
pub use crate::tools::{
    AgentTool, ExecutionPolicy, Tool, ToolArguments, ToolContext, ToolKind, ToolOutput,
    ToolParameters, ToolRegistry,
};
pub use crate::types::{
    ContentPart, FinishReason, ModelMessage, ResponsePart, Role, StreamChunk, ToolCallRequest,
    ToolCallResult,
};
