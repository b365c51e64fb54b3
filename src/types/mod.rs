//! Core types shared across the engine.

pub mod message;
pub mod stream;

pub use message::{ContentPart, ModelMessage, Role, ToolCallRequest, ToolCallResult};
pub use stream::{FinishReason, ResponsePart, StreamChunk};
