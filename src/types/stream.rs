//! Streaming types.

use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

use super::message::ToolCallRequest;

/// One incremental chunk of a model response stream.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct StreamChunk {
    #[serde(default)]
    pub parts: Vec<ResponsePart>,
    /// Present only on the terminal chunk of a stream.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub finish_reason: Option<FinishReason>,
}

impl StreamChunk {
    /// A chunk carrying only content parts.
    pub fn parts(parts: Vec<ResponsePart>) -> Self {
        Self {
            parts,
            finish_reason: None,
        }
    }

    /// A terminal marker chunk with no content.
    pub fn finish(reason: FinishReason) -> Self {
        Self {
            parts: Vec::new(),
            finish_reason: Some(reason),
        }
    }

    /// A chunk is valid content only if at least one part is non-empty.
    pub fn has_content(&self) -> bool {
        self.parts.iter().any(|part| !part.is_empty())
    }
}

/// A single fragment of model output.
///
/// Modeled as an exhaustive sum so that consolidation and mutator
/// detection are compiler-checked rather than driven by optional fields.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ResponsePart {
    /// Internal reasoning, surfaced to observers but excluded from the answer.
    Thought { text: String },
    /// Answer text.
    Text { text: String },
    /// A requested tool invocation.
    ToolCall(ToolCallRequest),
}

impl ResponsePart {
    pub fn is_empty(&self) -> bool {
        match self {
            Self::Thought { text } | Self::Text { text } => text.is_empty(),
            Self::ToolCall(call) => call.name.is_empty(),
        }
    }
}

/// Why a stream finished.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Display, EnumString)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum FinishReason {
    Stop,
    Length,
    ToolCalls,
    ContentFilter,
    Error,
    /// Injected when the engine cut the stream after a second mutating call.
    Truncated,
}
