//! Model transport contract.
//!
//! The engine never speaks HTTP itself; it consumes an incremental chunk
//! stream from an injected transport. Implementations are expected to
//! handle authentication, wire framing, and transient-retry of 429/5xx
//! upstream, and to surface permanent errors distinguishably (see
//! [`crate::error::DroverError::is_retryable`]).

use async_trait::async_trait;
use futures::stream::BoxStream;
use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::types::{ModelMessage, StreamChunk};

/// Tool metadata advertised to the model.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ToolDeclaration {
    pub name: String,
    pub description: String,
    /// JSON Schema for the arguments.
    pub parameters: serde_json::Value,
}

/// One model call: full conversation state plus the advertised tools.
#[derive(Debug, Clone)]
pub struct TurnRequest {
    pub model: String,
    pub messages: Vec<ModelMessage>,
    pub tools: Vec<ToolDeclaration>,
    pub temperature: Option<f64>,
    pub top_p: Option<f64>,
    /// Correlates every call of one run for upstream logging.
    pub prompt_id: String,
}

/// Incremental model response stream.
pub type ChunkStream = BoxStream<'static, Result<StreamChunk>>;

/// Transport capable of streaming one conversation turn.
#[async_trait]
pub trait ModelTransport: Send + Sync {
    /// Open a chunk stream for the given request. The stream must stop
    /// promptly when dropped mid-flight.
    async fn stream_turn(&self, request: &TurnRequest) -> Result<ChunkStream>;
}
