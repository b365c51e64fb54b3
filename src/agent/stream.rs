//! Streaming response processor.
//!
//! Obtains one validated model response per turn: consumes the transport's
//! chunk stream, filters invalid chunks, truncates after a second mutating
//! call, consolidates text, and retries streams that end without either a
//! tool call or usable answer text.

use std::sync::Arc;

use futures::StreamExt;

use super::catalog::IsolatedCatalog;
use super::events::ActivityEmitter;
use crate::error::{DroverError, Result, StreamRejection};
use crate::provider::{ChunkStream, ModelTransport, TurnRequest};
use crate::types::{FinishReason, ResponsePart, StreamChunk, ToolCallRequest};
use crate::util::retry::RetryPolicy;

/// A model response that passed end-of-stream validation.
#[derive(Debug, Clone)]
pub struct ValidatedResponse {
    /// Consolidated answer text (thought parts excluded).
    pub text: String,
    /// Tool calls in stream order.
    pub tool_calls: Vec<ToolCallRequest>,
    pub finish_reason: Option<FinishReason>,
}

pub struct StreamProcessor {
    transport: Arc<dyn ModelTransport>,
    catalog: Arc<IsolatedCatalog>,
    emitter: ActivityEmitter,
    retry: RetryPolicy,
}

impl StreamProcessor {
    pub fn new(
        transport: Arc<dyn ModelTransport>,
        catalog: Arc<IsolatedCatalog>,
        emitter: ActivityEmitter,
        retry: RetryPolicy,
    ) -> Self {
        Self {
            transport,
            catalog,
            emitter,
            retry,
        }
    }

    /// Obtain one validated response, retrying invalid streams under the
    /// configured linear backoff until attempts are exhausted.
    pub async fn send(&self, request: &TurnRequest) -> Result<ValidatedResponse> {
        self.retry.execute(|| self.attempt(request)).await
    }

    async fn attempt(&self, request: &TurnRequest) -> Result<ValidatedResponse> {
        let raw = self.transport.stream_turn(request).await?;
        let catalog = self.catalog.clone();
        let mut stream =
            truncate_after_second_mutator(raw, move |name| catalog.is_mutator(name));

        let mut text = String::new();
        let mut tool_calls: Vec<ToolCallRequest> = Vec::new();
        let mut finish_reason = None;

        while let Some(chunk) = stream.next().await {
            let chunk = chunk?;
            if let Some(reason) = chunk.finish_reason {
                finish_reason = Some(reason);
            }
            if !chunk.has_content() {
                continue;
            }
            for part in chunk.parts {
                match part {
                    ResponsePart::Thought { text: thought } => {
                        // Thoughts reach observers in arrival order but
                        // never the accumulated answer.
                        if !thought.is_empty() {
                            self.emitter.thought(thought);
                        }
                    }
                    ResponsePart::Text { text: delta } => text.push_str(&delta),
                    ResponsePart::ToolCall(call) => {
                        if !call.name.is_empty() {
                            tool_calls.push(call);
                        }
                    }
                }
            }
        }

        tracing::debug!(
            prompt_id = %request.prompt_id,
            tool_calls = tool_calls.len(),
            text_len = text.len(),
            finish_reason = ?finish_reason,
            "model stream consumed"
        );

        if !tool_calls.is_empty() {
            return Ok(ValidatedResponse {
                text,
                tool_calls,
                finish_reason,
            });
        }
        match finish_reason {
            None => Err(DroverError::InvalidStream {
                reason: StreamRejection::MissingFinishReason,
            }),
            Some(_) if text.trim().is_empty() => Err(DroverError::InvalidStream {
                reason: StreamRejection::EmptyText,
            }),
            Some(reason) => Ok(ValidatedResponse {
                text,
                tool_calls,
                finish_reason: Some(reason),
            }),
        }
    }
}

/// Cut the stream once it carries a second call to a mutating tool.
///
/// Everything after that call, including the rest of its chunk, is
/// discarded and replaced by a synthetic terminal chunk, forcing the loop
/// to re-enter with the first mutation's result before queueing more.
pub(crate) fn truncate_after_second_mutator(
    stream: ChunkStream,
    is_mutator: impl Fn(&str) -> bool + Send + 'static,
) -> ChunkStream {
    Box::pin(async_stream::stream! {
        let mut mutator_calls = 0usize;
        let mut inner = std::pin::pin!(stream);
        while let Some(item) = inner.next().await {
            match item {
                Err(e) => {
                    yield Err(e);
                    break;
                }
                Ok(chunk) => {
                    let finish_reason = chunk.finish_reason;
                    let mut kept = Vec::with_capacity(chunk.parts.len());
                    let mut truncated = false;
                    for part in chunk.parts {
                        if let ResponsePart::ToolCall(call) = &part {
                            if is_mutator(&call.name) {
                                mutator_calls += 1;
                            }
                        }
                        let second_mutation = mutator_calls == 2;
                        kept.push(part);
                        if second_mutation {
                            truncated = true;
                            break;
                        }
                    }
                    if truncated {
                        yield Ok(StreamChunk::parts(kept));
                        yield Ok(StreamChunk::finish(FinishReason::Truncated));
                        break;
                    }
                    yield Ok(StreamChunk { parts: kept, finish_reason });
                }
            }
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures::stream;

    fn call(id: &str, name: &str) -> ResponsePart {
        ResponsePart::ToolCall(ToolCallRequest {
            id: id.to_string(),
            name: name.to_string(),
            args: serde_json::json!({}),
        })
    }

    fn text(s: &str) -> ResponsePart {
        ResponsePart::Text {
            text: s.to_string(),
        }
    }

    async fn collect(stream: ChunkStream) -> Vec<StreamChunk> {
        stream.map(|c| c.unwrap()).collect().await
    }

    fn chunks(items: Vec<StreamChunk>) -> ChunkStream {
        Box::pin(stream::iter(items.into_iter().map(Ok)))
    }

    #[tokio::test]
    async fn second_mutator_cuts_the_stream_mid_chunk() {
        let input = chunks(vec![
            StreamChunk::parts(vec![
                text("first"),
                call("1", "write"),
                text("between"),
                call("2", "write"),
                text("after"),
                call("3", "read"),
            ]),
            StreamChunk::parts(vec![text("next chunk")]),
        ]);

        let out = collect(truncate_after_second_mutator(input, |n| n == "write")).await;

        assert_eq!(out.len(), 2);
        assert_eq!(out[0].parts.len(), 4);
        assert!(matches!(
            out[0].parts.last(),
            Some(ResponsePart::ToolCall(c)) if c.id == "2"
        ));
        assert_eq!(out[1], StreamChunk::finish(FinishReason::Truncated));
    }

    #[tokio::test]
    async fn a_single_mutator_passes_through_untouched() {
        let original = vec![
            StreamChunk::parts(vec![call("1", "write"), call("2", "read")]),
            StreamChunk::finish(FinishReason::ToolCalls),
        ];
        let out = collect(truncate_after_second_mutator(
            chunks(original.clone()),
            |n| n == "write",
        ))
        .await;
        assert_eq!(out, original);
    }

    #[tokio::test]
    async fn mutators_are_counted_across_chunks() {
        let input = chunks(vec![
            StreamChunk::parts(vec![call("1", "write")]),
            StreamChunk::parts(vec![text("thinking"), call("2", "write")]),
            StreamChunk::parts(vec![call("3", "read")]),
        ]);

        let out = collect(truncate_after_second_mutator(input, |n| n == "write")).await;

        assert_eq!(out.len(), 3);
        assert!(matches!(
            out[1].parts.last(),
            Some(ResponsePart::ToolCall(c)) if c.id == "2"
        ));
        assert_eq!(out[2], StreamChunk::finish(FinishReason::Truncated));
    }
}
