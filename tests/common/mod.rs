//! Shared test helpers: a scripted transport, recording sink, canned tools.

#![allow(dead_code)]

use std::collections::VecDeque;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;

use drover::agent::{
    ActivityEvent, ActivitySink, AgentDefinition, ModelConfig, OutputConfig, PromptConfig,
    RunConfig,
};
use drover::error::Result;
use drover::provider::{ChunkStream, ModelTransport, TurnRequest};
use drover::tools::{
    AgentTool, ExecutionPolicy, Tool, ToolKind, ToolOutput, ToolParameters, ToolRegistry,
};
use drover::types::{FinishReason, ResponsePart, StreamChunk, ToolCallRequest};

/// Transport that replays pre-scripted chunk streams, one per model call.
///
/// An exhausted script yields an empty stream, which the processor rejects
/// as invalid; tests asserting "the model is never called" just check
/// `calls()`.
#[derive(Default)]
pub struct ScriptedTransport {
    turns: Mutex<VecDeque<Vec<Result<StreamChunk>>>>,
    requests: Mutex<Vec<TurnRequest>>,
}

impl ScriptedTransport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push_turn(&self, chunks: Vec<Result<StreamChunk>>) {
        self.turns.lock().unwrap().push_back(chunks);
    }

    /// Number of model calls issued so far.
    pub fn calls(&self) -> usize {
        self.requests.lock().unwrap().len()
    }

    /// The request issued for the given model call.
    pub fn request(&self, index: usize) -> TurnRequest {
        self.requests.lock().unwrap()[index].clone()
    }
}

#[async_trait]
impl ModelTransport for ScriptedTransport {
    async fn stream_turn(&self, request: &TurnRequest) -> Result<ChunkStream> {
        self.requests.lock().unwrap().push(request.clone());
        let turn = self
            .turns
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_default();
        Ok(Box::pin(tokio_stream::iter(turn)))
    }
}

pub fn text_chunk(text: &str) -> StreamChunk {
    StreamChunk::parts(vec![ResponsePart::Text {
        text: text.to_string(),
    }])
}

pub fn thought_chunk(text: &str) -> StreamChunk {
    StreamChunk::parts(vec![ResponsePart::Thought {
        text: text.to_string(),
    }])
}

pub fn call(id: &str, name: &str, args: serde_json::Value) -> ToolCallRequest {
    ToolCallRequest {
        id: id.to_string(),
        name: name.to_string(),
        args,
    }
}

pub fn calls_chunk(calls: Vec<ToolCallRequest>) -> StreamChunk {
    StreamChunk::parts(calls.into_iter().map(ResponsePart::ToolCall).collect())
}

pub fn finish_chunk(reason: FinishReason) -> StreamChunk {
    StreamChunk::finish(reason)
}

/// A full scripted turn that calls the finish tool with the given args.
pub fn finish_turn(id: &str, args: serde_json::Value) -> Vec<Result<StreamChunk>> {
    vec![
        Ok(calls_chunk(vec![call(id, drover::agent::FINISH_TOOL_NAME, args)])),
        Ok(finish_chunk(FinishReason::ToolCalls)),
    ]
}

/// Sink that records every activity event.
pub fn recording_sink() -> (ActivitySink, Arc<Mutex<Vec<ActivityEvent>>>) {
    let events: Arc<Mutex<Vec<ActivityEvent>>> = Arc::new(Mutex::new(Vec::new()));
    let captured = events.clone();
    let sink: ActivitySink = Arc::new(move |event| {
        captured.lock().unwrap().push(event);
    });
    (sink, events)
}

pub fn tool_call_ends(events: &[ActivityEvent]) -> usize {
    events
        .iter()
        .filter(|e| matches!(e, ActivityEvent::ToolCallEnd { .. }))
        .count()
}

pub fn error_events(events: &[ActivityEvent]) -> Vec<(String, String)> {
    events
        .iter()
        .filter_map(|e| match e {
            ActivityEvent::Error { context, error, .. } => {
                Some((context.clone(), error.clone()))
            }
            _ => None,
        })
        .collect()
}

/// Read-only tool that answers after a fixed delay.
pub fn slow_tool(name: &str, delay: Duration) -> Arc<dyn Tool> {
    let reply = serde_json::json!({ "from": name });
    Arc::new(AgentTool::new(
        name,
        "answers slowly",
        ToolParameters::empty(),
        move |_, _| {
            let reply = reply.clone();
            async move {
                tokio::time::sleep(delay).await;
                Ok(ToolOutput::json(reply))
            }
        },
    ))
}

/// Read-only tool that always fails.
pub fn failing_tool(name: &str) -> Arc<dyn Tool> {
    let tool_name = name.to_string();
    Arc::new(AgentTool::new(
        name,
        "always fails",
        ToolParameters::empty(),
        move |_, _| {
            let tool_name = tool_name.clone();
            async move {
                Err(drover::error::DroverError::ToolExecution {
                    tool_name,
                    message: "simulated failure".to_string(),
                })
            }
        },
    ))
}

/// Tool that counts its executions; optionally a mutator.
pub fn counting_tool(name: &str, kind: ToolKind) -> (Arc<dyn Tool>, Arc<AtomicUsize>) {
    let count = Arc::new(AtomicUsize::new(0));
    let bumped = count.clone();
    let tool = AgentTool::new(name, "counts executions", ToolParameters::empty(), move |_, _| {
        let bumped = bumped.clone();
        async move {
            bumped.fetch_add(1, Ordering::SeqCst);
            Ok(ToolOutput::json(serde_json::json!({ "ok": true })))
        }
    })
    .with_kind(kind);
    (Arc::new(tool), count)
}

/// Tool that flips a flag if it ever executes. Used to prove denial paths
/// never reach the tool's side-effecting code.
pub fn tripwire_tool(name: &str) -> (Arc<dyn Tool>, Arc<AtomicBool>) {
    let tripped = Arc::new(AtomicBool::new(false));
    let flag = tripped.clone();
    let tool = AgentTool::new(name, "must never run", ToolParameters::empty(), move |_, _| {
        let flag = flag.clone();
        async move {
            flag.store(true, Ordering::SeqCst);
            Ok(ToolOutput::json(serde_json::json!({})))
        }
    });
    (Arc::new(tool), tripped)
}

/// Registry with the given tools on the non-interactive allow-list.
pub fn registry_of(tools: Vec<Arc<dyn Tool>>) -> ToolRegistry {
    let mut registry = ToolRegistry::new();
    for tool in tools {
        registry.register(tool, ExecutionPolicy::NonInteractive);
    }
    registry
}

/// Definition with a string-valued `result` output argument.
pub fn definition(tool_names: &[&str], max_turns: u32) -> AgentDefinition {
    definition_with(
        tool_names,
        RunConfig {
            max_turns,
            max_time_minutes: 10.0,
        },
        Some(string_output("result")),
    )
}

pub fn definition_with(
    tool_names: &[&str],
    run_config: RunConfig,
    output_config: Option<OutputConfig>,
) -> AgentDefinition {
    AgentDefinition::builder()
        .name("test-agent".to_string())
        .description("exercises the engine".to_string())
        .model_config(ModelConfig::new("scripted-model"))
        .run_config(run_config)
        .prompt_config(PromptConfig::new("Accomplish the goal."))
        .tool_config(tool_names.iter().map(|s| s.to_string()).collect())
        .maybe_output_config(output_config)
        .build()
}

pub fn string_output(name: &str) -> OutputConfig {
    OutputConfig {
        name: name.to_string(),
        description: "the final answer".to_string(),
        schema: serde_json::json!({ "type": "string" }),
    }
}
