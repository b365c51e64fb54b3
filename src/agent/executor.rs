//! Turn loop: drives one agent run to a single terminal outcome.

use std::sync::Arc;
use std::time::Duration;

use tokio::time::Instant;
use tokio_util::sync::CancellationToken;
use uuid::Uuid;

use super::catalog::IsolatedCatalog;
use super::completion::{CompletionHandler, CompletionOutcome};
use super::definition::{AgentDefinition, AgentInputs};
use super::dispatch::{all_failed, dispatch};
use super::events::{ActivityEmitter, ActivitySink};
use super::stream::StreamProcessor;
use super::types::{AgentOutput, TerminateReason};
use crate::config::DroverConfig;
use crate::error::Result;
use crate::provider::{ModelTransport, TurnRequest};
use crate::tools::registry::ToolRegistry;
use crate::types::{ModelMessage, ToolCallRequest, ToolCallResult};

const PROTOCOL_VIOLATION: &str =
    "Model stopped without calling a tool or submitting a result.";
const ALL_FAILED_FEEDBACK: &str = "All tool calls in the previous turn failed or were denied. \
     Reconsider the approach and try a different strategy.";
const GOAL_FALLBACK: &str = "Goal achieved.";
const ABORTED_RESULT: &str = "Run aborted before completion.";

/// Drives one agent definition through one run.
///
/// Construction performs the fatal authorization check; `run` consumes the
/// executor, so a second run requires a new instance.
pub struct AgentExecutor {
    definition: AgentDefinition,
    transport: Arc<dyn ModelTransport>,
    catalog: Arc<IsolatedCatalog>,
    emitter: ActivityEmitter,
    config: DroverConfig,
}

impl std::fmt::Debug for AgentExecutor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AgentExecutor")
            .field("catalog", &self.catalog)
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl AgentExecutor {
    /// Create an executor, authorizing the definition's tools against the
    /// registry's non-interactive allow-list. Fails on any tool that is
    /// unregistered or needs human confirmation.
    pub fn new(
        definition: AgentDefinition,
        transport: Arc<dyn ModelTransport>,
        registry: &ToolRegistry,
        sink: Option<ActivitySink>,
    ) -> Result<Self> {
        Self::with_config(definition, transport, registry, sink, DroverConfig::default())
    }

    pub fn with_config(
        definition: AgentDefinition,
        transport: Arc<dyn ModelTransport>,
        registry: &ToolRegistry,
        sink: Option<ActivitySink>,
        config: DroverConfig,
    ) -> Result<Self> {
        let catalog = Arc::new(IsolatedCatalog::build(registry, &definition.tool_config)?);
        Ok(Self {
            definition,
            transport,
            catalog,
            emitter: ActivityEmitter::new(sink),
            config,
        })
    }

    pub fn definition(&self) -> &AgentDefinition {
        &self.definition
    }

    /// Run the agent to a terminal outcome.
    ///
    /// Only input/construction-class failures and stream-retry exhaustion
    /// surface as `Err`; every other outcome, including timeout and abort,
    /// resolves into a well-formed [`AgentOutput`].
    pub async fn run(self, inputs: AgentInputs, signal: CancellationToken) -> Result<AgentOutput> {
        self.definition.validate_inputs(&inputs)?;
        let system_prompt = self.definition.render_system_prompt(&inputs)?;

        let mut completion = CompletionHandler::new(self.definition.output_config.clone());
        let processor = StreamProcessor::new(
            self.transport.clone(),
            self.catalog.clone(),
            self.emitter.clone(),
            self.config.retry_policy(),
        );
        let mut tools = self.catalog.declarations();
        tools.push(completion.declaration());

        let run = &self.definition.run_config;
        let budget = Duration::from_secs_f64(run.max_time_minutes * 60.0);
        let started = Instant::now();
        let prompt_id = Uuid::new_v4().to_string();
        tracing::debug!(agent = %self.definition.name, %prompt_id, "agent run start");

        let mut history = vec![ModelMessage::system(system_prompt)];
        let mut checkpoint = history.len();
        history.push(ModelMessage::user(format!(
            "Begin working on the goal now. Use the available tools, then call '{}' with \
             your result when done.",
            completion.tool_name()
        )));
        let mut turn: u32 = 0;

        loop {
            if signal.is_cancelled() {
                return Ok(self.finish(TerminateReason::Aborted, ABORTED_RESULT.to_string()));
            }
            if started.elapsed() >= budget {
                return Ok(self.finish(
                    TerminateReason::Timeout,
                    format!(
                        "Run exceeded the time limit of {} minutes before completing the goal.",
                        run.max_time_minutes
                    ),
                ));
            }
            if turn >= run.max_turns {
                return Ok(self.finish(
                    TerminateReason::MaxTurns,
                    format!(
                        "Run reached the limit of {} turns before completing the goal.",
                        run.max_turns
                    ),
                ));
            }

            let request = TurnRequest {
                model: self.definition.model_config.model.clone(),
                messages: history.clone(),
                tools: tools.clone(),
                temperature: self.definition.model_config.temperature,
                top_p: self.definition.model_config.top_p,
                prompt_id: prompt_id.clone(),
            };
            tracing::debug!(turn, "agent turn start");
            let response = match processor.send(&request).await {
                Ok(response) => response,
                Err(e) => {
                    // The turn never happened as far as the conversation is
                    // concerned.
                    history.truncate(checkpoint);
                    return Err(e);
                }
            };
            // Abort may have fired while the stream was in flight; the
            // partial turn is discarded without entering history.
            if signal.is_cancelled() {
                return Ok(self.finish(TerminateReason::Aborted, ABORTED_RESULT.to_string()));
            }

            history.push(ModelMessage::assistant_turn(
                &response.text,
                &response.tool_calls,
            ));

            if response.tool_calls.is_empty() {
                // Act-or-finish violation. Fixed policy: terminate at once
                // rather than nudging the model into another turn.
                self.emitter.error("protocol", None, PROTOCOL_VIOLATION);
                return Ok(self.finish(TerminateReason::Error, PROTOCOL_VIOLATION.to_string()));
            }

            let calls = response.tool_calls;
            let finish_mask: Vec<bool> =
                calls.iter().map(|c| completion.matches(&c.name)).collect();
            let work: Vec<(usize, ToolCallRequest)> = calls
                .iter()
                .enumerate()
                .filter(|(i, _)| !finish_mask[*i])
                .map(|(i, c)| (i, c.clone()))
                .collect();
            let work_requests: Vec<ToolCallRequest> =
                work.iter().map(|(_, c)| c.clone()).collect();
            let work_results =
                dispatch(&self.catalog, &work_requests, &self.emitter, &signal).await;

            let mut slots: Vec<Option<ToolCallResult>> =
                calls.iter().map(|_| None).collect();
            for ((index, _), result) in work.iter().zip(work_results) {
                slots[*index] = Some(result);
            }

            let mut accepted: Option<Option<String>> = None;
            for (index, call) in calls.iter().enumerate() {
                if !finish_mask[index] {
                    continue;
                }
                match completion.handle(call, &self.emitter) {
                    CompletionOutcome::Accepted { value, feedback } => {
                        if accepted.is_none() {
                            accepted = Some(value);
                        }
                        slots[index] = Some(feedback);
                    }
                    CompletionOutcome::Rejected { feedback } => {
                        slots[index] = Some(feedback);
                    }
                }
            }

            if let Some(value) = accepted {
                let result = value
                    .or_else(|| {
                        let text = response.text.trim();
                        (!text.is_empty()).then(|| text.to_string())
                    })
                    .unwrap_or_else(|| GOAL_FALLBACK.to_string());
                return Ok(self.finish(TerminateReason::Goal, result));
            }

            let results: Vec<ToolCallResult> = slots.into_iter().flatten().collect();
            let turn_had_finish_call = finish_mask.iter().any(|m| *m);

            checkpoint = history.len();
            if !turn_had_finish_call && all_failed(&results) {
                history.push(ModelMessage::user(ALL_FAILED_FEEDBACK));
            } else {
                for result in results {
                    history.push(ModelMessage::tool_result(result));
                }
            }
            turn += 1;
        }
    }

    fn finish(&self, reason: TerminateReason, result: String) -> AgentOutput {
        tracing::debug!(agent = %self.definition.name, reason = %reason, "agent run finished");
        AgentOutput {
            result,
            terminate_reason: reason,
        }
    }
}
