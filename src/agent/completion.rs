//! Completion protocol: the synthetic tool a run ends through.

use serde_json::json;

use super::definition::OutputConfig;
use super::events::ActivityEmitter;
use crate::provider::ToolDeclaration;
use crate::tools::types::ToolParameters;
use crate::tools::validation::validate_arguments;
use crate::types::{ToolCallRequest, ToolCallResult};

/// Finish tool name when the definition does not override the protocol.
pub const FINISH_TOOL_NAME: &str = "complete_task";

/// What handling one finish call produced.
pub enum CompletionOutcome {
    /// The run result was captured; the loop should terminate with `Goal`.
    Accepted {
        /// Rendered result value; `None` when the finish tool is argument-less.
        value: Option<String>,
        feedback: ToolCallResult,
    },
    /// The call was rejected; feedback goes back to the model.
    Rejected { feedback: ToolCallResult },
}

/// Intercepts calls to the finish tool and enforces the submission rules:
/// first valid call wins, later calls in the same turn are duplicates, and
/// a malformed argument is a recoverable rejection rather than a run error.
pub struct CompletionHandler {
    output: Option<OutputConfig>,
    schema: serde_json::Value,
    submitted: bool,
}

impl CompletionHandler {
    pub fn new(output: Option<OutputConfig>) -> Self {
        let schema = match &output {
            Some(cfg) => {
                let mut properties = serde_json::Map::new();
                properties.insert(cfg.name.clone(), cfg.schema.clone());
                json!({
                    "type": "object",
                    "properties": properties,
                    "required": [cfg.name.clone()],
                })
            }
            None => ToolParameters::empty().schema,
        };
        Self {
            output,
            schema,
            submitted: false,
        }
    }

    pub fn tool_name(&self) -> &str {
        FINISH_TOOL_NAME
    }

    pub fn matches(&self, name: &str) -> bool {
        name == FINISH_TOOL_NAME
    }

    /// The synthetic declaration advertised alongside the real tools.
    pub fn declaration(&self) -> ToolDeclaration {
        let description = match &self.output {
            Some(cfg) => format!(
                "Call this to end the run, supplying '{}': {}",
                cfg.name, cfg.description
            ),
            None => "Call this once the goal is accomplished to end the run.".to_string(),
        };
        ToolDeclaration {
            name: FINISH_TOOL_NAME.to_string(),
            description,
            parameters: self.schema.clone(),
        }
    }

    /// Handle one call to the finish tool, in request order.
    pub fn handle(
        &mut self,
        request: &ToolCallRequest,
        emitter: &ActivityEmitter,
    ) -> CompletionOutcome {
        if self.submitted {
            emitter.error(
                "completion",
                Some(&request.name),
                "already submitted this turn",
            );
            return CompletionOutcome::Rejected {
                feedback: ToolCallResult::error(
                    request,
                    "A result was already submitted this turn; this duplicate call was ignored.",
                ),
            };
        }

        let value = match &self.output {
            Some(cfg) => {
                if let Err(violation) = validate_arguments(&request.args, &self.schema) {
                    return CompletionOutcome::Rejected {
                        feedback: ToolCallResult::error(
                            request,
                            format!(
                                "Invalid '{}' argument: {violation}. Call {FINISH_TOOL_NAME} \
                                 again with a valid value.",
                                cfg.name
                            ),
                        ),
                    };
                }
                let raw = request.args.get(&cfg.name).cloned().unwrap_or(json!(null));
                Some(match raw {
                    serde_json::Value::String(s) => s,
                    other => other.to_string(),
                })
            }
            None => None,
        };

        self.submitted = true;
        emitter.tool_end(&request.name, request.args.clone());
        CompletionOutcome::Accepted {
            value,
            feedback: ToolCallResult::ok(request, json!({ "status": "accepted" })),
        }
    }
}
