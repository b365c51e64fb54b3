//! Run outcome types.

use serde::{Deserialize, Serialize};
use strum::Display;

/// The closed set of terminal outcomes a run can end in.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Display)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum TerminateReason {
    /// The model called the finish tool with a valid result.
    Goal,
    /// The turn budget ran out first.
    MaxTurns,
    /// The wall-clock budget ran out first.
    Timeout,
    /// The caller's abort signal fired.
    Aborted,
    /// The model violated the act-or-finish protocol.
    Error,
}

/// Produced exactly once per run.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AgentOutput {
    pub result: String,
    pub terminate_reason: TerminateReason,
}

impl AgentOutput {
    pub fn new(result: impl Into<String>, terminate_reason: TerminateReason) -> Self {
        Self {
            result: result.into(),
            terminate_reason,
        }
    }
}
