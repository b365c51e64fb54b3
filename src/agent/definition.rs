//! Agent definitions: what an agent is allowed to do and how it is prompted.

use std::collections::HashMap;

use bon::Builder;
use regex::Regex;
use serde::{Deserialize, Serialize};
use strum::Display;

use crate::error::{DroverError, Result};

/// Values supplied by the caller when starting a run.
///
/// Restricted to scalars; anything structured belongs in the prompt itself.
pub type AgentInputs = HashMap<String, serde_json::Value>;

/// Accepted scalar type of a declared input.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Display)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum InputType {
    String,
    Number,
    Integer,
    Boolean,
}

impl InputType {
    fn matches(&self, value: &serde_json::Value) -> bool {
        match self {
            Self::String => value.is_string(),
            Self::Number => value.is_number(),
            Self::Integer => value.is_i64() || value.is_u64(),
            Self::Boolean => value.is_boolean(),
        }
    }
}

/// One declared input of an agent.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InputSpec {
    pub name: String,
    pub description: String,
    #[serde(rename = "type")]
    pub ty: InputType,
    pub required: bool,
}

/// Model selection and sampling parameters.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelConfig {
    pub model: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub top_p: Option<f64>,
}

impl ModelConfig {
    pub fn new(model: impl Into<String>) -> Self {
        Self {
            model: model.into(),
            temperature: None,
            top_p: None,
        }
    }
}

/// Hard limits on a single run.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct RunConfig {
    pub max_turns: u32,
    pub max_time_minutes: f64,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            max_turns: 16,
            max_time_minutes: 10.0,
        }
    }
}

/// System prompt template. `${name}` placeholders are resolved from inputs.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PromptConfig {
    pub system_prompt: String,
}

impl PromptConfig {
    pub fn new(system_prompt: impl Into<String>) -> Self {
        Self {
            system_prompt: system_prompt.into(),
        }
    }
}

/// Shape of the finish-tool argument. When absent, the finish tool takes
/// no argument.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputConfig {
    /// Property name the model must supply the value under.
    pub name: String,
    pub description: String,
    /// JSON Schema for the value.
    pub schema: serde_json::Value,
}

/// Immutable description of an agent, supplied by the caller.
#[derive(Debug, Clone, Builder, Serialize, Deserialize)]
pub struct AgentDefinition {
    pub name: String,
    pub description: String,
    #[builder(default)]
    pub inputs: Vec<InputSpec>,
    pub model_config: ModelConfig,
    #[builder(default)]
    pub run_config: RunConfig,
    pub prompt_config: PromptConfig,
    #[builder(default)]
    pub tool_config: Vec<String>,
    pub output_config: Option<OutputConfig>,
}

impl AgentDefinition {
    /// Check supplied inputs against the declared schema.
    ///
    /// Runs before anything else in a run; a violation here is fatal and
    /// no model or tool call is ever issued.
    pub fn validate_inputs(&self, inputs: &AgentInputs) -> Result<()> {
        for spec in &self.inputs {
            match inputs.get(&spec.name) {
                None if spec.required => {
                    return Err(DroverError::InvalidInput(format!(
                        "missing required input '{}'",
                        spec.name
                    )));
                }
                None => {}
                Some(value) => {
                    if !spec.ty.matches(value) {
                        return Err(DroverError::InvalidInput(format!(
                            "input '{}' expected a {} value",
                            spec.name, spec.ty
                        )));
                    }
                }
            }
        }
        for name in inputs.keys() {
            if !self.inputs.iter().any(|spec| &spec.name == name) {
                return Err(DroverError::InvalidInput(format!(
                    "unknown input '{name}'"
                )));
            }
        }
        Ok(())
    }

    /// Resolve the system prompt template against the supplied inputs.
    pub fn render_system_prompt(&self, inputs: &AgentInputs) -> Result<String> {
        let mut prompt = self.prompt_config.system_prompt.clone();
        for (name, value) in inputs {
            let rendered = match value {
                serde_json::Value::String(s) => s.clone(),
                other => other.to_string(),
            };
            prompt = prompt.replace(&format!("${{{name}}}"), &rendered);
        }

        let placeholder = Regex::new(r"\$\{([A-Za-z0-9_]+)\}")
            .map_err(|e| DroverError::Configuration(e.to_string()))?;
        if let Some(unresolved) = placeholder.captures(&prompt) {
            return Err(DroverError::Configuration(format!(
                "unresolved placeholder '${{{}}}' in system prompt",
                &unresolved[1]
            )));
        }
        Ok(prompt)
    }
}
