//! Typed access to tool call arguments.

use crate::error::DroverError;

/// Wrapper around a tool call's argument bag providing typed extraction.
#[derive(Debug, Clone)]
pub struct ToolArguments {
    value: serde_json::Value,
}

impl ToolArguments {
    pub fn new(value: serde_json::Value) -> Self {
        Self { value }
    }

    /// Get the raw JSON value.
    pub fn raw(&self) -> &serde_json::Value {
        &self.value
    }

    /// Get a string argument by key.
    pub fn get_str(&self, key: &str) -> Result<&str, DroverError> {
        self.value
            .get(key)
            .and_then(|v| v.as_str())
            .ok_or_else(|| DroverError::InvalidArgument(format!("Missing string argument: {key}")))
    }

    /// Get an optional string argument.
    pub fn get_str_opt(&self, key: &str) -> Option<&str> {
        self.value.get(key).and_then(|v| v.as_str())
    }

    /// Get an integer argument.
    pub fn get_i64(&self, key: &str) -> Result<i64, DroverError> {
        self.value
            .get(key)
            .and_then(|v| v.as_i64())
            .ok_or_else(|| DroverError::InvalidArgument(format!("Missing integer argument: {key}")))
    }

    /// Get a float argument.
    pub fn get_f64(&self, key: &str) -> Result<f64, DroverError> {
        self.value
            .get(key)
            .and_then(|v| v.as_f64())
            .ok_or_else(|| DroverError::InvalidArgument(format!("Missing float argument: {key}")))
    }

    /// Get a boolean argument.
    pub fn get_bool(&self, key: &str) -> Result<bool, DroverError> {
        self.value
            .get(key)
            .and_then(|v| v.as_bool())
            .ok_or_else(|| DroverError::InvalidArgument(format!("Missing boolean argument: {key}")))
    }

    /// Deserialize the entire argument bag into a typed struct.
    pub fn deserialize<T: serde::de::DeserializeOwned>(&self) -> Result<T, DroverError> {
        serde_json::from_value(self.value.clone()).map_err(|e| {
            DroverError::InvalidArgument(format!("Failed to deserialize arguments: {e}"))
        })
    }
}
