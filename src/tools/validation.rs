//! Validate call arguments against a JSON Schema before execution.

/// Validate an argument bag against a tool's JSON Schema.
///
/// Top-level validation only: the args must be an object when the schema
/// says so, every `required` field must be present, and declared property
/// types must match. Returns the first violation found.
pub fn validate_arguments(
    args: &serde_json::Value,
    schema: &serde_json::Value,
) -> Result<(), String> {
    let expects_object = schema.get("type").and_then(|v| v.as_str()) == Some("object");
    let obj = match (args.as_object(), expects_object) {
        (Some(obj), _) => obj,
        (None, true) => {
            return Err(format!(
                "expected object arguments, got {}",
                json_type_name(args)
            ))
        }
        (None, false) => return Ok(()),
    };

    if let Some(required) = schema.get("required").and_then(|v| v.as_array()) {
        for name in required.iter().filter_map(|f| f.as_str()) {
            if !obj.contains_key(name) {
                return Err(format!("missing required field '{name}'"));
            }
        }
    }

    let Some(properties) = schema.get("properties").and_then(|v| v.as_object()) else {
        return Ok(());
    };
    for (key, value) in obj {
        let Some(expected) = properties
            .get(key)
            .and_then(|p| p.get("type"))
            .and_then(|t| t.as_str())
        else {
            continue;
        };
        if !value_matches_type(value, expected) {
            return Err(format!(
                "field '{}' expected type '{}', got {}",
                key,
                expected,
                json_type_name(value)
            ));
        }
    }

    Ok(())
}

fn value_matches_type(value: &serde_json::Value, expected: &str) -> bool {
    match expected {
        "string" => value.is_string(),
        // Integers are valid numbers, but not vice versa.
        "number" => value.is_number(),
        "integer" => value.is_i64() || value.is_u64(),
        "boolean" => value.is_boolean(),
        "object" => value.is_object(),
        "array" => value.is_array(),
        "null" => value.is_null(),
        _ => true,
    }
}

fn json_type_name(value: &serde_json::Value) -> &'static str {
    match value {
        serde_json::Value::Null => "null",
        serde_json::Value::Bool(_) => "boolean",
        serde_json::Value::Number(_) => "number",
        serde_json::Value::String(_) => "string",
        serde_json::Value::Array(_) => "array",
        serde_json::Value::Object(_) => "object",
    }
}
