//! Order-independent structural equality for JSON property trees.
//!
//! Mapping keys are order-insensitive (CloudFormation tooling frequently
//! re-serializes templates with keys in a different order); list order is
//! preserved since it is frequently semantic (security group rules, IAM
//! statements).

use serde_json::Value;

/// Returns true when `a` and `b` are equal once mapping keys are treated as
/// unordered.
pub fn canonically_equal(a: &Value, b: &Value) -> bool {
    canonicalize(a) == canonicalize(b)
}

fn canonicalize(value: &Value) -> Value {
    match value {
        Value::Object(map) => {
            let mut sorted = serde_json::Map::new();
            let mut keys: Vec<&String> = map.keys().collect();
            keys.sort();
            for key in keys {
                sorted.insert(key.clone(), canonicalize(&map[key]));
            }
            Value::Object(sorted)
        }
        Value::Array(items) => Value::Array(items.iter().map(canonicalize).collect()),
        other => other.clone(),
    }
}
