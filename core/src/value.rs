use serde::Serialize;
use serde_json::Value;

use crate::error::SyncError;

/// Convert a desired value into the wire string the remote store keeps.
///
/// Primitives keep their plain text form (a string stays as-is, without
/// added quotes); anything structured becomes canonical JSON text. The
/// conversion is pure and deterministic for a given input.
pub fn to_wire<T: Serialize>(value: &T) -> Result<String, SyncError> {
    let value = serde_json::to_value(value).map_err(|e| SyncError::UnserializableValue {
        reason: e.to_string(),
    })?;

    match value {
        Value::String(s) => Ok(s),
        Value::Bool(b) => Ok(b.to_string()),
        Value::Number(n) => Ok(n.to_string()),
        Value::Null => Ok("null".to_string()),
        composite => serde_json::to_string(&composite).map_err(|e| {
            SyncError::UnserializableValue {
                reason: e.to_string(),
            }
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;
    use std::collections::HashMap;

    #[test]
    fn string_passes_through_unquoted() {
        assert_eq!(to_wire(&"us-east-1").unwrap(), "us-east-1");
    }

    #[test]
    fn primitives_keep_plain_text_form() {
        assert_eq!(to_wire(&42).unwrap(), "42");
        assert_eq!(to_wire(&true).unwrap(), "true");
        assert_eq!(to_wire(&json!(null)).unwrap(), "null");
    }

    #[test]
    fn object_becomes_canonical_json() {
        assert_eq!(
            to_wire(&json!({"hello": "world"})).unwrap(),
            r#"{"hello":"world"}"#
        );
    }

    #[test]
    fn nested_structures_serialize_whole() {
        let value = json!({"regions": ["us-east-1", "eu-west-1"], "count": 2});
        assert_eq!(
            to_wire(&value).unwrap(),
            r#"{"count":2,"regions":["us-east-1","eu-west-1"]}"#
        );
    }

    #[test]
    fn deterministic_for_equal_inputs() {
        let value = json!({"b": 1, "a": 2});
        assert_eq!(to_wire(&value).unwrap(), to_wire(&value.clone()).unwrap());
    }

    #[test]
    fn rejects_values_without_json_form() {
        let unrepresentable: HashMap<(u8, u8), &str> = HashMap::from([((1, 2), "x")]);
        let err = to_wire(&unrepresentable).unwrap_err();
        assert!(matches!(err, SyncError::UnserializableValue { .. }));
    }
}
