use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A CI variable as reported by the remote project.
///
/// Only `key` and `value` are interpreted here. Whatever else the remote
/// attaches to a variable (`protected`, `masked`, `variable_type`, ...) is
/// carried opaquely in `extra` and round-tripped as-is.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Variable {
    /// Natural primary key, unique within a project, case-sensitive.
    pub key: String,
    /// Wire form of the value after serialization.
    pub value: String,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, Value>,
}

/// Request body for variable create and update calls.
#[derive(Debug, Serialize)]
pub(crate) struct VariablePayload<'a> {
    pub key: &'a str,
    pub value: &'a str,
}
