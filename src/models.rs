//! Todo Model
//!
//! The task record plus the normalization applied to every raw payload
//! (remote responses and the persisted local collection).

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A single task record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Todo {
    pub id: u64,
    #[serde(alias = "text")]
    pub title: String,
    #[serde(default)]
    pub completed: bool,
    /// Opaque creation stamp, kept only for provenance. Not a sort key.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<Value>,
    /// Transient inline-edit flag. Never persisted, never sent.
    #[serde(skip)]
    pub editing: bool,
}

/// Build a record from an arbitrary JSON payload.
///
/// Total over any input: `title` falls back to the legacy `text` field and
/// then to an empty string, `completed` is coerced with JS truthiness, and
/// the edit flag is always reset.
pub fn normalize_todo(raw: &Value) -> Todo {
    let title = raw
        .get("title")
        .and_then(Value::as_str)
        .or_else(|| raw.get("text").and_then(Value::as_str))
        .unwrap_or_default()
        .to_string();

    Todo {
        id: raw.get("id").and_then(Value::as_u64).unwrap_or(0),
        title,
        completed: coerce_bool(raw.get("completed")),
        created_at: raw
            .get("createdAt")
            .filter(|stamp| !stamp.is_null())
            .cloned(),
        editing: false,
    }
}

/// Normalize a full collection payload.
///
/// The service replies either with a bare array or with `{"todos": [...]}`;
/// anything else yields an empty collection.
pub fn normalize_todos(raw: &Value) -> Vec<Todo> {
    let items: &[Value] = match raw {
        Value::Array(items) => items,
        Value::Object(map) => match map.get("todos") {
            Some(Value::Array(items)) => items,
            _ => &[],
        },
        _ => &[],
    };
    items.iter().map(normalize_todo).collect()
}

fn coerce_bool(raw: Option<&Value>) -> bool {
    match raw {
        Some(Value::Bool(flag)) => *flag,
        Some(Value::Number(number)) => number.as_f64().unwrap_or(0.0) != 0.0,
        Some(Value::String(text)) => !text.is_empty(),
        _ => false,
    }
}
