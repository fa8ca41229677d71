//! Local Persistence
//!
//! One `localStorage` slot holds the whole serialized collection. Read once
//! at startup, overwritten wholesale after every mutation.

use serde_json::Value;

use crate::models::{normalize_todos, Todo};

const STORAGE_KEY: &str = "todos";

/// Read the persisted collection, normalizing each entry.
///
/// Missing slot, unreadable storage, or a malformed payload all yield an
/// empty collection rather than an error.
pub fn load_todos() -> Vec<Todo> {
    let Some(window) = web_sys::window() else {
        return Vec::new();
    };
    let Ok(Some(storage)) = window.local_storage() else {
        return Vec::new();
    };
    let Ok(Some(raw)) = storage.get_item(STORAGE_KEY) else {
        return Vec::new();
    };
    match serde_json::from_str::<Value>(&raw) {
        Ok(parsed) => normalize_todos(&parsed),
        Err(err) => {
            leptos::logging::error!("[STORAGE] discarding malformed todos: {}", err);
            Vec::new()
        }
    }
}

/// Overwrite the persisted collection. Quota failures are logged, not fatal.
pub fn save_todos(todos: &[Todo]) {
    let Some(window) = web_sys::window() else {
        return;
    };
    let Ok(Some(storage)) = window.local_storage() else {
        leptos::logging::error!("[STORAGE] local storage is unavailable");
        return;
    };
    match serde_json::to_string(todos) {
        Ok(serialized) => {
            if storage.set_item(STORAGE_KEY, &serialized).is_err() {
                leptos::logging::error!("[STORAGE] failed to persist todos");
            }
        }
        Err(err) => leptos::logging::error!("[STORAGE] failed to serialize todos: {}", err),
    }
}
