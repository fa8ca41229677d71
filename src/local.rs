//! Local Todo App
//!
//! Local-state variant: synchronous in-memory mutations mirrored wholesale
//! to `localStorage` after every change. No network, no rollback.

use leptos::prelude::*;
use serde_json::Value;

use crate::components::{FilterBar, TodoInput, TodoItem};
use crate::filters::{active_count, filtered_todos, Filter};
use crate::models::Todo;
use crate::storage;

/// Reactive todo collection persisted in the browser
#[derive(Clone, Copy)]
pub struct LocalTodos {
    pub todos: RwSignal<Vec<Todo>>,
    /// Transient buffer backing the inline-edit input.
    pub edit_text: RwSignal<String>,
}

impl LocalTodos {
    /// Read the persisted collection once at startup.
    pub fn load() -> Self {
        Self {
            todos: RwSignal::new(storage::load_todos()),
            edit_text: RwSignal::new(String::new()),
        }
    }

    fn persist(&self) {
        self.todos.with_untracked(|todos| storage::save_todos(todos));
    }

    /// Prepend a new record with a timestamp-derived id.
    pub fn add(&self, raw_title: &str) {
        let title = raw_title.trim();
        if title.is_empty() {
            return;
        }
        let stamp = js_sys::Date::now();
        let todo = Todo {
            id: stamp as u64,
            title: title.to_string(),
            completed: false,
            created_at: Some(Value::from(stamp)),
            editing: false,
        };
        self.todos.update(|todos| todos.insert(0, todo));
        self.persist();
    }

    pub fn toggle(&self, id: u64) {
        self.todos.update(|todos| {
            if let Some(todo) = todos.iter_mut().find(|todo| todo.id == id) {
                todo.completed = !todo.completed;
            }
        });
        self.persist();
    }

    /// Apply a trimmed title and leave edit mode; an empty title cancels.
    pub fn rename(&self, id: u64, raw_title: &str) {
        let title = raw_title.trim().to_string();
        if title.is_empty() {
            self.cancel_edit(id);
            return;
        }
        self.todos.update(|todos| {
            if let Some(todo) = todos.iter_mut().find(|todo| todo.id == id && todo.editing) {
                todo.title = title;
                todo.editing = false;
            }
        });
        self.persist();
    }

    pub fn remove(&self, id: u64) {
        self.todos.update(|todos| todos.retain(|todo| todo.id != id));
        self.persist();
    }

    pub fn clear_completed(&self) {
        self.todos.update(|todos| todos.retain(|todo| !todo.completed));
        self.persist();
    }

    pub fn start_edit(&self, id: u64) {
        let current = self.todos.with_untracked(|todos| {
            todos
                .iter()
                .find(|todo| todo.id == id)
                .map(|todo| todo.title.clone())
        });
        let Some(current) = current else { return };
        self.edit_text.set(current);
        self.todos.update(|todos| {
            if let Some(todo) = todos.iter_mut().find(|todo| todo.id == id) {
                todo.editing = true;
            }
        });
    }

    pub fn cancel_edit(&self, id: u64) {
        self.todos.update(|todos| {
            if let Some(todo) = todos.iter_mut().find(|todo| todo.id == id) {
                todo.editing = false;
            }
        });
        self.edit_text.set(String::new());
    }
}

/// Local-storage-backed variant
#[component]
pub fn LocalTodoApp() -> impl IntoView {
    let todos = LocalTodos::load();
    let filter = RwSignal::new(Filter::All);
    let new_title = RwSignal::new(String::new());

    let visible = Memo::new(move |_| filtered_todos(&todos.todos.get(), filter.get()));
    let remaining = Memo::new(move |_| active_count(&todos.todos.get()));
    let has_completed = Memo::new(move |_| todos.todos.get().iter().any(|todo| todo.completed));

    let on_submit = move || {
        todos.add(&new_title.get_untracked());
        new_title.set(String::new());
    };

    view! {
        <div class="todoapp">
            <h1>"Todos"</h1>

            <TodoInput value=new_title on_submit=on_submit />

            <ul class="todo-list">
                <For
                    each=move || visible.get()
                    key=|todo| (todo.id, todo.title.clone(), todo.completed, todo.editing)
                    children=move |todo| {
                        view! {
                            <TodoItem
                                todo=todo
                                edit_text=todos.edit_text
                                on_toggle=move |id: u64| todos.toggle(id)
                                on_remove=move |id: u64| todos.remove(id)
                                on_start_edit=move |id: u64| todos.start_edit(id)
                                on_save=move |(id, text): (u64, String)| todos.rename(id, &text)
                                on_cancel=move |id: u64| todos.cancel_edit(id)
                            />
                        }
                    }
                />
            </ul>

            <FilterBar
                filter=filter
                active_count=remaining
                has_completed=has_completed
                on_clear_completed=move || todos.clear_completed()
            />
        </div>
    }
}
