//! Todo Item Component
//!
//! A single row: checkbox, double-click inline editing, delete button.
//! Dispatches intents through callbacks and never mutates the record itself.

use leptos::prelude::*;

use crate::models::Todo;

/// A single todo row
#[component]
pub fn TodoItem(
    todo: Todo,
    /// Shared buffer backing the inline-edit input.
    edit_text: RwSignal<String>,
    #[prop(into)] on_toggle: Callback<u64>,
    #[prop(into)] on_remove: Callback<u64>,
    #[prop(into)] on_start_edit: Callback<u64>,
    #[prop(into)] on_save: Callback<(u64, String)>,
    #[prop(into)] on_cancel: Callback<u64>,
) -> impl IntoView {
    let id = todo.id;
    let completed = todo.completed;
    let editing = todo.editing;
    let title = todo.title.clone();

    let row_class = if completed { "todo-row completed" } else { "todo-row" };

    view! {
        <li class=row_class>
            {if editing {
                view! {
                    <input
                        type="text"
                        class="edit-input"
                        autofocus=true
                        prop:value=move || edit_text.get()
                        on:input=move |ev| edit_text.set(event_target_value(&ev))
                        on:keydown=move |ev: web_sys::KeyboardEvent| {
                            match ev.key().as_str() {
                                "Enter" => {
                                    ev.prevent_default();
                                    on_save.run((id, edit_text.get_untracked()));
                                }
                                "Escape" => on_cancel.run(id),
                                _ => {}
                            }
                        }
                        on:blur=move |_| on_save.run((id, edit_text.get_untracked()))
                    />
                }.into_any()
            } else {
                view! {
                    <input
                        type="checkbox"
                        checked=completed
                        on:change=move |_| on_toggle.run(id)
                    />
                    <span
                        class="todo-title"
                        on:dblclick=move |_| on_start_edit.run(id)
                    >
                        {title}
                    </span>
                    <button class="delete-btn" on:click=move |_| on_remove.run(id)>"×"</button>
                }.into_any()
            }}
        </li>
    }
}
