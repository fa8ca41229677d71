//! Remote Todo App
//!
//! Remote-state variant: the list is a client-side cache of the REST
//! service, mutated optimistically through [`RemoteTodos`].

use leptos::prelude::*;
use leptos::task::spawn_local;

use crate::api::ApiClient;
use crate::components::{ErrorBanner, FilterBar, TodoInput, TodoItem};
use crate::controller::RemoteTodos;
use crate::filters::{active_count, filtered_todos, Filter};

/// REST-backed variant
#[component]
pub fn RemoteTodoApp() -> impl IntoView {
    let ctrl = RemoteTodos::new(ApiClient);
    let filter = RwSignal::new(Filter::All);
    let new_title = RwSignal::new(String::new());

    // Initial load; failures raise the banner, which offers retry.
    spawn_local(async move {
        let _ = ctrl.load().await;
    });

    let visible = Memo::new(move |_| filtered_todos(&ctrl.todos.get(), filter.get()));
    let remaining = Memo::new(move |_| active_count(&ctrl.todos.get()));
    let has_completed = Memo::new(move |_| ctrl.todos.get().iter().any(|todo| todo.completed));

    // Clear the input only after the server confirmed the add, so a failure
    // keeps the text for retry.
    let on_submit = move || {
        let title = new_title.get_untracked();
        spawn_local(async move {
            if ctrl.add(&title).await.is_ok() {
                new_title.set(String::new());
            }
        });
    };

    view! {
        <div class="todoapp">
            <h1>"Todos"</h1>

            <ErrorBanner
                error=ctrl.load_error
                on_retry=move || {
                    spawn_local(async move {
                        let _ = ctrl.load().await;
                    });
                }
            />

            <TodoInput value=new_title on_submit=on_submit />

            <ul class="todo-list">
                <For
                    each=move || visible.get()
                    key=|todo| (todo.id, todo.title.clone(), todo.completed, todo.editing)
                    children=move |todo| {
                        view! {
                            <TodoItem
                                todo=todo
                                edit_text=ctrl.edit_text
                                on_toggle=move |id: u64| {
                                    spawn_local(async move {
                                        let _ = ctrl.toggle(id).await;
                                    });
                                }
                                on_remove=move |id: u64| {
                                    spawn_local(async move {
                                        let _ = ctrl.remove(id).await;
                                    });
                                }
                                on_start_edit=move |id: u64| ctrl.start_edit(id)
                                on_save=move |(id, text): (u64, String)| {
                                    spawn_local(async move {
                                        let _ = ctrl.rename(id, &text).await;
                                    });
                                }
                                on_cancel=move |id: u64| ctrl.cancel_edit(id)
                            />
                        }
                    }
                />
            </ul>

            <FilterBar
                filter=filter
                active_count=remaining
                has_completed=has_completed
                on_clear_completed=move || {
                    spawn_local(async move {
                        let _ = ctrl.clear_completed().await;
                    });
                }
            />
        </div>
    }
}
