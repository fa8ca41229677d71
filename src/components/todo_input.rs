//! Todo Input Component
//!
//! Controlled input for new todos. Empty or whitespace-only text never
//! dispatches; the parent decides when to clear the value, so a failed
//! remote add keeps the text for retry.

use leptos::prelude::*;

/// Form for creating new todos
#[component]
pub fn TodoInput(
    value: RwSignal<String>,
    #[prop(into)] on_submit: Callback<()>,
) -> impl IntoView {
    let submit = move |ev: web_sys::SubmitEvent| {
        ev.prevent_default();
        if value.get().trim().is_empty() {
            return;
        }
        on_submit.run(());
    };

    view! {
        <form class="todo-input" on:submit=submit>
            <input
                type="text"
                placeholder="What needs to be done?"
                prop:value=move || value.get()
                on:input=move |ev| value.set(event_target_value(&ev))
            />
            <button type="submit">"Add"</button>
        </form>
    }
}
