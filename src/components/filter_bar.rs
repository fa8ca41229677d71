//! Filter Bar Component
//!
//! Status filter buttons, the remaining-items count, and bulk clear.

use leptos::prelude::*;

use crate::filters::Filter;

/// Footer bar with filters and the clear-completed action
#[component]
pub fn FilterBar(
    filter: RwSignal<Filter>,
    #[prop(into)] active_count: Signal<usize>,
    #[prop(into)] has_completed: Signal<bool>,
    #[prop(into)] on_clear_completed: Callback<()>,
) -> impl IntoView {
    let remaining = move || {
        let count = active_count.get();
        let noun = if count == 1 { "item" } else { "items" };
        format!("{} {} left", count, noun)
    };

    view! {
        <footer class="filter-bar">
            <span class="todo-count">{remaining}</span>

            <div class="filter-buttons">
                {Filter::ALL.iter().map(|mode| {
                    let mode = *mode;
                    let is_active = move || filter.get() == mode;
                    view! {
                        <button
                            class=move || if is_active() { "filter-btn active" } else { "filter-btn" }
                            on:click=move |_| filter.set(mode)
                        >
                            {mode.label()}
                        </button>
                    }
                }).collect_view()}
            </div>

            <Show when=move || has_completed.get()>
                <button
                    class="clear-completed-btn"
                    on:click=move |_| on_clear_completed.run(())
                >
                    "Clear completed"
                </button>
            </Show>
        </footer>
    }
}
