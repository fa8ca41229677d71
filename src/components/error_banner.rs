//! Error Banner Component
//!
//! Persistent, dismissible banner for load/connectivity failures. Mutation
//! failures never show here; rollback is their only surface.

use leptos::prelude::*;

use crate::api::ApiError;

/// Connectivity banner with retry and dismiss actions
#[component]
pub fn ErrorBanner(
    error: RwSignal<Option<ApiError>>,
    #[prop(into)] on_retry: Callback<()>,
) -> impl IntoView {
    view! {
        <Show when=move || error.get().is_some()>
            <div class="error-banner">
                <span class="error-message">
                    {move || error.get().map(|err| err.to_string()).unwrap_or_default()}
                </span>
                <button class="retry-btn" on:click=move |_| on_retry.run(())>"Retry"</button>
                <button class="dismiss-btn" on:click=move |_| error.set(None)>"Dismiss"</button>
            </div>
        </Show>
    }
}
