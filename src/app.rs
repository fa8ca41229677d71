//! Todo UI App
//!
//! Picks the deployment variant once at startup: local storage by default,
//! the REST-backed cache when the URL carries `?backend=api`. The two
//! variants are independent and never composed.

use leptos::prelude::*;

use crate::local::LocalTodoApp;
use crate::remote::RemoteTodoApp;

fn remote_backend_requested() -> bool {
    web_sys::window()
        .and_then(|window| window.location().search().ok())
        .map(|search| search.contains("backend=api"))
        .unwrap_or(false)
}

#[component]
pub fn App() -> impl IntoView {
    if remote_backend_requested() {
        view! { <RemoteTodoApp /> }.into_any()
    } else {
        view! { <LocalTodoApp /> }.into_any()
    }
}
