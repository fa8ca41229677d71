//! UI Components
//!
//! Reusable Leptos components shared by both app variants.

mod error_banner;
mod filter_bar;
mod todo_input;
mod todo_item;

pub use error_banner::ErrorBanner;
pub use filter_bar::FilterBar;
pub use todo_input::TodoInput;
pub use todo_item::TodoItem;
