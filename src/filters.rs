//! Derived Views
//!
//! Pure projections of the todo collection. Nothing here mutates state.

use crate::models::Todo;

/// Status filter applied to the visible list
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Filter {
    #[default]
    All,
    Active,
    Completed,
}

impl Filter {
    pub const ALL: [Filter; 3] = [Filter::All, Filter::Active, Filter::Completed];

    pub fn label(&self) -> &'static str {
        match self {
            Filter::All => "All",
            Filter::Active => "Active",
            Filter::Completed => "Completed",
        }
    }
}

/// Project the collection through a filter, preserving order.
pub fn filtered_todos(todos: &[Todo], filter: Filter) -> Vec<Todo> {
    match filter {
        Filter::All => todos.to_vec(),
        Filter::Active => todos.iter().filter(|todo| !todo.completed).cloned().collect(),
        Filter::Completed => todos.iter().filter(|todo| todo.completed).cloned().collect(),
    }
}

/// Number of not-yet-completed records.
pub fn active_count(todos: &[Todo]) -> usize {
    todos.iter().filter(|todo| !todo.completed).count()
}
