//! Remote Mutation Controller
//!
//! Keeps the in-memory collection consistent with (or optimistically ahead
//! of) the remote service. Every mutation applies locally first, then adopts
//! the server's value on success or restores the exact prior state on
//! failure.

use leptos::prelude::*;

use crate::api::{ApiError, ApiResult, TodoApi};
use crate::models::{normalize_todo, normalize_todos, Todo};

/// Client-side cache of the server-held todo collection
#[derive(Clone, Copy)]
pub struct RemoteTodos<A> {
    api: A,
    /// The single owning collection. Only this controller mutates it.
    pub todos: RwSignal<Vec<Todo>>,
    /// Load/connectivity failure shown in the banner. Mutation failures
    /// never land here; rollback is their only surface.
    pub load_error: RwSignal<Option<ApiError>>,
    /// Transient buffer backing the inline-edit input.
    pub edit_text: RwSignal<String>,
}

impl<A: TodoApi> RemoteTodos<A> {
    pub fn new(api: A) -> Self {
        Self {
            api,
            todos: RwSignal::new(Vec::new()),
            load_error: RwSignal::new(None),
            edit_text: RwSignal::new(String::new()),
        }
    }

    /// Fetch and replace the whole collection.
    ///
    /// Never partially applies: a failure leaves the current collection
    /// untouched and raises the banner.
    pub async fn load(&self) -> ApiResult<()> {
        match self.api.fetch_all().await {
            Ok(raw) => {
                self.todos.set(normalize_todos(&raw));
                self.load_error.set(None);
                Ok(())
            }
            Err(err) => {
                leptos::logging::error!("[TODOS] load failed: {}", err);
                self.load_error.set(Some(err.clone()));
                Err(err)
            }
        }
    }

    /// Create a record from the trimmed title and prepend the server's
    /// authoritative version. No optimistic insert: on failure the
    /// collection is unchanged so the caller can keep the input for retry.
    pub async fn add(&self, raw_title: &str) -> ApiResult<()> {
        let title = raw_title.trim();
        if title.is_empty() {
            return Ok(());
        }
        match self.api.create(title).await {
            Ok(raw) => {
                let todo = normalize_todo(&raw);
                self.todos.update(|todos| todos.insert(0, todo));
                Ok(())
            }
            Err(err) => {
                leptos::logging::error!("[TODOS] add failed: {}", err);
                Err(err)
            }
        }
    }

    /// Flip `completed` optimistically, then reconcile from the server or
    /// restore the exact pre-toggle value.
    pub async fn toggle(&self, id: u64) -> ApiResult<()> {
        let Some((title, was_completed)) = self.todos.with_untracked(|todos| {
            todos
                .iter()
                .find(|todo| todo.id == id)
                .map(|todo| (todo.title.clone(), todo.completed))
        }) else {
            return Ok(());
        };

        self.set_completed(id, !was_completed);

        match self.api.update(id, &title, !was_completed).await {
            Ok(raw) => {
                // Server value wins, in case of server-side side effects.
                self.set_completed(id, normalize_todo(&raw).completed);
                Ok(())
            }
            Err(err) => {
                leptos::logging::error!("[TODOS] toggle failed, rolling back: {}", err);
                self.set_completed(id, was_completed);
                Err(err)
            }
        }
    }

    /// Apply the trimmed title optimistically and leave edit mode, then
    /// reconcile from the server. A failed rename restores the original
    /// title and reopens the editor; an empty title is a cancel.
    pub async fn rename(&self, id: u64, raw_title: &str) -> ApiResult<()> {
        let title = raw_title.trim().to_string();
        if title.is_empty() {
            self.cancel_edit(id);
            return Ok(());
        }

        // Only a record in edit mode can be saved; a blur arriving after
        // Enter or Escape already closed the session must not re-submit.
        let Some((old_title, completed)) = self.todos.with_untracked(|todos| {
            todos
                .iter()
                .find(|todo| todo.id == id && todo.editing)
                .map(|todo| (todo.title.clone(), todo.completed))
        }) else {
            return Ok(());
        };

        self.todos.update(|todos| {
            if let Some(todo) = todos.iter_mut().find(|todo| todo.id == id) {
                todo.title = title.clone();
                todo.editing = false;
            }
        });

        match self.api.update(id, &title, completed).await {
            Ok(raw) => {
                let confirmed = normalize_todo(&raw);
                self.todos.update(|todos| {
                    if let Some(todo) = todos.iter_mut().find(|todo| todo.id == id) {
                        todo.title = confirmed.title;
                    }
                });
                Ok(())
            }
            Err(err) => {
                leptos::logging::error!("[TODOS] rename failed, rolling back: {}", err);
                self.todos.update(|todos| {
                    if let Some(todo) = todos.iter_mut().find(|todo| todo.id == id) {
                        todo.title = old_title;
                        todo.editing = true;
                    }
                });
                Err(err)
            }
        }
    }

    /// Remove optimistically, holding the record and its index so a failed
    /// delete restores the original list order exactly.
    pub async fn remove(&self, id: u64) -> ApiResult<()> {
        let Some((index, held)) = self.todos.with_untracked(|todos| {
            todos
                .iter()
                .position(|todo| todo.id == id)
                .map(|index| (index, todos[index].clone()))
        }) else {
            return Ok(());
        };

        self.todos.update(|todos| {
            todos.remove(index);
        });

        match self.api.delete(id).await {
            Ok(()) => Ok(()),
            Err(err) => {
                leptos::logging::error!("[TODOS] delete failed, restoring: {}", err);
                self.todos.update(|todos| {
                    let index = index.min(todos.len());
                    todos.insert(index, held);
                });
                Err(err)
            }
        }
    }

    /// Drop all completed records and delete them concurrently.
    ///
    /// Partial-failure bookkeeping for the batch is deliberately not
    /// attempted: if any delete fails, the optimistic state is discarded and
    /// a fresh `load()` resynchronizes with server truth.
    pub async fn clear_completed(&self) -> ApiResult<()> {
        let completed: Vec<Todo> = self.todos.with_untracked(|todos| {
            todos.iter().filter(|todo| todo.completed).cloned().collect()
        });
        if completed.is_empty() {
            return Ok(());
        }

        self.todos.update(|todos| todos.retain(|todo| !todo.completed));

        let deletes = completed.iter().map(|todo| self.api.delete(todo.id));
        let results = futures::future::join_all(deletes).await;

        if results.iter().any(|result| result.is_err()) {
            leptos::logging::error!("[TODOS] clear completed failed, resyncing");
            return self.load().await;
        }
        Ok(())
    }

    /// Enter edit mode for a record, seeding the edit buffer with its title.
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

    /// Leave edit mode without saving. No network call.
    pub fn cancel_edit(&self, id: u64) {
        self.todos.update(|todos| {
            if let Some(todo) = todos.iter_mut().find(|todo| todo.id == id) {
                todo.editing = false;
            }
        });
        self.edit_text.set(String::new());
    }

    fn set_completed(&self, id: u64, completed: bool) {
        self.todos.update(|todos| {
            if let Some(todo) = todos.iter_mut().find(|todo| todo.id == id) {
                todo.completed = completed;
            }
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{json, Value};
    use std::cell::RefCell;
    use std::rc::Rc;

    #[derive(Default)]
    struct FakeState {
        fetch_response: Value,
        fail_fetch: bool,
        create_response: Value,
        fail_create: bool,
        update_response: Option<Value>,
        fail_update: bool,
        fail_delete_ids: Vec<u64>,
        calls: Vec<String>,
    }

    /// In-memory service double recording every call
    #[derive(Clone, Default)]
    struct FakeApi {
        state: Rc<RefCell<FakeState>>,
    }

    impl FakeApi {
        fn calls(&self) -> Vec<String> {
            self.state.borrow().calls.clone()
        }
    }

    impl TodoApi for FakeApi {
        async fn fetch_all(&self) -> ApiResult<Value> {
            let mut state = self.state.borrow_mut();
            state.calls.push("fetch".to_string());
            if state.fail_fetch {
                Err(ApiError::Connectivity("server unreachable".to_string()))
            } else {
                Ok(state.fetch_response.clone())
            }
        }

        async fn create(&self, title: &str) -> ApiResult<Value> {
            let mut state = self.state.borrow_mut();
            state.calls.push(format!("create {}", title));
            if state.fail_create {
                Err(ApiError::Request {
                    status: 500,
                    message: "HTTP error, status=500".to_string(),
                })
            } else {
                Ok(state.create_response.clone())
            }
        }

        async fn update(&self, id: u64, title: &str, completed: bool) -> ApiResult<Value> {
            let mut state = self.state.borrow_mut();
            state.calls.push(format!("update {}", id));
            if state.fail_update {
                Err(ApiError::Connectivity("server unreachable".to_string()))
            } else {
                Ok(state
                    .update_response
                    .clone()
                    .unwrap_or_else(|| json!({ "id": id, "title": title, "completed": completed })))
            }
        }

        async fn delete(&self, id: u64) -> ApiResult<()> {
            let mut state = self.state.borrow_mut();
            state.calls.push(format!("delete {}", id));
            if state.fail_delete_ids.contains(&id) {
                Err(ApiError::Request {
                    status: 500,
                    message: "HTTP error, status=500".to_string(),
                })
            } else {
                Ok(())
            }
        }
    }

    fn todo(id: u64, title: &str, completed: bool) -> Todo {
        Todo {
            id,
            title: title.to_string(),
            completed,
            created_at: None,
            editing: false,
        }
    }

    fn controller(api: FakeApi, seed: Vec<Todo>) -> RemoteTodos<FakeApi> {
        let ctrl = RemoteTodos::new(api);
        ctrl.todos.set(seed);
        ctrl
    }

    fn titles(ctrl: &RemoteTodos<FakeApi>) -> Vec<String> {
        ctrl.todos
            .with_untracked(|todos| todos.iter().map(|t| t.title.clone()).collect())
    }

    // ========================
    // load
    // ========================

    #[tokio::test]
    async fn test_load_replaces_collection_and_clears_banner() {
        let api = FakeApi::default();
        api.state.borrow_mut().fetch_response =
            json!([{"id": 1, "title": "a"}, {"id": 2, "text": "b", "completed": 1}]);
        let ctrl = controller(api, vec![todo(9, "stale", false)]);
        ctrl.load_error
            .set(Some(ApiError::Connectivity("old".to_string())));

        ctrl.load().await.expect("load failed");

        assert_eq!(titles(&ctrl), vec!["a", "b"]);
        assert!(ctrl.todos.with_untracked(|todos| todos[1].completed));
        assert!(ctrl.load_error.get_untracked().is_none());
    }

    #[tokio::test]
    async fn test_load_accepts_wrapped_collection() {
        let api = FakeApi::default();
        api.state.borrow_mut().fetch_response = json!({"todos": [{"id": 1, "title": "a"}]});
        let ctrl = controller(api, Vec::new());

        ctrl.load().await.expect("load failed");

        assert_eq!(titles(&ctrl), vec!["a"]);
    }

    #[tokio::test]
    async fn test_load_failure_keeps_existing_collection() {
        let api = FakeApi::default();
        api.state.borrow_mut().fail_fetch = true;
        let ctrl = controller(api, vec![todo(1, "keep me", false)]);

        let result = ctrl.load().await;

        assert!(result.is_err());
        assert_eq!(titles(&ctrl), vec!["keep me"]);
        assert!(matches!(
            ctrl.load_error.get_untracked(),
            Some(ApiError::Connectivity(_))
        ));
    }

    // ========================
    // add
    // ========================

    #[tokio::test]
    async fn test_add_prepends_server_record() {
        let api = FakeApi::default();
        api.state.borrow_mut().create_response =
            json!({"id": 1, "title": "Buy milk", "completed": false, "createdAt": "t0"});
        let ctrl = controller(api.clone(), Vec::new());

        ctrl.add("Buy milk").await.expect("add failed");

        let todos = ctrl.todos.get_untracked();
        assert_eq!(todos.len(), 1);
        assert_eq!(todos[0].id, 1);
        assert_eq!(todos[0].title, "Buy milk");
        assert!(!todos[0].completed);
        assert_eq!(todos[0].created_at, Some(json!("t0")));
        assert_eq!(api.calls(), vec!["create Buy milk"]);
    }

    #[tokio::test]
    async fn test_add_trims_and_prepends_before_existing() {
        let api = FakeApi::default();
        api.state.borrow_mut().create_response = json!({"id": 2, "title": "new"});
        let ctrl = controller(api, vec![todo(1, "old", false)]);

        ctrl.add("  new  ").await.expect("add failed");

        assert_eq!(titles(&ctrl), vec!["new", "old"]);
    }

    #[tokio::test]
    async fn test_add_whitespace_is_a_noop_without_request() {
        let api = FakeApi::default();
        let ctrl = controller(api.clone(), vec![todo(1, "a", false)]);

        ctrl.add("   ").await.expect("whitespace add should not fail");

        assert_eq!(ctrl.todos.with_untracked(|todos| todos.len()), 1);
        assert!(api.calls().is_empty());
    }

    #[tokio::test]
    async fn test_add_failure_leaves_collection_unchanged() {
        let api = FakeApi::default();
        api.state.borrow_mut().fail_create = true;
        let ctrl = controller(api, vec![todo(1, "a", false)]);

        let result = ctrl.add("doomed").await;

        assert!(result.is_err());
        assert_eq!(titles(&ctrl), vec!["a"]);
    }

    // ========================
    // toggle
    // ========================

    #[tokio::test]
    async fn test_toggle_adopts_server_completed_value() {
        let api = FakeApi::default();
        // The server keeps the record incomplete despite the toggle.
        api.state.borrow_mut().update_response =
            json!({"id": 1, "title": "a", "completed": false}).into();
        let ctrl = controller(api.clone(), vec![todo(1, "a", false)]);

        ctrl.toggle(1).await.expect("toggle failed");

        assert!(!ctrl.todos.with_untracked(|todos| todos[0].completed));
        assert_eq!(api.calls(), vec!["update 1"]);
    }

    #[tokio::test]
    async fn test_toggle_failure_rolls_back_exactly() {
        let api = FakeApi::default();
        api.state.borrow_mut().fail_update = true;
        let ctrl = controller(api, vec![todo(1, "a", false)]);

        let result = ctrl.toggle(1).await;

        assert!(result.is_err());
        assert!(!ctrl.todos.with_untracked(|todos| todos[0].completed));
    }

    #[tokio::test]
    async fn test_toggle_unknown_id_is_a_noop() {
        let api = FakeApi::default();
        let ctrl = controller(api.clone(), vec![todo(1, "a", false)]);

        ctrl.toggle(99).await.expect("missing id should not fail");

        assert!(api.calls().is_empty());
    }

    // ========================
    // rename
    // ========================

    #[tokio::test]
    async fn test_rename_applies_trimmed_title_and_leaves_edit_mode() {
        let api = FakeApi::default();
        let ctrl = controller(api.clone(), vec![todo(1, "old", false)]);
        ctrl.start_edit(1);

        ctrl.rename(1, "  renamed  ").await.expect("rename failed");

        let todos = ctrl.todos.get_untracked();
        assert_eq!(todos[0].title, "renamed");
        assert!(!todos[0].editing);
        assert_eq!(api.calls(), vec!["update 1"]);
    }

    #[tokio::test]
    async fn test_rename_reconciles_title_from_server() {
        let api = FakeApi::default();
        api.state.borrow_mut().update_response =
            json!({"id": 1, "title": "server says", "completed": false}).into();
        let ctrl = controller(api, vec![todo(1, "old", false)]);
        ctrl.start_edit(1);

        ctrl.rename(1, "client says").await.expect("rename failed");

        assert_eq!(titles(&ctrl), vec!["server says"]);
    }

    #[tokio::test]
    async fn test_rename_failure_restores_title_and_reopens_editor() {
        let api = FakeApi::default();
        api.state.borrow_mut().fail_update = true;
        let ctrl = controller(api, vec![todo(1, "original", false)]);
        ctrl.start_edit(1);

        let result = ctrl.rename(1, "doomed").await;

        assert!(result.is_err());
        let todos = ctrl.todos.get_untracked();
        assert_eq!(todos[0].title, "original");
        assert!(todos[0].editing);
    }

    #[tokio::test]
    async fn test_rename_empty_input_cancels_without_request() {
        let api = FakeApi::default();
        let ctrl = controller(api.clone(), vec![todo(1, "keep", false)]);
        ctrl.start_edit(1);

        ctrl.rename(1, "   ").await.expect("cancel should not fail");

        let todos = ctrl.todos.get_untracked();
        assert_eq!(todos[0].title, "keep");
        assert!(!todos[0].editing);
        assert!(api.calls().is_empty());
    }

    #[tokio::test]
    async fn test_rename_outside_edit_mode_is_a_noop() {
        // A blur event firing after Enter already saved must not re-submit.
        let api = FakeApi::default();
        let ctrl = controller(api.clone(), vec![todo(1, "saved", false)]);

        ctrl.rename(1, "stray blur").await.expect("stray save should not fail");

        assert_eq!(titles(&ctrl), vec!["saved"]);
        assert!(api.calls().is_empty());
    }

    // ========================
    // remove
    // ========================

    #[tokio::test]
    async fn test_remove_deletes_record() {
        let api = FakeApi::default();
        let ctrl = controller(api.clone(), vec![todo(1, "a", false), todo(2, "b", false)]);

        ctrl.remove(1).await.expect("remove failed");

        assert_eq!(titles(&ctrl), vec!["b"]);
        assert_eq!(api.calls(), vec!["delete 1"]);
    }

    #[tokio::test]
    async fn test_remove_failure_restores_original_position() {
        let api = FakeApi::default();
        api.state.borrow_mut().fail_delete_ids = vec![2];
        let ctrl = controller(
            api,
            vec![todo(1, "A", false), todo(2, "B", false), todo(3, "C", false)],
        );

        let result = ctrl.remove(2).await;

        assert!(result.is_err());
        assert_eq!(titles(&ctrl), vec!["A", "B", "C"]);
    }

    #[tokio::test]
    async fn test_remove_unknown_id_is_a_noop() {
        let api = FakeApi::default();
        let ctrl = controller(api.clone(), vec![todo(1, "a", false)]);

        ctrl.remove(99).await.expect("missing id should not fail");

        assert!(api.calls().is_empty());
        assert_eq!(titles(&ctrl), vec!["a"]);
    }

    // ========================
    // clear completed
    // ========================

    #[tokio::test]
    async fn test_clear_completed_deletes_each_completed_record() {
        let api = FakeApi::default();
        let ctrl = controller(
            api.clone(),
            vec![todo(1, "done", true), todo(2, "open", false), todo(3, "done", true)],
        );

        ctrl.clear_completed().await.expect("clear failed");

        assert_eq!(titles(&ctrl), vec!["open"]);
        let calls = api.calls();
        assert!(calls.contains(&"delete 1".to_string()));
        assert!(calls.contains(&"delete 3".to_string()));
        assert!(!calls.contains(&"fetch".to_string()));
    }

    #[tokio::test]
    async fn test_clear_completed_with_nothing_completed_is_a_noop() {
        let api = FakeApi::default();
        let ctrl = controller(api.clone(), vec![todo(1, "open", false)]);

        ctrl.clear_completed().await.expect("noop clear failed");

        assert!(api.calls().is_empty());
    }

    #[tokio::test]
    async fn test_clear_completed_partial_failure_resyncs_from_server() {
        let api = FakeApi::default();
        {
            let mut state = api.state.borrow_mut();
            state.fail_delete_ids = vec![2];
            // Server truth after the partial failure: one delete landed.
            state.fetch_response = json!([
                {"id": 2, "title": "still here", "completed": true},
                {"id": 3, "title": "open", "completed": false},
            ]);
        }
        let ctrl = controller(
            api.clone(),
            vec![
                todo(1, "done", true),
                todo(2, "still here", true),
                todo(3, "open", false),
            ],
        );

        ctrl.clear_completed().await.expect("resync load failed");

        assert_eq!(titles(&ctrl), vec!["still here", "open"]);
        assert!(api.calls().contains(&"fetch".to_string()));
    }

    // ========================
    // edit session
    // ========================

    #[tokio::test]
    async fn test_start_edit_seeds_buffer_and_flags_record() {
        let api = FakeApi::default();
        let ctrl = controller(api, vec![todo(1, "current", false)]);

        ctrl.start_edit(1);

        assert_eq!(ctrl.edit_text.get_untracked(), "current");
        assert!(ctrl.todos.with_untracked(|todos| todos[0].editing));
    }

    #[tokio::test]
    async fn test_cancel_edit_discards_buffer_without_request() {
        let api = FakeApi::default();
        let ctrl = controller(api.clone(), vec![todo(1, "current", false)]);
        ctrl.start_edit(1);
        ctrl.edit_text.set("half typed".to_string());

        ctrl.cancel_edit(1);

        assert!(!ctrl.todos.with_untracked(|todos| todos[0].editing));
        assert_eq!(ctrl.edit_text.get_untracked(), "");
        assert!(api.calls().is_empty());
    }
}
