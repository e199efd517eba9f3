//! Integration tests for the list controller over HTTP.
//!
//! Each test runs a controller against an in-process server whose store
//! the test seeds and arms with failures.
//!
//! Verification command: `cargo test --test list_sync`

use std::sync::Arc;

use todoterm::api::http::HttpTodoApi;
use todoterm::controller::{CommitOutcome, TodoController};
use todoterm::filter::Filter;
use todoterm::state::TodoError;
use todoterm_proto::{Task, TaskFields, TaskId, UserId};
use todoterm_server::store::{Operation, TodoStore};

const USER: UserId = UserId::new(2392);

struct Harness {
    controller: TodoController<HttpTodoApi>,
    store: Arc<TodoStore>,
    _server: tokio::task::JoinHandle<()>,
}

/// Seeds the server with `(title, completed)` tasks and loads them.
async fn harness(seed: &[(&str, bool)]) -> Harness {
    let store = Arc::new(TodoStore::new());
    for (title, completed) in seed {
        store
            .create(TaskFields {
                title: (*title).to_string(),
                completed: *completed,
                user_id: USER,
            })
            .await;
    }
    let (addr, server) =
        todoterm_server::server::start_server_with_store("127.0.0.1:0", Arc::clone(&store))
            .await
            .expect("failed to start todo server");

    let api = HttpTodoApi::new(&format!("http://{addr}")).unwrap();
    let controller = TodoController::new(api, USER);
    controller.load().await.unwrap();
    Harness {
        controller,
        store,
        _server: server,
    }
}

fn ids(tasks: &[Task]) -> Vec<i64> {
    tasks.iter().map(|t| t.id.get()).collect()
}

#[tokio::test]
async fn load_shows_server_list() {
    let h = harness(&[("a", false), ("b", true)]).await;
    let state = h.controller.snapshot();
    assert_eq!(ids(&state.tasks), vec![1, 2]);
    assert_eq!(state.items_left_label(), "1 items left");
}

#[tokio::test]
async fn load_failure_sets_banner() {
    let h = harness(&[("a", false)]).await;
    h.store.fail(Operation::List).await;

    assert_eq!(h.controller.load().await, Err(TodoError::LoadFailure));
    let state = h.controller.snapshot();
    assert_eq!(state.error_kind(), Some(TodoError::LoadFailure));
    assert_eq!(ids(&state.tasks), vec![1]);
}

#[tokio::test]
async fn submit_round_trip() {
    let h = harness(&[]).await;
    h.controller.set_input("  write tests  ");

    let created = h.controller.submit().await.unwrap().unwrap();
    assert_eq!(created.title, "write tests");
    assert_eq!(h.controller.snapshot().tasks, vec![created.clone()]);
    assert_eq!(h.store.list(USER).await, vec![created]);
}

#[tokio::test]
async fn failed_submit_keeps_input() {
    let h = harness(&[]).await;
    h.store.fail(Operation::Create).await;
    h.controller.set_input("nope");

    assert_eq!(h.controller.submit().await, Err(TodoError::AddFailure));
    let state = h.controller.snapshot();
    assert!(state.tasks.is_empty());
    assert!(state.pending.is_none());
    assert_eq!(state.input, "nope");
}

#[tokio::test]
async fn toggle_all_persists() {
    let h = harness(&[("a", false), ("b", true), ("c", false)]).await;
    h.controller.toggle_all().await.unwrap();

    assert!(h.controller.snapshot().all_completed());
    assert!(h.store.list(USER).await.iter().all(|t| t.completed));

    h.controller.toggle_all().await.unwrap();
    assert_eq!(h.controller.snapshot().active_count(), 3);
}

#[tokio::test]
async fn aborted_toggle_all_keeps_local_list() {
    let h = harness(&[("a", false), ("b", false), ("c", false)]).await;
    h.store.fail_task(Operation::Update, TaskId::new(2)).await;
    let before = h.controller.snapshot().tasks;

    assert_eq!(h.controller.toggle_all().await, Err(TodoError::UpdateFailure));
    assert_eq!(h.controller.snapshot().tasks, before);

    // the first update reached the server; a reload shows it
    h.store.clear_faults().await;
    h.controller.load().await.unwrap();
    let completed: Vec<bool> = h.controller.snapshot().tasks.iter().map(|t| t.completed).collect();
    assert_eq!(completed, vec![true, false, false]);
}

#[tokio::test]
async fn clear_completed_partial_failure() {
    let h = harness(&[("a", true), ("b", true), ("c", true), ("d", false)]).await;
    h.store.fail_task(Operation::Delete, TaskId::new(2)).await;

    assert_eq!(
        h.controller.clear_completed().await,
        Err(TodoError::DeleteFailure)
    );
    let state = h.controller.snapshot();
    assert_eq!(ids(&state.tasks), vec![2, 4]);
    assert!(state.loading.is_empty());
    assert_eq!(ids(&h.store.list(USER).await), vec![2, 4]);
}

#[tokio::test]
async fn edit_commit_paths() {
    let h = harness(&[("a", false), ("b", false)]).await;

    assert_eq!(
        h.controller.commit_title(TaskId::new(1), " a ").await,
        Ok(CommitOutcome::Unchanged)
    );

    let renamed = h.controller.commit_title(TaskId::new(1), "alpha").await.unwrap();
    assert!(matches!(renamed, CommitOutcome::Renamed(ref t) if t.title == "alpha"));

    assert_eq!(
        h.controller.commit_title(TaskId::new(2), "").await,
        Ok(CommitOutcome::Deleted)
    );
    assert_eq!(ids(&h.store.list(USER).await), vec![1]);
    assert_eq!(h.store.list(USER).await[0].title, "alpha");
}

#[tokio::test]
async fn failed_delete_keeps_task() {
    let h = harness(&[("a", false)]).await;
    h.store.fail(Operation::Delete).await;

    assert_eq!(
        h.controller.delete(TaskId::new(1)).await,
        Err(TodoError::DeleteFailure)
    );
    assert_eq!(ids(&h.controller.snapshot().tasks), vec![1]);
}

#[tokio::test]
async fn filters_are_local() {
    let h = harness(&[("a", false), ("b", true)]).await;
    h.controller.set_filter(Filter::Completed);

    let state = h.controller.snapshot();
    let visible: Vec<i64> = state.visible_tasks().iter().map(|t| t.id.get()).collect();
    assert_eq!(visible, vec![2]);
    assert_eq!(state.tasks.len(), 2);
}
