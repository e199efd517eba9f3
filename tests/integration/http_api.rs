//! Integration tests for the HTTP client against an in-process server.
//!
//! Verification command: `cargo test --test http_api`

use std::sync::Arc;

use reqwest::StatusCode;
use todoterm::api::http::HttpTodoApi;
use todoterm::api::{ApiError, TodoApi};
use todoterm_proto::{TaskFields, TaskId, UserId};
use todoterm_server::store::{Operation, TodoStore};

const USER: UserId = UserId::new(2392);

fn fields(title: &str, completed: bool, user_id: UserId) -> TaskFields {
    TaskFields {
        title: title.to_string(),
        completed,
        user_id,
    }
}

/// Start the server in-process and return a client for it plus its store.
async fn start() -> (HttpTodoApi, Arc<TodoStore>, tokio::task::JoinHandle<()>) {
    let store = Arc::new(TodoStore::new());
    let (addr, handle) =
        todoterm_server::server::start_server_with_store("127.0.0.1:0", Arc::clone(&store))
            .await
            .expect("failed to start todo server");
    let api = HttpTodoApi::new(&format!("http://{addr}/")).unwrap();
    (api, store, handle)
}

#[tokio::test]
async fn list_is_scoped_to_user_and_ordered() {
    let (api, store, _handle) = start().await;
    store.create(fields("first", false, USER)).await;
    store.create(fields("other user", false, UserId::new(1))).await;
    store.create(fields("second", true, USER)).await;

    let tasks = api.list_tasks(USER).await.unwrap();
    let titles: Vec<&str> = tasks.iter().map(|t| t.title.as_str()).collect();
    assert_eq!(titles, vec!["first", "second"]);
    assert!(tasks.iter().all(|t| t.user_id == USER));
}

#[tokio::test]
async fn create_assigns_id() {
    let (api, store, _handle) = start().await;

    let created = api.create_task(&fields("buy milk", false, USER)).await.unwrap();
    assert_eq!(created.title, "buy milk");
    assert!(!created.completed);
    assert_eq!(created.user_id, USER);
    assert_eq!(store.len().await, 1);

    let listed = api.list_tasks(USER).await.unwrap();
    assert_eq!(listed, vec![created]);
}

#[tokio::test]
async fn update_replaces_record() {
    let (api, _store, _handle) = start().await;
    let created = api.create_task(&fields("draft", false, USER)).await.unwrap();

    let updated = api
        .update_task(&created.clone().with_title("final".to_string()).with_completed(true))
        .await
        .unwrap();
    assert_eq!(updated.id, created.id);
    assert_eq!(updated.title, "final");
    assert!(updated.completed);

    assert_eq!(api.list_tasks(USER).await.unwrap(), vec![updated]);
}

#[tokio::test]
async fn delete_removes_record() {
    let (api, store, _handle) = start().await;
    let created = api.create_task(&fields("gone soon", false, USER)).await.unwrap();

    api.delete_task(created.id).await.unwrap();
    assert!(store.is_empty().await);
    assert!(api.list_tasks(USER).await.unwrap().is_empty());
}

#[tokio::test]
async fn unknown_id_is_not_found() {
    let (api, _store, _handle) = start().await;

    let err = api.delete_task(TaskId::new(404)).await.unwrap_err();
    assert!(matches!(
        err,
        ApiError::Http { status, .. } if status == StatusCode::NOT_FOUND
    ));
}

#[tokio::test]
async fn injected_fault_is_server_error() {
    let (api, store, _handle) = start().await;
    store.fail(Operation::Create).await;

    let err = api.create_task(&fields("x", false, USER)).await.unwrap_err();
    match err {
        ApiError::Http { status, body } => {
            assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
            assert!(body.contains("error"));
        }
        other => panic!("expected http error, got {other:?}"),
    }
    assert!(store.is_empty().await);
}

#[tokio::test]
async fn unreachable_server_is_request_error() {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let api = HttpTodoApi::new(&format!("http://{addr}")).unwrap();
    let err = api.list_tasks(USER).await.unwrap_err();
    assert!(matches!(err, ApiError::Request { .. }));
}
