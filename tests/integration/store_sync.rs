//! Integration tests for keeping a `TaskStore` in step with the task service.
//!
//! Each test starts the reference server in-process on an ephemeral port and
//! drives a `TaskStore` backed by `HttpTaskService` against it, checking the
//! local collection against what the service reports afterwards.
//!
//! Verification command: `cargo test --test store_sync`

#![allow(clippy::expect_used, clippy::unwrap_used)]

use taskboard::form::TaskForm;
use taskboard::service::TaskService;
use taskboard::service::http::HttpTaskService;
use taskboard::store::{FailureKind, SubmitError, TaskStore};
use taskboard_proto::task::{NewTask, TaskId, TaskPatch, TaskStatus};
use taskboard_server::server;

// =============================================================================
// Test helpers
// =============================================================================

/// Starts a fresh server and returns a store pointed at it.
async fn setup() -> TaskStore<HttpTaskService> {
    let (addr, _handle) = server::start_server("127.0.0.1:0")
        .await
        .expect("start server");
    let service = HttpTaskService::new(&format!("http://{addr}/api")).expect("service client");
    TaskStore::new(service)
}

fn new_task(title: &str) -> NewTask {
    NewTask::new(title, None).unwrap()
}

/// Asserts that the local collection matches the service's, ignoring order.
async fn assert_in_sync(store: &TaskStore<HttpTaskService>) {
    let mut remote = store.service().list().await.unwrap();
    let mut local = store.snapshot().tasks().to_vec();
    remote.sort_by_key(|t| t.id);
    local.sort_by_key(|t| t.id);
    assert_eq!(local, remote);
}

// =============================================================================
// Tests
// =============================================================================

#[tokio::test]
async fn health_check() {
    let store = setup().await;
    let health = store.service().health().await.unwrap();
    assert!(health.is_healthy());
    assert_eq!(health.service, "taskboard");
}

#[tokio::test]
async fn load_empty_service() {
    let store = setup().await;
    assert_eq!(store.load_all().await.unwrap(), 0);
    let state = store.snapshot();
    assert!(state.is_empty());
    assert!(!state.is_loading());
    assert!(state.last_error().is_none());
}

#[tokio::test]
async fn create_shows_newest_first_while_service_keeps_insertion_order() {
    let store = setup().await;
    store.load_all().await.unwrap();

    let first = store.create(&new_task("first")).await.unwrap();
    let second = store.create(&new_task("second")).await.unwrap();

    let local: Vec<TaskId> = store.snapshot().tasks().iter().map(|t| t.id).collect();
    assert_eq!(local, vec![second.id, first.id]);

    store.load_all().await.unwrap();
    let reloaded: Vec<TaskId> = store.snapshot().tasks().iter().map(|t| t.id).collect();
    assert_eq!(reloaded, vec![first.id, second.id]);
}

#[tokio::test]
async fn full_lifecycle_stays_in_sync() {
    let store = setup().await;
    store.load_all().await.unwrap();

    let milk = store.create(&new_task("Buy milk")).await.unwrap();
    let rent = store
        .create(&NewTask::new("Pay rent", Some("before friday".to_string())).unwrap())
        .await
        .unwrap();
    assert_eq!(milk.status, TaskStatus::Pending);
    assert_eq!(rent.description.as_deref(), Some("before friday"));
    assert_in_sync(&store).await;

    let done = store.toggle_status(milk.id).await.unwrap().unwrap();
    assert_eq!(done.status, TaskStatus::Completed);
    assert!(done.completed_at.is_some());
    assert_in_sync(&store).await;

    let patch = TaskPatch::new().with_description(None).unwrap();
    let cleared = store.update(rent.id, &patch).await.unwrap();
    assert_eq!(cleared.description, None);
    assert_in_sync(&store).await;

    store.remove(milk.id).await.unwrap();
    assert_eq!(store.snapshot().len(), 1);
    assert_in_sync(&store).await;

    let groups_len = store.snapshot().groups().pending.len();
    assert_eq!(groups_len, 1);
}

#[tokio::test]
async fn toggle_round_trip_changes_completion_time() {
    let store = setup().await;
    let task = store.create(&new_task("t")).await.unwrap();

    let done = store.toggle_status(task.id).await.unwrap().unwrap();
    let reopened = store.toggle_status(task.id).await.unwrap().unwrap();
    assert_eq!(reopened.status, TaskStatus::Pending);
    assert_eq!(reopened.completed_at, None);
    assert_ne!(done.completed_at, reopened.completed_at);
}

#[tokio::test]
async fn edit_through_form_sends_only_changes() {
    let store = setup().await;
    let task = store
        .create(&NewTask::new("draft", Some("notes".to_string())).unwrap())
        .await
        .unwrap();

    store.select_for_edit(Some(&task));
    let mut form = TaskForm::from_task(&task);
    form.title = "final".to_string();
    let updated = store.submit(&form).await.unwrap();

    assert_eq!(updated.title, "final");
    assert_eq!(updated.description.as_deref(), Some("notes"));
    assert_eq!(store.snapshot().editing_id(), None);
    assert_in_sync(&store).await;
}

#[tokio::test]
async fn task_deleted_elsewhere_fails_locally() {
    let store = setup().await;
    let task = store.create(&new_task("shared")).await.unwrap();

    // Another client removes it behind the store's back.
    store.service().delete(task.id).await.unwrap();

    let failure = store.toggle_status(task.id).await.unwrap_err();
    assert_eq!(failure.kind, FailureKind::Toggle);
    let failure = store.remove(task.id).await.unwrap_err();
    assert_eq!(failure.kind, FailureKind::Delete);

    let state = store.snapshot();
    assert_eq!(state.len(), 1);
    assert_eq!(state.last_error(), Some(&failure));

    store.load_all().await.unwrap();
    assert!(store.snapshot().is_empty());
    assert!(store.snapshot().last_error().is_none());
}

#[tokio::test]
async fn unreachable_service_records_load_failure() {
    // Bind then drop a listener so the port is very likely closed.
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let store = TaskStore::new(HttpTaskService::new(&format!("http://{addr}/api/")).unwrap());
    let failure = store.load_all().await.unwrap_err();
    assert_eq!(failure.kind, FailureKind::Load);
    let state = store.snapshot();
    assert!(!state.is_loading());
    assert!(state.is_empty());
    assert!(state.last_error().is_some());
}

#[tokio::test]
async fn invalid_form_never_reaches_the_service() {
    let store = setup().await;
    let err = store.submit(&TaskForm::new("")).await.unwrap_err();
    assert!(matches!(err, SubmitError::Invalid(_)));
    assert!(store.service().list().await.unwrap().is_empty());
}

#[tokio::test]
async fn concurrent_creates_all_land() {
    let store = setup().await;
    let (na, nb, nc) = (new_task("a"), new_task("b"), new_task("c"));
    let (a, b, c) = tokio::join!(store.create(&na), store.create(&nb), store.create(&nc));
    let mut ids = vec![a.unwrap().id, b.unwrap().id, c.unwrap().id];
    ids.sort();
    ids.dedup();
    assert_eq!(ids.len(), 3);
    assert_eq!(store.snapshot().len(), 3);
    assert_in_sync(&store).await;
}
