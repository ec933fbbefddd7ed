//! HTTP surface of the reference task service.
//!
//! Routes, mounted under `/api`:
//!
//! | Method | Path          | Success |
//! |--------|---------------|---------|
//! | GET    | `/tasks`      | 200, array of tasks (`skip`/`limit` optional) |
//! | POST   | `/tasks`      | 201, created task |
//! | GET    | `/tasks/{id}` | 200, task |
//! | PUT    | `/tasks/{id}` | 200, updated task |
//! | DELETE | `/tasks/{id}` | 204 |
//! | GET    | `/health`     | 200, health status |
//!
//! Unknown ids answer 404 and invalid fields 422, both with a
//! `{"detail": ...}` body.

use std::sync::Arc;

use axum::Json;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use taskboard_proto::api::{ErrorBody, HealthStatus};
use taskboard_proto::task::{
    CreateTaskRequest, TaskId, TaskRecord, UpdateTaskRequest, ValidationError,
};

use crate::store::TaskRepository;

/// Name reported by the health endpoint.
pub const SERVICE_NAME: &str = "taskboard";

/// Shared server state.
#[derive(Debug, Default)]
pub struct ServerState {
    /// Task storage.
    pub tasks: TaskRepository,
}

impl ServerState {
    /// Creates a state with an empty repository.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

/// Errors returned by request handlers.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// The requested task does not exist.
    #[error("task not found: {0}")]
    NotFound(TaskId),
    /// A request field failed validation.
    #[error(transparent)]
    Validation(#[from] ValidationError),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match self {
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
        };
        (status, Json(ErrorBody::new(self.to_string()))).into_response()
    }
}

/// Query parameters accepted by `GET /tasks`.
#[derive(Debug, Default, serde::Deserialize)]
pub struct ListParams {
    /// Number of tasks to skip.
    #[serde(default)]
    pub skip: usize,
    /// Maximum number of tasks to return.
    pub limit: Option<usize>,
}

/// Builds the service router.
pub fn router(state: Arc<ServerState>) -> axum::Router {
    let tasks = axum::Router::new()
        .route(
            "/tasks",
            axum::routing::get(list_tasks).post(create_task),
        )
        .route(
            "/tasks/{id}",
            axum::routing::get(get_task)
                .put(update_task)
                .delete(delete_task),
        )
        .route("/health", axum::routing::get(health));

    axum::Router::new().nest("/api", tasks).with_state(state)
}

/// Starts the service on `addr` with an empty repository.
///
/// This is the primary entry point used by both `main.rs` and test code.
///
/// # Errors
///
/// Returns an error if the TCP listener cannot bind to the given address.
pub async fn start_server(
    addr: &str,
) -> Result<
    (std::net::SocketAddr, tokio::task::JoinHandle<()>),
    Box<dyn std::error::Error + Send + Sync>,
> {
    start_server_with_state(addr, Arc::new(ServerState::new())).await
}

/// Starts the service with a pre-built [`ServerState`].
///
/// # Errors
///
/// Returns an error if the TCP listener cannot bind to the given address.
pub async fn start_server_with_state(
    addr: &str,
    state: Arc<ServerState>,
) -> Result<
    (std::net::SocketAddr, tokio::task::JoinHandle<()>),
    Box<dyn std::error::Error + Send + Sync>,
> {
    let app = router(state);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    let bound_addr = listener.local_addr()?;

    let handle = tokio::spawn(async move {
        if let Err(e) = axum::serve(listener, app).await {
            tracing::error!(error = %e, "task service error");
        }
    });

    Ok((bound_addr, handle))
}

async fn list_tasks(
    State(state): State<Arc<ServerState>>,
    Query(params): Query<ListParams>,
) -> Json<Vec<TaskRecord>> {
    let tasks = state.tasks.list(params.skip, params.limit).await;
    tracing::debug!(count = tasks.len(), "listing tasks");
    Json(tasks)
}

async fn create_task(
    State(state): State<Arc<ServerState>>,
    Json(req): Json<CreateTaskRequest>,
) -> Result<(StatusCode, Json<TaskRecord>), ApiError> {
    let task = state.tasks.create(req).await?;
    tracing::info!(task_id = %task.id, "task created");
    Ok((StatusCode::CREATED, Json(task)))
}

async fn get_task(
    State(state): State<Arc<ServerState>>,
    Path(id): Path<u64>,
) -> Result<Json<TaskRecord>, ApiError> {
    let id = TaskId::new(id);
    state.tasks.get(id).await.map(Json).ok_or(ApiError::NotFound(id))
}

async fn update_task(
    State(state): State<Arc<ServerState>>,
    Path(id): Path<u64>,
    Json(req): Json<UpdateTaskRequest>,
) -> Result<Json<TaskRecord>, ApiError> {
    let id = TaskId::new(id);
    let task = state
        .tasks
        .update(id, req)
        .await?
        .ok_or(ApiError::NotFound(id))?;
    tracing::info!(task_id = %id, status = %task.status, "task updated");
    Ok(Json(task))
}

async fn delete_task(
    State(state): State<Arc<ServerState>>,
    Path(id): Path<u64>,
) -> Result<StatusCode, ApiError> {
    let id = TaskId::new(id);
    if !state.tasks.delete(id).await {
        return Err(ApiError::NotFound(id));
    }
    tracing::info!(task_id = %id, "task deleted");
    Ok(StatusCode::NO_CONTENT)
}

async fn health() -> Json<HealthStatus> {
    Json(HealthStatus::healthy(SERVICE_NAME))
}
