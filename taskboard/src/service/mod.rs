//! Remote task service abstraction.
//!
//! Defines the [`TaskService`] trait the store talks to. Implementations:
//! - [`http::HttpTaskService`]: the JSON-over-HTTP service client
//! - [`memory::InMemoryTaskService`]: in-process service for testing

pub mod http;
pub mod memory;

use taskboard_proto::task::{NewTask, Task, TaskId, TaskPatch, ValidationError};

/// Errors that can occur while talking to the task service.
#[derive(Debug, thiserror::Error)]
pub enum ServiceError {
    /// The HTTP request could not be sent or its body not read.
    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// The service answered with a non-success status.
    #[error("service returned {status}: {detail}")]
    Status {
        /// HTTP status code.
        status: u16,
        /// `detail` from the error body, or the raw body.
        detail: String,
    },

    /// The service does not know the task.
    #[error("task not found: {0}")]
    NotFound(TaskId),

    /// A record returned by the service violates the task invariants.
    #[error("invalid task record: {0}")]
    InvalidRecord(#[from] ValidationError),

    /// The configured base URL is not usable.
    #[error("invalid service URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// The service could not be reached.
    #[error("service unavailable: {0}")]
    Unavailable(String),
}

/// Async access to the remote task collection.
///
/// Every method is a single remote call with no retries. Results are
/// already-validated [`Task`] values.
pub trait TaskService: Send + Sync {
    /// Fetch the full collection, in service order.
    fn list(&self) -> impl std::future::Future<Output = Result<Vec<Task>, ServiceError>> + Send;

    /// Create a task. The service assigns the id and creation time.
    fn create(
        &self,
        input: &NewTask,
    ) -> impl std::future::Future<Output = Result<Task, ServiceError>> + Send;

    /// Apply a partial update, returning the service's representation.
    fn update(
        &self,
        id: TaskId,
        patch: &TaskPatch,
    ) -> impl std::future::Future<Output = Result<Task, ServiceError>> + Send;

    /// Delete a task.
    fn delete(&self, id: TaskId)
    -> impl std::future::Future<Output = Result<(), ServiceError>> + Send;
}
