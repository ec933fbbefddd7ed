//! Client-side task state synchronized with the remote task service.
//!
//! [`TaskStore`] owns the task list, the edit selection, the loading flag
//! and the last failure. Each operation makes one service call and only
//! touches local state once that call has succeeded; failures are recorded
//! as a [`Failure`] descriptor instead of propagating further.

pub mod state;
pub mod task_store;

pub use state::{TaskGroups, TaskState};
pub use task_store::TaskStore;

use std::fmt;

use taskboard_proto::task::ValidationError;

use crate::service::ServiceError;

/// Which store operation failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FailureKind {
    /// Fetching the task list.
    Load,
    /// Creating a task.
    Create,
    /// Updating a task.
    Update,
    /// Deleting a task.
    Delete,
    /// Flipping a task's status. An update failure with its own message.
    Toggle,
}

impl fmt::Display for FailureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Load => write!(f, "failed to load tasks"),
            Self::Create => write!(f, "failed to create task"),
            Self::Update => write!(f, "failed to update task"),
            Self::Delete => write!(f, "failed to delete task"),
            Self::Toggle => write!(f, "failed to update task status"),
        }
    }
}

/// User-facing description of a failed operation, kept as the store's
/// `last_error`.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{kind}: {detail}")]
pub struct Failure {
    /// The operation that failed.
    pub kind: FailureKind,
    /// Text of the underlying service error.
    pub detail: String,
}

impl Failure {
    /// Builds a descriptor from a service error.
    #[must_use]
    pub fn new(kind: FailureKind, err: &ServiceError) -> Self {
        Self {
            kind,
            detail: err.to_string(),
        }
    }
}

/// Errors from [`TaskStore::submit`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SubmitError {
    /// The form did not pass validation; the store was not invoked.
    #[error("invalid task: {0}")]
    Invalid(#[from] ValidationError),
    /// The store operation failed.
    #[error(transparent)]
    Failed(#[from] Failure),
}
