//! In-memory task repository backing the reference service.
//!
//! The [`TaskRepository`] keeps tasks in insertion order and assigns
//! increasing integer ids. Status transitions maintain the completion
//! timestamp: moving to `concluida` stamps `data_atualizacao`, moving back
//! to `pendente` clears it.

use chrono::Utc;
use taskboard_proto::task::{
    CreateTaskRequest, TaskId, TaskRecord, TaskStatus, UpdateTaskRequest, ValidationError,
    validate_description, validate_title,
};
use tokio::sync::RwLock;

#[derive(Debug)]
struct Inner {
    tasks: Vec<TaskRecord>,
    next_id: u64,
}

/// Thread-safe in-memory task storage.
///
/// Guarded by a [`RwLock`]; every call takes the lock once and releases it
/// before returning.
#[derive(Debug)]
pub struct TaskRepository {
    inner: RwLock<Inner>,
}

impl Default for TaskRepository {
    fn default() -> Self {
        Self::new()
    }
}

impl TaskRepository {
    /// Creates an empty repository. The first task gets id 1.
    #[must_use]
    pub fn new() -> Self {
        Self {
            inner: RwLock::new(Inner {
                tasks: Vec::new(),
                next_id: 1,
            }),
        }
    }

    /// Validates and stores a new pending task.
    ///
    /// # Errors
    ///
    /// Returns a [`ValidationError`] if the title or description is invalid.
    pub async fn create(&self, req: CreateTaskRequest) -> Result<TaskRecord, ValidationError> {
        let title = validate_title(&req.title)?;
        let description = validate_description(req.description)?;

        let mut inner = self.inner.write().await;
        let record = TaskRecord {
            id: TaskId::new(inner.next_id),
            title,
            description,
            status: TaskStatus::Pending,
            created_at: Utc::now(),
            updated_at: None,
        };
        inner.next_id += 1;
        inner.tasks.push(record.clone());
        drop(inner);
        Ok(record)
    }

    /// Returns tasks in insertion order, after skipping `skip` and keeping
    /// at most `limit`.
    pub async fn list(&self, skip: usize, limit: Option<usize>) -> Vec<TaskRecord> {
        let inner = self.inner.read().await;
        inner
            .tasks
            .iter()
            .skip(skip)
            .take(limit.unwrap_or(usize::MAX))
            .cloned()
            .collect()
    }

    /// Returns a single task.
    pub async fn get(&self, id: TaskId) -> Option<TaskRecord> {
        let inner = self.inner.read().await;
        inner.tasks.iter().find(|t| t.id == id).cloned()
    }

    /// Applies a partial update. Returns `Ok(None)` if the id is unknown.
    ///
    /// Validation happens before the lookup, so an invalid body is rejected
    /// even for unknown ids.
    ///
    /// # Errors
    ///
    /// Returns a [`ValidationError`] if a supplied field is invalid.
    pub async fn update(
        &self,
        id: TaskId,
        req: UpdateTaskRequest,
    ) -> Result<Option<TaskRecord>, ValidationError> {
        let title = req.title.as_deref().map(validate_title).transpose()?;
        let description = req
            .description
            .map(|d| validate_description(Some(d)))
            .transpose()?;

        let mut inner = self.inner.write().await;
        let Some(task) = inner.tasks.iter_mut().find(|t| t.id == id) else {
            return Ok(None);
        };
        if let Some(title) = title {
            task.title = title;
        }
        if let Some(description) = description {
            task.description = description;
        }
        if let Some(status) = req.status {
            match status {
                TaskStatus::Completed if task.status == TaskStatus::Pending => {
                    task.updated_at = Some(Utc::now());
                }
                TaskStatus::Pending => task.updated_at = None,
                TaskStatus::Completed => {}
            }
            task.status = status;
        }
        Ok(Some(task.clone()))
    }

    /// Removes a task. Returns `false` if the id is unknown.
    pub async fn delete(&self, id: TaskId) -> bool {
        let mut inner = self.inner.write().await;
        let before = inner.tasks.len();
        inner.tasks.retain(|t| t.id != id);
        inner.tasks.len() != before
    }

    /// Number of stored tasks.
    pub async fn len(&self) -> usize {
        self.inner.read().await.tasks.len()
    }

    /// Returns `true` if no tasks are stored.
    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}
