//! The task store: remote-synchronized operations over [`TaskState`].

use taskboard_proto::task::{NewTask, Task, TaskId, TaskPatch};
use tokio::sync::watch;

use super::{Failure, FailureKind, SubmitError, TaskState};
use crate::form::TaskForm;
use crate::service::{ServiceError, TaskService};

/// Owns the client-side task state and keeps it in step with a
/// [`TaskService`].
///
/// Operations take `&self`, so several can be in flight at once (share the
/// store behind an `Arc` or join the futures). No lock is held while a
/// service call is pending; the local update is applied atomically when the
/// call resolves, so completion order decides the outcome. Two concurrent
/// operations on the same task are last-completion-wins.
///
/// Every state change is published to receivers from
/// [`subscribe`](Self::subscribe).
pub struct TaskStore<S> {
    service: S,
    state: watch::Sender<TaskState>,
}

impl<S: TaskService> TaskStore<S> {
    /// Creates a store with an empty, not-yet-loaded state.
    #[must_use]
    pub fn new(service: S) -> Self {
        let (state, _) = watch::channel(TaskState::default());
        Self { service, state }
    }

    /// The underlying service.
    pub const fn service(&self) -> &S {
        &self.service
    }

    /// A receiver that observes every new state snapshot.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<TaskState> {
        self.state.subscribe()
    }

    /// A copy of the current state.
    #[must_use]
    pub fn snapshot(&self) -> TaskState {
        self.state.borrow().clone()
    }

    /// Replaces the collection with the service's full task list.
    ///
    /// `loading` is raised for the duration of the call. On failure the
    /// existing collection is kept. Returns the number of tasks loaded.
    ///
    /// # Errors
    ///
    /// Returns a [`FailureKind::Load`] failure, also stored as `last_error`.
    pub async fn load_all(&self) -> Result<usize, Failure> {
        self.state.send_modify(|s| s.loading = true);
        tracing::debug!("loading tasks");

        match self.service.list().await {
            Ok(tasks) => {
                let tasks = dedup_by_id(tasks);
                let count = tasks.len();
                self.state.send_modify(|s| {
                    s.tasks = tasks;
                    s.loading = false;
                    s.last_error = None;
                });
                tracing::info!(count, "tasks loaded");
                Ok(count)
            }
            Err(e) => {
                let failure = Failure::new(FailureKind::Load, &e);
                tracing::warn!(error = %e, "failed to load tasks");
                self.state.send_modify(|s| {
                    s.loading = false;
                    s.last_error = Some(failure.clone());
                });
                Err(failure)
            }
        }
    }

    /// Creates a task and puts it at the top of the collection.
    ///
    /// The edit selection is left alone.
    ///
    /// # Errors
    ///
    /// Returns a [`FailureKind::Create`] failure, also stored as `last_error`.
    pub async fn create(&self, input: &NewTask) -> Result<Task, Failure> {
        match self.service.create(input).await {
            Ok(task) => {
                tracing::info!(task_id = %task.id, "task created");
                self.state.send_modify(|s| {
                    s.tasks.retain(|t| t.id != task.id);
                    s.tasks.insert(0, task.clone());
                    s.last_error = None;
                });
                Ok(task)
            }
            Err(e) => Err(self.record_failure(FailureKind::Create, &e)),
        }
    }

    /// Sends a partial update and swaps in the service's version of the
    /// task, keeping its position. Ends editing if this task was selected.
    ///
    /// # Errors
    ///
    /// Returns a [`FailureKind::Update`] failure, also stored as `last_error`.
    /// An id the service does not know is reported this way.
    pub async fn update(&self, id: TaskId, patch: &TaskPatch) -> Result<Task, Failure> {
        self.apply_update(id, patch, FailureKind::Update).await
    }

    /// Deletes a task.
    ///
    /// Asking the user for confirmation is up to the caller; once invoked,
    /// the store always issues the request.
    ///
    /// # Errors
    ///
    /// Returns a [`FailureKind::Delete`] failure, also stored as `last_error`.
    /// Deleting an unknown id is a failure.
    pub async fn remove(&self, id: TaskId) -> Result<(), Failure> {
        match self.service.delete(id).await {
            Ok(()) => {
                tracing::info!(task_id = %id, "task deleted");
                self.state.send_modify(|s| {
                    s.tasks.retain(|t| t.id != id);
                    if s.editing == Some(id) {
                        s.editing = None;
                    }
                    s.last_error = None;
                });
                Ok(())
            }
            Err(e) => Err(self.record_failure(FailureKind::Delete, &e)),
        }
    }

    /// Flips a task between pending and completed.
    ///
    /// Returns `Ok(None)` without calling the service if the id is not in
    /// the collection. Otherwise sends an update carrying only the new
    /// status and replaces the task like [`update`](Self::update) does,
    /// without touching the edit selection.
    ///
    /// # Errors
    ///
    /// Returns a [`FailureKind::Toggle`] failure, also stored as `last_error`.
    pub async fn toggle_status(&self, id: TaskId) -> Result<Option<Task>, Failure> {
        let current = self.state.borrow().status_of(id);
        let Some(current) = current else {
            tracing::debug!(task_id = %id, "toggle ignored, task not loaded");
            return Ok(None);
        };

        let patch = TaskPatch::new().with_status(current.toggled());
        self.apply_update(id, &patch, FailureKind::Toggle)
            .await
            .map(Some)
    }

    /// Selects a task for editing, or clears the selection with `None`.
    pub fn select_for_edit(&self, task: Option<&Task>) {
        let id = task.map(|t| t.id);
        self.state.send_if_modified(|s| {
            let changed = s.editing != id;
            s.editing = id;
            changed
        });
    }

    /// Leaves edit mode.
    pub fn cancel_edit(&self) {
        self.select_for_edit(None);
    }

    /// Submits the form: an update of the selected task when editing,
    /// otherwise a new task.
    ///
    /// When editing, only the fields that differ from the selected task are
    /// sent. If the selected task has disappeared from the collection, both
    /// fields are sent and the service decides.
    ///
    /// # Errors
    ///
    /// Returns [`SubmitError::Invalid`] without calling the store if the form
    /// does not validate, or [`SubmitError::Failed`] if the operation failed.
    pub async fn submit(&self, form: &TaskForm) -> Result<Task, SubmitError> {
        let (editing_id, editing_task) = {
            let state = self.state.borrow();
            (state.editing_id(), state.editing_task().cloned())
        };

        match (editing_id, editing_task) {
            (Some(_), Some(task)) => {
                let patch = form.to_patch(&task)?;
                Ok(self.update(task.id, &patch).await?)
            }
            (Some(id), None) => {
                let patch = form.to_full_patch()?;
                Ok(self.update(id, &patch).await?)
            }
            (None, _) => {
                let input = form.to_new_task()?;
                Ok(self.create(&input).await?)
            }
        }
    }

    async fn apply_update(
        &self,
        id: TaskId,
        patch: &TaskPatch,
        kind: FailureKind,
    ) -> Result<Task, Failure> {
        match self.service.update(id, patch).await {
            Ok(task) => {
                tracing::info!(task_id = %id, status = %task.status, "task updated");
                self.state.send_modify(|s| {
                    if !s.replace(id, task.clone()) {
                        tracing::debug!(task_id = %id, "updated task is not in the collection");
                    }
                    if kind == FailureKind::Update && s.editing == Some(id) {
                        s.editing = None;
                    }
                    s.last_error = None;
                });
                Ok(task)
            }
            Err(e) => Err(self.record_failure(kind, &e)),
        }
    }

    fn record_failure(&self, kind: FailureKind, err: &ServiceError) -> Failure {
        let failure = Failure::new(kind, err);
        tracing::warn!(error = %err, "{kind}");
        self.state
            .send_modify(|s| s.last_error = Some(failure.clone()));
        failure
    }
}

/// Drops later entries whose id was already seen.
fn dedup_by_id(tasks: Vec<Task>) -> Vec<Task> {
    let mut seen = std::collections::HashSet::with_capacity(tasks.len());
    let before = tasks.len();
    let unique: Vec<Task> = tasks.into_iter().filter(|t| seen.insert(t.id)).collect();
    if unique.len() != before {
        tracing::warn!(
            dropped = before - unique.len(),
            "service returned duplicate task ids"
        );
    }
    unique
}
