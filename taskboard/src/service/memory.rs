//! In-process task service for testing.
//!
//! [`InMemoryTaskService`] keeps its own task list and follows the same
//! contract as the remote service: increasing ids, new tasks stored in
//! insertion order, completion time stamped on `Pending -> Completed` and
//! cleared on the way back. Two hooks let tests shape the call outcome:
//!
//! - [`fail_next`](InMemoryTaskService::fail_next) makes the next call fail
//!   before it touches any state.
//! - [`hold_next`](InMemoryTaskService::hold_next) lets the next call apply
//!   its change but delays its response until the returned sender fires (or
//!   is dropped), which is how out-of-order completions are reproduced.

use std::collections::VecDeque;

use chrono::Utc;
use parking_lot::Mutex;
use taskboard_proto::task::{NewTask, Task, TaskId, TaskPatch, TaskStatus};
use tokio::sync::oneshot;

use super::{ServiceError, TaskService};

#[derive(Debug)]
struct Inner {
    tasks: Vec<Task>,
    next_id: u64,
    pending_failures: usize,
    holds: VecDeque<oneshot::Receiver<()>>,
    calls: usize,
}

/// A [`TaskService`] that lives entirely in memory.
#[derive(Debug)]
pub struct InMemoryTaskService {
    inner: Mutex<Inner>,
}

impl Default for InMemoryTaskService {
    fn default() -> Self {
        Self::new()
    }
}

impl InMemoryTaskService {
    /// Creates an empty service. The first created task gets id 1.
    #[must_use]
    pub fn new() -> Self {
        Self::with_tasks(Vec::new())
    }

    /// Creates a service pre-populated with `tasks`, returned by `list` in
    /// the given order. New ids continue after the highest seeded id.
    #[must_use]
    pub fn with_tasks(tasks: Vec<Task>) -> Self {
        let next_id = tasks.iter().map(|t| t.id.get()).max().unwrap_or(0) + 1;
        Self {
            inner: Mutex::new(Inner {
                tasks,
                next_id,
                pending_failures: 0,
                holds: VecDeque::new(),
                calls: 0,
            }),
        }
    }

    /// Makes the next call fail with [`ServiceError::Unavailable`].
    /// Repeated calls queue up further failures.
    pub fn fail_next(&self) {
        self.inner.lock().pending_failures += 1;
    }

    /// Delays the response of the next call until the returned sender is
    /// used or dropped. The call's effect on the service state is applied
    /// immediately.
    #[must_use]
    pub fn hold_next(&self) -> oneshot::Sender<()> {
        let (tx, rx) = oneshot::channel();
        self.inner.lock().holds.push_back(rx);
        tx
    }

    /// Number of calls received so far, failed ones included.
    #[must_use]
    pub fn call_count(&self) -> usize {
        self.inner.lock().calls
    }

    /// The service-side task list.
    #[must_use]
    pub fn tasks(&self) -> Vec<Task> {
        self.inner.lock().tasks.clone()
    }

    /// Registers a call: counts it, consumes an injected failure, and picks
    /// up a pending hold.
    fn begin(&self) -> Result<Option<oneshot::Receiver<()>>, ServiceError> {
        let mut inner = self.inner.lock();
        inner.calls += 1;
        if inner.pending_failures > 0 {
            inner.pending_failures -= 1;
            return Err(ServiceError::Unavailable("injected failure".to_string()));
        }
        Ok(inner.holds.pop_front())
    }
}

async fn release(hold: Option<oneshot::Receiver<()>>) {
    if let Some(rx) = hold {
        // A dropped sender releases the call as well.
        let _ = rx.await;
    }
}

impl TaskService for InMemoryTaskService {
    async fn list(&self) -> Result<Vec<Task>, ServiceError> {
        let hold = self.begin()?;
        let tasks = self.tasks();
        release(hold).await;
        Ok(tasks)
    }

    async fn create(&self, input: &NewTask) -> Result<Task, ServiceError> {
        let hold = self.begin()?;
        let task = {
            let mut inner = self.inner.lock();
            let task = Task {
                id: TaskId::new(inner.next_id),
                title: input.title().to_string(),
                description: input.description().map(ToString::to_string),
                status: TaskStatus::Pending,
                created_at: Utc::now(),
                completed_at: None,
            };
            inner.next_id += 1;
            inner.tasks.push(task.clone());
            task
        };
        release(hold).await;
        Ok(task)
    }

    async fn update(&self, id: TaskId, patch: &TaskPatch) -> Result<Task, ServiceError> {
        let hold = self.begin()?;
        let result = {
            let mut inner = self.inner.lock();
            inner
                .tasks
                .iter_mut()
                .find(|t| t.id == id)
                .map(|task| {
                    apply_patch(task, patch);
                    task.clone()
                })
                .ok_or(ServiceError::NotFound(id))
        };
        release(hold).await;
        result
    }

    async fn delete(&self, id: TaskId) -> Result<(), ServiceError> {
        let hold = self.begin()?;
        let removed = {
            let mut inner = self.inner.lock();
            let before = inner.tasks.len();
            inner.tasks.retain(|t| t.id != id);
            inner.tasks.len() != before
        };
        release(hold).await;
        if removed {
            Ok(())
        } else {
            Err(ServiceError::NotFound(id))
        }
    }
}

fn apply_patch(task: &mut Task, patch: &TaskPatch) {
    if let Some(title) = patch.title() {
        task.title = title.to_string();
    }
    if let Some(description) = patch.description() {
        task.description = (!description.is_empty()).then(|| description.to_string());
    }
    if let Some(status) = patch.status() {
        match status {
            TaskStatus::Completed if task.status == TaskStatus::Pending => {
                task.completed_at = Some(Utc::now());
            }
            TaskStatus::Pending => task.completed_at = None,
            TaskStatus::Completed => {}
        }
        task.status = status;
    }
}
