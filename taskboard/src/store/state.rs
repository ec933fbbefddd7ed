//! Immutable snapshot of the task store.

use taskboard_proto::task::{Task, TaskId, TaskStatus};

use super::Failure;

/// Everything the UI needs to render: the task list, which task is being
/// edited, whether the initial load is running, and the latest failure.
///
/// Obtained from [`TaskStore::snapshot`](super::TaskStore::snapshot) or a
/// [`subscribe`](super::TaskStore::subscribe) receiver. Only the store
/// mutates its own copy.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TaskState {
    pub(crate) tasks: Vec<Task>,
    pub(crate) editing: Option<TaskId>,
    pub(crate) loading: bool,
    pub(crate) last_error: Option<Failure>,
}

/// Tasks split by status, each group in collection order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TaskGroups<'a> {
    /// Tasks with [`TaskStatus::Pending`].
    pub pending: Vec<&'a Task>,
    /// Tasks with [`TaskStatus::Completed`].
    pub completed: Vec<&'a Task>,
}

impl TaskState {
    /// A state holding `tasks` and nothing else.
    #[must_use]
    pub fn from_tasks(tasks: Vec<Task>) -> Self {
        Self {
            tasks,
            ..Self::default()
        }
    }

    /// All tasks, most recently created first for tasks created in this
    /// session, otherwise in service order.
    #[must_use]
    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    /// Looks up a task by id.
    #[must_use]
    pub fn find(&self, id: TaskId) -> Option<&Task> {
        self.tasks.iter().find(|t| t.id == id)
    }

    /// Id of the task selected for editing.
    #[must_use]
    pub const fn editing_id(&self) -> Option<TaskId> {
        self.editing
    }

    /// The task selected for editing, if it is still in the collection.
    #[must_use]
    pub fn editing_task(&self) -> Option<&Task> {
        self.editing.and_then(|id| self.find(id))
    }

    /// `true` while the initial load is in flight.
    #[must_use]
    pub const fn is_loading(&self) -> bool {
        self.loading
    }

    /// The failure recorded by the most recent operation, if it failed.
    #[must_use]
    pub const fn last_error(&self) -> Option<&Failure> {
        self.last_error.as_ref()
    }

    /// Number of tasks.
    #[must_use]
    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    /// `true` if there are no tasks.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    /// Splits the collection into pending and completed groups.
    ///
    /// Every task lands in exactly one group, chosen by its status alone.
    #[must_use]
    pub fn groups(&self) -> TaskGroups<'_> {
        let (completed, pending) = self.tasks.iter().partition(|t| t.is_completed());
        TaskGroups { pending, completed }
    }

    /// Replaces the task with id `id` in place. Returns `false` if absent.
    pub(crate) fn replace(&mut self, id: TaskId, task: Task) -> bool {
        match self.tasks.iter_mut().find(|t| t.id == id) {
            Some(slot) => {
                *slot = task;
                true
            }
            None => false,
        }
    }

    /// Current status of a task, if present.
    pub(crate) fn status_of(&self, id: TaskId) -> Option<TaskStatus> {
        self.find(id).map(|t| t.status)
    }
}

impl TaskGroups<'_> {
    /// Total number of tasks across both groups.
    #[must_use]
    pub fn len(&self) -> usize {
        self.pending.len() + self.completed.len()
    }

    /// `true` if both groups are empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.pending.is_empty() && self.completed.is_empty()
    }
}
