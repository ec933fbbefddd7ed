//! Property-based tests for the pending/completed grouping of the board.
//!
//! Uses proptest to verify:
//! 1. Every task lands in exactly one group, chosen by its status.
//! 2. The groups together cover the collection with no omission or overlap.
//! 3. Each group keeps collection order.

#![allow(clippy::unwrap_used)]

use chrono::{DateTime, TimeZone, Utc};
use proptest::prelude::*;
use taskboard::store::TaskState;
use taskboard_proto::task::{Task, TaskId, TaskStatus};

fn arb_time() -> impl Strategy<Value = DateTime<Utc>> {
    (0i64..4_000_000_000).prop_map(|secs| Utc.timestamp_opt(secs, 0).unwrap())
}

fn arb_status() -> impl Strategy<Value = TaskStatus> {
    prop_oneof![Just(TaskStatus::Pending), Just(TaskStatus::Completed)]
}

/// A task with an arbitrary status; `id` is filled in later.
fn arb_task() -> impl Strategy<Value = Task> {
    (
        "[a-zA-Z0-9 ]{1,40}",
        proptest::option::of("[a-z ]{0,80}"),
        arb_status(),
        arb_time(),
        arb_time(),
    )
        .prop_map(|(title, description, status, created_at, done_at)| Task {
            id: TaskId::new(0),
            title,
            description,
            status,
            created_at,
            completed_at: (status == TaskStatus::Completed).then_some(done_at),
        })
}

/// Collections with unique ids in shuffled order.
fn arb_collection() -> impl Strategy<Value = Vec<Task>> {
    prop::collection::vec(arb_task(), 0..64)
        .prop_map(|tasks| {
            tasks
                .into_iter()
                .zip(1u64..)
                .map(|(mut t, id)| {
                    t.id = TaskId::new(id);
                    t
                })
                .collect::<Vec<_>>()
        })
        .prop_shuffle()
}

proptest! {
    #[test]
    fn every_task_in_exactly_one_group(tasks in arb_collection()) {
        let state = TaskState::from_tasks(tasks);
        let groups = state.groups();

        prop_assert_eq!(groups.len(), state.len());
        for task in state.tasks() {
            let in_pending = groups.pending.iter().filter(|t| t.id == task.id).count();
            let in_completed = groups.completed.iter().filter(|t| t.id == task.id).count();
            prop_assert_eq!(in_pending + in_completed, 1);
            if task.is_completed() {
                prop_assert_eq!(in_completed, 1);
            } else {
                prop_assert_eq!(in_pending, 1);
            }
        }
    }

    #[test]
    fn groups_keep_collection_order(tasks in arb_collection()) {
        let state = TaskState::from_tasks(tasks);
        let groups = state.groups();

        let expected_pending: Vec<TaskId> = state
            .tasks()
            .iter()
            .filter(|t| t.status == TaskStatus::Pending)
            .map(|t| t.id)
            .collect();
        let pending: Vec<TaskId> = groups.pending.iter().map(|t| t.id).collect();
        prop_assert_eq!(pending, expected_pending);

        let expected_completed: Vec<TaskId> = state
            .tasks()
            .iter()
            .filter(|t| t.status == TaskStatus::Completed)
            .map(|t| t.id)
            .collect();
        let completed: Vec<TaskId> = groups.completed.iter().map(|t| t.id).collect();
        prop_assert_eq!(completed, expected_completed);
    }

    #[test]
    fn completed_group_has_completion_times(tasks in arb_collection()) {
        let state = TaskState::from_tasks(tasks);
        let groups = state.groups();
        prop_assert!(groups.completed.iter().all(|t| t.completed_at.is_some()));
        prop_assert!(groups.pending.iter().all(|t| t.completed_at.is_none()));
    }
}
