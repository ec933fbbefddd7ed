//! Plain-text rendering of the task board.
//!
//! The board shows the latest failure, a loading line while the collection
//! is being fetched, and then the pending and completed groups with their
//! counts. Timestamps are shown in local time.

use std::fmt::Write as _;

use chrono::{DateTime, Local, Utc};
use taskboard_proto::task::Task;

use crate::store::TaskState;

/// Default chrono format for creation and completion times.
pub const DEFAULT_TIMESTAMP_FORMAT: &str = "%d/%m/%Y %H:%M";

const INDENT: &str = "      ";

/// Renders the whole board as text, one line per row.
#[must_use]
pub fn render_board(state: &TaskState, timestamp_format: &str) -> String {
    let mut out = String::new();

    if let Some(failure) = state.last_error() {
        let _ = writeln!(out, "error: {failure}");
    }
    if state.is_loading() {
        out.push_str("Loading tasks...\n");
        return out;
    }
    if state.is_empty() {
        out.push_str("No tasks yet. Add one with `taskboard add <title>`.\n");
        return out;
    }

    let editing = state.editing_id();
    let groups = state.groups();
    for (heading, tasks) in [("Pending", &groups.pending), ("Completed", &groups.completed)] {
        let _ = writeln!(out, "{heading} ({})", tasks.len());
        for task in tasks.iter() {
            render_task(&mut out, task, editing == Some(task.id), timestamp_format);
        }
    }
    out
}

/// Renders one task row plus its detail lines.
pub fn render_task(out: &mut String, task: &Task, editing: bool, timestamp_format: &str) {
    let checkbox = if task.is_completed() { "[x]" } else { "[ ]" };
    let marker = if editing { "  (editing)" } else { "" };
    let _ = writeln!(out, "  {checkbox} #{} {}{marker}", task.id, task.title);

    if let Some(description) = &task.description {
        for line in description.lines() {
            let _ = writeln!(out, "{INDENT}{line}");
        }
    }

    let _ = write!(
        out,
        "{INDENT}created {}",
        format_timestamp(task.created_at, timestamp_format)
    );
    if let Some(completed_at) = task.completed_at {
        let _ = write!(
            out,
            ", completed {}",
            format_timestamp(completed_at, timestamp_format)
        );
    }
    out.push('\n');
}

/// Formats a UTC instant in local time.
///
/// An unusable format string falls back to RFC 3339.
#[must_use]
pub fn format_timestamp(at: DateTime<Utc>, format: &str) -> String {
    let local = at.with_timezone(&Local);
    let mut formatted = String::new();
    if write!(formatted, "{}", local.format(format)).is_err() {
        return local.to_rfc3339();
    }
    formatted
}
