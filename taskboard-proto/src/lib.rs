//! Shared task model and wire format for `Taskboard`.

pub mod api;
pub mod task;
