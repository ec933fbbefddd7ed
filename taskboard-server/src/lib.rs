//! `Taskboard` reference task service library.
//!
//! Exposes the in-memory service for use in tests and embedding. It serves
//! the task CRUD contract the `taskboard` client consumes.

pub mod config;
pub mod server;
pub mod store;
