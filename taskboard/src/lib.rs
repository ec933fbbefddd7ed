//! Client library for a remote task service.
//!
//! [`store::TaskStore`] keeps a local view of the task collection in step
//! with a [`service::TaskService`]; [`ui`] renders it as text.

pub mod config;
pub mod form;
pub mod service;
pub mod store;
pub mod ui;
