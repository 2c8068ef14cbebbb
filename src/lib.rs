//! Terminal to-do list with a live countdown to each task's due date.
//!
//! Tasks live in a flat file (`description|YYYY-MM-DD HH:MM:SS` per line)
//! owned by [`TaskStore`]. [`TaskListPanel`] presents them as a sortable
//! table and [`App`] drives the interactive prompts around it.

pub mod app;
pub mod config;
pub mod countdown;
pub mod error;
pub mod panel;
pub mod task;
pub mod task_store;
pub mod ui;

pub use app::App;
pub use config::Config;
pub use panel::{SortColumn, TaskListPanel};
pub use task::Task;
pub use task_store::TaskStore;
