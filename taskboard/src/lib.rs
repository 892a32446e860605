//! `Taskboard`: Kanban task store library.

pub mod commands;
pub mod config;
pub mod demo;
pub mod persist;
pub mod session;
pub mod store;
pub mod views;
