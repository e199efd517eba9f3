//! `todoterm` -- terminal task-list client library.
//!
//! The [`controller::TodoController`] keeps a local task list in sync with
//! a remote `/todos` resource reached through an [`api::TodoApi`]. State
//! lives in a [`store::StateStore`] that the terminal UI subscribes to.

pub mod api;
pub mod app;
pub mod banner;
pub mod config;
pub mod controller;
pub mod filter;
pub mod item;
pub mod state;
pub mod store;
pub mod ui;
