//! `todoterm` development server library.
//!
//! Exposes the in-memory `/todos` server for use in tests and embedding.
//! The server keeps tasks per user in memory and can be told to fail
//! selected operations so client failure paths can be exercised over HTTP.

pub mod config;
pub mod server;
pub mod store;
