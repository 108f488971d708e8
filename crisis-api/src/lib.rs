//! Crisis API library crate.
//!
//! All the logic for the crisis-simulation web service: configuration,
//! wire models, handlers, and routing. The `main.rs` binary is a thin
//! wrapper around this library.

pub mod config;
pub mod handlers;
pub mod models;
pub mod router;
pub mod state;
