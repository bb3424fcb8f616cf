//! Roster web server library.
//!
//! Exposes config, state, error handling, auth, grid definitions, handlers,
//! and routes so integration tests and the binary entrypoint can both use
//! them.

pub mod auth;
pub mod config;
pub mod error;
pub mod grids;
pub mod handlers;
pub mod middleware;
pub mod router;
pub mod routes;
pub mod state;
pub mod views;
