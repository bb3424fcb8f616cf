//! Request extractors shared by the page handlers.

pub mod auth;
