//! Server-rendered page shells.
//!
//! Handlers build the page body with the `roster_core` renderers and wrap
//! it in [`layout::Page`]; the login and registration screens live in
//! [`auth`].

pub mod auth;
pub mod layout;
