//! Roster core library.
//!
//! Pure, I/O-free building blocks shared by the database and HTTP crates:
//!
//! - [`grid`] -- the SimpleTable engine (paging, sort encoding, page window,
//!   per-user state cookie, HTML rendering).
//! - [`search`] -- search form definitions and grid filters.
//! - [`form`] -- record form schemas, input validation, and rendering.
//! - [`datatables`] -- request parsing and response shapes for datatables.net.

pub mod datatables;
pub mod error;
pub mod form;
pub mod grid;
pub mod html;
pub mod search;
pub mod types;
