pub mod auth;
pub mod datatables;
pub mod grids;
pub mod zip_codes;
