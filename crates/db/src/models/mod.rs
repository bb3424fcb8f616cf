//! Database row types and input DTOs.

pub mod company;
pub mod contractor;
pub mod department;
pub mod employee;
pub mod user;
pub mod zip_code;

use roster_core::types::DbId;
use serde::Serialize;
use sqlx::FromRow;

/// An `(id, label)` pair used to fill select widgets.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct LabeledId {
    pub id: DbId,
    pub label: String,
}
