//! Employee model and DTOs.

use chrono::NaiveDate;
use roster_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A row from the `employees` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Employee {
    pub id: DbId,
    pub first_name: Option<String>,
    pub last_name: String,
    pub company_id: Option<DbId>,
    pub department_id: Option<DbId>,
    /// Another employee; `None` at the top of the chain.
    pub supervisor_id: Option<DbId>,
    pub hired_on: Option<NaiveDate>,
    pub active: bool,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct EmployeeInput {
    pub first_name: Option<String>,
    pub last_name: String,
    pub company_id: Option<DbId>,
    pub department_id: Option<DbId>,
    pub supervisor_id: Option<DbId>,
    pub hired_on: Option<NaiveDate>,
    pub active: bool,
}
