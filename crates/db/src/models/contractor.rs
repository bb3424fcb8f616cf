//! Contractor model and DTOs.

use chrono::NaiveDate;
use roster_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A row from the `contractors` table. `hourly_rate` is `NUMERIC(7,2)`.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Contractor {
    pub id: DbId,
    pub first_name: Option<String>,
    pub last_name: String,
    pub company_id: Option<DbId>,
    pub hourly_rate: Option<f64>,
    pub start_date: Option<NaiveDate>,
    pub active: bool,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ContractorInput {
    pub first_name: Option<String>,
    pub last_name: String,
    pub company_id: Option<DbId>,
    pub hourly_rate: Option<f64>,
    pub start_date: Option<NaiveDate>,
    pub active: bool,
}
