//! Zip code model and DTOs.

use roster_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A row from the `zip_codes` table.
///
/// `latitude`/`longitude` are `NUMERIC(5,2)` in the database and are read
/// through a `::FLOAT8` cast.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct ZipCode {
    pub id: DbId,
    pub zip_code: String,
    pub zip_type: Option<String>,
    pub primary_city: Option<String>,
    pub state: Option<String>,
    pub county: Option<String>,
    pub timezone: Option<String>,
    pub area_code: Option<String>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// Full set of writable columns, used for both insert and update.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ZipCodeInput {
    pub zip_code: String,
    pub zip_type: Option<String>,
    pub primary_city: Option<String>,
    pub state: Option<String>,
    pub county: Option<String>,
    pub timezone: Option<String>,
    pub area_code: Option<String>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
}
