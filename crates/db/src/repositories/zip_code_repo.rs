//! Repository for the `zip_codes` table.

use roster_core::types::DbId;
use sqlx::PgPool;

use crate::models::zip_code::{ZipCode, ZipCodeInput};

/// Column list shared across queries. NUMERIC columns are read as FLOAT8.
const COLUMNS: &str = "id, zip_code, zip_type, primary_city, state, county, timezone, \
                       area_code, latitude::FLOAT8 AS latitude, longitude::FLOAT8 AS longitude, \
                       created_at, updated_at";

/// Provides CRUD operations for zip codes.
pub struct ZipCodeRepo;

impl ZipCodeRepo {
    /// Insert a new zip code, returning the created row.
    pub async fn create(pool: &PgPool, input: &ZipCodeInput) -> Result<ZipCode, sqlx::Error> {
        let query = format!(
            "INSERT INTO zip_codes
                (zip_code, zip_type, primary_city, state, county, timezone, area_code,
                 latitude, longitude)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8::NUMERIC(5, 2), $9::NUMERIC(5, 2))
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, ZipCode>(&query)
            .bind(&input.zip_code)
            .bind(&input.zip_type)
            .bind(&input.primary_city)
            .bind(&input.state)
            .bind(&input.county)
            .bind(&input.timezone)
            .bind(&input.area_code)
            .bind(input.latitude)
            .bind(input.longitude)
            .fetch_one(pool)
            .await
    }

    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<ZipCode>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM zip_codes WHERE id = $1");
        sqlx::query_as::<_, ZipCode>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Find a zip code by its (unique) code.
    pub async fn find_by_zip_code(
        pool: &PgPool,
        zip_code: &str,
    ) -> Result<Option<ZipCode>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM zip_codes WHERE zip_code = $1");
        sqlx::query_as::<_, ZipCode>(&query)
            .bind(zip_code)
            .fetch_optional(pool)
            .await
    }

    /// Replace every writable column of a zip code.
    ///
    /// Returns `None` if no row with the given `id` exists.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &ZipCodeInput,
    ) -> Result<Option<ZipCode>, sqlx::Error> {
        let query = format!(
            "UPDATE zip_codes SET
                zip_code = $2,
                zip_type = $3,
                primary_city = $4,
                state = $5,
                county = $6,
                timezone = $7,
                area_code = $8,
                latitude = $9::NUMERIC(5, 2),
                longitude = $10::NUMERIC(5, 2)
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, ZipCode>(&query)
            .bind(id)
            .bind(&input.zip_code)
            .bind(&input.zip_type)
            .bind(&input.primary_city)
            .bind(&input.state)
            .bind(&input.county)
            .bind(&input.timezone)
            .bind(&input.area_code)
            .bind(input.latitude)
            .bind(input.longitude)
            .fetch_optional(pool)
            .await
    }

    /// Delete a zip code. Returns `true` if a row was removed.
    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM zip_codes WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
