//! Repository for the `contractors` table.

use roster_core::types::DbId;
use sqlx::PgPool;

use crate::models::contractor::{Contractor, ContractorInput};

const COLUMNS: &str = "id, first_name, last_name, company_id, \
                       hourly_rate::FLOAT8 AS hourly_rate, start_date, active, \
                       created_at, updated_at";

/// Provides CRUD operations for contractors.
pub struct ContractorRepo;

impl ContractorRepo {
    pub async fn create(pool: &PgPool, input: &ContractorInput) -> Result<Contractor, sqlx::Error> {
        let query = format!(
            "INSERT INTO contractors
                (first_name, last_name, company_id, hourly_rate, start_date, active)
             VALUES ($1, $2, $3, $4::NUMERIC(7, 2), $5, $6)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Contractor>(&query)
            .bind(&input.first_name)
            .bind(&input.last_name)
            .bind(input.company_id)
            .bind(input.hourly_rate)
            .bind(input.start_date)
            .bind(input.active)
            .fetch_one(pool)
            .await
    }

    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Contractor>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM contractors WHERE id = $1");
        sqlx::query_as::<_, Contractor>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &ContractorInput,
    ) -> Result<Option<Contractor>, sqlx::Error> {
        let query = format!(
            "UPDATE contractors SET
                first_name = $2,
                last_name = $3,
                company_id = $4,
                hourly_rate = $5::NUMERIC(7, 2),
                start_date = $6,
                active = $7
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Contractor>(&query)
            .bind(id)
            .bind(&input.first_name)
            .bind(&input.last_name)
            .bind(input.company_id)
            .bind(input.hourly_rate)
            .bind(input.start_date)
            .bind(input.active)
            .fetch_optional(pool)
            .await
    }

    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM contractors WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
