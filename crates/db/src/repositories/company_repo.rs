//! Repository for the `companies` table.

use roster_core::types::DbId;
use sqlx::PgPool;

use crate::models::company::{Company, CompanyInput};
use crate::models::LabeledId;

const COLUMNS: &str = "id, name, city, state, zip_code, phone, created_at, updated_at";

/// Provides CRUD operations for companies.
pub struct CompanyRepo;

impl CompanyRepo {
    /// Insert a new company, returning the created row.
    pub async fn create(pool: &PgPool, input: &CompanyInput) -> Result<Company, sqlx::Error> {
        let query = format!(
            "INSERT INTO companies (name, city, state, zip_code, phone)
             VALUES ($1, $2, $3, $4, $5)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Company>(&query)
            .bind(&input.name)
            .bind(&input.city)
            .bind(&input.state)
            .bind(&input.zip_code)
            .bind(&input.phone)
            .fetch_one(pool)
            .await
    }

    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Company>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM companies WHERE id = $1");
        sqlx::query_as::<_, Company>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    pub async fn find_by_name(pool: &PgPool, name: &str) -> Result<Option<Company>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM companies WHERE name = $1");
        sqlx::query_as::<_, Company>(&query)
            .bind(name)
            .fetch_optional(pool)
            .await
    }

    /// Replace every writable column. Returns `None` if the row does not exist.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &CompanyInput,
    ) -> Result<Option<Company>, sqlx::Error> {
        let query = format!(
            "UPDATE companies SET
                name = $2,
                city = $3,
                state = $4,
                zip_code = $5,
                phone = $6
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Company>(&query)
            .bind(id)
            .bind(&input.name)
            .bind(&input.city)
            .bind(&input.state)
            .bind(&input.zip_code)
            .bind(&input.phone)
            .fetch_optional(pool)
            .await
    }

    /// Delete a company. Fails with a foreign key violation while employees
    /// or contractors still reference it.
    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM companies WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Every company as an `(id, name)` pair, ordered by name.
    pub async fn list_options(pool: &PgPool) -> Result<Vec<LabeledId>, sqlx::Error> {
        sqlx::query_as::<_, LabeledId>("SELECT id, name AS label FROM companies ORDER BY name")
            .fetch_all(pool)
            .await
    }
}
