//! Repository for the `employees` table.

use roster_core::types::DbId;
use sqlx::PgPool;

use crate::models::employee::{Employee, EmployeeInput};
use crate::models::LabeledId;

const COLUMNS: &str = "id, first_name, last_name, company_id, department_id, supervisor_id, \
                       hired_on, active, created_at, updated_at";

/// Provides CRUD operations for employees.
pub struct EmployeeRepo;

impl EmployeeRepo {
    pub async fn create(pool: &PgPool, input: &EmployeeInput) -> Result<Employee, sqlx::Error> {
        let query = format!(
            "INSERT INTO employees
                (first_name, last_name, company_id, department_id, supervisor_id, hired_on, active)
             VALUES ($1, $2, $3, $4, $5, $6, $7)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Employee>(&query)
            .bind(&input.first_name)
            .bind(&input.last_name)
            .bind(input.company_id)
            .bind(input.department_id)
            .bind(input.supervisor_id)
            .bind(input.hired_on)
            .bind(input.active)
            .fetch_one(pool)
            .await
    }

    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Employee>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM employees WHERE id = $1");
        sqlx::query_as::<_, Employee>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &EmployeeInput,
    ) -> Result<Option<Employee>, sqlx::Error> {
        let query = format!(
            "UPDATE employees SET
                first_name = $2,
                last_name = $3,
                company_id = $4,
                department_id = $5,
                supervisor_id = $6,
                hired_on = $7,
                active = $8
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Employee>(&query)
            .bind(id)
            .bind(&input.first_name)
            .bind(&input.last_name)
            .bind(input.company_id)
            .bind(input.department_id)
            .bind(input.supervisor_id)
            .bind(input.hired_on)
            .bind(input.active)
            .fetch_optional(pool)
            .await
    }

    /// Delete an employee. Fails while other employees name them as supervisor.
    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM employees WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Employees as `"Last, First"` options, for the supervisor select.
    pub async fn list_options(pool: &PgPool) -> Result<Vec<LabeledId>, sqlx::Error> {
        sqlx::query_as::<_, LabeledId>(
            "SELECT id, CONCAT_WS(', ', last_name, first_name) AS label
             FROM employees
             ORDER BY last_name, first_name, id",
        )
        .fetch_all(pool)
        .await
    }
}
