//! Employees: joined columns and a multi-field search.

use std::collections::BTreeMap;

use async_trait::async_trait;
use roster_core::form::{FieldKind, FormErrors, FormField, FormSchema, ParsedForm};
use roster_core::grid::{ColumnKind, GridColumn, GridSpec};
use roster_core::search::{GridSearch, SearchField};
use roster_core::types::DbId;
use roster_db::models::employee::EmployeeInput;
use roster_db::repositories::{CompanyRepo, DepartmentRepo, EmployeeRepo, GridSource};
use roster_db::DbPool;

use super::{search_options, select_options, GridDefinition, GridResource, RecordValues, SearchKind};

const SOURCE: GridSource = GridSource {
    from: "employees \
           LEFT JOIN companies ON companies.id = employees.company_id \
           LEFT JOIN departments ON departments.id = employees.department_id \
           LEFT JOIN employees AS supervisors ON supervisors.id = employees.supervisor_id",
    id_column: "employees.id",
};

pub struct Employees;

fn input(form: &ParsedForm) -> EmployeeInput {
    EmployeeInput {
        first_name: form.text("first_name"),
        last_name: form.text("last_name").unwrap_or_default(),
        company_id: form.id("company_id"),
        department_id: form.id("department_id"),
        supervisor_id: form.id("supervisor_id"),
        hired_on: form.date("hired_on"),
        active: form.flag("active"),
    }
}

#[async_trait]
impl GridResource for Employees {
    fn table(&self) -> &'static str {
        "employees"
    }

    fn endpoint(&self) -> &'static str {
        "/employees"
    }

    fn title(&self) -> &'static str {
        "Employees"
    }

    fn noun(&self) -> &'static str {
        "Employee"
    }

    async fn grid(&self, pool: &DbPool, per_page: i64) -> Result<GridDefinition, sqlx::Error> {
        let companies = CompanyRepo::list_options(pool).await?;
        let departments = DepartmentRepo::list_options(pool).await?;

        let spec = GridSpec::new(
            self.endpoint(),
            self.table(),
            vec![
                GridColumn::id("employees.id"),
                GridColumn::text("employees.first_name", "First Name"),
                GridColumn::text("employees.last_name", "Last Name"),
                GridColumn::text("companies.name", "Company"),
                GridColumn::text("departments.name", "Department"),
                GridColumn::text("supervisors.last_name", "Supervisor"),
                GridColumn::new("employees.hired_on", "Hired", ColumnKind::Date),
                GridColumn::new("employees.active", "Active", ColumnKind::Boolean),
            ],
        )
        .order_by(&["employees.last_name", "employees.first_name"])
        .per_page(per_page)
        .with_builtin_actions();

        let search = GridSearch::new(vec![
            SearchField::contains("name", &["employees.first_name", "employees.last_name"]),
            SearchField::equals_id("company", "employees.company_id", search_options(&companies)),
            SearchField::equals_id(
                "department",
                "employees.department_id",
                search_options(&departments),
            ),
            SearchField::flag("active", "employees.active"),
        ]);

        Ok(GridDefinition {
            spec,
            source: SOURCE,
            search: SearchKind::Fields(search),
        })
    }

    async fn schema(&self, pool: &DbPool) -> Result<FormSchema, sqlx::Error> {
        let companies = CompanyRepo::list_options(pool).await?;
        let departments = DepartmentRepo::list_options(pool).await?;
        let supervisors = EmployeeRepo::list_options(pool).await?;

        Ok(FormSchema::new(vec![
            FormField::text("first_name", "First Name"),
            FormField::text("last_name", "Last Name").required(),
            FormField::new(
                "company_id",
                "Company",
                FieldKind::Reference(select_options(&companies)),
            ),
            FormField::new(
                "department_id",
                "Department",
                FieldKind::Reference(select_options(&departments)),
            ),
            FormField::new(
                "supervisor_id",
                "Supervisor",
                FieldKind::Reference(select_options(&supervisors)),
            ),
            FormField::new("hired_on", "Hired On", FieldKind::Date),
            FormField::new("active", "Active", FieldKind::Boolean),
        ]))
    }

    async fn values(
        &self,
        pool: &DbPool,
        id: DbId,
    ) -> Result<Option<BTreeMap<String, String>>, sqlx::Error> {
        Ok(EmployeeRepo::find_by_id(pool, id).await?.map(|e| {
            RecordValues::default()
                .text("first_name", e.first_name.as_deref())
                .text("last_name", Some(&e.last_name))
                .id("company_id", e.company_id)
                .id("department_id", e.department_id)
                .id("supervisor_id", e.supervisor_id)
                .date("hired_on", e.hired_on)
                .flag("active", e.active)
                .build()
        }))
    }

    async fn conflicts(
        &self,
        _pool: &DbPool,
        id: Option<DbId>,
        form: &ParsedForm,
    ) -> Result<FormErrors, sqlx::Error> {
        let mut errors = FormErrors::default();
        if id.is_some() && form.id("supervisor_id") == id {
            errors.add("supervisor_id", "An employee cannot supervise themselves");
        }
        Ok(errors)
    }

    async fn create(&self, pool: &DbPool, form: &ParsedForm) -> Result<DbId, sqlx::Error> {
        Ok(EmployeeRepo::create(pool, &input(form)).await?.id)
    }

    async fn update(
        &self,
        pool: &DbPool,
        id: DbId,
        form: &ParsedForm,
    ) -> Result<bool, sqlx::Error> {
        Ok(EmployeeRepo::update(pool, id, &input(form)).await?.is_some())
    }

    async fn delete(&self, pool: &DbPool, id: DbId) -> Result<bool, sqlx::Error> {
        EmployeeRepo::delete(pool, id).await
    }
}
