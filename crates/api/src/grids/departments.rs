use std::collections::BTreeMap;

use async_trait::async_trait;
use roster_core::form::{FormErrors, FormField, FormSchema, ParsedForm};
use roster_core::grid::{GridColumn, GridSpec};
use roster_core::types::DbId;
use roster_db::models::department::DepartmentInput;
use roster_db::repositories::{DepartmentRepo, GridSource};
use roster_db::DbPool;

use super::{flag_duplicate, GridDefinition, GridResource, RecordValues, SearchKind};

const SEARCH_COLUMNS: &[&str] = &["departments.name", "departments.description"];

pub struct Departments;

fn input(form: &ParsedForm) -> DepartmentInput {
    DepartmentInput {
        name: form.text("name").unwrap_or_default(),
        description: form.text("description"),
    }
}

#[async_trait]
impl GridResource for Departments {
    fn table(&self) -> &'static str {
        "departments"
    }

    fn endpoint(&self) -> &'static str {
        "/departments"
    }

    fn title(&self) -> &'static str {
        "Departments"
    }

    fn noun(&self) -> &'static str {
        "Department"
    }

    async fn grid(&self, _pool: &DbPool, per_page: i64) -> Result<GridDefinition, sqlx::Error> {
        let spec = GridSpec::new(
            self.endpoint(),
            self.table(),
            vec![
                GridColumn::id("departments.id"),
                GridColumn::text("departments.name", "Name"),
                GridColumn::text("departments.description", "Description"),
            ],
        )
        .order_by(&["departments.name"])
        .per_page(per_page)
        .with_builtin_actions();

        Ok(GridDefinition {
            spec,
            source: GridSource {
                from: "departments",
                id_column: "departments.id",
            },
            search: SearchKind::Simple(SEARCH_COLUMNS),
        })
    }

    async fn schema(&self, _pool: &DbPool) -> Result<FormSchema, sqlx::Error> {
        Ok(FormSchema::new(vec![
            FormField::text("name", "Name").required(),
            FormField::text("description", "Description"),
        ]))
    }

    async fn values(
        &self,
        pool: &DbPool,
        id: DbId,
    ) -> Result<Option<BTreeMap<String, String>>, sqlx::Error> {
        Ok(DepartmentRepo::find_by_id(pool, id).await?.map(|d| {
            RecordValues::default()
                .text("name", Some(&d.name))
                .text("description", d.description.as_deref())
                .build()
        }))
    }

    async fn conflicts(
        &self,
        pool: &DbPool,
        id: Option<DbId>,
        form: &ParsedForm,
    ) -> Result<FormErrors, sqlx::Error> {
        let mut errors = FormErrors::default();
        if let Some(name) = form.text("name") {
            let existing = DepartmentRepo::find_by_name(pool, &name).await?;
            flag_duplicate(&mut errors, "name", existing.map(|d| d.id), id);
        }
        Ok(errors)
    }

    async fn create(&self, pool: &DbPool, form: &ParsedForm) -> Result<DbId, sqlx::Error> {
        Ok(DepartmentRepo::create(pool, &input(form)).await?.id)
    }

    async fn update(
        &self,
        pool: &DbPool,
        id: DbId,
        form: &ParsedForm,
    ) -> Result<bool, sqlx::Error> {
        Ok(DepartmentRepo::update(pool, id, &input(form))
            .await?
            .is_some())
    }

    async fn delete(&self, pool: &DbPool, id: DbId) -> Result<bool, sqlx::Error> {
        DepartmentRepo::delete(pool, id).await
    }
}
