use std::collections::BTreeMap;

use async_trait::async_trait;
use roster_core::form::{FormErrors, FormField, FormSchema, ParsedForm};
use roster_core::grid::{GridColumn, GridSpec};
use roster_core::types::DbId;
use roster_db::models::company::CompanyInput;
use roster_db::repositories::{CompanyRepo, GridSource};
use roster_db::DbPool;

use super::{flag_duplicate, GridDefinition, GridResource, RecordValues, SearchKind};

const SEARCH_COLUMNS: &[&str] = &["companies.name", "companies.city", "companies.state"];

pub struct Companies;

fn input(form: &ParsedForm) -> CompanyInput {
    CompanyInput {
        name: form.text("name").unwrap_or_default(),
        city: form.text("city"),
        state: form.text("state"),
        zip_code: form.text("zip_code"),
        phone: form.text("phone"),
    }
}

#[async_trait]
impl GridResource for Companies {
    fn table(&self) -> &'static str {
        "companies"
    }

    fn endpoint(&self) -> &'static str {
        "/companies"
    }

    fn title(&self) -> &'static str {
        "Companies"
    }

    fn noun(&self) -> &'static str {
        "Company"
    }

    async fn grid(&self, _pool: &DbPool, per_page: i64) -> Result<GridDefinition, sqlx::Error> {
        let spec = GridSpec::new(
            self.endpoint(),
            self.table(),
            vec![
                GridColumn::id("companies.id"),
                GridColumn::text("companies.name", "Name"),
                GridColumn::text("companies.city", "City"),
                GridColumn::text("companies.state", "State"),
                GridColumn::text("companies.zip_code", "Zip Code"),
                GridColumn::text("companies.phone", "Phone"),
            ],
        )
        .order_by(&["companies.name"])
        .per_page(per_page)
        .with_builtin_actions();

        Ok(GridDefinition {
            spec,
            source: GridSource {
                from: "companies",
                id_column: "companies.id",
            },
            search: SearchKind::Simple(SEARCH_COLUMNS),
        })
    }

    async fn schema(&self, _pool: &DbPool) -> Result<FormSchema, sqlx::Error> {
        Ok(FormSchema::new(vec![
            FormField::text("name", "Name").required(),
            FormField::text("city", "City"),
            FormField::text("state", "State").max_length(2),
            FormField::text("zip_code", "Zip Code").max_length(5),
            FormField::text("phone", "Phone"),
        ]))
    }

    async fn values(
        &self,
        pool: &DbPool,
        id: DbId,
    ) -> Result<Option<BTreeMap<String, String>>, sqlx::Error> {
        Ok(CompanyRepo::find_by_id(pool, id).await?.map(|c| {
            RecordValues::default()
                .text("name", Some(&c.name))
                .text("city", c.city.as_deref())
                .text("state", c.state.as_deref())
                .text("zip_code", c.zip_code.as_deref())
                .text("phone", c.phone.as_deref())
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
            let existing = CompanyRepo::find_by_name(pool, &name).await?;
            flag_duplicate(&mut errors, "name", existing.map(|c| c.id), id);
        }
        Ok(errors)
    }

    async fn create(&self, pool: &DbPool, form: &ParsedForm) -> Result<DbId, sqlx::Error> {
        Ok(CompanyRepo::create(pool, &input(form)).await?.id)
    }

    async fn update(
        &self,
        pool: &DbPool,
        id: DbId,
        form: &ParsedForm,
    ) -> Result<bool, sqlx::Error> {
        Ok(CompanyRepo::update(pool, id, &input(form)).await?.is_some())
    }

    async fn delete(&self, pool: &DbPool, id: DbId) -> Result<bool, sqlx::Error> {
        CompanyRepo::delete(pool, id).await
    }
}
