use std::collections::BTreeMap;

use async_trait::async_trait;
use roster_core::form::{FieldKind, FormField, FormSchema, ParsedForm};
use roster_core::grid::{ColumnKind, GridColumn, GridSpec};
use roster_core::types::DbId;
use roster_db::models::contractor::ContractorInput;
use roster_db::repositories::{CompanyRepo, ContractorRepo, GridSource};
use roster_db::DbPool;

use super::{select_options, GridDefinition, GridResource, RecordValues, SearchKind};

const SEARCH_COLUMNS: &[&str] = &[
    "contractors.first_name",
    "contractors.last_name",
    "companies.name",
];

pub struct Contractors;

fn input(form: &ParsedForm) -> ContractorInput {
    ContractorInput {
        first_name: form.text("first_name"),
        last_name: form.text("last_name").unwrap_or_default(),
        company_id: form.id("company_id"),
        hourly_rate: form.decimal("hourly_rate"),
        start_date: form.date("start_date"),
        active: form.flag("active"),
    }
}

#[async_trait]
impl GridResource for Contractors {
    fn table(&self) -> &'static str {
        "contractors"
    }

    fn endpoint(&self) -> &'static str {
        "/contractors"
    }

    fn title(&self) -> &'static str {
        "Contractors"
    }

    fn noun(&self) -> &'static str {
        "Contractor"
    }

    async fn grid(&self, _pool: &DbPool, per_page: i64) -> Result<GridDefinition, sqlx::Error> {
        let spec = GridSpec::new(
            self.endpoint(),
            self.table(),
            vec![
                GridColumn::id("contractors.id"),
                GridColumn::text("contractors.first_name", "First Name"),
                GridColumn::text("contractors.last_name", "Last Name"),
                GridColumn::text("companies.name", "Company"),
                GridColumn::new("contractors.hourly_rate", "Rate", ColumnKind::Decimal),
                GridColumn::new("contractors.start_date", "Start Date", ColumnKind::Date),
                GridColumn::new("contractors.active", "Active", ColumnKind::Boolean),
            ],
        )
        .order_by(&["contractors.last_name", "contractors.first_name"])
        .per_page(per_page)
        .with_builtin_actions();

        Ok(GridDefinition {
            spec,
            source: GridSource {
                from: "contractors LEFT JOIN companies ON companies.id = contractors.company_id",
                id_column: "contractors.id",
            },
            search: SearchKind::Simple(SEARCH_COLUMNS),
        })
    }

    async fn schema(&self, pool: &DbPool) -> Result<FormSchema, sqlx::Error> {
        let companies = CompanyRepo::list_options(pool).await?;
        Ok(FormSchema::new(vec![
            FormField::text("first_name", "First Name"),
            FormField::text("last_name", "Last Name").required(),
            FormField::new(
                "company_id",
                "Company",
                FieldKind::Reference(select_options(&companies)),
            ),
            FormField::new(
                "hourly_rate",
                "Hourly Rate",
                FieldKind::Decimal {
                    precision: 7,
                    scale: 2,
                },
            ),
            FormField::new("start_date", "Start Date", FieldKind::Date),
            FormField::new("active", "Active", FieldKind::Boolean),
        ]))
    }

    async fn values(
        &self,
        pool: &DbPool,
        id: DbId,
    ) -> Result<Option<BTreeMap<String, String>>, sqlx::Error> {
        Ok(ContractorRepo::find_by_id(pool, id).await?.map(|c| {
            RecordValues::default()
                .text("first_name", c.first_name.as_deref())
                .text("last_name", Some(&c.last_name))
                .id("company_id", c.company_id)
                .decimal("hourly_rate", c.hourly_rate, 2)
                .date("start_date", c.start_date)
                .flag("active", c.active)
                .build()
        }))
    }

    async fn create(&self, pool: &DbPool, form: &ParsedForm) -> Result<DbId, sqlx::Error> {
        Ok(ContractorRepo::create(pool, &input(form)).await?.id)
    }

    async fn update(
        &self,
        pool: &DbPool,
        id: DbId,
        form: &ParsedForm,
    ) -> Result<bool, sqlx::Error> {
        Ok(ContractorRepo::update(pool, id, &input(form))
            .await?
            .is_some())
    }

    async fn delete(&self, pool: &DbPool, id: DbId) -> Result<bool, sqlx::Error> {
        ContractorRepo::delete(pool, id).await
    }
}
