//! Grid and record-form definitions for every table behind a SimpleTable.
//!
//! Each table implements [`GridResource`]: how its list page is built
//! ([`GridDefinition`]), which form edits a record, and how parsed form
//! values reach its repository. The generic handlers in
//! [`crate::handlers::grids`] only ever talk to this trait.

pub mod companies;
pub mod contractors;
pub mod cookie;
pub mod departments;
pub mod employees;
pub mod zip_codes;

use std::collections::BTreeMap;

use async_trait::async_trait;
use chrono::NaiveDate;
use roster_core::form::{FormErrors, FormSchema, ParsedForm, SelectOption};
use roster_core::grid::GridSpec;
use roster_core::search::{GridSearch, SearchOption};
use roster_core::types::DbId;
use roster_db::models::LabeledId;
use roster_db::repositories::GridSource;
use roster_db::DbPool;

/// Field error shown when a unique value is already taken.
pub const DUPLICATE_MESSAGE: &str = "Value already in database";

/// Grid state key holding the simple search box value.
pub const SEARCH_FILTER_KEY: &str = "search_filter";

/// How a grid is searched.
#[derive(Debug, Clone)]
pub enum SearchKind {
    /// One free-text box matched against these columns.
    Simple(&'static [&'static str]),
    /// Several labelled fields, each adding one filter.
    Fields(GridSearch),
}

/// Everything needed to serve one list page.
#[derive(Debug, Clone)]
pub struct GridDefinition {
    pub spec: GridSpec,
    pub source: GridSource,
    pub search: SearchKind,
}

/// A table exposed through a SimpleTable grid and record forms.
#[async_trait]
pub trait GridResource: Send + Sync {
    /// Primary table, the `{table}` segment of built-in action routes.
    fn table(&self) -> &'static str;

    /// Path of the list page.
    fn endpoint(&self) -> &'static str;

    /// Heading of the list page.
    fn title(&self) -> &'static str;

    /// Heading of the record form.
    fn noun(&self) -> &'static str;

    async fn grid(&self, pool: &DbPool, per_page: i64) -> Result<GridDefinition, sqlx::Error>;

    async fn schema(&self, pool: &DbPool) -> Result<FormSchema, sqlx::Error>;

    /// Form display values for an existing record.
    async fn values(
        &self,
        pool: &DbPool,
        id: DbId,
    ) -> Result<Option<BTreeMap<String, String>>, sqlx::Error>;

    /// Field errors that need the database to detect, such as a unique
    /// value already used by another record.
    async fn conflicts(
        &self,
        _pool: &DbPool,
        _id: Option<DbId>,
        _form: &ParsedForm,
    ) -> Result<FormErrors, sqlx::Error> {
        Ok(FormErrors::default())
    }

    async fn create(&self, pool: &DbPool, form: &ParsedForm) -> Result<DbId, sqlx::Error>;

    /// Replace a record; `false` when it does not exist.
    async fn update(&self, pool: &DbPool, id: DbId, form: &ParsedForm)
        -> Result<bool, sqlx::Error>;

    async fn delete(&self, pool: &DbPool, id: DbId) -> Result<bool, sqlx::Error>;
}

pub static ZIP_CODES: zip_codes::ZipCodes = zip_codes::ZipCodes;
pub static ZIP_CODE_GRID: zip_codes::ZipCodeGrid = zip_codes::ZipCodeGrid;
pub static COMPANIES: companies::Companies = companies::Companies;
pub static DEPARTMENTS: departments::Departments = departments::Departments;
pub static EMPLOYEES: employees::Employees = employees::Employees;
pub static CONTRACTORS: contractors::Contractors = contractors::Contractors;

fn all_resources() -> [&'static dyn GridResource; 6] {
    [
        &ZIP_CODES,
        &ZIP_CODE_GRID,
        &COMPANIES,
        &DEPARTMENTS,
        &EMPLOYEES,
        &CONTRACTORS,
    ]
}

/// The resource whose list page is `/{grid}` and whose table is `table`.
pub fn resource_for(grid: &str, table: &str) -> Option<&'static dyn GridResource> {
    all_resources()
        .into_iter()
        .find(|r| r.table() == table && r.endpoint().trim_start_matches('/') == grid)
}

/// Add a duplicate error when `existing` is a different record than `id`.
pub(crate) fn flag_duplicate(
    errors: &mut FormErrors,
    field: &str,
    existing: Option<DbId>,
    id: Option<DbId>,
) {
    if existing.is_some_and(|found| Some(found) != id) {
        errors.add(field, DUPLICATE_MESSAGE);
    }
}

pub(crate) fn select_options(rows: &[LabeledId]) -> Vec<SelectOption> {
    rows.iter()
        .map(|row| SelectOption::new(row.id, row.label.clone()))
        .collect()
}

pub(crate) fn search_options(rows: &[LabeledId]) -> Vec<SearchOption> {
    rows.iter()
        .map(|row| SearchOption {
            value: row.id.to_string(),
            label: row.label.clone(),
        })
        .collect()
}

/// Builder for the raw display values a record form starts from.
#[derive(Debug, Default)]
pub(crate) struct RecordValues(BTreeMap<String, String>);

impl RecordValues {
    pub fn text(mut self, name: &str, value: Option<&str>) -> Self {
        if let Some(value) = value {
            self.0.insert(name.to_string(), value.to_string());
        }
        self
    }

    pub fn decimal(mut self, name: &str, value: Option<f64>, scale: usize) -> Self {
        if let Some(value) = value {
            self.0.insert(name.to_string(), format!("{value:.scale$}"));
        }
        self
    }

    pub fn date(mut self, name: &str, value: Option<NaiveDate>) -> Self {
        if let Some(value) = value {
            self.0
                .insert(name.to_string(), value.format("%Y-%m-%d").to_string());
        }
        self
    }

    pub fn flag(mut self, name: &str, value: bool) -> Self {
        if value {
            self.0.insert(name.to_string(), "true".to_string());
        }
        self
    }

    pub fn id(mut self, name: &str, value: Option<DbId>) -> Self {
        if let Some(value) = value {
            self.0.insert(name.to_string(), value.to_string());
        }
        self
    }

    pub fn build(self) -> BTreeMap<String, String> {
        self.0
    }
}
