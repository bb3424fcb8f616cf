//! Zip codes: the home page grid with its `/zip_code/{id}` form, and the
//! `/grid` page that manages the same table through the built-in actions.

use std::collections::BTreeMap;

use async_trait::async_trait;
use roster_core::form::{FieldKind, FormErrors, FormField, FormSchema, ParsedForm};
use roster_core::grid::{ActionTarget, ColumnKind, GridColumn, GridSpec};
use roster_core::types::DbId;
use roster_db::models::zip_code::ZipCodeInput;
use roster_db::repositories::{GridSource, ZipCodeRepo};
use roster_db::DbPool;

use super::{flag_duplicate, GridDefinition, GridResource, RecordValues, SearchKind};

/// Columns matched by the search box.
pub const SEARCH_COLUMNS: &[&str] = &[
    "zip_codes.zip_code",
    "zip_codes.primary_city",
    "zip_codes.county",
    "zip_codes.state",
];

pub const SOURCE: GridSource = GridSource {
    from: "zip_codes",
    id_column: "zip_codes.id",
};

/// Grid columns, shared with the datatables page.
pub fn columns() -> Vec<GridColumn> {
    vec![
        GridColumn::id("zip_codes.id"),
        GridColumn::text("zip_codes.zip_code", "Zip Code"),
        GridColumn::text("zip_codes.zip_type", "Zip Type"),
        GridColumn::text("zip_codes.state", "State"),
        GridColumn::text("zip_codes.county", "County"),
        GridColumn::text("zip_codes.primary_city", "Primary City"),
    ]
}

/// Default order: state, county, city.
pub const DEFAULT_ORDER: &[&str] = &[
    "zip_codes.state",
    "zip_codes.county",
    "zip_codes.primary_city",
];

/// Rows per page on `/grid`, independent of the configured page size.
pub const BUILTIN_GRID_ROWS: i64 = 14;

pub struct ZipCodes;

/// `/grid`: every zip code column, upper-case headings, the id shown, and
/// create, details, edit and delete through `/grid/{action}/zip_codes/{id}`.
pub struct ZipCodeGrid;

fn input(form: &ParsedForm) -> ZipCodeInput {
    ZipCodeInput {
        zip_code: form.text("zip_code").unwrap_or_default(),
        zip_type: form.text("zip_type"),
        primary_city: form.text("primary_city"),
        state: form.text("state"),
        county: form.text("county"),
        timezone: form.text("timezone"),
        area_code: form.text("area_code"),
        latitude: form.decimal("latitude"),
        longitude: form.decimal("longitude"),
    }
}

#[async_trait]
impl GridResource for ZipCodes {
    fn table(&self) -> &'static str {
        "zip_codes"
    }

    fn endpoint(&self) -> &'static str {
        "/index"
    }

    fn title(&self) -> &'static str {
        "Zip Codes"
    }

    fn noun(&self) -> &'static str {
        "Zip Code"
    }

    async fn grid(&self, _pool: &DbPool, per_page: i64) -> Result<GridDefinition, sqlx::Error> {
        let mut spec = GridSpec::new(self.endpoint(), self.table(), columns())
            .order_by(DEFAULT_ORDER)
            .per_page(per_page);
        spec.create = ActionTarget::Url("/zip_code/0".to_string());
        spec.edit = ActionTarget::Url("/zip_code".to_string());
        spec.delete = ActionTarget::Url("/zip_code/delete".to_string());

        Ok(GridDefinition {
            spec,
            source: SOURCE,
            search: SearchKind::Simple(SEARCH_COLUMNS),
        })
    }

    async fn schema(&self, _pool: &DbPool) -> Result<FormSchema, sqlx::Error> {
        let coordinate = FieldKind::Decimal {
            precision: 5,
            scale: 2,
        };
        Ok(FormSchema::new(vec![
            FormField::text("zip_code", "Zip Code").required().max_length(5),
            FormField::text("zip_type", "Zip Type"),
            FormField::text("primary_city", "Primary City"),
            FormField::text("state", "State"),
            FormField::text("county", "County"),
            FormField::text("timezone", "Timezone"),
            FormField::text("area_code", "Area Code"),
            FormField::new("latitude", "Latitude", coordinate.clone()),
            FormField::new("longitude", "Longitude", coordinate),
        ]))
    }

    async fn values(
        &self,
        pool: &DbPool,
        id: DbId,
    ) -> Result<Option<BTreeMap<String, String>>, sqlx::Error> {
        let Some(zip) = ZipCodeRepo::find_by_id(pool, id).await? else {
            return Ok(None);
        };
        Ok(Some(
            RecordValues::default()
                .text("zip_code", Some(&zip.zip_code))
                .text("zip_type", zip.zip_type.as_deref())
                .text("primary_city", zip.primary_city.as_deref())
                .text("state", zip.state.as_deref())
                .text("county", zip.county.as_deref())
                .text("timezone", zip.timezone.as_deref())
                .text("area_code", zip.area_code.as_deref())
                .decimal("latitude", zip.latitude, 2)
                .decimal("longitude", zip.longitude, 2)
                .build(),
        ))
    }

    async fn conflicts(
        &self,
        pool: &DbPool,
        id: Option<DbId>,
        form: &ParsedForm,
    ) -> Result<FormErrors, sqlx::Error> {
        let mut errors = FormErrors::default();
        if let Some(zip_code) = form.text("zip_code") {
            let existing = ZipCodeRepo::find_by_zip_code(pool, &zip_code).await?;
            flag_duplicate(&mut errors, "zip_code", existing.map(|z| z.id), id);
        }
        Ok(errors)
    }

    async fn create(&self, pool: &DbPool, form: &ParsedForm) -> Result<DbId, sqlx::Error> {
        Ok(ZipCodeRepo::create(pool, &input(form)).await?.id)
    }

    async fn update(
        &self,
        pool: &DbPool,
        id: DbId,
        form: &ParsedForm,
    ) -> Result<bool, sqlx::Error> {
        Ok(ZipCodeRepo::update(pool, id, &input(form)).await?.is_some())
    }

    async fn delete(&self, pool: &DbPool, id: DbId) -> Result<bool, sqlx::Error> {
        ZipCodeRepo::delete(pool, id).await
    }
}

#[async_trait]
impl GridResource for ZipCodeGrid {
    fn table(&self) -> &'static str {
        "zip_codes"
    }

    fn endpoint(&self) -> &'static str {
        "/grid"
    }

    fn title(&self) -> &'static str {
        "Zip Code Grid"
    }

    fn noun(&self) -> &'static str {
        ZipCodes.noun()
    }

    async fn grid(&self, _pool: &DbPool, _per_page: i64) -> Result<GridDefinition, sqlx::Error> {
        let mut spec = GridSpec::new(
            self.endpoint(),
            self.table(),
            vec![
                GridColumn::new("zip_codes.id", "ID", ColumnKind::Number),
                GridColumn::text("zip_codes.zip_code", "ZIP CODE"),
                GridColumn::text("zip_codes.zip_type", "ZIP TYPE"),
                GridColumn::text("zip_codes.state", "STATE"),
                GridColumn::text("zip_codes.county", "COUNTY"),
                GridColumn::text("zip_codes.primary_city", "PRIMARY CITY"),
            ],
        )
        .order_by(&["zip_codes.id"])
        .per_page(BUILTIN_GRID_ROWS)
        .with_builtin_actions();
        spec.show_id = true;

        Ok(GridDefinition {
            spec,
            source: SOURCE,
            search: SearchKind::Simple(SEARCH_COLUMNS),
        })
    }

    async fn schema(&self, pool: &DbPool) -> Result<FormSchema, sqlx::Error> {
        ZipCodes.schema(pool).await
    }

    async fn values(
        &self,
        pool: &DbPool,
        id: DbId,
    ) -> Result<Option<BTreeMap<String, String>>, sqlx::Error> {
        ZipCodes.values(pool, id).await
    }

    async fn conflicts(
        &self,
        pool: &DbPool,
        id: Option<DbId>,
        form: &ParsedForm,
    ) -> Result<FormErrors, sqlx::Error> {
        ZipCodes.conflicts(pool, id, form).await
    }

    async fn create(&self, pool: &DbPool, form: &ParsedForm) -> Result<DbId, sqlx::Error> {
        ZipCodes.create(pool, form).await
    }

    async fn update(
        &self,
        pool: &DbPool,
        id: DbId,
        form: &ParsedForm,
    ) -> Result<bool, sqlx::Error> {
        ZipCodes.update(pool, id, form).await
    }

    async fn delete(&self, pool: &DbPool, id: DbId) -> Result<bool, sqlx::Error> {
        ZipCodes.delete(pool, id).await
    }
}
