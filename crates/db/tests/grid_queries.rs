//! GridRepo against real rows: filtering, ordering, paging, and joins.

use roster_core::grid::{GridColumn, GridPlan, SortOrder, SortSpec};
use roster_core::search::{FilterValue, GridFilter};
use roster_db::models::company::CompanyInput;
use roster_db::models::employee::EmployeeInput;
use roster_db::models::zip_code::ZipCodeInput;
use roster_db::repositories::{CompanyRepo, EmployeeRepo, GridRepo, GridSource, ZipCodeRepo};
use sqlx::PgPool;

const ZIP_SOURCE: GridSource = GridSource {
    from: "zip_codes",
    id_column: "zip_codes.id",
};

const EMPLOYEE_SOURCE: GridSource = GridSource {
    from: "employees LEFT JOIN companies ON companies.id = employees.company_id",
    id_column: "employees.id",
};

fn zip_columns() -> Vec<GridColumn> {
    vec![
        GridColumn::id("zip_codes.id"),
        GridColumn::text("zip_codes.zip_code", "Zip Code"),
        GridColumn::text("zip_codes.state", "State"),
        GridColumn::text("zip_codes.primary_city", "Primary City"),
    ]
}

async fn seed_zips(pool: &PgPool) {
    let rows = [
        ("46201", "IN", "Indianapolis"),
        ("46802", "IN", "Fort Wayne"),
        ("60601", "IL", "Chicago"),
        ("53202", "WI", "Milwaukee"),
        ("46803", "IN", "Fort Wayne"),
    ];
    for (zip, state, city) in rows {
        ZipCodeRepo::create(
            pool,
            &ZipCodeInput {
                zip_code: zip.to_string(),
                state: Some(state.to_string()),
                primary_city: Some(city.to_string()),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    }
}

fn plan(order: Vec<SortSpec>, page: i64) -> GridPlan {
    GridPlan {
        order: SortOrder(order),
        page,
    }
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_contains_filter_is_case_insensitive_or(pool: PgPool) {
    seed_zips(&pool).await;
    let filters = vec![GridFilter::contains(
        &["zip_codes.zip_code", "zip_codes.primary_city"],
        "fort",
    )];
    assert_eq!(GridRepo::count(&pool, &ZIP_SOURCE, &filters).await.unwrap(), 2);

    let filters = vec![GridFilter::contains(&["zip_codes.zip_code"], "%")];
    assert_eq!(
        GridRepo::count(&pool, &ZIP_SOURCE, &filters).await.unwrap(),
        0,
        "wildcards match literally"
    );
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_order_and_tie_breaker(pool: PgPool) {
    seed_zips(&pool).await;
    let page = GridRepo::fetch(
        &pool,
        &ZIP_SOURCE,
        &zip_columns(),
        &[],
        &plan(
            vec![
                SortSpec::asc("zip_codes.state"),
                SortSpec::desc("zip_codes.primary_city"),
            ],
            1,
        ),
        15,
    )
    .await
    .unwrap();

    let zips: Vec<_> = page
        .rows
        .iter()
        .map(|r| r.cells[1].clone().unwrap())
        .collect();
    assert_eq!(zips, vec!["60601", "46201", "46802", "46803", "53202"]);
    assert_eq!(page.rows[0].cells[0], Some(page.rows[0].id.to_string()));
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_paging_clamps_out_of_range_page(pool: PgPool) {
    seed_zips(&pool).await;
    let order = vec![SortSpec::asc("zip_codes.zip_code")];

    let second = GridRepo::fetch(&pool, &ZIP_SOURCE, &zip_columns(), &[], &plan(order.clone(), 2), 2)
        .await
        .unwrap();
    assert_eq!(second.pager.page_count, 3);
    assert_eq!(second.rows.len(), 2);
    assert_eq!(second.rows[0].cells[1].as_deref(), Some("46803"));

    let beyond = GridRepo::fetch(&pool, &ZIP_SOURCE, &zip_columns(), &[], &plan(order, 9), 2)
        .await
        .unwrap();
    assert_eq!(beyond.pager.current_page, 1);
    assert_eq!(beyond.rows[0].cells[1].as_deref(), Some("46201"));
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_empty_grid(pool: PgPool) {
    let page = GridRepo::fetch(&pool, &ZIP_SOURCE, &zip_columns(), &[], &plan(vec![], 1), 15)
        .await
        .unwrap();
    assert!(page.rows.is_empty());
    assert_eq!(page.pager.summary(), "Displaying rows 0 thru 0 of 0");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_unlimited_fetch_returns_everything(pool: PgPool) {
    seed_zips(&pool).await;
    let rows = GridRepo::fetch_rows(
        &pool,
        &ZIP_SOURCE,
        &zip_columns(),
        &[],
        &SortOrder::default(),
        None,
        1,
    )
    .await
    .unwrap();
    assert_eq!(rows.len(), 4);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_joined_columns_and_equals_filter(pool: PgPool) {
    let acme = CompanyRepo::create(
        &pool,
        &CompanyInput {
            name: "Acme".to_string(),
            ..Default::default()
        },
    )
    .await
    .unwrap();
    for (last, company) in [("Smith", Some(acme.id)), ("Jones", None)] {
        EmployeeRepo::create(
            &pool,
            &EmployeeInput {
                last_name: last.to_string(),
                company_id: company,
                active: true,
                ..Default::default()
            },
        )
        .await
        .unwrap();
    }

    let columns = vec![
        GridColumn::id("employees.id"),
        GridColumn::text("employees.last_name", "Last Name"),
        GridColumn::text("companies.name", "Company"),
    ];
    let order = SortOrder(vec![SortSpec::asc("employees.last_name")]);

    let all = GridRepo::fetch_rows(&pool, &EMPLOYEE_SOURCE, &columns, &[], &order, None, 0)
        .await
        .unwrap();
    assert_eq!(all.len(), 2);
    assert_eq!(all[0].cells[1].as_deref(), Some("Jones"));
    assert_eq!(all[0].cells[2], None, "LEFT JOIN keeps rows without a company");
    assert_eq!(all[1].cells[2].as_deref(), Some("Acme"));

    let filters = vec![GridFilter::Equals {
        column: "employees.company_id",
        value: FilterValue::Id(acme.id),
    }];
    let filtered = GridRepo::fetch_rows(&pool, &EMPLOYEE_SOURCE, &columns, &filters, &order, Some(10), 0)
        .await
        .unwrap();
    assert_eq!(filtered.len(), 1);
    assert_eq!(filtered[0].cells[1].as_deref(), Some("Smith"));
}
