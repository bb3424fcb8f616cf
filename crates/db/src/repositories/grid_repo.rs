//! Generic query executor behind every list page.
//!
//! Column keys, the `FROM` clause, and the id column all come from static
//! grid definitions; user input only ever reaches the query as bind values.

use roster_core::grid::{GridColumn, GridPlan, GridRow, Pager, SortOrder};
use roster_core::search::{FilterValue, GridFilter};
use sqlx::{PgPool, Row};

/// Where a grid's rows come from.
#[derive(Debug, Clone, Copy)]
pub struct GridSource {
    /// Body of the `FROM` clause, including any `LEFT JOIN`s.
    pub from: &'static str,
    /// Qualified primary key of the base table, also the final tie-breaker.
    pub id_column: &'static str,
}

/// One page of grid rows with its pager.
#[derive(Debug, Clone)]
pub struct GridPage {
    pub pager: Pager,
    pub rows: Vec<GridRow>,
}

/// Runs count and page queries for grid definitions.
pub struct GridRepo;

impl GridRepo {
    /// Count rows matching `filters`.
    pub async fn count(
        pool: &PgPool,
        source: &GridSource,
        filters: &[GridFilter],
    ) -> Result<i64, sqlx::Error> {
        let (where_clause, bind_values, _) = build_grid_filter(filters);
        let query = format!(
            "SELECT COUNT(*)::BIGINT FROM {} {where_clause}",
            source.from
        );
        let q = bind_grid_values_scalar(sqlx::query_scalar::<_, i64>(&query), &bind_values);
        q.fetch_one(pool).await
    }

    /// Fetch rows as text cells, one per column, in `order` with the id as
    /// tie-breaker. `limit = None` fetches everything from `offset`.
    pub async fn fetch_rows(
        pool: &PgPool,
        source: &GridSource,
        columns: &[GridColumn],
        filters: &[GridFilter],
        order: &SortOrder,
        limit: Option<i64>,
        offset: i64,
    ) -> Result<Vec<GridRow>, sqlx::Error> {
        let (where_clause, bind_values, bind_idx) = build_grid_filter(filters);
        let select = select_list(source, columns);
        let order_clause = order_clause(source, columns, order);

        let mut query = format!(
            "SELECT {select} FROM {} {where_clause} ORDER BY {order_clause}",
            source.from
        );
        if limit.is_some() {
            query.push_str(&format!(" LIMIT ${bind_idx} OFFSET ${}", bind_idx + 1));
        } else {
            query.push_str(&format!(" OFFSET ${bind_idx}"));
        }

        let mut q = bind_grid_values(sqlx::query(&query), &bind_values);
        if let Some(limit) = limit {
            q = q.bind(limit);
        }
        let rows = q.bind(offset.max(0)).fetch_all(pool).await?;

        rows.iter()
            .map(|row| {
                let id: i64 = row.try_get(0usize)?;
                let cells = (1..=columns.len())
                    .map(|i| row.try_get::<Option<String>, _>(i))
                    .collect::<Result<Vec<_>, _>>()?;
                Ok(GridRow { id, cells })
            })
            .collect()
    }

    /// Count, clamp the requested page, then fetch that page.
    pub async fn fetch(
        pool: &PgPool,
        source: &GridSource,
        columns: &[GridColumn],
        filters: &[GridFilter],
        plan: &GridPlan,
        per_page: i64,
    ) -> Result<GridPage, sqlx::Error> {
        let total = Self::count(pool, source, filters).await?;
        let pager = plan.paginate(total, per_page);
        let rows = if total == 0 {
            Vec::new()
        } else {
            Self::fetch_rows(
                pool,
                source,
                columns,
                filters,
                &plan.order,
                Some(pager.limit()),
                pager.offset(),
            )
            .await?
        };
        tracing::debug!(
            from = source.from,
            total,
            page = pager.current_page,
            rows = rows.len(),
            "Fetched grid page"
        );
        Ok(GridPage { pager, rows })
    }
}

// ---------------------------------------------------------------------------
// Internal helpers for dynamic query building
// ---------------------------------------------------------------------------

/// Typed bind value for dynamically-built grid queries.
#[derive(Debug, Clone, PartialEq)]
enum BindValue {
    BigInt(i64),
    Text(String),
    Bool(bool),
}

fn select_list(source: &GridSource, columns: &[GridColumn]) -> String {
    std::iter::once(source.id_column.to_string())
        .chain(columns.iter().map(|c| format!("{}::TEXT", c.key)))
        .collect::<Vec<_>>()
        .join(", ")
}

/// Build `ORDER BY` terms from known column keys only, ending with the id.
fn order_clause(source: &GridSource, columns: &[GridColumn], order: &SortOrder) -> String {
    let mut terms: Vec<String> = order
        .iter()
        .filter_map(|spec| {
            let column = columns.iter().find(|c| c.key == spec.key)?;
            let direction = if spec.descending { "DESC" } else { "ASC" };
            Some(format!("{} {direction}", column.key))
        })
        .collect();
    terms.push(format!("{} ASC", source.id_column));
    terms.join(", ")
}

/// Escape `LIKE` wildcards so the search text matches literally.
fn like_pattern(value: &str) -> String {
    let escaped = value
        .replace('\\', "\\\\")
        .replace('%', "\\%")
        .replace('_', "\\_");
    format!("%{escaped}%")
}

/// Build a WHERE clause and bind values from grid filters.
///
/// Returns `(where_clause, bind_values, next_bind_index)`.
/// The `where_clause` is empty if no filters are active, or starts with `WHERE `.
fn build_grid_filter(filters: &[GridFilter]) -> (String, Vec<BindValue>, u32) {
    let mut conditions: Vec<String> = Vec::new();
    let mut bind_idx = 1u32;
    let mut bind_values: Vec<BindValue> = Vec::new();

    for filter in filters {
        match filter {
            GridFilter::Contains { columns, value } => {
                if columns.is_empty() {
                    continue;
                }
                let any = columns
                    .iter()
                    .map(|c| format!("{c}::TEXT ILIKE ${bind_idx}"))
                    .collect::<Vec<_>>()
                    .join(" OR ");
                conditions.push(format!("({any})"));
                bind_idx += 1;
                bind_values.push(BindValue::Text(like_pattern(value)));
            }
            GridFilter::Equals { column, value } => {
                conditions.push(format!("{column} = ${bind_idx}"));
                bind_idx += 1;
                bind_values.push(match value {
                    FilterValue::Id(v) => BindValue::BigInt(*v),
                    FilterValue::Flag(v) => BindValue::Bool(*v),
                });
            }
        }
    }

    let where_clause = if conditions.is_empty() {
        String::new()
    } else {
        format!("WHERE {}", conditions.join(" AND "))
    };

    (where_clause, bind_values, bind_idx)
}

/// Bind a slice of `BindValue` to a sqlx `Query`.
fn bind_grid_values<'q>(
    mut q: sqlx::query::Query<'q, sqlx::Postgres, sqlx::postgres::PgArguments>,
    bind_values: &'q [BindValue],
) -> sqlx::query::Query<'q, sqlx::Postgres, sqlx::postgres::PgArguments> {
    for val in bind_values {
        match val {
            BindValue::BigInt(v) => q = q.bind(*v),
            BindValue::Text(v) => q = q.bind(v.as_str()),
            BindValue::Bool(v) => q = q.bind(*v),
        }
    }
    q
}

/// Bind a slice of `BindValue` to a sqlx `QueryScalar`.
fn bind_grid_values_scalar<'q>(
    mut q: sqlx::query::QueryScalar<'q, sqlx::Postgres, i64, sqlx::postgres::PgArguments>,
    bind_values: &'q [BindValue],
) -> sqlx::query::QueryScalar<'q, sqlx::Postgres, i64, sqlx::postgres::PgArguments> {
    for val in bind_values {
        match val {
            BindValue::BigInt(v) => q = q.bind(*v),
            BindValue::Text(v) => q = q.bind(v.as_str()),
            BindValue::Bool(v) => q = q.bind(*v),
        }
    }
    q
}

#[cfg(test)]
mod tests {
    use super::*;
    use roster_core::grid::SortSpec;

    const SOURCE: GridSource = GridSource {
        from: "employees LEFT JOIN companies ON companies.id = employees.company_id",
        id_column: "employees.id",
    };

    fn columns() -> Vec<GridColumn> {
        vec![
            GridColumn::id("employees.id"),
            GridColumn::text("employees.last_name", "Last Name"),
            GridColumn::text("companies.name", "Company"),
        ]
    }

    #[test]
    fn no_filters_means_no_where() {
        let (clause, binds, next) = build_grid_filter(&[]);
        assert_eq!(clause, "");
        assert!(binds.is_empty());
        assert_eq!(next, 1);
    }

    #[test]
    fn contains_shares_one_bind_across_columns() {
        let filters = vec![GridFilter::contains(
            &["employees.last_name", "companies.name"],
            "50%_off",
        )];
        let (clause, binds, next) = build_grid_filter(&filters);
        assert_eq!(
            clause,
            "WHERE (employees.last_name::TEXT ILIKE $1 OR companies.name::TEXT ILIKE $1)"
        );
        assert_eq!(binds, vec![BindValue::Text("%50\\%\\_off%".into())]);
        assert_eq!(next, 2);
    }

    #[test]
    fn filters_are_and_ed_in_order() {
        let filters = vec![
            GridFilter::contains(&["employees.last_name"], "smith"),
            GridFilter::Equals {
                column: "employees.company_id",
                value: FilterValue::Id(4),
            },
            GridFilter::Equals {
                column: "employees.active",
                value: FilterValue::Flag(true),
            },
        ];
        let (clause, binds, next) = build_grid_filter(&filters);
        assert_eq!(
            clause,
            "WHERE (employees.last_name::TEXT ILIKE $1) AND employees.company_id = $2 \
             AND employees.active = $3"
        );
        assert_eq!(binds[1], BindValue::BigInt(4));
        assert_eq!(binds[2], BindValue::Bool(true));
        assert_eq!(next, 4);
    }

    #[test]
    fn order_clause_drops_unknown_keys_and_ends_with_id() {
        let order = SortOrder(vec![
            SortSpec::desc("companies.name"),
            SortSpec::asc("users.password_hash; DROP TABLE users"),
            SortSpec::asc("employees.last_name"),
        ]);
        assert_eq!(
            order_clause(&SOURCE, &columns(), &order),
            "companies.name DESC, employees.last_name ASC, employees.id ASC"
        );
    }

    #[test]
    fn select_list_casts_every_column() {
        assert_eq!(
            select_list(&SOURCE, &columns()),
            "employees.id, employees.id::TEXT, employees.last_name::TEXT, companies.name::TEXT"
        );
    }
}
