//! The datatables.net page for zip codes and its server-side JSON feed.

use axum::extract::{Query, State};
use axum::response::Html;
use axum::Json;
use roster_core::datatables::{
    DataTablesField, DataTablesRequest, DataTablesResponse, DataTablesView,
    RECORD_ID_PLACEHOLDER,
};
use roster_core::grid::{resolve_order, GridColumn, SortRequest};
use roster_db::repositories::GridRepo;

use crate::error::AppResult;
use crate::grids::zip_codes::{self, DEFAULT_ORDER, SEARCH_COLUMNS, SOURCE};
use crate::middleware::auth::AuthUser;
use crate::state::AppState;
use crate::views::layout::Page;

const DATA_URL: &str = "/datatables_data";

/// Build the datatables page description from the zip code columns.
pub fn zip_code_view(columns: &[GridColumn], page_length: i64) -> DataTablesView {
    let fields: Vec<DataTablesField> = columns
        .iter()
        .map(|column| {
            let field = DataTablesField::new(column.name());
            if column.is_id() {
                field.hidden()
            } else {
                field
            }
        })
        .collect();
    let sort_sequence = DEFAULT_ORDER
        .iter()
        .filter_map(|key| columns.iter().position(|c| c.key == *key))
        .map(|index| (index, true))
        .collect();

    let mut view = DataTablesView::new(fields, DATA_URL);
    view.edit_url = Some(format!("/zip_code/{RECORD_ID_PLACEHOLDER}"));
    view.delete_url = Some(format!("/zip_code/delete/{RECORD_ID_PLACEHOLDER}"));
    view.create_url = Some("/zip_code/0".to_string());
    view.page_length = page_length;
    view.sort_sequence = sort_sequence;
    view
}

/// GET /datatables
pub async fn page(State(state): State<AppState>, user: AuthUser) -> Html<String> {
    let view = zip_code_view(&zip_codes::columns(), state.config.grid.rows_per_page);
    let body = format!("{}{}", view.table(), view.script());
    Page::new("DataTables", Some(user.username.as_str()), body)
        .with_datatables()
        .into()
}

/// GET /datatables_data
///
/// Answers a datatables.net server-side request. Sort columns outside the
/// zip code grid are dropped; with none left the grid's default order applies.
pub async fn data(
    State(state): State<AppState>,
    _user: AuthUser,
    Query(pairs): Query<Vec<(String, String)>>,
) -> AppResult<Json<DataTablesResponse>> {
    let request = DataTablesRequest::parse(pairs.iter().map(|(k, v)| (k.as_str(), v.as_str())));
    let columns = zip_codes::columns();

    let requested = request.sort_order(&columns);
    let sort = (!requested.is_empty()).then(|| SortRequest::Encoded(requested.encode()));
    let default: Vec<String> = DEFAULT_ORDER.iter().map(|s| s.to_string()).collect();
    let order = resolve_order(&columns, false, sort.as_ref(), &[], &default);

    let filters: Vec<_> = request.filter(SEARCH_COLUMNS).into_iter().collect();
    let records_total = GridRepo::count(&state.pool, &SOURCE, &[]).await?;
    let records_filtered = if filters.is_empty() {
        records_total
    } else {
        GridRepo::count(&state.pool, &SOURCE, &filters).await?
    };
    let rows = GridRepo::fetch_rows(
        &state.pool,
        &SOURCE,
        &columns,
        &filters,
        &order,
        request.length,
        request.start,
    )
    .await?;

    tracing::debug!(
        draw = request.draw,
        records_total,
        records_filtered,
        rows = rows.len(),
        "Answered datatables request"
    );

    Ok(Json(DataTablesResponse::from_rows(
        request.draw,
        records_total,
        records_filtered,
        &columns,
        rows,
    )))
}
