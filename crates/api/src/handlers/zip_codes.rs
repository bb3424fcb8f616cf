//! The zip code form and delete routes used by the home page grid.

use std::collections::HashMap;

use axum::extract::{Path, Query, State};
use axum::response::{IntoResponse, Redirect, Response};
use axum::Form;
use roster_core::types::DbId;

use crate::error::AppResult;
use crate::grids::ZIP_CODES;
use crate::handlers::grids::{delete_record, grid_url, record_form, FormMode, FormTarget};
use crate::middleware::auth::AuthUser;
use crate::state::AppState;

/// List page the zip code forms return to.
const INDEX_PATH: &str = "/index";

fn target(id: DbId, query: &HashMap<String, String>) -> FormTarget {
    FormTarget {
        action: grid_url(&format!("/zip_code/{id}"), query),
        back: grid_url(INDEX_PATH, query),
    }
}

/// Id 0 opens an empty form for a new zip code.
fn mode(id: DbId) -> (FormMode, Option<DbId>) {
    if id == 0 {
        (FormMode::New, None)
    } else {
        (FormMode::Edit, Some(id))
    }
}

/// GET /zip_code/{id}
pub async fn edit_form(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<DbId>,
    Query(query): Query<HashMap<String, String>>,
) -> AppResult<Response> {
    let (mode, record_id) = mode(id);
    record_form(&state, &user, &ZIP_CODES, mode, record_id, None, target(id, &query)).await
}

/// POST /zip_code/{id}
pub async fn save_form(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<DbId>,
    Query(query): Query<HashMap<String, String>>,
    Form(input): Form<HashMap<String, String>>,
) -> AppResult<Response> {
    let (mode, record_id) = mode(id);
    record_form(
        &state,
        &user,
        &ZIP_CODES,
        mode,
        record_id,
        Some(input),
        target(id, &query),
    )
    .await
}

/// GET /zip_code/delete/{id}
pub async fn delete(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<DbId>,
    Query(query): Query<HashMap<String, String>>,
) -> AppResult<Response> {
    delete_record(&state, &user, &ZIP_CODES, id).await?;
    Ok(Redirect::to(&grid_url(INDEX_PATH, &query)).into_response())
}
