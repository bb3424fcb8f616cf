//! Route definitions for the SimpleTable list pages and record actions.

use std::collections::HashMap;

use axum::extract::{Query, State};
use axum::routing::{get, MethodRouter};
use axum::{Form, Router};
use axum_extra::extract::cookie::CookieJar;

use crate::grids::{self, GridResource};
use crate::handlers::grids as handlers;
use crate::handlers::{datatables, zip_codes};
use crate::middleware::auth::AuthUser;
use crate::state::AppState;

/// GET shows a resource's grid; POST submits its search form.
fn grid_page(resource: &'static dyn GridResource) -> MethodRouter<AppState> {
    get(
        move |State(state): State<AppState>,
              jar: CookieJar,
              user: AuthUser,
              Query(query): Query<HashMap<String, String>>| async move {
            handlers::show_grid(&state, jar, &user, resource, query, None).await
        },
    )
    .post(
        move |State(state): State<AppState>,
              jar: CookieJar,
              user: AuthUser,
              Query(query): Query<HashMap<String, String>>,
              Form(input): Form<HashMap<String, String>>| async move {
            handlers::show_grid(&state, jar, &user, resource, query, Some(input)).await
        },
    )
}

/// Routes for every page behind the login.
///
/// ```text
/// GET|POST /, /index                         zip code grid with search
/// GET|POST /grid                             zip codes, 14 rows, built-in actions
/// GET|POST /zip_code/{id}                    zip code form (id 0 creates)
/// GET      /zip_code/delete/{id}             delete zip code
/// GET|POST /companies, /departments,
///          /employees, /contractors          grids with built-in actions
/// GET|POST /{grid}/{action}/{table}/{id}     new, details, edit, delete
/// GET      /datatables                       datatables.net zip code page
/// GET      /datatables_data                  datatables.net JSON feed
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", grid_page(&grids::ZIP_CODES))
        .route("/index", grid_page(&grids::ZIP_CODES))
        .route("/grid", grid_page(&grids::ZIP_CODE_GRID))
        .route(
            "/zip_code/{id}",
            get(zip_codes::edit_form).post(zip_codes::save_form),
        )
        .route("/zip_code/delete/{id}", get(zip_codes::delete))
        .route("/companies", grid_page(&grids::COMPANIES))
        .route("/departments", grid_page(&grids::DEPARTMENTS))
        .route("/employees", grid_page(&grids::EMPLOYEES))
        .route("/contractors", grid_page(&grids::CONTRACTORS))
        .route(
            "/{grid}/{action}/{table}/{id}",
            get(handlers::action_get).post(handlers::action_post),
        )
        .route("/datatables", get(datatables::page))
        .route("/datatables_data", get(datatables::data))
}
