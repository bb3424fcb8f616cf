//! Generic SimpleTable list pages and record forms.
//!
//! Every table goes through [`GridResource`], so the same code serves the
//! zip code home page, the built-in `/{grid}/{action}/{table}/{id}` routes,
//! and the `/zip_code/{id}` form.

use std::collections::{BTreeMap, HashMap};

use axum::extract::{Path, Query, State};
use axum::response::{Html, IntoResponse, Redirect, Response};
use axum::Form;
use axum_extra::extract::cookie::CookieJar;
use roster_core::error::CoreError;
use roster_core::form::{FormErrors, FormView};
use roster_core::grid::{next_state, GridAction, GridView, SortRequest, StorageSignature};
use roster_core::html::{escape, url_with_query};
use roster_core::search::{clean_value, GridFilter, SearchForm};
use roster_core::types::DbId;
use roster_db::repositories::GridRepo;

use crate::error::{AppError, AppResult};
use crate::grids::{cookie, resource_for, GridResource, SearchKind, SEARCH_FILTER_KEY};
use crate::middleware::auth::AuthUser;
use crate::state::AppState;
use crate::views::layout::Page;

// ---------------------------------------------------------------------------
// List pages
// ---------------------------------------------------------------------------

/// Render one page of a resource's grid and persist the resulting state.
///
/// `submitted` is the search form body on POST.
pub async fn show_grid(
    state: &AppState,
    jar: CookieJar,
    user: &AuthUser,
    resource: &'static dyn GridResource,
    query: HashMap<String, String>,
    submitted: Option<HashMap<String, String>>,
) -> AppResult<(CookieJar, Html<String>)> {
    let grid_config = &state.config.grid;
    let signature = StorageSignature::from_query(query.get("user_signature").map(String::as_str));
    let stored = cookie::load(&jar, &state.codec, &signature);
    let definition = resource.grid(&state.pool, grid_config.rows_per_page).await?;
    let spec = &definition.spec;

    let search_action = url_with_query(
        &spec.endpoint,
        &[("user_signature", signature.to_string())],
    );
    let (filter_values, filters, search_form) = match &definition.search {
        SearchKind::Simple(columns) => {
            let value = submitted
                .as_ref()
                .and_then(|form| form.get("search"))
                .or_else(|| query.get("search"))
                .map(|v| clean_value(v))
                .or_else(|| stored.filter(SEARCH_FILTER_KEY).map(str::to_string))
                .unwrap_or_default();
            let filters = if value.is_empty() {
                Vec::new()
            } else {
                vec![GridFilter::contains(columns, value.as_str())]
            };
            let form = SearchForm::single(Some(value.as_str()), search_action);
            let mut values = BTreeMap::new();
            values.insert(SEARCH_FILTER_KEY.to_string(), value);
            (values, filters, form)
        }
        SearchKind::Fields(search) => {
            let values = search.values(&query, submitted.as_ref(), &stored);
            let outcome = search.evaluate(&values);
            let form = search.form(&values, outcome.errors, search_action);
            (values, outcome.filters, form)
        }
    };

    // A new search starts over on the first page.
    let requested_page = if filter_values != stored.filters {
        Some(1)
    } else {
        query.get("page").and_then(|p| p.trim().parse::<i64>().ok())
    };
    let sort = SortRequest::from_query(
        query.get("sort").map(String::as_str),
        query.get("sort_dir").map(String::as_str),
    );
    let plan = spec.plan(&stored, sort.as_ref(), requested_page);

    let page = GridRepo::fetch(
        &state.pool,
        &definition.source,
        &spec.columns,
        &filters,
        &plan,
        spec.per_page,
    )
    .await?;

    let next = next_state(&plan.order, &page.pager, filter_values);
    let jar = cookie::save(
        jar,
        &state.codec,
        &signature,
        &next,
        grid_config.signature_max_age_secs,
    );

    let view = GridView {
        spec,
        rows: page.rows,
        pager: page.pager,
        order: plan.order,
        signature,
        search: Some(search_form),
    };
    let html: Html<String> =
        Page::new(resource.title(), Some(user.username.as_str()), view.render()).into();
    Ok((jar, html))
}

// ---------------------------------------------------------------------------
// Record forms
// ---------------------------------------------------------------------------

/// What a record form page is for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormMode {
    New,
    Edit,
    Details,
}

impl FormMode {
    fn verb(self) -> &'static str {
        match self {
            FormMode::New => "New",
            FormMode::Edit => "Edit",
            FormMode::Details => "View",
        }
    }
}

/// Where a record form posts to and where it returns after saving.
#[derive(Debug, Clone)]
pub struct FormTarget {
    pub action: String,
    pub back: String,
}

/// Show a record form or, on POST, validate and save it.
///
/// A successful save redirects to `target.back`; validation problems
/// re-render the form with the submitted values and field errors.
pub async fn record_form(
    state: &AppState,
    user: &AuthUser,
    resource: &'static dyn GridResource,
    mode: FormMode,
    id: Option<DbId>,
    submitted: Option<HashMap<String, String>>,
    target: FormTarget,
) -> AppResult<Response> {
    let schema = resource.schema(&state.pool).await?;
    let mut errors = FormErrors::default();

    let values = match submitted.filter(|_| mode != FormMode::Details) {
        Some(input) => {
            match schema.parse(&input) {
                Ok(parsed) => {
                    errors = resource.conflicts(&state.pool, id, &parsed).await?;
                    if errors.is_empty() {
                        save(state, user, resource, id, &parsed).await?;
                        return Ok(Redirect::to(&target.back).into_response());
                    }
                }
                Err(form_errors) => errors = form_errors,
            }
            input.into_iter().collect()
        }
        None => match id {
            Some(id) => resource
                .values(&state.pool, id)
                .await?
                .ok_or(AppError::Core(CoreError::NotFound {
                    entity: resource.noun(),
                    id,
                }))?,
            None => BTreeMap::new(),
        },
    };

    let form = FormView {
        schema: &schema,
        values: &values,
        errors: &errors,
        readonly: mode == FormMode::Details,
        action: target.action,
    };
    let body = format!(
        r#"{}<div style="padding-top: 1rem;"><a class="button" href="{}">Back</a></div>"#,
        form.render(),
        escape(&target.back)
    );
    let title = format!("{} {}", mode.verb(), resource.noun());
    let html: Html<String> = Page::new(&title, Some(user.username.as_str()), body).into();
    Ok(html.into_response())
}

async fn save(
    state: &AppState,
    user: &AuthUser,
    resource: &'static dyn GridResource,
    id: Option<DbId>,
    parsed: &roster_core::form::ParsedForm,
) -> AppResult<()> {
    match id {
        None => {
            let record_id = resource.create(&state.pool, parsed).await?;
            tracing::info!(
                table = resource.table(),
                record_id,
                user_id = user.user_id,
                "Record created"
            );
        }
        Some(record_id) => {
            if !resource.update(&state.pool, record_id, parsed).await? {
                return Err(AppError::Core(CoreError::NotFound {
                    entity: resource.noun(),
                    id: record_id,
                }));
            }
            tracing::info!(
                table = resource.table(),
                record_id,
                user_id = user.user_id,
                "Record updated"
            );
        }
    }
    Ok(())
}

/// Delete a record and log it. A record that is already gone is not an error.
pub async fn delete_record(
    state: &AppState,
    user: &AuthUser,
    resource: &'static dyn GridResource,
    id: DbId,
) -> AppResult<()> {
    if resource.delete(&state.pool, id).await? {
        tracing::info!(
            table = resource.table(),
            record_id = id,
            user_id = user.user_id,
            "Record deleted"
        );
    } else {
        tracing::warn!(table = resource.table(), record_id = id, "Delete of missing record");
    }
    Ok(())
}

/// Return URL for a grid, keeping the storage signature and page.
pub fn grid_url(endpoint: &str, query: &HashMap<String, String>) -> String {
    let params: Vec<(&str, String)> = ["user_signature", "page"]
        .into_iter()
        .filter_map(|name| query.get(name).map(|v| (name, v.clone())))
        .collect();
    url_with_query(endpoint, &params)
}

// ---------------------------------------------------------------------------
// Built-in action routes
// ---------------------------------------------------------------------------

/// Path segments of a built-in action route: grid, action, table, id.
type ActionRoute = (String, String, String, DbId);

fn action_resource(grid: &str, table: &str) -> AppResult<&'static dyn GridResource> {
    resource_for(grid, table).ok_or_else(|| {
            AppError::Core(CoreError::UnknownGrid {
                grid: grid.to_string(),
                table: table.to_string(),
            })
        })
}

/// GET /{grid}/{action}/{table}/{id}
pub async fn action_get(
    State(state): State<AppState>,
    user: AuthUser,
    Path(route): Path<ActionRoute>,
    Query(query): Query<HashMap<String, String>>,
) -> AppResult<Response> {
    run_action(&state, &user, route, query, None).await
}

/// POST /{grid}/{action}/{table}/{id}
pub async fn action_post(
    State(state): State<AppState>,
    user: AuthUser,
    Path(route): Path<ActionRoute>,
    Query(query): Query<HashMap<String, String>>,
    Form(input): Form<HashMap<String, String>>,
) -> AppResult<Response> {
    run_action(&state, &user, route, query, Some(input)).await
}

async fn run_action(
    state: &AppState,
    user: &AuthUser,
    (grid, action, table, id): ActionRoute,
    query: HashMap<String, String>,
    submitted: Option<HashMap<String, String>>,
) -> AppResult<Response> {
    let resource = action_resource(&grid, &table)?;
    let action = GridAction::parse(&action)
        .ok_or_else(|| AppError::Core(CoreError::UnknownAction(action.clone())))?;
    let back = grid_url(resource.endpoint(), &query);

    let mode = match action {
        GridAction::Delete => {
            delete_record(state, user, resource, id).await?;
            return Ok(Redirect::to(&back).into_response());
        }
        GridAction::New => FormMode::New,
        GridAction::Edit => FormMode::Edit,
        GridAction::Details => FormMode::Details,
    };
    let record_id = (mode != FormMode::New).then_some(id);
    let path = format!("/{grid}/{}/{table}/{id}", action.as_str());
    let target = FormTarget {
        action: grid_url(&path, &query),
        back,
    };
    record_form(state, user, resource, mode, record_id, submitted, target).await
}
