pub mod auth;
pub mod grids;
pub mod health;

use axum::Router;

use crate::state::AppState;

/// Build the page route tree.
///
/// ```text
/// /auth/login, /auth/register, /auth/logout     public
/// everything else in [`grids::router`]           requires login
/// ```
///
/// The health route is mounted separately by the app router.
pub fn app_routes() -> Router<AppState> {
    Router::new()
        .nest("/auth", auth::router())
        .merge(grids::router())
}
