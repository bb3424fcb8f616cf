//! The logged-in user, taken from the `session` cookie.

use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use axum::response::{IntoResponse, Redirect, Response};
use axum_extra::extract::cookie::CookieJar;
use roster_core::types::DbId;

use crate::state::AppState;

pub const SESSION_COOKIE: &str = "session";

pub const LOGIN_PATH: &str = "/auth/login";

/// Taking this as a handler argument puts the page behind login: a missing,
/// forged or expired session redirects to [`LOGIN_PATH`].
#[derive(Debug, Clone)]
pub struct AuthUser {
    pub user_id: DbId,
    pub username: String,
}

#[derive(Debug)]
pub struct LoginRedirect;

impl IntoResponse for LoginRedirect {
    fn into_response(self) -> Response {
        Redirect::to(LOGIN_PATH).into_response()
    }
}

impl FromRequestParts<AppState> for AuthUser {
    type Rejection = LoginRedirect;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let jar = CookieJar::from_headers(&parts.headers);
        let token = match jar.get(SESSION_COOKIE) {
            Some(cookie) if !cookie.value().is_empty() => cookie.value().to_owned(),
            _ => return Err(LoginRedirect),
        };

        let claims = state.config.jwt.verify(&token).map_err(|e| {
            tracing::debug!(error = %e, "Rejected session token");
            LoginRedirect
        })?;

        Ok(AuthUser {
            user_id: claims.sub,
            username: claims.username,
        })
    }
}
