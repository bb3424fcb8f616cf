//! Handlers for the `/auth` pages (login, registration, logout).

use std::collections::HashMap;

use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::response::{Html, IntoResponse, Redirect, Response};
use axum::Form;
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use chrono::Utc;
use roster_core::form::FormErrors;
use roster_db::models::user::{NewAccount, User};
use roster_db::repositories::UserRepo;
use serde::Deserialize;
use validator::Validate;

use crate::auth::password::{hash_password, new_password_problem, verify_password};
use crate::error::{AppError, AppResult};
use crate::grids::DUPLICATE_MESSAGE;
use crate::middleware::auth::{LOGIN_PATH, SESSION_COOKIE};
use crate::state::AppState;
use crate::views::auth::{login_page, register_page};

/// Maximum consecutive failed login attempts before locking the account.
pub const MAX_FAILED_ATTEMPTS: i32 = 5;

/// Duration in minutes to lock an account after exceeding failed attempts.
pub const LOCK_DURATION_MINS: i64 = 15;

/// Page shown after a successful login.
const HOME_PATH: &str = "/index";

const INVALID_CREDENTIALS: &str = "Invalid username or password";

// ---------------------------------------------------------------------------
// Form bodies
// ---------------------------------------------------------------------------

/// Body of `POST /auth/login`.
#[derive(Debug, Deserialize)]
pub struct LoginForm {
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub password: String,
}

/// Body of `POST /auth/register`.
#[derive(Debug, Deserialize, Validate)]
pub struct RegisterForm {
    #[serde(default)]
    #[validate(length(min = 3, max = 50, message = "Enter from 3 to 50 characters"))]
    pub username: String,
    #[serde(default)]
    #[validate(email(message = "Enter a valid email address"))]
    pub email: String,
    #[serde(default)]
    pub password: String,
    #[serde(default)]
    pub password_confirm: String,
}

impl RegisterForm {
    /// Field errors that need no database lookup.
    fn field_errors(&self) -> FormErrors {
        let mut errors = FormErrors::default();
        if let Err(validation) = self.validate() {
            for (field, problems) in validation.field_errors() {
                if let Some(message) = problems.first().and_then(|p| p.message.as_ref()) {
                    errors.add(field.to_string(), message.to_string());
                }
            }
        }
        if let Some(message) = new_password_problem(&self.password) {
            errors.add("password", message);
        }
        if self.password != self.password_confirm {
            errors.add("password_confirm", "Passwords do not match");
        }
        errors
    }
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// GET /auth/login
pub async fn login_form(Query(query): Query<HashMap<String, String>>) -> Html<String> {
    let notice = query
        .contains_key("registered")
        .then_some("Registration complete. Please log in.");
    login_page("", None, notice).into()
}

/// POST /auth/login
///
/// Verify the password, enforce the lockout, and on success set the
/// `session` cookie and go to the home page.
pub async fn login(
    State(state): State<AppState>,
    jar: CookieJar,
    Form(input): Form<LoginForm>,
) -> AppResult<Response> {
    let username = input.username.trim();
    let rejected = |status: StatusCode, message: &str| -> Response {
        let page: Html<String> = login_page(username, Some(message), None).into();
        (status, page).into_response()
    };

    let Some(user) = UserRepo::find_by_username(&state.pool, username).await? else {
        return Ok(rejected(StatusCode::UNAUTHORIZED, INVALID_CREDENTIALS));
    };

    if !user.is_active {
        return Ok(rejected(StatusCode::FORBIDDEN, "Account is deactivated"));
    }

    if user.is_locked_at(Utc::now()) {
        return Ok(rejected(
            StatusCode::FORBIDDEN,
            "Account is temporarily locked. Try again later.",
        ));
    }

    let password_valid = verify_password(&input.password, &user.password_hash)
        .map_err(|e| AppError::Credentials(format!("password verification: {e}")))?;

    if !password_valid {
        record_failed_login(&state, &user).await?;
        return Ok(rejected(StatusCode::UNAUTHORIZED, INVALID_CREDENTIALS));
    }

    UserRepo::record_successful_login(&state.pool, user.id).await?;

    let token = state
        .config
        .jwt
        .issue(user.id, &user.username)
        .map_err(|e| AppError::Credentials(format!("token generation: {e}")))?;

    let mut cookie = Cookie::new(SESSION_COOKIE, token);
    cookie.set_path("/");
    cookie.set_http_only(true);
    cookie.set_same_site(SameSite::Lax);

    tracing::info!(user_id = user.id, username = %user.username, "User logged in");
    Ok((jar.add(cookie), Redirect::to(HOME_PATH)).into_response())
}

/// Count a failed attempt and lock the account once the limit is reached.
async fn record_failed_login(state: &AppState, user: &User) -> AppResult<()> {
    let lock_until = Utc::now() + chrono::Duration::minutes(LOCK_DURATION_MINS);
    let outcome =
        UserRepo::record_failed_login(&state.pool, user.id, MAX_FAILED_ATTEMPTS, lock_until)
            .await?;
    if outcome.failed_login_count >= MAX_FAILED_ATTEMPTS {
        tracing::warn!(
            user_id = user.id,
            failed = outcome.failed_login_count,
            "Account locked after failed logins"
        );
    }
    Ok(())
}

/// GET /auth/register
pub async fn register_form() -> Html<String> {
    register_page("", "", &FormErrors::default()).into()
}

/// POST /auth/register
///
/// Create an account and send the user to the login page.
pub async fn register(
    State(state): State<AppState>,
    Form(input): Form<RegisterForm>,
) -> AppResult<Response> {
    let mut errors = input.field_errors();

    let username = input.username.trim();
    let email = input.email.trim();
    if errors.get("username").is_none()
        && UserRepo::find_by_username(&state.pool, username)
            .await?
            .is_some()
    {
        errors.add("username", DUPLICATE_MESSAGE);
    }
    if errors.get("email").is_none() && UserRepo::email_taken(&state.pool, email).await? {
        errors.add("email", DUPLICATE_MESSAGE);
    }

    if !errors.is_empty() {
        let page: Html<String> = register_page(username, email, &errors).into();
        return Ok((StatusCode::UNPROCESSABLE_ENTITY, page).into_response());
    }

    let password_hash = hash_password(&input.password)
        .map_err(|e| AppError::Credentials(format!("password hashing: {e}")))?;
    let user = UserRepo::create(
        &state.pool,
        &NewAccount {
            username: username.to_string(),
            email: email.to_string(),
            password_hash,
        },
    )
    .await?;

    tracing::info!(user_id = user.id, username = %user.username, "User registered");
    Ok(Redirect::to(&format!("{LOGIN_PATH}?registered=true")).into_response())
}

/// GET /auth/logout
///
/// Clear the session cookie and return to the login page.
pub async fn logout(jar: CookieJar) -> (CookieJar, Redirect) {
    let mut cookie = Cookie::new(SESSION_COOKIE, "");
    cookie.set_path("/");
    (jar.remove(cookie), Redirect::to(LOGIN_PATH))
}
