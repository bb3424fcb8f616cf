use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use roster_core::error::CoreError;
use serde_json::json;

/// Error returned by page and JSON handlers.
///
/// Rendered as `{"error": ..., "code": ...}` with a matching status.
/// Database and credential failures never leak their details.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// A route segment or record id that resolves to nothing.
    #[error(transparent)]
    Core(#[from] CoreError),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Password hashing or session token signing failed.
    #[error("Credential error: {0}")]
    Credentials(String),
}

/// Convenience type alias for handler return values.
pub type AppResult<T> = Result<T, AppError>;

const HIDDEN_MESSAGE: &str = "An internal error occurred";

impl AppError {
    fn classify(&self) -> (StatusCode, &'static str, String) {
        match self {
            AppError::Core(err) => (StatusCode::NOT_FOUND, "NOT_FOUND", err.to_string()),
            AppError::Database(err) => classify_sqlx_error(err),
            AppError::Credentials(detail) => {
                tracing::error!(error = %detail, "Credential handling failed");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "INTERNAL_ERROR",
                    HIDDEN_MESSAGE.to_string(),
                )
            }
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message) = self.classify();
        let body = json!({
            "error": message,
            "code": code,
        });
        (status, axum::Json(body)).into_response()
    }
}

/// The constraint named by a unique (`uq_`) or foreign key (`fk_`) violation.
pub fn violated_constraint(err: &sqlx::Error) -> Option<&str> {
    let sqlx::Error::Database(db_err) = err else {
        return None;
    };
    let constraint = db_err.constraint()?;
    match db_err.code().as_deref() {
        Some("23505") if constraint.starts_with("uq_") => Some(constraint),
        Some("23503") if constraint.starts_with("fk_") => Some(constraint),
        _ => None,
    }
}

/// `RowNotFound` is a 404 and a named `uq_`/`fk_` violation a 409; anything
/// else is logged and hidden behind a 500.
fn classify_sqlx_error(err: &sqlx::Error) -> (StatusCode, &'static str, String) {
    if matches!(err, sqlx::Error::RowNotFound) {
        return (
            StatusCode::NOT_FOUND,
            "NOT_FOUND",
            "Record not found".to_string(),
        );
    }

    match violated_constraint(err) {
        Some(constraint) if constraint.starts_with("uq_") => (
            StatusCode::CONFLICT,
            "CONFLICT",
            format!("Value already in database ({constraint})"),
        ),
        Some(constraint) => (
            StatusCode::CONFLICT,
            "CONFLICT",
            format!("Record is still referenced ({constraint})"),
        ),
        None => {
            tracing::error!(error = %err, "Database error");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                "INTERNAL_ERROR",
                HIDDEN_MESSAGE.to_string(),
            )
        }
    }
}
