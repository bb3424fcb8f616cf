//! Accounts that may log in to the application.

use roster_core::types::{DbId, Timestamp};
use sqlx::FromRow;

/// A row of `users`. Holds the password hash, so it is never rendered.
#[derive(Debug, Clone, FromRow)]
pub struct User {
    pub id: DbId,
    pub username: String,
    pub email: String,
    pub password_hash: String,
    pub is_active: bool,
    pub last_login_at: Option<Timestamp>,
    pub failed_login_count: i32,
    pub locked_until: Option<Timestamp>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl User {
    /// Whether a lock set by repeated failed logins is still in force at `now`.
    pub fn is_locked_at(&self, now: Timestamp) -> bool {
        self.locked_until.is_some_and(|until| until > now)
    }
}

/// Registration input. `password_hash` is already an Argon2 PHC string.
#[derive(Debug)]
pub struct NewAccount {
    pub username: String,
    pub email: String,
    pub password_hash: String,
}

/// Counter state after a rejected password.
#[derive(Debug, Clone, Copy, FromRow)]
pub struct FailedLogin {
    pub failed_login_count: i32,
    pub locked_until: Option<Timestamp>,
}
