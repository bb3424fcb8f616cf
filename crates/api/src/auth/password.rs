//! Account passwords: Argon2id hashes in PHC form and the rule for new ones.

use argon2::password_hash::rand_core::OsRng;
use argon2::password_hash::{self, PasswordHash, PasswordHasher, PasswordVerifier, SaltString};
use argon2::Argon2;

/// Shortest password accepted at registration.
pub const MIN_PASSWORD_LENGTH: usize = 8;

/// Hash a password for the `users.password_hash` column.
pub fn hash_password(password: &str) -> Result<String, password_hash::Error> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
}

/// Check a login attempt against a stored hash.
///
/// A mismatch is `Ok(false)`; only an unreadable stored hash is an error.
pub fn verify_password(password: &str, stored: &str) -> Result<bool, password_hash::Error> {
    let stored = PasswordHash::new(stored)?;
    match Argon2::default().verify_password(password.as_bytes(), &stored) {
        Ok(()) => Ok(true),
        Err(password_hash::Error::Password) => Ok(false),
        Err(e) => Err(e),
    }
}

/// The registration form message for a password that is too short.
pub fn new_password_problem(password: &str) -> Option<String> {
    (password.chars().count() < MIN_PASSWORD_LENGTH)
        .then(|| format!("Password must be at least {MIN_PASSWORD_LENGTH} characters long"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stored_hash_accepts_only_the_original_password() {
        let hash = hash_password("correct-horse-battery").expect("hashing should succeed");

        assert!(hash.starts_with("$argon2id$"));
        assert!(verify_password("correct-horse-battery", &hash).unwrap());
        assert!(!verify_password("correct-horse-batter", &hash).unwrap());
    }

    #[test]
    fn same_password_hashes_differently() {
        let first = hash_password("same-password").unwrap();
        let second = hash_password("same-password").unwrap();
        assert_ne!(first, second, "each hash gets its own salt");
    }

    #[test]
    fn unreadable_stored_hash_is_an_error() {
        assert!(verify_password("anything", "plaintext-in-the-column").is_err());
    }

    #[test]
    fn short_passwords_are_reported() {
        let message = new_password_problem("seven77").expect("too short");
        assert_eq!(message, "Password must be at least 8 characters long");
        assert_eq!(new_password_problem("eight888"), None);
        assert_eq!(new_password_problem("ünïcödé"), Some(message), "counts characters");
    }
}
