//! Password hashing. Hashes are Argon2 PHC strings and are write-only from
//! the rest of the crate's point of view: they can be produced and checked,
//! never read back as a password.

use argon2::{
    Argon2,
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString, rand_core::OsRng},
};
use uuid::Uuid;

use crate::error::AppError;

/// Hash a plain-text password with a fresh random salt.
pub fn hash(plain_text: &str) -> Result<String, AppError> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(plain_text.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| AppError::internal(format!("Password hash failed: {e}")))
}

/// Check a candidate against a stored hash. A malformed hash never matches.
pub fn verify(candidate: &str, stored_hash: &str) -> bool {
    match PasswordHash::new(stored_hash) {
        Ok(parsed) => Argon2::default()
            .verify_password(candidate.as_bytes(), &parsed)
            .is_ok(),
        Err(e) => {
            tracing::warn!(error = %e, "Stored password hash is malformed");
            false
        }
    }
}

/// Hash of a random secret nobody knows, for accounts created through OAuth.
pub fn unusable() -> Result<String, AppError> {
    hash(&format!("{}{}", Uuid::new_v4(), Uuid::new_v4()))
}
