//! Argon2id password hashing and verification.

use argon2::password_hash::rand_core::OsRng;
use argon2::password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString};
use argon2::Argon2;
use once_cell::sync::Lazy;

/// Hash compared against when no account matches a login email, so both
/// failure paths cost the same.
static DUMMY_HASH: Lazy<Option<String>> =
    Lazy::new(|| hash_password("collapp-timing-equalizer").ok());

/// Hash a plaintext password using Argon2id with a random salt.
///
/// Returns the PHC-formatted hash string.
pub fn hash_password(password: &str) -> Result<String, argon2::password_hash::Error> {
    let salt = SaltString::generate(&mut OsRng);
    let hash = Argon2::default().hash_password(password.as_bytes(), &salt)?;
    Ok(hash.to_string())
}

/// Verify a plaintext password against a stored PHC-formatted hash.
///
/// Returns `Ok(true)` if the password matches, `Ok(false)` if it does not.
pub fn verify_password(password: &str, hash: &str) -> Result<bool, argon2::password_hash::Error> {
    let parsed_hash = PasswordHash::new(hash)?;
    match Argon2::default().verify_password(password.as_bytes(), &parsed_hash) {
        Ok(()) => Ok(true),
        Err(argon2::password_hash::Error::Password) => Ok(false),
        Err(e) => Err(e),
    }
}

/// Login check that never tells the caller which part was wrong.
///
/// `stored` is `None` when no user has the given email; a dummy hash is
/// verified instead. Unparseable stored hashes count as a mismatch.
pub fn check_login(password: &str, stored: Option<&str>) -> bool {
    match stored {
        Some(hash) => match verify_password(password, hash) {
            Ok(matched) => matched,
            Err(e) => {
                tracing::error!("Stored password hash is unusable: {}", e);
                false
            }
        },
        None => {
            if let Some(dummy) = DUMMY_HASH.as_deref() {
                let _ = verify_password(password, dummy);
            }
            false
        }
    }
}
