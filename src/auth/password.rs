//! Credential hashing for stored passwords.
//!
//! Hashes are Argon2id (v19) PHC strings, e.g. `$argon2id$v=19$m=19456,t=2,p=1$<salt>$<hash>`.
//! The string carries its own salt and cost parameters, so verification needs
//! nothing besides the stored value and old hashes keep verifying if the
//! defaults below ever change.

use argon2::{
    password_hash::{self, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Algorithm, Argon2, Params, Version,
};
use rand::rngs::OsRng;
use tracing::error;

fn hasher() -> Argon2<'static> {
    Argon2::new(Algorithm::Argon2id, Version::V0x13, Params::default())
}

fn hash_error(what: &'static str) -> impl FnOnce(password_hash::Error) -> anyhow::Error {
    move |e| {
        error!(error = %e, "argon2 {what} failed");
        anyhow::anyhow!("argon2 {what}: {e}")
    }
}

/// Hash `plain` with a fresh random salt.
pub fn hash_password(plain: &str) -> anyhow::Result<String> {
    let salt = SaltString::generate(&mut OsRng);
    let phc = hasher()
        .hash_password(plain.as_bytes(), &salt)
        .map_err(hash_error("hash"))?;
    Ok(phc.to_string())
}

/// `Ok(false)` on mismatch; `Err` only when the stored hash cannot be parsed.
pub fn verify_password(plain: &str, stored: &str) -> anyhow::Result<bool> {
    let parsed = PasswordHash::new(stored).map_err(hash_error("parse stored hash"))?;
    Ok(hasher().verify_password(plain.as_bytes(), &parsed).is_ok())
}
