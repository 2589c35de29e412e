use std::fmt;

use argon2::{
    password_hash::{self, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};
use rand::rngs::OsRng;
use tracing::{error, warn};

/// Argon2 PHC string for a user's password.
///
/// The digest is write-only: it can be produced from a plaintext, stored, loaded and checked
/// against a candidate, but there is no accessor returning it. `Debug` is redacted.
#[derive(Clone, PartialEq, Eq, sqlx::Type)]
#[sqlx(transparent)]
pub struct PasswordHash(String);

impl fmt::Debug for PasswordHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("PasswordHash(<redacted>)")
    }
}

pub fn hash_password(plain: &str) -> anyhow::Result<PasswordHash> {
    let salt = SaltString::generate(&mut OsRng);
    let argon2 = Argon2::default();
    let hash = argon2
        .hash_password(plain.as_bytes(), &salt)
        .map_err(|e| {
            error!(error = %e, "argon2 hash_password error");
            anyhow::anyhow!(e.to_string())
        })?
        .to_string();
    Ok(PasswordHash(hash))
}

/// Returns `false` on mismatch and on a stored value that does not parse.
pub fn verify_password(plain: &str, hash: &PasswordHash) -> bool {
    let parsed = match password_hash::PasswordHash::new(&hash.0) {
        Ok(p) => p,
        Err(e) => {
            warn!(error = %e, "stored password hash is malformed");
            return false;
        }
    };
    Argon2::default()
        .verify_password(plain.as_bytes(), &parsed)
        .is_ok()
}

#[cfg(test)]
impl PasswordHash {
    pub(crate) fn from_raw(raw: &str) -> Self {
        Self(raw.to_string())
    }
}
