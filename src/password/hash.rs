//! Adaptive password hashing on the blocking worker pool.

use secrecy::{ExposeSecret, SecretString};

use crate::error::{Error, Result};

/// Default bcrypt work factor. High enough to resist offline brute force;
/// lower it only in tests.
pub const DEFAULT_COST: u32 = bcrypt::DEFAULT_COST;

/// Hash a plaintext password with bcrypt at the given cost.
///
/// bcrypt is CPU-bound by design, so the work runs on the blocking thread
/// pool instead of the async runtime.
///
/// # Errors
/// Returns [`Error::Hash`] if bcrypt fails or the worker task is lost.
pub(crate) async fn hash_password(plaintext: &SecretString, cost: u32) -> Result<String> {
    let plaintext = plaintext.clone();
    tokio::task::spawn_blocking(move || {
        bcrypt::hash(plaintext.expose_secret(), cost).map_err(|err| Error::Hash(err.to_string()))
    })
    .await
    .map_err(|err| Error::Hash(format!("blocking task join error: {err}")))?
}

/// Check a candidate password against one stored bcrypt hash.
///
/// A mismatch is `Ok(false)`; only a failure of the hashing library itself
/// (e.g. a malformed stored hash) is an error.
///
/// # Errors
/// Returns [`Error::Hash`] if bcrypt fails or the worker task is lost.
pub(crate) async fn verify_password(candidate: &SecretString, hash: &str) -> Result<bool> {
    let candidate = candidate.clone();
    let hash = hash.to_string();
    tokio::task::spawn_blocking(move || {
        bcrypt::verify(candidate.expose_secret(), &hash).map_err(|err| Error::Hash(err.to_string()))
    })
    .await
    .map_err(|err| Error::Hash(format!("blocking task join error: {err}")))?
}

#[cfg(test)]
mod tests {
    use super::*;

    const TEST_COST: u32 = 4;

    fn secret(value: &str) -> SecretString {
        SecretString::from(value.to_string())
    }

    #[tokio::test]
    async fn hash_and_verify_round_trip() {
        let password = secret("Secr3tPass!");
        let hash = hash_password(&password, TEST_COST).await.expect("hash");
        assert!(hash.starts_with("$2"));

        assert!(verify_password(&password, &hash).await.expect("verify"));
        assert!(!verify_password(&secret("WrongPass"), &hash)
            .await
            .expect("verify"));
    }

    #[tokio::test]
    async fn malformed_hash_is_an_error_not_a_mismatch() {
        let err = verify_password(&secret("anything"), "not-a-bcrypt-hash")
            .await
            .expect_err("malformed hash must fail");
        assert!(matches!(err, Error::Hash(_)));
    }
}
