//! Password credential storage and verification.

use secrecy::SecretString;
use sqlx::PgPool;
use tracing::debug;

use crate::error::{Error, Result};
use crate::password::{hash, repo};
use crate::users::User;

/// How stored hashes are compared against a candidate password.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum VerifyPolicy {
    /// Stop at the first matching hash. Cheapest, but the elapsed time is
    /// correlated with which slot (if any) matched.
    #[default]
    FirstMatch,
    /// Check every stored hash regardless of match position, for callers
    /// whose threat model rules out the slot-position timing signal.
    ScanAll,
}

/// Stores and verifies password credentials keyed by user.
///
/// A user may hold zero, one, or many concurrently valid credentials:
/// [`add_credential`](Self::add_credential) accumulates rows and nothing in
/// this store removes or supersedes them.
#[derive(Clone)]
pub struct PasswordStore {
    pool: PgPool,
    cost: u32,
    policy: VerifyPolicy,
}

impl PasswordStore {
    /// Store with the default work factor and comparison policy.
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self {
            pool,
            cost: hash::DEFAULT_COST,
            policy: VerifyPolicy::default(),
        }
    }

    /// Override the bcrypt work factor. The factor is fixed per store; it
    /// is not renegotiated per call.
    #[must_use]
    pub fn with_cost(mut self, cost: u32) -> Self {
        self.cost = cost;
        self
    }

    #[must_use]
    pub fn with_policy(mut self, policy: VerifyPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Hash `plaintext` and insert a new credential row for the user.
    ///
    /// Existing credentials are neither checked nor invalidated; repeated
    /// calls accumulate distinct, simultaneously valid credentials.
    ///
    /// # Errors
    /// Returns an error if hashing or the database insert fails.
    pub async fn add_credential(&self, user: &User, plaintext: &SecretString) -> Result<()> {
        let hashed = hash::hash_password(plaintext, self.cost).await?;
        repo::insert_credential(&self.pool, user.id, hashed.as_bytes()).await?;
        debug!(user_id = user.id, "password credential added");
        Ok(())
    }

    /// Check a candidate password against every credential stored for the
    /// user, per the configured [`VerifyPolicy`].
    ///
    /// `Ok(false)` covers both "no credentials stored" and "no hash
    /// matched". Safe to call repeatedly, but every call performs the full
    /// expensive comparison — throttling and lockout belong to the caller.
    ///
    /// # Errors
    /// Returns an error if the database query fails or a stored hash cannot
    /// be processed (never for a plain mismatch).
    pub async fn verify(&self, user: &User, candidate: &SecretString) -> Result<bool> {
        let stored = repo::list_credential_hashes(&self.pool, user.id).await?;
        verify_against(&stored, candidate, self.policy).await
    }
}

/// Compare a candidate against stored hashes in store order.
async fn verify_against(
    stored: &[Vec<u8>],
    candidate: &SecretString,
    policy: VerifyPolicy,
) -> Result<bool> {
    let mut matched = false;
    for bytes in stored {
        let stored_hash = std::str::from_utf8(bytes)
            .map_err(|_| Error::Hash("stored hash is not valid utf-8".to_string()))?;
        if hash::verify_password(candidate, stored_hash).await? {
            if policy == VerifyPolicy::FirstMatch {
                return Ok(true);
            }
            matched = true;
        }
    }
    Ok(matched)
}

#[cfg(test)]
mod tests {
    use super::*;

    const TEST_COST: u32 = 4;

    fn secret(value: &str) -> SecretString {
        SecretString::from(value.to_string())
    }

    async fn stored(passwords: &[&str]) -> Vec<Vec<u8>> {
        let mut rows = Vec::new();
        for password in passwords {
            let hashed = hash::hash_password(&secret(password), TEST_COST)
                .await
                .expect("hash");
            rows.push(hashed.into_bytes());
        }
        rows
    }

    #[tokio::test]
    async fn empty_credential_set_never_matches() {
        for policy in [VerifyPolicy::FirstMatch, VerifyPolicy::ScanAll] {
            assert!(!verify_against(&[], &secret("anything"), policy)
                .await
                .expect("verify"));
        }
    }

    #[tokio::test]
    async fn accumulated_credentials_verify_independently() {
        let rows = stored(&["Secr3tPass!", "Backup#2"]).await;
        for candidate in ["Secr3tPass!", "Backup#2"] {
            assert!(
                verify_against(&rows, &secret(candidate), VerifyPolicy::FirstMatch)
                    .await
                    .expect("verify")
            );
        }
        assert!(
            !verify_against(&rows, &secret("WrongPass"), VerifyPolicy::FirstMatch)
                .await
                .expect("verify")
        );
    }

    #[tokio::test]
    async fn scan_all_reaches_the_same_verdict() {
        let rows = stored(&["Secr3tPass!", "Backup#2"]).await;
        assert!(
            verify_against(&rows, &secret("Backup#2"), VerifyPolicy::ScanAll)
                .await
                .expect("verify")
        );
        assert!(
            !verify_against(&rows, &secret("WrongPass"), VerifyPolicy::ScanAll)
                .await
                .expect("verify")
        );
    }

    #[tokio::test]
    async fn corrupt_stored_hash_is_an_error() {
        let rows = vec![vec![0xff, 0xfe]];
        let err = verify_against(&rows, &secret("anything"), VerifyPolicy::FirstMatch)
            .await
            .expect_err("corrupt hash must fail");
        assert!(matches!(err, Error::Hash(_)));
    }
}
