//! Composition root: resolve an identity, then verify a submitted factor.

use secrecy::SecretString;
use tracing::instrument;

use crate::error::Result;
use crate::password::PasswordStore;
use crate::totp::TotpVerifier;
use crate::users::UserRepo;

/// A claimed proof-of-identity factor.
#[derive(Debug, Clone)]
pub enum Factor {
    /// Long-term secret, compared against the user's stored credentials.
    Password(SecretString),
    /// Time-based one-time code from the user's second-factor device.
    OneTimeCode(String),
}

/// Sequences "resolve identity" then "verify factor".
///
/// Holds no state of its own and performs no caching, throttling, or
/// lockout — repeated calls each pay the full store round trip and hash
/// cost, and rate limiting is the surrounding system's job.
#[derive(Clone)]
pub struct CredentialService {
    users: UserRepo,
    passwords: PasswordStore,
    totp: TotpVerifier,
}

impl CredentialService {
    #[must_use]
    pub fn new(users: UserRepo, passwords: PasswordStore, totp: TotpVerifier) -> Self {
        Self {
            users,
            passwords,
            totp,
        }
    }

    /// Resolve `identity` and check the claimed factor against that user.
    ///
    /// # Errors
    /// Returns [`Error::NotFound`](crate::Error::NotFound) when no active
    /// user carries the identity — never masked as a failed verification,
    /// so "no such user" and "wrong credential" stay distinguishable.
    /// Store and crypto failures propagate unwrapped.
    #[instrument(skip_all, fields(identity = %identity))]
    pub async fn verify(&self, identity: &str, factor: &Factor) -> Result<bool> {
        let user = self.users.get_by_identity(identity).await?;

        match factor {
            Factor::Password(candidate) => self.passwords.verify(&user, candidate).await,
            Factor::OneTimeCode(token) => self.totp.verify(&user, token).await,
        }
    }
}
