//! Time-based one-time-code verification.

use sqlx::PgPool;
use totp_rs::{Algorithm, Secret, TOTP};
use tracing::debug;

use crate::error::{Error, Result};
use crate::totp::repo;
use crate::users::User;

const DIGITS: usize = 6;
/// Accepted clock drift, in time steps on either side of the current one.
const SKEW: u8 = 1;
const STEP_SECONDS: u64 = 30;

/// Verifies one-time codes against a per-user shared secret.
#[derive(Clone)]
pub struct TotpVerifier {
    pool: PgPool,
}

impl TotpVerifier {
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Validate a submitted code for the user.
    ///
    /// `Ok(false)` when no secret is registered (factor not enabled) and
    /// when the code does not match any step inside the drift window. An
    /// unparsable token is treated as non-matching, never as an error.
    ///
    /// # Errors
    /// Returns an error if the database query fails or the stored secret
    /// cannot be decoded.
    pub async fn verify(&self, user: &User, token: &str) -> Result<bool> {
        let Some(secret) = repo::load_secret(&self.pool, user.id).await? else {
            debug!(user_id = user.id, "one-time code factor not enabled");
            return Ok(false);
        };

        check_token(&secret, token)
    }
}

/// Check a token against a base32-encoded secret at the current time.
fn check_token(secret: &str, token: &str) -> Result<bool> {
    let secret_bytes = Secret::Encoded(secret.to_string())
        .to_bytes()
        .map_err(|err| Error::Totp(format!("secret decode error: {err}")))?;

    let totp = TOTP::new(Algorithm::SHA1, DIGITS, SKEW, STEP_SECONDS, secret_bytes)
        .map_err(|err| Error::Totp(format!("totp init error: {err}")))?;

    totp.check_current(token)
        .map_err(|err| Error::Totp(format!("system clock error: {err}")))
}
