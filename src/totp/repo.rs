//! Storage access for per-user one-time-code secrets.

use sqlx::{PgPool, Row};
use tracing::Instrument;

use crate::error::Result;

/// Load the shared secret registered for a user, if any.
///
/// At most one row per user is expected; absence means the second factor
/// is not enabled. Provisioning is not handled here — the secret is
/// read-only from this core's perspective.
pub(crate) async fn load_secret(pool: &PgPool, user_id: i64) -> Result<Option<String>> {
    let query = "SELECT secret FROM user_totp WHERE user_id = $1";
    let span = tracing::info_span!(
        "db.query",
        db.system = "postgresql",
        db.operation = "SELECT",
        db.statement = query
    );
    let row = sqlx::query(query)
        .bind(user_id)
        .fetch_optional(pool)
        .instrument(span)
        .await?;

    row.map(|row| row.try_get("secret").map_err(Into::into))
        .transpose()
}
