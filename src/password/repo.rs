//! Storage helpers for password credential rows.

use sqlx::{PgPool, Row};
use tracing::Instrument;

use crate::error::Result;

/// Insert one credential row for a user. Existing rows are left untouched.
pub(crate) async fn insert_credential(pool: &PgPool, user_id: i64, hash: &[u8]) -> Result<()> {
    let query = r"
        INSERT INTO user_passwords (user_id, password)
        VALUES ($1, $2)
    ";
    let span = tracing::info_span!(
        "db.query",
        db.system = "postgresql",
        db.operation = "INSERT",
        db.statement = query
    );
    sqlx::query(query)
        .bind(user_id)
        .bind(hash)
        .execute(pool)
        .instrument(span)
        .await?;

    Ok(())
}

/// Load every stored hash for a user, in store-native order.
pub(crate) async fn list_credential_hashes(pool: &PgPool, user_id: i64) -> Result<Vec<Vec<u8>>> {
    let query = "SELECT password FROM user_passwords WHERE user_id = $1";
    let span = tracing::info_span!(
        "db.query",
        db.system = "postgresql",
        db.operation = "SELECT",
        db.statement = query
    );
    let rows = sqlx::query(query)
        .bind(user_id)
        .fetch_all(pool)
        .instrument(span)
        .await?;

    rows.iter()
        .map(|row| row.try_get("password").map_err(Into::into))
        .collect()
}
