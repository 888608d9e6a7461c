//! Database access for user identity records.

use sqlx::{PgPool, Row};
use tracing::Instrument;

use crate::error::{Error, Result};
use crate::users::models::{NewUser, User, UserRow, UserStatus, UserWrite};

/// Repository over the `users` table.
///
/// Holds its own handle to the shared pool; every operation is a single
/// statement, so no transactions are opened here.
#[derive(Clone)]
pub struct UserRepo {
    pool: PgPool,
}

impl UserRepo {
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// List all active users in store-native order.
    ///
    /// # Errors
    /// Returns an error if the database query fails.
    pub async fn list_active(&self) -> Result<Vec<User>> {
        let query = r"
            SELECT id, identity, nickname, created, type, active
            FROM users
            WHERE active = $1
        ";
        let span = tracing::info_span!(
            "db.query",
            db.system = "postgresql",
            db.operation = "SELECT",
            db.statement = query
        );
        let rows = sqlx::query_as::<_, UserRow>(query)
            .bind(UserStatus::Active.as_db())
            .fetch_all(&self.pool)
            .instrument(span)
            .await?;

        Ok(rows.into_iter().map(UserRow::into_user).collect())
    }

    /// Fetch the unique active user with the given id.
    ///
    /// # Errors
    /// Returns [`Error::NotFound`] when zero rows match. A more-than-one
    /// match indicates data corruption and is reported the same way, not as
    /// a distinct error kind.
    pub async fn get_by_id(&self, id: i64) -> Result<User> {
        let query = r"
            SELECT id, identity, nickname, created, type, active
            FROM users
            WHERE id = $1 AND active = $2
        ";
        let span = tracing::info_span!(
            "db.query",
            db.system = "postgresql",
            db.operation = "SELECT",
            db.statement = query
        );
        let rows = sqlx::query_as::<_, UserRow>(query)
            .bind(id)
            .bind(UserStatus::Active.as_db())
            .fetch_all(&self.pool)
            .instrument(span)
            .await?;

        exactly_one(rows)
    }

    /// Fetch the unique active user with the given identity.
    ///
    /// # Errors
    /// Same contract as [`Self::get_by_id`], keyed by `identity`.
    pub async fn get_by_identity(&self, identity: &str) -> Result<User> {
        let query = r"
            SELECT id, identity, nickname, created, type, active
            FROM users
            WHERE identity = $1 AND active = $2
        ";
        let span = tracing::info_span!(
            "db.query",
            db.system = "postgresql",
            db.operation = "SELECT",
            db.statement = query
        );
        let rows = sqlx::query_as::<_, UserRow>(query)
            .bind(identity)
            .bind(UserStatus::Active.as_db())
            .fetch_all(&self.pool)
            .instrument(span)
            .await?;

        exactly_one(rows)
    }

    /// Persist a user record, dispatching on the [`UserWrite`] variant.
    ///
    /// `New` inserts with a server-side creation time and returns the input
    /// fields merged with the store-assigned id. `Existing` updates
    /// `identity` and `nickname` only — `created` and the role tag are
    /// immutable through this interface — and returns the input unchanged,
    /// without a re-fetch or rows-affected check.
    ///
    /// No uniqueness check on `identity` happens here; the schema's UNIQUE
    /// constraint rejects duplicates, surfacing as [`Error::Store`]
    /// (classify with [`crate::is_unique_violation`]).
    ///
    /// # Errors
    /// Returns an error if the database statement fails.
    pub async fn save(&self, user: UserWrite) -> Result<User> {
        match user {
            UserWrite::New(user) => self.insert(user).await,
            UserWrite::Existing(user) => self.update(user).await,
        }
    }

    async fn insert(&self, user: NewUser) -> Result<User> {
        let query = r"
            INSERT INTO users (identity, nickname, created, type, active)
            VALUES ($1, $2, NOW(), $3, $4)
            RETURNING id, created
        ";
        let span = tracing::info_span!(
            "db.query",
            db.system = "postgresql",
            db.operation = "INSERT",
            db.statement = query
        );
        let row = sqlx::query(query)
            .bind(&user.identity)
            .bind(&user.nickname)
            .bind(user.kind)
            .bind(UserStatus::Active.as_db())
            .fetch_one(&self.pool)
            .instrument(span)
            .await?;

        Ok(User {
            id: row.try_get("id")?,
            identity: user.identity,
            nickname: user.nickname,
            created: row.try_get("created")?,
            kind: user.kind,
        })
    }

    async fn update(&self, user: User) -> Result<User> {
        let query = "UPDATE users SET identity = $2, nickname = $3 WHERE id = $1";
        let span = tracing::info_span!(
            "db.query",
            db.system = "postgresql",
            db.operation = "UPDATE",
            db.statement = query
        );
        sqlx::query(query)
            .bind(user.id)
            .bind(&user.identity)
            .bind(&user.nickname)
            .execute(&self.pool)
            .instrument(span)
            .await?;

        Ok(user)
    }

    /// Soft-delete a user: the row and its credentials persist, but the
    /// record disappears from every default read.
    ///
    /// # Errors
    /// Returns an error if the database statement fails.
    pub async fn deactivate(&self, id: i64) -> Result<()> {
        let query = "UPDATE users SET active = $2 WHERE id = $1";
        let span = tracing::info_span!(
            "db.query",
            db.system = "postgresql",
            db.operation = "UPDATE",
            db.statement = query
        );
        sqlx::query(query)
            .bind(id)
            .bind(UserStatus::Inactive.as_db())
            .execute(&self.pool)
            .instrument(span)
            .await?;

        Ok(())
    }
}

/// Zero and duplicate matches collapse to the same `NotFound` signal.
fn exactly_one(mut rows: Vec<UserRow>) -> Result<User> {
    if rows.len() != 1 {
        return Err(Error::NotFound);
    }
    Ok(rows.remove(0).into_user())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn row(id: i64) -> UserRow {
        UserRow {
            id,
            identity: format!("user{id}@example.com"),
            nickname: format!("user{id}"),
            created: Utc::now(),
            kind: 0,
            status: UserStatus::Active,
        }
    }

    #[test]
    fn exactly_one_rejects_empty() {
        assert!(matches!(exactly_one(Vec::new()), Err(Error::NotFound)));
    }

    #[test]
    fn exactly_one_rejects_duplicates() {
        assert!(matches!(
            exactly_one(vec![row(1), row(1)]),
            Err(Error::NotFound)
        ));
    }

    #[test]
    fn exactly_one_accepts_a_single_row() {
        let user = exactly_one(vec![row(7)]).expect("single row");
        assert_eq!(user.id, 7);
    }
}
