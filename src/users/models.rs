//! User record shapes and their row mapping.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{postgres::PgRow, FromRow, Row};

/// Soft-deletion status of a stored user row.
///
/// Persisted as the `active` boolean; never exposed outside the crate.
/// Inactive rows are excluded from every default read but stay in storage
/// together with their credentials.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum UserStatus {
    Active,
    Inactive,
}

impl UserStatus {
    /// Map the persisted `users.active` value into the typed status.
    pub(crate) fn from_db(active: bool) -> Self {
        if active {
            Self::Active
        } else {
            Self::Inactive
        }
    }

    pub(crate) fn as_db(self) -> bool {
        matches!(self, Self::Active)
    }
}

/// A persisted, active user as returned to callers.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct User {
    /// Store-assigned, stable.
    pub id: i64,
    /// Unique among active users; typically an email or handle.
    pub identity: String,
    /// Display name.
    pub nickname: String,
    /// Set once at creation, immutable afterwards.
    pub created: DateTime<Utc>,
    /// Opaque role tag; this core never interprets it.
    #[serde(rename = "type")]
    pub kind: i16,
}

/// The pre-persistence variant of [`User`]: no id, no creation time.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct NewUser {
    pub identity: String,
    pub nickname: String,
    #[serde(rename = "type")]
    pub kind: i16,
}

/// Input to [`UserRepo::save`](crate::users::UserRepo::save).
///
/// The new-vs-existing distinction is carried by the variant, never by
/// inspecting fields at runtime.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UserWrite {
    New(NewUser),
    Existing(User),
}

impl From<NewUser> for UserWrite {
    fn from(user: NewUser) -> Self {
        Self::New(user)
    }
}

impl From<User> for UserWrite {
    fn from(user: User) -> Self {
        Self::Existing(user)
    }
}

/// Full row shape loaded from `users`, status included.
#[derive(Debug, Clone)]
pub(crate) struct UserRow {
    pub(crate) id: i64,
    pub(crate) identity: String,
    pub(crate) nickname: String,
    pub(crate) created: DateTime<Utc>,
    pub(crate) kind: i16,
    pub(crate) status: UserStatus,
}

impl UserRow {
    /// Strip the status before the record leaves the crate.
    pub(crate) fn into_user(self) -> User {
        User {
            id: self.id,
            identity: self.identity,
            nickname: self.nickname,
            created: self.created,
            kind: self.kind,
        }
    }
}

impl<'r> FromRow<'r, PgRow> for UserRow {
    fn from_row(row: &'r PgRow) -> Result<Self, sqlx::Error> {
        let active: bool = row.try_get("active")?;
        Ok(Self {
            id: row.try_get("id")?,
            identity: row.try_get("identity")?,
            nickname: row.try_get("nickname")?,
            created: row.try_get("created")?,
            kind: row.try_get("type")?,
            status: UserStatus::from_db(active),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_round_trips_through_the_active_flag() {
        assert_eq!(UserStatus::from_db(true), UserStatus::Active);
        assert_eq!(UserStatus::from_db(false), UserStatus::Inactive);
        assert!(UserStatus::Active.as_db());
        assert!(!UserStatus::Inactive.as_db());
    }

    #[test]
    fn role_tag_serializes_as_type() {
        let user = NewUser {
            identity: "alice@example.com".to_string(),
            nickname: "Alice".to_string(),
            kind: 1,
        };
        let json = serde_json::to_value(&user).expect("serialize");
        assert_eq!(json["type"], 1);
        assert!(json.get("kind").is_none());
    }

    #[test]
    fn write_variants_carry_the_distinction() {
        let new = NewUser {
            identity: "bob@example.com".to_string(),
            nickname: "Bob".to_string(),
            kind: 0,
        };
        assert!(matches!(UserWrite::from(new), UserWrite::New(_)));
    }
}
