//! Error taxonomy shared across the credential core.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    /// Lookup by id or identity matched zero or more than one active row.
    #[error("user not found")]
    NotFound,
    /// Failure from the underlying store, constraint violations included.
    #[error("store error: {0}")]
    Store(#[from] sqlx::Error),
    /// Failure of the password hashing library, not a mismatched password.
    #[error("password hash error: {0}")]
    Hash(String),
    /// Failure of the one-time-code library or secret decoding, not a
    /// mismatched code.
    #[error("one-time code error: {0}")]
    Totp(String),
}

pub type Result<T> = std::result::Result<T, Error>;

/// True when a store error is a unique-constraint violation (SQLSTATE
/// 23505), e.g. a duplicate identity on insert.
#[must_use]
pub fn is_unique_violation(err: &sqlx::Error) -> bool {
    match err {
        sqlx::Error::Database(db_err) => db_err.code().is_some_and(|code| code.as_ref() == "23505"),
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn not_found_is_distinguishable() {
        let err = Error::NotFound;
        assert!(matches!(err, Error::NotFound));
        assert_eq!(err.to_string(), "user not found");
    }

    #[test]
    fn non_database_errors_are_not_unique_violations() {
        assert!(!is_unique_violation(&sqlx::Error::RowNotFound));
    }
}
