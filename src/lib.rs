//! # Identeco (Identity & Credential Verification Core)
//!
//! `identeco` is the credential subsystem of a multi-user service: user
//! identity records plus two independent proof-of-identity factors — a
//! long-term secret (password) and a time-based one-time code. It is
//! consumed in-process by request-handling code; HTTP presentation, OAuth2
//! token issuance, and rate-limiting/lockout policy live outside this
//! crate and only consume its outputs.
//!
//! ## Components
//!
//! - [`UserRepo`] — identity records in PostgreSQL. Users are never
//!   physically deleted; deactivation hides a row (and keeps its
//!   credentials) from every default read.
//! - [`PasswordStore`] — bcrypt credential slots. A user may hold many
//!   simultaneously valid credentials; nothing here removes them.
//! - [`TotpVerifier`] — SHA-1/6-digit/30-second one-time codes with a
//!   one-step drift window. An absent secret means the factor is not
//!   enabled.
//! - [`CredentialService`] — stateless composition root: resolve an
//!   identity, then verify a claimed [`Factor`].
//!
//! Each component takes an explicit `sqlx::PgPool` at construction; they
//! share the pool but own disjoint tables (`sql/schema.sql`).
//!
//! ## Concurrency
//!
//! Every operation is stateless per call; correctness rests on row-level
//! atomicity of single-statement writes, so no multi-statement
//! transactions are used. bcrypt work runs under
//! `tokio::task::spawn_blocking`. Callers impose deadlines by dropping the
//! future (e.g. `tokio::time::timeout`); the crate has no internal
//! timeouts and no retries.
//!
//! ## Errors
//!
//! [`Error::NotFound`] (no such identity/id) is distinguishable from an
//! `Ok(false)` verification verdict. Store and crypto failures propagate
//! unwrapped — a wrong password or code is a normal `false`, never an
//! error, and vice versa.

pub mod error;
pub mod password;
pub mod service;
pub mod totp;
pub mod users;

pub use error::{is_unique_violation, Error, Result};
pub use password::{PasswordStore, VerifyPolicy};
pub use service::{CredentialService, Factor};
pub use totp::TotpVerifier;
pub use users::{NewUser, User, UserRepo, UserWrite};
