//! Domain service for accounts: registration, credential checks and
//! resolving the session's user.

use thiserror::Error;

use super::forms::{FieldErrors, RegisterForm};
use super::permissions::Actor;
use crate::db::User;

#[derive(Debug, Error)]
pub enum AuthError {
    #[error("Invalid username or password. Please try again.")]
    InvalidCredentials,

    #[error("Validation failed: {}", .0.summary())]
    Validation(FieldErrors),

    #[error("Database error: {0}")]
    Database(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<sea_orm::DbErr> for AuthError {
    fn from(err: sea_orm::DbErr) -> Self {
        Self::Database(err.to_string())
    }
}

impl From<anyhow::Error> for AuthError {
    fn from(err: anyhow::Error) -> Self {
        Self::Internal(err.to_string())
    }
}

#[async_trait::async_trait]
pub trait AuthService: Send + Sync {
    /// Creates a regular (non-staff) account.
    ///
    /// # Errors
    ///
    /// Returns [`AuthError::Validation`] for malformed fields or a username
    /// that is already taken.
    async fn register(&self, form: &RegisterForm) -> Result<User, AuthError>;

    /// Verifies credentials.
    ///
    /// # Errors
    ///
    /// Returns [`AuthError::InvalidCredentials`] for an unknown user or a
    /// wrong password, without saying which.
    async fn login(&self, username: &str, password: &str) -> Result<User, AuthError>;

    /// Resolves a session's user id. `None` when the account is gone.
    async fn actor(&self, user_id: i32) -> Result<Option<Actor>, AuthError>;
}
