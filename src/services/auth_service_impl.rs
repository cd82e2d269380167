//! `SeaORM` implementation of the `AuthService` trait.

use async_trait::async_trait;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{info, warn};

use super::auth_service::{AuthError, AuthService};
use super::forms::{FieldErrors, RegisterForm};
use super::permissions::Actor;
use crate::config::Config;
use crate::db::{Store, User};

pub struct SeaOrmAuthService {
    store: Store,
    config: Arc<RwLock<Config>>,
}

impl SeaOrmAuthService {
    #[must_use]
    pub const fn new(store: Store, config: Arc<RwLock<Config>>) -> Self {
        Self { store, config }
    }
}

#[async_trait]
impl AuthService for SeaOrmAuthService {
    async fn register(&self, form: &RegisterForm) -> Result<User, AuthError> {
        let registration = form.validate().map_err(AuthError::Validation)?;
        let taken = || {
            AuthError::Validation(FieldErrors::single(
                "username",
                "A user with that username already exists.",
            ))
        };

        if self.store.user_exists(&registration.username).await? {
            return Err(taken());
        }

        // A concurrent sign-up can still claim the name before the insert.
        let security = self.config.read().await.security.clone();
        let user = self
            .store
            .create_user_if_absent(
                &registration.username,
                &registration.email,
                &registration.password,
                false,
                &security,
            )
            .await?
            .ok_or_else(taken)?;

        info!(user = %user.username, "Account registered");
        Ok(user)
    }

    async fn login(&self, username: &str, password: &str) -> Result<User, AuthError> {
        let username = username.trim();
        if username.is_empty() || password.is_empty() {
            return Err(AuthError::InvalidCredentials);
        }

        match self.store.verify_user_password(username, password).await? {
            Some(user) => {
                info!(user = %user.username, "Login succeeded");
                Ok(user)
            }
            None => {
                warn!(user = %username, "Login failed");
                Err(AuthError::InvalidCredentials)
            }
        }
    }

    async fn actor(&self, user_id: i32) -> Result<Option<Actor>, AuthError> {
        Ok(self.store.get_user_by_id(user_id).await?.map(Actor::from))
    }
}
