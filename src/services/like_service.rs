//! Domain service for the like toggle.

use thiserror::Error;

use super::permissions::Actor;

#[derive(Debug, Error)]
pub enum LikeError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Database error: {0}")]
    Database(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<sea_orm::DbErr> for LikeError {
    fn from(err: sea_orm::DbErr) -> Self {
        Self::Database(err.to_string())
    }
}

impl From<anyhow::Error> for LikeError {
    fn from(err: anyhow::Error) -> Self {
        Self::Internal(err.to_string())
    }
}

/// State of the (recipe, user) pair after a toggle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LikeToggle {
    pub liked: bool,
    pub total_likes: u64,
    pub recipe_slug: String,
}

#[async_trait::async_trait]
pub trait LikeService: Send + Sync {
    /// Likes the recipe if the actor has not, otherwise removes the like.
    ///
    /// Safe under concurrent calls for the same pair: the store keeps at most
    /// one row per (recipe, user).
    async fn toggle(&self, actor: &Actor, recipe_slug: &str) -> Result<LikeToggle, LikeError>;
}
