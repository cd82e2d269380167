//! Domain service for recipe comments.

use thiserror::Error;

use super::forms::{CommentForm, FieldErrors};
use super::permissions::{Actor, Forbidden};
use crate::entities::comments;

#[derive(Debug, Error)]
pub enum CommentError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("You can only delete your own comments.")]
    Forbidden,

    #[error("Validation failed: {}", .0.summary())]
    Validation(FieldErrors),

    #[error("Database error: {0}")]
    Database(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<sea_orm::DbErr> for CommentError {
    fn from(err: sea_orm::DbErr) -> Self {
        Self::Database(err.to_string())
    }
}

impl From<anyhow::Error> for CommentError {
    fn from(err: anyhow::Error) -> Self {
        Self::Internal(err.to_string())
    }
}

impl From<Forbidden> for CommentError {
    fn from(_: Forbidden) -> Self {
        Self::Forbidden
    }
}

/// A removed comment and the slug of the recipe it was on.
#[derive(Debug, Clone)]
pub struct DeletedComment {
    pub comment: comments::Model,
    pub recipe_slug: String,
}

#[async_trait::async_trait]
pub trait CommentService: Send + Sync {
    /// Adds an approved comment by `actor` to the recipe.
    ///
    /// # Errors
    ///
    /// Returns [`CommentError::NotFound`] when the recipe does not exist or
    /// is a draft the actor cannot see, and [`CommentError::Validation`] for
    /// empty or overlong content.
    async fn add(
        &self,
        actor: &Actor,
        recipe_slug: &str,
        form: &CommentForm,
    ) -> Result<comments::Model, CommentError>;

    /// # Errors
    ///
    /// Returns [`CommentError::Forbidden`] unless the actor wrote the comment
    /// or is staff.
    async fn delete(&self, actor: &Actor, comment_id: i32) -> Result<DeletedComment, CommentError>;
}
