//! Domain service for browsing and editing recipes.
//!
//! Lists only ever show published recipes. Drafts are reachable through
//! `detail` and the edit operations by their author and staff.

use thiserror::Error;

use super::forms::{FieldErrors, RecipeForm};
use super::permissions::{Actor, Forbidden};
use crate::api::types::{FormChoices, ProfileDto, RecipeDetailDto, RecipeFormPage, RecipeListing};
use crate::entities::recipes;

/// Errors specific to recipe operations.
#[derive(Debug, Error)]
pub enum RecipeError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("You do not have permission to change this recipe")]
    Forbidden,

    #[error("Validation failed: {}", .0.summary())]
    Validation(FieldErrors),

    #[error("Database error: {0}")]
    Database(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<sea_orm::DbErr> for RecipeError {
    fn from(err: sea_orm::DbErr) -> Self {
        Self::Database(err.to_string())
    }
}

impl From<anyhow::Error> for RecipeError {
    fn from(err: anyhow::Error) -> Self {
        Self::Internal(err.to_string())
    }
}

impl From<Forbidden> for RecipeError {
    fn from(_: Forbidden) -> Self {
        Self::Forbidden
    }
}

/// Domain service trait for recipes.
///
/// `viewer` is the requesting principal, if any. It decides which ids come
/// back in `liked_recipe_ids` and whether drafts are visible.
#[async_trait::async_trait]
pub trait RecipeService: Send + Sync {
    /// All published recipes, newest first.
    async fn list_published(
        &self,
        viewer: Option<&Actor>,
        page: u64,
    ) -> Result<RecipeListing, RecipeError>;

    /// # Errors
    ///
    /// Returns [`RecipeError::NotFound`] for an unknown category slug.
    async fn list_by_category(
        &self,
        viewer: Option<&Actor>,
        slug: &str,
        page: u64,
    ) -> Result<RecipeListing, RecipeError>;

    /// # Errors
    ///
    /// Returns [`RecipeError::NotFound`] for an unknown country slug.
    async fn list_by_country(
        &self,
        viewer: Option<&Actor>,
        slug: &str,
        page: u64,
    ) -> Result<RecipeListing, RecipeError>;

    /// Substring search over title, ingredients and description. A blank
    /// query matches nothing.
    async fn search(
        &self,
        viewer: Option<&Actor>,
        query: &str,
        page: u64,
    ) -> Result<RecipeListing, RecipeError>;

    /// Published recipes the actor has liked.
    async fn list_favorites(&self, actor: &Actor, page: u64)
    -> Result<RecipeListing, RecipeError>;

    /// Published recipes by one author plus their count.
    async fn profile(
        &self,
        viewer: Option<&Actor>,
        username: &str,
        page: u64,
    ) -> Result<ProfileDto, RecipeError>;

    /// # Errors
    ///
    /// Returns [`RecipeError::NotFound`] when the slug is unknown or the
    /// recipe is a draft the viewer may not see.
    async fn detail(
        &self,
        viewer: Option<&Actor>,
        slug: &str,
    ) -> Result<RecipeDetailDto, RecipeError>;

    async fn form_choices(&self) -> Result<FormChoices, RecipeError>;

    /// Validates the form and stores a new recipe authored by `actor`.
    ///
    /// # Errors
    ///
    /// Returns [`RecipeError::Validation`] with every failing field,
    /// including a title whose slug is already taken.
    async fn create(
        &self,
        actor: &Actor,
        form: &RecipeForm,
    ) -> Result<recipes::Model, RecipeError>;

    /// Current values for the edit form.
    async fn edit_form(&self, actor: &Actor, slug: &str) -> Result<RecipeFormPage, RecipeError>;

    /// # Errors
    ///
    /// Returns [`RecipeError::Forbidden`] unless the actor owns the recipe or
    /// is staff. Nothing is written in that case.
    async fn update(
        &self,
        actor: &Actor,
        slug: &str,
        form: &RecipeForm,
    ) -> Result<recipes::Model, RecipeError>;

    /// Deletes the recipe and returns what was removed.
    async fn delete(&self, actor: &Actor, slug: &str) -> Result<recipes::Model, RecipeError>;
}
