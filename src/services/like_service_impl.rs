//! `SeaORM` implementation of the `LikeService` trait.

use async_trait::async_trait;
use tracing::info;

use super::like_service::{LikeError, LikeService, LikeToggle};
use super::permissions::{Actor, can_view};
use crate::db::Store;

pub struct SeaOrmLikeService {
    store: Store,
}

impl SeaOrmLikeService {
    #[must_use]
    pub const fn new(store: Store) -> Self {
        Self { store }
    }
}

#[async_trait]
impl LikeService for SeaOrmLikeService {
    async fn toggle(&self, actor: &Actor, recipe_slug: &str) -> Result<LikeToggle, LikeError> {
        let recipe = self
            .store
            .get_recipe_by_slug(recipe_slug)
            .await?
            .filter(|recipe| can_view(Some(actor), recipe))
            .ok_or_else(|| LikeError::NotFound(format!("Recipe '{recipe_slug}' not found")))?;

        let outcome = self.store.toggle_like(recipe.id, actor.id).await?;
        info!(
            user = %actor.username,
            recipe = %recipe.slug,
            liked = outcome.liked,
            total_likes = outcome.total_likes,
            "Like toggled"
        );

        Ok(LikeToggle {
            liked: outcome.liked,
            total_likes: outcome.total_likes,
            recipe_slug: recipe.slug,
        })
    }
}
