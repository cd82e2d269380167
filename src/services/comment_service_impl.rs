//! `SeaORM` implementation of the `CommentService` trait.

use async_trait::async_trait;
use tracing::{info, warn};

use super::comment_service::{CommentError, CommentService, DeletedComment};
use super::forms::CommentForm;
use super::permissions::{Actor, can_view, ensure_can_modify};
use crate::db::Store;
use crate::entities::comments;

pub struct SeaOrmCommentService {
    store: Store,
}

impl SeaOrmCommentService {
    #[must_use]
    pub const fn new(store: Store) -> Self {
        Self { store }
    }
}

#[async_trait]
impl CommentService for SeaOrmCommentService {
    async fn add(
        &self,
        actor: &Actor,
        recipe_slug: &str,
        form: &CommentForm,
    ) -> Result<comments::Model, CommentError> {
        let recipe = self
            .store
            .get_recipe_by_slug(recipe_slug)
            .await?
            .filter(|recipe| can_view(Some(actor), recipe))
            .ok_or_else(|| CommentError::NotFound(format!("Recipe '{recipe_slug}' not found")))?;

        let content = form.validate().map_err(CommentError::Validation)?;
        let comment = self.store.add_comment(recipe.id, actor.id, &content).await?;

        info!(user = %actor.username, recipe = %recipe.slug, comment_id = comment.id, "Comment added");
        Ok(comment)
    }

    async fn delete(&self, actor: &Actor, comment_id: i32) -> Result<DeletedComment, CommentError> {
        let comment = self
            .store
            .get_comment(comment_id)
            .await?
            .ok_or_else(|| CommentError::NotFound(format!("Comment {comment_id} not found")))?;

        if let Err(denied) = ensure_can_modify(actor, &comment) {
            warn!(user = %actor.username, comment_id, "Refused comment deletion");
            return Err(denied.into());
        }

        let recipe_slug = self
            .store
            .get_recipe(comment.recipe_id)
            .await?
            .map(|recipe| recipe.slug)
            .unwrap_or_default();

        self.store.delete_comment(comment.id).await?;
        info!(user = %actor.username, comment_id, "Comment deleted");

        Ok(DeletedComment {
            comment,
            recipe_slug,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::test_support::{fast_security, temp_store};
    use crate::models::recipe::{Difficulty, RecipeInput, RecipeStatus};

    async fn setup(status: RecipeStatus) -> (Store, Actor, Actor, Actor) {
        let store = temp_store().await;
        let security = fast_security();
        let mut actors = Vec::new();
        for (name, staff) in [("alice", false), ("bob", false), ("admin", true)] {
            let user = store
                .create_user(name, &format!("{name}@example.com"), "password123", staff, &security)
                .await
                .unwrap();
            actors.push(Actor::from(user));
        }
        let input = RecipeInput {
            title: "Pasta".to_string(),
            description: "d".to_string(),
            ingredients: "i".to_string(),
            instructions: "s".to_string(),
            prep_time: 1,
            cook_time: 2,
            servings: 4,
            difficulty: Difficulty::Easy,
            status,
            category_id: None,
            country_id: None,
            image: None,
        };
        store.insert_recipe(actors[0].id, "pasta", input).await.unwrap().unwrap();
        let admin = actors.pop().unwrap();
        let bob = actors.pop().unwrap();
        let alice = actors.pop().unwrap();
        (store, alice, bob, admin)
    }

    fn form(content: &str) -> CommentForm {
        CommentForm {
            content: content.to_string(),
        }
    }

    #[tokio::test]
    async fn test_add_and_delete_own_comment() {
        let (store, _alice, bob, _admin) = setup(RecipeStatus::Published).await;
        let service = SeaOrmCommentService::new(store.clone());

        let comment = service.add(&bob, "pasta", &form("Delicious")).await.unwrap();
        assert!(comment.approved);
        assert_eq!(store.total_comments(comment.recipe_id).await.unwrap(), 1);

        let deleted = service.delete(&bob, comment.id).await.unwrap();
        assert_eq!(deleted.recipe_slug, "pasta");
        assert_eq!(store.total_comments(comment.recipe_id).await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_delete_others_comment() {
        let (store, alice, bob, admin) = setup(RecipeStatus::Published).await;
        let service = SeaOrmCommentService::new(store.clone());
        let comment = service.add(&bob, "pasta", &form("Mine")).await.unwrap();

        // The recipe author does not own other people's comments.
        assert!(matches!(
            service.delete(&alice, comment.id).await.unwrap_err(),
            CommentError::Forbidden
        ));
        assert!(store.get_comment(comment.id).await.unwrap().is_some());

        service.delete(&admin, comment.id).await.unwrap();
        assert!(store.get_comment(comment.id).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_invalid_content_is_not_stored() {
        let (store, _alice, bob, _admin) = setup(RecipeStatus::Published).await;
        let service = SeaOrmCommentService::new(store.clone());

        let err = service.add(&bob, "pasta", &form("   ")).await.unwrap_err();
        assert!(matches!(err, CommentError::Validation(_)));
        let err = service
            .add(&bob, "pasta", &form(&"x".repeat(501)))
            .await
            .unwrap_err();
        assert!(matches!(err, CommentError::Validation(_)));

        let recipe = store.get_recipe_by_slug("pasta").await.unwrap().unwrap();
        assert_eq!(store.total_comments(recipe.id).await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_draft_hidden_from_strangers() {
        let (store, alice, bob, _admin) = setup(RecipeStatus::Draft).await;
        let service = SeaOrmCommentService::new(store);

        assert!(matches!(
            service.add(&bob, "pasta", &form("Hi")).await.unwrap_err(),
            CommentError::NotFound(_)
        ));
        assert!(service.add(&alice, "pasta", &form("Note to self")).await.is_ok());
        assert!(matches!(
            service.delete(&bob, 9999).await.unwrap_err(),
            CommentError::NotFound(_)
        ));
    }
}
