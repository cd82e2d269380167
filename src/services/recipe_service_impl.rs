//! `SeaORM` implementation of the `RecipeService` trait.

use async_trait::async_trait;
use std::collections::HashSet;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{info, warn};

use super::forms::{FieldErrors, INVALID_CHOICE, RecipeForm};
use super::permissions::{Actor, can_modify, can_view, ensure_can_modify};
use super::recipe_service::{RecipeError, RecipeService};
use crate::api::types::{
    CommentDto, FormChoices, Pagination, ProfileDto, RecipeDetailDto, RecipeFormPage,
    RecipeListing, RecipeSummaryDto,
};
use crate::config::Config;
use crate::db::{RecipeFilter, Store, Taxon, TaxonomyKind};
use crate::entities::recipes;
use crate::models::recipe::RecipeInput;
use crate::models::text::slugify;

const DUPLICATE_TITLE: &str = "A recipe with this title already exists.";

pub struct SeaOrmRecipeService {
    store: Store,
    config: Arc<RwLock<Config>>,
}

impl SeaOrmRecipeService {
    #[must_use]
    pub const fn new(store: Store, config: Arc<RwLock<Config>>) -> Self {
        Self { store, config }
    }

    async fn page_size(&self) -> u64 {
        self.config.read().await.listing.page_size
    }

    async fn navigation(&self) -> Result<(Vec<Taxon>, Vec<Taxon>), RecipeError> {
        let categories = self.store.list_taxa(TaxonomyKind::Category).await?;
        let countries = self.store.list_taxa(TaxonomyKind::Country).await?;
        Ok((categories, countries))
    }

    /// Runs one page of `filter` and annotates it for `viewer` with two
    /// batched queries: like counts and the viewer's liked ids.
    async fn listing(
        &self,
        viewer: Option<&Actor>,
        filter: RecipeFilter,
        page: u64,
        heading: String,
        query: Option<String>,
    ) -> Result<RecipeListing, RecipeError> {
        let page_size = self.page_size().await;
        let result = self.store.list_recipes(&filter, page, page_size).await?;

        let ids: Vec<i32> = result.items.iter().map(|row| row.recipe.id).collect();
        let counts = self.store.like_counts(&ids).await?;
        let liked = match viewer {
            Some(actor) => self.store.liked_among(actor.id, &ids).await?,
            None => HashSet::new(),
        };
        let liked_recipe_ids = ids.iter().copied().filter(|id| liked.contains(id)).collect();

        let recipes = result
            .items
            .into_iter()
            .map(|row| {
                let like_count = counts.get(&row.recipe.id).copied().unwrap_or(0);
                RecipeSummaryDto::from_row(row, like_count)
            })
            .collect();

        let (categories, countries) = self.navigation().await?;

        Ok(RecipeListing {
            heading,
            query,
            recipes,
            liked_recipe_ids,
            pagination: Pagination::new(page, page_size, result.total_items, result.total_pages),
            categories,
            countries,
        })
    }

    async fn taxon_by_slug(&self, kind: TaxonomyKind, slug: &str) -> Result<Taxon, RecipeError> {
        self.store
            .get_taxon_by_slug(kind, slug)
            .await?
            .ok_or_else(|| RecipeError::NotFound(format!("{} '{slug}' not found", kind.label())))
    }

    async fn recipe_by_slug(&self, slug: &str) -> Result<recipes::Model, RecipeError> {
        self.store
            .get_recipe_by_slug(slug)
            .await?
            .ok_or_else(|| RecipeError::NotFound(format!("Recipe '{slug}' not found")))
    }

    /// Field validation plus the checks that need the database.
    async fn validate(&self, form: &RecipeForm) -> Result<RecipeInput, RecipeError> {
        let parsed = form.validate();
        let mut errors = parsed.as_ref().err().cloned().unwrap_or_default();

        for (field, kind, raw) in [
            ("category", TaxonomyKind::Category, &form.category),
            ("country", TaxonomyKind::Country, &form.country),
        ] {
            if errors.contains(field) {
                continue;
            }
            if let Ok(id) = raw.trim().parse::<i32>()
                && self.store.get_taxon(kind, id).await?.is_none()
            {
                errors.add(field, INVALID_CHOICE);
            }
        }

        match parsed {
            Ok(input) if errors.is_empty() => Ok(input),
            _ => Err(RecipeError::Validation(errors)),
        }
    }

    async fn editable(&self, actor: &Actor, slug: &str) -> Result<recipes::Model, RecipeError> {
        let recipe = self.recipe_by_slug(slug).await?;
        if let Err(denied) = ensure_can_modify(actor, &recipe) {
            warn!(user = %actor.username, recipe = %recipe.slug, "Refused change to recipe");
            return Err(denied.into());
        }
        Ok(recipe)
    }
}

#[async_trait]
impl RecipeService for SeaOrmRecipeService {
    async fn list_published(
        &self,
        viewer: Option<&Actor>,
        page: u64,
    ) -> Result<RecipeListing, RecipeError> {
        self.listing(viewer, RecipeFilter::Published, page, "Latest Recipes".to_string(), None)
            .await
    }

    async fn list_by_category(
        &self,
        viewer: Option<&Actor>,
        slug: &str,
        page: u64,
    ) -> Result<RecipeListing, RecipeError> {
        let category = self.taxon_by_slug(TaxonomyKind::Category, slug).await?;
        self.listing(viewer, RecipeFilter::Category(category.id), page, category.name, None)
            .await
    }

    async fn list_by_country(
        &self,
        viewer: Option<&Actor>,
        slug: &str,
        page: u64,
    ) -> Result<RecipeListing, RecipeError> {
        let country = self.taxon_by_slug(TaxonomyKind::Country, slug).await?;
        self.listing(viewer, RecipeFilter::Country(country.id), page, country.name, None)
            .await
    }

    async fn search(
        &self,
        viewer: Option<&Actor>,
        query: &str,
        page: u64,
    ) -> Result<RecipeListing, RecipeError> {
        let query = query.trim();
        let heading = format!("Search results for \"{query}\"");

        if query.is_empty() {
            let page_size = self.page_size().await;
            let (categories, countries) = self.navigation().await?;
            return Ok(RecipeListing {
                heading: "Search".to_string(),
                query: Some(String::new()),
                recipes: Vec::new(),
                liked_recipe_ids: Vec::new(),
                pagination: Pagination::new(page, page_size, 0, 0),
                categories,
                countries,
            });
        }

        self.listing(
            viewer,
            RecipeFilter::Search(query.to_string()),
            page,
            heading,
            Some(query.to_string()),
        )
        .await
    }

    async fn list_favorites(
        &self,
        actor: &Actor,
        page: u64,
    ) -> Result<RecipeListing, RecipeError> {
        self.listing(
            Some(actor),
            RecipeFilter::LikedBy(actor.id),
            page,
            "My Favorites".to_string(),
            None,
        )
        .await
    }

    async fn profile(
        &self,
        viewer: Option<&Actor>,
        username: &str,
        page: u64,
    ) -> Result<ProfileDto, RecipeError> {
        let user = self
            .store
            .get_user_by_username(username)
            .await?
            .ok_or_else(|| RecipeError::NotFound(format!("User '{username}' not found")))?;

        let listing = self
            .listing(
                viewer,
                RecipeFilter::Author(user.id),
                page,
                format!("Recipes by {}", user.username),
                None,
            )
            .await?;

        Ok(ProfileDto {
            username: user.username,
            joined: user.created_at,
            total_recipes: listing.pagination.total_items,
            listing,
        })
    }

    async fn detail(
        &self,
        viewer: Option<&Actor>,
        slug: &str,
    ) -> Result<RecipeDetailDto, RecipeError> {
        let not_found = || RecipeError::NotFound(format!("Recipe '{slug}' not found"));
        let row = self.store.get_recipe_row(slug).await?.ok_or_else(not_found)?;
        if !can_view(viewer, &row.recipe) {
            return Err(not_found());
        }

        let recipe_id = row.recipe.id;
        let total_likes = self.store.total_likes(recipe_id).await?;
        let total_comments = self.store.total_comments(recipe_id).await?;
        let user_has_liked = match viewer {
            Some(actor) => self.store.has_liked(recipe_id, actor.id).await?,
            None => false,
        };
        let can_edit = viewer.is_some_and(|actor| can_modify(actor, &row.recipe));

        let comments = self
            .store
            .list_approved_comments(recipe_id)
            .await?
            .into_iter()
            .map(|c| {
                let can_delete = viewer.is_some_and(|actor| can_modify(actor, &c.comment));
                CommentDto::from_row(c, can_delete)
            })
            .collect();

        let ingredients = row.recipe.ingredients.clone();
        let instructions = row.recipe.instructions.clone();
        let updated_at = row.recipe.updated_at.clone();

        Ok(RecipeDetailDto {
            summary: RecipeSummaryDto::from_row(row, total_likes),
            ingredients,
            instructions,
            updated_at,
            comments,
            total_likes,
            total_comments,
            user_has_liked,
            can_modify: can_edit,
        })
    }

    async fn form_choices(&self) -> Result<FormChoices, RecipeError> {
        let (categories, countries) = self.navigation().await?;
        Ok(FormChoices::new(categories, countries))
    }

    async fn create(
        &self,
        actor: &Actor,
        form: &RecipeForm,
    ) -> Result<recipes::Model, RecipeError> {
        let input = self.validate(form).await?;

        let slug = slugify(&input.title);
        if self.store.recipe_slug_exists(&slug).await? {
            return Err(RecipeError::Validation(FieldErrors::single("title", DUPLICATE_TITLE)));
        }

        let recipe = self
            .store
            .insert_recipe(actor.id, &slug, input)
            .await?
            .ok_or_else(|| RecipeError::Validation(FieldErrors::single("title", DUPLICATE_TITLE)))?;

        info!(
            user = %actor.username,
            recipe = %recipe.slug,
            status = %recipe.status,
            "Recipe created"
        );
        Ok(recipe)
    }

    async fn edit_form(&self, actor: &Actor, slug: &str) -> Result<RecipeFormPage, RecipeError> {
        let recipe = self.editable(actor, slug).await?;
        Ok(RecipeFormPage {
            slug: Some(recipe.slug.clone()),
            form: RecipeForm::from_model(&recipe),
            choices: self.form_choices().await?,
        })
    }

    async fn update(
        &self,
        actor: &Actor,
        slug: &str,
        form: &RecipeForm,
    ) -> Result<recipes::Model, RecipeError> {
        let recipe = self.editable(actor, slug).await?;
        let input = self.validate(form).await?;
        let updated = self.store.update_recipe(recipe, input).await?;
        info!(user = %actor.username, recipe = %updated.slug, "Recipe updated");
        Ok(updated)
    }

    async fn delete(&self, actor: &Actor, slug: &str) -> Result<recipes::Model, RecipeError> {
        let recipe = self.editable(actor, slug).await?;
        self.store.delete_recipe(recipe.id).await?;
        info!(user = %actor.username, recipe = %recipe.slug, "Recipe deleted");
        Ok(recipe)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::test_support::{fast_security, temp_store};
    use crate::models::recipe::RecipeStatus;

    async fn setup() -> (Store, SeaOrmRecipeService, Actor, Actor) {
        let store = temp_store().await;
        let security = fast_security();
        let alice = store
            .create_user("alice", "alice@example.com", "password123", false, &security)
            .await
            .unwrap();
        let bob = store
            .create_user("bob", "bob@example.com", "password123", false, &security)
            .await
            .unwrap();
        let service =
            SeaOrmRecipeService::new(store.clone(), Arc::new(RwLock::new(Config::default())));
        (store, service, Actor::from(alice), Actor::from(bob))
    }

    fn form(title: &str, status: RecipeStatus) -> RecipeForm {
        RecipeForm {
            title: title.to_string(),
            description: "Creamy Italian pasta".to_string(),
            ingredients: "Pasta\nEggs\nGuanciale".to_string(),
            instructions: "Boil. Toss.".to_string(),
            prep_time: "10".to_string(),
            cook_time: "15".to_string(),
            status: status.to_string(),
            ..RecipeForm::default()
        }
    }

    #[tokio::test]
    async fn test_create_derives_slug_and_author() {
        let (_store, service, alice, _bob) = setup().await;
        let recipe = service
            .create(&alice, &form("Pasta Carbonara", RecipeStatus::Published))
            .await
            .unwrap();
        assert_eq!(recipe.slug, "pasta-carbonara");
        assert_eq!(recipe.author_id, alice.id);
        assert_eq!(recipe.servings, 4);
        assert_eq!(recipe.total_time(), 25);
    }

    #[tokio::test]
    async fn test_duplicate_title_is_a_field_error() {
        let (_store, service, alice, bob) = setup().await;
        service
            .create(&alice, &form("Pasta Carbonara", RecipeStatus::Published))
            .await
            .unwrap();
        let err = service
            .create(&bob, &form("pasta carbonara!", RecipeStatus::Draft))
            .await
            .unwrap_err();
        match err {
            RecipeError::Validation(fields) => assert!(fields.contains("title")),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_unknown_category_id_is_rejected() {
        let (store, service, alice, _bob) = setup().await;
        let mut bad = form("Soup", RecipeStatus::Published);
        bad.category = "999".to_string();
        bad.title = String::new();
        let err = service.create(&alice, &bad).await.unwrap_err();
        match err {
            RecipeError::Validation(fields) => {
                assert!(fields.contains("category"));
                assert!(fields.contains("title"));
            }
            other => panic!("unexpected error: {other:?}"),
        }
        assert_eq!(store.count_recipes(&RecipeFilter::Published).await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_update_by_stranger_is_forbidden_and_unchanged() {
        let (store, service, alice, bob) = setup().await;
        service
            .create(&alice, &form("Pasta", RecipeStatus::Published))
            .await
            .unwrap();

        let mut edited = form("Hijacked", RecipeStatus::Published);
        edited.description = "Bob was here".to_string();
        let err = service.update(&bob, "pasta", &edited).await.unwrap_err();
        assert!(matches!(err, RecipeError::Forbidden));
        assert!(matches!(
            service.delete(&bob, "pasta").await.unwrap_err(),
            RecipeError::Forbidden
        ));

        let stored = store.get_recipe_by_slug("pasta").await.unwrap().unwrap();
        assert_eq!(stored.title, "Pasta");
        assert_eq!(stored.description, "Creamy Italian pasta");
    }

    #[tokio::test]
    async fn test_update_keeps_slug_and_can_unpublish() {
        let (store, service, alice, _bob) = setup().await;
        service
            .create(&alice, &form("Pasta", RecipeStatus::Published))
            .await
            .unwrap();

        let updated = service
            .update(&alice, "pasta", &form("Better Pasta", RecipeStatus::Draft))
            .await
            .unwrap();
        assert_eq!(updated.slug, "pasta");
        assert_eq!(updated.title, "Better Pasta");
        assert_eq!(updated.status, RecipeStatus::Draft);
        assert_eq!(store.count_recipes(&RecipeFilter::Published).await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_search_and_drafts() {
        let (_store, service, alice, bob) = setup().await;
        service
            .create(&alice, &form("Pasta Carbonara", RecipeStatus::Published))
            .await
            .unwrap();
        service
            .create(&alice, &form("Secret Pasta", RecipeStatus::Draft))
            .await
            .unwrap();

        let found = service.search(None, "  PASTA ", 1).await.unwrap();
        assert_eq!(found.recipes.len(), 1);
        assert_eq!(found.recipes[0].title, "Pasta Carbonara");
        assert_eq!(found.query.as_deref(), Some("PASTA"));

        assert!(service.search(None, "nonexistent", 1).await.unwrap().recipes.is_empty());
        assert!(service.search(None, "   ", 1).await.unwrap().recipes.is_empty());

        assert!(matches!(
            service.detail(Some(&bob), "secret-pasta").await.unwrap_err(),
            RecipeError::NotFound(_)
        ));
        assert!(service.detail(Some(&alice), "secret-pasta").await.is_ok());
    }

    #[tokio::test]
    async fn test_listing_annotates_likes_once_per_page() {
        let (store, service, alice, bob) = setup().await;
        let first = service
            .create(&alice, &form("First", RecipeStatus::Published))
            .await
            .unwrap();
        service
            .create(&alice, &form("Second", RecipeStatus::Published))
            .await
            .unwrap();
        store.toggle_like(first.id, bob.id).await.unwrap();

        let listing = service.list_published(Some(&bob), 1).await.unwrap();
        assert_eq!(listing.liked_recipe_ids, vec![first.id]);
        assert_eq!(listing.pagination.total_items, 2);
        let liked_row = listing.recipes.iter().find(|r| r.id == first.id).unwrap();
        assert_eq!(liked_row.like_count, 1);

        let anonymous = service.list_published(None, 1).await.unwrap();
        assert!(anonymous.liked_recipe_ids.is_empty());

        let favorites = service.list_favorites(&bob, 1).await.unwrap();
        assert_eq!(favorites.recipes.len(), 1);
        assert_eq!(favorites.recipes[0].slug, "first");
    }

    #[tokio::test]
    async fn test_unknown_category_and_profile_are_not_found() {
        let (_store, service, _alice, _bob) = setup().await;
        assert!(matches!(
            service.list_by_category(None, "nope", 1).await.unwrap_err(),
            RecipeError::NotFound(_)
        ));
        assert!(matches!(
            service.profile(None, "ghost", 1).await.unwrap_err(),
            RecipeError::NotFound(_)
        ));
    }
}
