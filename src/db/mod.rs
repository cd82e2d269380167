use anyhow::Result;
use sea_orm::{ConnectOptions, ConnectionTrait, Database, DatabaseConnection, Statement};
use std::collections::{HashMap, HashSet};
use std::path::Path;
use std::time::Duration;
use tracing::info;

use crate::config::SecurityConfig;
use crate::entities::{comments, recipes};
use crate::models::recipe::RecipeInput;

pub mod migrator;
pub mod repositories;

pub use repositories::comment::CommentRow;
pub use repositories::like::ToggleOutcome;
pub use repositories::recipe::{RecipeFilter, RecipePage, RecipeRow};
pub use repositories::taxonomy::{Taxon, TaxonomyKind};
pub use repositories::user::User;

#[derive(Clone)]
pub struct Store {
    pub conn: DatabaseConnection,
}

impl Store {
    pub async fn new(db_url: &str) -> Result<Self> {
        Self::with_pool_options(db_url, 5, 1).await
    }

    pub async fn with_pool_options(
        db_url: &str,
        max_connections: u32,
        min_connections: u32,
    ) -> Result<Self> {
        use sea_orm_migration::MigratorTrait;

        if !db_url.contains(":memory:") {
            let path_str = db_url.trim_start_matches("sqlite://").trim_start_matches("sqlite:");
            let path_str = path_str.split('?').next().unwrap_or(path_str);
            if let Some(parent) = Path::new(path_str).parent() {
                tokio::fs::create_dir_all(parent).await.ok();
            }
            if !Path::new(path_str).exists() {
                std::fs::File::create(path_str)?;
            }
        }

        let mut opt = ConnectOptions::new(db_url.to_string());
        opt.max_connections(max_connections)
            .min_connections(min_connections)
            .connect_timeout(Duration::from_secs(10))
            .acquire_timeout(Duration::from_secs(10))
            .idle_timeout(Duration::from_secs(300))
            .max_lifetime(Duration::from_secs(600))
            .sqlx_logging(false);

        let conn = Database::connect(opt).await?;

        migrator::Migrator::up(&conn, None).await?;

        info!(
            "Database connected & migrations applied (pool: {}-{})",
            min_connections, max_connections
        );

        Ok(Self { conn })
    }

    pub async fn ping(&self) -> Result<()> {
        let backend = self.conn.get_database_backend();
        self.conn
            .query_one(Statement::from_string(backend, "SELECT 1".to_string()))
            .await?;
        Ok(())
    }

    fn user_repo(&self) -> repositories::user::UserRepository {
        repositories::user::UserRepository::new(self.conn.clone())
    }

    fn recipe_repo(&self) -> repositories::recipe::RecipeRepository {
        repositories::recipe::RecipeRepository::new(self.conn.clone())
    }

    fn comment_repo(&self) -> repositories::comment::CommentRepository {
        repositories::comment::CommentRepository::new(self.conn.clone())
    }

    fn like_repo(&self) -> repositories::like::LikeRepository {
        repositories::like::LikeRepository::new(self.conn.clone())
    }

    fn taxonomy_repo(&self, kind: TaxonomyKind) -> repositories::taxonomy::TaxonomyRepository {
        repositories::taxonomy::TaxonomyRepository::new(self.conn.clone(), kind)
    }

    // Users

    pub async fn create_user(
        &self,
        username: &str,
        email: &str,
        password: &str,
        is_staff: bool,
        security: &SecurityConfig,
    ) -> Result<User> {
        self.user_repo()
            .create(username, email, password, is_staff, security)
            .await
    }

    /// Inserts the user unless the username is taken, in which case `None`.
    pub async fn create_user_if_absent(
        &self,
        username: &str,
        email: &str,
        password: &str,
        is_staff: bool,
        security: &SecurityConfig,
    ) -> Result<Option<User>> {
        self.user_repo()
            .create_if_absent(username, email, password, is_staff, security)
            .await
    }

    pub async fn get_user_by_username(&self, username: &str) -> Result<Option<User>> {
        self.user_repo().get_by_username(username).await
    }

    pub async fn get_user_by_id(&self, id: i32) -> Result<Option<User>> {
        self.user_repo().get_by_id(id).await
    }

    pub async fn user_exists(&self, username: &str) -> Result<bool> {
        self.user_repo().exists(username).await
    }

    pub async fn verify_user_password(&self, username: &str, password: &str) -> Result<Option<User>> {
        self.user_repo().verify_password(username, password).await
    }

    pub async fn delete_user(&self, id: i32) -> Result<bool> {
        self.user_repo().delete(id).await
    }

    // Categories & countries

    pub async fn list_taxa(&self, kind: TaxonomyKind) -> Result<Vec<Taxon>> {
        self.taxonomy_repo(kind).list().await
    }

    pub async fn get_taxon_by_slug(&self, kind: TaxonomyKind, slug: &str) -> Result<Option<Taxon>> {
        self.taxonomy_repo(kind).get_by_slug(slug).await
    }

    pub async fn get_taxon(&self, kind: TaxonomyKind, id: i32) -> Result<Option<Taxon>> {
        self.taxonomy_repo(kind).get_by_id(id).await
    }

    pub async fn create_taxon(
        &self,
        kind: TaxonomyKind,
        name: &str,
        slug: Option<&str>,
        description: &str,
    ) -> Result<Taxon> {
        self.taxonomy_repo(kind).create(name, slug, description).await
    }

    pub async fn get_or_create_taxon(
        &self,
        kind: TaxonomyKind,
        name: &str,
        description: &str,
    ) -> Result<(Taxon, bool)> {
        self.taxonomy_repo(kind).get_or_create(name, description).await
    }

    pub async fn delete_taxon(&self, kind: TaxonomyKind, id: i32) -> Result<bool> {
        self.taxonomy_repo(kind).delete(id).await
    }

    // Recipes

    pub async fn list_recipes(
        &self,
        filter: &RecipeFilter,
        page: u64,
        page_size: u64,
    ) -> Result<RecipePage> {
        self.recipe_repo().list(filter, page, page_size).await
    }

    pub async fn count_recipes(&self, filter: &RecipeFilter) -> Result<u64> {
        self.recipe_repo().count(filter).await
    }

    pub async fn get_recipe_by_slug(&self, slug: &str) -> Result<Option<recipes::Model>> {
        self.recipe_repo().get_by_slug(slug).await
    }

    pub async fn get_recipe(&self, id: i32) -> Result<Option<recipes::Model>> {
        self.recipe_repo().get_by_id(id).await
    }

    pub async fn get_recipe_row(&self, slug: &str) -> Result<Option<RecipeRow>> {
        self.recipe_repo().get_row_by_slug(slug).await
    }

    pub async fn recipe_slug_exists(&self, slug: &str) -> Result<bool> {
        self.recipe_repo().slug_exists(slug).await
    }

    pub async fn insert_recipe(
        &self,
        author_id: i32,
        slug: &str,
        input: RecipeInput,
    ) -> Result<Option<recipes::Model>> {
        self.recipe_repo().insert(author_id, slug, input).await
    }

    pub async fn update_recipe(
        &self,
        recipe: recipes::Model,
        input: RecipeInput,
    ) -> Result<recipes::Model> {
        self.recipe_repo().update(recipe, input).await
    }

    pub async fn delete_recipe(&self, id: i32) -> Result<bool> {
        self.recipe_repo().delete(id).await
    }

    // Comments

    pub async fn add_comment(
        &self,
        recipe_id: i32,
        user_id: i32,
        content: &str,
    ) -> Result<comments::Model> {
        self.comment_repo().add(recipe_id, user_id, content).await
    }

    pub async fn get_comment(&self, id: i32) -> Result<Option<comments::Model>> {
        self.comment_repo().get_by_id(id).await
    }

    pub async fn list_approved_comments(&self, recipe_id: i32) -> Result<Vec<CommentRow>> {
        self.comment_repo().list_approved(recipe_id).await
    }

    /// Number of approved comments on the recipe.
    pub async fn total_comments(&self, recipe_id: i32) -> Result<u64> {
        self.comment_repo().count_approved(recipe_id).await
    }

    pub async fn set_comment_approved(
        &self,
        comment: comments::Model,
        approved: bool,
    ) -> Result<comments::Model> {
        self.comment_repo().set_approved(comment, approved).await
    }

    pub async fn delete_comment(&self, id: i32) -> Result<bool> {
        self.comment_repo().delete(id).await
    }

    // Likes

    pub async fn toggle_like(&self, recipe_id: i32, user_id: i32) -> Result<ToggleOutcome> {
        self.like_repo().toggle(recipe_id, user_id).await
    }

    pub async fn insert_like_if_absent(&self, recipe_id: i32, user_id: i32) -> Result<bool> {
        self.like_repo().insert_if_absent(recipe_id, user_id).await
    }

    pub async fn has_liked(&self, recipe_id: i32, user_id: i32) -> Result<bool> {
        self.like_repo().exists(recipe_id, user_id).await
    }

    /// Number of likes on the recipe.
    pub async fn total_likes(&self, recipe_id: i32) -> Result<u64> {
        self.like_repo().count_for_recipe(recipe_id).await
    }

    pub async fn like_counts(&self, recipe_ids: &[i32]) -> Result<HashMap<i32, u64>> {
        self.like_repo().counts_for_recipes(recipe_ids).await
    }

    pub async fn liked_among(&self, user_id: i32, recipe_ids: &[i32]) -> Result<HashSet<i32>> {
        self.like_repo().liked_among(user_id, recipe_ids).await
    }
}

#[cfg(test)]
pub(crate) mod test_support {
    use super::*;

    pub async fn temp_store() -> Store {
        let path = std::env::temp_dir().join(format!("larder-unit-{}.db", uuid::Uuid::new_v4()));
        Store::new(&format!("sqlite:{}", path.display()))
            .await
            .expect("failed to open temp store")
    }

    pub fn fast_security() -> SecurityConfig {
        SecurityConfig {
            argon2_memory_cost_kib: 1024,
            argon2_time_cost: 1,
            argon2_parallelism: 1,
        }
    }
}
