use anyhow::{Context, Result};
use sea_orm::sea_query::{Expr, LikeExpr, Query};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, DatabaseConnection, EntityTrait, PaginatorTrait,
    QueryFilter, QueryOrder, Select, Set, SqlErr,
};
use std::collections::HashMap;

use super::taxonomy::Taxon;
use crate::entities::{categories, countries, likes, prelude::*, recipes, users};
use crate::models::recipe::{RecipeInput, RecipeStatus};
use crate::models::text::{LIKE_ESCAPE, contains_pattern};

/// Which published recipes a listing shows.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecipeFilter {
    Published,
    Category(i32),
    Country(i32),
    Author(i32),
    /// Case-insensitive literal substring over title, ingredients and description.
    Search(String),
    LikedBy(i32),
}

/// A recipe together with the names a listing displays next to it.
#[derive(Debug, Clone)]
pub struct RecipeRow {
    pub recipe: recipes::Model,
    pub author: String,
    pub category: Option<Taxon>,
    pub country: Option<Taxon>,
}

#[derive(Debug, Clone)]
pub struct RecipePage {
    pub items: Vec<RecipeRow>,
    pub total_items: u64,
    pub total_pages: u64,
}

pub struct RecipeRepository {
    conn: DatabaseConnection,
}

impl RecipeRepository {
    #[must_use]
    pub const fn new(conn: DatabaseConnection) -> Self {
        Self { conn }
    }

    fn filtered(filter: &RecipeFilter) -> Select<Recipes> {
        let query = Recipes::find().filter(recipes::Column::Status.eq(RecipeStatus::Published));

        let query = match filter {
            RecipeFilter::Published => query,
            RecipeFilter::Category(id) => query.filter(recipes::Column::CategoryId.eq(*id)),
            RecipeFilter::Country(id) => query.filter(recipes::Column::CountryId.eq(*id)),
            RecipeFilter::Author(id) => query.filter(recipes::Column::AuthorId.eq(*id)),
            RecipeFilter::Search(term) => {
                let pattern = contains_pattern(term);
                let matches = |col: recipes::Column| {
                    Expr::col((Recipes, col))
                        .like(LikeExpr::new(pattern.clone()).escape(LIKE_ESCAPE))
                };
                query.filter(
                    Condition::any()
                        .add(matches(recipes::Column::Title))
                        .add(matches(recipes::Column::Ingredients))
                        .add(matches(recipes::Column::Description)),
                )
            }
            RecipeFilter::LikedBy(user_id) => query.filter(
                recipes::Column::Id.in_subquery(
                    Query::select()
                        .column(likes::Column::RecipeId)
                        .from(Likes)
                        .and_where(Expr::col(likes::Column::UserId).eq(*user_id))
                        .to_owned(),
                ),
            ),
        };

        query
            .order_by_desc(recipes::Column::CreatedAt)
            .order_by_desc(recipes::Column::Id)
    }

    /// Fetches one page (1-based) of published recipes. Pages past the last
    /// one come back empty without querying rows.
    pub async fn list(&self, filter: &RecipeFilter, page: u64, page_size: u64) -> Result<RecipePage> {
        let paginator = Self::filtered(filter).paginate(&self.conn, page_size);
        let totals = paginator
            .num_items_and_pages()
            .await
            .context("Failed to count recipes")?;

        let models = if page == 0 || page > totals.number_of_pages {
            Vec::new()
        } else {
            paginator
                .fetch_page(page - 1)
                .await
                .context("Failed to fetch recipe page")?
        };

        Ok(RecipePage {
            items: self.hydrate(models).await?,
            total_items: totals.number_of_items,
            total_pages: totals.number_of_pages,
        })
    }

    pub async fn count(&self, filter: &RecipeFilter) -> Result<u64> {
        let total = Self::filtered(filter)
            .count(&self.conn)
            .await
            .context("Failed to count recipes")?;
        Ok(total)
    }

    pub async fn get_by_slug(&self, slug: &str) -> Result<Option<recipes::Model>> {
        let recipe = Recipes::find()
            .filter(recipes::Column::Slug.eq(slug))
            .one(&self.conn)
            .await
            .context("Failed to query recipe by slug")?;
        Ok(recipe)
    }

    pub async fn get_by_id(&self, id: i32) -> Result<Option<recipes::Model>> {
        let recipe = Recipes::find_by_id(id)
            .one(&self.conn)
            .await
            .context("Failed to query recipe by ID")?;
        Ok(recipe)
    }

    pub async fn get_row_by_slug(&self, slug: &str) -> Result<Option<RecipeRow>> {
        let Some(recipe) = self.get_by_slug(slug).await? else {
            return Ok(None);
        };
        Ok(self.hydrate(vec![recipe]).await?.pop())
    }

    pub async fn slug_exists(&self, slug: &str) -> Result<bool> {
        Ok(self.get_by_slug(slug).await?.is_some())
    }

    /// Inserts the recipe. Returns `None` when the slug is already taken.
    pub async fn insert(
        &self,
        author_id: i32,
        slug: &str,
        input: RecipeInput,
    ) -> Result<Option<recipes::Model>> {
        let now = chrono::Utc::now().to_rfc3339();
        let active = recipes::ActiveModel {
            title: Set(input.title),
            slug: Set(slug.to_string()),
            description: Set(input.description),
            ingredients: Set(input.ingredients),
            instructions: Set(input.instructions),
            prep_time: Set(input.prep_time),
            cook_time: Set(input.cook_time),
            servings: Set(input.servings),
            difficulty: Set(input.difficulty),
            status: Set(input.status),
            image: Set(input.image),
            author_id: Set(author_id),
            category_id: Set(input.category_id),
            country_id: Set(input.country_id),
            created_at: Set(now.clone()),
            updated_at: Set(now),
            ..Default::default()
        };

        match Recipes::insert(active).exec_with_returning(&self.conn).await {
            Ok(model) => Ok(Some(model)),
            Err(e) if matches!(e.sql_err(), Some(SqlErr::UniqueConstraintViolation(_))) => Ok(None),
            Err(e) => Err(e).context("Failed to insert recipe"),
        }
    }

    /// Overwrites every editable field. The slug is left as it was.
    pub async fn update(&self, recipe: recipes::Model, input: RecipeInput) -> Result<recipes::Model> {
        let mut active: recipes::ActiveModel = recipe.into();
        active.title = Set(input.title);
        active.description = Set(input.description);
        active.ingredients = Set(input.ingredients);
        active.instructions = Set(input.instructions);
        active.prep_time = Set(input.prep_time);
        active.cook_time = Set(input.cook_time);
        active.servings = Set(input.servings);
        active.difficulty = Set(input.difficulty);
        active.status = Set(input.status);
        active.image = Set(input.image);
        active.category_id = Set(input.category_id);
        active.country_id = Set(input.country_id);
        active.updated_at = Set(chrono::Utc::now().to_rfc3339());

        let updated = active
            .update(&self.conn)
            .await
            .context("Failed to update recipe")?;
        Ok(updated)
    }

    pub async fn delete(&self, id: i32) -> Result<bool> {
        let result = Recipes::delete_by_id(id)
            .exec(&self.conn)
            .await
            .context("Failed to delete recipe")?;
        Ok(result.rows_affected > 0)
    }

    /// Attaches author, category and country with one query per table.
    async fn hydrate(&self, models: Vec<recipes::Model>) -> Result<Vec<RecipeRow>> {
        if models.is_empty() {
            return Ok(Vec::new());
        }

        let author_ids: Vec<i32> = models.iter().map(|r| r.author_id).collect();
        let category_ids: Vec<i32> = models.iter().filter_map(|r| r.category_id).collect();
        let country_ids: Vec<i32> = models.iter().filter_map(|r| r.country_id).collect();

        let authors: HashMap<i32, String> = Users::find()
            .filter(users::Column::Id.is_in(author_ids))
            .all(&self.conn)
            .await?
            .into_iter()
            .map(|u| (u.id, u.username))
            .collect();

        let categories: HashMap<i32, Taxon> = if category_ids.is_empty() {
            HashMap::new()
        } else {
            Categories::find()
                .filter(categories::Column::Id.is_in(category_ids))
                .all(&self.conn)
                .await?
                .into_iter()
                .map(|c| (c.id, Taxon::from(c)))
                .collect()
        };

        let countries: HashMap<i32, Taxon> = if country_ids.is_empty() {
            HashMap::new()
        } else {
            Countries::find()
                .filter(countries::Column::Id.is_in(country_ids))
                .all(&self.conn)
                .await?
                .into_iter()
                .map(|c| (c.id, Taxon::from(c)))
                .collect()
        };

        Ok(models
            .into_iter()
            .map(|recipe| RecipeRow {
                author: authors.get(&recipe.author_id).cloned().unwrap_or_default(),
                category: recipe.category_id.and_then(|id| categories.get(&id).cloned()),
                country: recipe.country_id.and_then(|id| countries.get(&id).cloned()),
                recipe,
            })
            .collect())
    }
}
