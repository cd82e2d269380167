use anyhow::{Context, Result};
use sea_orm::sea_query::OnConflict;
use sea_orm::{
    ColumnTrait, ConnectionTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter,
    QuerySelect, Set, TransactionTrait,
};
use std::collections::{HashMap, HashSet};

use crate::entities::{likes, prelude::*};

/// Outcome of a toggle: whether the pair is now liked and the recipe's new total.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ToggleOutcome {
    pub liked: bool,
    pub total_likes: u64,
}

pub struct LikeRepository {
    conn: DatabaseConnection,
}

impl LikeRepository {
    #[must_use]
    pub const fn new(conn: DatabaseConnection) -> Self {
        Self { conn }
    }

    /// Deletes the (recipe, user) like if present, otherwise creates it.
    ///
    /// Runs in one transaction. The insert uses `ON CONFLICT DO NOTHING`
    /// against `idx_likes_recipe_user`, so a concurrent toggle that already
    /// inserted the pair leaves a single row and this call still reports
    /// `liked = true`.
    pub async fn toggle(&self, recipe_id: i32, user_id: i32) -> Result<ToggleOutcome> {
        let txn = self.conn.begin().await.context("Failed to begin transaction")?;

        let deleted = Likes::delete_many()
            .filter(likes::Column::RecipeId.eq(recipe_id))
            .filter(likes::Column::UserId.eq(user_id))
            .exec(&txn)
            .await?
            .rows_affected;

        let liked = if deleted > 0 {
            false
        } else {
            Self::insert_if_absent_on(&txn, recipe_id, user_id).await?;
            true
        };

        let total_likes = Likes::find()
            .filter(likes::Column::RecipeId.eq(recipe_id))
            .count(&txn)
            .await?;

        txn.commit().await.context("Failed to commit like toggle")?;

        Ok(ToggleOutcome { liked, total_likes })
    }

    /// Creates the like unless the pair already exists. Returns true when a
    /// row was inserted.
    pub async fn insert_if_absent(&self, recipe_id: i32, user_id: i32) -> Result<bool> {
        Self::insert_if_absent_on(&self.conn, recipe_id, user_id).await
    }

    async fn insert_if_absent_on<C: ConnectionTrait>(
        conn: &C,
        recipe_id: i32,
        user_id: i32,
    ) -> Result<bool> {
        let active = likes::ActiveModel {
            recipe_id: Set(recipe_id),
            user_id: Set(user_id),
            created_at: Set(chrono::Utc::now().to_rfc3339()),
            ..Default::default()
        };

        let inserted = Likes::insert(active)
            .on_conflict(
                OnConflict::columns([likes::Column::RecipeId, likes::Column::UserId])
                    .do_nothing()
                    .to_owned(),
            )
            .exec_without_returning(conn)
            .await
            .context("Failed to insert like")?;

        Ok(inserted > 0)
    }

    pub async fn exists(&self, recipe_id: i32, user_id: i32) -> Result<bool> {
        let count = Likes::find()
            .filter(likes::Column::RecipeId.eq(recipe_id))
            .filter(likes::Column::UserId.eq(user_id))
            .count(&self.conn)
            .await?;
        Ok(count > 0)
    }

    pub async fn count_for_recipe(&self, recipe_id: i32) -> Result<u64> {
        let count = Likes::find()
            .filter(likes::Column::RecipeId.eq(recipe_id))
            .count(&self.conn)
            .await?;
        Ok(count)
    }

    pub async fn counts_for_recipes(&self, recipe_ids: &[i32]) -> Result<HashMap<i32, u64>> {
        if recipe_ids.is_empty() {
            return Ok(HashMap::new());
        }

        let results: Vec<(i32, i64)> = Likes::find()
            .select_only()
            .column(likes::Column::RecipeId)
            .column_as(likes::Column::Id.count(), "count")
            .filter(likes::Column::RecipeId.is_in(recipe_ids.to_vec()))
            .group_by(likes::Column::RecipeId)
            .into_tuple()
            .all(&self.conn)
            .await?;

        Ok(results
            .into_iter()
            .map(|(id, count)| (id, u64::try_from(count).unwrap_or(0)))
            .collect())
    }

    /// The subset of `recipe_ids` this user has liked.
    pub async fn liked_among(&self, user_id: i32, recipe_ids: &[i32]) -> Result<HashSet<i32>> {
        if recipe_ids.is_empty() {
            return Ok(HashSet::new());
        }

        let ids: Vec<i32> = Likes::find()
            .select_only()
            .column(likes::Column::RecipeId)
            .filter(likes::Column::UserId.eq(user_id))
            .filter(likes::Column::RecipeId.is_in(recipe_ids.to_vec()))
            .into_tuple()
            .all(&self.conn)
            .await?;

        Ok(ids.into_iter().collect())
    }
}
