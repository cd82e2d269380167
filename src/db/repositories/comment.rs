use anyhow::{Context, Result};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter,
    QueryOrder, Set,
};

use crate::entities::{comments, prelude::*, users};

/// An approved comment with its author's username, newest first on a recipe page.
#[derive(Debug, Clone)]
pub struct CommentRow {
    pub comment: comments::Model,
    pub username: String,
}

pub struct CommentRepository {
    conn: DatabaseConnection,
}

impl CommentRepository {
    #[must_use]
    pub const fn new(conn: DatabaseConnection) -> Self {
        Self { conn }
    }

    pub async fn add(&self, recipe_id: i32, user_id: i32, content: &str) -> Result<comments::Model> {
        let now = chrono::Utc::now().to_rfc3339();
        let active = comments::ActiveModel {
            recipe_id: Set(recipe_id),
            user_id: Set(user_id),
            content: Set(content.to_string()),
            approved: Set(true),
            created_at: Set(now.clone()),
            updated_at: Set(now),
            ..Default::default()
        };

        let model = Comments::insert(active)
            .exec_with_returning(&self.conn)
            .await
            .context("Failed to insert comment")?;
        Ok(model)
    }

    pub async fn get_by_id(&self, id: i32) -> Result<Option<comments::Model>> {
        let comment = Comments::find_by_id(id)
            .one(&self.conn)
            .await
            .context("Failed to query comment by ID")?;
        Ok(comment)
    }

    pub async fn list_approved(&self, recipe_id: i32) -> Result<Vec<CommentRow>> {
        let rows = Comments::find()
            .find_also_related(Users)
            .filter(comments::Column::RecipeId.eq(recipe_id))
            .filter(comments::Column::Approved.eq(true))
            .order_by_desc(comments::Column::CreatedAt)
            .order_by_desc(comments::Column::Id)
            .all(&self.conn)
            .await
            .context("Failed to list comments")?;

        Ok(rows
            .into_iter()
            .map(|(comment, user): (comments::Model, Option<users::Model>)| CommentRow {
                comment,
                username: user.map(|u| u.username).unwrap_or_default(),
            })
            .collect())
    }

    pub async fn count_approved(&self, recipe_id: i32) -> Result<u64> {
        let count = Comments::find()
            .filter(comments::Column::RecipeId.eq(recipe_id))
            .filter(comments::Column::Approved.eq(true))
            .count(&self.conn)
            .await?;
        Ok(count)
    }

    /// Moderation switch; unapproved comments stay stored but hidden.
    pub async fn set_approved(&self, comment: comments::Model, approved: bool) -> Result<comments::Model> {
        let mut active: comments::ActiveModel = comment.into();
        active.approved = Set(approved);
        active.updated_at = Set(chrono::Utc::now().to_rfc3339());
        Ok(active.update(&self.conn).await?)
    }

    pub async fn delete(&self, id: i32) -> Result<bool> {
        let result = Comments::delete_by_id(id)
            .exec(&self.conn)
            .await
            .context("Failed to delete comment")?;
        Ok(result.rows_affected > 0)
    }
}
