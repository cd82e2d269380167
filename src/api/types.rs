use serde::Serialize;

use super::flash::FlashMessage;
use crate::db::{CommentRow, RecipeRow, Taxon};
use crate::models::recipe::{Difficulty, RecipeStatus};
use crate::services::forms::RecipeForm;

#[derive(Debug, Serialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl<T> ApiResponse<T> {
    pub const fn success(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(message.into()),
        }
    }
}

/// Page data plus the flash messages drained for this request.
#[derive(Debug, Serialize)]
pub struct Page<T> {
    #[serde(flatten)]
    pub content: T,
    pub messages: Vec<FlashMessage>,
}

#[derive(Debug, Serialize)]
pub struct RecipeSummaryDto {
    pub id: i32,
    pub title: String,
    pub slug: String,
    pub description: String,
    pub author: String,
    pub category: Option<Taxon>,
    pub country: Option<Taxon>,
    pub prep_time: i32,
    pub cook_time: i32,
    pub total_time: i32,
    pub servings: i32,
    pub difficulty: Difficulty,
    pub status: RecipeStatus,
    pub image: Option<String>,
    pub like_count: u64,
    pub created_at: String,
}

impl RecipeSummaryDto {
    #[must_use]
    pub fn from_row(row: RecipeRow, like_count: u64) -> Self {
        let total_time = row.recipe.total_time();
        let r = row.recipe;
        Self {
            id: r.id,
            title: r.title,
            slug: r.slug,
            description: r.description,
            author: row.author,
            category: row.category,
            country: row.country,
            prep_time: r.prep_time,
            cook_time: r.cook_time,
            total_time,
            servings: r.servings,
            difficulty: r.difficulty,
            status: r.status,
            image: r.image,
            like_count,
            created_at: r.created_at,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Pagination {
    pub page: u64,
    pub page_size: u64,
    pub total_items: u64,
    pub total_pages: u64,
    pub has_previous: bool,
    pub has_next: bool,
}

impl Pagination {
    #[must_use]
    pub const fn new(page: u64, page_size: u64, total_items: u64, total_pages: u64) -> Self {
        Self {
            page,
            page_size,
            total_items,
            total_pages,
            has_previous: page > 1,
            has_next: page < total_pages,
        }
    }
}

/// One page of a recipe list with the viewer's like state.
#[derive(Debug, Serialize)]
pub struct RecipeListing {
    pub heading: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub query: Option<String>,
    pub recipes: Vec<RecipeSummaryDto>,
    /// Ids on this page the viewer has liked. Empty for anonymous viewers.
    pub liked_recipe_ids: Vec<i32>,
    pub pagination: Pagination,
    pub categories: Vec<Taxon>,
    pub countries: Vec<Taxon>,
}

#[derive(Debug, Serialize)]
pub struct ProfileDto {
    pub username: String,
    pub joined: String,
    pub total_recipes: u64,
    #[serde(flatten)]
    pub listing: RecipeListing,
}

#[derive(Debug, Serialize)]
pub struct CommentDto {
    pub id: i32,
    pub author: String,
    pub content: String,
    pub created_at: String,
    pub can_delete: bool,
}

impl CommentDto {
    #[must_use]
    pub fn from_row(row: CommentRow, can_delete: bool) -> Self {
        Self {
            id: row.comment.id,
            author: row.username,
            content: row.comment.content,
            created_at: row.comment.created_at,
            can_delete,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct RecipeDetailDto {
    #[serde(flatten)]
    pub summary: RecipeSummaryDto,
    pub ingredients: String,
    pub instructions: String,
    pub updated_at: String,
    pub comments: Vec<CommentDto>,
    pub total_likes: u64,
    pub total_comments: u64,
    pub user_has_liked: bool,
    pub can_modify: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct Choice {
    pub value: String,
    pub label: String,
}

#[derive(Debug, Serialize)]
pub struct FormChoices {
    pub categories: Vec<Taxon>,
    pub countries: Vec<Taxon>,
    pub difficulties: Vec<Choice>,
    pub statuses: Vec<Choice>,
}

impl FormChoices {
    #[must_use]
    pub fn new(categories: Vec<Taxon>, countries: Vec<Taxon>) -> Self {
        Self {
            categories,
            countries,
            difficulties: Difficulty::ALL
                .into_iter()
                .map(|d| Choice {
                    value: d.as_str().to_string(),
                    label: d.label().to_string(),
                })
                .collect(),
            statuses: RecipeStatus::ALL
                .into_iter()
                .map(|s| Choice {
                    value: s.as_str().to_string(),
                    label: s.label().to_string(),
                })
                .collect(),
        }
    }
}

/// Create/edit form state: current values and the selectable options.
#[derive(Debug, Serialize)]
pub struct RecipeFormPage {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub slug: Option<String>,
    pub form: RecipeForm,
    pub choices: FormChoices,
}

/// JSON answer to a like toggle from a script.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct LikeStatusDto {
    pub success: bool,
    pub liked: bool,
    pub total_likes: u64,
}

#[derive(Debug, Serialize)]
pub struct AuthPageDto {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub next: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct HealthDto {
    pub status: &'static str,
    pub database: bool,
    pub uptime_seconds: u64,
}
