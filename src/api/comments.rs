use axum::{
    Extension, Form, Json,
    extract::{Path, State},
    http::HeaderMap,
    response::{IntoResponse, Response},
};
use std::sync::Arc;
use tower_sessions::Session;

use super::respond::{recipe_url, refuse, see_other, wants_json};
use super::validation::validate_comment_id;
use super::{ApiError, ApiResponse, AppState, CommentDto, flash};
use crate::db::CommentRow;
use crate::services::forms::CommentForm;
use crate::services::{Actor, CommentError};

impl From<CommentError> for ApiError {
    fn from(err: CommentError) -> Self {
        match err {
            CommentError::NotFound(msg) => ApiError::NotFound(msg),
            CommentError::Forbidden => ApiError::Forbidden(err.to_string()),
            CommentError::Validation(fields) => ApiError::invalid_fields(fields),
            CommentError::Database(msg) => ApiError::DatabaseError(msg),
            CommentError::Internal(msg) => ApiError::InternalError(msg),
        }
    }
}

/// POST /recipe/{slug}/comment/
/// Browsers are sent back to the recipe either way; scripts get JSON.
pub async fn add(
    State(state): State<Arc<AppState>>,
    Extension(actor): Extension<Actor>,
    session: Session,
    headers: HeaderMap,
    Path(slug): Path<String>,
    Form(form): Form<CommentForm>,
) -> Result<Response, ApiError> {
    let json = wants_json(&headers);

    match state.comments().add(&actor, &slug, &form).await {
        Ok(comment) if json => {
            let dto = CommentDto::from_row(
                CommentRow {
                    comment,
                    username: actor.username,
                },
                true,
            );
            Ok(Json(ApiResponse::success(dto)).into_response())
        }
        Ok(_) => {
            flash::success(&session, "Comment added successfully!").await?;
            Ok(see_other(&recipe_url(&slug)))
        }
        Err(CommentError::Validation(fields)) if !json => {
            tracing::debug!(recipe = %slug, errors = %fields.summary(), "Comment rejected");
            flash::error(&session, "Error adding comment. Please try again.").await?;
            Ok(see_other(&recipe_url(&slug)))
        }
        Err(e) => Err(refuse(&session, ApiError::from(e).with_input(&form)).await),
    }
}

/// POST /comment/{id}/delete/
pub async fn delete(
    State(state): State<Arc<AppState>>,
    Extension(actor): Extension<Actor>,
    session: Session,
    Path(id): Path<i32>,
) -> Result<Response, ApiError> {
    let id = validate_comment_id(id)?;

    let deleted = match state.comments().delete(&actor, id).await {
        Ok(deleted) => deleted,
        Err(e) => return Err(refuse(&session, e.into()).await),
    };

    flash::success(&session, "Comment deleted successfully!").await?;
    if deleted.recipe_slug.is_empty() {
        Ok(see_other("/"))
    } else {
        Ok(see_other(&recipe_url(&deleted.recipe_slug)))
    }
}
