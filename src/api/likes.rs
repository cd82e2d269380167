use axum::{
    Extension, Json,
    extract::{Path, State},
    http::HeaderMap,
    response::{IntoResponse, Response},
};
use std::sync::Arc;
use tower_sessions::Session;

use super::respond::{recipe_url, refuse, see_other, wants_json};
use super::{ApiError, AppState, LikeStatusDto, flash};
use crate::services::{Actor, LikeError};

impl From<LikeError> for ApiError {
    fn from(err: LikeError) -> Self {
        match err {
            LikeError::NotFound(msg) => ApiError::NotFound(msg),
            LikeError::Database(msg) => ApiError::DatabaseError(msg),
            LikeError::Internal(msg) => ApiError::InternalError(msg),
        }
    }
}

/// POST /recipe/{slug}/like/
/// Scripts get `{success, liked, total_likes}`; browsers go back to the recipe.
pub async fn toggle(
    State(state): State<Arc<AppState>>,
    Extension(actor): Extension<Actor>,
    session: Session,
    headers: HeaderMap,
    Path(slug): Path<String>,
) -> Result<Response, ApiError> {
    let outcome = match state.likes().toggle(&actor, &slug).await {
        Ok(outcome) => outcome,
        Err(e) => return Err(refuse(&session, e.into()).await),
    };

    if wants_json(&headers) {
        return Ok(Json(LikeStatusDto {
            success: true,
            liked: outcome.liked,
            total_likes: outcome.total_likes,
        })
        .into_response());
    }

    let notice = if outcome.liked {
        "Recipe added to favorites!"
    } else {
        "Recipe removed from favorites!"
    };
    flash::success(&session, notice).await?;
    Ok(see_other(&recipe_url(&outcome.recipe_slug)))
}
