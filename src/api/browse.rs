//! Read-only recipe lists: home, category, cuisine, search, favorites, profile.

use axum::{
    Extension, Json,
    extract::{Path, Query, State},
};
use serde::Deserialize;
use std::sync::Arc;
use tower_sessions::Session;

use super::auth::current_actor;
use super::respond::render;
use super::validation::validate_page;
use super::{ApiError, ApiResponse, AppState, Page, ProfileDto, RecipeListing};
use crate::services::Actor;

#[derive(Debug, Default, Deserialize)]
pub struct ListQuery {
    pub page: Option<String>,
    pub q: Option<String>,
}

type ListingResponse = Result<Json<ApiResponse<Page<RecipeListing>>>, ApiError>;

/// GET / and GET /recipes/
pub async fn home(
    State(state): State<Arc<AppState>>,
    session: Session,
    Query(query): Query<ListQuery>,
) -> ListingResponse {
    let page = validate_page(query.page.as_deref())?;
    let viewer = current_actor(&state, &session).await?;
    let listing = state.recipes().list_published(viewer.as_ref(), page).await?;
    render(&session, listing).await
}

/// GET /category/{slug}/
pub async fn category(
    State(state): State<Arc<AppState>>,
    session: Session,
    Path(slug): Path<String>,
    Query(query): Query<ListQuery>,
) -> ListingResponse {
    let page = validate_page(query.page.as_deref())?;
    let viewer = current_actor(&state, &session).await?;
    let listing = state
        .recipes()
        .list_by_category(viewer.as_ref(), &slug, page)
        .await?;
    render(&session, listing).await
}

/// GET /cuisine/{slug}/
pub async fn cuisine(
    State(state): State<Arc<AppState>>,
    session: Session,
    Path(slug): Path<String>,
    Query(query): Query<ListQuery>,
) -> ListingResponse {
    let page = validate_page(query.page.as_deref())?;
    let viewer = current_actor(&state, &session).await?;
    let listing = state
        .recipes()
        .list_by_country(viewer.as_ref(), &slug, page)
        .await?;
    render(&session, listing).await
}

/// GET /search/?q=
pub async fn search(
    State(state): State<Arc<AppState>>,
    session: Session,
    Query(query): Query<ListQuery>,
) -> ListingResponse {
    let page = validate_page(query.page.as_deref())?;
    let viewer = current_actor(&state, &session).await?;
    let listing = state
        .recipes()
        .search(viewer.as_ref(), query.q.as_deref().unwrap_or_default(), page)
        .await?;
    render(&session, listing).await
}

/// GET /favorites/
pub async fn favorites(
    State(state): State<Arc<AppState>>,
    Extension(actor): Extension<Actor>,
    session: Session,
    Query(query): Query<ListQuery>,
) -> ListingResponse {
    let page = validate_page(query.page.as_deref())?;
    let listing = state.recipes().list_favorites(&actor, page).await?;
    render(&session, listing).await
}

/// GET /profile/{username}/
pub async fn profile(
    State(state): State<Arc<AppState>>,
    session: Session,
    Path(username): Path<String>,
    Query(query): Query<ListQuery>,
) -> Result<Json<ApiResponse<Page<ProfileDto>>>, ApiError> {
    let page = validate_page(query.page.as_deref())?;
    let viewer = current_actor(&state, &session).await?;
    let profile = state
        .recipes()
        .profile(viewer.as_ref(), &username, page)
        .await?;
    render(&session, profile).await
}
