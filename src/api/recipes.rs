use axum::{
    Extension, Form, Json,
    extract::{Path, State},
    response::Response,
};
use std::sync::Arc;
use tower_sessions::Session;

use super::auth::current_actor;
use super::respond::{recipe_url, refuse, render, see_other};
use super::{ApiError, ApiResponse, AppState, Page, RecipeDetailDto, RecipeFormPage};
use crate::models::recipe::{DEFAULT_SERVINGS, Difficulty, RecipeStatus};
use crate::services::forms::RecipeForm;
use crate::services::{Actor, RecipeError};

impl From<RecipeError> for ApiError {
    fn from(err: RecipeError) -> Self {
        match err {
            RecipeError::NotFound(msg) => ApiError::NotFound(msg),
            RecipeError::Forbidden => ApiError::Forbidden(err.to_string()),
            RecipeError::Validation(fields) => ApiError::invalid_fields(fields),
            RecipeError::Database(msg) => ApiError::DatabaseError(msg),
            RecipeError::Internal(msg) => ApiError::InternalError(msg),
        }
    }
}

/// GET /recipe/{slug}/
pub async fn detail(
    State(state): State<Arc<AppState>>,
    session: Session,
    Path(slug): Path<String>,
) -> Result<Json<ApiResponse<Page<RecipeDetailDto>>>, ApiError> {
    let viewer = current_actor(&state, &session).await?;
    let recipe = state.recipes().detail(viewer.as_ref(), &slug).await?;
    render(&session, recipe).await
}

/// GET /recipe/create/
pub async fn create_page(
    State(state): State<Arc<AppState>>,
    session: Session,
) -> Result<Json<ApiResponse<Page<RecipeFormPage>>>, ApiError> {
    let form = RecipeForm {
        servings: DEFAULT_SERVINGS.to_string(),
        difficulty: Difficulty::default().to_string(),
        status: RecipeStatus::default().to_string(),
        ..RecipeForm::default()
    };
    let choices = state.recipes().form_choices().await?;
    render(
        &session,
        RecipeFormPage {
            slug: None,
            form,
            choices,
        },
    )
    .await
}

/// POST /recipe/create/
pub async fn create(
    State(state): State<Arc<AppState>>,
    Extension(actor): Extension<Actor>,
    session: Session,
    Form(form): Form<RecipeForm>,
) -> Result<Response, ApiError> {
    let recipe = match state.recipes().create(&actor, &form).await {
        Ok(recipe) => recipe,
        Err(e) => return Err(refuse(&session, ApiError::from(e).with_input(&form)).await),
    };

    super::flash::success(&session, "Recipe created successfully!").await?;
    Ok(see_other(&recipe_url(&recipe.slug)))
}

/// GET /recipe/{slug}/edit/
pub async fn edit_page(
    State(state): State<Arc<AppState>>,
    Extension(actor): Extension<Actor>,
    session: Session,
    Path(slug): Path<String>,
) -> Result<Json<ApiResponse<Page<RecipeFormPage>>>, ApiError> {
    match state.recipes().edit_form(&actor, &slug).await {
        Ok(page) => render(&session, page).await,
        Err(e) => Err(refuse(&session, e.into()).await),
    }
}

/// POST /recipe/{slug}/edit/
pub async fn update(
    State(state): State<Arc<AppState>>,
    Extension(actor): Extension<Actor>,
    session: Session,
    Path(slug): Path<String>,
    Form(form): Form<RecipeForm>,
) -> Result<Response, ApiError> {
    let recipe = match state.recipes().update(&actor, &slug, &form).await {
        Ok(recipe) => recipe,
        Err(e) => return Err(refuse(&session, ApiError::from(e).with_input(&form)).await),
    };

    super::flash::success(&session, "Recipe updated successfully!").await?;
    Ok(see_other(&recipe_url(&recipe.slug)))
}

/// POST /recipe/{slug}/delete/
pub async fn delete(
    State(state): State<Arc<AppState>>,
    Extension(actor): Extension<Actor>,
    session: Session,
    Path(slug): Path<String>,
) -> Result<Response, ApiError> {
    if let Err(e) = state.recipes().delete(&actor, &slug).await {
        return Err(refuse(&session, e.into()).await);
    }

    super::flash::success(&session, "Recipe deleted successfully!").await?;
    Ok(see_other("/"))
}
