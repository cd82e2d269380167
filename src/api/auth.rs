use axum::{
    Form,
    extract::{Query, Request, State},
    middleware::Next,
    response::{IntoResponse, Response},
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tower_sessions::Session;

use super::respond::{LOGIN_PATH, is_safe_next, render, see_other};
use super::{ApiError, AppState, AuthPageDto, flash};
use crate::services::forms::{LoginForm, RegisterForm};
use crate::services::{Actor, AuthError};

/// Session key holding the logged-in user's id.
pub const SESSION_USER_KEY: &str = "user_id";

impl From<AuthError> for ApiError {
    fn from(err: AuthError) -> Self {
        match err {
            AuthError::InvalidCredentials => ApiError::Unauthorized(err.to_string()),
            AuthError::Validation(fields) => ApiError::invalid_fields(fields),
            AuthError::Database(msg) => ApiError::DatabaseError(msg),
            AuthError::Internal(msg) => ApiError::InternalError(msg),
        }
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct NextQuery {
    pub next: Option<String>,
}

/// Registration values echoed back on failure. Passwords never are.
#[derive(Serialize)]
struct RegisterEcho<'a> {
    username: &'a str,
    email: &'a str,
}

// ============================================================================
// Middleware
// ============================================================================

/// The session's user, if it still exists.
pub async fn current_actor(state: &AppState, session: &Session) -> Result<Option<Actor>, ApiError> {
    let Some(user_id) = session.get::<i32>(SESSION_USER_KEY).await? else {
        return Ok(None);
    };
    Ok(state.auth().actor(user_id).await?)
}

/// Lets the request through with its [`Actor`] in the extensions, or sends
/// the caller to the login page with a way back.
pub async fn login_required(
    State(state): State<Arc<AppState>>,
    session: Session,
    mut request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    if let Some(actor) = current_actor(&state, &session).await? {
        tracing::Span::current().record("user", &actor.username);
        request.extensions_mut().insert(actor);
        return Ok(next.run(request).await);
    }

    let uri = request.uri();
    let back = uri
        .path_and_query()
        .map_or_else(|| uri.path().to_string(), |pq| pq.as_str().to_string());
    Err(ApiError::Unauthenticated { next: back })
}

// ============================================================================
// Handlers
// ============================================================================

/// GET /accounts/register/
pub async fn register_page(session: Session) -> Result<impl IntoResponse, ApiError> {
    render(
        &session,
        AuthPageDto {
            next: None,
            username: None,
        },
    )
    .await
}

/// POST /accounts/register/
pub async fn register(
    State(state): State<Arc<AppState>>,
    session: Session,
    Form(form): Form<RegisterForm>,
) -> Result<Response, ApiError> {
    let user = state.auth().register(&form).await.map_err(|e| {
        ApiError::from(e).with_input(&RegisterEcho {
            username: &form.username,
            email: &form.email,
        })
    })?;

    flash::success(
        &session,
        format!("Account created for {}! You can now log in.", user.username),
    )
    .await?;
    Ok(see_other(LOGIN_PATH))
}

/// GET /accounts/login/
pub async fn login_page(
    session: Session,
    Query(query): Query<NextQuery>,
) -> Result<impl IntoResponse, ApiError> {
    render(
        &session,
        AuthPageDto {
            next: query.next.filter(|n| is_safe_next(n)),
            username: None,
        },
    )
    .await
}

/// POST /accounts/login/
/// Stores the user id in a fresh session and returns to `next` when it is local.
pub async fn login(
    State(state): State<Arc<AppState>>,
    session: Session,
    Query(query): Query<NextQuery>,
    Form(form): Form<LoginForm>,
) -> Result<Response, ApiError> {
    let user = state.auth().login(&form.username, &form.password).await?;

    session.cycle_id().await?;
    session.insert(SESSION_USER_KEY, user.id).await?;
    flash::success(&session, format!("Welcome back, {}!", user.username)).await?;

    let target = form
        .next
        .filter(|n| !n.is_empty())
        .or(query.next)
        .filter(|n| is_safe_next(n))
        .unwrap_or_else(|| "/".to_string());
    Ok(see_other(&target))
}

/// POST /accounts/logout/
pub async fn logout(session: Session) -> Result<Response, ApiError> {
    session.flush().await?;
    Ok(see_other("/"))
}
