use axum::{
    Router,
    body::Body,
    http::{HeaderValue, Request},
    middleware,
    routing::{get, post},
};
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tower_sessions::{Expiry, SessionManagerLayer};
use tower_sessions_sqlx_store::SqliteStore;

use crate::config::Config;
use crate::state::SharedState;

pub mod auth;
mod browse;
mod comments;
mod error;
pub mod flash;
mod likes;
mod recipes;
pub mod respond;
mod system;
pub mod types;
mod validation;

pub use error::ApiError;
pub use types::*;

use tokio::sync::RwLock;

use crate::services::{AuthService, CommentService, LikeService, RecipeService};

#[derive(Clone)]
pub struct AppState {
    pub shared: Arc<SharedState>,

    pub start_time: std::time::Instant,
}

impl AppState {
    #[must_use]
    pub fn config(&self) -> &Arc<RwLock<Config>> {
        &self.shared.config
    }

    #[must_use]
    pub fn store(&self) -> &crate::db::Store {
        &self.shared.store
    }

    #[must_use]
    pub fn recipes(&self) -> &Arc<dyn RecipeService> {
        &self.shared.recipe_service
    }

    #[must_use]
    pub fn comments(&self) -> &Arc<dyn CommentService> {
        &self.shared.comment_service
    }

    #[must_use]
    pub fn likes(&self) -> &Arc<dyn LikeService> {
        &self.shared.like_service
    }

    #[must_use]
    pub fn auth(&self) -> &Arc<dyn AuthService> {
        &self.shared.auth_service
    }
}

#[must_use]
pub fn create_app_state(shared: Arc<SharedState>) -> Arc<AppState> {
    Arc::new(AppState {
        shared,
        start_time: std::time::Instant::now(),
    })
}

pub async fn create_app_state_from_config(config: Config) -> anyhow::Result<Arc<AppState>> {
    let shared = Arc::new(SharedState::new(config).await?);
    Ok(create_app_state(shared))
}

/// Builds the full application. Sessions live in the same SQLite database
/// as everything else, in the `tower_sessions` table.
pub async fn router(state: Arc<AppState>) -> anyhow::Result<Router> {
    let (cors_origins, secure_cookies, inactivity_minutes) = {
        let config = state.config().read().await;
        (
            config.server.cors_allowed_origins.clone(),
            config.server.secure_cookies,
            config.server.session_inactivity_minutes,
        )
    };

    let session_store = SqliteStore::new(state.store().conn.get_sqlite_connection_pool().clone());
    session_store.migrate().await?;

    let session_layer = SessionManagerLayer::new(session_store)
        .with_secure(secure_cookies)
        .with_same_site(tower_sessions::cookie::SameSite::Lax)
        .with_expiry(Expiry::OnInactivity(time::Duration::minutes(
            inactivity_minutes,
        )));

    let protected_routes = create_protected_router(state.clone());

    let app_router = Router::new()
        .merge(protected_routes)
        .route("/", get(browse::home))
        .route("/recipes/", get(browse::home))
        .route("/recipe/{slug}/", get(recipes::detail))
        .route("/category/{slug}/", get(browse::category))
        .route("/cuisine/{slug}/", get(browse::cuisine))
        .route("/search/", get(browse::search))
        .route("/profile/{username}/", get(browse::profile))
        .route(
            "/accounts/register/",
            get(auth::register_page).post(auth::register),
        )
        .route("/accounts/login/", get(auth::login_page).post(auth::login))
        .route("/accounts/logout/", post(auth::logout))
        .route("/health", get(system::health))
        .layer(session_layer)
        .with_state(state);

    let cors_layer = if cors_origins.contains(&"*".to_string()) {
        CorsLayer::new().allow_origin(Any)
    } else {
        let origins: Vec<HeaderValue> =
            cors_origins.iter().filter_map(|s| s.parse().ok()).collect();
        CorsLayer::new().allow_origin(origins)
    };

    let trace_layer = TraceLayer::new_for_http().make_span_with(|request: &Request<Body>| {
        tracing::info_span!(
            "request",
            method = %request.method(),
            uri = %request.uri(),
            user = tracing::field::Empty,
        )
    });

    Ok(app_router
        .layer(cors_layer.allow_methods(Any).allow_headers(Any))
        .layer(trace_layer))
}

fn create_protected_router(state: Arc<AppState>) -> Router<Arc<AppState>> {
    Router::new()
        .route(
            "/recipe/create/",
            get(recipes::create_page).post(recipes::create),
        )
        .route(
            "/recipe/{slug}/edit/",
            get(recipes::edit_page).post(recipes::update),
        )
        .route("/recipe/{slug}/delete/", post(recipes::delete))
        .route("/recipe/{slug}/comment/", post(comments::add))
        .route("/recipe/{slug}/like/", post(likes::toggle))
        .route("/comment/{id}/delete/", post(comments::delete))
        .route("/favorites/", get(browse::favorites))
        .route_layer(middleware::from_fn_with_state(state, auth::login_required))
}
