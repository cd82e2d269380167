#![allow(dead_code)]

use axum::{
    Router,
    body::Body,
    http::{Request, Response, header},
};
use http_body_util::BodyExt;
use larder::api::AppState;
use larder::config::{Config, SecurityConfig};
use larder::db::{Store, User};
use larder::entities::recipes;
use larder::models::recipe::{Difficulty, RecipeInput, RecipeStatus};
use larder::models::text::slugify;
use std::sync::Arc;
use tower::ServiceExt;

pub const PASSWORD: &str = "password123";

pub struct TestApp {
    pub router: Router,
    pub state: Arc<AppState>,
}

pub async fn spawn_app() -> TestApp {
    let path = std::env::temp_dir().join(format!("larder-test-{}.db", uuid::Uuid::new_v4()));

    let mut config = Config::default();
    config.general.database_path = format!("sqlite:{}", path.display());
    config.server.secure_cookies = false;
    config.security = fast_security();

    let state = larder::api::create_app_state_from_config(config)
        .await
        .expect("Failed to create app state");
    let router = larder::api::router(state.clone())
        .await
        .expect("Failed to build router");

    TestApp { router, state }
}

pub fn fast_security() -> SecurityConfig {
    SecurityConfig {
        argon2_memory_cost_kib: 1024,
        argon2_time_cost: 1,
        argon2_parallelism: 1,
    }
}

impl TestApp {
    pub fn store(&self) -> &Store {
        self.state.store()
    }

    pub async fn create_user(&self, username: &str, staff: bool) -> User {
        self.store()
            .create_user(
                username,
                &format!("{username}@example.com"),
                PASSWORD,
                staff,
                &fast_security(),
            )
            .await
            .expect("Failed to create user")
    }

    pub async fn create_recipe(
        &self,
        author_id: i32,
        title: &str,
        status: RecipeStatus,
    ) -> recipes::Model {
        let input = RecipeInput {
            title: title.to_string(),
            description: format!("{title} description"),
            ingredients: "Salt\nPepper\nOlive oil".to_string(),
            instructions: "Cook it.".to_string(),
            prep_time: 10,
            cook_time: 20,
            servings: 4,
            difficulty: Difficulty::Medium,
            status,
            category_id: None,
            country_id: None,
            image: None,
        };
        self.store()
            .insert_recipe(author_id, &slugify(title), input)
            .await
            .expect("Failed to insert recipe")
            .expect("Slug already taken")
    }

    pub async fn send(&self, request: Request<Body>) -> Response<Body> {
        self.router.clone().oneshot(request).await.unwrap()
    }

    pub async fn get(&self, uri: &str, cookie: Option<&str>) -> Response<Body> {
        let mut builder = Request::builder().uri(uri);
        if let Some(cookie) = cookie {
            builder = builder.header(header::COOKIE, cookie);
        }
        self.send(builder.body(Body::empty()).unwrap()).await
    }

    pub async fn post_form(&self, uri: &str, body: &str, cookie: Option<&str>) -> Response<Body> {
        let mut builder = Request::builder()
            .method("POST")
            .uri(uri)
            .header(
                header::CONTENT_TYPE,
                mime::APPLICATION_WWW_FORM_URLENCODED.as_ref(),
            );
        if let Some(cookie) = cookie {
            builder = builder.header(header::COOKIE, cookie);
        }
        self.send(builder.body(Body::from(body.to_string())).unwrap())
            .await
    }

    /// POST as a script would: `X-Requested-With` plus `Accept: application/json`.
    pub async fn post_ajax(&self, uri: &str, body: &str, cookie: Option<&str>) -> Response<Body> {
        let mut builder = Request::builder()
            .method("POST")
            .uri(uri)
            .header("X-Requested-With", "XMLHttpRequest")
            .header(header::ACCEPT, mime::APPLICATION_JSON.as_ref())
            .header(
                header::CONTENT_TYPE,
                mime::APPLICATION_WWW_FORM_URLENCODED.as_ref(),
            );
        if let Some(cookie) = cookie {
            builder = builder.header(header::COOKIE, cookie);
        }
        self.send(builder.body(Body::from(body.to_string())).unwrap())
            .await
    }

    /// Logs in through the login form and returns the `Cookie` header value.
    pub async fn login(&self, username: &str) -> String {
        let response = self
            .post_form(
                "/accounts/login/",
                &format!("username={username}&password={PASSWORD}"),
                None,
            )
            .await;
        assert_eq!(response.status(), 303, "login failed for {username}");
        session_cookie(&response).expect("login did not set a session cookie")
    }
}

/// `name=value` of the first `Set-Cookie` header.
pub fn session_cookie(response: &Response<Body>) -> Option<String> {
    response
        .headers()
        .get(header::SET_COOKIE)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.split(';').next())
        .map(str::to_string)
}

pub fn location(response: &Response<Body>) -> String {
    response
        .headers()
        .get(header::LOCATION)
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default()
        .to_string()
}

pub async fn body_json(response: Response<Body>) -> serde_json::Value {
    let body = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&body).unwrap()
}

/// Texts of the flash messages on a page response.
pub fn messages(page: &serde_json::Value) -> Vec<String> {
    page["data"]["messages"]
        .as_array()
        .map(|msgs| {
            msgs.iter()
                .filter_map(|m| m["text"].as_str().map(str::to_string))
                .collect()
        })
        .unwrap_or_default()
}
