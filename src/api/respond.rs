//! Shared response helpers: page envelopes, redirects and caller detection.

use axum::{
    Json,
    http::{HeaderMap, header},
    response::{IntoResponse, Redirect, Response},
};
use serde::Serialize;
use tower_sessions::Session;

use super::{ApiError, ApiResponse, Page, flash};

pub const LOGIN_PATH: &str = "/accounts/login/";

/// True for script callers: `X-Requested-With: XMLHttpRequest` or an
/// `Accept` header that asks for JSON.
pub fn wants_json(headers: &HeaderMap) -> bool {
    let xhr = headers
        .get("x-requested-with")
        .and_then(|v| v.to_str().ok())
        .is_some_and(|v| v.eq_ignore_ascii_case("XMLHttpRequest"));
    let accepts_json = headers
        .get(header::ACCEPT)
        .and_then(|v| v.to_str().ok())
        .is_some_and(|v| v.contains("application/json"));
    xhr || accepts_json
}

/// Wraps page data with the notices pending in the session.
pub async fn render<T: Serialize>(
    session: &Session,
    content: T,
) -> Result<Json<ApiResponse<Page<T>>>, ApiError> {
    let messages = flash::drain(session).await?;
    Ok(Json(ApiResponse::success(Page { content, messages })))
}

/// 303 to `location`.
pub fn see_other(location: &str) -> Response {
    Redirect::to(location).into_response()
}

pub fn recipe_url(slug: &str) -> String {
    format!("/recipe/{slug}/")
}

pub fn login_url(next: &str) -> String {
    format!("{LOGIN_PATH}?next={}", urlencoding::encode(next))
}

/// Only same-site absolute paths are followed after login.
pub fn is_safe_next(next: &str) -> bool {
    next.starts_with('/') && !next.starts_with("//") && !next.contains('\\')
}

/// Text of the notice a failed mutation leaves behind. Login redirects and
/// server errors leave none.
pub fn notice_for(err: &ApiError) -> Option<&str> {
    match err {
        ApiError::Forbidden(msg) | ApiError::NotFound(msg) => Some(msg),
        ApiError::ValidationError { message, .. } => Some(message),
        _ => None,
    }
}

/// Records a refused mutation as a notice before it is returned.
pub async fn refuse(session: &Session, err: ApiError) -> ApiError {
    if let Some(notice) = notice_for(&err)
        && let Err(e) = flash::error(session, notice.to_string()).await
    {
        tracing::warn!("Failed to record notice: {}", e);
    }
    err
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;
    use crate::services::FieldErrors;

    #[test]
    fn test_wants_json() {
        let mut headers = HeaderMap::new();
        assert!(!wants_json(&headers));

        headers.insert("x-requested-with", HeaderValue::from_static("XMLHttpRequest"));
        assert!(wants_json(&headers));

        let mut headers = HeaderMap::new();
        headers.insert(
            header::ACCEPT,
            HeaderValue::from_static("application/json, text/plain"),
        );
        assert!(wants_json(&headers));

        headers.insert(header::ACCEPT, HeaderValue::from_static("text/html"));
        assert!(!wants_json(&headers));
    }

    #[test]
    fn test_login_url_encodes_next() {
        assert_eq!(
            login_url("/recipe/pasta/like/"),
            "/accounts/login/?next=%2Frecipe%2Fpasta%2Flike%2F"
        );
    }

    #[test]
    fn test_is_safe_next() {
        assert!(is_safe_next("/favorites/"));
        assert!(!is_safe_next("https://evil.example/"));
        assert!(!is_safe_next("//evil.example/"));
        assert!(!is_safe_next(""));
    }

    #[test]
    fn test_notice_for_user_facing_failures() {
        assert_eq!(
            notice_for(&ApiError::NotFound("Recipe not found".into())),
            Some("Recipe not found")
        );
        assert_eq!(
            notice_for(&ApiError::Forbidden("Not yours".into())),
            Some("Not yours")
        );
        assert_eq!(
            notice_for(&ApiError::invalid_fields(FieldErrors::single("title", "Required"))),
            Some("Please correct the errors below.")
        );
        assert_eq!(
            notice_for(&ApiError::Unauthenticated { next: "/".into() }),
            None
        );
        assert_eq!(notice_for(&ApiError::InternalError("boom".into())), None);
    }
}
