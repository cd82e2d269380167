use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Redirect, Response},
};
use serde::Serialize;
use std::fmt;

use super::ApiResponse;
use super::respond::login_url;
use crate::services::FieldErrors;

#[derive(Debug)]
pub enum ApiError {
    NotFound(String),

    /// No session user on a route that needs one. Carries the path to return to.
    Unauthenticated { next: String },

    Forbidden(String),

    ValidationError {
        message: String,
        fields: FieldErrors,
        input: Option<serde_json::Value>,
    },

    Unauthorized(String),

    DatabaseError(String),

    InternalError(String),
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ApiError::NotFound(msg) => write!(f, "Not found: {}", msg),
            ApiError::Unauthenticated { next } => write!(f, "Login required for {}", next),
            ApiError::Forbidden(msg) => write!(f, "Forbidden: {}", msg),
            ApiError::ValidationError { message, .. } => write!(f, "Validation error: {}", message),
            ApiError::Unauthorized(msg) => write!(f, "Unauthorized: {}", msg),
            ApiError::DatabaseError(msg) => write!(f, "Database error: {}", msg),
            ApiError::InternalError(msg) => write!(f, "Internal error: {}", msg),
        }
    }
}

impl std::error::Error for ApiError {}

#[derive(Serialize)]
struct ValidationBody<'a> {
    success: bool,
    error: &'a str,
    fields: &'a FieldErrors,
    #[serde(skip_serializing_if = "Option::is_none")]
    data: Option<&'a serde_json::Value>,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, error_message) = match &self {
            ApiError::NotFound(msg) => (StatusCode::NOT_FOUND, msg.clone()),
            ApiError::Unauthenticated { next } => {
                return Redirect::to(&login_url(next)).into_response();
            }
            ApiError::Forbidden(msg) => (StatusCode::FORBIDDEN, msg.clone()),
            ApiError::ValidationError {
                message,
                fields,
                input,
            } => {
                let body = ValidationBody {
                    success: false,
                    error: message,
                    fields,
                    data: input.as_ref(),
                };
                return (StatusCode::BAD_REQUEST, Json(body)).into_response();
            }
            ApiError::Unauthorized(msg) => (StatusCode::UNAUTHORIZED, msg.clone()),
            ApiError::DatabaseError(msg) => {
                tracing::error!("Database error: {}", msg);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "A database error occurred".to_string(),
                )
            }
            ApiError::InternalError(msg) => {
                tracing::error!("Internal error: {}", msg);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "An internal error occurred".to_string(),
                )
            }
        };

        let body = ApiResponse::<()>::error(error_message);
        (status, Json(body)).into_response()
    }
}

impl From<anyhow::Error> for ApiError {
    fn from(err: anyhow::Error) -> Self {
        ApiError::InternalError(err.to_string())
    }
}

impl From<tower_sessions::session::Error> for ApiError {
    fn from(err: tower_sessions::session::Error) -> Self {
        ApiError::InternalError(format!("Session error: {err}"))
    }
}

impl ApiError {
    pub fn validation(msg: impl Into<String>) -> Self {
        ApiError::ValidationError {
            message: msg.into(),
            fields: FieldErrors::new(),
            input: None,
        }
    }

    pub fn invalid_fields(fields: FieldErrors) -> Self {
        ApiError::ValidationError {
            message: "Please correct the errors below.".to_string(),
            fields,
            input: None,
        }
    }

    /// Echoes the submitted values back with a validation failure.
    #[must_use]
    pub fn with_input(self, submitted: &impl Serialize) -> Self {
        match self {
            ApiError::ValidationError {
                message, fields, ..
            } => ApiError::ValidationError {
                message,
                fields,
                input: serde_json::to_value(submitted).ok(),
            },
            other => other,
        }
    }

    pub fn internal(msg: impl Into<String>) -> Self {
        ApiError::InternalError(msg.into())
    }
}
