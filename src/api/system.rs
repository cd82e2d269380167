use axum::{Json, extract::State, http::StatusCode};
use std::sync::Arc;

use super::{ApiResponse, AppState, HealthDto};

/// GET /health
pub async fn health(
    State(state): State<Arc<AppState>>,
) -> (StatusCode, Json<ApiResponse<HealthDto>>) {
    let uptime_seconds = state.start_time.elapsed().as_secs();
    match state.store().ping().await {
        Ok(()) => (
            StatusCode::OK,
            Json(ApiResponse::success(HealthDto {
                status: "ok",
                database: true,
                uptime_seconds,
            })),
        ),
        Err(e) => {
            tracing::error!("Health check failed: {}", e);
            (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(ApiResponse::success(HealthDto {
                    status: "degraded",
                    database: false,
                    uptime_seconds,
                })),
            )
        }
    }
}
