use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Json},
};
use serde_json::{json, Value};

use crate::error::ApiError;
use crate::state::AppState;

pub async fn root() -> Json<Value> {
    let version = env!("CARGO_PKG_VERSION");

    Json(json!({
        "success": true,
        "data": {
            "name": "Collapp API",
            "version": version,
            "description": "Administration backend for users, languages and translations",
            "endpoints": {
                "home": "/ (public)",
                "health": "/health (public)",
                "login": "/api/v1/users/login, /api/v1/users/refresh-token/:token (public)",
                "users": "/api/v1/users[/:id], /api/v1/users/logout (protected)",
                "lang": "/api/v1/lang[/:id] (protected)",
                "translation": "/api/v1/translation[/:id] (protected)",
            }
        }
    }))
}

/// 200 while the database answers, 503 otherwise.
pub async fn health(State(state): State<AppState>) -> impl IntoResponse {
    let now = chrono::Utc::now();

    match state.db.health_check().await {
        Ok(_) => (
            StatusCode::OK,
            Json(json!({
                "success": true,
                "data": {
                    "status": "ok",
                    "timestamp": now,
                    "database": "ok"
                }
            })),
        ),
        Err(e) => {
            tracing::warn!("Health check failed: {}", e);
            (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(json!({
                    "success": false,
                    "error": "database unavailable",
                    "data": {
                        "status": "degraded",
                        "timestamp": now,
                    }
                })),
            )
        }
    }
}

pub async fn not_found() -> ApiError {
    ApiError::NotFound
}
