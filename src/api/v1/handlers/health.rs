/*
 * Responsibility
 * - GET /health (疎通用)
 * - key auth の skipper 対象 (key 無しで通る)
 */
use axum::{Json, http::StatusCode, response::IntoResponse};
use serde_json::json;

pub async fn health() -> impl IntoResponse {
    (StatusCode::OK, Json(json!({"status": "ok"})))
}
