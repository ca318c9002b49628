/*
 * Responsibility
 * - v1 の URL 構造を定義
 * - key auth は app 側でまとめて掛ける (/health は skipper で除外)
 */
use axum::{Router, routing::get};

use crate::state::AppState;

use crate::api::v1::handlers::{health::health, whoami::whoami};

pub const HEALTH_PATH: &str = "/health";

pub fn routes() -> Router<AppState> {
    Router::new()
        .route(HEALTH_PATH, get(health))
        .route("/whoami", get(whoami))
}
