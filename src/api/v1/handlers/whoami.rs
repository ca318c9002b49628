/*
 * Responsibility
 * - GET /whoami
 * - gate を通過したリクエストの key label を返す (key 自体は返さない)
 */
use axum::Json;
use serde::Serialize;

use crate::api::v1::extractors::KeyIdentityExtractor;

#[derive(Debug, Serialize)]
pub struct WhoAmIResponse {
    pub key: String,
}

pub async fn whoami(KeyIdentityExtractor(identity): KeyIdentityExtractor) -> Json<WhoAmIResponse> {
    Json(WhoAmIResponse {
        key: identity.label().to_string(),
    })
}
