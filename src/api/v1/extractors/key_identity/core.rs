use axum::extract::FromRequestParts;
use axum::http::request::Parts;

use crate::error::AppError;

use super::KeyIdentity;

/// Handler で KeyIdentity を受け取るための extractor
/// validator が KeyIdentity を request.extensions() に insert 済みである前提
/// 見つからない場合は 401 を返す（gate 未設定・identity を載せない validator）
pub struct KeyIdentityExtractor(pub KeyIdentity);

impl<S> FromRequestParts<S> for KeyIdentityExtractor
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<KeyIdentity>()
            .cloned()
            .map(KeyIdentityExtractor)
            .ok_or(AppError::Unauthorized {
                code: "KEY_IDENTITY_MISSING",
                message: "no api key identity in request context",
            })
    }
}
