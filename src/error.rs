/*
 * Responsibility
 * - アプリ共通の AppError 定義
 * - IntoResponse 実装 (HTTP status / JSON error body)
 * - key auth の拒否理由を 400 / 401 / 500 に統一的に変換
 *
 * Notes
 * - message は固定文言のみ。提示された key をレスポンスやログに載せない
 */
use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use thiserror::Error;

use crate::middleware::key_auth::KeyAuthRejection;

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: ErrorBody,
}

#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub code: &'static str,
    pub message: &'static str,
}

#[derive(Debug, Error)]
pub enum AppError {
    #[error("{code}: {message}")]
    BadRequest {
        code: &'static str,
        message: &'static str,
    },
    #[error("{code}: {message}")]
    Unauthorized {
        code: &'static str,
        message: &'static str,
    },
    #[error("internal server error")]
    Internal,
}

impl AppError {
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::BadRequest { .. } => StatusCode::BAD_REQUEST,
            AppError::Unauthorized { .. } => StatusCode::UNAUTHORIZED,
            AppError::Internal => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        let (code, message) = match self {
            AppError::BadRequest { code, message } | AppError::Unauthorized { code, message } => {
                (code, message)
            }
            AppError::Internal => ("INTERNAL_SERVER_ERROR", "internal server error"),
        };

        let body = ErrorResponse {
            error: ErrorBody { code, message },
        };

        (status, Json(body)).into_response()
    }
}

impl From<KeyAuthRejection> for AppError {
    fn from(e: KeyAuthRejection) -> Self {
        match e {
            KeyAuthRejection::KeyNotPresented => AppError::BadRequest {
                code: "KEY_NOT_PRESENTED",
                message: "missing or malformed api key",
            },
            KeyAuthRejection::KeyRejected => AppError::Unauthorized {
                code: "KEY_REJECTED",
                message: "invalid api key",
            },
            // validator の内部エラーは 500。詳細は core 側でログ済み
            KeyAuthRejection::Validator(_) => AppError::Internal,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::validator::ValidatorError;

    #[test]
    fn rejections_map_to_distinct_statuses() {
        assert_eq!(
            AppError::from(KeyAuthRejection::KeyNotPresented).status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            AppError::from(KeyAuthRejection::KeyRejected).status(),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            AppError::from(KeyAuthRejection::Validator(ValidatorError::Unavailable(
                "down".into()
            )))
            .status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }
}
