/*
 * Responsibility
 * - API key の妥当性を判断する Validator trait (注入ポイント)
 * - クロージャを Validator として使うためのアダプタ
 * - 設定済みキー集合による実装 (StaticKeyValidator)
 */
use async_trait::async_trait;
use axum::http::request::Parts;

mod identity;
mod static_keys;

pub use identity::KeyIdentity;
pub use static_keys::{StaticKeyValidator, StaticKeysError};

/// Decides whether a presented key is acceptable for a request.
///
/// - `Ok(true)`  => accept, request continues
/// - `Ok(false)` => reject (401)
/// - `Err(_)`    => validator itself failed (500); never treated as accept
///
/// `ctx` is the request without its body. Implementations may read it or put
/// the accepted identity into `ctx.extensions` for handlers downstream.
#[async_trait]
pub trait Validator: Send + Sync {
    async fn validate(&self, key: &str, ctx: &mut Parts) -> Result<bool, ValidatorError>;
}

#[derive(Debug, thiserror::Error)]
pub enum ValidatorError {
    #[error("key store unavailable: {0}")]
    Unavailable(String),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

/// A synchronous predicate used as a [`Validator`].
pub struct FnValidator<F>(F);

/// Wrap a closure `(key, ctx) -> bool` as a validator.
///
/// ```ignore
/// let validator = validator_fn(|key, _ctx| key == "valid-key");
/// ```
pub fn validator_fn<F>(f: F) -> FnValidator<F>
where
    F: Fn(&str, &Parts) -> bool + Send + Sync + 'static,
{
    FnValidator(f)
}

#[async_trait]
impl<F> Validator for FnValidator<F>
where
    F: Fn(&str, &Parts) -> bool + Send + Sync,
{
    async fn validate(&self, key: &str, ctx: &mut Parts) -> Result<bool, ValidatorError> {
        Ok((self.0)(key, ctx))
    }
}

#[cfg(test)]
mod tests {
    use axum::http::{Method, Request};

    use super::*;

    #[tokio::test]
    async fn closure_sees_key_and_request() {
        let validator = validator_fn(|key, ctx| key == "k" && ctx.method == Method::POST);

        let (mut post, _) = Request::post("/").body(()).unwrap().into_parts();
        let (mut get, _) = Request::get("/").body(()).unwrap().into_parts();

        assert!(validator.validate("k", &mut post).await.unwrap());
        assert!(!validator.validate("k", &mut get).await.unwrap());
        assert!(!validator.validate("other", &mut post).await.unwrap());
    }
}
