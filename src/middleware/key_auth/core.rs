//! API key の抽出 → validator 呼び出し → 通過 or 拒否
//!
//! 1 リクエストにつき評価は 1 回だけ。リトライ・キャッシュはしない。
//! 通過時は request に手を加えずそのまま next へ渡す
//! (identity を載せたい場合は validator 側で extensions に入れる)。

use std::fmt;
use std::sync::Arc;

use axum::{
    Router,
    body::Body,
    extract::State,
    http::{Request, request::Parts},
    middleware::{self, Next},
    response::Response,
};
use thiserror::Error;

use super::config::{KeyAuthBuilder, KeyAuthConfigError};
use super::lookup::KeyLookup;
use crate::error::AppError;
use crate::services::validator::{Validator, ValidatorError};

pub type Skipper = Arc<dyn Fn(&Parts) -> bool + Send + Sync>;

/// Why a request was turned away by the gate.
#[derive(Debug, Error)]
pub enum KeyAuthRejection {
    /// Nothing usable at the configured location (absent or malformed).
    #[error("api key not presented")]
    KeyNotPresented,
    /// A key was found but the validator declined it.
    #[error("api key rejected")]
    KeyRejected,
    #[error("api key validator failed: {0}")]
    Validator(#[from] ValidatorError),
}

/// The compiled gate: lookup, scheme and validator, immutable after build.
///
/// Cloning is cheap; every clone shares the same configuration.
#[derive(Clone)]
pub struct KeyAuth {
    inner: Arc<Inner>,
}

struct Inner {
    lookup: KeyLookup,
    auth_scheme: String,
    validator: Arc<dyn Validator>,
    skipper: Option<Skipper>,
}

impl KeyAuth {
    pub(super) fn new(
        lookup: KeyLookup,
        auth_scheme: String,
        validator: Arc<dyn Validator>,
        skipper: Option<Skipper>,
    ) -> Self {
        Self {
            inner: Arc::new(Inner {
                lookup,
                auth_scheme,
                validator,
                skipper,
            }),
        }
    }

    pub fn builder() -> KeyAuthBuilder {
        KeyAuthBuilder::new()
    }

    /// Default lookup (`header:Authorization`) and scheme (`Bearer`).
    pub fn with_validator(validator: impl Validator + 'static) -> Result<Self, KeyAuthConfigError> {
        KeyAuthBuilder::new().validator(validator).build()
    }

    pub fn lookup(&self) -> &KeyLookup {
        &self.inner.lookup
    }

    pub fn auth_scheme(&self) -> &str {
        &self.inner.auth_scheme
    }

    pub fn skips(&self, parts: &Parts) -> bool {
        self.inner.skipper.as_ref().is_some_and(|skip| skip(parts))
    }

    /// Run the auth decision for one request.
    ///
    /// `Ok(())` means the request may proceed. The validator sees `parts` as its
    /// request context; the gate itself does not modify it.
    pub async fn evaluate(&self, parts: &mut Parts) -> Result<(), KeyAuthRejection> {
        let Some(key) = self.inner.lookup.extract(parts, &self.inner.auth_scheme) else {
            tracing::debug!(lookup = %self.inner.lookup, "api key not presented");
            return Err(KeyAuthRejection::KeyNotPresented);
        };

        match self.inner.validator.validate(&key, parts).await {
            Ok(true) => Ok(()),
            Ok(false) => {
                // key 自体はログに出さない
                tracing::warn!(
                    lookup = %self.inner.lookup,
                    method = %parts.method,
                    path = parts.uri.path(),
                    "api key rejected"
                );
                Err(KeyAuthRejection::KeyRejected)
            }
            Err(err) => {
                tracing::error!(error = %err, "api key validator failed");
                Err(KeyAuthRejection::Validator(err))
            }
        }
    }
}

impl fmt::Debug for KeyAuth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("KeyAuth")
            .field("lookup", &self.inner.lookup)
            .field("auth_scheme", &self.inner.auth_scheme)
            .field("skipper", &self.inner.skipper.is_some())
            .finish_non_exhaustive()
    }
}

/// Put the key auth gate in front of every route of `router`.
///
/// ```ignore
/// let gate = KeyAuth::with_validator(validator_fn(|key, _| key == "valid-key"))?;
/// let app = middleware::key_auth::apply(api::v1::routes(), gate);
/// ```
pub fn apply<S>(router: Router<S>, gate: KeyAuth) -> Router<S>
where
    S: Clone + Send + Sync + 'static,
{
    router.layer(middleware::from_fn_with_state(gate, key_auth_middleware))
}

async fn key_auth_middleware(
    State(gate): State<KeyAuth>,
    req: Request<Body>,
    next: Next,
) -> Result<Response, AppError> {
    let (mut parts, body) = req.into_parts();

    if !gate.skips(&parts) {
        gate.evaluate(&mut parts).await?;
    }

    Ok(next.run(Request::from_parts(parts, body)).await)
}
