/*
 * Responsibility
 * - KeyAuth の設定値 (key lookup / auth scheme) とデフォルト値
 * - Builder で validator / skipper を受け取り、起動時に KeyAuth を組み立てる
 * - 設定ミス (パース不可・validator 未指定) は起動時エラー。リクエスト時には持ち越さない
 */
use std::sync::Arc;

use axum::http::request::Parts;
use serde::Deserialize;
use thiserror::Error;

use super::core::{KeyAuth, Skipper};
use super::lookup::KeyLookup;
use crate::services::validator::Validator;

pub const DEFAULT_KEY_LOOKUP: &str = "header:Authorization";
pub const DEFAULT_AUTH_SCHEME: &str = "Bearer";

#[derive(Debug, Error, PartialEq, Eq)]
pub enum KeyAuthConfigError {
    #[error("invalid key lookup {0:?}: expected \"<source>:<name>\"")]
    InvalidLookup(String),
    #[error("unknown key lookup source {0:?}: expected header, query or cookie")]
    UnknownSource(String),
    #[error("key lookup for {0} has an empty name")]
    EmptyName(&'static str),
    #[error("invalid header name {0:?} in key lookup")]
    InvalidHeaderName(String),
    #[error("invalid auth scheme {0:?}: must be non-empty and contain no whitespace")]
    InvalidAuthScheme(String),
    #[error("key auth requires a validator")]
    MissingValidator,
}

/// Plain settings for the key auth gate.
///
/// `Default` is the explicit default value (`header:Authorization`, `Bearer`).
/// It is replaced as a whole; there is no field-level merge.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct KeyAuthConfig {
    pub key_lookup: String,
    pub auth_scheme: String,
}

impl Default for KeyAuthConfig {
    fn default() -> Self {
        Self {
            key_lookup: DEFAULT_KEY_LOOKUP.to_string(),
            auth_scheme: DEFAULT_AUTH_SCHEME.to_string(),
        }
    }
}

#[derive(Default)]
pub struct KeyAuthBuilder {
    config: KeyAuthConfig,
    validator: Option<Arc<dyn Validator>>,
    skipper: Option<Skipper>,
}

impl KeyAuthBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn config(mut self, config: KeyAuthConfig) -> Self {
        self.config = config;
        self
    }

    pub fn validator(mut self, validator: impl Validator + 'static) -> Self {
        self.validator = Some(Arc::new(validator));
        self
    }

    pub fn shared_validator(mut self, validator: Arc<dyn Validator>) -> Self {
        self.validator = Some(validator);
        self
    }

    /// Requests for which `skipper` returns true bypass the gate entirely.
    pub fn skipper<F>(mut self, skipper: F) -> Self
    where
        F: Fn(&Parts) -> bool + Send + Sync + 'static,
    {
        self.skipper = Some(Arc::new(skipper));
        self
    }

    pub fn build(self) -> Result<KeyAuth, KeyAuthConfigError> {
        let lookup: KeyLookup = self.config.key_lookup.parse()?;
        // "<scheme> <token>" を最初の空白で分割するため、scheme 自体に空白は含められない
        let scheme = &self.config.auth_scheme;
        if scheme.is_empty() || scheme.chars().any(char::is_whitespace) {
            return Err(KeyAuthConfigError::InvalidAuthScheme(scheme.clone()));
        }
        let validator = self
            .validator
            .ok_or(KeyAuthConfigError::MissingValidator)?;

        Ok(KeyAuth::new(
            lookup,
            self.config.auth_scheme,
            validator,
            self.skipper,
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::middleware::key_auth::lookup::KeySource;
    use crate::services::validator::validator_fn;

    #[test]
    fn defaults_read_bearer_from_authorization() {
        let gate = KeyAuthBuilder::new()
            .validator(validator_fn(|_, _| true))
            .build()
            .unwrap();
        assert_eq!(gate.lookup().source(), KeySource::Header);
        assert_eq!(gate.lookup().name(), "authorization");
        assert_eq!(gate.auth_scheme(), "Bearer");
    }

    #[test]
    fn missing_validator_fails_at_build() {
        let err = KeyAuthBuilder::new().build().unwrap_err();
        assert_eq!(err, KeyAuthConfigError::MissingValidator);
    }

    #[test]
    fn bad_lookup_fails_at_build() {
        let err = KeyAuthBuilder::new()
            .config(KeyAuthConfig {
                key_lookup: "body:key".into(),
                ..KeyAuthConfig::default()
            })
            .validator(validator_fn(|_, _| true))
            .build()
            .unwrap_err();
        assert_eq!(err, KeyAuthConfigError::UnknownSource("body".into()));
    }

    #[test]
    fn bad_auth_scheme_fails_at_build() {
        for scheme in ["", "Bearer token", " Bearer", "Bearer\t"] {
            let err = KeyAuthBuilder::new()
                .config(KeyAuthConfig {
                    auth_scheme: scheme.into(),
                    ..KeyAuthConfig::default()
                })
                .validator(validator_fn(|_, _| true))
                .build()
                .unwrap_err();
            assert_eq!(err, KeyAuthConfigError::InvalidAuthScheme(scheme.into()));
        }
    }

    #[test]
    fn config_deserializes_with_defaults() {
        let config: KeyAuthConfig = serde_json::from_str(r#"{"key_lookup":"query:key"}"#).unwrap();
        assert_eq!(config.key_lookup, "query:key");
        assert_eq!(config.auth_scheme, DEFAULT_AUTH_SCHEME);

        let config: KeyAuthConfig = serde_json::from_str("{}").unwrap();
        assert_eq!(config, KeyAuthConfig::default());
    }
}
