/*
 * Responsibility
 * - 環境変数や設定の読み込み (PORT, KEY_LOOKUP, AUTH_SCHEME, API_KEYS など)
 * - 設定値のバリデーション (不足・不正なら起動失敗)
 */
use std::net::SocketAddr;
use std::time::Duration;

use thiserror::Error;

use crate::middleware::http::HttpConfig;
use crate::middleware::key_auth::{DEFAULT_AUTH_SCHEME, DEFAULT_KEY_LOOKUP, KeyAuthConfig};
use crate::services::validator::{StaticKeyValidator, StaticKeysError};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppEnv {
    Development,
    Production,
}

impl AppEnv {
    fn parse(value: Option<String>) -> Self {
        match value
            .unwrap_or_else(|| "development".to_string())
            .to_ascii_lowercase()
            .as_str()
        {
            "production" | "prod" => Self::Production,
            _ => Self::Development,
        }
    }

    pub fn is_production(&self) -> bool {
        matches!(self, Self::Production)
    }
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing configuration: {0}")]
    Missing(&'static str),
    #[error("invalid configuration: {0}")]
    Invalid(&'static str),
    #[error("invalid configuration: API_KEYS: {0}")]
    ApiKeys(#[from] StaticKeysError),
}

#[derive(Debug)]
pub struct Config {
    pub addr: SocketAddr,
    pub app_env: AppEnv,
    pub key_auth: KeyAuthConfig,
    pub api_keys: StaticKeyValidator,
    pub http: HttpConfig,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();
        Self::from_source(|key| std::env::var(key).ok())
    }

    /// Build from any key/value source (env in production, a map in tests).
    pub fn from_source<F>(get: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let port: u16 = match get("PORT") {
            Some(v) => v.parse().map_err(|_| ConfigError::Invalid("PORT"))?,
            None => 3000,
        };
        let addr = SocketAddr::from(([0, 0, 0, 0], port));

        let app_env = AppEnv::parse(get("APP_ENV"));

        // KEY_LOOKUP のパースは KeyAuthBuilder::build で行う (起動時に失敗させる)
        let key_auth = KeyAuthConfig {
            key_lookup: get("KEY_LOOKUP").unwrap_or_else(|| DEFAULT_KEY_LOOKUP.to_string()),
            auth_scheme: get("AUTH_SCHEME").unwrap_or_else(|| DEFAULT_AUTH_SCHEME.to_string()),
        };

        let api_keys = get("API_KEYS").ok_or(ConfigError::Missing("API_KEYS"))?;
        let api_keys = StaticKeyValidator::parse(&api_keys)?;

        let defaults = HttpConfig::default();
        let timeout = match get("REQUEST_TIMEOUT_SECS") {
            Some(v) => v
                .parse::<u64>()
                .ok()
                .filter(|secs| *secs > 0)
                .map(Duration::from_secs)
                .ok_or(ConfigError::Invalid("REQUEST_TIMEOUT_SECS"))?,
            None => defaults.timeout,
        };
        let body_limit_bytes = match get("BODY_LIMIT_BYTES") {
            Some(v) => v
                .parse::<usize>()
                .map_err(|_| ConfigError::Invalid("BODY_LIMIT_BYTES"))?,
            None => defaults.body_limit_bytes,
        };

        Ok(Self {
            addr,
            app_env,
            key_auth,
            api_keys,
            http: HttpConfig {
                body_limit_bytes,
                timeout,
            },
        })
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn load(pairs: &[(&str, &str)]) -> Result<Config, ConfigError> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Config::from_source(|key| map.get(key).cloned())
    }

    #[test]
    fn defaults() {
        let config = load(&[("API_KEYS", "ci=valid-key")]).unwrap();
        assert_eq!(config.addr.port(), 3000);
        assert_eq!(config.app_env, AppEnv::Development);
        assert_eq!(config.key_auth, KeyAuthConfig::default());
        assert_eq!(config.api_keys.len(), 1);
        assert_eq!(config.http, HttpConfig::default());
    }

    #[test]
    fn overrides() {
        let config = load(&[
            ("API_KEYS", "a,b"),
            ("PORT", "8080"),
            ("APP_ENV", "PROD"),
            ("KEY_LOOKUP", "query:key"),
            ("AUTH_SCHEME", "ApiKey"),
            ("REQUEST_TIMEOUT_SECS", "5"),
            ("BODY_LIMIT_BYTES", "2048"),
        ])
        .unwrap();
        assert_eq!(config.addr.port(), 8080);
        assert!(config.app_env.is_production());
        assert_eq!(config.key_auth.key_lookup, "query:key");
        assert_eq!(config.key_auth.auth_scheme, "ApiKey");
        assert_eq!(config.api_keys.len(), 2);
        assert_eq!(config.http.timeout, Duration::from_secs(5));
        assert_eq!(config.http.body_limit_bytes, 2048);
    }

    #[test]
    fn api_keys_are_required() {
        assert!(matches!(load(&[]), Err(ConfigError::Missing("API_KEYS"))));
        assert!(matches!(
            load(&[("API_KEYS", " ")]),
            Err(ConfigError::ApiKeys(StaticKeysError::Empty))
        ));
    }

    #[test]
    fn invalid_numbers_fail() {
        assert!(matches!(
            load(&[("API_KEYS", "k"), ("PORT", "http")]),
            Err(ConfigError::Invalid("PORT"))
        ));
        assert!(matches!(
            load(&[("API_KEYS", "k"), ("REQUEST_TIMEOUT_SECS", "0")]),
            Err(ConfigError::Invalid("REQUEST_TIMEOUT_SECS"))
        ));
    }
}
