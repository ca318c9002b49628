/*
 * Responsibility
 * - API key 認証 gate の公開インターフェース (re-export)
 * - lookup: key の取り出し / config: 設定と builder / core: 判定と middleware
 */
mod config;
mod core;
mod lookup;

pub use config::{
    DEFAULT_AUTH_SCHEME, DEFAULT_KEY_LOOKUP, KeyAuthBuilder, KeyAuthConfig, KeyAuthConfigError,
};
pub use self::core::{KeyAuth, KeyAuthRejection, Skipper, apply};
pub use lookup::{KeyLookup, KeySource};
