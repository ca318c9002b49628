//! Validator backed by a fixed set of keys (from config).
//!
//! Keys are held as SHA-256 digests and compared in constant time. On a match
//! the entry's label is attached to the request as [`KeyIdentity`].

use async_trait::async_trait;
use axum::http::request::Parts;
use sha2::{Digest, Sha256};
use subtle::ConstantTimeEq;

use super::{KeyIdentity, Validator, ValidatorError};

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum StaticKeysError {
    #[error("no api keys configured")]
    Empty,
    #[error("api key entry #{0} is empty")]
    EmptyKey(usize),
}

struct Entry {
    label: String,
    digest: [u8; 32],
}

pub struct StaticKeyValidator {
    entries: Vec<Entry>,
}

impl StaticKeyValidator {
    pub fn new<I, L, K>(keys: I) -> Result<Self, StaticKeysError>
    where
        I: IntoIterator<Item = (L, K)>,
        L: Into<String>,
        K: AsRef<str>,
    {
        let entries = keys
            .into_iter()
            .enumerate()
            .map(|(i, (label, key))| {
                let key = key.as_ref();
                if key.is_empty() {
                    return Err(StaticKeysError::EmptyKey(i));
                }
                Ok(Entry {
                    label: label.into(),
                    digest: digest(key),
                })
            })
            .collect::<Result<Vec<_>, _>>()?;

        if entries.is_empty() {
            return Err(StaticKeysError::Empty);
        }
        Ok(Self { entries })
    }

    /// Parse `label=key,label=key,...`. A bare `key` gets its position as label.
    pub fn parse(list: &str) -> Result<Self, StaticKeysError> {
        let keys = list
            .split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .enumerate()
            .map(|(i, item)| match item.split_once('=') {
                Some((label, key)) => (label.trim().to_string(), key.trim().to_string()),
                None => (format!("key-{i}"), item.to_string()),
            })
            .collect::<Vec<_>>();

        Self::new(keys)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn find(&self, key: &str) -> Option<&str> {
        let presented = digest(key);
        // 早期 return せず全件比較する
        let mut matched = None;
        for entry in &self.entries {
            if bool::from(entry.digest[..].ct_eq(&presented[..])) && matched.is_none() {
                matched = Some(entry.label.as_str());
            }
        }
        matched
    }
}

impl std::fmt::Debug for StaticKeyValidator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StaticKeyValidator")
            .field("keys", &self.entries.len())
            .finish()
    }
}

#[async_trait]
impl Validator for StaticKeyValidator {
    async fn validate(&self, key: &str, ctx: &mut Parts) -> Result<bool, ValidatorError> {
        match self.find(key) {
            Some(label) => {
                ctx.extensions.insert(KeyIdentity::new(label));
                Ok(true)
            }
            None => Ok(false),
        }
    }
}

fn digest(key: &str) -> [u8; 32] {
    Sha256::digest(key.as_bytes()).into()
}

#[cfg(test)]
mod tests {
    use axum::http::Request;

    use super::*;

    #[test]
    fn parse_labels_and_bare_keys() {
        let v = StaticKeyValidator::parse(" ci = k1 , k2,, ").unwrap();
        assert_eq!(v.len(), 2);
        assert_eq!(v.find("k1"), Some("ci"));
        assert_eq!(v.find("k2"), Some("key-1"));
        assert_eq!(v.find("k3"), None);
    }

    #[test]
    fn parse_rejects_empty_input() {
        assert_eq!(
            StaticKeyValidator::parse(" , ").unwrap_err(),
            StaticKeysError::Empty
        );
        assert_eq!(
            StaticKeyValidator::parse("ci=").unwrap_err(),
            StaticKeysError::EmptyKey(0)
        );
    }

    #[tokio::test]
    async fn match_attaches_identity() {
        let v = StaticKeyValidator::new([("deploy-bot", "valid-key")]).unwrap();
        let (mut parts, _) = Request::get("/").body(()).unwrap().into_parts();

        assert!(v.validate("valid-key", &mut parts).await.unwrap());
        assert_eq!(
            parts.extensions.get::<KeyIdentity>().map(KeyIdentity::label),
            Some("deploy-bot")
        );
    }

    #[tokio::test]
    async fn mismatch_leaves_request_alone() {
        let v = StaticKeyValidator::new([("deploy-bot", "valid-key")]).unwrap();
        let (mut parts, _) = Request::get("/").body(()).unwrap().into_parts();

        assert!(!v.validate("valid-key ", &mut parts).await.unwrap());
        assert!(!v.validate("", &mut parts).await.unwrap());
        assert!(parts.extensions.get::<KeyIdentity>().is_none());
    }

    #[test]
    fn debug_does_not_leak_keys() {
        let v = StaticKeyValidator::new([("a", "secret-value")]).unwrap();
        assert!(!format!("{v:?}").contains("secret-value"));
    }
}
