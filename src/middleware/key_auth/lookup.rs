/*
 * Responsibility
 * - `"<source>:<name>"` 形式の key lookup 文字列をパースする (起動時に一度だけ)
 * - request parts から API key を取り出す (header / query / cookie)
 * - 副作用なし。見つからなければ None を返すだけ
 */
use std::fmt;
use std::str::FromStr;

use axum::http::{HeaderName, header, request::Parts};
use axum_extra::extract::cookie::CookieJar;

use super::config::KeyAuthConfigError;

/// Where the key lives in a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeySource {
    Header,
    Query,
    Cookie,
}

impl KeySource {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Header => "header",
            Self::Query => "query",
            Self::Cookie => "cookie",
        }
    }
}

impl FromStr for KeySource {
    type Err = KeyAuthConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "header" => Ok(Self::Header),
            "query" => Ok(Self::Query),
            "cookie" => Ok(Self::Cookie),
            other => Err(KeyAuthConfigError::UnknownSource(other.to_string())),
        }
    }
}

/// A parsed key lookup directive, e.g. `header:Authorization` or `query:key`.
///
/// Header names are validated (and normalized) at parse time so that a bad
/// directive never reaches request handling.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum KeyLookup {
    Header(HeaderName),
    Query(String),
    Cookie(String),
}

impl KeyLookup {
    pub fn source(&self) -> KeySource {
        match self {
            Self::Header(_) => KeySource::Header,
            Self::Query(_) => KeySource::Query,
            Self::Cookie(_) => KeySource::Cookie,
        }
    }

    pub fn name(&self) -> &str {
        match self {
            Self::Header(name) => name.as_str(),
            Self::Query(name) | Self::Cookie(name) => name,
        }
    }

    /// Extract the raw key from the request.
    ///
    /// - `Authorization` header: `"<scheme> <token>"`, split on the first space.
    ///   Only a scheme equal to `auth_scheme` (case-sensitive) yields the token.
    /// - any other header: the whole value, verbatim.
    /// - query / cookie: the (decoded) value.
    ///
    /// A present-but-empty value is returned as `Some("")`; the validator decides.
    pub fn extract(&self, parts: &Parts, auth_scheme: &str) -> Option<String> {
        match self {
            Self::Header(name) => {
                // 非 ASCII などで文字列化できない値は「無い」と同じ扱い
                let value = parts.headers.get(name)?.to_str().ok()?;
                if *name == header::AUTHORIZATION {
                    let (scheme, token) = value.split_once(' ')?;
                    (scheme == auth_scheme).then(|| token.to_string())
                } else {
                    Some(value.to_string())
                }
            }
            Self::Query(name) => {
                let query = parts.uri.query()?;
                url::form_urlencoded::parse(query.as_bytes())
                    .find(|(k, _)| k == name.as_str())
                    .map(|(_, v)| v.into_owned())
            }
            Self::Cookie(name) => {
                // 期限切れ cookie はクライアント側が送ってこない前提 (ここでは再チェックしない)
                // `token="k"` のような quoted value は quote を外す
                let jar = CookieJar::from_headers(&parts.headers);
                jar.get(name).map(|c| c.value_trimmed().to_string())
            }
        }
    }
}

impl FromStr for KeyLookup {
    type Err = KeyAuthConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (source, name) = s
            .split_once(':')
            .ok_or_else(|| KeyAuthConfigError::InvalidLookup(s.to_string()))?;

        let source: KeySource = source.parse()?;
        if name.is_empty() {
            return Err(KeyAuthConfigError::EmptyName(source.as_str()));
        }

        match source {
            KeySource::Header => HeaderName::from_bytes(name.as_bytes())
                .map(Self::Header)
                .map_err(|_| KeyAuthConfigError::InvalidHeaderName(name.to_string())),
            KeySource::Query => Ok(Self::Query(name.to_string())),
            KeySource::Cookie => Ok(Self::Cookie(name.to_string())),
        }
    }
}

impl fmt::Display for KeyLookup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.source().as_str(), self.name())
    }
}
