//! Token locator — finds the access token a page load arrived with.
//!
//! DESIGN
//! ======
//! Three places are checked in a fixed order:
//! 1. `token` in the URL query string.
//! 2. `token` in the query portion of the hash fragment (`#/route?token=...`),
//!    where hash-based client routers leave it.
//! 3. The persisted [`TokenCache`], which survives redirects that strip the URL.
//!
//! A token found in the URL is written through to the cache so a redirect
//! before validation finishes does not lose it.

use axum::http::Uri;
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};

/// Name of the query parameter (and the fragment parameter) carrying the token.
pub const TOKEN_PARAM: &str = "token";

/// Well-known key of the persisted token cache.
pub const CACHE_KEY: &str = "auth_token_temp";

// =============================================================================
// PAGE LOCATION
// =============================================================================

/// The parts of a page URL the locator looks at.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PageLocation {
    pub query: Option<String>,
    pub fragment: Option<String>,
}

impl PageLocation {
    /// Split a full or relative URL into its query string and fragment.
    #[must_use]
    pub fn parse(location: &str) -> Self {
        let (before_hash, fragment) = match location.split_once('#') {
            Some((head, frag)) => (head, Some(frag.to_owned())),
            None => (location, None),
        };
        let query = before_hash.split_once('?').map(|(_, q)| q.to_owned());
        Self { query, fragment }
    }

    /// Location of an HTTP request. Browsers never send the fragment.
    #[must_use]
    pub fn from_uri(uri: &Uri) -> Self {
        Self { query: uri.query().map(str::to_owned), fragment: None }
    }

    fn query_token(&self) -> Option<String> {
        self.query.as_deref().and_then(token_from_query)
    }

    fn fragment_token(&self) -> Option<String> {
        self.fragment
            .as_deref()
            .and_then(|frag| frag.split_once('?'))
            .and_then(|(_, q)| token_from_query(q))
    }
}

/// First non-empty `token` parameter of a raw (undecoded) query string.
fn token_from_query(raw: &str) -> Option<String> {
    let pairs: Vec<(String, String)> = serde_urlencoded::from_str(raw).ok()?;
    pairs
        .into_iter()
        .find(|(key, _)| key == TOKEN_PARAM)
        .map(|(_, value)| value)
        .filter(|t| !t.trim().is_empty())
}

// =============================================================================
// TOKEN CACHE
// =============================================================================

/// Persisted single-key store holding the last seen, not yet rejected token.
pub trait TokenCache {
    fn get(&self) -> Option<String>;
    fn put(&mut self, token: &str);
    fn clear(&mut self);
}

/// Token cache backed by the client's `auth_token_temp` cookie.
///
/// Mutations accumulate in the wrapped jar; return [`CookieTokenCache::into_jar`]
/// from the handler so the `Set-Cookie` headers reach the client.
pub struct CookieTokenCache {
    jar: CookieJar,
    secure: bool,
}

impl CookieTokenCache {
    #[must_use]
    pub fn new(jar: CookieJar, secure: bool) -> Self {
        Self { jar, secure }
    }

    #[must_use]
    pub fn into_jar(self) -> CookieJar {
        self.jar
    }
}

impl TokenCache for CookieTokenCache {
    fn get(&self) -> Option<String> {
        self.jar
            .get(CACHE_KEY)
            .map(|c| c.value().to_owned())
            .filter(|v| !v.trim().is_empty())
    }

    fn put(&mut self, token: &str) {
        let cookie = Cookie::build((CACHE_KEY, token.to_owned()))
            .path("/")
            .http_only(true)
            .same_site(SameSite::Lax)
            .secure(self.secure)
            .max_age(time::Duration::days(1));
        self.jar = self.jar.clone().add(cookie);
    }

    fn clear(&mut self) {
        let cookie = Cookie::build((CACHE_KEY, ""))
            .path("/")
            .http_only(true)
            .same_site(SameSite::Lax)
            .secure(self.secure)
            .max_age(time::Duration::ZERO);
        self.jar = self.jar.clone().add(cookie);
    }
}

// =============================================================================
// LOCATOR
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenSource {
    Query,
    Fragment,
    Cache,
}

impl TokenSource {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Query => "query",
            Self::Fragment => "fragment",
            Self::Cache => "cache",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocatedToken {
    pub value: String,
    pub source: TokenSource,
}

/// Find the token for this load, writing a URL-borne token through to the cache.
pub fn locate_token<C: TokenCache + ?Sized>(location: &PageLocation, cache: &mut C) -> Option<LocatedToken> {
    let from_url = location
        .query_token()
        .map(|value| LocatedToken { value, source: TokenSource::Query })
        .or_else(|| {
            location
                .fragment_token()
                .map(|value| LocatedToken { value, source: TokenSource::Fragment })
        });

    if let Some(found) = from_url {
        cache.put(&found.value);
        return Some(found);
    }

    cache
        .get()
        .map(|value| LocatedToken { value, source: TokenSource::Cache })
}

/// First characters of a token, safe to put in logs.
#[must_use]
pub fn redact(token: &str) -> String {
    let prefix: String = token.chars().take(4).collect();
    format!("{prefix}…")
}


#[cfg(test)]
#[path = "locator_test.rs"]
mod tests;
