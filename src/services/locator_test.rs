use super::test_helpers::MemoryCache;
use super::*;

// =============================================================================
// PageLocation
// =============================================================================

#[test]
fn parse_splits_query_and_fragment() {
    let loc = PageLocation::parse("https://foca.ai/dashboard?x=1#/route?token=abc");
    assert_eq!(loc.query.as_deref(), Some("x=1"));
    assert_eq!(loc.fragment.as_deref(), Some("/route?token=abc"));
}

#[test]
fn parse_question_mark_after_hash_is_not_query() {
    let loc = PageLocation::parse("https://foca.ai/#/dashboard?token=abc");
    assert!(loc.query.is_none());
    assert_eq!(loc.fragment.as_deref(), Some("/dashboard?token=abc"));
}

#[test]
fn from_uri_has_no_fragment() {
    let uri: Uri = "/dashboard?token=abc".parse().unwrap();
    let loc = PageLocation::from_uri(&uri);
    assert_eq!(loc.query.as_deref(), Some("token=abc"));
    assert!(loc.fragment.is_none());
}

// =============================================================================
// locate_token precedence
// =============================================================================

#[test]
fn query_token_wins_over_cache() {
    let mut cache = MemoryCache(Some("cached".into()));
    let loc = PageLocation::parse("/dashboard?token=fresh");
    let found = locate_token(&loc, &mut cache).unwrap();
    assert_eq!(found, LocatedToken { value: "fresh".into(), source: TokenSource::Query });
}

#[test]
fn query_token_wins_over_fragment() {
    let mut cache = MemoryCache::default();
    let loc = PageLocation::parse("/?token=q#/x?token=f");
    assert_eq!(locate_token(&loc, &mut cache).unwrap().source, TokenSource::Query);
}

#[test]
fn fragment_token_used_when_query_has_none() {
    let mut cache = MemoryCache(Some("cached".into()));
    let loc = PageLocation::parse("https://foca.ai/?utm=1#/dashboard?token=hash123");
    let found = locate_token(&loc, &mut cache).unwrap();
    assert_eq!(found, LocatedToken { value: "hash123".into(), source: TokenSource::Fragment });
}

#[test]
fn fragment_without_question_mark_is_ignored() {
    let mut cache = MemoryCache::default();
    let loc = PageLocation::parse("/#token=abc");
    assert!(locate_token(&loc, &mut cache).is_none());
}

#[test]
fn cache_used_as_last_resort() {
    let mut cache = MemoryCache(Some("cached".into()));
    let loc = PageLocation::parse("/dashboard");
    let found = locate_token(&loc, &mut cache).unwrap();
    assert_eq!(found, LocatedToken { value: "cached".into(), source: TokenSource::Cache });
}

#[test]
fn nothing_anywhere_is_none() {
    let mut cache = MemoryCache::default();
    assert!(locate_token(&PageLocation::parse("/dashboard?x=1"), &mut cache).is_none());
}

#[test]
fn empty_token_param_is_absent() {
    let mut cache = MemoryCache(Some("cached".into()));
    let found = locate_token(&PageLocation::parse("/?token="), &mut cache).unwrap();
    assert_eq!(found.source, TokenSource::Cache);
}

#[test]
fn percent_encoded_token_is_decoded() {
    let mut cache = MemoryCache::default();
    let found = locate_token(&PageLocation::parse("/?token=a%2Bb"), &mut cache).unwrap();
    assert_eq!(found.value, "a+b");
}

#[test]
fn characters_invalid_in_a_uri_do_not_hide_the_token() {
    for location in ["/?x=a b&token=abc", "/?x=\"q\"&token=abc", "/?x=a|b&token=abc", "/#/r?x=<y>&token=abc"] {
        let mut cache = MemoryCache::default();
        let found = locate_token(&PageLocation::parse(location), &mut cache);
        assert_eq!(found.map(|t| t.value).as_deref(), Some("abc"), "{location}");
    }
}

#[test]
fn first_of_duplicate_token_params_wins() {
    let mut cache = MemoryCache::default();
    let found = locate_token(&PageLocation::parse("/?token=first&token=second"), &mut cache).unwrap();
    assert_eq!(found, LocatedToken { value: "first".into(), source: TokenSource::Query });
}

#[test]
fn token_is_passed_through_unchanged() {
    let mut cache = MemoryCache::default();
    let found = locate_token(&PageLocation::parse("/?token=%20abc%20"), &mut cache).unwrap();
    assert_eq!(found.value, " abc ");
    assert_eq!(cache.0.as_deref(), Some(" abc "));
}

#[test]
fn whitespace_only_token_is_absent() {
    let mut cache = MemoryCache::default();
    assert!(locate_token(&PageLocation::parse("/?token=+++"), &mut cache).is_none());
}

// =============================================================================
// write-through
// =============================================================================

#[test]
fn url_token_is_written_through_to_cache() {
    let mut cache = MemoryCache(Some("old".into()));
    locate_token(&PageLocation::parse("/?token=new"), &mut cache);
    assert_eq!(cache.0.as_deref(), Some("new"));
}

#[test]
fn cached_token_does_not_rewrite_cache() {
    let mut cache = MemoryCache(Some("kept".into()));
    locate_token(&PageLocation::parse("/"), &mut cache);
    assert_eq!(cache.0.as_deref(), Some("kept"));
}

// =============================================================================
// CookieTokenCache
// =============================================================================

#[test]
fn cookie_cache_round_trip() {
    let mut cache = CookieTokenCache::new(CookieJar::new(), true);
    assert!(cache.get().is_none());

    cache.put("abc123");
    assert_eq!(cache.get().as_deref(), Some("abc123"));
    let jar = cache.into_jar();
    let cookie = jar.get(CACHE_KEY).unwrap();
    assert_eq!(cookie.http_only(), Some(true));
    assert_eq!(cookie.secure(), Some(true));

    let mut cache = CookieTokenCache::new(jar, true);
    cache.clear();
    assert!(cache.get().is_none());
}

#[test]
fn redact_keeps_four_chars() {
    assert_eq!(redact("abc123"), "abc1…");
    assert_eq!(redact("ab"), "ab…");
}
