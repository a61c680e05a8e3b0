use chrono::{Duration, TimeZone, Utc};

use super::*;
use crate::services::store::test_helpers::{FixedClock, MemoryStore, ana};

fn clock() -> FixedClock {
    FixedClock(Utc.with_ymd_and_hms(2025, 3, 10, 12, 0, 0).unwrap())
}

#[tokio::test]
async fn unknown_token_is_rejected() {
    let store = MemoryStore::new().with_user(ana());
    let v = validate_token(&store, &clock(), TokenPolicy::Reusable, "nope").await.unwrap();
    assert_eq!(v, Validation::Rejected);
}

#[tokio::test]
async fn used_token_is_rejected_even_when_unexpired() {
    let now = clock().0;
    let store = MemoryStore::new().with_token("abc123", ana().id, now + Duration::hours(1), true);
    let v = validate_token(&store, &clock(), TokenPolicy::Reusable, "abc123").await.unwrap();
    assert_eq!(v, Validation::Rejected);
}

#[tokio::test]
async fn expired_token_is_rejected_even_when_unused() {
    let now = clock().0;
    let store = MemoryStore::new().with_token("abc123", ana().id, now - Duration::seconds(1), false);
    let v = validate_token(&store, &clock(), TokenPolicy::Reusable, "abc123").await.unwrap();
    assert_eq!(v, Validation::Rejected);
}

#[tokio::test]
async fn expiry_equal_to_now_is_rejected() {
    let now = clock().0;
    let store = MemoryStore::new().with_token("abc123", ana().id, now, false);
    let v = validate_token(&store, &clock(), TokenPolicy::Reusable, "abc123").await.unwrap();
    assert_eq!(v, Validation::Rejected);
}

#[tokio::test]
async fn live_token_yields_user_id() {
    let now = clock().0;
    let store = MemoryStore::new().with_token("abc123", ana().id, now + Duration::hours(1), false);
    let v = validate_token(&store, &clock(), TokenPolicy::Reusable, "abc123").await.unwrap();
    assert_eq!(v, Validation::Valid { user_id: ana().id });
    assert!(!store.is_used("abc123"));
}

#[tokio::test]
async fn single_use_policy_consumes_token() {
    let now = clock().0;
    let store = MemoryStore::new().with_token("abc123", ana().id, now + Duration::hours(1), false);

    let first = validate_token(&store, &clock(), TokenPolicy::SingleUse, "abc123").await.unwrap();
    let second = validate_token(&store, &clock(), TokenPolicy::SingleUse, "abc123").await.unwrap();

    assert_eq!(first, Validation::Valid { user_id: ana().id });
    assert_eq!(second, Validation::Rejected);
}

#[tokio::test]
async fn blank_token_skips_the_store() {
    let store = MemoryStore::new();
    let v = validate_token(&store, &clock(), TokenPolicy::Reusable, "   ").await.unwrap();
    assert_eq!(v, Validation::Rejected);
    assert_eq!(store.lookup_count(), 0);
}

#[tokio::test]
async fn store_failure_is_an_error_not_a_rejection() {
    let store = MemoryStore::new().failing();
    let result = validate_token(&store, &clock(), TokenPolicy::Reusable, "abc123").await;
    assert!(matches!(result, Err(StoreError::Unavailable(_))));
}
