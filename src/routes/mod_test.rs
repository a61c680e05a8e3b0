use axum::http::StatusCode;

use super::test_helpers::*;
use crate::services::store::test_helpers::MemoryStore;

fn frontend_with_shell(name: &str) -> std::path::PathBuf {
    let dir = std::env::temp_dir().join(format!("focaai-{name}-{}", uuid::Uuid::new_v4()));
    std::fs::create_dir_all(&dir).unwrap();
    std::fs::write(dir.join("index.html"), "<div id=\"app\"></div>").unwrap();
    dir
}

#[tokio::test]
async fn healthz_returns_ok() {
    let response = send(test_app(MemoryStore::new()), get("/healthz")).await;
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn dashboard_without_token_redirects_to_auth() {
    let response = send(test_app(seeded_store()), get("/dashboard")).await;
    assert_eq!(response.status(), StatusCode::TEMPORARY_REDIRECT);
    assert_eq!(response.headers()["location"], "/auth");
}

#[tokio::test]
async fn dashboard_with_expired_token_redirects_and_evicts() {
    let response = send(test_app(seeded_store()), get_with_cookie("/dashboard", EXPIRED)).await;
    assert_eq!(response.status(), StatusCode::TEMPORARY_REDIRECT);
    assert!(set_cookies(&response).iter().any(|c| c.contains("Max-Age=0")));
}

#[tokio::test]
async fn dashboard_with_query_token_serves_shell_and_caches_token() {
    let dir = frontend_with_shell("shell");
    let app = test_app_serving(seeded_store(), dir.clone());

    let response = send(app, get(&format!("/dashboard?token={VALID}"))).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert!(set_cookies(&response).iter().any(|c| c.starts_with(&format!("auth_token_temp={VALID}"))));
    assert_eq!(body_text(response).await, "<div id=\"app\"></div>");

    std::fs::remove_dir_all(dir).ok();
}

#[tokio::test]
async fn nested_dashboard_page_accepts_cached_token() {
    let dir = frontend_with_shell("nested");
    let app = test_app_serving(seeded_store(), dir.clone());

    let response = send(app, get_with_cookie("/dashboard/financas", VALID)).await;
    assert_eq!(response.status(), StatusCode::OK);

    std::fs::remove_dir_all(dir).ok();
}

#[tokio::test]
async fn store_outage_redirects_instead_of_rendering() {
    let response = send(test_app(seeded_store().failing()), get_with_cookie("/dashboard", VALID)).await;
    assert_eq!(response.status(), StatusCode::TEMPORARY_REDIRECT);
    assert!(set_cookies(&response).is_empty());
}

#[tokio::test]
async fn missing_shell_is_not_found() {
    let dir = std::env::temp_dir().join(format!("focaai-empty-{}", uuid::Uuid::new_v4()));
    let app = test_app_serving(seeded_store(), dir);

    let response = send(app, get_with_cookie("/dashboard", VALID)).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn unknown_static_path_is_not_found() {
    let response = send(test_app(MemoryStore::new()), get("/nada-aqui.js")).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}
