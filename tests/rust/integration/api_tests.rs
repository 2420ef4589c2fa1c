//! HTTP API tests: routing, pagination windows and error status mapping

use std::sync::Arc;
use std::sync::atomic::Ordering;

use axum::http::StatusCode;

use super::support::{BASE_URL, MemoryStore, app, app_with_graph, get};

#[tokio::test]
async fn test_health() {
    let (status, body) = get(app(Arc::new(MemoryStore::default())), "/health").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "healthy");
    assert_eq!(body["version"], env!("CARGO_PKG_VERSION"));
}

#[tokio::test]
async fn test_health_when_graph_is_down() {
    let store = Arc::new(MemoryStore::default());
    let (status, body) = get(app_with_graph(store.clone(), false), "/health").await;
    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(body["status"], "unhealthy");
    assert_eq!(body["message"], "no results were found");
    assert_eq!(store.calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_code_lists_default_window() {
    let (status, body) = get(app(Arc::new(MemoryStore::default())), "/code-lists").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["count"], 2);
    assert_eq!(body["offset"], 0);
    assert_eq!(body["limit"], 2);
    assert_eq!(body["total_count"], 2);
    assert_eq!(body["items"][0]["id"], "abc");
    assert_eq!(
        body["items"][0]["links"]["self"]["href"],
        format!("{}/code-lists/abc", BASE_URL)
    );
}

#[tokio::test]
async fn test_code_list() {
    let (status, body) = get(app(Arc::new(MemoryStore::default())), "/code-lists/def").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["id"], "def");
    assert_eq!(
        body["links"]["editions"]["href"],
        format!("{}/code-lists/def/editions", BASE_URL)
    );
}

#[tokio::test]
async fn test_code_list_not_found() {
    let (status, body) = get(app(Arc::new(MemoryStore::default())), "/code-lists/nope").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "code list not found");
}

#[tokio::test]
async fn test_editions_page() {
    let (status, body) = get(
        app(Arc::new(MemoryStore::default())),
        "/code-lists/abc/editions?offset=1&limit=1",
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["count"], 1);
    assert_eq!(body["offset"], 1);
    assert_eq!(body["limit"], 1);
    assert_eq!(body["total_count"], 2);
    assert_eq!(body["items"][0]["edition"], "2017");
}

#[tokio::test]
async fn test_editions_of_unknown_code_list() {
    let (status, _) = get(app(Arc::new(MemoryStore::default())), "/code-lists/def/editions").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_edition() {
    let (status, body) = get(
        app(Arc::new(MemoryStore::default())),
        "/code-lists/abc/editions/2016",
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["edition"], "2016");
    assert_eq!(body["label"], "Twenty sixteen");
    assert_eq!(
        body["links"]["codes"]["href"],
        format!("{}/code-lists/abc/editions/2016/codes", BASE_URL)
    );
}

#[tokio::test]
async fn test_codes_limit_is_clamped() {
    let (status, body) = get(
        app(Arc::new(MemoryStore::default())),
        "/code-lists/abc/editions/2016/codes?limit=500",
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["limit"], 2);
    assert_eq!(body["count"], 2);
    assert_eq!(body["total_count"], 3);
    assert_eq!(body["items"][1]["code"], "c2");
}

#[tokio::test]
async fn test_codes_offset_beyond_total() {
    let (status, body) = get(
        app(Arc::new(MemoryStore::default())),
        "/code-lists/abc/editions/2016/codes?offset=10&limit=1",
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["count"], 0);
    assert_eq!(body["total_count"], 3);
    assert_eq!(body["items"].as_array().map(Vec::len), Some(0));
}

#[tokio::test]
async fn test_codes_missing_edition() {
    let (status, body) = get(
        app(Arc::new(MemoryStore::default())),
        "/code-lists/abc/editions/1999/codes",
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "edition not found");
}

#[tokio::test]
async fn test_codes_empty_edition() {
    let (status, body) = get(
        app(Arc::new(MemoryStore::default())),
        "/code-lists/abc/editions/2017/codes",
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "codes not found");
}

#[tokio::test]
async fn test_integrity_failures_are_internal_errors() {
    let (status, body) = get(
        app(Arc::new(MemoryStore::default())),
        "/code-lists/broken/editions/2016/codes",
    )
    .await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["error"], "internal error");

    let (status, _) = get(
        app(Arc::new(MemoryStore::default())),
        "/code-lists/broken/editions/2016/codes/c1",
    )
    .await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
}

#[tokio::test]
async fn test_code() {
    let (status, body) = get(
        app(Arc::new(MemoryStore::default())),
        "/code-lists/abc/editions/2016/codes/c1",
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["id"], "1");
    assert_eq!(body["code"], "c1");
    assert_eq!(body["links"]["self"]["id"], "c1");
    assert_eq!(
        body["links"]["datasets"]["href"],
        format!("{}/code-lists/abc/editions/2016/codes/c1/datasets", BASE_URL)
    );
}

#[tokio::test]
async fn test_code_not_found() {
    let (status, _) = get(
        app(Arc::new(MemoryStore::default())),
        "/code-lists/abc/editions/2016/codes/zz",
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_bad_pagination_never_reaches_the_store() {
    let store = Arc::new(MemoryStore::default());

    for uri in [
        "/code-lists?offset=-1",
        "/code-lists?limit=abc",
        "/code-lists/abc/editions?limit=-3",
        "/code-lists/abc/editions/2016/codes?offset=x",
    ] {
        let (status, body) = get(app(store.clone()), uri).await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "{}", uri);
        assert!(body["error"].as_str().is_some_and(|e| e.contains("invalid")));
    }

    assert_eq!(store.calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_malformed_query_string_is_json_bad_request() {
    let store = Arc::new(MemoryStore::default());
    let (status, body) = get(app(store.clone()), "/code-lists?limit=1&limit=2").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].as_str().is_some_and(|e| e.contains("limit")));
    assert_eq!(store.calls.load(Ordering::SeqCst), 0);
}
