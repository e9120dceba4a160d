//! # 管理 API 集成测试
//!
//! 通过完整路由器验证认证、权限、参数校验与导出响应头

use axum::Router;
use axum::body::{Body, to_bytes};
use axum::http::{Method, Request, StatusCode, header};
use pretty_assertions::assert_eq;
use serde_json::Value;
use std::sync::Arc;
use tower::ServiceExt;
use usage_ledger::AppConfig;
use usage_ledger::auth::JwtManager;
use usage_ledger::management::{ManagementState, server::build_router};
use usage_ledger::testing::{LogFixture, create_test_db, seed_logs};
use usage_ledger::usage::SeaOrmLogStore;

const SECRET: &str = "integration-test-secret-with-enough-length";
const BASE: i64 = 1_700_000_000;

struct TestApp {
    router: Router,
    jwt: JwtManager,
}

impl TestApp {
    async fn new(fixtures: Vec<LogFixture>) -> Self {
        let db = create_test_db().await;
        seed_logs(&db, fixtures).await;

        let mut config = AppConfig::default();
        config.auth.jwt_secret = SECRET.to_string();
        let jwt = JwtManager::new(Arc::new(config.auth.clone()));

        let state = ManagementState::new(Arc::new(config), Arc::new(SeaOrmLogStore::new(db)));
        Self {
            router: build_router(state),
            jwt,
        }
    }

    fn token(&self, user_id: i32, username: &str, is_admin: bool) -> String {
        self.jwt
            .generate_access_token(user_id, username.to_string(), is_admin)
            .unwrap()
    }

    async fn send(&self, method: Method, uri: &str, token: Option<&str>) -> axum::response::Response {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(token) = token {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
        }
        self.router
            .clone()
            .oneshot(builder.body(Body::empty()).unwrap())
            .await
            .unwrap()
    }
}

async fn body_json(response: axum::response::Response) -> Value {
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

fn fixtures() -> Vec<LogFixture> {
    vec![
        LogFixture::new().user(1, "alice").at(BASE).quota(100),
        LogFixture::new().user(1, "alice").at(BASE + 1).quota(200),
        LogFixture::new().user(2, "bob").at(BASE + 2).quota(300),
    ]
}

#[tokio::test]
async fn test_ping_is_public() {
    let app = TestApp::new(Vec::new()).await;
    let response = app.send(Method::GET, "/ping", None).await;

    assert_eq!(response.status(), StatusCode::OK);
    assert!(response.headers().contains_key("x-request-id"));
    let body = body_json(response).await;
    assert_eq!(body["data"]["service"], "usage-ledger");
}

#[tokio::test]
async fn test_missing_token_is_unauthorized() {
    let app = TestApp::new(fixtures()).await;
    let response = app.send(Method::GET, "/api/log", None).await;

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    let body = body_json(response).await;
    assert_eq!(body["error"]["code"], "AUTH_ERROR");
}

#[tokio::test]
async fn test_invalid_token_is_unauthorized() {
    let app = TestApp::new(fixtures()).await;
    let response = app
        .send(Method::GET, "/api/log/self", Some("not-a-jwt"))
        .await;

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_non_admin_is_forbidden_on_admin_routes() {
    let app = TestApp::new(fixtures()).await;
    let token = app.token(1, "alice", false);

    for uri in ["/api/log", "/api/log/stat", "/api/log/export", "/api/log/token?key=x"] {
        let response = app.send(Method::GET, uri, Some(token.as_str())).await;
        assert_eq!(response.status(), StatusCode::FORBIDDEN, "{uri}");
    }
}

#[tokio::test]
async fn test_admin_list_is_paginated() {
    let app = TestApp::new(fixtures()).await;
    let token = app.token(99, "root", true);

    let response = app
        .send(Method::GET, "/api/log?p=1&page_size=2", Some(token.as_str()))
        .await;
    assert_eq!(response.status(), StatusCode::OK);

    let body = body_json(response).await;
    assert_eq!(body["success"], true);
    assert_eq!(body["pagination"]["total"], 3);
    assert_eq!(body["pagination"]["pages"], 2);
    assert_eq!(body["data"].as_array().unwrap().len(), 2);
    assert_eq!(body["data"][0]["created_at"], BASE + 2);
    assert_eq!(body["data"][0]["type"], 2);
    assert_eq!(body["data"][0]["token_id"], 0);
}

#[tokio::test]
async fn test_self_list_only_returns_own_rows() {
    let app = TestApp::new(fixtures()).await;
    let token = app.token(1, "alice", false);

    let response = app
        .send(Method::GET, "/api/log/self?username=bob", Some(token.as_str()))
        .await;
    assert_eq!(response.status(), StatusCode::OK);

    let body = body_json(response).await;
    let rows = body["data"].as_array().unwrap();
    assert_eq!(rows.len(), 2);
    assert!(rows.iter().all(|row| row["user_id"] == 1));
}

#[tokio::test]
async fn test_self_stat_sums_own_quota() {
    let app = TestApp::new(fixtures()).await;
    let token = app.token(1, "alice", false);

    let response = app.send(Method::GET, "/api/log/self/stat", Some(token.as_str())).await;
    assert_eq!(response.status(), StatusCode::OK);

    let body = body_json(response).await;
    assert_eq!(body["data"]["quota"], 300);
}

#[tokio::test]
async fn test_unknown_type_is_rejected() {
    let app = TestApp::new(fixtures()).await;
    let token = app.token(99, "root", true);

    let response = app.send(Method::GET, "/api/log?type=42", Some(token.as_str())).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_delete_requires_target_timestamp() {
    let app = TestApp::new(fixtures()).await;
    let token = app.token(99, "root", true);

    let response = app.send(Method::DELETE, "/api/log", Some(token.as_str())).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let body = body_json(response).await;
    assert_eq!(body["error"]["code"], "VALIDATION_ERROR");
    assert_eq!(body["error"]["field"], "target_timestamp");
}

#[tokio::test]
async fn test_delete_reports_removed_rows() {
    let app = TestApp::new(fixtures()).await;
    let token = app.token(99, "root", true);
    let uri = format!("/api/log?target_timestamp={}", BASE + 2);

    let body = body_json(app.send(Method::DELETE, &uri, Some(token.as_str())).await).await;
    assert_eq!(body["data"]["deleted"], 2);

    let body = body_json(app.send(Method::DELETE, &uri, Some(token.as_str())).await).await;
    assert_eq!(body["data"]["deleted"], 0);
}

#[tokio::test]
async fn test_export_sets_download_headers() {
    let app = TestApp::new(fixtures()).await;
    let token = app.token(99, "root", true);

    let response = app.send(Method::GET, "/api/log/export", Some(token.as_str())).await;
    assert_eq!(response.status(), StatusCode::OK);

    let headers = response.headers();
    assert_eq!(headers[header::CONTENT_TYPE], "text/csv; charset=utf-8");
    assert_eq!(headers[header::CACHE_CONTROL], "no-cache");
    let disposition = headers[header::CONTENT_DISPOSITION].to_str().unwrap();
    assert!(disposition.starts_with("attachment; filename=\"logs_"));
    assert!(disposition.contains("filename*=UTF-8''logs_"));

    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    assert!(bytes.starts_with(b"\xEF\xBB\xBF"));
    let text = String::from_utf8(bytes.to_vec()).unwrap();
    assert_eq!(text.lines().count(), 4);
}

#[tokio::test]
async fn test_search_by_key_strips_prefix() {
    let app = TestApp::new(vec![
        LogFixture::new().at(BASE).request_key("req-1"),
        LogFixture::new().at(BASE + 1).request_key("req-1"),
    ])
    .await;
    let token = app.token(99, "root", true);

    let body = body_json(
        app.send(Method::GET, "/api/log/token?key=sk-req-1", Some(token.as_str()))
            .await,
    )
    .await;
    assert_eq!(body["data"].as_array().unwrap().len(), 2);
}
