//! `sps-client` against a live server on a loopback port.

#![allow(clippy::unwrap_used, clippy::expect_used)]

mod common;

use axum::{
    Router,
    http::StatusCode,
    routing::{get, post},
};
use common::test_config;
use sps_auth::Role;
use sps_auth::mocks::MockUserRepository;
use sps_auth::stores::JsonFileUserRepository;
use sps_client::{AuthClient, ClientError, FallbackPolicy, LoginMode};
use sps_testing::fixtures;
use sps_web::handlers::auth;
use sps_web::{AppState, app_router};
use std::net::SocketAddr;
use std::sync::Arc;

async fn serve(router: Router) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    tokio::spawn(async move {
        axum::serve(
            listener,
            router.into_make_service_with_connect_info::<SocketAddr>(),
        )
        .await
        .unwrap();
    });

    format!("http://{addr}")
}

fn mock_state() -> AppState<MockUserRepository> {
    AppState::new(Arc::new(fixtures::directory()), &test_config())
}

/// A server that predates the challenge endpoint.
fn legacy_router(state: AppState<MockUserRepository>) -> Router {
    Router::new()
        .route("/auth/login", post(auth::login::<MockUserRepository>))
        .with_state(state)
}

#[tokio::test]
async fn test_challenge_login_against_json_database() {
    let dir = tempfile::tempdir().unwrap();
    let users = JsonFileUserRepository::open(dir.path().join("db.json"))
        .await
        .unwrap();
    let base = serve(app_router(AppState::new(Arc::new(users), &test_config()))).await;

    let client = AuthClient::new(&base);
    let outcome = client.login("admin@sps.com", "admin123").await.unwrap();

    assert_eq!(outcome.mode, LoginMode::Challenge);
    assert_eq!(outcome.session.user.role, Role::Admin);

    let users = client.list_users(&outcome.session.token).await.unwrap();
    assert_eq!(users.len(), 1);
    assert_eq!(users[0].email, "admin@sps.com");
}

#[tokio::test]
async fn test_wrong_secret_is_unauthorized() {
    let base = serve(app_router(mock_state())).await;

    let err = AuthClient::new(&base)
        .with_fallback(FallbackPolicy::AllowPasswordLogin)
        .login("admin@sps.com", "not-admin123")
        .await
        .unwrap_err();

    assert!(err.is_unauthorized());
    assert_eq!(err.code(), Some("INVALID_CREDENTIALS"));
}

#[tokio::test]
async fn test_unknown_account_does_not_fall_back() {
    let base = serve(app_router(mock_state())).await;

    let err = AuthClient::new(&base)
        .with_fallback(FallbackPolicy::AllowPasswordLogin)
        .login("ghost@sps.com", "whatever")
        .await
        .unwrap_err();

    assert!(matches!(err, ClientError::Api { status: 404, .. }));
}

#[tokio::test]
async fn test_falls_back_when_challenge_route_missing() {
    let base = serve(legacy_router(mock_state())).await;

    let outcome = AuthClient::new(&base)
        .with_fallback(FallbackPolicy::AllowPasswordLogin)
        .login("ana@sps.com", "ana-secret")
        .await
        .unwrap();

    assert_eq!(outcome.mode, LoginMode::Password);
    assert_eq!(outcome.session.user.email, "ana@sps.com");
}

#[tokio::test]
async fn test_falls_back_on_not_implemented() {
    let state = mock_state();
    let router = Router::new()
        .route("/auth/challenge", get(|| async { StatusCode::NOT_IMPLEMENTED }))
        .route("/auth/login", post(auth::login::<MockUserRepository>))
        .with_state(state);
    let base = serve(router).await;

    let outcome = AuthClient::new(&base)
        .with_fallback(FallbackPolicy::AllowPasswordLogin)
        .login("ana@sps.com", "ana-secret")
        .await
        .unwrap();

    assert_eq!(outcome.mode, LoginMode::Password);
}

#[tokio::test]
async fn test_no_fallback_without_policy() {
    let base = serve(legacy_router(mock_state())).await;

    let err = AuthClient::new(&base)
        .login("ana@sps.com", "ana-secret")
        .await
        .unwrap_err();

    assert!(matches!(err, ClientError::EndpointUnavailable { status: 404 }));
}

#[tokio::test]
async fn test_network_error_never_falls_back() {
    // Reserve a port, then close it
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let err = AuthClient::new(format!("http://{addr}"))
        .with_fallback(FallbackPolicy::AllowPasswordLogin)
        .login("ana@sps.com", "ana-secret")
        .await
        .unwrap_err();

    assert!(matches!(err, ClientError::Transport(_)));
    assert_eq!(err.status(), None);
}

#[tokio::test]
async fn test_invalid_token_rejected_by_list_users() {
    let base = serve(app_router(mock_state())).await;

    let err = AuthClient::new(&base)
        .list_users("eyJhbGciOiJIUzI1NiJ9.e30.c2ln")
        .await
        .unwrap_err();

    assert!(err.is_unauthorized());
}
