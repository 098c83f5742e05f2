//! Router harness shared by the API tests.

#![allow(dead_code, clippy::unwrap_used, clippy::expect_used)]

use axum::{
    Router,
    body::Body,
    http::{Method, Request, StatusCode, header},
    response::Response,
};
use serde_json::Value;
use sps_auth::Principal;
use sps_auth::mocks::MockUserRepository;
use sps_auth::proof::expected_proof;
use sps_testing::{ManualClock, fixtures};
use sps_web::{AppState, Config, app_router};
use std::sync::Arc;
use tower::ServiceExt;

/// Configuration with a fixed signing secret and a generous rate limit.
pub fn test_config() -> Config {
    config_with(&[])
}

/// [`test_config`] with some variables overridden.
pub fn config_with(overrides: &[(&str, &str)]) -> Config {
    let overrides: Vec<(String, String)> = overrides
        .iter()
        .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
        .collect();

    Config::from_lookup(move |key| {
        overrides
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.clone())
            .or_else(|| match key {
                "JWT_SECRET" => Some("web-test-secret".to_string()),
                "AUTH_RATE_LIMIT_REQUESTS" => Some("1000".to_string()),
                _ => None,
            })
    })
}

/// Router over the fixture directory with a manual clock.
pub struct TestApp {
    pub router: Router,
    pub state: AppState<MockUserRepository>,
    pub clock: ManualClock,
}

impl TestApp {
    pub fn new() -> Self {
        Self::with_config(&test_config())
    }

    pub fn with_config(config: &Config) -> Self {
        let clock = ManualClock::default();
        let state = AppState::with_clock(
            Arc::new(fixtures::directory()),
            config,
            Arc::new(clock.clone()),
        );

        Self {
            router: app_router(state.clone()),
            state,
            clock,
        }
    }

    /// Send a raw request.
    pub async fn send(&self, request: Request<Body>) -> Response {
        self.router.clone().oneshot(request).await.unwrap()
    }

    /// Send a request and decode the body as JSON (`Null` when empty,
    /// a JSON string when the body is plain text).
    pub async fn call(
        &self,
        method: Method,
        uri: &str,
        token: Option<&str>,
        body: Option<Value>,
    ) -> (StatusCode, Value) {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(token) = token {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
        }
        let request = match body {
            Some(body) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };

        let response = self.send(request).await;
        let status = response.status();
        (status, read_json(response).await)
    }

    pub async fn get(&self, uri: &str, token: Option<&str>) -> (StatusCode, Value) {
        self.call(Method::GET, uri, token, None).await
    }

    pub async fn post(&self, uri: &str, token: Option<&str>, body: Value) -> (StatusCode, Value) {
        self.call(Method::POST, uri, token, Some(body)).await
    }

    /// Request a challenge for `email` and return its nonce.
    pub async fn nonce_for(&self, email: &str) -> String {
        let (status, body) = self.get(&format!("/auth/challenge?email={email}"), None).await;
        assert_eq!(status, StatusCode::OK, "challenge failed: {body}");
        body["nonce"].as_str().unwrap().to_string()
    }

    /// Run the challenge flow end to end and return the session body.
    pub async fn login(&self, email: &str, secret: &str) -> (StatusCode, Value) {
        let nonce = self.nonce_for(email).await;
        self.post(
            "/auth/login-challenge",
            None,
            serde_json::json!({ "email": email, "proof": expected_proof(secret, &nonce).unwrap() }),
        )
        .await
    }

    /// Token for `principal` minted directly by the token service.
    pub fn token_for(&self, principal: &Principal) -> String {
        self.state.tokens.issue(principal).unwrap()
    }

    pub fn admin_token(&self) -> String {
        self.token_for(&fixtures::admin())
    }

    pub fn ana_token(&self) -> String {
        self.token_for(&fixtures::ana())
    }
}

pub async fn read_json(response: Response) -> Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    if bytes.is_empty() {
        return Value::Null;
    }
    serde_json::from_slice(&bytes)
        .unwrap_or_else(|_| Value::String(String::from_utf8_lossy(&bytes).into_owned()))
}
