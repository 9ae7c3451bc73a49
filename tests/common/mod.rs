#![allow(dead_code)]

use std::sync::Arc;

use anyhow::Result;
use axum::{
    body::{to_bytes, Body},
    http::{header, Method, Request, StatusCode},
    Router,
};
use serde_json::Value;
use tower::ServiceExt;

use notes_api::app::{router, AppState};
use notes_api::auth::Argon2Hasher;
use notes_api::config::AppConfig;

pub const TEST_SECRET: &str = "integration-test-secret";

/// Application wired to a fresh in-memory store.
pub struct TestApp {
    pub state: AppState,
    router: Router,
}

impl TestApp {
    pub fn new() -> Self {
        let config = AppConfig::from_source(|key| match key {
            "JWT_SECRET" => Some(TEST_SECRET.to_string()),
            _ => None,
        });
        let hasher = Argon2Hasher::with_params(argon2::Params::MIN_M_COST, 1, 1).expect("argon2 params");
        let state = AppState::in_memory(config, Arc::new(hasher));

        Self {
            router: router(state.clone()),
            state,
        }
    }

    pub async fn send(&self, method: Method, uri: &str, token: Option<&str>, body: Option<Value>) -> Result<(StatusCode, Value)> {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(token) = token {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
        }
        let request = match body {
            Some(json) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(json.to_string()))?,
            None => builder.body(Body::empty())?,
        };

        self.send_request(request).await
    }

    pub async fn send_request(&self, request: Request<Body>) -> Result<(StatusCode, Value)> {
        let response = self.router.clone().oneshot(request).await?;
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await?;
        let body = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes)?
        };
        Ok((status, body))
    }

    /// Register an account and return its token and id.
    pub async fn register(&self, name: &str, email: &str, password: &str) -> Result<(String, i64)> {
        let (status, body) = self
            .send(
                Method::POST,
                "/api/v1/auth/register",
                None,
                Some(serde_json::json!({ "name": name, "email": email, "password": password })),
            )
            .await?;
        anyhow::ensure!(status == StatusCode::CREATED, "register failed: {} {}", status, body);

        let token = body["data"]["token"].as_str().unwrap_or_default().to_string();
        let id = body["data"]["user"]["id"].as_i64().unwrap_or_default();
        Ok((token, id))
    }
}
