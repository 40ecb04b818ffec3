// Shared helpers for the router-level integration tests
#![allow(dead_code)]

pub mod fit;

use axum::{
    body::{to_bytes, Body},
    http::{header, HeaderMap, Method, Request, StatusCode},
    Router,
};
use serde_json::Value;
use std::sync::Arc;
use tower::ServiceExt;

use workout_api::api::{create_routes, AppState};
use workout_api::auth::{AuthService, JwtService, MIN_BCRYPT_COST};
use workout_api::repositories::MemoryRepository;
use workout_api::services::MemoryWorkoutStorage;

pub const TEST_SECRET: &str = "integration-test-secret";
pub const TEST_PASSWORD: &str = "correct-horse-battery";
pub const MULTIPART_BOUNDARY: &str = "workout-api-test-boundary";

/// Router wired to in-memory backends, plus handles to inspect them
pub struct TestApp {
    pub router: Router,
    pub repo: MemoryRepository,
    pub storage: MemoryWorkoutStorage,
}

pub struct TestResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: Value,
}

impl TestApp {
    pub fn new() -> Self {
        Self::with_upload_limit(1024 * 1024)
    }

    pub fn with_upload_limit(max_upload_bytes: usize) -> Self {
        let repo = MemoryRepository::new();
        let storage = MemoryWorkoutStorage::new();
        let jwt = JwtService::new(TEST_SECRET, chrono::Duration::minutes(30));

        let auth = AuthService::new(Arc::new(repo.clone()), jwt)
            .with_bcrypt_cost(MIN_BCRYPT_COST);
        let state = AppState::new(
            auth,
            Arc::new(repo.clone()),
            Arc::new(repo.clone()),
            Arc::new(storage.clone()),
            max_upload_bytes,
        );

        Self {
            router: create_routes(state),
            repo,
            storage,
        }
    }

    pub async fn send(&self, request: Request<Body>) -> TestResponse {
        let response = self.router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let headers = response.headers().clone();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let body = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap_or_else(|_| {
                Value::String(String::from_utf8_lossy(&bytes).into_owned())
            })
        };

        TestResponse {
            status,
            headers,
            body,
        }
    }

    pub async fn get(&self, uri: &str, token: Option<&str>) -> TestResponse {
        let request = with_token(Request::builder().method(Method::GET).uri(uri), token)
            .body(Body::empty())
            .unwrap();
        self.send(request).await
    }

    pub async fn post_json(&self, uri: &str, body: Value, token: Option<&str>) -> TestResponse {
        let request = with_token(Request::builder().method(Method::POST).uri(uri), token)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap();
        self.send(request).await
    }

    pub async fn post_empty(&self, uri: &str, token: Option<&str>) -> TestResponse {
        let request = with_token(Request::builder().method(Method::POST).uri(uri), token)
            .body(Body::empty())
            .unwrap();
        self.send(request).await
    }

    pub async fn post_file(&self, field: &str, data: &[u8], token: Option<&str>) -> TestResponse {
        let request = with_token(Request::builder().method(Method::POST).uri("/upload/"), token)
            .header(
                header::CONTENT_TYPE,
                format!("multipart/form-data; boundary={}", MULTIPART_BOUNDARY),
            )
            .body(Body::from(multipart_body(field, "activity.fit", data)))
            .unwrap();
        self.send(request).await
    }

    pub async fn register(&self, username: &str) -> TestResponse {
        self.post_json(
            "/users/",
            serde_json::json!({
                "username": username,
                "email": format!("{}@example.com", username),
                "full_name": "Test Athlete",
                "password": TEST_PASSWORD
            }),
            None,
        )
        .await
    }

    pub async fn login(&self, username: &str, password: &str) -> TestResponse {
        let form = format!("grant_type=password&username={}&password={}", username, password);
        let request = Request::builder()
            .method(Method::POST)
            .uri("/token")
            .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
            .body(Body::from(form))
            .unwrap();
        self.send(request).await
    }

    /// Register `username` and return a bearer token for it
    pub async fn signed_in(&self, username: &str) -> String {
        let registered = self.register(username).await;
        assert_eq!(registered.status, StatusCode::OK, "{:?}", registered.body);

        let token = self.login(username, TEST_PASSWORD).await;
        assert_eq!(token.status, StatusCode::OK, "{:?}", token.body);
        token.body["access_token"].as_str().unwrap().to_string()
    }
}

fn with_token(builder: axum::http::request::Builder, token: Option<&str>) -> axum::http::request::Builder {
    match token {
        Some(token) => builder.header(header::AUTHORIZATION, format!("Bearer {}", token)),
        None => builder,
    }
}

pub fn multipart_body(field: &str, filename: &str, data: &[u8]) -> Vec<u8> {
    let mut body = Vec::new();
    body.extend_from_slice(format!("--{}\r\n", MULTIPART_BOUNDARY).as_bytes());
    body.extend_from_slice(
        format!(
            "Content-Disposition: form-data; name=\"{}\"; filename=\"{}\"\r\n",
            field, filename
        )
        .as_bytes(),
    );
    body.extend_from_slice(b"Content-Type: application/octet-stream\r\n\r\n");
    body.extend_from_slice(data);
    body.extend_from_slice(format!("\r\n--{}--\r\n", MULTIPART_BOUNDARY).as_bytes());
    body
}
