//! In-process HTTP client for integration testing.
//!
//! Drives the full Axum router (middleware included) without binding a
//! socket, so tests see exactly what a real client would: status codes,
//! envelopes, auth and rate-limit behavior.

use std::net::SocketAddr;

use axum::body::Body;
use axum::extract::ConnectInfo;
use axum::http::{header, Method, Request, StatusCode};
use axum::Router;
use http_body_util::BodyExt;
use serde_json::Value;
use server_core::server::build_app;
use sqlx::PgPool;
use tower::ServiceExt;

pub const TEST_JWT_SECRET: &str = "test_secret_key";
pub const TEST_JWT_ISSUER: &str = "test_issuer";

/// HTTP client bound to one router instance.
///
/// Geocoding and AI are left unconfigured, so listing creation falls back
/// to the origin point and the AI routes answer 502.
pub struct ApiClient {
    router: Router,
    token: Option<String>,
}

/// A decoded response: status plus the JSON body (Null when empty).
#[derive(Debug)]
pub struct ApiResponse {
    pub status: StatusCode,
    pub body: Value,
}

impl ApiResponse {
    /// Gets a value at the given JSON path. Numeric segments index arrays.
    ///
    /// # Example
    /// ```ignore
    /// let title = response.get("data.0.title");
    /// ```
    pub fn get(&self, path: &str) -> Value {
        let mut current = &self.body;
        for key in path.split('.') {
            current = match key.parse::<usize>() {
                Ok(index) => &current[index],
                Err(_) => &current[key],
            };
        }
        current.clone()
    }

    /// The `message` field, empty string when absent.
    pub fn message(&self) -> String {
        self.body["message"].as_str().unwrap_or_default().to_string()
    }
}

impl ApiClient {
    pub fn new(pool: PgPool) -> Self {
        let router = build_app(
            pool,
            TEST_JWT_SECRET,
            TEST_JWT_ISSUER.to_string(),
            None,
            None,
        );
        Self {
            router,
            token: None,
        }
    }

    /// Attach a bearer token to every subsequent request.
    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(token.into());
        self
    }

    pub async fn get(&self, path: &str) -> ApiResponse {
        self.request(Method::GET, path, None).await
    }

    pub async fn post(&self, path: &str, body: Value) -> ApiResponse {
        self.request(Method::POST, path, Some(body)).await
    }

    pub async fn put(&self, path: &str, body: Value) -> ApiResponse {
        self.request(Method::PUT, path, Some(body)).await
    }

    pub async fn delete(&self, path: &str) -> ApiResponse {
        self.request(Method::DELETE, path, None).await
    }

    async fn request(&self, method: Method, path: &str, body: Option<Value>) -> ApiResponse {
        let mut builder = Request::builder()
            .method(method)
            .uri(path)
            .header(header::CONTENT_TYPE, "application/json")
            .header("x-forwarded-for", "127.0.0.1")
            // The rate limiter keys on the peer IP, which the production
            // listener provides via connect info; oneshot requests bypass
            // that layer, so supply the extension here.
            .extension(ConnectInfo(SocketAddr::from(([127, 0, 0, 1], 40000))));

        if let Some(token) = &self.token {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
        }

        let body = match body {
            Some(json) => Body::from(json.to_string()),
            None => Body::empty(),
        };

        let request = builder.body(body).expect("request should build");

        let response = self
            .router
            .clone()
            .oneshot(request)
            .await
            .expect("request should execute");

        let status = response.status();
        let bytes = response
            .into_body()
            .collect()
            .await
            .expect("body should collect")
            .to_bytes();

        let body = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap_or(Value::Null)
        };

        ApiResponse { status, body }
    }
}
