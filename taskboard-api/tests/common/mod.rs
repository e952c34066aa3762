//! Common test utilities for API tests
//!
//! Every context gets its own in-memory storage and a low password hash
//! cost, and drives the router in-process.

#![allow(dead_code)]

use axum::body::Body;
use axum::http::{header, HeaderMap, Method, Request, StatusCode};
use axum::Router;
use serde_json::{json, Value};
use taskboard_api::app::{build_router, AppState};
use taskboard_api::config::Config;
use tower::Service as _;

pub const SESSION_SECRET: &str = "api-test-session-secret-of-32-bytes!";
pub const PROVIDER_SECRET: &str = "provider-callback-test-secret";
pub const PASSWORD: &str = "secret123";

pub fn test_config() -> Config {
    Config::from_lookup(|key| match key {
        "SESSION_SECRET" => Some(SESSION_SECRET.to_string()),
        "PASSWORD_HASH_COST" => Some("low".to_string()),
        "PROVIDER_CALLBACK_SECRET" => Some(PROVIDER_SECRET.to_string()),
        _ => None,
    })
    .expect("test config should load")
}

/// Response status, headers and JSON body (`Null` when empty)
pub struct TestResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: Value,
}

impl TestResponse {
    pub fn location(&self) -> Option<&str> {
        self.headers.get(header::LOCATION).and_then(|v| v.to_str().ok())
    }

    pub fn set_cookie(&self) -> Option<&str> {
        self.headers.get(header::SET_COOKIE).and_then(|v| v.to_str().ok())
    }

    /// `name=value` part of the Set-Cookie header, ready to send back
    pub fn session_cookie(&self) -> Option<String> {
        self.set_cookie()
            .and_then(|c| c.split(';').next())
            .map(|c| c.trim().to_string())
    }
}

pub struct TestContext {
    pub app: Router,
}

impl TestContext {
    pub fn new() -> Self {
        Self::with_config(test_config())
    }

    pub fn with_config(config: Config) -> Self {
        Self {
            app: build_router(AppState::in_memory(config)),
        }
    }

    pub async fn send(&self, request: Request<Body>) -> TestResponse {
        let response = self.app.clone().call(request).await.unwrap();

        let status = response.status();
        let headers = response.headers().clone();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();

        let body = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap_or_else(|_| Value::String(String::from_utf8_lossy(&bytes).into_owned()))
        };

        TestResponse { status, headers, body }
    }

    pub async fn get(&self, uri: &str, cookie: Option<&str>) -> TestResponse {
        self.send(request(Method::GET, uri, cookie, None)).await
    }

    pub async fn post(&self, uri: &str, cookie: Option<&str>, body: Value) -> TestResponse {
        self.send(request(Method::POST, uri, cookie, Some(body))).await
    }

    pub async fn put(&self, uri: &str, cookie: Option<&str>, body: Value) -> TestResponse {
        self.send(request(Method::PUT, uri, cookie, Some(body))).await
    }

    pub async fn patch(&self, uri: &str, cookie: Option<&str>, body: Value) -> TestResponse {
        self.send(request(Method::PATCH, uri, cookie, Some(body))).await
    }

    pub async fn delete(&self, uri: &str, cookie: Option<&str>) -> TestResponse {
        self.send(request(Method::DELETE, uri, cookie, None)).await
    }

    pub async fn register(&self, name: &str, email: &str) -> TestResponse {
        self.post(
            "/register",
            None,
            json!({
                "name": name,
                "email": email,
                "password": PASSWORD,
                "confirmPassword": PASSWORD,
            }),
        )
        .await
    }

    pub async fn login(&self, email: &str, password: &str) -> TestResponse {
        self.post("/login", None, json!({ "email": email, "password": password }))
            .await
    }

    /// Registers and signs in; returns the session cookie
    pub async fn signed_in(&self, name: &str, email: &str) -> String {
        let registered = self.register(name, email).await;
        assert_eq!(registered.status, StatusCode::CREATED, "{}", registered.body);

        let login = self.login(email, PASSWORD).await;
        assert_eq!(login.status, StatusCode::OK, "{}", login.body);

        login.session_cookie().expect("login should set the session cookie")
    }

    /// Creates a task and returns its ID
    pub async fn create_task(&self, cookie: &str, body: Value) -> String {
        let response = self.post("/tasks", Some(cookie), body).await;
        assert_eq!(response.status, StatusCode::CREATED, "{}", response.body);

        response.body["id"].as_str().unwrap().to_string()
    }
}

pub fn request(method: Method, uri: &str, cookie: Option<&str>, body: Option<Value>) -> Request<Body> {
    let mut builder = Request::builder().method(method).uri(uri);

    if let Some(cookie) = cookie {
        builder = builder.header(header::COOKIE, cookie);
    }

    match body {
        Some(body) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    }
}

/// A due date `days` from today, as the forms submit it
pub fn due_in(days: i64) -> String {
    (chrono::Local::now().date_naive() + chrono::Duration::days(days))
        .format("%Y-%m-%d")
        .to_string()
}
