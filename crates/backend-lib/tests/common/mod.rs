//! Test utilities shared by the integration tests
//!
//! Hashing parameters are turned down so that registering and logging in
//! stays fast in debug builds; everything else uses the real defaults.
#![allow(dead_code)]

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use axum::{
    body::Body,
    http::{Request, StatusCode},
    Router,
};
use backend_lib::{
    auth::{Argon2Hasher, CredentialStore, DefaultAuth, SessionManager, SessionTable},
    config::Settings,
    error::AppError,
    storage::{InMemoryStore, User, UserStore},
    AppState,
};
use serde_json::Value;
use tower::ServiceExt;

/// Default settings with cheap argon2 parameters
pub fn test_settings() -> Settings {
    let mut settings = Settings::default();
    settings.auth.argon2_memory_kib = 64;
    settings.auth.argon2_iterations = 1;
    settings
}

/// App state over a fresh in-memory store, demo users seeded
pub async fn memory_state() -> AppState {
    AppState::with_store(Arc::new(InMemoryStore::new()), test_settings())
        .await
        .expect("Failed to create AppState for test")
}

/// Auth service over `store` with the default session TTL and no seeding
pub fn auth_over(store: Arc<dyn UserStore>) -> DefaultAuth {
    let credentials = CredentialStore::new(store, Arc::new(Argon2Hasher::new(64, 1).unwrap()));
    DefaultAuth::new(credentials, SessionManager::with_default_ttl(SessionTable::new()))
}

/// User store that counts lookups on its way to an in-memory store
#[derive(Default)]
pub struct CountingStore {
    inner: InMemoryStore,
    lookups: AtomicUsize,
}

impl CountingStore {
    pub fn lookups(&self) -> usize {
        self.lookups.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl UserStore for CountingStore {
    async fn find_by_email(&self, normalized_email: &str) -> Result<Option<User>, AppError> {
        self.lookups.fetch_add(1, Ordering::SeqCst);
        self.inner.find_by_email(normalized_email).await
    }

    async fn insert(&self, email: &str, password_hash: &str) -> Result<User, AppError> {
        self.inner.insert(email, password_hash).await
    }

    async fn user_count(&self) -> Result<usize, AppError> {
        self.inner.user_count().await
    }

    fn backend_name(&self) -> &'static str {
        "counting"
    }
}

/// Send a request with an optional JSON body and decode the JSON reply
pub async fn send_json(
    app: &Router,
    method: &str,
    uri: &str,
    body: Option<Value>,
) -> (StatusCode, Value) {
    let builder = Request::builder().method(method).uri(uri);
    let request = match body {
        Some(json) => builder
            .header("content-type", "application/json")
            .body(Body::from(json.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };
    send(app, request).await
}

/// Send a prepared request and decode the JSON reply
pub async fn send(app: &Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let json = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, json)
}
