//! Common test utilities for coin shop integration tests.

#![allow(dead_code)] // Some utilities are used by different test files

use std::sync::Arc;

use axum::Router;
use axum_test::TestServer;
use tempfile::TempDir;

use coin_shop_service::{create_router, AppState, ServiceConfig};
use coin_shop_store::RocksStore;

/// Test harness containing everything needed for integration tests.
pub struct TestHarness {
    /// The test server for making HTTP requests.
    pub server: TestServer,
    /// Temporary directory for the database (kept alive for test duration).
    pub _temp_dir: TempDir,
}

impl TestHarness {
    /// Create a new test harness with a fresh database and seeded catalog.
    pub fn new() -> Self {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let store = Arc::new(RocksStore::open(temp_dir.path()).expect("Failed to open store"));
        store
            .ensure_default_catalog()
            .expect("Failed to seed catalog");

        let config = ServiceConfig {
            listen_addr: "127.0.0.1:0".into(),
            data_dir: temp_dir.path().to_string_lossy().to_string(),
            jwt_secret: "test-secret".into(),
            token_lifetime_seconds: 3600,
            ..ServiceConfig::default()
        };

        let state = AppState::new(store, config);
        let router: Router = create_router(state);

        let server = TestServer::new(router).expect("Failed to create test server");

        Self {
            server,
            _temp_dir: temp_dir,
        }
    }

    /// Log a user in (auto-registering on first sight) and return the token.
    pub async fn login(&self, username: &str, password: &str) -> String {
        let response = self
            .server
            .post("/api/auth")
            .json(&serde_json::json!({
                "username": username,
                "password": password
            }))
            .await;

        response.assert_status_ok();
        let body: serde_json::Value = response.json();
        body["token"].as_str().expect("token missing").to_string()
    }

    /// Build an authorization header value from a token.
    pub fn bearer(token: &str) -> String {
        format!("Bearer {token}")
    }

    /// Read a user's balance through the API.
    pub async fn balance(&self, token: &str) -> i64 {
        let response = self
            .server
            .get("/api/balance")
            .add_header("authorization", Self::bearer(token))
            .await;

        response.assert_status_ok();
        let body: serde_json::Value = response.json();
        body["balance"].as_i64().expect("balance missing")
    }
}

impl Default for TestHarness {
    fn default() -> Self {
        Self::new()
    }
}
