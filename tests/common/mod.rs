#![allow(dead_code)]

use std::sync::Arc;

use axum::{
    body::{self, Body},
    http::{Method, Request},
    response::Response,
    Router,
};
use rust_decimal::Decimal;
use serde_json::Value;
use qkart_api::{
    config::AppConfig,
    db::{self, DbConfig},
    entities::{product, user},
    events::{self, EventSender},
    services::{CartService, CreateProductInput, CreateUserInput},
    AppState,
};
use tokio::sync::mpsc;
use tower::ServiceExt;

pub const DEFAULT_TEST_ADDRESS: &str = "Flat 4, 221B Baker Street, London NW1 6XE";

/// Helper harness for spinning up an application state backed by an in-memory SQLite database.
pub struct TestApp {
    router: Router,
    pub state: AppState,
    _event_task: tokio::task::JoinHandle<()>,
}

impl TestApp {
    /// Construct a new test application with fresh database state.
    pub async fn new() -> Self {
        let pool = db::establish_connection_with_config(&DbConfig::in_memory())
            .await
            .expect("failed to create test database");
        db::run_migrations(&pool)
            .await
            .expect("failed to run migrations in tests");

        let (event_tx, event_rx) = mpsc::channel(256);
        let event_task = tokio::spawn(events::process_events(event_rx));

        let cfg = AppConfig::new(
            "sqlite::memory:".to_string(),
            "127.0.0.1".to_string(),
            18_082,
            "test".to_string(),
        );
        let state = AppState::new(Arc::new(pool), cfg, Arc::new(EventSender::new(event_tx)));
        let router = qkart_api::app_router(state.clone());

        Self {
            router,
            state,
            _event_task: event_task,
        }
    }

    pub fn cart_service(&self) -> Arc<CartService> {
        self.state.services.cart.clone()
    }

    /// Send a request against the router.
    pub async fn request(&self, method: Method, uri: &str, body: Option<Value>) -> Response {
        self.request_with_headers(method, uri, body, &[]).await
    }

    pub async fn request_with_headers(
        &self,
        method: Method,
        uri: &str,
        body: Option<Value>,
        headers: &[(&str, &str)],
    ) -> Response {
        let mut builder = Request::builder().method(method).uri(uri);
        for (name, value) in headers {
            builder = builder.header(*name, *value);
        }

        let body = if let Some(json) = body {
            builder = builder.header("content-type", "application/json");
            Body::from(serde_json::to_vec(&json).expect("failed to serialize json request body"))
        } else {
            Body::empty()
        };

        let request = builder.body(body).expect("failed to build request");
        self.router
            .clone()
            .oneshot(request)
            .await
            .expect("router error during test request")
    }

    /// Registers a user; `address` replaces the placeholder when given.
    pub async fn seed_user(&self, email: &str, address: Option<&str>) -> user::Model {
        let users = self.state.services.users.clone();
        let created = users
            .create_user(CreateUserInput {
                name: "crio-user".to_string(),
                email: email.to_string(),
            })
            .await
            .expect("seed user for tests");

        match address {
            Some(address) => users
                .set_address(email, address)
                .await
                .expect("seed address for tests"),
            None => created,
        }
    }

    pub async fn seed_product(&self, name: &str, cost: Decimal) -> product::Model {
        self.state
            .services
            .products
            .create_product(CreateProductInput {
                name: name.to_string(),
                category: "Test".to_string(),
                cost,
                rating: 4,
                image: "https://images.example.com/test.png".to_string(),
            })
            .await
            .expect("seed product for tests")
    }

    /// Reloads a user so assertions see what is stored.
    pub async fn reload_user(&self, email: &str) -> user::Model {
        self.state
            .services
            .users
            .get_user_by_email(email)
            .await
            .expect("user should exist")
    }
}

impl Drop for TestApp {
    fn drop(&mut self) {
        self._event_task.abort();
    }
}

pub async fn response_json(response: Response) -> Value {
    let bytes = body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("response body bytes");
    serde_json::from_slice(&bytes).expect("json response")
}
