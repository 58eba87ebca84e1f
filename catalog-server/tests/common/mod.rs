//! Shared helpers for catalog-server integration tests
//!
//! Every test app runs on its own in-memory database and temporary upload
//! directory and drives the full router through `oneshot`.

#![allow(dead_code)]

use async_trait::async_trait;
use axum::Router;
use axum::body::Body;
use catalog_server::api::build_app;
use catalog_server::auth::{self, bootstrap_admin};
use catalog_server::db::DbService;
use catalog_server::notify::{NotifyError, OrderNotifier};
use catalog_server::{AppState, Config};
use http::{Method, Request, StatusCode, header};
use http_body_util::BodyExt;
use serde_json::{Value, json};
use shared::models::PlacedOrder;
use std::sync::Arc;
use tempfile::TempDir;
use tokio::sync::{Mutex, mpsc};
use tower::ServiceExt;

pub const ADMIN_USERNAME: &str = "admin";
pub const ADMIN_PASSWORD: &str = "admin-password";

/// Notifier that forwards every order to a channel
pub struct RecordingNotifier {
    tx: mpsc::UnboundedSender<PlacedOrder>,
}

#[async_trait]
impl OrderNotifier for RecordingNotifier {
    async fn notify(&self, order: &PlacedOrder) -> Result<(), NotifyError> {
        let _ = self.tx.send(order.clone());
        Ok(())
    }
}

pub struct TestApp {
    pub state: AppState,
    router: Router,
    pub token: String,
    pub orders: Mutex<mpsc::UnboundedReceiver<PlacedOrder>>,
    _upload_dir: TempDir,
}

impl TestApp {
    pub async fn new() -> Self {
        Self::with_config(|_| {}).await
    }

    pub async fn with_config(customize: impl FnOnce(&mut Config)) -> Self {
        let upload_dir = tempfile::tempdir().unwrap();
        let mut config = Config {
            upload_dir: upload_dir.path().to_path_buf(),
            ..Config::default()
        };
        customize(&mut config);

        let db = DbService::in_memory().await.unwrap();
        bootstrap_admin(&db.pool, ADMIN_USERNAME, ADMIN_PASSWORD)
            .await
            .unwrap();

        let (tx, rx) = mpsc::unbounded_channel();
        let notifier: Arc<dyn OrderNotifier> = Arc::new(RecordingNotifier { tx });
        let state = AppState::with_db(config, db).with_notifier(Some(notifier));

        let token = auth::login(state.pool(), &state.jwt, ADMIN_USERNAME, ADMIN_PASSWORD)
            .await
            .unwrap();
        let router = build_app(&state).with_state(state.clone());

        Self {
            state,
            router,
            token,
            orders: Mutex::new(rx),
            _upload_dir: upload_dir,
        }
    }

    pub async fn send(&self, request: Request<Body>) -> (StatusCode, Value) {
        let response = self.router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        let body = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes)
                .unwrap_or_else(|_| Value::String(String::from_utf8_lossy(&bytes).into_owned()))
        };
        (status, body)
    }

    pub async fn call(
        &self,
        method: Method,
        uri: &str,
        body: Option<Value>,
        authorized: bool,
    ) -> (StatusCode, Value) {
        let mut builder = Request::builder().method(method).uri(uri);
        if authorized {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", self.token));
        }
        let request = match body {
            Some(json) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(json.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };
        self.send(request).await
    }

    pub async fn get(&self, uri: &str) -> (StatusCode, Value) {
        self.call(Method::GET, uri, None, false).await
    }

    pub async fn post(&self, uri: &str, body: Value) -> (StatusCode, Value) {
        self.call(Method::POST, uri, Some(body), true).await
    }

    pub async fn put(&self, uri: &str, body: Value) -> (StatusCode, Value) {
        self.call(Method::PUT, uri, Some(body), true).await
    }

    pub async fn delete(&self, uri: &str) -> (StatusCode, Value) {
        self.call(Method::DELETE, uri, None, true).await
    }

    /// Create and return the id, asserting 201
    pub async fn create(&self, uri: &str, body: Value) -> i64 {
        let (status, body) = self.post(uri, body).await;
        assert_eq!(status, StatusCode::CREATED, "POST {uri} failed: {body}");
        body["id"].as_i64().unwrap()
    }

    pub async fn category(&self, name: &str, attributes: Value) -> i64 {
        self.create("/categories", json!({"name": name, "attributes": attributes}))
            .await
    }

    pub async fn subcategory(&self, name: &str, category_id: i64, attributes: Value) -> i64 {
        self.create(
            "/subcategories",
            json!({"name": name, "category_id": category_id, "attributes": attributes}),
        )
        .await
    }

    pub async fn product(&self, name: &str, subcategory_id: i64, price: f64, extra: Value) -> i64 {
        self.create(
            "/products",
            json!({
                "name": name,
                "price": price,
                "subcategory_id": subcategory_id,
                "extra_attributes": extra,
            }),
        )
        .await
    }
}

/// Percent-encode a query parameter value
pub fn encode(value: &str) -> String {
    value
        .bytes()
        .map(|b| match b {
            b'A'..=b'Z' | b'a'..=b'z' | b'0'..=b'9' | b'-' | b'_' | b'.' | b'~' => {
                (b as char).to_string()
            }
            _ => format!("%{b:02X}"),
        })
        .collect()
}

pub fn names(products: &Value) -> Vec<String> {
    let mut names: Vec<String> = products
        .as_array()
        .unwrap()
        .iter()
        .map(|p| p["name"].as_str().unwrap().to_string())
        .collect();
    names.sort();
    names
}
