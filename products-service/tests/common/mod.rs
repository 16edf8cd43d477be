#![allow(dead_code)]

use axum::{
    body::{Body, Bytes},
    http::{Method, Request, StatusCode},
    Router,
};
use mongodb::bson::{doc, Bson, Document};
use products_service::services::{ConnectionProvider, MockStore};
use products_service::{build_router, AppState};
use std::sync::Arc;
use tower::util::ServiceExt;

pub struct TestApp {
    pub router: Router,
    pub provider: ConnectionProvider,
    pub store: Option<Arc<MockStore>>,
}

impl TestApp {
    /// An app whose provider has not received a connection.
    pub fn disconnected() -> Self {
        let provider = ConnectionProvider::new();
        TestApp {
            router: build_router(AppState::new(provider.clone())),
            provider,
            store: None,
        }
    }

    /// An app connected to `store`.
    pub fn connected(store: MockStore) -> Self {
        let store = Arc::new(store);
        let provider = ConnectionProvider::connected(store.clone());
        TestApp {
            router: build_router(AppState::new(provider.clone())),
            provider,
            store: Some(store),
        }
    }

    pub fn store(&self) -> &MockStore {
        self.store.as_deref().expect("test app has no store")
    }

    pub async fn get(&self, uri: &str) -> (StatusCode, serde_json::Value) {
        self.request(Method::GET, uri).await
    }

    pub async fn request(&self, method: Method, uri: &str) -> (StatusCode, serde_json::Value) {
        let (status, body) = self.request_raw(method, uri).await;
        let json = if body.is_empty() {
            serde_json::Value::Null
        } else {
            serde_json::from_slice(&body).expect("Response body is not JSON")
        };

        (status, json)
    }

    /// Status and undecoded body bytes.
    pub async fn get_raw(&self, uri: &str) -> (StatusCode, Bytes) {
        self.request_raw(Method::GET, uri).await
    }

    async fn request_raw(&self, method: Method, uri: &str) -> (StatusCode, Bytes) {
        let response = self
            .router
            .clone()
            .oneshot(
                Request::builder()
                    .method(method)
                    .uri(uri)
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        let status = response.status();
        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();

        (status, body)
    }
}

pub fn deal(title: &str, discount: i32) -> Document {
    doc! { "title": title, "discount": discount }
}

pub fn deals(count: usize) -> Vec<Document> {
    (0..count)
        .map(|i| deal(&format!("Deal {}", i), (i % 90) as i32))
        .collect()
}

pub fn product(name: &str, skus: &[&str]) -> Document {
    let variants: Vec<Bson> = skus
        .iter()
        .map(|sku| Bson::Document(doc! { "sku": sku.to_string(), "stock": 5 }))
        .collect();
    doc! { "name": name, "price": 1999, "variants": variants }
}
