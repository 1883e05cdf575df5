//! Shared router fixture for the HTTP integration tests.

#![allow(dead_code)]

use std::sync::Arc;

use axum::body::Body;
use axum::http::{Request, Response, StatusCode};
use axum::Router;
use serde_json::Value;
use tower::ServiceExt;

use krishi_mitra::adapters::ai::MockAIProvider;
use krishi_mitra::adapters::auth::MockSessionValidator;
use krishi_mitra::adapters::http::{build_router, Ports, RouterSettings};
use krishi_mitra::adapters::profile::InMemoryProfileStore;
use krishi_mitra::adapters::speech::MockSpeech;
use krishi_mitra::adapters::validation::JsonSchemaValidator;

pub const TOKEN: &str = "farmer-token";
pub const USER_ID: &str = "farmer-1";

pub fn router(ai: MockAIProvider, speech: MockSpeech) -> Router {
    let speech = Arc::new(speech);
    build_router(
        Ports {
            ai: Arc::new(ai),
            schemas: Arc::new(JsonSchemaValidator::new()),
            sessions: Arc::new(MockSessionValidator::new().with_test_user(TOKEN, USER_ID)),
            profiles: Arc::new(InMemoryProfileStore::new()),
            recognizer: speech.clone(),
            synthesizer: speech,
        },
        RouterSettings::default(),
    )
}

pub fn authed(method: &str, uri: &str, body: Option<Value>) -> Request<Body> {
    let builder = Request::builder()
        .method(method)
        .uri(uri)
        .header("authorization", format!("Bearer {}", TOKEN));
    match body {
        Some(body) => builder
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    }
}

pub async fn send(app: &Router, request: Request<Body>) -> (StatusCode, Value) {
    let response: Response<Body> = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let body = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, body)
}
