// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

use adgen_server::config::Config;
use adgen_server::routes::create_router;
use adgen_server::AppState;
use axum::{
    body::{Body, Bytes},
    http::{header, HeaderMap, Request, StatusCode},
    response::IntoResponse,
    routing::post,
    Json, Router,
};
use serde_json::{json, Value};
use std::net::SocketAddr;
use std::sync::Arc;
use tempfile::TempDir;
use tower::ServiceExt;

/// Test app plus the temp directories backing it (kept alive by the caller).
#[allow(dead_code)]
pub struct TestApp {
    pub router: Router,
    pub state: Arc<AppState>,
    pub public_dir: TempDir,
    pub data_dir: TempDir,
}

/// Create a test app with offline defaults (Razorpay mocked, fake keys).
#[allow(dead_code)]
pub async fn create_test_app() -> TestApp {
    create_test_app_with(|_| {}).await
}

/// Create a test app after adjusting the default test config.
#[allow(dead_code)]
pub async fn create_test_app_with<F: FnOnce(&mut Config)>(adjust: F) -> TestApp {
    let public_dir = tempfile::tempdir().expect("public tempdir");
    let data_dir = tempfile::tempdir().expect("data tempdir");

    let mut config = Config::test_default();
    config.public_dir = public_dir.path().to_path_buf();
    config.data_dir = data_dir.path().to_path_buf();
    adjust(&mut config);

    let state = Arc::new(
        AppState::from_config(config)
            .await
            .expect("Failed to build test state"),
    );

    TestApp {
        router: create_router(state.clone()),
        state,
        public_dir,
        data_dir,
    }
}

/// Send a request and return status, headers and the body parsed as JSON
/// (`Value::Null` for non-JSON bodies).
#[allow(dead_code)]
pub async fn send(
    router: &Router,
    method: &str,
    uri: &str,
    body: Option<Value>,
) -> (StatusCode, HeaderMap, Value) {
    let builder = Request::builder().method(method).uri(uri);
    let request = match body {
        Some(json) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(json.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = router.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let headers = response.headers().clone();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let json = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, headers, json)
}

/// Send a request and return the raw body text.
#[allow(dead_code)]
pub async fn send_raw(router: &Router, method: &str, uri: &str) -> (StatusCode, HeaderMap, String) {
    let request = Request::builder()
        .method(method)
        .uri(uri)
        .body(Body::empty())
        .unwrap();
    let response = router.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let headers = response.headers().clone();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    (status, headers, String::from_utf8_lossy(&bytes).into_owned())
}

/// Canned reply from the fake DeepSeek endpoint.
#[allow(dead_code)]
pub const FAKE_AD_COPY: &str =
    "HEADLINE: Breathe Easy\nAD_TEXT: Pure neem soap for sensitive skin.\nCTA: Order today";

#[allow(dead_code)]
pub const FAKE_IMAGE_URL: &str = "https://images.example.com/ad.png";

/// How the fake upstream should behave.
#[allow(dead_code)]
#[derive(Clone, Copy)]
pub enum UpstreamMode {
    Healthy,
    TextFails,
    ImageFails,
}

/// Start an in-process stand-in for DeepSeek, DeepAI and Razorpay.
/// Returns its base URL.
#[allow(dead_code)]
pub async fn spawn_fake_upstream(mode: UpstreamMode) -> String {
    async fn chat(
        axum::extract::State(mode): axum::extract::State<UpstreamMode>,
        headers: HeaderMap,
        Json(body): Json<Value>,
    ) -> axum::response::Response {
        let authorized = headers
            .get(header::AUTHORIZATION)
            .and_then(|h| h.to_str().ok())
            .is_some_and(|h| h == "Bearer test_deepseek_key");
        if !authorized {
            return (StatusCode::UNAUTHORIZED, "bad key").into_response();
        }
        if matches!(mode, UpstreamMode::TextFails) {
            return (StatusCode::INTERNAL_SERVER_ERROR, "model overloaded").into_response();
        }
        assert_eq!(body["model"], "deepseek-chat");
        Json(json!({
            "choices": [{"message": {"role": "assistant", "content": FAKE_AD_COPY}}]
        }))
        .into_response()
    }

    async fn text2img(
        axum::extract::State(mode): axum::extract::State<UpstreamMode>,
        headers: HeaderMap,
        body: Bytes,
    ) -> axum::response::Response {
        let authorized = headers
            .get("Api-Key")
            .and_then(|h| h.to_str().ok())
            .is_some_and(|h| h == "test_deepai_key");
        if !authorized {
            return (StatusCode::UNAUTHORIZED, "bad key").into_response();
        }
        if matches!(mode, UpstreamMode::ImageFails) {
            return (StatusCode::PAYMENT_REQUIRED, "out of credits").into_response();
        }
        let text = String::from_utf8_lossy(&body);
        assert!(text.contains("name=\"text\""));
        Json(json!({"id": "img-1", "output_url": FAKE_IMAGE_URL})).into_response()
    }

    async fn orders(headers: HeaderMap, Json(body): Json<Value>) -> axum::response::Response {
        let has_basic = headers
            .get(header::AUTHORIZATION)
            .and_then(|h| h.to_str().ok())
            .is_some_and(|h| h.starts_with("Basic "));
        if !has_basic {
            return (StatusCode::UNAUTHORIZED, "auth required").into_response();
        }
        Json(json!({
            "id": "order_live0000001",
            "entity": "order",
            "amount": body["amount"],
            "currency": body["currency"],
            "status": "created"
        }))
        .into_response()
    }

    let app = Router::new()
        .route("/v1/chat/completions", post(chat))
        .route("/api/text2img", post(text2img))
        .route("/v1/orders", post(orders))
        .with_state(mode);

    let listener = tokio::net::TcpListener::bind(SocketAddr::from(([127, 0, 0, 1], 0)))
        .await
        .unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    format!("http://{}", addr)
}
