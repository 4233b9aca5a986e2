// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! `/config.js`, `/health` and static file serving.

use axum::http::{header, StatusCode};

mod common;

#[tokio::test]
async fn test_config_js_headers_and_body() {
    let app = common::create_test_app().await;

    let (status, headers, body) =
        common::send_raw(&app.router, "GET", "/config.js?t=1718000000000").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        headers.get(header::CONTENT_TYPE).unwrap(),
        "application/javascript; charset=utf-8"
    );
    assert_eq!(
        headers.get(header::CACHE_CONTROL).unwrap(),
        "no-cache, no-store, must-revalidate"
    );
    assert_eq!(headers.get(header::PRAGMA).unwrap(), "no-cache");
    assert_eq!(headers.get(header::EXPIRES).unwrap(), "0");

    assert!(body.starts_with("window.CONFIG = {"));
    assert!(body.contains("DEEPSEEK_API_KEY: \"test_deepseek_key\","));
    assert!(body.contains("RAZORPAY_KEY_ID: \"rzp_test_key\","));
    assert!(body.contains("MISSING_KEYS: [],"));
    assert!(body.contains("AI_KEYS_MISSING: false,"));
    assert!(!body.contains("test_razorpay_secret"));
}

#[tokio::test]
async fn test_config_js_reports_missing_keys() {
    let app = common::create_test_app_with(|config| {
        config.secrets.deepai_api_key = None;
        config.secrets.firebase_app_id = None;
    })
    .await;

    let (status, _, body) = common::send_raw(&app.router, "GET", "/config.js").await;

    assert_eq!(status, StatusCode::OK);
    assert!(body.contains("DEEPAI_API_KEY: \"\","));
    assert!(body.contains(r#"MISSING_KEYS: ["DEEPAI_API_KEY","FIREBASE_APP_ID"],"#));
    assert!(body.contains("AI_KEYS_MISSING: true,"));
    assert!(body.contains("FIREBASE_CONFIG_MISSING: true,"));
    assert!(body.contains("PAYMENT_KEYS_MISSING: false,"));
}

#[tokio::test]
async fn test_health() {
    let app = common::create_test_app().await;

    let (status, _, json) = common::send(&app.router, "GET", "/health", None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["status"], "healthy");
}

#[tokio::test]
async fn test_static_files_served_from_public_dir() {
    let app = common::create_test_app().await;
    std::fs::write(
        app.public_dir.path().join("index.html"),
        "<h1>Ad Generator</h1>",
    )
    .unwrap();
    std::fs::write(app.public_dir.path().join("script.js"), "loadConfig();").unwrap();

    let (status, headers, body) = common::send_raw(&app.router, "GET", "/").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, "<h1>Ad Generator</h1>");
    assert_eq!(headers.get("X-Content-Type-Options").unwrap(), "nosniff");

    let (status, headers, body) = common::send_raw(&app.router, "GET", "/script.js").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, "loadConfig();");
    assert!(headers
        .get(header::CONTENT_TYPE)
        .unwrap()
        .to_str()
        .unwrap()
        .contains("javascript"));

    let (status, _, _) = common::send_raw(&app.router, "GET", "/missing.css").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_user_files_are_not_served_statically() {
    let app = common::create_test_app().await;
    common::send(
        &app.router,
        "POST",
        "/api/user/u1",
        Some(serde_json::json!({"email": "private@example.com"})),
    )
    .await;

    let (status, _, _) = common::send_raw(&app.router, "GET", "/user_data_u1.json").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}
