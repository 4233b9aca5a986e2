// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

use adgen_server::error::AppError;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use serde_json::Value;

async fn render(err: AppError) -> (StatusCode, Value) {
    let response = err.into_response();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    (status, serde_json::from_slice(&bytes).unwrap())
}

#[tokio::test]
async fn test_client_errors_carry_details() {
    let (status, body) = render(AppError::BadRequest("Missing required fields: amount".into())).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["success"], false);
    assert_eq!(body["error"], "bad_request");
    assert_eq!(body["details"], "Missing required fields: amount");

    let (status, body) = render(AppError::UsageLimitReached("Free plan allows 3 ads".into())).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["error"], "usage_limit_reached");
}

#[tokio::test]
async fn test_upstream_errors() {
    let (status, body) = render(AppError::Upstream {
        service: "DeepAI",
        status: Some(402),
        body: "out of credits".into(),
    })
    .await;
    assert_eq!(status, StatusCode::BAD_GATEWAY);
    assert_eq!(body["error"], "upstream_error");
    assert!(body["details"].as_str().unwrap().contains("out of credits"));

    let (status, body) = render(AppError::UpstreamTimeout("DeepSeek")).await;
    assert_eq!(status, StatusCode::GATEWAY_TIMEOUT);
    assert_eq!(body["details"], "DeepSeek API timed out");
}

#[tokio::test]
async fn test_server_errors_hide_details() {
    let (status, body) = render(AppError::Storage("/srv/data: permission denied".into())).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["error"], "storage_error");
    assert!(body.get("details").is_none());

    let (status, body) = render(AppError::Internal(anyhow::anyhow!("boom"))).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["error"], "internal_error");
    assert!(body.get("details").is_none());

    let (status, body) = render(AppError::InvalidSignature).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body.get("details").is_none());
}

#[test]
fn test_io_errors_become_storage_errors() {
    let err: AppError = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "nope").into();
    assert!(matches!(err, AppError::Storage(_)));
}

#[tokio::test]
async fn test_validation_errors_name_fields_only() {
    let mut rejected = validator::ValidationError::new("length");
    rejected.add_param("value".into(), &"x".repeat(3000));
    let mut errors = validator::ValidationErrors::new();
    errors.add("target_audience", rejected);
    errors.add("product_name", validator::ValidationError::new("blank"));

    let (status, body) = render(errors.into()).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["details"], "Invalid fields: product_name, target_audience");
}
