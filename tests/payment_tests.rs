// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Razorpay order creation and payment verification.

use adgen_server::services::razorpay::sign;
use axum::http::StatusCode;
use serde_json::json;

mod common;

const SECRET: &[u8] = b"test_razorpay_secret";

#[tokio::test]
async fn test_create_order_mocked() {
    let app = common::create_test_app().await;

    let (status, _, json) = common::send(
        &app.router,
        "POST",
        "/api/create-razorpay-order",
        Some(json!({"planKey": "pro", "amount": 59900, "currency": "INR"})),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["success"], true);
    assert_eq!(json["mock"], true);
    assert_eq!(json["amount"], 59900);
    assert_eq!(json["currency"], "INR");
    assert_eq!(json["planKey"], "pro");
    assert_eq!(json["key_id"], "rzp_test_key");
    let order_id = json["order_id"].as_str().unwrap();
    assert!(order_id.starts_with("order_"));
    assert_eq!(order_id.len(), 20);
}

#[tokio::test]
async fn test_create_order_legacy_path_and_price_field() {
    let app = common::create_test_app().await;

    let (status, _, json) = common::send(
        &app.router,
        "POST",
        "/create-razorpay-order",
        Some(json!({"planKey": "unlimited", "planName": "Unlimited", "price": "1299", "currency": "usd"})),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["amount"], 1299);
    assert_eq!(json["currency"], "USD");
}

#[tokio::test]
async fn test_create_order_missing_fields() {
    let app = common::create_test_app().await;

    let (status, _, json) = common::send(
        &app.router,
        "POST",
        "/api/create-razorpay-order",
        Some(json!({"amount": 0})),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["success"], false);
    assert_eq!(json["error"], "bad_request");
    assert_eq!(json["details"], "Missing required fields: planKey, amount");
}

#[tokio::test]
async fn test_create_order_zero_amount_spellings() {
    let app = common::create_test_app().await;

    for amount in [json!("00"), json!(" 000"), json!(0.0), json!("")] {
        let (status, _, json) = common::send(
            &app.router,
            "POST",
            "/api/create-razorpay-order",
            Some(json!({"planKey": "pro", "amount": amount.clone()})),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "amount {}", amount);
        assert_eq!(json["details"], "Missing required fields: amount");
    }
}

#[tokio::test]
async fn test_create_order_rejects_free_and_unknown_plans() {
    let app = common::create_test_app().await;

    for plan in ["free", "platinum"] {
        let (status, _, _) = common::send(
            &app.router,
            "POST",
            "/api/create-razorpay-order",
            Some(json!({"planKey": plan, "amount": 100})),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "plan {}", plan);
    }
}

#[tokio::test]
async fn test_create_order_malformed_json() {
    let app = common::create_test_app().await;

    let request = axum::http::Request::builder()
        .method("POST")
        .uri("/api/create-razorpay-order")
        .header("content-type", "application/json")
        .body(axum::body::Body::from("{not json"))
        .unwrap();
    let response = tower::ServiceExt::oneshot(app.router.clone(), request)
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_create_order_against_live_api() {
    let upstream = common::spawn_fake_upstream(common::UpstreamMode::Healthy).await;
    let app = common::create_test_app_with(|config| {
        config.razorpay_mock = false;
        config.razorpay_api_base = upstream.clone();
    })
    .await;

    let (status, _, json) = common::send(
        &app.router,
        "POST",
        "/api/create-razorpay-order",
        Some(json!({"planKey": "pro", "amount": 59900})),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["order_id"], "order_live0000001");
    assert_eq!(json["mock"], false);
    assert_eq!(json["amount"], 59900);
}

#[tokio::test]
async fn test_verify_payment_valid_signature() {
    let app = common::create_test_app().await;
    let signature = sign(SECRET, "order_abc", "pay_xyz").unwrap();
    assert_eq!(
        signature,
        "ddf976d3c6a7be5f62792753753c18f63add699c4272a22f1ea14498ca8177d5"
    );

    let (status, _, json) = common::send(
        &app.router,
        "POST",
        "/api/verify-payment",
        Some(json!({
            "razorpay_order_id": "order_abc",
            "razorpay_payment_id": "pay_xyz",
            "razorpay_signature": signature,
            "planKey": "unlimited"
        })),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["success"], true);
    assert_eq!(json["planKey"], "unlimited");
    assert_eq!(json["order_id"], "order_abc");
    assert_eq!(json["payment_id"], "pay_xyz");
    assert!(json.get("user").is_none());
}

#[tokio::test]
async fn test_verify_payment_bad_signature() {
    let app = common::create_test_app().await;
    let signature = sign(SECRET, "order_abc", "pay_other").unwrap();

    let (status, _, json) = common::send(
        &app.router,
        "POST",
        "/verify-payment",
        Some(json!({
            "order_id": "order_abc",
            "payment_id": "pay_xyz",
            "signature": signature
        })),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["success"], false);
    assert_eq!(json["error"], "invalid_signature");
}

#[tokio::test]
async fn test_verify_payment_missing_fields() {
    let app = common::create_test_app().await;

    let (status, _, json) = common::send(
        &app.router,
        "POST",
        "/api/verify-payment",
        Some(json!({"order_id": "order_abc", "signature": ""})),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(
        json["details"],
        "Missing required payment details: payment_id, signature"
    );
}

#[tokio::test]
async fn test_verify_payment_without_secret() {
    let app = common::create_test_app_with(|config| {
        config.secrets.razorpay_key_secret = None;
    })
    .await;

    let (status, _, json) = common::send(
        &app.router,
        "POST",
        "/api/verify-payment",
        Some(json!({"order_id": "o", "payment_id": "p", "signature": "s"})),
    )
    .await;

    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(json["error"], "missing_credential");
}

#[tokio::test]
async fn test_verify_payment_upgrades_user_plan() {
    let app = common::create_test_app().await;

    common::send(
        &app.router,
        "POST",
        "/api/user/buyer1",
        Some(json!({"name": "Ravi", "usageCount": 3})),
    )
    .await;

    let signature = sign(SECRET, "order_1", "pay_1").unwrap();
    let (status, _, json) = common::send(
        &app.router,
        "POST",
        "/api/verify-payment",
        Some(json!({
            "order_id": "order_1",
            "payment_id": "pay_1",
            "signature": signature,
            "planKey": "pro",
            "userId": "buyer1"
        })),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["user"]["subscriptionStatus"], "pro");
    assert_eq!(json["user"]["usageCount"], 0);
    assert_eq!(json["user"]["planDetails"]["adsPerMonth"], 100);
    assert_eq!(json["user"]["planDetails"]["orderId"], "order_1");

    let stored = app.state.store.get_user("buyer1").await.unwrap().unwrap();
    assert_eq!(stored.subscription_status, "pro");
    assert_eq!(stored.usage_count, 0);
}
