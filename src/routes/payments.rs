// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Razorpay checkout routes: order creation and payment verification.

use crate::error::{AppError, Result};
use crate::models::{Plan, UserRecord};
use crate::time_utils::now_rfc3339;
use crate::AppState;
use axum::{
    extract::{rejection::JsonRejection, State},
    routing::post,
    Json, Router,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Payment routes. The unprefixed paths are kept for older front-ends.
pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/api/create-razorpay-order", post(create_order))
        .route("/create-razorpay-order", post(create_order))
        .route("/api/verify-payment", post(verify_payment))
        .route("/verify-payment", post(verify_payment))
}

fn missing_fields_error(prefix: &str, missing: &[&str]) -> AppError {
    AppError::BadRequest(format!("{}: {}", prefix, missing.join(", ")))
}

fn present(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|v| !v.is_empty())
}

// ─── Order Creation ──────────────────────────────────────────

/// Amount as sent by the client: a number or a numeric string.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum AmountInput {
    Integer(u64),
    Float(f64),
    Text(String),
}

impl AmountInput {
    /// Positive whole amount in the smallest currency unit.
    fn to_amount(&self) -> Option<u64> {
        match self {
            AmountInput::Integer(n) => Some(*n),
            AmountInput::Float(f) if f.fract() == 0.0 && *f >= 0.0 && *f <= u64::MAX as f64 => {
                Some(*f as u64)
            }
            AmountInput::Float(_) => None,
            AmountInput::Text(s) => s.trim().parse().ok(),
        }
    }

    /// Blank text or anything that parses to zero (`0`, `0.0`, `"00"`).
    fn is_zero(&self) -> bool {
        match self {
            AmountInput::Text(s) if s.trim().is_empty() => true,
            other => other.to_amount() == Some(0),
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateOrderRequest {
    #[serde(default)]
    pub plan_key: Option<String>,
    #[serde(default, alias = "price")]
    pub amount: Option<AmountInput>,
    #[serde(default)]
    pub currency: Option<String>,
    #[serde(default)]
    pub plan_name: Option<String>,
}

#[derive(Serialize)]
pub struct CreateOrderResponse {
    pub success: bool,
    pub order_id: String,
    pub amount: u64,
    pub currency: String,
    #[serde(rename = "planKey")]
    pub plan_key: String,
    pub key_id: Option<String>,
    pub mock: bool,
}

async fn create_order(
    State(state): State<Arc<AppState>>,
    payload: std::result::Result<Json<CreateOrderRequest>, JsonRejection>,
) -> Result<Json<CreateOrderResponse>> {
    let Json(req) = payload?;

    let plan_key = present(&req.plan_key);
    let amount = req.amount.as_ref().filter(|a| !a.is_zero());

    let mut missing = Vec::new();
    if plan_key.is_none() {
        missing.push("planKey");
    }
    if amount.is_none() {
        missing.push("amount");
    }
    let (Some(plan_key), Some(amount)) = (plan_key, amount) else {
        return Err(missing_fields_error("Missing required fields", &missing));
    };

    let amount = amount.to_amount().ok_or_else(|| {
        AppError::BadRequest("amount must be a positive whole number".to_string())
    })?;

    let plan = Plan::from_key(plan_key)
        .filter(|p| p.is_paid())
        .ok_or_else(|| AppError::BadRequest(format!("Unknown paid plan: {}", plan_key)))?;

    let currency = present(&req.currency)
        .unwrap_or("INR")
        .to_ascii_uppercase();

    if amount != plan.price(&currency) {
        tracing::warn!(
            plan = plan.key(),
            amount,
            list_price = plan.price(&currency),
            currency = %currency,
            "Order amount differs from plan list price"
        );
    }

    tracing::info!(
        plan = plan.key(),
        plan_name = req.plan_name.as_deref().unwrap_or(plan.name()),
        amount,
        currency = %currency,
        "Creating Razorpay order"
    );

    let order = state
        .razorpay
        .create_order(amount, &currency, plan.key())
        .await?;

    Ok(Json(CreateOrderResponse {
        success: true,
        order_id: order.id,
        amount: order.amount,
        currency: order.currency,
        plan_key: plan.key().to_string(),
        key_id: state.razorpay.key_id().map(str::to_string),
        mock: state.razorpay.is_mock(),
    }))
}

// ─── Payment Verification ────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct VerifyPaymentRequest {
    #[serde(default, alias = "razorpay_order_id")]
    pub order_id: Option<String>,
    #[serde(default, alias = "razorpay_payment_id")]
    pub payment_id: Option<String>,
    #[serde(default, alias = "razorpay_signature")]
    pub signature: Option<String>,
    #[serde(default, rename = "planKey")]
    pub plan_key: Option<String>,
    #[serde(default, rename = "userId", alias = "uid")]
    pub user_id: Option<String>,
}

#[derive(Serialize)]
pub struct VerifyPaymentResponse {
    pub success: bool,
    pub message: String,
    #[serde(rename = "planKey")]
    pub plan_key: String,
    pub payment_id: String,
    pub order_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user: Option<UserRecord>,
}

async fn verify_payment(
    State(state): State<Arc<AppState>>,
    payload: std::result::Result<Json<VerifyPaymentRequest>, JsonRejection>,
) -> Result<Json<VerifyPaymentResponse>> {
    let Json(req) = payload?;

    let payment_id = present(&req.payment_id);
    let order_id = present(&req.order_id);
    let signature = present(&req.signature);

    let mut missing = Vec::new();
    if payment_id.is_none() {
        missing.push("payment_id");
    }
    if order_id.is_none() {
        missing.push("order_id");
    }
    if signature.is_none() {
        missing.push("signature");
    }
    let (Some(payment_id), Some(order_id), Some(signature)) = (payment_id, order_id, signature)
    else {
        return Err(missing_fields_error(
            "Missing required payment details",
            &missing,
        ));
    };

    state
        .razorpay
        .verify_payment(order_id, payment_id, signature)?;

    let plan_key = present(&req.plan_key).unwrap_or("pro").to_string();
    tracing::info!(order_id = %order_id, payment_id = %payment_id, plan = %plan_key, "Payment verified");

    let user = match (present(&req.user_id), Plan::from_key(&plan_key)) {
        (Some(uid), Some(plan)) if plan.is_paid() => {
            let now = now_rfc3339();
            let updated = state
                .store
                .update_user(uid, |record| {
                    record.activate_plan(plan, payment_id, order_id, &now);
                    Ok(())
                })
                .await?;
            if updated.is_none() {
                tracing::warn!(uid = %uid, "Verified payment for unknown user; plan not recorded");
            }
            updated
        }
        _ => None,
    };

    Ok(Json(VerifyPaymentResponse {
        success: true,
        message: "Payment verified successfully".to_string(),
        plan_key,
        payment_id: payment_id.to_string(),
        order_id: order_id.to_string(),
        user,
    }))
}
