// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Razorpay order creation and payment signature verification.
//!
//! Orders are created through the Razorpay REST API when credentials are
//! configured, otherwise a mock order id is returned so the checkout flow
//! can be exercised locally. Signatures are always checked for real.

use crate::error::AppError;
use hmac::{Hmac, Mac};
use ring::rand::{SecureRandom, SystemRandom};
use serde::{Deserialize, Serialize};
use sha2::Sha256;
use std::time::Duration;
use subtle::ConstantTimeEq;

// Type alias for HMAC-SHA256
type HmacSha256 = Hmac<Sha256>;

const SERVICE: &str = "Razorpay";
const TIMEOUT: Duration = Duration::from_secs(30);
const MOCK_ORDER_ID_LEN: usize = 14;
const ALPHANUMERIC: &[u8] = b"abcdefghijklmnopqrstuvwxyzABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789";

/// Hex-encoded `HMAC_SHA256(secret, order_id|payment_id)`.
pub fn sign(secret: &[u8], order_id: &str, payment_id: &str) -> Result<String, AppError> {
    let mut mac = HmacSha256::new_from_slice(secret)
        .map_err(|e| AppError::Internal(anyhow::anyhow!("HMAC init failed: {}", e)))?;
    mac.update(order_id.as_bytes());
    mac.update(b"|");
    mac.update(payment_id.as_bytes());
    Ok(hex::encode(mac.finalize().into_bytes()))
}

/// Check a client-supplied payment signature in constant time.
pub fn verify_signature(secret: &[u8], order_id: &str, payment_id: &str, signature: &str) -> bool {
    let Ok(expected) = sign(secret, order_id, payment_id) else {
        return false;
    };
    let supplied = signature.trim().to_ascii_lowercase();
    expected.as_bytes().ct_eq(supplied.as_bytes()).into()
}

/// Generate a mock order id: `order_` followed by random alphanumerics.
pub fn mock_order_id(rng: &SystemRandom) -> Result<String, AppError> {
    let mut bytes = [0u8; MOCK_ORDER_ID_LEN];
    rng.fill(&mut bytes)
        .map_err(|_| AppError::Internal(anyhow::anyhow!("system RNG failure")))?;

    let suffix: String = bytes
        .iter()
        .map(|b| ALPHANUMERIC[*b as usize % ALPHANUMERIC.len()] as char)
        .collect();
    Ok(format!("order_{}", suffix))
}

/// Order as returned by Razorpay (and by the mock).
#[derive(Debug, Clone, Deserialize)]
pub struct RazorpayOrder {
    pub id: String,
    pub amount: u64,
    pub currency: String,
    #[serde(default)]
    pub status: Option<String>,
}

#[derive(Serialize)]
struct CreateOrderRequest<'a> {
    amount: u64,
    currency: &'a str,
    receipt: &'a str,
    notes: OrderNotes<'a>,
}

#[derive(Serialize)]
struct OrderNotes<'a> {
    plan_key: &'a str,
}

/// Razorpay API client.
#[derive(Clone)]
pub struct RazorpayClient {
    http: reqwest::Client,
    base_url: String,
    key_id: Option<String>,
    key_secret: Option<String>,
    mock: bool,
    rng: SystemRandom,
}

impl RazorpayClient {
    pub fn new(
        base_url: &str,
        key_id: Option<String>,
        key_secret: Option<String>,
        mock: bool,
    ) -> Result<Self, AppError> {
        let http = reqwest::Client::builder()
            .timeout(TIMEOUT)
            .build()
            .map_err(|e| AppError::Internal(e.into()))?;

        let mock = mock || key_id.is_none() || key_secret.is_none();

        Ok(Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
            key_id,
            key_secret,
            mock,
            rng: SystemRandom::new(),
        })
    }

    pub fn is_mock(&self) -> bool {
        self.mock
    }

    /// Public key id handed to the checkout widget.
    pub fn key_id(&self) -> Option<&str> {
        self.key_id.as_deref()
    }

    /// Create an order for `amount` (smallest currency unit).
    pub async fn create_order(
        &self,
        amount: u64,
        currency: &str,
        plan_key: &str,
    ) -> Result<RazorpayOrder, AppError> {
        let receipt = format!(
            "rcpt_{}_{}",
            plan_key,
            chrono::Utc::now().timestamp_millis()
        );

        let (key_id, key_secret) = match (&self.key_id, &self.key_secret) {
            (Some(id), Some(secret)) if !self.mock => (id, secret),
            _ => {
                let order = RazorpayOrder {
                    id: mock_order_id(&self.rng)?,
                    amount,
                    currency: currency.to_string(),
                    status: Some("created".to_string()),
                };
                tracing::info!(order_id = %order.id, plan_key, amount, "Mock Razorpay order created");
                return Ok(order);
            }
        };

        let url = format!("{}/v1/orders", self.base_url);
        let body = CreateOrderRequest {
            amount,
            currency,
            receipt: &receipt,
            notes: OrderNotes { plan_key },
        };

        let response = self
            .http
            .post(&url)
            .basic_auth(key_id, Some(key_secret))
            .json(&body)
            .send()
            .await
            .map_err(|e| AppError::from_reqwest(SERVICE, e))?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let body = response.text().await.unwrap_or_default();
            return Err(AppError::Upstream {
                service: SERVICE,
                status: Some(status),
                body,
            });
        }

        let order: RazorpayOrder = response.json().await.map_err(|e| AppError::Upstream {
            service: SERVICE,
            status: None,
            body: format!("JSON parse error: {}", e),
        })?;

        tracing::info!(order_id = %order.id, plan_key, amount, "Razorpay order created");
        Ok(order)
    }

    /// Verify a checkout signature with the configured key secret.
    pub fn verify_payment(
        &self,
        order_id: &str,
        payment_id: &str,
        signature: &str,
    ) -> Result<(), AppError> {
        let secret = self
            .key_secret
            .as_deref()
            .ok_or(AppError::MissingCredential("RAZORPAY_KEY_SECRET"))?;

        if verify_signature(secret.as_bytes(), order_id, payment_id, signature) {
            Ok(())
        } else {
            Err(AppError::InvalidSignature)
        }
    }
}
