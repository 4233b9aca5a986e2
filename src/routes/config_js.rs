// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! `/config.js`: provider configuration injected into the browser.

use crate::config::{Secrets, SECRET_NAMES};
use crate::AppState;
use axum::{
    extract::State,
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    routing::get,
    Router,
};
use serde_json::Value;
use std::sync::Arc;

/// Secrets that stay on the server and are never written into the script.
const SERVER_ONLY: [&str; 1] = ["RAZORPAY_KEY_SECRET"];

const AI_KEYS: [&str; 2] = ["DEEPSEEK_API_KEY", "DEEPAI_API_KEY"];
const PAYMENT_KEYS: [&str; 2] = ["RAZORPAY_KEY_ID", "RAZORPAY_KEY_SECRET"];
const FIREBASE_KEYS: [&str; 4] = [
    "FIREBASE_API_KEY",
    "FIREBASE_AUTH_DOMAIN",
    "FIREBASE_PROJECT_ID",
    "FIREBASE_APP_ID",
];

/// Config script routes.
pub fn routes() -> Router<Arc<AppState>> {
    Router::new().route("/config.js", get(config_js))
}

async fn config_js(State(state): State<Arc<AppState>>) -> Response {
    let missing = state.config.secrets.missing();
    if !missing.is_empty() {
        tracing::debug!(missing = ?missing, "Serving config.js with missing keys");
    }

    (
        StatusCode::OK,
        [
            (header::CONTENT_TYPE, "application/javascript; charset=utf-8"),
            (header::CACHE_CONTROL, "no-cache, no-store, must-revalidate"),
            (header::PRAGMA, "no-cache"),
            (header::EXPIRES, "0"),
        ],
        render_config_js(&state.config.secrets),
    )
        .into_response()
}

/// Render the `window.CONFIG = {...};` script.
///
/// Values are emitted as JSON string literals so quotes and newlines in a
/// secret cannot break out of the script.
pub fn render_config_js(secrets: &Secrets) -> String {
    let missing = secrets.missing();
    let any_missing = |names: &[&'static str]| names.iter().any(|n| missing.contains(n));

    let mut script = String::from("window.CONFIG = {\n");
    for name in SECRET_NAMES.iter().filter(|n| !SERVER_ONLY.contains(*n)) {
        let value = Value::String(secrets.get(name).unwrap_or_default().to_string());
        script.push_str(&format!("    {}: {},\n", name, value));
    }

    script.push_str(&format!(
        "    MISSING_KEYS: {},\n",
        Value::from(missing.clone())
    ));

    let flags = [
        ("AI_KEYS_MISSING", any_missing(&AI_KEYS)),
        ("PAYMENT_KEYS_MISSING", any_missing(&PAYMENT_KEYS)),
        ("FIREBASE_CONFIG_MISSING", any_missing(&FIREBASE_KEYS)),
        ("GOOGLE_CLIENT_ID_MISSING", any_missing(&["GOOGLE_CLIENT_ID"])),
    ];
    let lines: Vec<String> = flags
        .iter()
        .map(|(label, flag)| format!("    {}: {}", label, flag))
        .collect();
    // No trailing comma after the last entry
    script.push_str(&lines.join(",\n"));
    script.push('\n');
    script.push_str("};\n");
    script
}
