// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! User profile and usage routes.

use crate::error::{AppError, Result};
use crate::models::UserRecord;
use crate::store::JsonStore;
use crate::AppState;
use axum::{
    extract::{rejection::JsonRejection, Path, State},
    routing::{get, post},
    Json, Router,
};
use serde::Serialize;
use serde_json::{Map, Value};
use std::sync::Arc;

/// User data routes.
pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/api/user/{uid}", get(get_user).post(save_user))
        .route("/api/user/{uid}/usage", post(increment_usage))
        .route("/sync-user-data", post(sync_user_data))
}

// ─── Profile ─────────────────────────────────────────────────

async fn get_user(
    State(state): State<Arc<AppState>>,
    Path(uid): Path<String>,
) -> Result<Json<UserRecord>> {
    let record = state
        .store
        .get_user(&uid)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("User {} not found", uid)))?;
    Ok(Json(record))
}

fn into_object(body: Value) -> Result<Map<String, Value>> {
    match body {
        Value::Object(map) => Ok(map),
        _ => Err(AppError::BadRequest(
            "Request body must be a JSON object".to_string(),
        )),
    }
}

async fn save_user(
    State(state): State<Arc<AppState>>,
    Path(uid): Path<String>,
    payload: std::result::Result<Json<Value>, JsonRejection>,
) -> Result<Json<UserRecord>> {
    let Json(body) = payload?;
    let record = state.store.upsert_user(&uid, into_object(body)?).await?;
    Ok(Json(record))
}

/// Legacy sync endpoint: the uid travels in the body (`uid` or `id`).
async fn sync_user_data(
    State(state): State<Arc<AppState>>,
    payload: std::result::Result<Json<Value>, JsonRejection>,
) -> Result<Json<UserRecord>> {
    let Json(body) = payload?;
    let patch = into_object(body)?;

    let uid = ["uid", "id"]
        .iter()
        .find_map(|key| match patch.get(*key) {
            Some(Value::String(s)) if !s.trim().is_empty() => Some(s.trim().to_string()),
            Some(Value::Number(n)) => Some(n.to_string()),
            _ => None,
        })
        .ok_or_else(|| AppError::BadRequest("Missing required field: uid".to_string()))?;

    tracing::debug!(uid = %uid, "Syncing user data");
    let record = state.store.upsert_user(&uid, patch).await?;
    Ok(Json(record))
}

// ─── Usage ───────────────────────────────────────────────────

/// Usage counters after a charge.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UsageSummary {
    pub usage_count: u32,
    /// `None` means unlimited
    pub remaining: Option<u32>,
    pub limit: Option<u32>,
    pub plan: String,
}

impl UsageSummary {
    fn for_record(record: &UserRecord) -> Self {
        let plan = record.plan();
        Self {
            usage_count: record.usage_count,
            remaining: plan.remaining(record.usage_count),
            limit: plan.ads_per_month(),
            plan: plan.key().to_string(),
        }
    }
}

/// Charge one ad to `uid`.
///
/// With `enforce`, an exhausted quota is an error and nothing is written.
/// Returns `None` if the user has no record.
pub(crate) async fn charge_usage(
    store: &JsonStore,
    uid: &str,
    enforce: bool,
) -> Result<Option<UsageSummary>> {
    let updated = store
        .update_user(uid, |record| {
            if enforce && !record.can_generate() {
                return Err(AppError::UsageLimitReached(format!(
                    "{} plan allows {} ads",
                    record.plan().name(),
                    record.plan().ads_per_month().unwrap_or_default()
                )));
            }
            record.usage_count = record.usage_count.saturating_add(1);
            Ok(())
        })
        .await?;

    Ok(updated.as_ref().map(UsageSummary::for_record))
}

#[derive(Serialize)]
struct UsageResponse {
    success: bool,
    #[serde(flatten)]
    usage: UsageSummary,
}

async fn increment_usage(
    State(state): State<Arc<AppState>>,
    Path(uid): Path<String>,
) -> Result<Json<UsageResponse>> {
    let usage = charge_usage(&state.store, &uid, true)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("User {} not found", uid)))?;

    tracing::info!(uid = %uid, usage = usage.usage_count, "Usage recorded");
    Ok(Json(UsageResponse {
        success: true,
        usage,
    }))
}
