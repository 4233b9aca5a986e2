// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Ad history routes.

use crate::error::{AppError, Result};
use crate::store::files::ANONYMOUS;
use crate::time_utils::now_rfc3339;
use crate::AppState;
use axum::{
    extract::{rejection::JsonRejection, Path, Query, State},
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::sync::Arc;

/// Ad history routes.
pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/save-ad", post(save_ad))
        .route(
            "/api/ads/{user_id}",
            get(list_ads).post(save_ad_for_user).delete(clear_ads),
        )
}

#[derive(Serialize)]
pub struct SaveAdResponse {
    pub success: bool,
    /// Ads now stored for the user
    pub count: usize,
}

/// Owner of an ad: its `userId` field, or `anonymous`.
fn owner_of(ad: &Value) -> String {
    match ad.get("userId") {
        Some(Value::String(s)) if !s.trim().is_empty() => s.trim().to_string(),
        Some(Value::Number(n)) => n.to_string(),
        _ => ANONYMOUS.to_string(),
    }
}

async fn store_ad(state: &AppState, user_id: &str, mut ad: Value) -> Result<SaveAdResponse> {
    let Some(fields) = ad.as_object_mut() else {
        return Err(AppError::BadRequest(
            "Ad must be a JSON object".to_string(),
        ));
    };
    if !fields.contains_key("createdAt") {
        fields.insert(
            "createdAt".to_string(),
            Value::String(now_rfc3339()),
        );
    }

    let count = state.store.push_ad(user_id, ad).await?;
    tracing::debug!(user_id = %user_id, count, "Ad saved");
    Ok(SaveAdResponse {
        success: true,
        count,
    })
}

async fn save_ad(
    State(state): State<Arc<AppState>>,
    payload: std::result::Result<Json<Value>, JsonRejection>,
) -> Result<Json<SaveAdResponse>> {
    let Json(ad) = payload?;
    let user_id = owner_of(&ad);
    Ok(Json(store_ad(&state, &user_id, ad).await?))
}

async fn save_ad_for_user(
    State(state): State<Arc<AppState>>,
    Path(user_id): Path<String>,
    payload: std::result::Result<Json<Value>, JsonRejection>,
) -> Result<Json<SaveAdResponse>> {
    let Json(ad) = payload?;
    Ok(Json(store_ad(&state, &user_id, ad).await?))
}

#[derive(Deserialize)]
struct ListParams {
    limit: Option<usize>,
}

#[derive(Serialize)]
pub struct AdListResponse {
    pub success: bool,
    pub ads: Vec<Value>,
}

async fn list_ads(
    State(state): State<Arc<AppState>>,
    Path(user_id): Path<String>,
    Query(params): Query<ListParams>,
) -> Result<Json<AdListResponse>> {
    let mut ads = state.store.list_ads(&user_id).await?;
    if let Some(limit) = params.limit {
        ads.truncate(limit);
    }
    Ok(Json(AdListResponse { success: true, ads }))
}

#[derive(Serialize)]
pub struct ClearAdsResponse {
    pub success: bool,
    pub deleted: bool,
}

async fn clear_ads(
    State(state): State<Arc<AppState>>,
    Path(user_id): Path<String>,
) -> Result<Json<ClearAdsResponse>> {
    let deleted = state.store.clear_ads(&user_id).await?;
    tracing::info!(user_id = %user_id, deleted, "Ad history cleared");
    Ok(Json(ClearAdsResponse {
        success: true,
        deleted,
    }))
}
