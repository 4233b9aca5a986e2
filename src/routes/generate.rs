// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Ad generation: copy from DeepSeek, visual from DeepAI.

use crate::error::{AppError, Result};
use crate::models::{AdCopy, AdRequest};
use crate::routes::users::{charge_usage, UsageSummary};
use crate::services::prompt;
use crate::AppState;
use axum::{
    extract::{rejection::JsonRejection, State},
    routing::post,
    Json, Router,
};
use serde::Serialize;
use std::sync::Arc;
use validator::Validate;

/// Generation routes.
pub fn routes() -> Router<Arc<AppState>> {
    Router::new().route("/generate-ad", post(generate_ad))
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateAdResponse {
    pub success: bool,
    #[serde(flatten)]
    pub copy: AdCopy,
    /// Unparsed reply from the text model
    pub raw_text: String,
    pub image_url: String,
    pub image_prompt: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub usage: Option<UsageSummary>,
}

async fn generate_ad(
    State(state): State<Arc<AppState>>,
    payload: std::result::Result<Json<AdRequest>, JsonRejection>,
) -> Result<Json<GenerateAdResponse>> {
    let Json(req) = payload?;
    req.validate()?;

    // Both providers are needed; check before calling either
    if !state.deepseek.is_configured() {
        return Err(AppError::MissingCredential("DEEPSEEK_API_KEY"));
    }
    if !state.deepai.is_configured() {
        return Err(AppError::MissingCredential("DEEPAI_API_KEY"));
    }

    let user_id = req
        .user_id
        .as_deref()
        .map(str::trim)
        .filter(|u| !u.is_empty());

    if let Some(uid) = user_id {
        if let Some(user) = state.store.get_user(uid).await? {
            if !user.can_generate() {
                tracing::info!(uid = %uid, usage = user.usage_count, "Ad generation refused: quota spent");
                return Err(AppError::UsageLimitReached(format!(
                    "{} plan allows {} ads",
                    user.plan().name(),
                    user.plan().ads_per_month().unwrap_or_default()
                )));
            }
        }
    }

    tracing::info!(
        product = %req.product_name,
        format = %req.ad_format,
        language = %req.language,
        "Generating ad"
    );

    let raw_text = state.deepseek.complete(&prompt::text_prompt(&req)).await?;
    let copy = AdCopy::parse(&raw_text);

    let image_prompt = prompt::image_prompt(&req, &copy);
    let image_url = state.deepai.text_to_image(&image_prompt).await?;

    // Quota was checked up front; a concurrent request may have used the
    // last slot meanwhile. It is charged regardless.
    let usage = match user_id {
        Some(uid) => charge_usage(&state.store, uid, false).await?,
        None => None,
    };

    tracing::info!(headline = %copy.headline, "Ad generated");

    Ok(Json(GenerateAdResponse {
        success: true,
        copy,
        raw_text,
        image_url,
        image_prompt,
        usage,
    }))
}
