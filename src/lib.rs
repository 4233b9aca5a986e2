// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@kernel.org>

//! Ad generator backend
//!
//! Serves the ad generator web app, injects provider configuration into
//! the browser, proxies ad copy and image generation, handles Razorpay
//! checkout and keeps per-user JSON data on disk.

pub mod config;
pub mod error;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod services;
pub mod store;
pub mod time_utils;

use config::Config;
use services::{DeepAiClient, DeepSeekClient, RazorpayClient};
use store::JsonStore;

/// Shared application state.
pub struct AppState {
    pub config: Config,
    pub store: JsonStore,
    pub deepseek: DeepSeekClient,
    pub deepai: DeepAiClient,
    pub razorpay: RazorpayClient,
}

impl AppState {
    /// Build state from configuration, opening the data directory.
    pub async fn from_config(config: Config) -> Result<Self, error::AppError> {
        let store = JsonStore::new(&config.data_dir, config.ad_history_cap).await?;
        let deepseek = DeepSeekClient::new(
            &config.deepseek_api_base,
            config.secrets.deepseek_api_key.clone(),
        )?;
        let deepai = DeepAiClient::new(
            &config.deepai_api_base,
            config.secrets.deepai_api_key.clone(),
        )?;
        let razorpay = RazorpayClient::new(
            &config.razorpay_api_base,
            config.secrets.razorpay_key_id.clone(),
            config.secrets.razorpay_key_secret.clone(),
            config.razorpay_mock,
        )?;

        Ok(Self {
            config,
            store,
            deepseek,
            deepai,
            razorpay,
        })
    }
}
