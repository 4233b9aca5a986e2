// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! DeepAI text-to-image client used for ad visuals.

use crate::error::AppError;
use serde::Deserialize;
use std::time::Duration;

const SERVICE: &str = "DeepAI";
const TIMEOUT: Duration = Duration::from_secs(45);

/// DeepAI API client.
#[derive(Clone)]
pub struct DeepAiClient {
    http: reqwest::Client,
    base_url: String,
    api_key: Option<String>,
}

#[derive(Deserialize)]
struct Text2ImgResponse {
    output_url: Option<String>,
}

impl DeepAiClient {
    pub fn new(base_url: &str, api_key: Option<String>) -> Result<Self, AppError> {
        let http = reqwest::Client::builder()
            .timeout(TIMEOUT)
            .build()
            .map_err(|e| AppError::Internal(e.into()))?;

        Ok(Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key,
        })
    }

    pub fn is_configured(&self) -> bool {
        self.api_key.is_some()
    }

    /// Generate an image and return its URL.
    pub async fn text_to_image(&self, prompt: &str) -> Result<String, AppError> {
        let api_key = self
            .api_key
            .as_deref()
            .ok_or(AppError::MissingCredential("DEEPAI_API_KEY"))?;

        let url = format!("{}/api/text2img", self.base_url);
        let form = reqwest::multipart::Form::new().text("text", prompt.to_string());

        let response = self
            .http
            .post(&url)
            .header("Api-Key", api_key)
            .multipart(form)
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

        let parsed: Text2ImgResponse = response.json().await.map_err(|e| AppError::Upstream {
            service: SERVICE,
            status: None,
            body: format!("JSON parse error: {}", e),
        })?;

        parsed
            .output_url
            .filter(|u| !u.is_empty())
            .ok_or_else(|| AppError::Upstream {
                service: SERVICE,
                status: None,
                body: "no image URL returned".to_string(),
            })
    }
}
