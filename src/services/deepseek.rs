// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! DeepSeek chat-completions client used to write ad copy.

use crate::error::AppError;
use serde::{Deserialize, Serialize};
use std::time::Duration;

const SERVICE: &str = "DeepSeek";
const MODEL: &str = "deepseek-chat";
const TIMEOUT: Duration = Duration::from_secs(45);

/// DeepSeek API client.
#[derive(Clone)]
pub struct DeepSeekClient {
    http: reqwest::Client,
    base_url: String,
    api_key: Option<String>,
}

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: [ChatMessage<'a>; 1],
    temperature: f32,
    max_tokens: u32,
}

#[derive(Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<ChatChoice>,
}

#[derive(Deserialize)]
struct ChatChoice {
    message: Option<ChatReply>,
}

#[derive(Deserialize)]
struct ChatReply {
    content: Option<String>,
}

impl DeepSeekClient {
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

    /// Send a single-turn prompt and return the assistant's reply text.
    pub async fn complete(&self, prompt: &str) -> Result<String, AppError> {
        let api_key = self
            .api_key
            .as_deref()
            .ok_or(AppError::MissingCredential("DEEPSEEK_API_KEY"))?;

        let url = format!("{}/v1/chat/completions", self.base_url);
        let body = ChatRequest {
            model: MODEL,
            messages: [ChatMessage {
                role: "user",
                content: prompt,
            }],
            temperature: 0.7,
            max_tokens: 500,
        };

        tracing::debug!(prompt_len = prompt.len(), "Requesting ad copy from DeepSeek");

        let response = self
            .http
            .post(&url)
            .bearer_auth(api_key)
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

        let parsed: ChatResponse = response.json().await.map_err(|e| AppError::Upstream {
            service: SERVICE,
            status: None,
            body: format!("JSON parse error: {}", e),
        })?;

        parsed
            .choices
            .into_iter()
            .next()
            .and_then(|c| c.message)
            .and_then(|m| m.content)
            .filter(|c| !c.trim().is_empty())
            .ok_or_else(|| AppError::Upstream {
                service: SERVICE,
                status: None,
                body: "response contained no message content".to_string(),
            })
    }
}
