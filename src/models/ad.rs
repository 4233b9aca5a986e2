//! Ad generation request and parsed ad copy.

use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationError};

/// Required text must contain more than whitespace.
fn not_blank(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::new("blank"));
    }
    Ok(())
}

fn default_language() -> String {
    "English".to_string()
}

fn default_tone() -> String {
    "professional".to_string()
}

fn default_ad_format() -> String {
    "facebook-feed".to_string()
}

/// Form submitted to `/generate-ad`.
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct AdRequest {
    #[validate(length(min = 1, max = 2000), custom(function = "not_blank"))]
    pub product_name: String,
    #[validate(length(min = 1, max = 2000), custom(function = "not_blank"))]
    pub product_description: String,
    #[validate(length(min = 1, max = 2000), custom(function = "not_blank"))]
    pub target_audience: String,
    #[serde(default)]
    #[validate(length(max = 200))]
    pub business_type: Option<String>,
    #[serde(default)]
    #[validate(length(max = 500))]
    pub special_offer: Option<String>,
    #[serde(default = "default_language")]
    #[validate(length(min = 1, max = 50))]
    pub language: String,
    #[serde(default = "default_tone")]
    #[validate(length(min = 1, max = 50))]
    pub tone: String,
    #[serde(default = "default_ad_format")]
    #[validate(length(min = 1, max = 50))]
    pub ad_format: String,
    /// When set, usage is checked against and charged to this user.
    #[serde(default)]
    pub user_id: Option<String>,
}

/// Ad copy parsed from the text model's reply.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AdCopy {
    pub headline: String,
    pub ad_text: String,
    pub cta: String,
}

impl AdCopy {
    /// Parse `HEADLINE:`, `AD_TEXT:` and `CTA:` lines.
    ///
    /// Markdown bold markers around the labels are tolerated. If the reply
    /// has no `AD_TEXT:` line, the whole reply becomes the ad text.
    pub fn parse(raw: &str) -> Self {
        let mut copy = AdCopy::default();

        for line in raw.lines() {
            let line = line.trim().trim_start_matches("**");
            let line = line.replacen(":**", ":", 1);
            let line = line.trim();

            if let Some(rest) = line.strip_prefix("HEADLINE:") {
                copy.headline = rest.trim().to_string();
            } else if let Some(rest) = line.strip_prefix("AD_TEXT:") {
                copy.ad_text = rest.trim().to_string();
            } else if let Some(rest) = line.strip_prefix("CTA:") {
                copy.cta = rest.trim().to_string();
            }
        }

        if copy.ad_text.is_empty() {
            copy.ad_text = raw.trim().to_string();
        }

        copy
    }
}
