// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Application configuration loaded from environment variables.
//!
//! Provider credentials are read once at startup and kept in memory. They
//! are exposed to the browser through `/config.js` and used by the
//! outbound API clients.

use std::env;
use std::fmt;
use std::path::PathBuf;

pub const DEFAULT_DEEPSEEK_API_BASE: &str = "https://api.deepseek.com";
pub const DEFAULT_DEEPAI_API_BASE: &str = "https://api.deepai.org";
pub const DEFAULT_RAZORPAY_API_BASE: &str = "https://api.razorpay.com";

/// Default number of ads kept per user.
pub const DEFAULT_AD_HISTORY_CAP: usize = 50;

/// Ports probed when `PORT` is not set.
pub const PORT_SCAN_RANGE: std::ops::RangeInclusive<u16> = 5000..=5100;

/// Names of the secret environment variables, in `/config.js` order.
pub const SECRET_NAMES: [&str; 9] = [
    "DEEPSEEK_API_KEY",
    "DEEPAI_API_KEY",
    "RAZORPAY_KEY_ID",
    "RAZORPAY_KEY_SECRET",
    "GOOGLE_CLIENT_ID",
    "FIREBASE_API_KEY",
    "FIREBASE_AUTH_DOMAIN",
    "FIREBASE_PROJECT_ID",
    "FIREBASE_APP_ID",
];

/// Provider credentials. Empty values are stored as `None`.
#[derive(Clone, Default)]
pub struct Secrets {
    pub deepseek_api_key: Option<String>,
    pub deepai_api_key: Option<String>,
    pub razorpay_key_id: Option<String>,
    pub razorpay_key_secret: Option<String>,
    pub google_client_id: Option<String>,
    pub firebase_api_key: Option<String>,
    pub firebase_auth_domain: Option<String>,
    pub firebase_project_id: Option<String>,
    pub firebase_app_id: Option<String>,
}

impl Secrets {
    /// Read every secret through `lookup`, trimming whitespace.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let read = |name: &str| {
            lookup(name)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };

        Self {
            deepseek_api_key: read("DEEPSEEK_API_KEY"),
            deepai_api_key: read("DEEPAI_API_KEY"),
            razorpay_key_id: read("RAZORPAY_KEY_ID"),
            razorpay_key_secret: read("RAZORPAY_KEY_SECRET"),
            google_client_id: read("GOOGLE_CLIENT_ID"),
            firebase_api_key: read("FIREBASE_API_KEY"),
            firebase_auth_domain: read("FIREBASE_AUTH_DOMAIN"),
            firebase_project_id: read("FIREBASE_PROJECT_ID"),
            firebase_app_id: read("FIREBASE_APP_ID"),
        }
    }

    /// Look up a secret by its environment variable name.
    pub fn get(&self, name: &str) -> Option<&str> {
        let value = match name {
            "DEEPSEEK_API_KEY" => &self.deepseek_api_key,
            "DEEPAI_API_KEY" => &self.deepai_api_key,
            "RAZORPAY_KEY_ID" => &self.razorpay_key_id,
            "RAZORPAY_KEY_SECRET" => &self.razorpay_key_secret,
            "GOOGLE_CLIENT_ID" => &self.google_client_id,
            "FIREBASE_API_KEY" => &self.firebase_api_key,
            "FIREBASE_AUTH_DOMAIN" => &self.firebase_auth_domain,
            "FIREBASE_PROJECT_ID" => &self.firebase_project_id,
            "FIREBASE_APP_ID" => &self.firebase_app_id,
            _ => return None,
        };
        value.as_deref()
    }

    /// Names of the secrets that are not configured.
    pub fn missing(&self) -> Vec<&'static str> {
        SECRET_NAMES
            .iter()
            .copied()
            .filter(|name| self.get(name).is_none())
            .collect()
    }
}

impl fmt::Debug for Secrets {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut s = f.debug_struct("Secrets");
        for name in SECRET_NAMES {
            let shown = if self.get(name).is_some() {
                "<set>"
            } else {
                "<missing>"
            };
            s.field(name, &shown);
        }
        s.finish()
    }
}

/// Application configuration, loaded once at startup.
#[derive(Debug, Clone)]
pub struct Config {
    /// Listen port. `None` means "scan for a free one".
    pub port: Option<u16>,
    /// Directory served as static files
    pub public_dir: PathBuf,
    /// Directory holding `user_data_*.json` and `user_ads_*.json`
    pub data_dir: PathBuf,
    /// Maximum ads kept per user (most recent first)
    pub ad_history_cap: usize,
    /// Mock Razorpay order creation even when credentials exist
    pub razorpay_mock: bool,
    pub deepseek_api_base: String,
    pub deepai_api_base: String,
    pub razorpay_api_base: String,
    pub secrets: Secrets,
}

impl Config {
    /// Load configuration from environment variables (and `.env` if present).
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok(); // Load .env file if present

        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Build configuration from an arbitrary variable source.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let port = match lookup("PORT").filter(|v| !v.trim().is_empty()) {
            Some(raw) => Some(raw.trim().parse::<u16>().map_err(|_| ConfigError::Invalid {
                name: "PORT",
                value: raw.clone(),
            })?),
            None => None,
        };

        let ad_history_cap = match lookup("AD_HISTORY_CAP").filter(|v| !v.trim().is_empty()) {
            Some(raw) => match raw.trim().parse::<usize>() {
                Ok(cap) if cap >= 1 => cap,
                _ => {
                    return Err(ConfigError::Invalid {
                        name: "AD_HISTORY_CAP",
                        value: raw,
                    })
                }
            },
            None => DEFAULT_AD_HISTORY_CAP,
        };

        let razorpay_mock = lookup("RAZORPAY_MOCK")
            .map(|v| matches!(v.trim().to_ascii_lowercase().as_str(), "1" | "true" | "yes"))
            .unwrap_or(false);

        let base = |name: &str, default: &str| {
            lookup(name)
                .map(|v| v.trim().trim_end_matches('/').to_string())
                .filter(|v| !v.is_empty())
                .unwrap_or_else(|| default.to_string())
        };

        Ok(Self {
            port,
            public_dir: lookup("PUBLIC_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from("public")),
            data_dir: lookup("DATA_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from("data")),
            ad_history_cap,
            razorpay_mock,
            deepseek_api_base: base("DEEPSEEK_API_BASE", DEFAULT_DEEPSEEK_API_BASE),
            deepai_api_base: base("DEEPAI_API_BASE", DEFAULT_DEEPAI_API_BASE),
            razorpay_api_base: base("RAZORPAY_API_BASE", DEFAULT_RAZORPAY_API_BASE),
            secrets: Secrets::from_lookup(&lookup),
        })
    }

    /// Offline configuration for tests: every secret set, Razorpay mocked.
    pub fn test_default() -> Self {
        Self {
            port: Some(0),
            public_dir: PathBuf::from("public"),
            data_dir: PathBuf::from("data"),
            ad_history_cap: DEFAULT_AD_HISTORY_CAP,
            razorpay_mock: true,
            deepseek_api_base: "http://127.0.0.1:9".to_string(),
            deepai_api_base: "http://127.0.0.1:9".to_string(),
            razorpay_api_base: "http://127.0.0.1:9".to_string(),
            secrets: Secrets {
                deepseek_api_key: Some("test_deepseek_key".to_string()),
                deepai_api_key: Some("test_deepai_key".to_string()),
                razorpay_key_id: Some("rzp_test_key".to_string()),
                razorpay_key_secret: Some("test_razorpay_secret".to_string()),
                google_client_id: Some("test-client.apps.googleusercontent.com".to_string()),
                firebase_api_key: Some("test_firebase_key".to_string()),
                firebase_auth_domain: Some("test.firebaseapp.com".to_string()),
                firebase_project_id: Some("test-project".to_string()),
                firebase_app_id: Some("1:123:web:abc".to_string()),
            },
        }
    }

    /// Whether Razorpay order creation should be mocked.
    pub fn razorpay_is_mocked(&self) -> bool {
        self.razorpay_mock
            || self.secrets.razorpay_key_id.is_none()
            || self.secrets.razorpay_key_secret.is_none()
    }
}

/// Pick the listen port: the configured one, or the first free port in
/// [`PORT_SCAN_RANGE`].
pub fn find_free_port(configured: Option<u16>) -> Result<u16, ConfigError> {
    if let Some(port) = configured {
        return Ok(port);
    }

    PORT_SCAN_RANGE
        .into_iter()
        .find(|port| std::net::TcpListener::bind(("0.0.0.0", *port)).is_ok())
        .ok_or(ConfigError::NoFreePort)
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid value for {name}: {value:?}")]
    Invalid { name: &'static str, value: String },

    #[error("No free port available in 5000-5100")]
    NoFreePort,
}
