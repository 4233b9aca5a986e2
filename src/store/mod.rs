// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Storage layer (flat JSON files keyed by user id).

pub mod json_store;

pub use json_store::JsonStore;

/// File name conventions.
pub mod files {
    pub const USER_DATA_PREFIX: &str = "user_data_";
    pub const USER_ADS_PREFIX: &str = "user_ads_";
    /// Owner of ads saved without a `userId`
    pub const ANONYMOUS: &str = "anonymous";

    pub fn user_data(uid: &str) -> String {
        format!("{}{}.json", USER_DATA_PREFIX, uid)
    }

    pub fn user_ads(uid: &str) -> String {
        format!("{}{}.json", USER_ADS_PREFIX, uid)
    }
}

const MAX_UID_LEN: usize = 128;

/// Check that `uid` is safe to embed in a file name.
///
/// Allowed: 1-128 characters of `[A-Za-z0-9_.@-]`, never `..`.
pub fn validate_uid(uid: &str) -> Result<(), crate::error::AppError> {
    let ok = !uid.is_empty()
        && uid.len() <= MAX_UID_LEN
        && !uid.contains("..")
        && uid
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '.' | '@' | '-'));

    if ok {
        Ok(())
    } else {
        Err(crate::error::AppError::BadRequest(format!(
            "Invalid user id: {:?}",
            uid.chars().take(MAX_UID_LEN).collect::<String>()
        )))
    }
}
