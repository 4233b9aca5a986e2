// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Flat-file JSON store with typed operations.
//!
//! Provides high-level operations for:
//! - Users (`user_data_<uid>.json`, profile and usage counters)
//! - Ads (`user_ads_<uid>.json`, most recent first, capped)
//!
//! Each read-modify-write cycle holds a per-file async lock, and writes
//! land through a temp file plus rename so readers never see a torn file.

use crate::error::AppError;
use crate::models::UserRecord;
use crate::store::{files, validate_uid};
use crate::time_utils::now_rfc3339;
use dashmap::DashMap;
use serde::{de::DeserializeOwned, Serialize};
use serde_json::{Map, Value};
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::sync::{Mutex, OwnedMutexGuard};

/// Held per-file lock; prunes its map entry on release.
struct FileLock<'a> {
    locks: &'a DashMap<String, Arc<Mutex<()>>>,
    key: String,
    guard: Option<OwnedMutexGuard<()>>,
}

impl Drop for FileLock<'_> {
    fn drop(&mut self) {
        drop(self.guard.take());
        // Entries are cloned under the shard lock, so a count of one means
        // nobody else is holding or waiting.
        self.locks
            .remove_if(&self.key, |_, lock| Arc::strong_count(lock) == 1);
    }
}

/// JSON file store rooted at a single directory.
#[derive(Clone)]
pub struct JsonStore {
    dir: PathBuf,
    ad_cap: usize,
    locks: Arc<DashMap<String, Arc<Mutex<()>>>>,
}

impl JsonStore {
    /// Open the store, creating `dir` if needed.
    pub async fn new<P: AsRef<Path>>(dir: P, ad_cap: usize) -> Result<Self, AppError> {
        let dir = dir.as_ref().to_path_buf();
        tokio::fs::create_dir_all(&dir).await.map_err(|e| {
            AppError::Storage(format!("Failed to create {}: {}", dir.display(), e))
        })?;

        tracing::info!(dir = %dir.display(), ad_cap, "Opened JSON store");

        Ok(Self {
            dir,
            ad_cap: ad_cap.max(1),
            locks: Arc::new(DashMap::new()),
        })
    }

    /// Take the per-file lock. The map entry is dropped again once no task
    /// holds or waits on it, so the map only tracks files in use.
    async fn lock_file(&self, file_name: &str) -> FileLock<'_> {
        let lock = self
            .locks
            .entry(file_name.to_string())
            .or_insert_with(|| Arc::new(Mutex::new(())))
            .clone();

        FileLock {
            locks: &self.locks,
            key: file_name.to_string(),
            guard: Some(lock.lock_owned().await),
        }
    }

    /// Read and parse a file. Missing or unparseable files read as `None`.
    async fn read_json<T: DeserializeOwned>(&self, file_name: &str) -> Result<Option<T>, AppError> {
        let path = self.dir.join(file_name);
        let bytes = match tokio::fs::read(&path).await {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };

        match serde_json::from_slice(&bytes) {
            Ok(value) => Ok(Some(value)),
            Err(e) => {
                tracing::warn!(file = %file_name, error = %e, "Ignoring unreadable JSON file");
                Ok(None)
            }
        }
    }

    /// Write a file via temp file + rename.
    async fn write_json<T: Serialize>(&self, file_name: &str, value: &T) -> Result<(), AppError> {
        let data = serde_json::to_vec_pretty(value)
            .map_err(|e| AppError::Storage(format!("Serialization failed: {}", e)))?;

        let tmp = self.dir.join(format!(".{}.tmp", file_name));
        tokio::fs::write(&tmp, &data).await?;
        tokio::fs::rename(&tmp, self.dir.join(file_name)).await?;
        Ok(())
    }

    // ─── Users ───────────────────────────────────────────────────

    /// Get a user record by uid.
    pub async fn get_user(&self, uid: &str) -> Result<Option<UserRecord>, AppError> {
        validate_uid(uid)?;
        self.read_json(&files::user_data(uid)).await
    }

    /// Merge `patch` into the stored record (creating it if absent).
    pub async fn upsert_user(
        &self,
        uid: &str,
        patch: Map<String, Value>,
    ) -> Result<UserRecord, AppError> {
        validate_uid(uid)?;
        let file_name = files::user_data(uid);
        let _guard = self.lock_file(&file_name).await;

        let existing: Option<UserRecord> = self.read_json(&file_name).await?;
        let now = now_rfc3339();
        let record = merge_user(existing, uid, patch, &now)?;

        self.write_json(&file_name, &record).await?;
        tracing::debug!(uid = %uid, usage = record.usage_count, "User record saved");
        Ok(record)
    }

    /// Apply `update` to an existing record. Returns `None` if the user
    /// does not exist; nothing is written if `update` fails.
    pub async fn update_user<F>(&self, uid: &str, update: F) -> Result<Option<UserRecord>, AppError>
    where
        F: FnOnce(&mut UserRecord) -> Result<(), AppError>,
    {
        validate_uid(uid)?;
        let file_name = files::user_data(uid);
        let _guard = self.lock_file(&file_name).await;

        let Some(mut record) = self.read_json::<UserRecord>(&file_name).await? else {
            return Ok(None);
        };

        update(&mut record)?;
        record.uid = uid.to_string();
        self.write_json(&file_name, &record).await?;
        Ok(Some(record))
    }

    // ─── Ads ─────────────────────────────────────────────────────

    /// List a user's ads, most recent first.
    pub async fn list_ads(&self, uid: &str) -> Result<Vec<Value>, AppError> {
        validate_uid(uid)?;
        Ok(self
            .read_json(&files::user_ads(uid))
            .await?
            .unwrap_or_default())
    }

    /// Prepend an ad and truncate to the cap. Returns the stored count.
    pub async fn push_ad(&self, uid: &str, ad: Value) -> Result<usize, AppError> {
        validate_uid(uid)?;
        let file_name = files::user_ads(uid);
        let _guard = self.lock_file(&file_name).await;

        let mut ads: Vec<Value> = self.read_json(&file_name).await?.unwrap_or_default();
        ads.insert(0, ad);
        ads.truncate(self.ad_cap);

        self.write_json(&file_name, &ads).await?;
        Ok(ads.len())
    }

    /// Delete a user's ad history. Returns whether a file was removed.
    pub async fn clear_ads(&self, uid: &str) -> Result<bool, AppError> {
        validate_uid(uid)?;
        let file_name = files::user_ads(uid);
        let _guard = self.lock_file(&file_name).await;

        match tokio::fs::remove_file(self.dir.join(&file_name)).await {
            Ok(()) => Ok(true),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(false),
            Err(e) => Err(e.into()),
        }
    }
}

/// Fields only the server writes (through [`UserRecord::activate_plan`]).
const SERVER_OWNED_FIELDS: [&str; 2] = ["subscriptionStatus", "planDetails"];

/// Overlay a client patch on a stored record.
///
/// `uid` always wins, `creationTime` is write-once, `usageCount` never
/// goes down through a merge. The plan fields in [`SERVER_OWNED_FIELDS`]
/// are never taken from the patch. Null patch values leave fields untouched.
fn merge_user(
    existing: Option<UserRecord>,
    uid: &str,
    patch: Map<String, Value>,
    now: &str,
) -> Result<UserRecord, AppError> {
    let stored_usage = existing.as_ref().map_or(0, |r| r.usage_count);
    let stored_created = existing.as_ref().and_then(|r| r.creation_time.clone());

    let mut merged = match existing {
        Some(record) => match serde_json::to_value(record) {
            Ok(Value::Object(map)) => map,
            _ => Map::new(),
        },
        None => Map::new(),
    };

    for (key, value) in patch {
        if SERVER_OWNED_FIELDS.contains(&key.as_str()) {
            tracing::warn!(uid = %uid, field = %key, "Ignoring client write to plan field");
            continue;
        }
        if !value.is_null() {
            merged.insert(key, value);
        }
    }
    merged.insert("uid".to_string(), Value::String(uid.to_string()));

    let mut record: UserRecord = serde_json::from_value(Value::Object(merged))
        .map_err(|e| AppError::BadRequest(format!("Invalid user data: {}", e)))?;

    record.creation_time = stored_created
        .or(record.creation_time.take())
        .or_else(|| Some(now.to_string()));
    if record.last_sign_in_time.is_none() {
        record.last_sign_in_time = Some(now.to_string());
    }
    record.usage_count = record.usage_count.max(stored_usage);

    Ok(record)
}
