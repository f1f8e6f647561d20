// SPDX-License-Identifier: MIT

//! Credential store with typed operations.
//!
//! Provides document-store semantics over in-process collections:
//! - Users (identity records, current refresh token, watch history)
//! - Subscriptions (subscriber/channel join records)
//! - Videos (metadata for watch-history joins)
//!
//! Every operation returns the up-to-date record or a not-found signal.
//! Unique indexes on username and email are enforced at create time.

use crate::db::collections;
use crate::error::AppError;
use crate::models::{Subscription, User, Video};
use dashmap::DashMap;
use std::sync::Arc;

/// Collections behind the store handle.
#[derive(Default)]
struct Collections {
    users: DashMap<String, User>,
    subscriptions: DashMap<String, Subscription>,
    videos: DashMap<String, Video>,
}

/// Credential store client. Cloning is cheap; clones share the same data.
#[derive(Clone)]
pub struct Db {
    inner: Option<Arc<Collections>>,
}

impl Db {
    /// Create a connected store.
    pub fn new() -> Self {
        Self {
            inner: Some(Arc::new(Collections::default())),
        }
    }

    /// Create an offline store for testing failure paths.
    ///
    /// All operations will return an error if called.
    pub fn new_offline() -> Self {
        Self { inner: None }
    }

    /// Helper to get the collections or return an error if offline.
    fn collections(&self) -> Result<&Collections, AppError> {
        self.inner.as_deref().ok_or_else(|| {
            AppError::Database("Store not connected (offline mode)".to_string())
        })
    }

    // ─── User Operations ─────────────────────────────────────────

    /// Find a user matching the given email or username (either may be
    /// absent). Usernames are matched lowercase.
    pub fn find_by_email_or_username(
        &self,
        email: Option<&str>,
        username: Option<&str>,
    ) -> Result<Option<User>, AppError> {
        let username = username.map(|u| u.to_lowercase());
        let found = self.collections()?.users.iter().find_map(|entry| {
            let user = entry.value();
            let email_match = email.is_some_and(|e| user.email == e);
            let username_match = username.as_deref().is_some_and(|u| user.username == u);
            (email_match || username_match).then(|| user.clone())
        });
        Ok(found)
    }

    /// Get a user by document ID.
    pub fn find_by_id(&self, id: &str) -> Result<Option<User>, AppError> {
        Ok(self.collections()?.users.get(id).map(|u| u.clone()))
    }

    /// Create a user record. Fails with a conflict if the email or username
    /// is already taken (unique index).
    pub fn create_user(&self, user: User) -> Result<User, AppError> {
        let collections = self.collections()?;
        let duplicate = collections.users.iter().any(|entry| {
            entry.value().email == user.email || entry.value().username == user.username
        });
        if duplicate {
            return Err(AppError::Conflict("User already exists".to_string()));
        }

        tracing::debug!(
            user_id = %user.id,
            collection = collections::USERS,
            "Creating user record"
        );
        collections.users.insert(user.id.clone(), user.clone());
        Ok(user)
    }

    /// Fetch-modify-write a user by ID. Returns the updated record, or
    /// `None` if no user matched.
    pub fn update_by_id<F>(&self, id: &str, patch: F) -> Result<Option<User>, AppError>
    where
        F: FnOnce(&mut User),
    {
        match self.collections()?.users.get_mut(id) {
            Some(mut entry) => {
                patch(entry.value_mut());
                Ok(Some(entry.clone()))
            }
            None => Ok(None),
        }
    }

    /// Unset the stored refresh token (field removed, not set to null).
    /// Idempotent: already-cleared state is left as is.
    pub fn delete_refresh_token(&self, id: &str) -> Result<Option<User>, AppError> {
        self.update_by_id(id, |user| user.refresh_token = None)
    }

    // ─── Subscription Operations ─────────────────────────────────

    /// Find the subscription record for a subscriber/channel pair.
    pub fn find_subscription(
        &self,
        subscriber_id: &str,
        channel_id: &str,
    ) -> Result<Option<Subscription>, AppError> {
        let found = self.collections()?.subscriptions.iter().find_map(|entry| {
            let sub = entry.value();
            (sub.subscriber_id == subscriber_id && sub.channel_id == channel_id)
                .then(|| sub.clone())
        });
        Ok(found)
    }

    pub fn create_subscription(&self, sub: Subscription) -> Result<Subscription, AppError> {
        self.collections()?
            .subscriptions
            .insert(sub.id.clone(), sub.clone());
        Ok(sub)
    }

    pub fn delete_subscription(&self, id: &str) -> Result<bool, AppError> {
        Ok(self.collections()?.subscriptions.remove(id).is_some())
    }

    /// Number of users subscribed to a channel.
    pub fn count_subscribers(&self, channel_id: &str) -> Result<usize, AppError> {
        Ok(self
            .collections()?
            .subscriptions
            .iter()
            .filter(|entry| entry.value().channel_id == channel_id)
            .count())
    }

    /// Number of channels a user is subscribed to.
    pub fn count_subscribed_to(&self, subscriber_id: &str) -> Result<usize, AppError> {
        Ok(self
            .collections()?
            .subscriptions
            .iter()
            .filter(|entry| entry.value().subscriber_id == subscriber_id)
            .count())
    }

    // ─── Video Operations ────────────────────────────────────────

    pub fn get_video(&self, id: &str) -> Result<Option<Video>, AppError> {
        Ok(self.collections()?.videos.get(id).map(|v| v.clone()))
    }

    /// Create or replace a video record.
    pub fn upsert_video(&self, video: Video) -> Result<(), AppError> {
        self.collections()?.videos.insert(video.id.clone(), video);
        Ok(())
    }
}

impl Default for Db {
    fn default() -> Self {
        Self::new()
    }
}
