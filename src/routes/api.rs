// SPDX-License-Identifier: MIT

//! Profile aggregation routes for authenticated users.
//!
//! Read-only joins across the users, subscriptions and videos collections,
//! plus the subscription toggle.

use axum::{
    extract::{Path, State},
    routing::{get, post},
    Extension, Json, Router,
};
use serde::Serialize;
use std::sync::Arc;

use crate::error::{AppError, Result};
use crate::middleware::auth::AuthUser;
use crate::models::{Subscription, UserView};
use crate::response::ApiResponse;
use crate::AppState;

/// API routes (require authentication).
/// The auth middleware is applied in routes/mod.rs for these routes.
pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/api/me", get(get_me))
        .route("/api/channels/{username}", get(get_channel_profile))
        .route("/api/history", get(get_watch_history))
        .route("/api/subscriptions/{channel_id}", post(toggle_subscription))
}

// ─── Current User ────────────────────────────────────────────

/// Get the sanitized record of the authenticated caller.
async fn get_me(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
) -> Result<Json<ApiResponse<UserView>>> {
    let record = state
        .db
        .find_by_id(&user.user_id)?
        .ok_or_else(|| AppError::NotFound(format!("User {} not found", user.user_id)))?;

    Ok(Json(ApiResponse::ok(record.view(), "Current user fetched")))
}

// ─── Channel Profile ─────────────────────────────────────────

/// Channel profile joined with subscription counts.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChannelProfile {
    pub username: String,
    pub full_name: String,
    pub email: String,
    pub avatar: String,
    pub cover_image: String,
    pub subscribers_count: usize,
    pub channels_subscribed_to_count: usize,
    pub is_subscribed: bool,
}

/// Get a channel's profile by username, with subscriber counts and whether
/// the caller is subscribed.
async fn get_channel_profile(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Path(username): Path<String>,
) -> Result<Json<ApiResponse<ChannelProfile>>> {
    let channel = state
        .db
        .find_by_email_or_username(None, Some(&username))?
        .ok_or_else(|| AppError::NotFound("Channel does not exist".to_string()))?;

    let profile = ChannelProfile {
        username: channel.username.clone(),
        full_name: channel.full_name.clone(),
        email: channel.email.clone(),
        avatar: channel.avatar.clone(),
        cover_image: channel.cover_image.clone(),
        subscribers_count: state.db.count_subscribers(&channel.id)?,
        channels_subscribed_to_count: state.db.count_subscribed_to(&channel.id)?,
        is_subscribed: state
            .db
            .find_subscription(&user.user_id, &channel.id)?
            .is_some(),
    };

    Ok(Json(ApiResponse::ok(profile, "Channel profile fetched")))
}

// ─── Watch History ───────────────────────────────────────────

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VideoOwner {
    pub full_name: String,
    pub username: String,
    pub avatar: String,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoryVideo {
    pub id: String,
    pub title: String,
    pub thumbnail: String,
    pub duration_secs: u32,
    pub views: u64,
    pub owner: VideoOwner,
}

/// Get the caller's watch history joined against the videos collection.
/// Order is preserved; references to deleted videos or owners are skipped.
async fn get_watch_history(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
) -> Result<Json<ApiResponse<Vec<HistoryVideo>>>> {
    let record = state
        .db
        .find_by_id(&user.user_id)?
        .ok_or_else(|| AppError::NotFound(format!("User {} not found", user.user_id)))?;

    let mut history = Vec::with_capacity(record.watch_history.len());
    for video_id in &record.watch_history {
        let Some(video) = state.db.get_video(video_id)? else {
            continue;
        };
        let Some(owner) = state.db.find_by_id(&video.owner_id)? else {
            continue;
        };

        history.push(HistoryVideo {
            id: video.id,
            title: video.title,
            thumbnail: video.thumbnail,
            duration_secs: video.duration_secs,
            views: video.views,
            owner: VideoOwner {
                full_name: owner.full_name,
                username: owner.username,
                avatar: owner.avatar,
            },
        });
    }

    Ok(Json(ApiResponse::ok(history, "Watch history fetched")))
}

// ─── Subscriptions ───────────────────────────────────────────

#[derive(Serialize)]
pub struct SubscriptionToggle {
    pub subscribed: bool,
}

/// Toggle the caller's subscription to a channel.
async fn toggle_subscription(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Path(channel_id): Path<String>,
) -> Result<Json<ApiResponse<SubscriptionToggle>>> {
    let channel = state
        .db
        .find_by_id(&channel_id)?
        .ok_or_else(|| AppError::NotFound("Channel does not exist".to_string()))?;

    if channel.id == user.user_id {
        return Err(AppError::Validation(
            "Cannot subscribe to your own channel".to_string(),
        ));
    }

    let subscribed = match state.db.find_subscription(&user.user_id, &channel.id)? {
        Some(existing) => {
            state.db.delete_subscription(&existing.id)?;
            false
        }
        None => {
            state.db.create_subscription(Subscription {
                id: uuid::Uuid::new_v4().to_string(),
                subscriber_id: user.user_id.clone(),
                channel_id: channel.id.clone(),
                created_at: chrono::Utc::now().to_rfc3339(),
            })?;
            true
        }
    };

    tracing::debug!(
        user_id = %user.user_id,
        channel_id = %channel.id,
        subscribed,
        "Subscription toggled"
    );

    Ok(Json(ApiResponse::ok(
        SubscriptionToggle { subscribed },
        "Subscription updated",
    )))
}
