//! Subscription join record: a user following a channel.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Subscription {
    /// Document ID
    pub id: String,
    /// User doing the subscribing
    pub subscriber_id: String,
    /// Channel (user) being subscribed to
    pub channel_id: String,
    /// When the subscription was created (RFC 3339)
    pub created_at: String,
}
