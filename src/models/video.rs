//! Video metadata, enough for watch-history joins.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Video {
    /// Document ID
    pub id: String,
    /// Owning user (channel)
    pub owner_id: String,
    pub title: String,
    /// Thumbnail asset URL
    pub thumbnail: String,
    pub duration_secs: u32,
    pub views: u64,
}
