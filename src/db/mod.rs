//! Database layer (embedded document store).

pub mod store;

pub use store::Db;

/// Collection names as constants.
pub mod collections {
    pub const USERS: &str = "users";
    pub const SUBSCRIPTIONS: &str = "subscriptions";
    pub const VIDEOS: &str = "videos";
}
