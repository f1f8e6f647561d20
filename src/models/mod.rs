// SPDX-License-Identifier: MIT

//! Data models for the application.

pub mod subscription;
pub mod user;
pub mod video;

pub use subscription::Subscription;
pub use user::{User, UserView};
pub use video::Video;
