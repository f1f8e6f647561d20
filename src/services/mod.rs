// SPDX-License-Identifier: MIT

//! Services module - business logic layer.

pub mod assets;
pub mod password;
pub mod token;

pub use assets::{AssetHostClient, AssetHostConfig, UploadedAsset};
pub use token::{Claims, TokenPair, TokenService};
