// SPDX-License-Identifier: MIT

//! Vidstream: backend API for a video-hosting platform.
//!
//! This crate provides user accounts with a full session-token lifecycle
//! (registration, login, logout, access/refresh rotation) plus read-only
//! profile and watch-history aggregation.

pub mod config;
pub mod db;
pub mod error;
pub mod middleware;
pub mod models;
pub mod response;
pub mod routes;
pub mod services;

use config::Config;
use db::Db;
use services::{AssetHostClient, TokenService};

/// Shared application state.
pub struct AppState {
    pub config: Config,
    pub db: Db,
    pub assets: AssetHostClient,
    pub tokens: TokenService,
}
