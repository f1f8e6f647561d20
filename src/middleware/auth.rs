// SPDX-License-Identifier: MIT

//! Access-token authentication middleware.

use crate::error::AppError;
use crate::AppState;
use axum::{
    extract::{Request, State},
    http::header,
    middleware::Next,
    response::Response,
};
use axum_extra::extract::cookie::CookieJar;
use std::sync::Arc;

/// Authenticated user extracted from a verified access token.
#[derive(Debug, Clone)]
pub struct AuthUser {
    pub user_id: String,
}

/// Middleware that requires a valid access token.
///
/// The token is read from the `accessToken` cookie first, then from a
/// `Bearer` authorization header. The decoded subject must resolve to an
/// existing user.
pub async fn require_auth(
    State(state): State<Arc<AppState>>,
    jar: CookieJar,
    mut request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let token = if let Some(cookie) = jar.get("accessToken") {
        cookie.value().to_string()
    } else {
        let auth_header = request
            .headers()
            .get(header::AUTHORIZATION)
            .and_then(|h| h.to_str().ok());

        match auth_header {
            Some(h) if h.starts_with("Bearer ") => h[7..].to_string(),
            _ => return Err(AppError::Auth("Unauthorized request".to_string())),
        }
    };

    let claims = state.tokens.verify_access(&token)?;

    let user = state
        .db
        .find_by_id(&claims.sub)?
        .ok_or_else(|| AppError::Auth("Invalid access token".to_string()))?;

    request.extensions_mut().insert(AuthUser { user_id: user.id });

    Ok(next.run(request).await)
}
