// SPDX-License-Identifier: MIT

//! Session lifecycle routes: registration, login, logout, refresh and
//! password change.
//!
//! Login and refresh set the `accessToken`/`refreshToken` cookies
//! (HttpOnly, Secure); logout clears them and unsets the stored refresh
//! token. Refresh tokens rotate on every use: the presented token must
//! exactly match the value stored on the user record, so a rotated-out
//! token is rejected even if its signature is still valid.

use axum::{
    extract::{Multipart, State},
    http::StatusCode,
    routing::post,
    Extension, Json, Router,
};
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::sync::Arc;

use crate::error::{AppError, Result};
use crate::middleware::auth::AuthUser;
use crate::models::{User, UserView};
use crate::response::ApiResponse;
use crate::services::password::{hash_password, verify_password};
use crate::AppState;

/// Public session routes (no auth required).
pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/auth/register", post(register))
        .route("/auth/login", post(login))
        .route("/auth/refresh", post(refresh))
}

/// Session routes that require an authenticated caller.
/// The auth middleware is applied in routes/mod.rs.
pub fn session_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/auth/logout", post(logout))
        .route("/auth/change-password", post(change_password))
}

// ─── Cookies ─────────────────────────────────────────────────

fn session_cookie(name: &'static str, value: String) -> Cookie<'static> {
    Cookie::build((name, value))
        .path("/")
        .http_only(true)
        .secure(true)
        .same_site(SameSite::Lax)
        .build()
}

fn expired_cookie(name: &'static str) -> Cookie<'static> {
    let mut cookie = session_cookie(name, String::new());
    cookie.make_removal();
    cookie
}

fn session_cookies(jar: CookieJar, access_token: &str, refresh_token: &str) -> CookieJar {
    jar.add(session_cookie("accessToken", access_token.to_string()))
        .add(session_cookie("refreshToken", refresh_token.to_string()))
}

// ─── Registration ────────────────────────────────────────────

/// Parsed multipart registration form. File parts are spooled to temp
/// files so the asset host collaborator can consume local paths.
#[derive(Default)]
struct RegisterForm {
    full_name: String,
    email: String,
    username: String,
    password: String,
    avatar_path: Option<PathBuf>,
    cover_path: Option<PathBuf>,
}

async fn read_register_form(mut multipart: Multipart) -> Result<RegisterForm> {
    let mut form = RegisterForm::default();

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::Validation(format!("Malformed form data: {e}")))?
    {
        let Some(name) = field.name().map(|n| n.to_string()) else {
            continue;
        };

        match name.as_str() {
            "fullName" => form.full_name = read_text(field).await?,
            "email" => form.email = read_text(field).await?,
            "username" => form.username = read_text(field).await?,
            "password" => form.password = read_text(field).await?,
            "avatar" => form.avatar_path = Some(spool_file(field).await?),
            "coverImage" => form.cover_path = Some(spool_file(field).await?),
            _ => {}
        }
    }

    Ok(form)
}

async fn read_text(field: axum::extract::multipart::Field<'_>) -> Result<String> {
    field
        .text()
        .await
        .map_err(|e| AppError::Validation(format!("Malformed form field: {e}")))
}

/// Write an uploaded file part to a temp path for the asset host client.
async fn spool_file(field: axum::extract::multipart::Field<'_>) -> Result<PathBuf> {
    let original_name = field.file_name().unwrap_or("upload.bin").to_string();
    let bytes = field
        .bytes()
        .await
        .map_err(|e| AppError::Validation(format!("Malformed file upload: {e}")))?;

    let path = std::env::temp_dir().join(format!(
        "vidstream-upload-{}-{}",
        uuid::Uuid::new_v4(),
        original_name
    ));
    tokio::fs::write(&path, &bytes)
        .await
        .map_err(|e| AppError::Internal(anyhow::anyhow!("failed to spool upload: {e}")))?;

    Ok(path)
}

/// Register a new user from a multipart form.
///
/// The avatar file is required; a failed cover upload is tolerated and the
/// cover URL defaults to empty.
async fn register(
    State(state): State<Arc<AppState>>,
    multipart: Multipart,
) -> Result<(StatusCode, Json<ApiResponse<UserView>>)> {
    let form = read_register_form(multipart).await?;

    let required = [
        &form.full_name,
        &form.email,
        &form.username,
        &form.password,
    ];
    if required.iter().any(|field| field.trim().is_empty()) {
        return Err(AppError::Validation("All fields are required".to_string()));
    }

    if state
        .db
        .find_by_email_or_username(Some(&form.email), Some(&form.username))?
        .is_some()
    {
        return Err(AppError::Conflict("User already exists".to_string()));
    }

    let avatar_path = form
        .avatar_path
        .ok_or_else(|| AppError::Validation("Avatar file is required".to_string()))?;

    let avatar = state
        .assets
        .upload(&avatar_path)
        .await
        .ok_or_else(|| AppError::Upload("Avatar upload failed".to_string()))?;

    // Cover upload failure is tolerated; the URL defaults to empty
    let cover_image = match form.cover_path {
        Some(path) => state
            .assets
            .upload(&path)
            .await
            .map(|asset| asset.url)
            .unwrap_or_default(),
        None => String::new(),
    };

    let user = User {
        id: uuid::Uuid::new_v4().to_string(),
        username: form.username.to_lowercase(),
        email: form.email.clone(),
        full_name: form.full_name.clone(),
        avatar: avatar.url,
        cover_image,
        password_hash: hash_password(&form.password)?,
        refresh_token: None,
        watch_history: Vec::new(),
        created_at: chrono::Utc::now().to_rfc3339(),
    };
    let user_id = user.id.clone();
    state.db.create_user(user)?;

    let created = state
        .db
        .find_by_id(&user_id)?
        .ok_or_else(|| AppError::Database("Created user could not be fetched".to_string()))?;

    tracing::info!(user_id = %created.id, username = %created.username, "User registered");

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::new(
            StatusCode::CREATED,
            created.view(),
            "User registered successfully",
        )),
    ))
}

// ─── Login ───────────────────────────────────────────────────

#[derive(Deserialize)]
pub struct LoginRequest {
    #[serde(default)]
    email: Option<String>,
    #[serde(default)]
    username: Option<String>,
    #[serde(default)]
    password: String,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginData {
    pub user: UserView,
    pub access_token: String,
    pub refresh_token: String,
}

/// Log in with email or username plus password. Issues a fresh token pair
/// and sets both session cookies.
async fn login(
    State(state): State<Arc<AppState>>,
    jar: CookieJar,
    Json(login): Json<LoginRequest>,
) -> Result<(CookieJar, Json<ApiResponse<LoginData>>)> {
    if login.email.is_none() && login.username.is_none() {
        return Err(AppError::Validation(
            "Username or email is required".to_string(),
        ));
    }

    let user = state
        .db
        .find_by_email_or_username(login.email.as_deref(), login.username.as_deref())?
        .ok_or_else(|| AppError::NotFound("User not found".to_string()))?;

    if !verify_password(&login.password, &user.password_hash) {
        return Err(AppError::Auth("Password is incorrect".to_string()));
    }

    let pair = state.tokens.issue_pair(&state.db, &user.id)?;

    let logged_in = state
        .db
        .find_by_id(&user.id)?
        .ok_or_else(|| AppError::Database("User vanished during login".to_string()))?;

    tracing::info!(user_id = %user.id, "User logged in");

    let jar = session_cookies(jar, &pair.access_token, &pair.refresh_token);
    let data = LoginData {
        user: logged_in.view(),
        access_token: pair.access_token,
        refresh_token: pair.refresh_token,
    };

    Ok((jar, Json(ApiResponse::ok(data, "User logged in successfully"))))
}

// ─── Logout ──────────────────────────────────────────────────

/// Log out the authenticated caller: unset the stored refresh token and
/// clear both session cookies. Idempotent.
async fn logout(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    jar: CookieJar,
) -> Result<(CookieJar, Json<ApiResponse<serde_json::Value>>)> {
    state.db.delete_refresh_token(&user.user_id)?;

    tracing::info!(user_id = %user.user_id, "User logged out");

    let jar = jar
        .add(expired_cookie("accessToken"))
        .add(expired_cookie("refreshToken"));

    Ok((
        jar,
        Json(ApiResponse::ok(serde_json::json!({}), "User logged out")),
    ))
}

// ─── Refresh ─────────────────────────────────────────────────

#[derive(Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct RefreshRequest {
    #[serde(default)]
    refresh_token: Option<String>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenPairData {
    pub access_token: String,
    pub refresh_token: String,
}

/// Rotate the session: verify the presented refresh token against the
/// stored value, then issue and persist a new pair.
async fn refresh(
    State(state): State<Arc<AppState>>,
    jar: CookieJar,
    body: axum::body::Bytes,
) -> Result<(CookieJar, Json<ApiResponse<TokenPairData>>)> {
    // The body is optional: cookie-only clients send none at all
    let body: RefreshRequest = serde_json::from_slice(&body).unwrap_or_default();

    let incoming = jar
        .get("refreshToken")
        .map(|cookie| cookie.value().to_string())
        .or(body.refresh_token)
        .ok_or_else(|| AppError::Auth("Unauthorized request".to_string()))?;

    // Signature/expiry failure message is passed through as-is
    let claims = state.tokens.verify_refresh(&incoming)?;

    let user = state
        .db
        .find_by_id(&claims.sub)?
        .ok_or_else(|| AppError::Auth("Invalid refresh token".to_string()))?;

    // A rotated-out (or logged-out) token no longer matches the stored value
    if user.refresh_token.as_deref() != Some(incoming.as_str()) {
        return Err(AppError::Auth("Refresh Token Expired".to_string()));
    }

    let pair = state.tokens.issue_pair(&state.db, &user.id)?;

    tracing::debug!(user_id = %user.id, "Refresh token rotated");

    let jar = session_cookies(jar, &pair.access_token, &pair.refresh_token);
    let data = TokenPairData {
        access_token: pair.access_token,
        refresh_token: pair.refresh_token,
    };

    Ok((jar, Json(ApiResponse::ok(data, "Access token refreshed"))))
}

// ─── Change Password ─────────────────────────────────────────

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChangePasswordRequest {
    old_password: String,
    new_password: String,
}

/// Replace the caller's password after checking the old one. Does not
/// re-run registration validation.
async fn change_password(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Json(request): Json<ChangePasswordRequest>,
) -> Result<Json<ApiResponse<serde_json::Value>>> {
    let record = state
        .db
        .find_by_id(&user.user_id)?
        .ok_or_else(|| AppError::NotFound("User not found".to_string()))?;

    if !verify_password(&request.old_password, &record.password_hash) {
        return Err(AppError::Validation("Invalid old password".to_string()));
    }

    let new_hash = hash_password(&request.new_password)?;
    state
        .db
        .update_by_id(&user.user_id, move |u| u.password_hash = new_hash)?;

    tracing::info!(user_id = %user.user_id, "Password changed");

    Ok(Json(ApiResponse::ok(
        serde_json::json!({}),
        "Password changed successfully",
    )))
}
