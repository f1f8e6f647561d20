// SPDX-License-Identifier: MIT

use axum::{
    body::Body,
    http::{header, Request},
    response::Response,
    Router,
};
use std::sync::Arc;
use tower::ServiceExt;
use vidstream_api::{
    config::Config,
    db::Db,
    services::{AssetHostClient, TokenService},
    AppState,
};

/// Create a test app with a fresh store and a mock asset host.
/// Returns the router and the shared state.
#[allow(dead_code)]
pub fn create_test_app() -> (Router, Arc<AppState>) {
    let config = Config::test_default();
    build_app(config, Db::new())
}

/// Create a test app whose store fails every operation.
#[allow(dead_code)]
pub fn create_test_app_offline() -> (Router, Arc<AppState>) {
    let config = Config::test_default();
    build_app(config, Db::new_offline())
}

fn build_app(config: Config, db: Db) -> (Router, Arc<AppState>) {
    let assets = AssetHostClient::new_mock(config.asset_host.clone());
    let tokens = TokenService::new(&config);

    let state = Arc::new(AppState {
        config,
        db,
        assets,
        tokens,
    });

    (vidstream_api::routes::create_router(state.clone()), state)
}

// ─── Multipart helpers ───────────────────────────────────────

#[allow(dead_code)]
pub const BOUNDARY: &str = "vidstream-test-boundary";

/// Build a multipart registration body. `None` file params omit the part.
#[allow(dead_code)]
pub fn register_body(
    full_name: &str,
    email: &str,
    username: &str,
    password: &str,
    avatar: Option<&[u8]>,
    cover: Option<&[u8]>,
) -> Vec<u8> {
    let mut body = Vec::new();
    for (name, value) in [
        ("fullName", full_name),
        ("email", email),
        ("username", username),
        ("password", password),
    ] {
        body.extend_from_slice(
            format!(
                "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"{name}\"\r\n\r\n{value}\r\n"
            )
            .as_bytes(),
        );
    }

    if let Some(bytes) = avatar {
        push_file_part(&mut body, "avatar", "avatar.png", bytes);
    }
    if let Some(bytes) = cover {
        push_file_part(&mut body, "coverImage", "cover.png", bytes);
    }

    body.extend_from_slice(format!("--{BOUNDARY}--\r\n").as_bytes());
    body
}

fn push_file_part(body: &mut Vec<u8>, name: &str, filename: &str, bytes: &[u8]) {
    body.extend_from_slice(
        format!(
            "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"{name}\"; \
             filename=\"{filename}\"\r\nContent-Type: image/png\r\n\r\n"
        )
        .as_bytes(),
    );
    body.extend_from_slice(bytes);
    body.extend_from_slice(b"\r\n");
}

// ─── Request helpers ─────────────────────────────────────────

/// POST a multipart registration request.
#[allow(dead_code)]
pub async fn register(app: &Router, full_name: &str, email: &str, username: &str, password: &str) -> Response {
    let body = register_body(full_name, email, username, password, Some(b"avatar-bytes"), None);
    app.clone()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/auth/register")
                .header(
                    header::CONTENT_TYPE,
                    format!("multipart/form-data; boundary={BOUNDARY}"),
                )
                .body(Body::from(body))
                .unwrap(),
        )
        .await
        .unwrap()
}

/// POST a JSON login request with a username identifier.
#[allow(dead_code)]
pub async fn login(app: &Router, username: &str, password: &str) -> Response {
    json_post(
        app,
        "/auth/login",
        serde_json::json!({"username": username, "password": password}),
        None,
    )
    .await
}

/// POST a JSON body, optionally with a Cookie header.
#[allow(dead_code)]
pub async fn json_post(
    app: &Router,
    uri: &str,
    body: serde_json::Value,
    cookie: Option<&str>,
) -> Response {
    let mut builder = Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json");
    if let Some(cookie) = cookie {
        builder = builder.header(header::COOKIE, cookie);
    }

    app.clone()
        .oneshot(builder.body(Body::from(body.to_string())).unwrap())
        .await
        .unwrap()
}

/// GET a URI, optionally with a Cookie header.
#[allow(dead_code)]
pub async fn get(app: &Router, uri: &str, cookie: Option<&str>) -> Response {
    let mut builder = Request::builder().method("GET").uri(uri);
    if let Some(cookie) = cookie {
        builder = builder.header(header::COOKIE, cookie);
    }

    app.clone()
        .oneshot(builder.body(Body::empty()).unwrap())
        .await
        .unwrap()
}

// ─── Response helpers ────────────────────────────────────────

/// Parse the response body as JSON.
#[allow(dead_code)]
pub async fn body_json(response: Response) -> serde_json::Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

/// All Set-Cookie header values on a response.
#[allow(dead_code)]
pub fn set_cookie_headers(response: &Response) -> Vec<String> {
    response
        .headers()
        .get_all(header::SET_COOKIE)
        .iter()
        .map(|value| value.to_str().unwrap().to_string())
        .collect()
}

/// Find the Set-Cookie header for a named cookie.
#[allow(dead_code)]
pub fn find_cookie(headers: &[String], name: &str) -> String {
    headers
        .iter()
        .find(|value| value.starts_with(&format!("{name}=")))
        .cloned()
        .unwrap_or_else(|| panic!("missing Set-Cookie header for {name}: {headers:?}"))
}

/// Extract the value from a Set-Cookie header string.
#[allow(dead_code)]
pub fn cookie_value(set_cookie: &str) -> String {
    set_cookie
        .split(';')
        .next()
        .and_then(|pair| pair.split_once('='))
        .map(|(_, value)| value.to_string())
        .expect("malformed Set-Cookie header")
}
