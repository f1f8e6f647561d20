// SPDX-License-Identifier: MIT

//! Registration flow tests: field validation, uniqueness conflicts, avatar
//! requirements and response sanitization.

use axum::{
    body::Body,
    http::{header, Request, StatusCode},
};
use tower::ServiceExt;

mod common;

async fn post_register(app: &axum::Router, body: Vec<u8>) -> axum::response::Response {
    app.clone()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/auth/register")
                .header(
                    header::CONTENT_TYPE,
                    format!("multipart/form-data; boundary={}", common::BOUNDARY),
                )
                .body(Body::from(body))
                .unwrap(),
        )
        .await
        .unwrap()
}

#[tokio::test]
async fn test_register_success_excludes_secrets() {
    let (app, state) = common::create_test_app();

    let response = common::register(&app, "Ann Example", "ann@x.io", "Ann", "p1").await;
    assert_eq!(response.status(), StatusCode::CREATED);

    let body = common::body_json(response).await;
    assert_eq!(body["success"], true);
    assert_eq!(body["statusCode"], 201);
    let data = &body["data"];
    // Username is lowercase-normalized
    assert_eq!(data["username"], "ann");
    assert_eq!(data["email"], "ann@x.io");
    assert_eq!(data["fullName"], "Ann Example");
    assert!(data["avatar"].as_str().unwrap().starts_with("https://"));
    // Sanitized: no password or refresh token in any spelling
    assert!(data.get("password").is_none());
    assert!(data.get("passwordHash").is_none());
    assert!(data.get("refreshToken").is_none());

    // The created record is retrievable and hashed
    let stored = state
        .db
        .find_by_email_or_username(None, Some("ann"))
        .unwrap()
        .expect("user should be stored");
    assert_ne!(stored.password_hash, "p1");
    assert!(stored.refresh_token.is_none());
}

#[tokio::test]
async fn test_register_blank_field_is_validation_error() {
    let (app, _) = common::create_test_app();

    let body = common::register_body("  ", "ann@x.io", "ann", "p1", Some(b"img"), None);
    let response = post_register(&app, body).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let body = common::body_json(response).await;
    assert_eq!(body["success"], false);
    assert_eq!(body["statusCode"], 400);
    assert_eq!(body["message"], "All fields are required");
}

#[tokio::test]
async fn test_register_duplicate_email_conflicts() {
    let (app, _) = common::create_test_app();

    let first = common::register(&app, "Ann", "ann@x.io", "ann", "p1").await;
    assert_eq!(first.status(), StatusCode::CREATED);

    // Same email, different username
    let dup = common::register(&app, "Ann Again", "ann@x.io", "ann2", "other").await;
    assert_eq!(dup.status(), StatusCode::CONFLICT);
    let body = common::body_json(dup).await;
    assert_eq!(body["success"], false);
    assert_eq!(body["statusCode"], 409);
}

#[tokio::test]
async fn test_register_duplicate_username_conflicts() {
    let (app, _) = common::create_test_app();

    common::register(&app, "Ann", "ann@x.io", "ann", "p1").await;

    // Same username (different case), different email
    let dup = common::register(&app, "Impostor", "other@x.io", "ANN", "p2").await;
    assert_eq!(dup.status(), StatusCode::CONFLICT);
}

#[tokio::test]
async fn test_register_missing_avatar_fails_even_with_cover() {
    let (app, _) = common::create_test_app();

    let body = common::register_body("Ann", "ann@x.io", "ann", "p1", None, Some(b"cover"));
    let response = post_register(&app, body).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let body = common::body_json(response).await;
    assert_eq!(body["message"], "Avatar file is required");
}

#[tokio::test]
async fn test_register_with_cover_sets_cover_url() {
    let (app, state) = common::create_test_app();

    let body = common::register_body("Ann", "ann@x.io", "ann", "p1", Some(b"img"), Some(b"cover"));
    let response = post_register(&app, body).await;
    assert_eq!(response.status(), StatusCode::CREATED);

    let stored = state.db.find_by_email_or_username(None, Some("ann")).unwrap().unwrap();
    assert!(!stored.cover_image.is_empty());
    assert_ne!(stored.cover_image, stored.avatar);
}
