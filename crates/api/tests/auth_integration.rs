//! Integration tests for registration, login, and token refresh.

mod common;

use axum::http::{Method, StatusCode};
use tower::ServiceExt;

use common::*;

#[tokio::test]
async fn test_health_check() {
    let app = create_test_app(test_config(), create_lazy_test_pool());

    let response = app
        .oneshot(get_request("/api/health", None))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = parse_response_body(response).await;
    assert_eq!(body["status"], "ok");
}

#[tokio::test]
async fn test_protected_route_requires_token() {
    let app = create_test_app(test_config(), create_lazy_test_pool());

    let response = app
        .oneshot(get_request("/api/v1/users/me", None))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_protected_route_rejects_garbage_token() {
    let app = create_test_app(test_config(), create_lazy_test_pool());

    let response = app
        .oneshot(get_request("/api/v1/users/me", Some("not-a-jwt")))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_register_rejects_invalid_email() {
    let app = create_test_app(test_config(), create_lazy_test_pool());

    let response = app
        .oneshot(json_request(
            Method::POST,
            "/api/v1/auth/register",
            serde_json::json!({
                "email": "not-an-email",
                "password": "SecurePass1",
                "displayName": "Ada"
            }),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_register_rejects_weak_password() {
    let app = create_test_app(test_config(), create_lazy_test_pool());

    let response = app
        .oneshot(json_request(
            Method::POST,
            "/api/v1/auth/register",
            serde_json::json!({
                "email": unique_test_email(),
                "password": "short",
                "displayName": "Ada"
            }),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = parse_response_body(response).await;
    assert_eq!(body["error"], "validation_error");
}

#[tokio::test]
#[ignore = "requires PostgreSQL"]
async fn test_register_login_refresh_flow() {
    let pool = create_test_pool().await;
    run_migrations(&pool).await;
    let app = create_test_app(test_config(), pool.clone());

    let user = TestUser::new();
    let auth = create_authenticated_user(&app, &user).await;
    assert!(!auth.access_token.is_empty());

    // Login with the same credentials
    let response = app
        .clone()
        .oneshot(json_request(
            Method::POST,
            "/api/v1/auth/login",
            serde_json::json!({ "email": user.email, "password": user.password }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = parse_response_body(response).await;
    assert_eq!(body["user"]["role"], "donor");
    assert_eq!(body["tokenType"], "Bearer");

    // Refresh the token pair
    let response = app
        .clone()
        .oneshot(json_request(
            Method::POST,
            "/api/v1/auth/refresh",
            serde_json::json!({ "refreshToken": auth.refresh_token }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = parse_response_body(response).await;
    assert!(body["accessToken"].as_str().is_some());

    // The access token works against a protected route
    let response = app
        .clone()
        .oneshot(get_request(
            "/api/v1/users/me",
            Some(body["accessToken"].as_str().unwrap()),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let me = parse_response_body(response).await;
    assert_eq!(me["email"], user.email);
    assert!(me.get("passwordHash").is_none());
}

#[tokio::test]
#[ignore = "requires PostgreSQL"]
async fn test_register_duplicate_email_conflicts() {
    let pool = create_test_pool().await;
    run_migrations(&pool).await;
    let app = create_test_app(test_config(), pool);

    let user = TestUser::new();
    create_authenticated_user(&app, &user).await;

    let response = app
        .oneshot(json_request(
            Method::POST,
            "/api/v1/auth/register",
            serde_json::json!({
                "email": user.email,
                "password": "AnotherPass1",
                "displayName": "Impostor"
            }),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::CONFLICT);
}

#[tokio::test]
#[ignore = "requires PostgreSQL"]
async fn test_login_wrong_password_unauthorized() {
    let pool = create_test_pool().await;
    run_migrations(&pool).await;
    let app = create_test_app(test_config(), pool);

    let user = TestUser::new();
    create_authenticated_user(&app, &user).await;

    let response = app
        .oneshot(json_request(
            Method::POST,
            "/api/v1/auth/login",
            serde_json::json!({ "email": user.email, "password": "WrongPass1" }),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
#[ignore = "requires PostgreSQL"]
async fn test_refresh_rejects_access_token() {
    let pool = create_test_pool().await;
    run_migrations(&pool).await;
    let app = create_test_app(test_config(), pool);

    let user = TestUser::new();
    let auth = create_authenticated_user(&app, &user).await;

    let response = app
        .oneshot(json_request(
            Method::POST,
            "/api/v1/auth/refresh",
            serde_json::json!({ "refreshToken": auth.access_token }),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
#[ignore = "requires PostgreSQL"]
async fn test_become_creator_changes_role() {
    let pool = create_test_pool().await;
    run_migrations(&pool).await;
    let app = create_test_app(test_config(), pool);

    let user = TestUser::new();
    let auth = create_authenticated_user(&app, &user).await;

    let response = app
        .clone()
        .oneshot(json_request_with_auth(
            Method::POST,
            "/api/v1/users/me/become-creator",
            serde_json::json!({}),
            &auth.access_token,
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = parse_response_body(response).await;
    assert_eq!(body["role"], "creator");

    // Second call conflicts; the account is no longer a donor.
    let response = app
        .oneshot(json_request_with_auth(
            Method::POST,
            "/api/v1/users/me/become-creator",
            serde_json::json!({}),
            &auth.access_token,
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CONFLICT);
}
