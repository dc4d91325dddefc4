//! Integration tests for admin moderation, featuring, and stats.

mod common;

use axum::http::{Method, StatusCode};
use tower::ServiceExt;

use common::*;

async fn admin_login(app: &axum::Router, pool: &sqlx::PgPool) -> AuthenticatedUser {
    let user = TestUser::new();
    let auth = create_authenticated_user(app, &user).await;
    set_role_and_relogin(app, pool, &user, &auth, "admin").await
}

async fn creator_login(app: &axum::Router, pool: &sqlx::PgPool) -> AuthenticatedUser {
    let user = TestUser::new();
    let auth = create_authenticated_user(app, &user).await;
    set_role_and_relogin(app, pool, &user, &auth, "creator").await
}

#[tokio::test]
async fn test_admin_routes_require_token() {
    let app = create_test_app(test_config(), create_lazy_test_pool());

    let response = app
        .oneshot(get_request("/api/v1/admin/stats", None))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
#[ignore = "requires PostgreSQL"]
async fn test_admin_routes_reject_non_admin() {
    let pool = create_test_pool().await;
    run_migrations(&pool).await;
    let app = create_test_app(test_config(), pool);

    let user = TestUser::new();
    let auth = create_authenticated_user(&app, &user).await;

    let response = app
        .oneshot(get_request(
            "/api/v1/admin/stats",
            Some(&auth.access_token),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

#[tokio::test]
#[ignore = "requires PostgreSQL"]
async fn test_pending_queue_and_reject_flow() {
    let pool = create_test_pool().await;
    run_migrations(&pool).await;
    let app = create_test_app(test_config(), pool.clone());

    let creator = creator_login(&app, &pool).await;
    let admin = admin_login(&app, &pool).await;

    let campaign = create_test_campaign(&app, &pool, &creator).await;
    let id = campaign["id"].as_str().unwrap();
    force_campaign_status(&pool, id, "pending_review").await;

    // The campaign shows up in the moderation queue
    let response = app
        .clone()
        .oneshot(get_request(
            "/api/v1/admin/campaigns/pending",
            Some(&admin.access_token),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let queue = parse_response_body(response).await;
    assert!(queue["items"]
        .as_array()
        .unwrap()
        .iter()
        .any(|c| c["id"] == campaign["id"]));

    // Reject it
    let response = app
        .clone()
        .oneshot(json_request_with_auth(
            Method::POST,
            &format!("/api/v1/admin/campaigns/{}/reject", id),
            serde_json::json!({}),
            &admin.access_token,
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = parse_response_body(response).await;
    assert_eq!(body["status"], "rejected");

    // A second decision on the same campaign conflicts
    let response = app
        .oneshot(json_request_with_auth(
            Method::POST,
            &format!("/api/v1/admin/campaigns/{}/approve", id),
            serde_json::json!({}),
            &admin.access_token,
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CONFLICT);
}

#[tokio::test]
#[ignore = "requires PostgreSQL"]
async fn test_approve_requires_pending_status() {
    let pool = create_test_pool().await;
    run_migrations(&pool).await;
    let app = create_test_app(test_config(), pool.clone());

    let creator = creator_login(&app, &pool).await;
    let admin = admin_login(&app, &pool).await;

    let campaign = create_test_campaign(&app, &pool, &creator).await;
    let id = campaign["id"].as_str().unwrap();

    // Still a draft; approval is an invalid transition
    let response = app
        .oneshot(json_request_with_auth(
            Method::POST,
            &format!("/api/v1/admin/campaigns/{}/approve", id),
            serde_json::json!({}),
            &admin.access_token,
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CONFLICT);
}

#[tokio::test]
#[ignore = "requires PostgreSQL"]
async fn test_featured_cap_enforced() {
    let pool = create_test_pool().await;
    run_migrations(&pool).await;
    cleanup_all_test_data(&pool).await;
    let app = create_test_app(test_config(), pool.clone());

    let creator = creator_login(&app, &pool).await;
    let admin = admin_login(&app, &pool).await;

    let mut ids = Vec::new();
    for _ in 0..4 {
        let campaign = create_test_campaign(&app, &pool, &creator).await;
        let id = campaign["id"].as_str().unwrap().to_string();
        force_campaign_status(&pool, &id, "active").await;
        ids.push(id);
    }

    // The first three fit under the cap
    for id in &ids[..3] {
        let response = app
            .clone()
            .oneshot(json_request_with_auth(
                Method::PUT,
                &format!("/api/v1/admin/campaigns/{}/featured", id),
                serde_json::json!({ "featured": true }),
                &admin.access_token,
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    // The fourth hits the cap
    let response = app
        .clone()
        .oneshot(json_request_with_auth(
            Method::PUT,
            &format!("/api/v1/admin/campaigns/{}/featured", ids[3]),
            serde_json::json!({ "featured": true }),
            &admin.access_token,
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CONFLICT);

    // Re-featuring an already-featured campaign is idempotent
    let response = app
        .clone()
        .oneshot(json_request_with_auth(
            Method::PUT,
            &format!("/api/v1/admin/campaigns/{}/featured", ids[0]),
            serde_json::json!({ "featured": true }),
            &admin.access_token,
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    // Unfeaturing one frees a slot
    let response = app
        .clone()
        .oneshot(json_request_with_auth(
            Method::PUT,
            &format!("/api/v1/admin/campaigns/{}/featured", ids[0]),
            serde_json::json!({ "featured": false }),
            &admin.access_token,
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let response = app
        .clone()
        .oneshot(json_request_with_auth(
            Method::PUT,
            &format!("/api/v1/admin/campaigns/{}/featured", ids[3]),
            serde_json::json!({ "featured": true }),
            &admin.access_token,
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    // Featured campaigns are pinned to the front of the listing
    let response = app
        .oneshot(get_request("/api/v1/campaigns", None))
        .await
        .unwrap();
    let listing = parse_response_body(response).await;
    let items = listing["items"].as_array().unwrap();
    assert!(items[0]["isFeatured"].as_bool().unwrap());
}

#[tokio::test]
#[ignore = "requires PostgreSQL"]
async fn test_deactivated_user_cannot_log_in() {
    let pool = create_test_pool().await;
    run_migrations(&pool).await;
    let app = create_test_app(test_config(), pool.clone());

    let admin = admin_login(&app, &pool).await;

    let user = TestUser::new();
    let auth = create_authenticated_user(&app, &user).await;

    let response = app
        .clone()
        .oneshot(json_request_with_auth(
            Method::PUT,
            &format!("/api/v1/admin/users/{}/active", auth.user_id),
            serde_json::json!({ "active": false }),
            &admin.access_token,
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let response = app
        .clone()
        .oneshot(json_request(
            Method::POST,
            "/api/v1/auth/login",
            serde_json::json!({ "email": user.email, "password": user.password }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    // Unknown user id is a 404
    let response = app
        .oneshot(json_request_with_auth(
            Method::PUT,
            &format!("/api/v1/admin/users/{}/active", uuid::Uuid::new_v4()),
            serde_json::json!({ "active": false }),
            &admin.access_token,
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
#[ignore = "requires PostgreSQL"]
async fn test_delete_comment_removes_answers() {
    let pool = create_test_pool().await;
    run_migrations(&pool).await;
    let app = create_test_app(test_config(), pool.clone());

    let creator = creator_login(&app, &pool).await;
    let admin = admin_login(&app, &pool).await;

    let campaign = create_test_campaign(&app, &pool, &creator).await;
    let id = campaign["id"].as_str().unwrap();
    force_campaign_status(&pool, id, "active").await;

    let response = app
        .clone()
        .oneshot(json_request_with_auth(
            Method::POST,
            &format!("/api/v1/campaigns/{}/comments", id),
            serde_json::json!({ "body": "Question?" }),
            &creator.access_token,
        ))
        .await
        .unwrap();
    let question = parse_response_body(response).await;

    let response = app
        .clone()
        .oneshot(json_request_with_auth(
            Method::POST,
            &format!("/api/v1/campaigns/{}/comments", id),
            serde_json::json!({ "body": "Answer.", "parentId": question["id"] }),
            &creator.access_token,
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);

    let response = app
        .clone()
        .oneshot(delete_request_with_auth(
            &format!("/api/v1/admin/comments/{}", question["id"].as_str().unwrap()),
            &admin.access_token,
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let response = app
        .oneshot(get_request(&format!("/api/v1/campaigns/{}/comments", id), None))
        .await
        .unwrap();
    let comments = parse_response_body(response).await;
    assert!(comments.as_array().unwrap().is_empty());
}

#[tokio::test]
#[ignore = "requires PostgreSQL"]
async fn test_contact_inbox_and_stats() {
    let pool = create_test_pool().await;
    run_migrations(&pool).await;
    let app = create_test_app(test_config(), pool.clone());

    let admin = admin_login(&app, &pool).await;

    // Anyone can submit a contact message
    let response = app
        .clone()
        .oneshot(json_request(
            Method::POST,
            "/api/v1/contact",
            serde_json::json!({
                "name": "Ada",
                "email": "ada@example.com",
                "subject": "Payout question",
                "body": "When are funds released?"
            }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);

    let response = app
        .clone()
        .oneshot(get_request(
            "/api/v1/admin/contact-messages",
            Some(&admin.access_token),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let inbox = parse_response_body(response).await;
    assert!(inbox["pagination"]["total"].as_i64().unwrap() >= 1);

    let response = app
        .oneshot(get_request(
            "/api/v1/admin/stats",
            Some(&admin.access_token),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let stats = parse_response_body(response).await;
    assert!(stats["users"].as_i64().unwrap() >= 1);
    assert!(stats["campaigns"]["total"].as_i64().is_some());
    assert!(stats["donations"]["count"].as_i64().is_some());
}
