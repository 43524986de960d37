//! Registration, login, refresh rotation, logout and lockout.

mod common;

use axum::http::StatusCode;
use common::{body_json, get, get_auth, post_auth, post_json, TEST_PASSWORD};
use serde_json::json;
use sqlx::PgPool;

async fn login(app: axum::Router, username: &str, password: &str) -> axum::response::Response {
    post_json(
        app,
        "/api/v1/auth/login",
        json!({ "username": username, "password": password }),
    )
    .await
}

#[sqlx::test(migrations = "../db/migrations")]
async fn register_creates_a_player(pool: PgPool) {
    let app = common::build_test_app(pool);
    let response = post_json(
        app.clone(),
        "/api/v1/auth/register",
        json!({ "username": "ada", "email": "ada@example.com", "password": "long-enough-pw" }),
    )
    .await;

    assert_eq!(response.status(), StatusCode::CREATED);
    let json = body_json(response).await;
    assert_eq!(json["data"]["username"], "ada");
    assert_eq!(json["data"]["role"], "player");

    let response = login(app, "ada", "long-enough-pw").await;
    assert_eq!(response.status(), StatusCode::OK);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn register_rejects_short_password_and_duplicates(pool: PgPool) {
    let app = common::build_test_app(pool);
    let short = post_json(
        app.clone(),
        "/api/v1/auth/register",
        json!({ "username": "bob", "email": "bob@example.com", "password": "short" }),
    )
    .await;
    assert_eq!(short.status(), StatusCode::BAD_REQUEST);

    let body = json!({
        "username": "bob",
        "email": "bob@example.com",
        "password": "long-enough-pw"
    });
    let first = post_json(app.clone(), "/api/v1/auth/register", body.clone()).await;
    assert_eq!(first.status(), StatusCode::CREATED);
    let second = post_json(app, "/api/v1/auth/register", body).await;
    assert_eq!(second.status(), StatusCode::CONFLICT);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn login_returns_tokens_and_me_resolves_role(pool: PgPool) {
    let (user, _) = common::create_user(&pool, "root", common::ADMIN_ROLE_ID).await;
    let app = common::build_test_app(pool);

    let response = login(app.clone(), "root", TEST_PASSWORD).await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert!(json["access_token"].is_string());
    assert!(json["refresh_token"].is_string());
    assert_eq!(json["user"]["role"], "admin");

    let token = json["access_token"].as_str().unwrap();
    let me = get_auth(app, "/api/v1/auth/me", token).await;
    assert_eq!(me.status(), StatusCode::OK);
    assert_eq!(body_json(me).await["data"]["id"], user.id);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn me_requires_a_token(pool: PgPool) {
    let app = common::build_test_app(pool);
    let response = get(app, "/api/v1/auth/me").await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn refresh_token_is_single_use(pool: PgPool) {
    common::create_user(&pool, "carol", common::PLAYER_ROLE_ID).await;
    let app = common::build_test_app(pool);

    let json = body_json(login(app.clone(), "carol", TEST_PASSWORD).await).await;
    let refresh = json["refresh_token"].as_str().unwrap().to_string();

    let first = post_json(
        app.clone(),
        "/api/v1/auth/refresh",
        json!({ "refresh_token": refresh }),
    )
    .await;
    assert_eq!(first.status(), StatusCode::OK);

    let replay = post_json(app, "/api/v1/auth/refresh", json!({ "refresh_token": refresh })).await;
    assert_eq!(replay.status(), StatusCode::UNAUTHORIZED);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn logout_revokes_refresh_tokens(pool: PgPool) {
    common::create_user(&pool, "dave", common::PLAYER_ROLE_ID).await;
    let app = common::build_test_app(pool);

    let json = body_json(login(app.clone(), "dave", TEST_PASSWORD).await).await;
    let access = json["access_token"].as_str().unwrap();
    let refresh = json["refresh_token"].as_str().unwrap();

    let out = post_auth(app.clone(), "/api/v1/auth/logout", access).await;
    assert_eq!(out.status(), StatusCode::NO_CONTENT);

    let response =
        post_json(app, "/api/v1/auth/refresh", json!({ "refresh_token": refresh })).await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn account_locks_after_five_failures(pool: PgPool) {
    common::create_user(&pool, "erin", common::PLAYER_ROLE_ID).await;
    let app = common::build_test_app(pool);

    for _ in 0..5 {
        let response = login(app.clone(), "erin", "wrong-password").await;
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    let response = login(app, "erin", TEST_PASSWORD).await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}
