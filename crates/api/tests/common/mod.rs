#![allow(dead_code)]

use std::sync::Arc;

use axum::body::Body;
use axum::http::{Method, Request, Response};
use axum::Router;
use chrono::{Duration, Utc};
use http_body_util::BodyExt;
use serde_json::{json, Value};
use sqlx::PgPool;
use tower::ServiceExt;

use tourney_api::auth::jwt::{generate_access_token, JwtConfig};
use tourney_api::config::ServerConfig;
use tourney_api::router::build_app_router;
use tourney_api::state::AppState;
use tourney_db::models::user::{CreateUser, User};
use tourney_db::repositories::UserRepo;

pub const ADMIN_ROLE_ID: i64 = 1;
pub const PLAYER_ROLE_ID: i64 = 2;

/// Password given to every user made by [`create_user`].
pub const TEST_PASSWORD: &str = "correct-horse-battery";

/// Test `ServerConfig`: the dev CORS origin, a 30-second timeout and a
/// fixed JWT secret.
pub fn test_config() -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        cors_origins: vec!["http://localhost:5173".to_string()],
        request_timeout_secs: 30,
        shutdown_timeout_secs: 30,
        database_url: String::new(),
        jwt: JwtConfig {
            secret: "test-secret-not-for-production".to_string(),
            access_token_expiry_mins: 15,
            refresh_token_expiry_days: 7,
        },
    }
}

/// Build the production router over the given pool.
pub fn build_test_app(pool: PgPool) -> Router {
    let config = test_config();
    let state = AppState {
        pool,
        config: Arc::new(config.clone()),
    };
    build_app_router(state, &config)
}

// ---------------------------------------------------------------------------
// Fixtures
// ---------------------------------------------------------------------------

/// Insert a user directly and mint an access token for them.
pub async fn create_user(pool: &PgPool, username: &str, role_id: i64) -> (User, String) {
    let password_hash = tourney_api::auth::password::hash_password(TEST_PASSWORD).unwrap();
    let user = UserRepo::create(
        pool,
        &CreateUser {
            username: username.to_string(),
            email: format!("{username}@example.com"),
            password_hash,
            role_id,
        },
    )
    .await
    .unwrap();
    let token = generate_access_token(user.id, &user.role, &test_config().jwt).unwrap();
    (user, token)
}

/// Tournament body with registration open now and play starting later.
pub fn open_tournament_body(name: &str) -> Value {
    let now = Utc::now();
    json!({
        "name": name,
        "registration_opens_at": (now - Duration::hours(1)).to_rfc3339(),
        "registration_closes_at": (now + Duration::hours(1)).to_rfc3339(),
        "starts_at": (now + Duration::hours(2)).to_rfc3339(),
        "ends_at": (now + Duration::hours(6)).to_rfc3339(),
    })
}

/// Create a tournament through the API and return its id.
pub async fn create_tournament(app: &Router, admin_token: &str, body: Value) -> i64 {
    let response = post_json_auth(app.clone(), "/api/v1/tournaments", body, admin_token).await;
    assert_eq!(response.status(), 201);
    body_json(response).await["data"]["id"].as_i64().unwrap()
}

/// Move the close of registration into the past.
pub async fn close_registration(app: &Router, admin_token: &str, tournament_id: i64) {
    let closes = (Utc::now() - Duration::minutes(1)).to_rfc3339();
    let response = put_json_auth(
        app.clone(),
        &format!("/api/v1/tournaments/{tournament_id}"),
        json!({ "registration_closes_at": closes }),
        admin_token,
    )
    .await;
    assert_eq!(response.status(), 200);
}

/// Create a team owned by the token's user and return its id.
pub async fn create_team(app: &Router, token: &str, name: &str) -> i64 {
    let response =
        post_json_auth(app.clone(), "/api/v1/teams", json!({ "name": name }), token).await;
    assert_eq!(response.status(), 201);
    body_json(response).await["data"]["id"].as_i64().unwrap()
}

// ---------------------------------------------------------------------------
// Request helpers
// ---------------------------------------------------------------------------

async fn send(
    app: Router,
    method: Method,
    uri: &str,
    body: Option<Value>,
    token: Option<&str>,
) -> Response<Body> {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header("authorization", format!("Bearer {token}"));
    }
    let request = match body {
        Some(body) => builder
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };
    app.oneshot(request).await.unwrap()
}

pub async fn body_json(response: Response<Body>) -> Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

pub async fn get(app: Router, uri: &str) -> Response<Body> {
    send(app, Method::GET, uri, None, None).await
}

pub async fn get_auth(app: Router, uri: &str, token: &str) -> Response<Body> {
    send(app, Method::GET, uri, None, Some(token)).await
}

pub async fn post_json(app: Router, uri: &str, body: Value) -> Response<Body> {
    send(app, Method::POST, uri, Some(body), None).await
}

pub async fn post_json_auth(app: Router, uri: &str, body: Value, token: &str) -> Response<Body> {
    send(app, Method::POST, uri, Some(body), Some(token)).await
}

pub async fn post_auth(app: Router, uri: &str, token: &str) -> Response<Body> {
    send(app, Method::POST, uri, None, Some(token)).await
}

pub async fn put_json_auth(app: Router, uri: &str, body: Value, token: &str) -> Response<Body> {
    send(app, Method::PUT, uri, Some(body), Some(token)).await
}

pub async fn delete_auth(app: Router, uri: &str, token: &str) -> Response<Body> {
    send(app, Method::DELETE, uri, None, Some(token)).await
}
