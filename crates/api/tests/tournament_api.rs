//! Tournament CRUD, phase filtering and admin-only writes.

mod common;

use axum::http::StatusCode;
use chrono::{Duration, Utc};
use common::{body_json, get, open_tournament_body, post_json_auth, put_json_auth};
use serde_json::json;
use sqlx::PgPool;

#[sqlx::test(migrations = "../db/migrations")]
async fn admin_creates_tournament_with_defaults(pool: PgPool) {
    let (admin, token) = common::create_user(&pool, "admin", common::ADMIN_ROLE_ID).await;
    let app = common::build_test_app(pool);

    let response = post_json_auth(
        app.clone(),
        "/api/v1/tournaments",
        open_tournament_body("Spring Cup"),
        &token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);

    let data = body_json(response).await["data"].clone();
    assert_eq!(data["created_by"], admin.id);
    assert_eq!(data["creator_username"], "admin");
    assert_eq!(data["format"], "single_elimination");
    assert_eq!(data["min_team_size"], 1);
    assert_eq!(data["best_of"], 1);
    assert_eq!(data["phase"], "future");
    assert_eq!(data["registration_open"], true);
    assert_eq!(data["min_teams_per_match"], 2);
    assert_eq!(data["max_teams_per_match"], 2);
    assert_eq!(data["random_teams_formed"], 0);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn players_cannot_create_tournaments(pool: PgPool) {
    let (_, token) = common::create_user(&pool, "pat", common::PLAYER_ROLE_ID).await;
    let app = common::build_test_app(pool);

    let response = post_json_auth(
        app,
        "/api/v1/tournaments",
        open_tournament_body("Nope Cup"),
        &token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn invalid_settings_are_rejected(pool: PgPool) {
    let (_, token) = common::create_user(&pool, "admin", common::ADMIN_ROLE_ID).await;
    let app = common::build_test_app(pool);

    let mut even_best_of = open_tournament_body("Even Cup");
    even_best_of["best_of"] = json!(2);
    let response = post_json_auth(app.clone(), "/api/v1/tournaments", even_best_of, &token).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let mut inverted = open_tournament_body("Inverted Cup");
    inverted["min_team_size"] = json!(4);
    inverted["max_team_size"] = json!(2);
    let response = post_json_auth(app.clone(), "/api/v1/tournaments", inverted, &token).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let mut backwards = open_tournament_body("Backwards Cup");
    backwards["ends_at"] = json!((Utc::now() - Duration::days(1)).to_rfc3339());
    let response = post_json_auth(app, "/api/v1/tournaments", backwards, &token).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn duplicate_names_conflict(pool: PgPool) {
    let (_, token) = common::create_user(&pool, "admin", common::ADMIN_ROLE_ID).await;
    let app = common::build_test_app(pool);

    common::create_tournament(&app, &token, open_tournament_body("Same Name")).await;
    let response = post_json_auth(
        app,
        "/api/v1/tournaments",
        open_tournament_body("Same Name"),
        &token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::CONFLICT);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn list_filters_by_phase(pool: PgPool) {
    let (_, token) = common::create_user(&pool, "admin", common::ADMIN_ROLE_ID).await;
    let app = common::build_test_app(pool);
    let now = Utc::now();

    let window = |name: &str, start: Duration, end: Duration| {
        json!({
            "name": name,
            "registration_opens_at": (now - Duration::days(10)).to_rfc3339(),
            "registration_closes_at": (now - Duration::days(9)).to_rfc3339(),
            "starts_at": (now + start).to_rfc3339(),
            "ends_at": (now + end).to_rfc3339(),
        })
    };
    let past = common::create_tournament(
        &app,
        &token,
        window("Past", Duration::days(-5), Duration::days(-4)),
    )
    .await;
    let active = common::create_tournament(
        &app,
        &token,
        window("Active", Duration::hours(-1), Duration::hours(1)),
    )
    .await;
    let future = common::create_tournament(
        &app,
        &token,
        window("Future", Duration::days(1), Duration::days(2)),
    )
    .await;

    for (phase, id) in [("past", past), ("active", active), ("future", future)] {
        let response = get(app.clone(), &format!("/api/v1/tournaments?phase={phase}")).await;
        assert_eq!(response.status(), StatusCode::OK);
        let data = body_json(response).await["data"].clone();
        let ids: Vec<i64> = data
            .as_array()
            .unwrap()
            .iter()
            .map(|t| t["id"].as_i64().unwrap())
            .collect();
        assert_eq!(ids, vec![id], "phase {phase}");
    }

    let all = body_json(get(app.clone(), "/api/v1/tournaments").await).await;
    assert_eq!(all["data"].as_array().unwrap().len(), 3);

    let bad = get(app, "/api/v1/tournaments?phase=someday").await;
    assert_eq!(bad.status(), StatusCode::BAD_REQUEST);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn update_merges_and_validates(pool: PgPool) {
    let (_, token) = common::create_user(&pool, "admin", common::ADMIN_ROLE_ID).await;
    let app = common::build_test_app(pool);
    let id = common::create_tournament(&app, &token, open_tournament_body("Merge Cup")).await;

    let response = put_json_auth(
        app.clone(),
        &format!("/api/v1/tournaments/{id}"),
        json!({ "best_of": 3, "format": "double_elimination" }),
        &token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let data = body_json(response).await["data"].clone();
    assert_eq!(data["best_of"], 3);
    assert_eq!(data["format"], "double_elimination");
    assert_eq!(data["name"], "Merge Cup");

    let response = put_json_auth(
        app,
        &format!("/api/v1/tournaments/{id}"),
        json!({ "max_team_size": 0 }),
        &token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}
