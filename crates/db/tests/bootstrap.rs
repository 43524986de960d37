use sqlx::PgPool;
use tourney_db::models::status::{BracketSide, MatchStatus, StatusId, TournamentFormat};

#[sqlx::test(migrations = "./migrations")]
async fn test_bootstrap(pool: PgPool) {
    tourney_db::health_check(&pool).await.unwrap();

    for table in ["roles", "tournament_formats", "match_statuses", "bracket_sides"] {
        let count: (i64,) = sqlx::query_as(&format!("SELECT COUNT(*) FROM {table}"))
            .fetch_one(&pool)
            .await
            .unwrap_or_else(|e| panic!("{table} query failed: {e}"));
        assert!(count.0 > 0, "{table} should have seed data, got 0 rows");
    }
}

/// The status enums must agree with the seeded lookup rows.
#[sqlx::test(migrations = "./migrations")]
async fn test_lookup_ids_match_enums(pool: PgPool) {
    async fn id_of(pool: &PgPool, table: &str, name: &str) -> StatusId {
        sqlx::query_scalar(&format!("SELECT id FROM {table} WHERE name = $1"))
            .bind(name)
            .fetch_one(pool)
            .await
            .unwrap_or_else(|e| panic!("{table}.{name}: {e}"))
    }

    assert_eq!(
        id_of(&pool, "tournament_formats", "single_elimination").await,
        TournamentFormat::SingleElimination.id()
    );
    assert_eq!(
        id_of(&pool, "tournament_formats", "double_elimination").await,
        TournamentFormat::DoubleElimination.id()
    );
    for (name, status) in [
        ("pending", MatchStatus::Pending),
        ("ready", MatchStatus::Ready),
        ("completed", MatchStatus::Completed),
        ("walkover", MatchStatus::Walkover),
        ("void", MatchStatus::Void),
    ] {
        assert_eq!(id_of(&pool, "match_statuses", name).await, status.id());
    }
    for (name, side) in [
        ("winners", BracketSide::Winners),
        ("losers", BracketSide::Losers),
        ("grand_final", BracketSide::GrandFinal),
    ] {
        assert_eq!(id_of(&pool, "bracket_sides", name).await, side.id());
    }

    let player_role: i64 = sqlx::query_scalar("SELECT id FROM roles WHERE name = $1")
        .bind(tourney_core::roles::ROLE_PLAYER)
        .fetch_one(&pool)
        .await
        .unwrap();
    assert_eq!(player_role, tourney_core::roles::PLAYER_ROLE_ID);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_users_carry_role_name(pool: PgPool) {
    use tourney_db::models::user::CreateUser;
    use tourney_db::repositories::UserRepo;

    let user = UserRepo::create(
        &pool,
        &CreateUser {
            username: "ref".into(),
            email: "ref@example.com".into(),
            password_hash: "x".into(),
            role_id: tourney_core::roles::PLAYER_ROLE_ID,
        },
    )
    .await
    .unwrap();
    assert_eq!(user.role, tourney_core::roles::ROLE_PLAYER);

    let found = UserRepo::find_by_username(&pool, "ref").await.unwrap().unwrap();
    assert_eq!(found.id, user.id);
    assert_eq!(found.role, user.role);
}
