//! Live tests using `#[sqlx::test]`: each test gets a fresh, migrated
//! database. They need `DATABASE_URL` pointing at a Postgres server and are
//! ignored by default; run with `cargo test -p tftdb-db -- --ignored`.

use tftdb_core::{ItemRecord, MatchBatch, MatchRecord, ParticipantRecord, TraitRecord, UnitRecord};
use tftdb_db::{
    complete_collection_run, create_collection_run, fail_collection_run, get_collection_run,
    list_collection_runs, persist_batch, start_collection_run, DbError,
};

fn batch(match_id: &str, player_id: &str) -> MatchBatch {
    MatchBatch {
        matches: vec![MatchRecord {
            match_id: match_id.to_string(),
            game_datetime: 1_700_000_000_000,
            game_length: 2100.5,
            map_id: 22,
            set_number: 13,
        }],
        participants: vec![ParticipantRecord {
            match_id: match_id.to_string(),
            player_id: player_id.to_string(),
            placement: 1,
            level: 9,
            gold_left: 2,
            last_round: 34,
            players_eliminated: 3,
            time_eliminated: 2090.0,
            total_damage: 140,
            companion_id: "companion".to_string(),
            tier: "DIAMOND".to_string(),
            division: "I".to_string(),
            league_points: 50,
            wins: 30,
            losses: 70,
        }],
        traits: vec![TraitRecord {
            match_id: match_id.to_string(),
            player_id: player_id.to_string(),
            trait_name: "Set13_Rebel".to_string(),
            num_units: 3,
            style: 1,
            tier_current: 1,
            tier_total: 3,
        }],
        units: vec![UnitRecord {
            match_id: match_id.to_string(),
            player_id: player_id.to_string(),
            character_id: "TFT13_Jinx".to_string(),
            rarity: 4,
            tier: 2,
        }],
        items: vec![ItemRecord {
            match_id: match_id.to_string(),
            player_id: player_id.to_string(),
            character_id: "TFT13_Jinx".to_string(),
            item_id: "TFT_Item_InfinityEdge".to_string(),
        }],
    }
}

#[sqlx::test(migrations = "../../migrations")]
#[ignore = "requires DATABASE_URL"]
async fn persist_batch_is_idempotent(pool: sqlx::PgPool) {
    let first = persist_batch(&pool, &batch("M1", "P1")).await.unwrap();
    assert_eq!(first.total(), 5);

    let second = persist_batch(&pool, &batch("M1", "P1")).await.unwrap();
    assert_eq!(second.total(), 0);

    let matches: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM matches")
        .fetch_one(&pool)
        .await
        .unwrap();
    assert_eq!(matches, 1);
}

#[sqlx::test(migrations = "../../migrations")]
#[ignore = "requires DATABASE_URL"]
async fn orphan_child_rolls_back_whole_batch(pool: sqlx::PgPool) {
    let mut broken = batch("M1", "P1");
    broken.items[0].player_id = "P2".to_string();

    let err = persist_batch(&pool, &broken).await.unwrap_err();
    assert!(matches!(err, DbError::Sqlx(_)));

    let matches: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM matches")
        .fetch_one(&pool)
        .await
        .unwrap();
    assert_eq!(matches, 0);
}

#[sqlx::test(migrations = "../../migrations")]
#[ignore = "requires DATABASE_URL"]
async fn collection_run_lifecycle(pool: sqlx::PgPool) {
    let run = create_collection_run(&pool, "GOLD", "cli").await.unwrap();
    assert_eq!(run.status, "queued");

    start_collection_run(&pool, run.id).await.unwrap();
    complete_collection_run(&pool, run.id, 120, 3).await.unwrap();

    let stored = get_collection_run(&pool, run.id).await.unwrap();
    assert_eq!(stored.status, "succeeded");
    assert_eq!(stored.records_processed, 120);
    assert_eq!(stored.issue_count, 3);
    assert!(stored.completed_at.is_some());

    let err = fail_collection_run(&pool, run.id, "late").await.unwrap_err();
    assert!(matches!(
        err,
        DbError::InvalidCollectionRunTransition {
            expected_status: "queued or running",
            ..
        }
    ));

    let runs = list_collection_runs(&pool, 10).await.unwrap();
    assert_eq!(runs.len(), 1);
}

#[sqlx::test(migrations = "../../migrations")]
#[ignore = "requires DATABASE_URL"]
async fn queued_run_can_be_failed(pool: sqlx::PgPool) {
    let run = create_collection_run(&pool, "IRON", "cli").await.unwrap();
    fail_collection_run(&pool, run.id, "could not start").await.unwrap();

    let stored = get_collection_run(&pool, run.id).await.unwrap();
    assert_eq!(stored.status, "failed");
    assert_eq!(stored.error_message.as_deref(), Some("could not start"));
}
