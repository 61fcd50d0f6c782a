use tftdb_core::{AppConfig, Environment, MatchBatch, Tier};
use tftdb_db::DbError;
use tftdb_riot::{CollectionReport, IssueLog, RiotError, Stage};

use super::*;

fn config() -> AppConfig {
    AppConfig {
        database_url: None,
        env: Environment::Test,
        log_level: "info".to_string(),
        riot_api_key: "key".to_string(),
        tiers: vec![Tier::Iron, Tier::Gold],
        players_per_division: 20,
        matches_per_player: 20,
        platform_base_url: "https://eun1.api.riotgames.com".to_string(),
        regional_base_url: "https://europe.api.riotgames.com".to_string(),
        request_timeout_secs: 30,
        user_agent: "ua".to_string(),
        db_max_connections: 10,
        db_min_connections: 1,
        db_acquire_timeout_secs: 10,
    }
}

fn args() -> CollectArgs {
    CollectArgs {
        tiers: Vec::new(),
        players_per_division: None,
        matches_per_player: None,
        ladder_pages: 1,
        dry_run: false,
    }
}

#[test]
fn plan_falls_back_to_config() {
    let plan = CollectPlan::resolve(&args(), &config()).unwrap();
    assert_eq!(plan.tiers, vec![Tier::Iron, Tier::Gold]);
    assert_eq!(plan.players_per_division, 20);
    assert_eq!(plan.matches_per_player, 20);
    assert!(!plan.dry_run);
}

#[test]
fn plan_flags_override_config_and_dedup_tiers() {
    let args = CollectArgs {
        tiers: vec![Tier::Diamond, Tier::Diamond, Tier::Silver],
        players_per_division: Some(2),
        matches_per_player: Some(5),
        ladder_pages: 3,
        dry_run: true,
    };
    let plan = CollectPlan::resolve(&args, &config()).unwrap();
    assert_eq!(plan.tiers, vec![Tier::Diamond, Tier::Silver]);
    assert_eq!(plan.players_per_division, 2);
    assert_eq!(plan.matches_per_player, 5);
    assert_eq!(plan.ladder_pages, 3);
    assert!(plan.dry_run);
}

#[test]
fn plan_rejects_zero_sample_sizes() {
    let args = CollectArgs {
        matches_per_player: Some(0),
        ..args()
    };
    assert!(CollectPlan::resolve(&args, &config()).is_err());

    let args = CollectArgs {
        ladder_pages: 0,
        ..self::args()
    };
    assert!(CollectPlan::resolve(&args, &config()).is_err());
}

#[test]
fn summary_reports_counts_and_issues() {
    let mut issues = IssueLog::new();
    issues.record(Stage::MatchIds, "P9", &"HTTP 500");
    let report = CollectionReport {
        tier: Tier::Gold,
        ladder_entries: 8,
        match_ids: 3,
        batch: MatchBatch::default(),
        duplicates_dropped: tftdb_core::BatchCounts::default(),
        issues,
    };

    assert_eq!(
        summarize(&report),
        "GOLD: 8 players, 3 match ids, 0 matches, 0 participants, 0 traits, 0 units, 0 items, 1 issues"
    );
}

#[test]
fn cancellation_is_told_apart_from_failure() {
    assert!(matches!(
        classify(RiotError::Cancelled),
        TierFailure::Cancelled
    ));
    let failure = RiotError::InvalidBaseUrl {
        base_url: "nope".to_string(),
        reason: "relative URL without a base".to_string(),
    };
    assert!(matches!(classify(failure), TierFailure::Failed(_)));
}

#[sqlx::test(migrations = "../../migrations")]
#[ignore = "requires DATABASE_URL"]
async fn failed_start_marks_run_failed(pool: sqlx::PgPool) {
    let run = tftdb_db::create_collection_run(&pool, "GOLD", "cli")
        .await
        .unwrap();
    tftdb_db::start_collection_run(&pool, run.id).await.unwrap();

    let restarted = tftdb_db::start_collection_run(&pool, run.id).await;
    let outcome = settle_step(&pool, run.id, Tier::Gold, restarted).await;
    assert!(matches!(outcome, Err(TierFailure::Failed(_))));

    let stored = tftdb_db::get_collection_run(&pool, run.id).await.unwrap();
    assert_eq!(stored.status, "failed");
    assert!(stored.error_message.is_some());
}

#[sqlx::test(migrations = "../../migrations")]
#[ignore = "requires DATABASE_URL"]
async fn failed_step_on_queued_run_does_not_leave_it_queued(pool: sqlx::PgPool) {
    let run = tftdb_db::create_collection_run(&pool, "IRON", "cli")
        .await
        .unwrap();

    let outcome = settle_step::<()>(&pool, run.id, Tier::Iron, Err(DbError::NotFound)).await;
    assert!(matches!(outcome, Err(TierFailure::Failed(_))));

    let stored = tftdb_db::get_collection_run(&pool, run.id).await.unwrap();
    assert_eq!(stored.status, "failed");
}

#[sqlx::test(migrations = "../../migrations")]
#[ignore = "requires DATABASE_URL"]
async fn successful_step_leaves_run_untouched(pool: sqlx::PgPool) {
    let run = tftdb_db::create_collection_run(&pool, "SILVER", "cli")
        .await
        .unwrap();
    tftdb_db::start_collection_run(&pool, run.id).await.unwrap();

    let value = settle_step(&pool, run.id, Tier::Silver, Ok(7)).await;
    assert!(matches!(value, Ok(7)));

    let stored = tftdb_db::get_collection_run(&pool, run.id).await.unwrap();
    assert_eq!(stored.status, "running");
}
