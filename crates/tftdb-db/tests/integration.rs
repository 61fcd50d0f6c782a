//! Offline tests for tftdb-db pool configuration and row types.
//! These tests do not require a live database connection.

use tftdb_core::{AppConfig, Environment, Tier};
use tftdb_db::{CollectionRunRow, DbError, PoolConfig};

fn app_config() -> AppConfig {
    AppConfig {
        database_url: Some("postgres://example".to_string()),
        env: Environment::Test,
        log_level: "info".to_string(),
        riot_api_key: "key".to_string(),
        tiers: vec![Tier::Gold],
        players_per_division: 20,
        matches_per_player: 20,
        platform_base_url: "https://eun1.api.riotgames.com".to_string(),
        regional_base_url: "https://europe.api.riotgames.com".to_string(),
        request_timeout_secs: 30,
        user_agent: "ua".to_string(),
        db_max_connections: 42,
        db_min_connections: 7,
        db_acquire_timeout_secs: 9,
    }
}

#[test]
fn pool_config_from_app_config_uses_core_values() {
    let pool_config = PoolConfig::from_app_config(&app_config());
    assert_eq!(pool_config.max_connections, 42);
    assert_eq!(pool_config.min_connections, 7);
    assert_eq!(pool_config.acquire_timeout_secs, 9);
}

#[tokio::test]
async fn missing_database_url_is_rejected_before_connecting() {
    let mut config = app_config();
    for url in [None, Some("  ".to_string())] {
        config.database_url = url;
        let err = tftdb_db::connect_pool_from_config(&config)
            .await
            .expect_err("missing url must not connect");
        assert!(matches!(err, DbError::MissingDatabaseUrl));
    }
}

/// Compile-time smoke test for [`CollectionRunRow`]'s shape.
#[test]
fn collection_run_row_has_expected_fields() {
    use chrono::Utc;
    use uuid::Uuid;

    let row = CollectionRunRow {
        id: 1_i64,
        public_id: Uuid::new_v4(),
        tier: "DIAMOND".to_string(),
        trigger_source: "cli".to_string(),
        status: "queued".to_string(),
        started_at: None,
        completed_at: None,
        records_processed: 0_i32,
        issue_count: 0_i32,
        error_message: None,
        created_at: Utc::now(),
    };

    assert_eq!(row.tier, "DIAMOND");
    assert_eq!(row.status, "queued");
    assert!(row.started_at.is_none());
    assert_eq!(row.records_processed, 0);
    assert!(row.error_message.is_none());
}
