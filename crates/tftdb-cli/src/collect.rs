//! The `tftdb collect` driver.
//!
//! Runs the collection pipeline once per tier. Each tier gets its own
//! `collection_runs` row and its batch is written in one transaction, so a
//! failed tier never leaves partial rows behind and does not stop the
//! tiers after it. Cancellation stops the whole command.

use std::sync::Arc;

use tftdb_core::{AppConfig, Tier};
use tftdb_riot::{
    CollectionOrchestrator, CollectionReport, RateLimitPolicy, RateLimiter, RiotClient, RiotError,
    ShutdownSignal,
};

use crate::CollectArgs;

/// Tiers and sample sizes for one invocation: CLI flags over config.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct CollectPlan {
    pub tiers: Vec<Tier>,
    pub players_per_division: usize,
    pub matches_per_player: usize,
    pub ladder_pages: u32,
    pub dry_run: bool,
}

impl CollectPlan {
    pub(crate) fn resolve(args: &CollectArgs, config: &AppConfig) -> anyhow::Result<Self> {
        let mut tiers: Vec<Tier> = Vec::new();
        let requested = if args.tiers.is_empty() {
            &config.tiers
        } else {
            &args.tiers
        };
        for tier in requested {
            if !tiers.contains(tier) {
                tiers.push(*tier);
            }
        }

        let players_per_division = args
            .players_per_division
            .unwrap_or(config.players_per_division);
        let matches_per_player = args
            .matches_per_player
            .unwrap_or(config.matches_per_player);

        if tiers.is_empty() {
            anyhow::bail!("no tiers to collect");
        }
        if players_per_division == 0 || matches_per_player == 0 {
            anyhow::bail!("--players-per-division and --matches-per-player must be at least 1");
        }
        if args.ladder_pages == 0 {
            anyhow::bail!("--ladder-pages must be at least 1");
        }

        Ok(Self {
            tiers,
            players_per_division,
            matches_per_player,
            ladder_pages: args.ladder_pages,
            dry_run: args.dry_run,
        })
    }
}

/// # Errors
///
/// Returns an error if the client or pool cannot be built, if the command
/// is cancelled, or if any tier failed.
pub(crate) async fn run_collect(
    config: &AppConfig,
    plan: &CollectPlan,
    shutdown: &ShutdownSignal,
) -> anyhow::Result<()> {
    let limiter =
        Arc::new(RateLimiter::new(RateLimitPolicy::default()).with_shutdown(shutdown.clone()));
    let client = RiotClient::from_config(config, limiter)
        .map_err(|e| anyhow::anyhow!("failed to build Riot client: {e}"))?;
    let orchestrator =
        CollectionOrchestrator::new(&client, shutdown).with_ladder_pages(plan.ladder_pages);

    let pool = if plan.dry_run {
        None
    } else {
        Some(tftdb_db::connect_pool_from_config(config).await?)
    };

    let mut failed_tiers: Vec<Tier> = Vec::new();

    for &tier in &plan.tiers {
        let outcome = match &pool {
            Some(pool) => collect_tier(pool, &orchestrator, tier, plan).await,
            None => dry_run_tier(&orchestrator, tier, plan).await,
        };

        match outcome {
            Ok(()) => {}
            Err(TierFailure::Cancelled) => anyhow::bail!("collection cancelled during {tier}"),
            Err(TierFailure::Failed(e)) => {
                let message = format!("{e:#}");
                tracing::error!(%tier, error = %message, "tier collection failed");
                eprintln!("error: {tier}: {message}");
                failed_tiers.push(tier);
            }
        }
    }

    if let Some(pool) = pool {
        pool.close().await;
    }

    if !failed_tiers.is_empty() {
        let names: Vec<&str> = failed_tiers.iter().map(|t| t.as_str()).collect();
        anyhow::bail!(
            "{} of {} tiers failed: [{}]",
            failed_tiers.len(),
            plan.tiers.len(),
            names.join(", ")
        );
    }

    Ok(())
}

enum TierFailure {
    Cancelled,
    Failed(anyhow::Error),
}

impl From<anyhow::Error> for TierFailure {
    fn from(e: anyhow::Error) -> Self {
        Self::Failed(e)
    }
}

async fn dry_run_tier(
    orchestrator: &CollectionOrchestrator<'_>,
    tier: Tier,
    plan: &CollectPlan,
) -> Result<(), TierFailure> {
    let report = run_pipeline(orchestrator, tier, plan).await?;
    println!("dry-run: {}", summarize(&report));
    for issue in report.issues.iter() {
        println!("  skipped {} {}: {}", issue.stage, issue.subject, issue.message);
    }
    Ok(())
}

/// create → start → collect → persist → complete. Once the run row exists,
/// any failure marks it `failed` before returning.
async fn collect_tier(
    pool: &sqlx::PgPool,
    orchestrator: &CollectionOrchestrator<'_>,
    tier: Tier,
    plan: &CollectPlan,
) -> Result<(), TierFailure> {
    let run = tftdb_db::create_collection_run(pool, tier.as_str(), "cli")
        .await
        .map_err(anyhow::Error::from)?;
    let started = tftdb_db::start_collection_run(pool, run.id).await;
    settle_step(pool, run.id, tier, started).await?;

    let report = match run_pipeline(orchestrator, tier, plan).await {
        Ok(report) => report,
        Err(failure) => {
            let message = match &failure {
                TierFailure::Cancelled => "cancelled".to_string(),
                TierFailure::Failed(e) => format!("{e:#}"),
            };
            fail_run_best_effort(pool, run.id, tier, message).await;
            return Err(failure);
        }
    };

    if report.batch.is_empty() {
        tracing::warn!(%tier, "tier produced no records");
    }

    let persisted = tftdb_db::persist_batch(pool, &report.batch).await;
    let inserted = settle_step(pool, run.id, tier, persisted).await?;

    let records = i32::try_from(inserted.total()).unwrap_or(i32::MAX);
    let issues = i32::try_from(report.issues.len()).unwrap_or(i32::MAX);
    let completed = tftdb_db::complete_collection_run(pool, run.id, records, issues).await;
    settle_step(pool, run.id, tier, completed).await?;

    tracing::info!(
        %tier,
        run_id = run.id,
        inserted = inserted.total(),
        "tier persisted"
    );
    println!("{} ({records} new rows)", summarize(&report));
    Ok(())
}

/// Passes a bookkeeping or persistence result through, marking the run
/// `failed` first when it is an error.
async fn settle_step<T>(
    pool: &sqlx::PgPool,
    run_id: i64,
    tier: Tier,
    result: Result<T, tftdb_db::DbError>,
) -> Result<T, TierFailure> {
    match result {
        Ok(value) => Ok(value),
        Err(e) => {
            fail_run_best_effort(pool, run_id, tier, e.to_string()).await;
            Err(TierFailure::Failed(e.into()))
        }
    }
}

async fn run_pipeline(
    orchestrator: &CollectionOrchestrator<'_>,
    tier: Tier,
    plan: &CollectPlan,
) -> Result<CollectionReport, TierFailure> {
    match orchestrator
        .run(tier, plan.players_per_division, plan.matches_per_player)
        .await
    {
        Ok(report) => Ok(report),
        Err(e) => Err(classify(e)),
    }
}

fn classify(e: RiotError) -> TierFailure {
    if e.is_cancelled() {
        TierFailure::Cancelled
    } else {
        TierFailure::Failed(e.into())
    }
}

async fn fail_run_best_effort(pool: &sqlx::PgPool, run_id: i64, tier: Tier, message: String) {
    if let Err(mark_err) = tftdb_db::fail_collection_run(pool, run_id, &message).await {
        tracing::error!(
            run_id,
            %tier,
            error = %mark_err,
            "failed to mark collection run as failed"
        );
    }
}

/// One line per tier: record counts and how many items were skipped.
pub(crate) fn summarize(report: &CollectionReport) -> String {
    let counts = report.batch.counts();
    format!(
        "{}: {} players, {} match ids, {} matches, {} participants, {} traits, {} units, {} items, {} issues",
        report.tier,
        report.ladder_entries,
        report.match_ids,
        counts.matches,
        counts.participants,
        counts.traits,
        counts.units,
        counts.items,
        report.issues.len()
    )
}

#[cfg(test)]
#[path = "collect_test.rs"]
mod tests;
