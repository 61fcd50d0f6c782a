//! One tier's end-to-end collection run.

use serde::Serialize;
use tftdb_core::{BatchCounts, MatchBatch, Tier};

use crate::client::RiotClient;
use crate::collect::{LeaderboardCollector, MatchDetailCollector, MatchIdCollector};
use crate::error::RiotError;
use crate::issues::IssueLog;
use crate::shutdown::ShutdownSignal;

/// Result of one tier's run: the deduplicated batch plus everything that
/// was skipped along the way.
#[derive(Debug, Serialize)]
pub struct CollectionReport {
    pub tier: Tier,
    pub ladder_entries: usize,
    pub match_ids: usize,
    pub batch: MatchBatch,
    /// Records dropped from `batch` because their natural key repeated.
    pub duplicates_dropped: BatchCounts,
    pub issues: IssueLog,
}

pub struct CollectionOrchestrator<'a> {
    client: &'a RiotClient,
    shutdown: &'a ShutdownSignal,
    ladder_pages: u32,
}

impl<'a> CollectionOrchestrator<'a> {
    #[must_use]
    pub fn new(client: &'a RiotClient, shutdown: &'a ShutdownSignal) -> Self {
        Self {
            client,
            shutdown,
            ladder_pages: 1,
        }
    }

    /// Ladder pages sampled per division. Defaults to 1.
    #[must_use]
    pub fn with_ladder_pages(mut self, pages: u32) -> Self {
        self.ladder_pages = pages;
        self
    }

    /// Runs ladder → match ids → match detail for `tier`.
    ///
    /// Per-item failures inside the collectors are absorbed into
    /// [`CollectionReport::issues`].
    ///
    /// # Errors
    ///
    /// Returns [`RiotError::Cancelled`] if shutdown is requested; no partial
    /// batch is returned.
    pub async fn run(
        &self,
        tier: Tier,
        players_per_division: usize,
        matches_per_player: usize,
    ) -> Result<CollectionReport, RiotError> {
        let mut issues = IssueLog::new();

        let ladder = LeaderboardCollector::new(self.client, self.shutdown)
            .with_max_pages(self.ladder_pages)
            .collect(tier, players_per_division, &mut issues)
            .await?;
        tracing::info!(%tier, players = ladder.len(), "ladder sampled");

        let match_ids = MatchIdCollector::new(self.client, self.shutdown)
            .collect(&ladder, matches_per_player, &mut issues)
            .await?;

        let mut batch = MatchDetailCollector::new(self.client, self.shutdown)
            .collect(&match_ids, &mut issues)
            .await?;

        let duplicates_dropped = batch.dedup();
        if duplicates_dropped.traits > 0 {
            tracing::warn!(
                %tier,
                duplicates = duplicates_dropped.traits,
                "duplicate trait names for one participant; kept the first"
            );
        }

        let counts = batch.counts();
        tracing::info!(
            %tier,
            matches = counts.matches,
            participants = counts.participants,
            traits = counts.traits,
            units = counts.units,
            items = counts.items,
            issues = issues.len(),
            "tier collection finished"
        );

        Ok(CollectionReport {
            tier,
            ladder_entries: ladder.len(),
            match_ids: match_ids.len(),
            batch,
            duplicates_dropped,
            issues,
        })
    }
}
