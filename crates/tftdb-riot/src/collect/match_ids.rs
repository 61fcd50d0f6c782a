use std::collections::{BTreeSet, HashSet};

use tftdb_core::LadderEntry;

use crate::client::RiotClient;
use crate::error::RiotError;
use crate::issues::{IssueLog, Stage};
use crate::shutdown::ShutdownSignal;

/// Match ids gathered for one run. Iteration order carries no meaning.
pub type MatchIdSet = BTreeSet<String>;

/// Gathers recent match ids for a set of ladder players.
pub struct MatchIdCollector<'a> {
    client: &'a RiotClient,
    shutdown: &'a ShutdownSignal,
}

impl<'a> MatchIdCollector<'a> {
    #[must_use]
    pub fn new(client: &'a RiotClient, shutdown: &'a ShutdownSignal) -> Self {
        Self { client, shutdown }
    }

    /// Requests up to `matches_per_player` recent ids for each distinct
    /// player and folds them into one set.
    ///
    /// Entries with an empty player id are skipped, and a player listed more
    /// than once is requested once. A failed request is recorded in `issues`
    /// and that player contributes nothing.
    ///
    /// # Errors
    ///
    /// Returns [`RiotError::Cancelled`] if shutdown is requested.
    pub async fn collect(
        &self,
        entries: &[LadderEntry],
        matches_per_player: usize,
        issues: &mut IssueLog,
    ) -> Result<MatchIdSet, RiotError> {
        let mut match_ids = MatchIdSet::new();
        let mut requested: HashSet<&str> = HashSet::new();

        for entry in entries {
            let player_id = entry.player_id.trim();
            if player_id.is_empty() || !requested.insert(player_id) {
                continue;
            }
            self.shutdown.check()?;

            match self
                .client
                .match_ids_by_player(player_id, matches_per_player)
                .await
            {
                Ok(ids) => {
                    let before = match_ids.len();
                    match_ids.extend(ids.into_iter().filter(|id| !id.is_empty()));
                    tracing::debug!(
                        player_id,
                        new_ids = match_ids.len() - before,
                        "collected match ids"
                    );
                }
                Err(RiotError::Cancelled) => return Err(RiotError::Cancelled),
                Err(e) => issues.record(Stage::MatchIds, player_id, &e),
            }
        }

        tracing::info!(
            players = requested.len(),
            match_ids = match_ids.len(),
            "collected unique match ids"
        );
        Ok(match_ids)
    }
}
