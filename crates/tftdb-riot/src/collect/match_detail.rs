use tftdb_core::{MatchBatch, Ranking};

use crate::client::RiotClient;
use crate::error::RiotError;
use crate::issues::{IssueLog, Stage};
use crate::normalize::{
    embedded_ranking, is_collectable_player, match_record, parse_participant, participant_details,
    participant_record, ranking_from_entries,
};
use crate::shutdown::ShutdownSignal;
use crate::types::ParticipantDto;

use super::MatchIdSet;

/// Fetches match payloads and decomposes them into normalized records,
/// enriching each human participant with their current ranking.
pub struct MatchDetailCollector<'a> {
    client: &'a RiotClient,
    shutdown: &'a ShutdownSignal,
}

impl<'a> MatchDetailCollector<'a> {
    #[must_use]
    pub fn new(client: &'a RiotClient, shutdown: &'a ShutdownSignal) -> Self {
        Self { client, shutdown }
    }

    /// Builds a [`MatchBatch`] from `match_ids`.
    ///
    /// A match whose payload cannot be fetched or decoded is skipped whole.
    /// Participants that are non-human or have no player id produce nothing.
    /// Malformed participants, traits, units, and items are skipped one at a
    /// time. A failed or empty ranking lookup leaves the participant unranked.
    ///
    /// # Errors
    ///
    /// Returns [`RiotError::Cancelled`] if shutdown is requested; records
    /// gathered so far are discarded with the batch.
    pub async fn collect(
        &self,
        match_ids: &MatchIdSet,
        issues: &mut IssueLog,
    ) -> Result<MatchBatch, RiotError> {
        let mut batch = MatchBatch::default();

        for match_id in match_ids {
            self.shutdown.check()?;

            let dto = match self.client.match_detail(match_id).await {
                Ok(dto) => dto,
                Err(RiotError::Cancelled) => return Err(RiotError::Cancelled),
                Err(e) => {
                    issues.record(Stage::MatchDetail, match_id.as_str(), &e);
                    continue;
                }
            };

            if let Some(reported) = dto.metadata.as_ref().map(|m| m.match_id.as_str()) {
                if reported != match_id {
                    tracing::warn!(%match_id, reported, "match payload reports a different id");
                }
            }

            batch.matches.push(match_record(match_id, &dto));

            let mut participants = 0usize;
            for raw in &dto.info.participants {
                let participant = match parse_participant(match_id, raw) {
                    Ok(p) => p,
                    Err(e) => {
                        issues.record(Stage::Shape, match_id.as_str(), &e);
                        continue;
                    }
                };

                let player_id = match participant.puuid.as_deref() {
                    Some(p) if is_collectable_player(Some(p)) => p.trim().to_string(),
                    _ => {
                        tracing::debug!(%match_id, "skipping non-human or anonymous participant");
                        continue;
                    }
                };

                let ranking = self.ranking_for(&player_id, &participant, issues).await?;
                batch
                    .participants
                    .push(participant_record(match_id, &player_id, &participant, ranking));

                let details = participant_details(match_id, &player_id, &participant);
                for skipped in &details.skipped {
                    issues.record(Stage::Shape, format!("{match_id}/{player_id}"), skipped);
                }
                batch.traits.extend(details.traits);
                batch.units.extend(details.units);
                batch.items.extend(details.items);
                participants += 1;
            }

            tracing::info!(%match_id, participants, "collected match detail");
        }

        Ok(batch)
    }

    /// Uses ranking fields embedded in the payload when present; otherwise
    /// looks the player up. Lookup failure is recorded and yields unranked.
    async fn ranking_for(
        &self,
        player_id: &str,
        participant: &ParticipantDto,
        issues: &mut IssueLog,
    ) -> Result<Ranking, RiotError> {
        if let Some(ranking) = embedded_ranking(participant) {
            return Ok(ranking);
        }
        self.shutdown.check()?;

        match self.client.ranking_by_player(player_id).await {
            Ok(entries) => Ok(ranking_from_entries(&entries)),
            Err(RiotError::Cancelled) => Err(RiotError::Cancelled),
            Err(e) => {
                issues.record(Stage::Enrichment, player_id, &e);
                Ok(Ranking::unranked())
            }
        }
    }
}
