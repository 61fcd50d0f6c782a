//! Conversion of Riot API payloads into normalized records.
//!
//! Functions here are pure; the collectors decide what to log and skip.

use serde::de::DeserializeOwned;
use tftdb_core::{
    ItemRecord, LadderEntry, MatchRecord, ParticipantRecord, Ranking, TraitRecord, UnitRecord,
    NON_HUMAN_PLAYER_ID,
};

use crate::error::ShapeError;
use crate::types::{LeagueEntryDto, MatchDto, ParticipantDto, TraitDto, UnitDto, RANKED_QUEUE};

/// Trait, unit, and item records for one participant, plus the sub-objects
/// that were skipped.
#[derive(Debug, Default)]
pub struct ParticipantDetails {
    pub traits: Vec<TraitRecord>,
    pub units: Vec<UnitRecord>,
    pub items: Vec<ItemRecord>,
    pub skipped: Vec<ShapeError>,
}

/// Maps a ladder listing to a [`LadderEntry`], falling back to the requested
/// tier and division when the entry omits them.
///
/// Returns `None` when the entry has no player id.
#[must_use]
pub fn ladder_entry(dto: &LeagueEntryDto, tier: &str, division: &str) -> Option<LadderEntry> {
    let player_id = dto.puuid.as_deref().map(str::trim).filter(|p| !p.is_empty())?;
    Some(LadderEntry {
        player_id: player_id.to_string(),
        tier: dto.tier.clone().unwrap_or_else(|| tier.to_string()),
        division: dto.rank.clone().unwrap_or_else(|| division.to_string()),
        league_points: dto.league_points,
        wins: dto.wins,
        losses: dto.losses,
    })
}

/// `true` for ids that must never become a participant: empty or the
/// non-human placeholder.
#[must_use]
pub fn is_collectable_player(player_id: Option<&str>) -> bool {
    player_id
        .map(str::trim)
        .is_some_and(|p| !p.is_empty() && p != NON_HUMAN_PLAYER_ID)
}

#[must_use]
pub fn match_record(match_id: &str, dto: &MatchDto) -> MatchRecord {
    MatchRecord {
        match_id: match_id.to_string(),
        game_datetime: dto.info.game_datetime,
        game_length: dto.info.game_length,
        map_id: dto.info.map_id,
        set_number: dto.info.tft_set_number,
    }
}

/// Decodes one raw participant object.
///
/// # Errors
///
/// Returns [`ShapeError`] when a required participant field is missing or mistyped.
pub fn parse_participant(
    match_id: &str,
    raw: &serde_json::Value,
) -> Result<ParticipantDto, ShapeError> {
    decode("participant", match_id, raw)
}

/// Ranking fields carried on the participant itself, when the payload has
/// both tier and division.
#[must_use]
pub fn embedded_ranking(dto: &ParticipantDto) -> Option<Ranking> {
    let tier = dto.tier.as_deref().filter(|t| !t.is_empty())?;
    let division = dto.rank.as_deref().filter(|d| !d.is_empty())?;
    Some(Ranking {
        tier: tier.to_string(),
        division: division.to_string(),
        league_points: dto.league_points.unwrap_or(0),
        wins: dto.wins.unwrap_or(0),
        losses: dto.losses.unwrap_or(0),
    })
}

/// Picks the ranked-queue entry (else the first entry with tier and
/// division) from a ranking lookup. Anything else is unranked.
#[must_use]
pub fn ranking_from_entries(entries: &[LeagueEntryDto]) -> Ranking {
    let complete = |e: &&LeagueEntryDto| {
        e.tier.as_deref().is_some_and(|t| !t.is_empty())
            && e.rank.as_deref().is_some_and(|r| !r.is_empty())
    };
    let chosen = entries
        .iter()
        .filter(complete)
        .find(|e| e.queue_type.as_deref() == Some(RANKED_QUEUE))
        .or_else(|| entries.iter().find(complete));

    match chosen {
        Some(e) => Ranking {
            tier: e.tier.clone().unwrap_or_default(),
            division: e.rank.clone().unwrap_or_default(),
            league_points: e.league_points,
            wins: e.wins,
            losses: e.losses,
        },
        None => Ranking::unranked(),
    }
}

#[must_use]
pub fn participant_record(
    match_id: &str,
    player_id: &str,
    dto: &ParticipantDto,
    ranking: Ranking,
) -> ParticipantRecord {
    ParticipantRecord {
        match_id: match_id.to_string(),
        player_id: player_id.to_string(),
        placement: dto.placement,
        level: dto.level,
        gold_left: dto.gold_left,
        last_round: dto.last_round,
        players_eliminated: dto.players_eliminated,
        time_eliminated: dto.time_eliminated,
        total_damage: dto.total_damage_to_players,
        companion_id: dto.companion.content_id.clone(),
        tier: ranking.tier,
        division: ranking.division,
        league_points: ranking.league_points,
        wins: ranking.wins,
        losses: ranking.losses,
    }
}

/// Decomposes a participant's traits and units. A malformed trait, unit, or
/// item is skipped on its own; a skipped unit takes its items with it.
#[must_use]
pub fn participant_details(
    match_id: &str,
    player_id: &str,
    dto: &ParticipantDto,
) -> ParticipantDetails {
    let mut details = ParticipantDetails::default();

    for raw in &dto.traits {
        match decode::<TraitDto>("trait", match_id, raw) {
            Ok(t) => details.traits.push(TraitRecord {
                match_id: match_id.to_string(),
                player_id: player_id.to_string(),
                trait_name: t.name,
                num_units: t.num_units,
                style: t.style,
                tier_current: t.tier_current,
                tier_total: t.tier_total,
            }),
            Err(e) => details.skipped.push(e),
        }
    }

    for raw in &dto.units {
        let unit = match decode::<UnitDto>("unit", match_id, raw) {
            Ok(u) => u,
            Err(e) => {
                details.skipped.push(e);
                continue;
            }
        };

        for raw_item in &unit.item_names {
            match decode::<String>("item", match_id, raw_item) {
                Ok(item_id) => details.items.push(ItemRecord {
                    match_id: match_id.to_string(),
                    player_id: player_id.to_string(),
                    character_id: unit.character_id.clone(),
                    item_id,
                }),
                Err(e) => details.skipped.push(e),
            }
        }

        details.units.push(UnitRecord {
            match_id: match_id.to_string(),
            player_id: player_id.to_string(),
            character_id: unit.character_id,
            rarity: unit.rarity,
            tier: unit.tier,
        });
    }

    details
}

fn decode<T: DeserializeOwned>(
    record: &'static str,
    match_id: &str,
    raw: &serde_json::Value,
) -> Result<T, ShapeError> {
    T::deserialize(raw).map_err(|source| ShapeError {
        record,
        match_id: match_id.to_string(),
        source,
    })
}
