//! Normalized records produced by one collection run.
//!
//! All records are transient: created from API payloads, held in a
//! [`MatchBatch`], and handed once to the persistence layer.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::ladder::{UNRANKED_DIVISION, UNRANKED_TIER};

/// One player's ranked standing as listed on a ladder page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LadderEntry {
    pub player_id: String,
    pub tier: String,
    pub division: String,
    pub league_points: i32,
    pub wins: i32,
    pub losses: i32,
}

/// A player's current ranking, attached to each participant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ranking {
    pub tier: String,
    pub division: String,
    pub league_points: i32,
    pub wins: i32,
    pub losses: i32,
}

impl Ranking {
    /// Sentinel ranking used when no ranking data is available.
    #[must_use]
    pub fn unranked() -> Self {
        Self {
            tier: UNRANKED_TIER.to_string(),
            division: UNRANKED_DIVISION.to_string(),
            league_points: 0,
            wins: 0,
            losses: 0,
        }
    }
}

impl Default for Ranking {
    fn default() -> Self {
        Self::unranked()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchRecord {
    pub match_id: String,
    /// Epoch milliseconds as reported by the match API.
    pub game_datetime: i64,
    /// Seconds.
    pub game_length: f64,
    pub map_id: i32,
    pub set_number: i32,
}

/// Keyed by `(match_id, player_id)`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParticipantRecord {
    pub match_id: String,
    pub player_id: String,
    pub placement: i32,
    pub level: i32,
    pub gold_left: i32,
    pub last_round: i32,
    pub players_eliminated: i32,
    pub time_eliminated: f64,
    pub total_damage: i32,
    pub companion_id: String,
    pub tier: String,
    pub division: String,
    pub league_points: i32,
    pub wins: i32,
    pub losses: i32,
}

/// Keyed by `(match_id, player_id, trait_name)`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TraitRecord {
    pub match_id: String,
    pub player_id: String,
    pub trait_name: String,
    pub num_units: i32,
    pub style: i32,
    pub tier_current: i32,
    pub tier_total: i32,
}

/// Keyed by `(match_id, player_id, character_id)`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UnitRecord {
    pub match_id: String,
    pub player_id: String,
    pub character_id: String,
    pub rarity: i32,
    pub tier: i32,
}

/// Keyed by all four fields; duplicate items on one unit collapse.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ItemRecord {
    pub match_id: String,
    pub player_id: String,
    pub character_id: String,
    pub item_id: String,
}

/// Record counts per entity type.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct BatchCounts {
    pub matches: usize,
    pub participants: usize,
    pub traits: usize,
    pub units: usize,
    pub items: usize,
}

impl BatchCounts {
    #[must_use]
    pub fn total(&self) -> usize {
        self.matches + self.participants + self.traits + self.units + self.items
    }
}

/// The in-flight batch for one collection run.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct MatchBatch {
    pub matches: Vec<MatchRecord>,
    pub participants: Vec<ParticipantRecord>,
    pub traits: Vec<TraitRecord>,
    pub units: Vec<UnitRecord>,
    pub items: Vec<ItemRecord>,
}

impl MatchBatch {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.counts().total() == 0
    }

    #[must_use]
    pub fn counts(&self) -> BatchCounts {
        BatchCounts {
            matches: self.matches.len(),
            participants: self.participants.len(),
            traits: self.traits.len(),
            units: self.units.len(),
            items: self.items.len(),
        }
    }

    /// Drops records whose natural key already appeared earlier in the batch.
    /// The first occurrence wins. Returns how many records were removed per
    /// entity type.
    pub fn dedup(&mut self) -> BatchCounts {
        let before = self.counts();

        let mut seen = HashSet::new();
        self.matches.retain(|m| seen.insert(m.match_id.clone()));

        let mut seen = HashSet::new();
        self.participants
            .retain(|p| seen.insert((p.match_id.clone(), p.player_id.clone())));

        let mut seen = HashSet::new();
        self.traits.retain(|t| {
            seen.insert((
                t.match_id.clone(),
                t.player_id.clone(),
                t.trait_name.clone(),
            ))
        });

        let mut seen = HashSet::new();
        self.units.retain(|u| {
            seen.insert((
                u.match_id.clone(),
                u.player_id.clone(),
                u.character_id.clone(),
            ))
        });

        let mut seen = HashSet::new();
        self.items.retain(|i| seen.insert(i.clone()));

        let after = self.counts();
        BatchCounts {
            matches: before.matches - after.matches,
            participants: before.participants - after.participants,
            traits: before.traits - after.traits,
            units: before.units - after.units,
            items: before.items - after.items,
        }
    }

    /// Counts trait, unit, and item records whose `(match_id, player_id)`
    /// has no participant in this batch.
    #[must_use]
    pub fn orphan_count(&self) -> usize {
        let owners: HashSet<(&str, &str)> = self
            .participants
            .iter()
            .map(|p| (p.match_id.as_str(), p.player_id.as_str()))
            .collect();
        let orphaned = |m: &str, p: &str| !owners.contains(&(m, p));

        self.traits
            .iter()
            .filter(|t| orphaned(&t.match_id, &t.player_id))
            .count()
            + self
                .units
                .iter()
                .filter(|u| orphaned(&u.match_id, &u.player_id))
                .count()
            + self
                .items
                .iter()
                .filter(|i| orphaned(&i.match_id, &i.player_id))
                .count()
    }
}
