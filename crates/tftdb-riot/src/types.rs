//! Riot TFT API response types.
//!
//! League entries are decoded leniently (every field optional or defaulted)
//! because the ladder and ranking endpoints omit fields for some players.
//! Match participants, traits, and units stay as raw JSON until
//! normalization so a malformed sub-object costs only its own record.

use serde::Deserialize;

/// Queue whose ranking is attached to participants.
pub const RANKED_QUEUE: &str = "RANKED_TFT";

/// One entry from `league/v1/entries/{tier}/{division}` or `league/v1/by-puuid/{puuid}`.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LeagueEntryDto {
    #[serde(default)]
    pub puuid: Option<String>,
    #[serde(default)]
    pub queue_type: Option<String>,
    #[serde(default)]
    pub tier: Option<String>,
    /// Division within the tier (`"I"`..`"IV"`).
    #[serde(default)]
    pub rank: Option<String>,
    #[serde(default)]
    pub league_points: i32,
    #[serde(default)]
    pub wins: i32,
    #[serde(default)]
    pub losses: i32,
}

// ---------------------------------------------------------------------------
// match/v1/matches/{match_id}
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Deserialize)]
pub struct MatchDto {
    #[serde(default)]
    pub metadata: Option<MatchMetadataDto>,
    pub info: MatchInfoDto,
}

#[derive(Debug, Clone, Deserialize)]
pub struct MatchMetadataDto {
    pub match_id: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct MatchInfoDto {
    pub game_datetime: i64,
    pub game_length: f64,
    #[serde(rename = "mapId")]
    pub map_id: i32,
    pub tft_set_number: i32,
    #[serde(default)]
    pub participants: Vec<serde_json::Value>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ParticipantDto {
    #[serde(default)]
    pub puuid: Option<String>,
    pub placement: i32,
    pub level: i32,
    pub gold_left: i32,
    pub last_round: i32,
    pub players_eliminated: i32,
    pub time_eliminated: f64,
    pub total_damage_to_players: i32,
    pub companion: CompanionDto,
    #[serde(default)]
    pub traits: Vec<serde_json::Value>,
    #[serde(default)]
    pub units: Vec<serde_json::Value>,
    /// Ranking fields, present only on some match payloads.
    #[serde(default)]
    pub tier: Option<String>,
    #[serde(default)]
    pub rank: Option<String>,
    #[serde(default, rename = "leaguePoints")]
    pub league_points: Option<i32>,
    #[serde(default)]
    pub wins: Option<i32>,
    #[serde(default)]
    pub losses: Option<i32>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CompanionDto {
    #[serde(rename = "content_ID")]
    pub content_id: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TraitDto {
    pub name: String,
    pub num_units: i32,
    pub style: i32,
    pub tier_current: i32,
    pub tier_total: i32,
}

#[derive(Debug, Clone, Deserialize)]
pub struct UnitDto {
    pub character_id: String,
    pub rarity: i32,
    pub tier: i32,
    #[serde(default, rename = "itemNames")]
    pub item_names: Vec<serde_json::Value>,
}
