//! Bulk inserts for the five match record tables.
//!
//! Each upsert binds one array per column and inserts through
//! `UNNEST(...)` in a single round-trip. Rows whose natural key already
//! exists are left untouched (`ON CONFLICT DO NOTHING`), so re-ingesting
//! a match is a no-op. Every function returns the number of rows newly
//! inserted.

use sqlx::{PgConnection, PgPool};
use tftdb_core::{
    BatchCounts, ItemRecord, MatchBatch, MatchRecord, ParticipantRecord, TraitRecord, UnitRecord,
};

use crate::DbError;

/// # Errors
///
/// Returns [`DbError::Sqlx`] if the statement fails.
pub async fn upsert_matches(
    conn: &mut PgConnection,
    matches: &[MatchRecord],
) -> Result<u64, DbError> {
    if matches.is_empty() {
        return Ok(0);
    }

    let match_ids: Vec<&str> = matches.iter().map(|m| m.match_id.as_str()).collect();
    let game_datetimes: Vec<i64> = matches.iter().map(|m| m.game_datetime).collect();
    let game_lengths: Vec<f64> = matches.iter().map(|m| m.game_length).collect();
    let map_ids: Vec<i32> = matches.iter().map(|m| m.map_id).collect();
    let set_numbers: Vec<i32> = matches.iter().map(|m| m.set_number).collect();

    let result = sqlx::query(
        "INSERT INTO matches (match_id, game_datetime, game_length, map_id, set_number) \
         SELECT * FROM UNNEST($1::text[], $2::int8[], $3::float8[], $4::int4[], $5::int4[]) \
         ON CONFLICT (match_id) DO NOTHING",
    )
    .bind(&match_ids)
    .bind(&game_datetimes)
    .bind(&game_lengths)
    .bind(&map_ids)
    .bind(&set_numbers)
    .execute(conn)
    .await?;

    Ok(result.rows_affected())
}

/// # Errors
///
/// Returns [`DbError::Sqlx`] if the statement fails, including when a
/// participant references a match that is not stored.
pub async fn upsert_participants(
    conn: &mut PgConnection,
    participants: &[ParticipantRecord],
) -> Result<u64, DbError> {
    if participants.is_empty() {
        return Ok(0);
    }

    let len = participants.len();
    let mut match_ids: Vec<&str> = Vec::with_capacity(len);
    let mut player_ids: Vec<&str> = Vec::with_capacity(len);
    let mut placements: Vec<i32> = Vec::with_capacity(len);
    let mut levels: Vec<i32> = Vec::with_capacity(len);
    let mut gold_left: Vec<i32> = Vec::with_capacity(len);
    let mut last_rounds: Vec<i32> = Vec::with_capacity(len);
    let mut players_eliminated: Vec<i32> = Vec::with_capacity(len);
    let mut time_eliminated: Vec<f64> = Vec::with_capacity(len);
    let mut total_damage: Vec<i32> = Vec::with_capacity(len);
    let mut companion_ids: Vec<&str> = Vec::with_capacity(len);
    let mut tiers: Vec<&str> = Vec::with_capacity(len);
    let mut divisions: Vec<&str> = Vec::with_capacity(len);
    let mut league_points: Vec<i32> = Vec::with_capacity(len);
    let mut wins: Vec<i32> = Vec::with_capacity(len);
    let mut losses: Vec<i32> = Vec::with_capacity(len);

    for p in participants {
        match_ids.push(&p.match_id);
        player_ids.push(&p.player_id);
        placements.push(p.placement);
        levels.push(p.level);
        gold_left.push(p.gold_left);
        last_rounds.push(p.last_round);
        players_eliminated.push(p.players_eliminated);
        time_eliminated.push(p.time_eliminated);
        total_damage.push(p.total_damage);
        companion_ids.push(&p.companion_id);
        tiers.push(&p.tier);
        divisions.push(&p.division);
        league_points.push(p.league_points);
        wins.push(p.wins);
        losses.push(p.losses);
    }

    let result = sqlx::query(
        "INSERT INTO participants \
             (match_id, player_id, placement, level, gold_left, last_round, \
              players_eliminated, time_eliminated, total_damage, companion_id, \
              tier, division, league_points, wins, losses) \
         SELECT * FROM UNNEST(\
              $1::text[], $2::text[], $3::int4[], $4::int4[], $5::int4[], $6::int4[], \
              $7::int4[], $8::float8[], $9::int4[], $10::text[], \
              $11::text[], $12::text[], $13::int4[], $14::int4[], $15::int4[]) \
         ON CONFLICT (match_id, player_id) DO NOTHING",
    )
    .bind(&match_ids)
    .bind(&player_ids)
    .bind(&placements)
    .bind(&levels)
    .bind(&gold_left)
    .bind(&last_rounds)
    .bind(&players_eliminated)
    .bind(&time_eliminated)
    .bind(&total_damage)
    .bind(&companion_ids)
    .bind(&tiers)
    .bind(&divisions)
    .bind(&league_points)
    .bind(&wins)
    .bind(&losses)
    .execute(conn)
    .await?;

    Ok(result.rows_affected())
}

/// # Errors
///
/// Returns [`DbError::Sqlx`] if the statement fails.
pub async fn upsert_traits(
    conn: &mut PgConnection,
    traits: &[TraitRecord],
) -> Result<u64, DbError> {
    if traits.is_empty() {
        return Ok(0);
    }

    let match_ids: Vec<&str> = traits.iter().map(|t| t.match_id.as_str()).collect();
    let player_ids: Vec<&str> = traits.iter().map(|t| t.player_id.as_str()).collect();
    let names: Vec<&str> = traits.iter().map(|t| t.trait_name.as_str()).collect();
    let num_units: Vec<i32> = traits.iter().map(|t| t.num_units).collect();
    let styles: Vec<i32> = traits.iter().map(|t| t.style).collect();
    let tier_current: Vec<i32> = traits.iter().map(|t| t.tier_current).collect();
    let tier_total: Vec<i32> = traits.iter().map(|t| t.tier_total).collect();

    let result = sqlx::query(
        "INSERT INTO traits \
             (match_id, player_id, trait_name, num_units, style, tier_current, tier_total) \
         SELECT * FROM UNNEST(\
              $1::text[], $2::text[], $3::text[], $4::int4[], $5::int4[], $6::int4[], $7::int4[]) \
         ON CONFLICT (match_id, player_id, trait_name) DO NOTHING",
    )
    .bind(&match_ids)
    .bind(&player_ids)
    .bind(&names)
    .bind(&num_units)
    .bind(&styles)
    .bind(&tier_current)
    .bind(&tier_total)
    .execute(conn)
    .await?;

    Ok(result.rows_affected())
}

/// # Errors
///
/// Returns [`DbError::Sqlx`] if the statement fails.
pub async fn upsert_units(conn: &mut PgConnection, units: &[UnitRecord]) -> Result<u64, DbError> {
    if units.is_empty() {
        return Ok(0);
    }

    let match_ids: Vec<&str> = units.iter().map(|u| u.match_id.as_str()).collect();
    let player_ids: Vec<&str> = units.iter().map(|u| u.player_id.as_str()).collect();
    let character_ids: Vec<&str> = units.iter().map(|u| u.character_id.as_str()).collect();
    let rarities: Vec<i32> = units.iter().map(|u| u.rarity).collect();
    let tiers: Vec<i32> = units.iter().map(|u| u.tier).collect();

    let result = sqlx::query(
        "INSERT INTO units (match_id, player_id, character_id, rarity, tier) \
         SELECT * FROM UNNEST($1::text[], $2::text[], $3::text[], $4::int4[], $5::int4[]) \
         ON CONFLICT (match_id, player_id, character_id) DO NOTHING",
    )
    .bind(&match_ids)
    .bind(&player_ids)
    .bind(&character_ids)
    .bind(&rarities)
    .bind(&tiers)
    .execute(conn)
    .await?;

    Ok(result.rows_affected())
}

/// # Errors
///
/// Returns [`DbError::Sqlx`] if the statement fails.
pub async fn upsert_items(conn: &mut PgConnection, items: &[ItemRecord]) -> Result<u64, DbError> {
    if items.is_empty() {
        return Ok(0);
    }

    let match_ids: Vec<&str> = items.iter().map(|i| i.match_id.as_str()).collect();
    let player_ids: Vec<&str> = items.iter().map(|i| i.player_id.as_str()).collect();
    let character_ids: Vec<&str> = items.iter().map(|i| i.character_id.as_str()).collect();
    let item_ids: Vec<&str> = items.iter().map(|i| i.item_id.as_str()).collect();

    let result = sqlx::query(
        "INSERT INTO items (match_id, player_id, character_id, item_id) \
         SELECT * FROM UNNEST($1::text[], $2::text[], $3::text[], $4::text[]) \
         ON CONFLICT (match_id, player_id, character_id, item_id) DO NOTHING",
    )
    .bind(&match_ids)
    .bind(&player_ids)
    .bind(&character_ids)
    .bind(&item_ids)
    .execute(conn)
    .await?;

    Ok(result.rows_affected())
}

/// Writes one tier's batch in a single transaction, parents before
/// children. If any table fails, nothing from the batch is kept.
///
/// The batch should already be deduplicated: `UNNEST` inserts with a
/// repeated key inside one statement still succeed, but later duplicates
/// are dropped silently.
///
/// Returns the number of newly inserted rows per table.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if any statement or the commit fails.
pub async fn persist_batch(pool: &PgPool, batch: &MatchBatch) -> Result<BatchCounts, DbError> {
    let mut tx = pool.begin().await?;

    let matches = upsert_matches(&mut tx, &batch.matches).await?;
    let participants = upsert_participants(&mut tx, &batch.participants).await?;
    let traits = upsert_traits(&mut tx, &batch.traits).await?;
    let units = upsert_units(&mut tx, &batch.units).await?;
    let items = upsert_items(&mut tx, &batch.items).await?;

    tx.commit().await?;

    Ok(BatchCounts {
        matches: to_count(matches),
        participants: to_count(participants),
        traits: to_count(traits),
        units: to_count(units),
        items: to_count(items),
    })
}

fn to_count(rows: u64) -> usize {
    usize::try_from(rows).unwrap_or(usize::MAX)
}
