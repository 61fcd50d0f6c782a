//! Shared fixtures for the wiremock-backed collector tests.

#![allow(dead_code)]

use std::sync::Arc;

use serde_json::{json, Value};
use tftdb_riot::{RateLimitPolicy, RateLimiter, RiotClient, ShutdownSignal};
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, Request, Respond, ResponseTemplate};

pub const API_KEY: &str = "test-key";

/// Client with both hosts pointed at `server` and no throttling.
pub fn test_client(server: &MockServer) -> RiotClient {
    test_client_with_shutdown(server, &ShutdownSignal::new())
}

pub fn test_client_with_shutdown(server: &MockServer, shutdown: &ShutdownSignal) -> RiotClient {
    let limiter = Arc::new(
        RateLimiter::new(RateLimitPolicy::unthrottled()).with_shutdown(shutdown.clone()),
    );
    RiotClient::with_base_urls(
        API_KEY,
        5,
        "tftdb-test/0.1",
        &server.uri(),
        &server.uri(),
        limiter,
    )
    .expect("failed to build test RiotClient")
}

pub fn ladder_entry_json(puuid: &str, tier: &str, division: &str) -> Value {
    json!({
        "puuid": puuid,
        "queueType": "RANKED_TFT",
        "tier": tier,
        "rank": division,
        "leaguePoints": 40,
        "wins": 12,
        "losses": 30
    })
}

pub fn participant_json(puuid: &str, placement: i32) -> Value {
    json!({
        "puuid": puuid,
        "placement": placement,
        "level": 8,
        "gold_left": 4,
        "last_round": 31,
        "players_eliminated": 1,
        "time_eliminated": 1900.5,
        "total_damage_to_players": 88,
        "companion": { "content_ID": format!("companion-{puuid}") },
        "traits": [
            { "name": "Set13_Rebel", "num_units": 3, "style": 1, "tier_current": 1, "tier_total": 3 },
            { "name": "Set13_Sniper", "num_units": 2, "style": 1, "tier_current": 1, "tier_total": 3 }
        ],
        "units": [
            {
                "character_id": "TFT13_Jinx",
                "rarity": 4,
                "tier": 2,
                "itemNames": ["TFT_Item_InfinityEdge", "TFT_Item_InfinityEdge", "TFT_Item_LastWhisper"]
            },
            { "character_id": "TFT13_Vi", "rarity": 1, "tier": 1, "itemNames": [] }
        ]
    })
}

pub fn match_json(match_id: &str, participants: Vec<Value>) -> Value {
    json!({
        "metadata": { "match_id": match_id, "participants": [] },
        "info": {
            "game_datetime": 1_700_000_000_000_i64,
            "game_length": 2150.7,
            "mapId": 22,
            "tft_set_number": 13,
            "participants": participants
        }
    })
}

pub fn ranked_entry_json(tier: &str, division: &str) -> Value {
    json!([{
        "queueType": "RANKED_TFT",
        "tier": tier,
        "rank": division,
        "leaguePoints": 75,
        "wins": 20,
        "losses": 60
    }])
}

pub async fn mount_ladder(server: &MockServer, tier: &str, division: &str, body: Value) {
    Mock::given(method("GET"))
        .and(path(format!("/tft/league/v1/entries/{tier}/{division}")))
        .and(query_param("queue", "RANKED_TFT"))
        .and(query_param("page", "1"))
        .and(query_param("api_key", API_KEY))
        .respond_with(ResponseTemplate::new(200).set_body_json(&body))
        .mount(server)
        .await;
}

pub async fn mount_match_ids(server: &MockServer, puuid: &str, ids: &[&str]) {
    Mock::given(method("GET"))
        .and(path(format!("/tft/match/v1/matches/by-puuid/{puuid}/ids")))
        .and(query_param("api_key", API_KEY))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!(ids)))
        .mount(server)
        .await;
}

pub async fn mount_match(server: &MockServer, match_id: &str, body: Value) {
    Mock::given(method("GET"))
        .and(path(format!("/tft/match/v1/matches/{match_id}")))
        .and(query_param("api_key", API_KEY))
        .respond_with(ResponseTemplate::new(200).set_body_json(&body))
        .mount(server)
        .await;
}

pub async fn mount_ranking(server: &MockServer, puuid: &str, body: Value) {
    Mock::given(method("GET"))
        .and(path(format!("/tft/league/v1/by-puuid/{puuid}")))
        .and(query_param("api_key", API_KEY))
        .respond_with(ResponseTemplate::new(200).set_body_json(&body))
        .mount(server)
        .await;
}

/// Serves `body` and requests shutdown in the same moment, so the collector
/// sees the signal right after this response.
pub struct ShutdownAfterResponse {
    pub shutdown: ShutdownSignal,
    pub body: Value,
}

impl Respond for ShutdownAfterResponse {
    fn respond(&self, _request: &Request) -> ResponseTemplate {
        self.shutdown.request();
        ResponseTemplate::new(200).set_body_json(&self.body)
    }
}
