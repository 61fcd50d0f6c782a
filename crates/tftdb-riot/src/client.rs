//! HTTP client for the Riot TFT REST API.
//!
//! Every request first takes a slot from the shared [`RateLimiter`], so a
//! failed call still counts against the quota. The client never retries;
//! callers decide what a failure means for their unit of work.

use std::sync::Arc;
use std::time::Duration;

use reqwest::{Client, Url};
use serde::de::DeserializeOwned;
use tftdb_core::{AppConfig, Division, Tier};

use crate::error::RiotError;
use crate::rate_limit::RateLimiter;
use crate::types::{LeagueEntryDto, MatchDto, RANKED_QUEUE};

const DEFAULT_PLATFORM_BASE_URL: &str = "https://eun1.api.riotgames.com/";
const DEFAULT_REGIONAL_BASE_URL: &str = "https://europe.api.riotgames.com/";
const API_KEY_PARAM: &str = "api_key";
/// Error bodies longer than this are cut before they land in logs.
const MAX_ERROR_BODY_CHARS: usize = 512;

/// Client for the Riot TFT API.
///
/// League endpoints live on the platform host, match endpoints on the
/// regional host. Use [`RiotClient::with_base_urls`] to point both at a mock
/// server in tests.
pub struct RiotClient {
    client: Client,
    api_key: String,
    platform_base_url: Url,
    regional_base_url: Url,
    limiter: Arc<RateLimiter>,
}

impl RiotClient {
    /// Creates a client pointed at the production EUNE / Europe hosts.
    ///
    /// # Errors
    ///
    /// Returns [`RiotError::Http`] if the underlying `reqwest::Client` cannot
    /// be constructed.
    pub fn new(
        api_key: &str,
        timeout_secs: u64,
        user_agent: &str,
        limiter: Arc<RateLimiter>,
    ) -> Result<Self, RiotError> {
        Self::with_base_urls(
            api_key,
            timeout_secs,
            user_agent,
            DEFAULT_PLATFORM_BASE_URL,
            DEFAULT_REGIONAL_BASE_URL,
            limiter,
        )
    }

    /// Creates a client with explicit platform and regional hosts.
    ///
    /// # Errors
    ///
    /// Returns [`RiotError::Http`] if the `reqwest::Client` cannot be built,
    /// or [`RiotError::InvalidBaseUrl`] if either base URL does not parse.
    pub fn with_base_urls(
        api_key: &str,
        timeout_secs: u64,
        user_agent: &str,
        platform_base_url: &str,
        regional_base_url: &str,
        limiter: Arc<RateLimiter>,
    ) -> Result<Self, RiotError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .connect_timeout(Duration::from_secs(10))
            .user_agent(user_agent)
            .build()
            .map_err(|source| RiotError::Http {
                url: "<client builder>".to_string(),
                source,
            })?;

        Ok(Self {
            client,
            api_key: api_key.to_owned(),
            platform_base_url: parse_base_url(platform_base_url)?,
            regional_base_url: parse_base_url(regional_base_url)?,
            limiter,
        })
    }

    /// Builds a client from the loaded application config.
    ///
    /// # Errors
    ///
    /// See [`RiotClient::with_base_urls`].
    pub fn from_config(config: &AppConfig, limiter: Arc<RateLimiter>) -> Result<Self, RiotError> {
        Self::with_base_urls(
            &config.riot_api_key,
            config.request_timeout_secs,
            &config.user_agent,
            &config.platform_base_url,
            &config.regional_base_url,
            limiter,
        )
    }

    #[must_use]
    pub fn limiter(&self) -> &Arc<RateLimiter> {
        &self.limiter
    }

    /// One page of ranked ladder entries for a tier and division.
    ///
    /// # Errors
    ///
    /// See [`RiotClient::request`].
    pub async fn league_entries(
        &self,
        tier: Tier,
        division: Division,
        page: u32,
    ) -> Result<Vec<LeagueEntryDto>, RiotError> {
        let page = page.to_string();
        let url = self.build_url(
            &self.platform_base_url,
            &["tft", "league", "v1", "entries", tier.as_str(), division.as_str()],
            &[("queue", RANKED_QUEUE), ("page", &page)],
        );
        self.request(&url).await
    }

    /// The `count` most recent match ids for a player.
    ///
    /// # Errors
    ///
    /// See [`RiotClient::request`].
    pub async fn match_ids_by_player(
        &self,
        player_id: &str,
        count: usize,
    ) -> Result<Vec<String>, RiotError> {
        let count = count.to_string();
        let url = self.build_url(
            &self.regional_base_url,
            &["tft", "match", "v1", "matches", "by-puuid", player_id, "ids"],
            &[("start", "0"), ("count", &count)],
        );
        self.request(&url).await
    }

    /// Full match payload.
    ///
    /// # Errors
    ///
    /// See [`RiotClient::request`].
    pub async fn match_detail(&self, match_id: &str) -> Result<MatchDto, RiotError> {
        let url = self.build_url(
            &self.regional_base_url,
            &["tft", "match", "v1", "matches", match_id],
            &[],
        );
        self.request(&url).await
    }

    /// A player's current league entries across TFT queues.
    ///
    /// # Errors
    ///
    /// See [`RiotClient::request`].
    pub async fn ranking_by_player(
        &self,
        player_id: &str,
    ) -> Result<Vec<LeagueEntryDto>, RiotError> {
        let url = self.build_url(
            &self.platform_base_url,
            &["tft", "league", "v1", "by-puuid", player_id],
            &[],
        );
        self.request(&url).await
    }

    /// Takes a rate-limiter slot, sends a GET, and decodes the JSON body.
    ///
    /// # Errors
    ///
    /// - [`RiotError::Cancelled`] if shutdown was requested while waiting for a slot.
    /// - [`RiotError::Http`] on network failure.
    /// - [`RiotError::Transport`] on a non-2xx status; carries status and body.
    /// - [`RiotError::Decode`] if the body does not decode into `T`.
    pub async fn request<T: DeserializeOwned>(&self, url: &Url) -> Result<T, RiotError> {
        self.limiter.acquire().await?;

        let shown = redact_api_key(url);
        let response = self
            .client
            .get(url.clone())
            .send()
            .await
            .map_err(|e| RiotError::Http {
                url: shown.clone(),
                source: e.without_url(),
            })?;

        let status = response.status();
        let body = response.text().await.map_err(|e| RiotError::Http {
            url: shown.clone(),
            source: e.without_url(),
        })?;

        if !status.is_success() {
            return Err(RiotError::Transport {
                url: shown,
                status: status.as_u16(),
                body: body.chars().take(MAX_ERROR_BODY_CHARS).collect(),
            });
        }

        serde_json::from_str(&body).map_err(|source| RiotError::Decode {
            context: shown,
            source,
        })
    }

    /// Appends percent-encoded path segments and query parameters to `base`.
    /// The API key is always the last query parameter.
    fn build_url(&self, base: &Url, segments: &[&str], query: &[(&str, &str)]) -> Url {
        let mut url = base.clone();
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(segments);
        }
        {
            let mut pairs = url.query_pairs_mut();
            for (k, v) in query {
                pairs.append_pair(k, v);
            }
            pairs.append_pair(API_KEY_PARAM, &self.api_key);
        }
        url
    }
}

fn parse_base_url(base_url: &str) -> Result<Url, RiotError> {
    let normalised = format!("{}/", base_url.trim_end_matches('/'));
    let url = Url::parse(&normalised).map_err(|e| RiotError::InvalidBaseUrl {
        base_url: base_url.to_owned(),
        reason: e.to_string(),
    })?;
    if url.cannot_be_a_base() {
        return Err(RiotError::InvalidBaseUrl {
            base_url: base_url.to_owned(),
            reason: "URL cannot carry path segments".to_string(),
        });
    }
    Ok(url)
}

/// Renders `url` with the API key value replaced, for errors and logs.
fn redact_api_key(url: &Url) -> String {
    let pairs: Vec<(String, String)> = url
        .query_pairs()
        .map(|(k, v)| {
            let v = if k == API_KEY_PARAM {
                "REDACTED".to_string()
            } else {
                v.into_owned()
            };
            (k.into_owned(), v)
        })
        .collect();
    let mut shown = url.clone();
    if pairs.is_empty() {
        shown.set_query(None);
    } else {
        shown.query_pairs_mut().clear().extend_pairs(pairs);
    }
    shown.to_string()
}
