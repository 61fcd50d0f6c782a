use thiserror::Error;

use crate::shutdown::Cancelled;

/// Errors returned by [`crate::RiotClient`].
///
/// URLs carried in variants have the `api_key` query parameter redacted.
#[derive(Debug, Error)]
pub enum RiotError {
    /// The API answered with a non-success status.
    #[error("{url} returned {status}: {body}")]
    Transport {
        url: String,
        status: u16,
        body: String,
    },

    /// Network or TLS failure before a status was received.
    #[error("HTTP error for {url}: {source}")]
    Http {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    /// The body was not the JSON shape the endpoint promises.
    #[error("JSON deserialization error for {context}: {source}")]
    Decode {
        context: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("invalid base URL \"{base_url}\": {reason}")]
    InvalidBaseUrl { base_url: String, reason: String },

    #[error("collection cancelled")]
    Cancelled,
}

impl From<Cancelled> for RiotError {
    fn from(_: Cancelled) -> Self {
        RiotError::Cancelled
    }
}

impl RiotError {
    /// `true` when the run stopped because shutdown was requested, not
    /// because a request failed.
    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        matches!(self, RiotError::Cancelled)
    }
}

/// A participant, trait, unit, or item sub-object lacked a field the
/// normalized record needs. Only that record is skipped.
#[derive(Debug, Error)]
#[error("malformed {record} in match {match_id}: {source}")]
pub struct ShapeError {
    pub record: &'static str,
    pub match_id: String,
    #[source]
    pub source: serde_json::Error,
}
