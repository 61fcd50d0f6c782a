//! Rate-limited collection engine for the Riot TFT API.
//!
//! Every outbound call goes through one shared [`RateLimiter`]. The three
//! collectors (ladder, match ids, match detail) recover per-item failures by
//! recording a [`CollectionIssue`] and moving on; only cancellation aborts a
//! run. [`CollectionOrchestrator`] chains them for one tier.

pub mod client;
pub mod clock;
pub mod collect;
pub mod error;
pub mod issues;
pub mod normalize;
pub mod pipeline;
pub mod rate_limit;
pub mod shutdown;
pub mod types;

pub use client::RiotClient;
pub use clock::{Clock, ManualClock, TokioClock};
pub use collect::{LeaderboardCollector, MatchDetailCollector, MatchIdCollector, MatchIdSet};
pub use error::{RiotError, ShapeError};
pub use issues::{CollectionIssue, IssueLog, Stage};
pub use pipeline::{CollectionOrchestrator, CollectionReport};
pub use rate_limit::{RateLimitPolicy, RateLimiter};
pub use shutdown::{Cancelled, ShutdownSignal};
