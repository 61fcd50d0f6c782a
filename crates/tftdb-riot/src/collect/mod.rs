//! The three collectors that make up one tier's run.
//!
//! Each collector walks its inputs in order, checks the shutdown signal at
//! every item boundary, and turns per-item API failures into
//! [`crate::IssueLog`] entries. The only error they return is
//! [`crate::RiotError::Cancelled`].

mod leaderboard;
mod match_detail;
mod match_ids;

pub use leaderboard::LeaderboardCollector;
pub use match_detail::MatchDetailCollector;
pub use match_ids::{MatchIdCollector, MatchIdSet};
