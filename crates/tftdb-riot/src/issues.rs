//! Side channel for failures the collectors recover from.
//!
//! Every "log and continue" decision goes through [`IssueLog::record`], which
//! emits the `warn!` line and keeps a typed copy for the run report.

use std::fmt;

use serde::Serialize;

/// Where in the pipeline a failure was absorbed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Stage {
    Ladder,
    MatchIds,
    MatchDetail,
    Enrichment,
    Shape,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Stage::Ladder => "ladder",
            Stage::MatchIds => "match_ids",
            Stage::MatchDetail => "match_detail",
            Stage::Enrichment => "enrichment",
            Stage::Shape => "shape",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CollectionIssue {
    pub stage: Stage,
    /// What was skipped: `"DIAMOND II"`, a player id, a match id.
    pub subject: String,
    pub message: String,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct IssueLog {
    issues: Vec<CollectionIssue>,
}

impl IssueLog {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, stage: Stage, subject: impl Into<String>, error: &dyn fmt::Display) {
        let subject = subject.into();
        let message = error.to_string();
        tracing::warn!(%stage, subject = %subject, error = %message, "skipping after recoverable failure");
        self.issues.push(CollectionIssue {
            stage,
            subject,
            message,
        });
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.issues.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.issues.is_empty()
    }

    #[must_use]
    pub fn count(&self, stage: Stage) -> usize {
        self.issues.iter().filter(|i| i.stage == stage).count()
    }

    pub fn iter(&self) -> impl Iterator<Item = &CollectionIssue> {
        self.issues.iter()
    }
}
