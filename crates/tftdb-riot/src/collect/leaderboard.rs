use tftdb_core::{Division, LadderEntry, Tier};

use crate::client::RiotClient;
use crate::error::RiotError;
use crate::issues::{IssueLog, Stage};
use crate::normalize::ladder_entry;
use crate::shutdown::ShutdownSignal;

/// Samples ranked ladder pages for every division of a tier.
pub struct LeaderboardCollector<'a> {
    client: &'a RiotClient,
    shutdown: &'a ShutdownSignal,
    max_pages: u32,
}

impl<'a> LeaderboardCollector<'a> {
    /// Samples page 1 of each division only.
    #[must_use]
    pub fn new(client: &'a RiotClient, shutdown: &'a ShutdownSignal) -> Self {
        Self {
            client,
            shutdown,
            max_pages: 1,
        }
    }

    /// Follows up to `max_pages` pages per division until the cap is met or
    /// a page comes back empty.
    #[must_use]
    pub fn with_max_pages(mut self, max_pages: u32) -> Self {
        self.max_pages = max_pages.max(1);
        self
    }

    /// Collects at most `max_per_division` listings from each division,
    /// walking I, II, III, IV in order.
    ///
    /// An empty page ends that division. A failed request is recorded in
    /// `issues` and counts as an empty page. Listings without a player id
    /// are dropped after the cap is applied.
    ///
    /// # Errors
    ///
    /// Returns [`RiotError::Cancelled`] if shutdown is requested.
    pub async fn collect(
        &self,
        tier: Tier,
        max_per_division: usize,
        issues: &mut IssueLog,
    ) -> Result<Vec<LadderEntry>, RiotError> {
        let mut entries = Vec::new();

        for division in Division::ALL {
            let mut taken = 0usize;
            for page in 1..=self.max_pages {
                if taken >= max_per_division {
                    break;
                }
                self.shutdown.check()?;

                let listing = match self.client.league_entries(tier, division, page).await {
                    Ok(listing) => listing,
                    Err(RiotError::Cancelled) => return Err(RiotError::Cancelled),
                    Err(e) => {
                        issues.record(Stage::Ladder, format!("{tier} {division} page {page}"), &e);
                        break;
                    }
                };

                if listing.is_empty() {
                    tracing::info!(%tier, %division, page, "ladder page empty, division exhausted");
                    break;
                }

                let remaining = max_per_division - taken;
                let before = entries.len();
                for dto in listing.iter().take(remaining) {
                    if let Some(entry) = ladder_entry(dto, tier.as_str(), division.as_str()) {
                        entries.push(entry);
                    }
                }
                taken += listing.len().min(remaining);

                tracing::info!(
                    %tier,
                    %division,
                    page,
                    collected = entries.len() - before,
                    "collected ladder entries"
                );
            }
        }

        Ok(entries)
    }
}
