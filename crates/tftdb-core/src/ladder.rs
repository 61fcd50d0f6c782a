//! Ranked ladder brackets and the sentinel values used when ranking data is
//! unavailable.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Tier written for participants with no ranking data.
pub const UNRANKED_TIER: &str = "UNRANKED";
/// Division written for participants with no ranking data.
pub const UNRANKED_DIVISION: &str = "NONE";
/// Player id the match API reports for non-human participants.
pub const NON_HUMAN_PLAYER_ID: &str = "BOT";

/// Ranked tiers served by the paginated league-entries endpoint.
///
/// Apex tiers (Master and above) use separate endpoints and are not listed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Tier {
    Iron,
    Bronze,
    Silver,
    Gold,
    Platinum,
    Emerald,
    Diamond,
}

impl Tier {
    pub const ALL: [Tier; 7] = [
        Tier::Iron,
        Tier::Bronze,
        Tier::Silver,
        Tier::Gold,
        Tier::Platinum,
        Tier::Emerald,
        Tier::Diamond,
    ];

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Tier::Iron => "IRON",
            Tier::Bronze => "BRONZE",
            Tier::Silver => "SILVER",
            Tier::Gold => "GOLD",
            Tier::Platinum => "PLATINUM",
            Tier::Emerald => "EMERALD",
            Tier::Diamond => "DIAMOND",
        }
    }
}

impl fmt::Display for Tier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Tier {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let upper = s.trim().to_ascii_uppercase();
        Tier::ALL
            .into_iter()
            .find(|t| t.as_str() == upper)
            .ok_or_else(|| format!("unknown tier '{s}'"))
    }
}

/// Sub-bracket within a tier. Collection walks these in [`Division::ALL`] order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Division {
    I,
    II,
    III,
    IV,
}

impl Division {
    pub const ALL: [Division; 4] = [Division::I, Division::II, Division::III, Division::IV];

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Division::I => "I",
            Division::II => "II",
            Division::III => "III",
            Division::IV => "IV",
        }
    }
}

impl fmt::Display for Division {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
