use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Tier {
    #[default]
    Free,
    Premium,
    Vip,
}

impl Tier {
    pub fn as_str(&self) -> &'static str {
        match self {
            Tier::Free => "free",
            Tier::Premium => "premium",
            Tier::Vip => "vip",
        }
    }

    pub fn daily_limit(&self) -> u32 {
        match self {
            Tier::Free => 3,
            Tier::Premium => 10,
            Tier::Vip => 999,
        }
    }
}

impl fmt::Display for Tier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Tier {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "free" => Ok(Tier::Free),
            "premium" => Ok(Tier::Premium),
            "vip" => Ok(Tier::Vip),
            _ => Err(()),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct QuotaStatus {
    pub allowed: bool,
    pub remaining: u32,
}

/// Draws still available today. A quota last refilled on an earlier day is
/// treated as refilled to the tier limit.
pub fn check_quota(tier: Tier, draws_left: u32, quota_date: NaiveDate, today: NaiveDate) -> QuotaStatus {
    let remaining = if quota_date == today { draws_left } else { tier.daily_limit() };
    QuotaStatus { allowed: remaining > 0, remaining }
}

impl QuotaStatus {
    /// Remaining count to persist once a draw has been taken.
    pub fn after_draw(&self) -> u32 {
        self.remaining.saturating_sub(1)
    }
}
