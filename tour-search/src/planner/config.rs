//! Search configuration for the tour planner.

use serde::{Deserialize, Serialize};

use crate::domain::{ReachRules, Venue};

/// A fixed home venue the trip starts from and returns to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct HomeBase {
    /// The home venue.
    pub venue: Venue,

    /// Driving minutes per padding day. When set, the drive from home to the
    /// first venue (and back from the last) is counted against the day
    /// budget at this rate.
    pub pad_minutes_per_day: Option<u32>,
}

impl HomeBase {
    pub fn new(venue: Venue) -> Self {
        Self {
            venue,
            pad_minutes_per_day: None,
        }
    }

    /// Count the drive to and from home against the day budget.
    pub fn with_day_padding(mut self, minutes_per_day: u32) -> Self {
        self.pad_minutes_per_day = Some(minutes_per_day.max(1));
        self
    }
}

/// Configuration parameters for the tour search.
///
/// Every field changes which states are feasible or how long they are, so
/// the whole config is recorded with persisted caches.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchConfig {
    /// Maximum number of elapsed calendar days.
    pub day_budget: u32,

    /// Optional home venue used for trip-length padding.
    pub home: Option<HomeBase>,

    /// Reachability rules between events.
    pub rules: ReachRules,
}

impl SearchConfig {
    /// Create a configuration with the given day budget and default rules.
    pub fn new(day_budget: u32) -> Self {
        Self {
            day_budget,
            ..Self::default()
        }
    }

    pub fn with_home(mut self, home: HomeBase) -> Self {
        self.home = Some(home);
        self
    }

    pub fn with_rules(mut self, rules: ReachRules) -> Self {
        self.rules = rules;
        self
    }
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            day_budget: 30,
            home: None,
            rules: ReachRules::default(),
        }
    }
}
