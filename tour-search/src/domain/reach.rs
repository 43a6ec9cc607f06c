//! The reachability predicate between two events.
//!
//! `can_reach` is the atomic feasibility check used everywhere an edge
//! between two events is considered. The memoization caches are only valid
//! relative to the rules that produced them, so [`ReachRules`] is recorded
//! alongside every persisted artifact.

use chrono::{Duration, NaiveDateTime, NaiveTime};
use serde::{Deserialize, Serialize};

use super::{Event, VenueTable};

/// Length of an event in minutes.
pub const GAME_MINUTES: i64 = 210;

/// Minimum gap between the end of one event and the start of the next for a
/// same-day flight.
pub const FLY_MIN_GAP_MINUTES: i64 = 180;

/// Multi-day driving limits.
///
/// When active, an event on a later day is reachable only if the driving
/// time fits into the evening after the first event, any whole days in
/// between, and the morning of the second event's day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LongHaulRule {
    /// Maximum driving minutes in one calendar day.
    pub daily_drive_minutes: i64,

    /// Local hour at which driving may begin on the arrival day.
    pub wake_hour: u32,
}

impl Default for LongHaulRule {
    fn default() -> Self {
        Self {
            daily_drive_minutes: 600, // 10 hours
            wake_hour: 8,
        }
    }
}

/// Rules deciding whether one event can be reached from another.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReachRules {
    /// Length of an event in minutes.
    pub game_minutes: i64,

    /// Minimum same-day gap (after the first event ends) when flying.
    pub fly_min_gap_minutes: i64,

    /// Multi-day driving limits. `None` treats every later-day event as
    /// reachable.
    pub long_haul: Option<LongHaulRule>,
}

impl Default for ReachRules {
    fn default() -> Self {
        Self {
            game_minutes: GAME_MINUTES,
            fly_min_gap_minutes: FLY_MIN_GAP_MINUTES,
            long_haul: None,
        }
    }
}

impl ReachRules {
    /// Enable the multi-day driving limits.
    pub fn with_long_haul(mut self, rule: LongHaulRule) -> Self {
        self.long_haul = Some(rule);
        self
    }

    /// Whether `to` can be attended after attending `from`.
    ///
    /// Total and side-effect free. Events on an earlier day are never
    /// reachable.
    pub fn can_reach(&self, venues: &VenueTable, from: &Event, to: &Event) -> bool {
        let from_day = from.day();
        let to_day = to.day();

        if to_day > from_day {
            return match &self.long_haul {
                None => true,
                Some(rule) => self.long_haul_reach(rule, venues, from, to),
            };
        }
        if to_day < from_day {
            return false;
        }

        let end = from.start() + Duration::minutes(self.game_minutes);
        let time_allowed = to.start().signed_duration_since(end).num_minutes();
        if time_allowed < 0 {
            return false;
        }
        if time_allowed >= i64::from(from.minutes_to(to, venues)) {
            return true;
        }
        venues.can_fly_between(from.venue(), to.venue())
            && time_allowed >= self.fly_min_gap_minutes
    }

    fn long_haul_reach(
        &self,
        rule: &LongHaulRule,
        venues: &VenueTable,
        from: &Event,
        to: &Event,
    ) -> bool {
        let daily = rule.daily_drive_minutes;

        // Evening after the first event, up to midnight.
        let end = from.start() + Duration::minutes(self.game_minutes);
        let midnight = start_of_day(from.start()) + Duration::days(1);
        let evening = midnight
            .signed_duration_since(end)
            .num_minutes()
            .clamp(0, daily);

        let whole_days = i64::from(to.day() - from.day() - 1) * daily;

        // The arrival morning begins at the destination's local wake hour.
        let offset_hours = i64::from(venues.tz_offset(to.venue()).unwrap_or(0));
        let wake = start_of_day(to.start())
            + Duration::hours(i64::from(rule.wake_hour) + offset_hours);
        let morning = to
            .start()
            .signed_duration_since(wake)
            .num_minutes()
            .clamp(0, daily);

        evening + whole_days + morning >= i64::from(from.minutes_to(to, venues))
    }
}

fn start_of_day(t: NaiveDateTime) -> NaiveDateTime {
    t.date().and_time(NaiveTime::MIN)
}


#[cfg(test)]
mod proptests {
    use super::*;
    use crate::domain::{Venue, VenueTableBuilder};
    use chrono::NaiveDate;
    use proptest::prelude::*;

    fn venues(drive: u32) -> VenueTable {
        VenueTableBuilder::new()
            .venue("AAA", None)
            .venue("BBB", None)
            .drive_both("AAA", "BBB", drive)
            .build()
            .unwrap()
    }

    fn at(day: u32, minute_of_day: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 6, day)
            .unwrap()
            .and_hms_opt(minute_of_day / 60, minute_of_day % 60, 0)
            .unwrap()
    }

    proptest! {
        /// Same day, no flight: reachable iff the drive fits after the event ends.
        #[test]
        fn same_day_drive_rule(
            drive in 1u32..600,
            first in 0u32..1000,
            gap in 0u32..440,
        ) {
            let table = venues(drive);
            let rules = ReachRules::default();
            let from = Event::new(Venue::new(0), at(1, first));
            let to = Event::new(Venue::new(1), at(1, first + gap));

            let allowed = i64::from(gap) - GAME_MINUTES;
            let expected = allowed >= i64::from(drive);
            prop_assert_eq!(rules.can_reach(&table, &from, &to), expected);
        }

        /// Waiting longer for the second event never makes it unreachable.
        #[test]
        fn monotonic_in_later_start(
            drive in 1u32..3000,
            first in 0u32..1400,
            day_gap in 0u32..4,
            second in 0u32..1400,
            extra in 0u32..600,
        ) {
            let table = venues(drive);
            let rules = ReachRules::default().with_long_haul(LongHaulRule::default());
            let from = Event::new(Venue::new(0), at(1, first));
            let to = Event::new(Venue::new(1), at(1 + day_gap, second));
            let later_minute = (second + extra).min(1439);
            let later = Event::new(Venue::new(1), at(1 + day_gap, later_minute));

            if rules.can_reach(&table, &from, &to) {
                prop_assert!(rules.can_reach(&table, &from, &later));
            }
        }
    }
}
