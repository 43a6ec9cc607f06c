//! Feasibility oracle.
//!
//! Pure functions over a partial itinerary that decide whether it can still
//! be completed within the day budget, plus the admissible trip-length
//! estimate used to prune against the best known solution.
//!
//! Some tables depend on the date the search starts from (the deadline per
//! venue and the double-header candidates). They live in an [`Epoch`] that
//! is rebuilt whenever the outermost search position moves to a new day.

use tracing::debug;

use crate::domain::{Event, EventId, Itinerary, Schedule, Stop, VenueSet, VenueTable};

use super::config::SearchConfig;
use super::double_headers::{DoubleHeader, max_compatible};

/// Tables valid for searches that start on one particular day.
#[derive(Debug, Clone)]
pub struct Epoch {
    /// Master-list position the epoch was built from.
    start: EventId,

    /// Day key of the start event.
    first_day: i32,

    /// First day key outside the day budget.
    end_day: i32,

    /// Indexed by `day - first_day`: for every venue whose last event in the
    /// window falls on or before that day, that last event.
    deadlines: Vec<Vec<Stop>>,

    /// Venues with no event at all inside the window.
    unreachable: VenueSet,

    /// Same-day reachable pairs inside the window.
    double_headers: Vec<DoubleHeader>,

    /// Whether the budget leaves room for rest days.
    rest_allowed: bool,
}

impl Epoch {
    pub fn start(&self) -> EventId {
        self.start
    }

    pub fn first_day(&self) -> i32 {
        self.first_day
    }

    pub fn double_headers(&self) -> &[DoubleHeader] {
        &self.double_headers
    }

    pub fn rest_allowed(&self) -> bool {
        self.rest_allowed
    }

    pub fn unreachable(&self) -> VenueSet {
        self.unreachable
    }
}

/// Feasibility checks for partial itineraries.
#[derive(Debug, Clone)]
pub struct Oracle<'a> {
    venues: &'a VenueTable,
    schedule: &'a Schedule,
    config: &'a SearchConfig,
    epoch: Epoch,
}

impl<'a> Oracle<'a> {
    /// Create an oracle whose epoch starts at `start`.
    ///
    /// # Panics
    ///
    /// Panics if `start` is not a position in `schedule`.
    pub fn new(
        venues: &'a VenueTable,
        schedule: &'a Schedule,
        config: &'a SearchConfig,
        start: EventId,
    ) -> Self {
        let mut oracle = Self {
            venues,
            schedule,
            config,
            epoch: Epoch {
                start,
                first_day: 0,
                end_day: 0,
                deadlines: Vec::new(),
                unreachable: VenueSet::empty(),
                double_headers: Vec::new(),
                rest_allowed: true,
            },
        };
        oracle.reset(start);
        oracle
    }

    pub fn epoch(&self) -> &Epoch {
        &self.epoch
    }

    pub fn venues(&self) -> &'a VenueTable {
        self.venues
    }

    pub fn config(&self) -> &'a SearchConfig {
        self.config
    }

    /// Rebuild the day-relative tables for a search starting at `start`.
    pub fn reset(&mut self, start: EventId) {
        let schedule = self.schedule;
        let first_day = schedule.get(start).day();
        let budget = self.config.day_budget as i32;
        let end_day = first_day + budget;
        let n = self.venues.len();

        let window: Vec<(EventId, &Event)> = schedule
            .iter_from(start)
            .take_while(|(_, e)| e.day() < end_day)
            .collect();

        // Last event at each venue inside the window.
        let mut last_here: Vec<Option<Stop>> = vec![None; n];
        for (id, event) in &window {
            last_here[event.venue().index()] = Some(Stop::new(*id, **event));
        }

        let unreachable: VenueSet = self
            .venues
            .venues()
            .filter(|v| last_here[v.index()].is_none())
            .collect();

        let deadlines = (0..budget.max(0))
            .map(|offset| {
                last_here
                    .iter()
                    .flatten()
                    .filter(|s| s.day() - first_day <= offset)
                    .copied()
                    .collect()
            })
            .collect();

        let mut double_headers = Vec::new();
        for (i, (id1, e1)) in window.iter().enumerate() {
            for (id2, e2) in window[i + 1..].iter().take_while(|(_, e)| e.day() == e1.day()) {
                if e1.venue() != e2.venue() && self.can_reach(e1, e2) {
                    double_headers.push(DoubleHeader::new(
                        Stop::new(*id1, **e1),
                        Stop::new(*id2, **e2),
                    ));
                }
            }
        }

        self.epoch = Epoch {
            start,
            first_day,
            end_day,
            deadlines,
            unreachable,
            double_headers,
            rest_allowed: true,
        };

        let possible = self.max_remaining_double_headers(&Itinerary::new());
        self.epoch.rest_allowed = possible != self.required_double_headers();

        debug!(
            start = %start,
            first_day,
            double_headers = self.epoch.double_headers.len(),
            possible,
            unreachable = self.epoch.unreachable.len(),
            "rebuilt day-relative tables"
        );
        for dh in &self.epoch.double_headers {
            debug!(
                "possible double-header: {} / {}",
                dh.first.event.display(self.venues),
                dh.second.event.display(self.venues)
            );
        }
    }

    /// Whether `to` can be attended after `from` under the configured rules.
    pub fn can_reach(&self, from: &Event, to: &Event) -> bool {
        self.config.rules.can_reach(self.venues, from, to)
    }

    /// Double-headers a complete itinerary must contain to fit the budget.
    pub fn required_double_headers(&self) -> i32 {
        self.venues.len() as i32 - self.config.day_budget as i32
    }

    /// Elapsed days: first to last day inclusive, plus home padding days
    /// when configured.
    pub fn elapsed_days(&self, partial: &Itinerary) -> i32 {
        let mut days = partial.calendar_days();
        let (Some(home), Some(first), Some(last)) =
            (self.config.home, partial.first(), partial.last())
        else {
            return days;
        };
        if let Some(per_day) = home.pad_minutes_per_day {
            let out = self.venues.minutes_between(home.venue, first.venue());
            days += out.div_ceil(per_day) as i32;
            if partial.is_complete(self.venues.len()) {
                let back = self.venues.minutes_between(last.venue(), home.venue);
                days += back.div_ceil(per_day) as i32;
            }
        }
        days
    }

    /// Admissible estimate of the total trip length in minutes.
    ///
    /// Driving minutes so far, plus the largest detour any unvisited venue
    /// still forces from the current endpoint (and on to home, if a home
    /// base is set). A complete itinerary with a home base adds the drive
    /// home instead.
    pub fn trip_length(&self, partial: &Itinerary) -> u32 {
        let (Some(first), Some(last)) = (partial.first(), partial.last()) else {
            return 0;
        };
        let home = self.config.home.map(|h| h.venue);

        let mut length = partial.drive_minutes(self.venues);
        if let Some(home) = home {
            length += self.venues.minutes_between(home, first.venue());
        }

        let unvisited = self.venues.all().difference(partial.visited());
        let padding = unvisited
            .iter()
            .map(|u| {
                let to = self.venues.minutes_between(last.venue(), u);
                to + home.map_or(0, |h| self.venues.minutes_between(u, h))
            })
            .max()
            .unwrap_or_else(|| home.map_or(0, |h| self.venues.minutes_between(last.venue(), h)));

        length + padding
    }

    pub fn rest_days(&self, partial: &Itinerary) -> i32 {
        partial.rest_days()
    }

    pub fn double_header_count(&self, partial: &Itinerary) -> i32 {
        partial.double_headers()
    }

    /// Upper bound on the double-headers the itinerary can still add.
    ///
    /// Candidate pairs lose any member that shares a venue with, or cannot
    /// be reached from, the itinerary's stops (all of them when the last two
    /// already form a double-header, otherwise all but the last). Pairs with
    /// both members left are packed by [`max_compatible`].
    pub fn max_remaining_double_headers(&self, partial: &Itinerary) -> i32 {
        let stops = partial.stops();
        let considered = if partial.ends_with_double_header() {
            stops
        } else {
            &stops[..stops.len().saturating_sub(1)]
        };
        let survives = |member: &Stop| {
            considered
                .iter()
                .all(|s| s.venue() != member.venue() && self.can_reach(&s.event, &member.event))
        };

        let remaining: Vec<(i32, VenueSet)> = self
            .epoch
            .double_headers
            .iter()
            .filter(|dh| survives(&dh.first) && survives(&dh.second))
            .map(|dh| (dh.day(), dh.venues()))
            .collect();

        max_compatible(&remaining) as i32
    }

    /// Whether the itinerary exceeds the day budget.
    pub fn exceeds_day_budget(&self, partial: &Itinerary) -> bool {
        self.elapsed_days(partial) > self.config.day_budget as i32
    }

    /// Whether the itinerary can no longer collect enough double-headers to
    /// finish inside the budget, given `remaining` from
    /// [`max_remaining_double_headers`](Self::max_remaining_double_headers).
    pub fn violates_double_header_bound(&self, partial: &Itinerary, remaining: i32) -> bool {
        partial.double_headers() + remaining - partial.rest_days() < self.required_double_headers()
    }

    /// Whether some venue's last chance has already passed.
    ///
    /// True if a venue has no event inside the window at all, or if a venue
    /// whose last event in the window is on or before today's date is
    /// neither visited nor reachable from the itinerary's last stop.
    pub fn missed_deadline(&self, partial: &Itinerary) -> bool {
        let Some(last) = partial.last() else {
            return false;
        };
        if !self.epoch.unreachable.difference(partial.visited()).is_empty() {
            return true;
        }
        let offset = last.day() - self.epoch.first_day;
        let Some(due) = usize::try_from(offset)
            .ok()
            .and_then(|o| self.epoch.deadlines.get(o))
        else {
            return false;
        };
        due.iter()
            .any(|s| !partial.has_visited(s.venue()) && !self.can_reach(&last.event, &s.event))
    }

    /// Last day key an extension of `partial` may fall on.
    ///
    /// `remaining` comes from
    /// [`max_remaining_double_headers`](Self::max_remaining_double_headers).
    pub fn extension_horizon(&self, partial: &Itinerary, remaining: i32) -> i32 {
        let Some(last) = partial.last() else {
            return self.epoch.end_day;
        };
        if self.epoch.rest_allowed {
            last.day() + partial.double_headers() + remaining - partial.rest_days()
                - self.required_double_headers()
                + 1
        } else {
            last.day() + 1
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Venue, VenueTableBuilder};
    use crate::planner::config::HomeBase;
    use chrono::{NaiveDate, NaiveDateTime};

    fn at(day: u32, hour: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 7, day)
            .unwrap()
            .and_hms_opt(hour, 0, 0)
            .unwrap()
    }

    fn toy_venues() -> VenueTable {
        VenueTableBuilder::new()
            .venue("AAA", None)
            .venue("BBB", None)
            .venue("CCC", None)
            .drive_both("AAA", "BBB", 60)
            .drive_both("BBB", "CCC", 60)
            .drive_both("AAA", "CCC", 200)
            .build()
            .unwrap()
    }

    fn schedule(rows: &[(u8, u32, u32)]) -> Schedule {
        Schedule::from_events(
            rows.iter()
                .map(|&(v, day, hour)| Event::new(Venue::new(v), at(day, hour)))
                .collect(),
        )
        .unwrap()
    }

    fn itinerary(schedule: &Schedule, ids: &[u32]) -> Itinerary {
        let mut it = Itinerary::new();
        for &id in ids {
            assert!(it.push(Stop::new(EventId(id), *schedule.get(EventId(id)))));
        }
        it
    }

    #[test]
    fn trip_length_without_home() {
        let venues = toy_venues();
        let sched = schedule(&[(0, 1, 19), (1, 2, 19), (2, 3, 19)]);
        let config = SearchConfig::new(3);
        let oracle = Oracle::new(&venues, &sched, &config, EventId(0));

        assert_eq!(oracle.trip_length(&Itinerary::new()), 0);
        // A alone: farthest unvisited is C at 200.
        assert_eq!(oracle.trip_length(&itinerary(&sched, &[0])), 200);
        // A-B: 60 driven, C is 60 away.
        assert_eq!(oracle.trip_length(&itinerary(&sched, &[0, 1])), 120);
        assert_eq!(oracle.trip_length(&itinerary(&sched, &[0, 1, 2])), 120);
    }

    #[test]
    fn trip_length_with_home() {
        let venues = toy_venues();
        let sched = schedule(&[(0, 1, 19), (1, 2, 19), (2, 3, 19)]);
        let config = SearchConfig::new(3).with_home(HomeBase::new(Venue::new(0)));
        let oracle = Oracle::new(&venues, &sched, &config, EventId(0));

        // home A → A (0) + A → B (60) + B → C (60) + C → home A (200).
        assert_eq!(oracle.trip_length(&itinerary(&sched, &[0, 1, 2])), 320);
        // A-B, C unvisited: 60 + (B → C + C → A) = 60 + 260.
        assert_eq!(oracle.trip_length(&itinerary(&sched, &[0, 1])), 320);
    }

    #[test]
    fn elapsed_days_with_padding() {
        let venues = toy_venues();
        let sched = schedule(&[(1, 1, 19), (0, 2, 19), (2, 3, 19)]);
        let home = HomeBase::new(Venue::new(0)).with_day_padding(100);
        let config = SearchConfig::new(10).with_home(home);
        let oracle = Oracle::new(&venues, &sched, &config, EventId(0));

        // home A → B is 60 minutes: one padding day.
        assert_eq!(oracle.elapsed_days(&itinerary(&sched, &[0])), 2);
        // Complete: B ... C, then C → A is 200 minutes: two more days.
        assert_eq!(oracle.elapsed_days(&itinerary(&sched, &[0, 1, 2])), 6);

        let plain = SearchConfig::new(10);
        let oracle = Oracle::new(&venues, &sched, &plain, EventId(0));
        assert_eq!(oracle.elapsed_days(&itinerary(&sched, &[0, 1, 2])), 3);
    }

    #[test]
    fn double_header_candidates_and_bound() {
        let venues = toy_venues();
        // A 12:00 and B 19:00 on day 1 form a double-header.
        let sched = schedule(&[(0, 1, 12), (1, 1, 19), (2, 2, 19)]);
        let config = SearchConfig::new(2);
        let oracle = Oracle::new(&venues, &sched, &config, EventId(0));

        assert_eq!(oracle.epoch().double_headers().len(), 1);
        let empty = Itinerary::new();
        assert!(oracle.max_remaining_double_headers(&empty) >= 1);
        // Same value when asked again within the epoch.
        assert_eq!(
            oracle.max_remaining_double_headers(&empty),
            oracle.max_remaining_double_headers(&empty)
        );
        // One required and one possible: no room for rest days.
        assert_eq!(oracle.required_double_headers(), 1);
        assert!(!oracle.epoch().rest_allowed());

        // After visiting only C, the A/B pair is still open.
        let c_only = itinerary(&sched, &[2]);
        assert_eq!(oracle.max_remaining_double_headers(&c_only), 1);

        // Having done A then B, the pair is used up.
        let ab = itinerary(&sched, &[0, 1]);
        assert_eq!(oracle.double_header_count(&ab), 1);
        assert_eq!(oracle.max_remaining_double_headers(&ab), 0);
        assert!(!oracle.violates_double_header_bound(&ab, 0));
    }

    #[test]
    fn double_header_bound_prunes() {
        let venues = toy_venues();
        let sched = schedule(&[(0, 1, 19), (1, 2, 19), (2, 3, 19)]);
        let config = SearchConfig::new(2);
        let oracle = Oracle::new(&venues, &sched, &config, EventId(0));

        let a = itinerary(&sched, &[0]);
        let remaining = oracle.max_remaining_double_headers(&a);
        assert_eq!(remaining, 0);
        assert!(oracle.violates_double_header_bound(&a, remaining));
    }

    #[test]
    fn rest_days_count_against_bound() {
        let venues = toy_venues();
        let sched = schedule(&[(0, 1, 19), (1, 3, 19), (2, 4, 19)]);
        let config = SearchConfig::new(4);
        let oracle = Oracle::new(&venues, &sched, &config, EventId(0));

        let ab = itinerary(&sched, &[0, 1]);
        assert_eq!(oracle.rest_days(&ab), 1);
        // 3 venues in 4 days: no double-headers needed, one rest day is fine.
        assert!(!oracle.violates_double_header_bound(&ab, 0));

        let tight = SearchConfig::new(3);
        let oracle = Oracle::new(&venues, &sched, &tight, EventId(0));
        assert!(oracle.violates_double_header_bound(&ab, 0));
    }

    #[test]
    fn missed_deadline_detects_passed_venue() {
        let venues = toy_venues();
        // C's only event is day 1 at 12:00; A is day 1 at 19:00.
        let sched = schedule(&[(2, 1, 12), (0, 1, 19), (1, 2, 19)]);
        let config = SearchConfig::new(3);
        let oracle = Oracle::new(&venues, &sched, &config, EventId(0));

        let a = itinerary(&sched, &[1]);
        assert!(oracle.missed_deadline(&a));

        let ca = itinerary(&sched, &[0]);
        assert!(!oracle.missed_deadline(&ca));
        assert!(!oracle.missed_deadline(&Itinerary::new()));
    }

    #[test]
    fn venue_outside_window_is_unreachable() {
        let venues = toy_venues();
        let sched = schedule(&[(0, 1, 19), (1, 2, 19), (2, 5, 19)]);
        let config = SearchConfig::new(3);
        let oracle = Oracle::new(&venues, &sched, &config, EventId(0));

        assert!(oracle.epoch().unreachable().contains(Venue::new(2)));
        assert!(oracle.missed_deadline(&itinerary(&sched, &[0])));
    }

    #[test]
    fn reset_moves_window() {
        let venues = toy_venues();
        let sched = schedule(&[(0, 1, 19), (1, 2, 19), (2, 3, 19), (0, 4, 19)]);
        let config = SearchConfig::new(3);
        let mut oracle = Oracle::new(&venues, &sched, &config, EventId(0));
        assert_eq!(oracle.epoch().start(), EventId(0));

        oracle.reset(EventId(1));
        assert_eq!(oracle.epoch().start(), EventId(1));
        assert_eq!(oracle.epoch().first_day(), sched.get(EventId(1)).day());
        assert!(oracle.epoch().unreachable().is_empty());
    }

    #[test]
    fn horizon_without_rest() {
        let venues = toy_venues();
        let sched = schedule(&[(0, 1, 19), (1, 2, 19), (2, 3, 19)]);
        let config = SearchConfig::new(3);
        let oracle = Oracle::new(&venues, &sched, &config, EventId(0));

        // Zero double-headers needed and zero possible: no rest allowed.
        assert!(!oracle.epoch().rest_allowed());
        let a = itinerary(&sched, &[0]);
        assert_eq!(oracle.extension_horizon(&a, 0), a.last().unwrap().day() + 1);
    }

    #[test]
    fn horizon_with_rest() {
        let venues = toy_venues();
        let sched = schedule(&[(0, 1, 19), (1, 2, 19), (2, 3, 19)]);
        let config = SearchConfig::new(5);
        let oracle = Oracle::new(&venues, &sched, &config, EventId(0));

        // 3 venues, 5 days: two spare days.
        assert!(oracle.epoch().rest_allowed());
        let a = itinerary(&sched, &[0]);
        assert_eq!(oracle.extension_horizon(&a, 0), a.last().unwrap().day() + 3);
    }
}
