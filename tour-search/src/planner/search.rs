//! Depth-first backtracking tour search.
//!
//! Extends a partial itinerary one event at a time in master-list order,
//! pruning with the [`Oracle`] bounds and the [`MemoStore`] tables, and keeps
//! the shortest complete itinerary found.

use tracing::{debug, error, info, trace, warn};

use crate::domain::{EventId, Itinerary, Schedule, Stop, VenueCode, VenueTable};
use crate::state::{BestRecord, StateFiles};

use super::config::SearchConfig;
use super::memo::MemoStore;
use super::oracle::Oracle;
use super::progress::Gauge;

/// Error from tour search.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SearchError {
    /// The schedule has no events to search
    #[error("schedule is empty")]
    EmptySchedule,

    /// A seed index is not a master-list position
    #[error("seed event {id} is out of range for a schedule of {len} events")]
    SeedIndexOutOfRange { id: EventId, len: usize },

    /// The seed visits a venue twice
    #[error("seed visits {venue} twice")]
    SeedRevisitsVenue { venue: VenueCode },

    /// Two consecutive seed events cannot both be attended
    #[error("seed event {to} cannot be reached from {from}")]
    SeedUnreachable { from: EventId, to: EventId },

    /// The seed is already provably infeasible
    #[error("infeasible starting point: {reason}")]
    InfeasibleSeed { reason: PruneReason },
}

/// Why a partial itinerary was discarded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PruneReason {
    /// Elapsed days exceed the budget.
    DayBudget,
    /// Too few double-headers remain possible to finish in time.
    DoubleHeaderBound,
    /// A venue's last event in the window can no longer be reached.
    Deadline,
    /// A recorded dead end covers this state.
    DeadEnd,
    /// The length estimate exceeds the best complete itinerary.
    Length,
    /// A recorded path to the same event is no longer.
    ShortestPath,
}

impl std::fmt::Display for PruneReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let text = match self {
            PruneReason::DayBudget => "exceeds the day budget",
            PruneReason::DoubleHeaderBound => "not enough double-headers left",
            PruneReason::Deadline => "a venue can no longer be reached in time",
            PruneReason::DeadEnd => "known dead end",
            PruneReason::Length => "longer than the best itinerary",
            PruneReason::ShortestPath => "dominated by a shorter path",
        };
        f.write_str(text)
    }
}

/// Counters collected during a search.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchStats {
    /// Partial itineraries examined.
    pub nodes: u64,
    pub pruned_day_budget: u64,
    pub pruned_double_header: u64,
    pub pruned_deadline: u64,
    pub pruned_dead_end: u64,
    pub pruned_length: u64,
    pub pruned_shortest_path: u64,
    /// Dead-end states added to the table.
    pub dead_ends_recorded: u64,
    /// Complete itineraries reached.
    pub solutions: u64,
    /// Times the best itinerary improved.
    pub improvements: u64,
}

impl SearchStats {
    /// Number of prunes for `reason`.
    pub fn pruned(&self, reason: PruneReason) -> u64 {
        match reason {
            PruneReason::DayBudget => self.pruned_day_budget,
            PruneReason::DoubleHeaderBound => self.pruned_double_header,
            PruneReason::Deadline => self.pruned_deadline,
            PruneReason::DeadEnd => self.pruned_dead_end,
            PruneReason::Length => self.pruned_length,
            PruneReason::ShortestPath => self.pruned_shortest_path,
        }
    }

    fn record_prune(&mut self, reason: PruneReason) {
        let counter = match reason {
            PruneReason::DayBudget => &mut self.pruned_day_budget,
            PruneReason::DoubleHeaderBound => &mut self.pruned_double_header,
            PruneReason::Deadline => &mut self.pruned_deadline,
            PruneReason::DeadEnd => &mut self.pruned_dead_end,
            PruneReason::Length => &mut self.pruned_length,
            PruneReason::ShortestPath => &mut self.pruned_shortest_path,
        };
        *counter += 1;
    }
}

/// A complete itinerary with its trip length.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Solution {
    pub itinerary: Itinerary,
    /// Trip length in minutes.
    pub length: u32,
    /// Elapsed days.
    pub days: i32,
}

impl Solution {
    pub fn ids(&self) -> Vec<EventId> {
        self.itinerary.ids().collect()
    }
}

/// Result of a search run.
#[derive(Debug, Clone)]
pub struct SearchOutcome {
    /// The best complete itinerary known at the end of the run, including
    /// one loaded from persisted state.
    pub best: Option<Solution>,
    pub stats: SearchStats,
}

/// Tour search over one schedule.
#[derive(Debug, Clone)]
pub struct Search<'a> {
    venues: &'a VenueTable,
    schedule: &'a Schedule,
    config: SearchConfig,
    state: Option<StateFiles>,
    gauge: Gauge,
}

impl<'a> Search<'a> {
    pub fn new(venues: &'a VenueTable, schedule: &'a Schedule, config: SearchConfig) -> Self {
        Self {
            venues,
            schedule,
            config,
            state: None,
            gauge: Gauge::new(),
        }
    }

    /// Load and persist the memo tables and best itinerary with `state`.
    pub fn with_state(mut self, state: StateFiles) -> Self {
        self.state = Some(state);
        self
    }

    /// Report progress against a shared gauge.
    pub fn with_gauge(mut self, gauge: Gauge) -> Self {
        self.gauge = gauge;
        self
    }

    /// Search all completions of `seed`.
    ///
    /// With an empty seed every event in the schedule is tried as the first
    /// stop, in order.
    pub fn run(&self, seed: &[EventId]) -> Result<SearchOutcome, SearchError> {
        if self.schedule.is_empty() {
            return Err(SearchError::EmptySchedule);
        }
        let mut partial = self.validate_seed(seed)?;

        let start = partial.first().map_or(EventId(0), |s| s.id);
        let oracle = Oracle::new(self.venues, self.schedule, &self.config, start);
        let mut ctx = SearchContext {
            oracle,
            schedule: self.schedule,
            memo: MemoStore::new(),
            state: self.state.as_ref(),
            gauge: &self.gauge,
            best: None,
            found_solution: false,
            stats: SearchStats::default(),
        };

        ctx.load_memo();
        if let Some(reason) = ctx.prune_reason(&partial) {
            return Err(SearchError::InfeasibleSeed { reason });
        }
        ctx.load_best();

        info!(
            seed = %describe_ids(&partial),
            day_budget = self.config.day_budget,
            "starting search"
        );
        ctx.backtrack(&mut partial);
        ctx.finish();

        Ok(SearchOutcome {
            best: ctx.best,
            stats: ctx.stats,
        })
    }

    fn validate_seed(&self, seed: &[EventId]) -> Result<Itinerary, SearchError> {
        let mut partial = Itinerary::with_capacity(self.venues.len());
        for &id in seed {
            let Some(event) = self.schedule.try_get(id) else {
                return Err(SearchError::SeedIndexOutOfRange {
                    id,
                    len: self.schedule.len(),
                });
            };
            if let Some(last) = partial.last()
                && !self.config.rules.can_reach(self.venues, &last.event, event)
            {
                return Err(SearchError::SeedUnreachable {
                    from: last.id,
                    to: id,
                });
            }
            if !partial.push(Stop::new(id, *event)) {
                return Err(SearchError::SeedRevisitsVenue {
                    venue: self.venues.code(event.venue()),
                });
            }
        }
        Ok(partial)
    }
}

/// Mutable state of one search run.
struct SearchContext<'a> {
    oracle: Oracle<'a>,
    schedule: &'a Schedule,
    memo: MemoStore,
    state: Option<&'a StateFiles>,
    gauge: &'a Gauge,
    best: Option<Solution>,
    found_solution: bool,
    stats: SearchStats,
}

impl SearchContext<'_> {
    fn backtrack(&mut self, partial: &mut Itinerary) {
        self.stats.nodes += 1;
        if let Some(reason) = self.prune_reason(partial) {
            trace!(partial = %describe_ids(partial), %reason, "pruned");
            self.stats.record_prune(reason);
            return;
        }

        if partial.is_complete(self.oracle.venues().len()) {
            self.process_solution(partial);
        } else if !partial.is_empty() && self.gauge.raise_to(partial.len()) {
            info!("{}", self.describe(partial));
        }

        let mut from = partial.last().map_or(EventId(0), |s| s.id.next());
        while let Some(stop) = self.extension(partial, from) {
            partial.push(stop);
            self.backtrack(partial);
            let Some(done) = partial.pop() else {
                break;
            };
            from = done.id.next();
            if partial.is_empty() {
                self.advance_root(&done, from);
            }
        }
    }

    /// Why `partial` should be discarded, if it should.
    fn prune_reason(&self, partial: &Itinerary) -> Option<PruneReason> {
        if self.oracle.exceeds_day_budget(partial) {
            return Some(PruneReason::DayBudget);
        }
        if self.found_solution
            && let Some(last) = partial.last()
        {
            let length = self.oracle.trip_length(partial);
            if self.best.as_ref().is_some_and(|b| length > b.length) {
                return Some(PruneReason::Length);
            }
            if self.memo.is_dominated(last.id, partial.visited(), length) {
                return Some(PruneReason::ShortestPath);
            }
        }

        let n = self.oracle.venues().len();
        let Some(last) = partial.last() else {
            return None;
        };
        if partial.is_complete(n) {
            return None;
        }

        let remaining = self.oracle.max_remaining_double_headers(partial);
        if self.oracle.violates_double_header_bound(partial, remaining) {
            return Some(PruneReason::DoubleHeaderBound);
        }
        if self.oracle.missed_deadline(partial) {
            return Some(PruneReason::Deadline);
        }
        if self.memo.is_dead_end(last.id, partial.visited()) {
            return Some(PruneReason::DeadEnd);
        }
        None
    }

    /// The first valid extension of `partial` at or after `from`.
    ///
    /// Records `partial` in the memo tables when there is none.
    fn extension(&mut self, partial: &Itinerary, from: EventId) -> Option<Stop> {
        let Some(last) = partial.last() else {
            return self.schedule.try_get(from).map(|e| Stop::new(from, *e));
        };

        let horizon = if self.oracle.epoch().rest_allowed() {
            let remaining = self.oracle.max_remaining_double_headers(partial);
            self.oracle.extension_horizon(partial, remaining)
        } else {
            self.oracle.extension_horizon(partial, 0)
        };

        let found = self
            .schedule
            .iter_from(from)
            .take_while(|(_, e)| e.day() <= horizon)
            .find(|(_, e)| !partial.has_visited(e.venue()) && self.oracle.can_reach(&last.event, e))
            .map(|(id, e)| Stop::new(id, *e));
        if found.is_some() {
            return found;
        }

        if !self.found_solution && self.memo.record_dead_end(last.id, partial.visited()) {
            self.stats.dead_ends_recorded += 1;
        }
        let length = self.oracle.trip_length(partial);
        self.memo.record_length(last.id, partial.visited(), length);
        None
    }

    /// The outermost stop moved on from `done` to position `next`.
    fn advance_root(&mut self, done: &Stop, next: EventId) {
        self.gauge.reset();
        self.found_solution = false;
        let Some(event) = self.schedule.try_get(next) else {
            return;
        };
        if event.day() != done.day() {
            info!("Checking {}", event.start().format("%-m/%d"));
            self.memo.clear();
            self.oracle.reset(next);
        }
    }

    fn process_solution(&mut self, partial: &Itinerary) {
        self.stats.solutions += 1;
        debug!(solution = %self.describe(partial), "complete itinerary");

        for len in 3..=partial.len() {
            let prefix = partial.prefix(len);
            if let Some(last) = prefix.last() {
                let length = self.oracle.trip_length(&prefix);
                self.memo.record_length(last.id, prefix.visited(), length);
            }
        }
        self.save_paths();

        if !self.found_solution {
            self.found_solution = true;
            self.save_dead_ends();
        }

        let length = self.oracle.trip_length(partial);
        let previous = self.best.as_ref().map(|b| b.length);
        if previous.is_none_or(|p| length < p) {
            info!(
                length,
                previous = ?previous,
                "Best solution is {length}"
            );
            self.stats.improvements += 1;
            let solution = Solution {
                itinerary: partial.clone(),
                length,
                days: self.oracle.elapsed_days(partial),
            };
            self.save_best(&solution);
            self.best = Some(solution);
        }
    }

    fn finish(&mut self) {
        self.save_paths();
        if !self.found_solution {
            self.save_dead_ends();
        }
        info!(
            nodes = self.stats.nodes,
            solutions = self.stats.solutions,
            dead_ends = self.memo.dead_end_count(),
            paths = self.memo.path_count(),
            "search finished"
        );
    }

    fn load_memo(&mut self) {
        let Some(state) = self.state else {
            return;
        };
        let day = self.oracle.epoch().first_day();
        self.memo.load_dead_ends(state.load_dead_ends(day));
        self.memo.load_paths(state.load_paths(day));
    }

    /// Adopt the persisted best itinerary after checking it against the
    /// schedule and the reachability rule.
    fn load_best(&mut self) {
        let Some(record) = self.state.and_then(|s| s.load_best()) else {
            return;
        };

        let mut itinerary = Itinerary::new();
        for &id in &record.events {
            let pushed = self.schedule.try_get(id).is_some_and(|e| {
                let reachable = itinerary
                    .last()
                    .is_none_or(|prev| self.oracle.can_reach(&prev.event, e));
                reachable && itinerary.push(Stop::new(id, *e))
            });
            if !pushed {
                warn!(event = %id, "persisted best itinerary does not match the schedule, ignoring");
                return;
            }
        }
        if !itinerary.is_complete(self.oracle.venues().len()) {
            warn!("persisted best itinerary is incomplete, ignoring");
            return;
        }

        let length = self.oracle.trip_length(&itinerary);
        if length != record.length {
            warn!(
                recorded = record.length,
                length, "persisted best length differs from recomputed length"
            );
        }
        info!(length, "loaded best itinerary");
        let days = self.oracle.elapsed_days(&itinerary);
        self.best = Some(Solution {
            itinerary,
            length,
            days,
        });
    }

    fn save_paths(&self) {
        if let Some(state) = self.state
            && let Err(e) =
                state.save_paths(self.oracle.epoch().first_day(), self.memo.path_records())
        {
            error!(error = %e, "failed to write shortest-path table");
        }
    }

    fn save_dead_ends(&self) {
        if let Some(state) = self.state
            && let Err(e) =
                state.save_dead_ends(self.oracle.epoch().first_day(), self.memo.dead_end_records())
        {
            error!(error = %e, "failed to write dead-end table");
        }
    }

    fn save_best(&self, solution: &Solution) {
        let Some(state) = self.state else {
            return;
        };
        let record = BestRecord {
            length: solution.length,
            events: solution.ids(),
        };
        if let Err(e) = state.save_best(&record) {
            error!(error = %e, "failed to write best itinerary");
        }
    }

    /// One-line summary: length, then one token per day (a venue, a
    /// bracketed double-header, or `drive`), then stops and elapsed days.
    fn describe(&self, partial: &Itinerary) -> String {
        let venues = self.oracle.venues();
        let mut out = format!("{:<6}", self.oracle.trip_length(partial));
        let (Some(first), Some(last)) = (partial.first(), partial.last()) else {
            return out;
        };

        let stops = partial.stops();
        let mut i = 0;
        for day in first.day()..=last.day() {
            let today: Vec<_> = stops[i..].iter().take_while(|s| s.day() == day).collect();
            match today.as_slice() {
                [] => out.push_str("drive "),
                [one] => {
                    out.push_str(venues.code(one.venue()).as_str());
                    out.push(' ');
                }
                many => {
                    let codes: Vec<_> = many.iter().map(|s| venues.code(s.venue())).collect();
                    let joined: Vec<_> = codes.iter().map(|c| c.as_str()).collect();
                    out.push('(');
                    out.push_str(&joined.join(" "));
                    out.push_str(") ");
                }
            }
            i += today.len();
        }
        out.push_str(&format!(
            "{} in {}",
            partial.len(),
            self.oracle.elapsed_days(partial)
        ));
        out
    }
}

fn describe_ids(partial: &Itinerary) -> String {
    let ids: Vec<_> = partial.ids().map(|id| id.to_string()).collect();
    format!("[{}]", ids.join(", "))
}
