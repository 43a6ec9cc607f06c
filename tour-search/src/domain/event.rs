//! Scheduled events.
//!
//! An event is an immutable (venue, start time) pair. Attending an event is
//! the only way to visit its venue. Start times are naive timestamps in a
//! single reference time zone.

use std::cmp::Ordering;
use std::fmt;

use chrono::{Datelike, NaiveDateTime};
use serde::{Deserialize, Serialize};

use super::{Venue, VenueTable};

/// Position of an event in the master schedule.
///
/// The schedule is ordered chronologically, so comparing ids compares
/// start times.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EventId(pub u32);

impl EventId {
    pub fn index(self) -> usize {
        self.0 as usize
    }

    /// The id immediately after this one.
    pub fn next(self) -> Self {
        Self(self.0 + 1)
    }
}

impl fmt::Debug for EventId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "EventId({})", self.0)
    }
}

impl fmt::Display for EventId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// A scheduled event at a venue.
///
/// Equality and ordering are by (start time, venue).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Event {
    venue: Venue,
    start: NaiveDateTime,
}

impl Event {
    pub fn new(venue: Venue, start: NaiveDateTime) -> Self {
        Self { venue, start }
    }

    pub fn venue(&self) -> Venue {
        self.venue
    }

    pub fn start(&self) -> NaiveDateTime {
        self.start
    }

    /// Calendar day key used throughout pruning.
    ///
    /// Counts days from the common era rather than the day of the year so
    /// schedules that span New Year keep a monotonic key.
    pub fn day(&self) -> i32 {
        self.start.date().num_days_from_ce()
    }

    /// Day of the year (1-366), for display.
    pub fn day_of_year(&self) -> u32 {
        self.start.ordinal()
    }

    /// Driving minutes from this event's venue to `other`'s venue.
    pub fn minutes_to(&self, other: &Event, venues: &VenueTable) -> u32 {
        venues.minutes_between(self.venue, other.venue)
    }

    /// Minutes from this event's start to `other`'s start. Negative if
    /// `other` starts first.
    pub fn minutes_until(&self, other: &Event) -> i64 {
        other.start.signed_duration_since(self.start).num_minutes()
    }

    /// Format with the venue code resolved, e.g. `BAL 4/02 19:05`.
    pub fn display<'a>(&'a self, venues: &'a VenueTable) -> impl fmt::Display + 'a {
        EventDisplay {
            event: self,
            venues,
        }
    }
}

impl Ord for Event {
    fn cmp(&self, other: &Self) -> Ordering {
        self.start
            .cmp(&other.start)
            .then_with(|| self.venue.cmp(&other.venue))
    }
}

impl PartialOrd for Event {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

struct EventDisplay<'a> {
    event: &'a Event,
    venues: &'a VenueTable,
}

impl fmt::Display for EventDisplay<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {}",
            self.venues.code(self.event.venue),
            self.event.start.format("%-m/%d %H:%M")
        )
    }
}
