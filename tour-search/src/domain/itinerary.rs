//! Partial itineraries.
//!
//! An `Itinerary` is an ordered list of attended events with no venue
//! repeated. The visited-set mask is maintained incrementally as stops are
//! pushed and popped, so it always has exactly `len()` bits set.

use super::{Event, EventId, Venue, VenueSet, VenueTable};

/// One attended event: its master-list position and the event itself.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Stop {
    pub id: EventId,
    pub event: Event,
}

impl Stop {
    pub fn new(id: EventId, event: Event) -> Self {
        Self { id, event }
    }

    pub fn venue(&self) -> Venue {
        self.event.venue()
    }

    pub fn day(&self) -> i32 {
        self.event.day()
    }
}

/// A partial (or complete) itinerary.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Itinerary {
    stops: Vec<Stop>,
    visited: VenueSet,
}

impl Itinerary {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            stops: Vec::with_capacity(capacity),
            visited: VenueSet::empty(),
        }
    }

    /// Append a stop. Returns `false`, leaving the itinerary unchanged, if
    /// its venue was already visited.
    pub fn push(&mut self, stop: Stop) -> bool {
        if !self.visited.insert(stop.venue()) {
            return false;
        }
        self.stops.push(stop);
        true
    }

    /// Remove and return the last stop.
    pub fn pop(&mut self) -> Option<Stop> {
        let stop = self.stops.pop()?;
        self.visited.remove(stop.venue());
        Some(stop)
    }

    pub fn len(&self) -> usize {
        self.stops.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stops.is_empty()
    }

    pub fn first(&self) -> Option<&Stop> {
        self.stops.first()
    }

    pub fn last(&self) -> Option<&Stop> {
        self.stops.last()
    }

    pub fn stops(&self) -> &[Stop] {
        &self.stops
    }

    /// Master-list positions of the stops, in order.
    pub fn ids(&self) -> impl Iterator<Item = EventId> + '_ {
        self.stops.iter().map(|s| s.id)
    }

    /// The visited-set bitmask.
    pub fn visited(&self) -> VenueSet {
        self.visited
    }

    pub fn has_visited(&self, venue: Venue) -> bool {
        self.visited.contains(venue)
    }

    /// Whether every venue of a table with `venue_count` venues is visited.
    pub fn is_complete(&self, venue_count: usize) -> bool {
        self.stops.len() == venue_count
    }

    /// Calendar days from the first stop to the last, inclusive.
    pub fn calendar_days(&self) -> i32 {
        match (self.stops.first(), self.stops.last()) {
            (Some(first), Some(last)) => last.day() - first.day() + 1,
            _ => 0,
        }
    }

    /// Days with no event between consecutive stops.
    pub fn rest_days(&self) -> i32 {
        self.stops
            .windows(2)
            .map(|w| (w[1].day() - w[0].day() - 1).max(0))
            .sum()
    }

    /// Consecutive stops on the same calendar day.
    pub fn double_headers(&self) -> i32 {
        self.stops
            .windows(2)
            .filter(|w| w[0].day() == w[1].day())
            .count() as i32
    }

    /// Whether the last two stops form a double-header.
    pub fn ends_with_double_header(&self) -> bool {
        match self.stops.as_slice() {
            [.., a, b] => a.day() == b.day(),
            _ => false,
        }
    }

    /// Sum of driving minutes between consecutive stops.
    pub fn drive_minutes(&self, venues: &VenueTable) -> u32 {
        self.stops
            .windows(2)
            .map(|w| venues.minutes_between(w[0].venue(), w[1].venue()))
            .sum()
    }

    /// The itinerary truncated to its first `len` stops.
    pub fn prefix(&self, len: usize) -> Itinerary {
        let mut prefix = Itinerary::with_capacity(len);
        for stop in self.stops.iter().take(len) {
            prefix.push(*stop);
        }
        prefix
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::VenueTableBuilder;
    use chrono::{NaiveDate, NaiveDateTime};

    fn at(day: u32, hour: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 5, day)
            .unwrap()
            .and_hms_opt(hour, 0, 0)
            .unwrap()
    }

    fn stop(id: u32, venue: u8, day: u32, hour: u32) -> Stop {
        Stop::new(EventId(id), Event::new(Venue::new(venue), at(day, hour)))
    }

    #[test]
    fn push_rejects_repeat_venue() {
        let mut it = Itinerary::new();
        assert!(it.push(stop(0, 0, 1, 13)));
        assert!(it.push(stop(1, 1, 1, 19)));
        assert!(!it.push(stop(2, 0, 2, 19)));
        assert_eq!(it.len(), 2);
        assert_eq!(it.visited().bits(), 0b11);
    }

    #[test]
    fn pop_clears_visited_bit() {
        let mut it = Itinerary::new();
        it.push(stop(0, 4, 1, 13));
        it.push(stop(1, 2, 2, 13));
        let popped = it.pop().unwrap();
        assert_eq!(popped.id, EventId(1));
        assert!(!it.has_visited(Venue::new(2)));
        assert!(it.has_visited(Venue::new(4)));
        it.pop();
        assert!(it.pop().is_none());
        assert!(it.visited().is_empty());
    }

    #[test]
    fn day_counts() {
        let mut it = Itinerary::new();
        it.push(stop(0, 0, 1, 13));
        it.push(stop(1, 1, 1, 19)); // double-header
        it.push(stop(2, 2, 2, 19));
        it.push(stop(3, 3, 5, 19)); // two rest days
        it.push(stop(4, 4, 6, 12));

        assert_eq!(it.calendar_days(), 6);
        assert_eq!(it.double_headers(), 1);
        assert_eq!(it.rest_days(), 2);
        assert!(!it.ends_with_double_header());
        assert_eq!(Itinerary::new().calendar_days(), 0);
    }

    #[test]
    fn drive_minutes_sums_legs() {
        let venues = VenueTableBuilder::new()
            .venue("AAA", None)
            .venue("BBB", None)
            .venue("CCC", None)
            .drive_both("AAA", "BBB", 60)
            .drive_both("BBB", "CCC", 70)
            .drive_both("AAA", "CCC", 200)
            .build()
            .unwrap();
        let mut it = Itinerary::new();
        it.push(stop(0, 0, 1, 13));
        it.push(stop(1, 1, 2, 13));
        it.push(stop(2, 2, 3, 13));
        assert_eq!(it.drive_minutes(&venues), 130);
        assert_eq!(it.prefix(2).drive_minutes(&venues), 60);
    }
}
