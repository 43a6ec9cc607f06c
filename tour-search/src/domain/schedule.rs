//! The master schedule.
//!
//! An immutable, chronologically ordered list of events with O(1) access by
//! [`EventId`]. The memoization caches key on event positions, so the order
//! must be stable: it is validated on load and never changes afterwards.

use std::path::Path;

use chrono::{Duration, NaiveDateTime};

use super::{Event, EventId, ScheduleError, VenueTable};

/// Timestamp format of the schedule file, e.g. `04/02/2024 19:05`.
pub const TIMESTAMP_FORMAT: &str = "%m/%d/%Y %H:%M";

/// How the timestamps in a schedule file are expressed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TimeBasis {
    /// Already in the reference time zone and sorted.
    #[default]
    Reference,

    /// Local to each venue. Rows are shifted by the venue's time-zone offset
    /// and re-sorted.
    Local,
}

/// The master event list.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Schedule {
    events: Vec<Event>,
}

impl Schedule {
    /// Build a schedule from events already in chronological order.
    pub fn from_events(events: Vec<Event>) -> Result<Self, ScheduleError> {
        if let Some(pos) = events.windows(2).position(|w| w[1] < w[0]) {
            return Err(ScheduleError::OutOfOrder { line: pos + 2 });
        }
        Ok(Self { events })
    }

    /// Parse headerless `<timestamp>,<venue-code>` rows.
    ///
    /// Blank lines are skipped. Line numbers in errors are 1-based.
    pub fn parse_csv(
        text: &str,
        venues: &VenueTable,
        basis: TimeBasis,
    ) -> Result<Self, ScheduleError> {
        let mut reader = csv::ReaderBuilder::new()
            .has_headers(false)
            .flexible(true)
            .trim(csv::Trim::All)
            .from_reader(text.as_bytes());
        let mut events = Vec::new();

        for result in reader.records() {
            let record = result.map_err(|source| ScheduleError::Csv {
                line: source.position().map_or(0, |p| p.line() as usize),
                source,
            })?;
            let line = record.position().map_or(0, |p| p.line() as usize);
            if record.iter().all(str::is_empty) {
                continue;
            }

            let malformed = || ScheduleError::MalformedRow {
                line,
                row: record.iter().collect::<Vec<_>>().join(","),
            };
            if record.len() != 2 {
                return Err(malformed());
            }
            let (stamp, code): (String, String) =
                record.deserialize(None).map_err(|_| malformed())?;

            let start = NaiveDateTime::parse_from_str(&stamp, TIMESTAMP_FORMAT)
                .map_err(|_| ScheduleError::InvalidTimestamp { line, value: stamp })?;
            let venue = venues
                .lookup(&code)
                .ok_or(ScheduleError::UnknownVenue { line, value: code })?;

            let start = match basis {
                TimeBasis::Reference => start,
                TimeBasis::Local => {
                    let offset = venues.tz_offset(venue).unwrap_or(0);
                    start + Duration::hours(i64::from(offset))
                }
            };
            let event = Event::new(venue, start);

            if basis == TimeBasis::Reference
                && let Some(prev) = events.last()
                && event < *prev
            {
                return Err(ScheduleError::OutOfOrder { line });
            }
            events.push(event);
        }

        if basis == TimeBasis::Local {
            events.sort();
        }

        Ok(Self { events })
    }

    /// Read and parse a schedule file.
    pub fn load(
        path: impl AsRef<Path>,
        venues: &VenueTable,
        basis: TimeBasis,
    ) -> Result<Self, ScheduleError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| ScheduleError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::parse_csv(&text, venues, basis)
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    /// The event at `id`.
    ///
    /// # Panics
    ///
    /// Panics if `id` is out of bounds. Ids handed out by the schedule are
    /// always valid, so this indicates a corrupted index.
    pub fn get(&self, id: EventId) -> &Event {
        match self.events.get(id.index()) {
            Some(event) => event,
            None => panic!(
                "event index {} out of bounds for schedule of {}",
                id.0,
                self.events.len()
            ),
        }
    }

    /// The event at `id`, or `None` if out of bounds.
    pub fn try_get(&self, id: EventId) -> Option<&Event> {
        self.events.get(id.index())
    }

    /// Whether `id` refers to an event in this schedule.
    pub fn contains(&self, id: EventId) -> bool {
        id.index() < self.events.len()
    }

    /// Events from `from` (inclusive) to the end, with their ids.
    pub fn iter_from(&self, from: EventId) -> impl Iterator<Item = (EventId, &Event)> {
        self.events
            .iter()
            .enumerate()
            .skip(from.index())
            .map(|(i, e)| (EventId(i as u32), e))
    }

    /// All events with their ids.
    pub fn iter(&self) -> impl Iterator<Item = (EventId, &Event)> {
        self.iter_from(EventId(0))
    }
}
