//! Domain types for the venue tour search.
//!
//! This module contains the core domain model types: venues, events, the
//! master schedule and partial itineraries. All types enforce their
//! invariants at construction time, so code that receives these types can
//! trust their validity.

mod error;
mod event;
mod itinerary;
mod reach;
mod schedule;
mod venue;
mod venue_code;
mod venue_set;

pub use error::{ScheduleError, VenueTableError};
pub use event::{Event, EventId};
pub use itinerary::{Itinerary, Stop};
pub use reach::{FLY_MIN_GAP_MINUTES, GAME_MINUTES, LongHaulRule, ReachRules};
pub use schedule::{Schedule, TIMESTAMP_FORMAT, TimeBasis};
pub use venue::{Venue, VenueTable, VenueTableBuilder};
pub use venue_code::{InvalidVenueCode, VenueCode};
pub use venue_set::{MAX_VENUES, VenueSet};
