//! Search state persisted between runs.
//!
//! The dead-end table, the shortest-path table and the best itinerary found
//! so far are written as JSON files so that a later run can resume pruning
//! where an earlier one stopped.

mod error;
mod files;

pub use error::StateError;
pub use files::{BestRecord, Fingerprint, StateConfig, StateFiles};
