//! Ballpark tour planner.
//!
//! Searches for the shortest itinerary that attends one event at every venue
//! within a fixed number of days: "can I see a game in all 30 ballparks in
//! 24 days, and what is the least driving that takes?"

pub mod ballparks;
pub mod cli;
pub mod domain;
pub mod planner;
pub mod state;
