//! Tour planner using depth-first backtracking.
//!
//! This module implements the search that answers: "what is the shortest
//! itinerary attending one event at every venue within the day budget?"
//!
//! The search extends partial itineraries in schedule order. Each candidate
//! is checked against the feasibility oracle (day budget, double-header
//! bound, venue deadlines) and the memo tables (dead ends, shortest paths)
//! before it is extended further.

mod config;
mod double_headers;
mod memo;
mod oracle;
mod progress;
mod search;


pub use config::{HomeBase, SearchConfig};
pub use double_headers::{DoubleHeader, max_compatible};
pub use memo::{DeadEndRecord, MemoStore, PathRecord};
pub use oracle::{Epoch, Oracle};
pub use progress::{DEFAULT_DECAY_INTERVAL, Gauge};
pub use search::{PruneReason, Search, SearchError, SearchOutcome, SearchStats, Solution};
