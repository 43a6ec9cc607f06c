//! Memoization of search states.
//!
//! Two tables keyed by the last event of a partial itinerary:
//!
//! - dead ends: visited sets from which no extension ever reached a complete
//!   itinerary.
//! - shortest paths: for each visited set, the shortest trip length seen for
//!   a partial itinerary ending at that event.
//!
//! A candidate state `(last, mask, length)` is pruned if a recorded dead end
//! for `last` is a subset of `mask`, or if a recorded path for `last` has a
//! subset of `mask` with a length no greater than the candidate's.

use std::collections::{HashMap, HashSet};

use serde::{Deserialize, Serialize};

use crate::domain::{EventId, VenueSet};

/// A dead-end state as persisted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct DeadEndRecord {
    pub last: EventId,
    pub visited: VenueSet,
}

/// A shortest-path state as persisted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct PathRecord {
    pub last: EventId,
    pub visited: VenueSet,
    pub length: u32,
}

/// In-memory dead-end and shortest-path tables.
#[derive(Debug, Clone, Default)]
pub struct MemoStore {
    dead_ends: HashMap<EventId, HashSet<VenueSet>>,
    shortest: HashMap<EventId, HashMap<VenueSet, u32>>,
}

impl MemoStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether some recorded dead end for `last` is contained in `visited`.
    pub fn is_dead_end(&self, last: EventId, visited: VenueSet) -> bool {
        self.dead_ends
            .get(&last)
            .is_some_and(|masks| masks.iter().any(|m| m.is_subset_of(visited)))
    }

    /// Record that no completion exists from `(last, visited)`.
    pub fn record_dead_end(&mut self, last: EventId, visited: VenueSet) -> bool {
        self.dead_ends.entry(last).or_default().insert(visited)
    }

    /// The recorded length for exactly `(last, visited)`, if any.
    pub fn best_known_length(&self, last: EventId, visited: VenueSet) -> Option<u32> {
        self.shortest.get(&last)?.get(&visited).copied()
    }

    /// Record a length for `(last, visited)`, keeping the minimum.
    pub fn record_length(&mut self, last: EventId, visited: VenueSet, length: u32) {
        self.shortest
            .entry(last)
            .or_default()
            .entry(visited)
            .and_modify(|l| *l = (*l).min(length))
            .or_insert(length);
    }

    /// Whether a recorded path dominates `(last, visited, length)`.
    pub fn is_dominated(&self, last: EventId, visited: VenueSet, length: u32) -> bool {
        self.shortest.get(&last).is_some_and(|paths| {
            paths
                .iter()
                .any(|(mask, &known)| known <= length && mask.is_subset_of(visited))
        })
    }

    pub fn clear(&mut self) {
        self.dead_ends.clear();
        self.shortest.clear();
    }

    /// Number of recorded dead-end states.
    pub fn dead_end_count(&self) -> usize {
        self.dead_ends.values().map(HashSet::len).sum()
    }

    /// Number of recorded shortest-path states.
    pub fn path_count(&self) -> usize {
        self.shortest.values().map(HashMap::len).sum()
    }

    /// All dead ends, sorted.
    pub fn dead_end_records(&self) -> Vec<DeadEndRecord> {
        let mut records: Vec<_> = self
            .dead_ends
            .iter()
            .flat_map(|(&last, masks)| {
                masks.iter().map(move |&visited| DeadEndRecord { last, visited })
            })
            .collect();
        records.sort();
        records
    }

    /// All shortest-path entries, sorted.
    pub fn path_records(&self) -> Vec<PathRecord> {
        let mut records: Vec<_> = self
            .shortest
            .iter()
            .flat_map(|(&last, paths)| {
                paths.iter().map(move |(&visited, &length)| PathRecord {
                    last,
                    visited,
                    length,
                })
            })
            .collect();
        records.sort();
        records
    }

    pub fn load_dead_ends(&mut self, records: impl IntoIterator<Item = DeadEndRecord>) {
        for r in records {
            self.record_dead_end(r.last, r.visited);
        }
    }

    pub fn load_paths(&mut self, records: impl IntoIterator<Item = PathRecord>) {
        for r in records {
            self.record_length(r.last, r.visited, r.length);
        }
    }
}


#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        /// A recorded dead end prunes exactly its supersets.
        #[test]
        fn dead_end_prunes_supersets(recorded in 0u64..1024, candidate in 0u64..1024) {
            let mut memo = MemoStore::new();
            memo.record_dead_end(EventId(0), VenueSet::from_bits(recorded));
            let pruned = memo.is_dead_end(EventId(0), VenueSet::from_bits(candidate));
            prop_assert_eq!(pruned, recorded & candidate == recorded);
        }

        /// Recording more lengths never un-dominates a state.
        #[test]
        fn dominance_is_monotone(
            entries in proptest::collection::vec((0u64..64, 0u32..500), 1..8),
            candidate in 0u64..64,
            length in 0u32..500,
        ) {
            let mut memo = MemoStore::new();
            let mut dominated = false;
            for (bits, len) in entries {
                memo.record_length(EventId(1), VenueSet::from_bits(bits), len);
                let now = memo.is_dominated(EventId(1), VenueSet::from_bits(candidate), length);
                prop_assert!(now || !dominated);
                dominated = now;
            }
        }
    }
}
