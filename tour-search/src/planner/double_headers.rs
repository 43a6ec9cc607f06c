//! Double-header candidates and the maximum compatible set.
//!
//! A double-header is two events at different venues on the same day where
//! the second can be reached from the first. The bound the oracle needs is
//! the size of the largest set of candidates that are pairwise disjoint in
//! venue and pairwise distinct in day. The candidate set is small, so the
//! answer is found by enumerating subsets. Subsets are built one day at a
//! time (at most one pair per day) and abandoned as soon as they can no
//! longer beat the best count found.

use crate::domain::{Stop, VenueSet};

/// Two same-day events that can both be attended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DoubleHeader {
    pub first: Stop,
    pub second: Stop,
}

impl DoubleHeader {
    pub fn new(first: Stop, second: Stop) -> Self {
        Self { first, second }
    }

    pub fn day(&self) -> i32 {
        self.first.day()
    }

    /// The two venues of the pair.
    pub fn venues(&self) -> VenueSet {
        VenueSet::empty()
            .with(self.first.venue())
            .with(self.second.venue())
    }
}

/// Size of the largest subset of `pairs` whose members are pairwise
/// disjoint in venue and pairwise distinct in day.
pub fn max_compatible(pairs: &[(i32, VenueSet)]) -> usize {
    if pairs.is_empty() {
        return 0;
    }

    let mut sorted = pairs.to_vec();
    sorted.sort_by_key(|(day, set)| (*day, set.bits()));

    let mut days: Vec<Vec<VenueSet>> = Vec::new();
    let mut current_day = None;
    for (day, set) in sorted {
        if current_day != Some(day) {
            days.push(Vec::new());
            current_day = Some(day);
        }
        if let Some(group) = days.last_mut() {
            group.push(set);
        }
    }

    let mut best = 0;
    enumerate(&days, 0, VenueSet::empty(), 0, &mut best);
    best
}

fn enumerate(days: &[Vec<VenueSet>], day: usize, used: VenueSet, count: usize, best: &mut usize) {
    if count > *best {
        *best = count;
    }
    // Even taking one pair on every remaining day cannot improve.
    if count + (days.len() - day) <= *best {
        return;
    }

    let group = &days[day];
    for set in group {
        if set.is_disjoint(used) {
            enumerate(days, day + 1, used.union(*set), count + 1, best);
        }
    }
    enumerate(days, day + 1, used, count, best);
}


#[cfg(test)]
mod proptests {
    use super::*;
    use crate::domain::Venue;
    use proptest::prelude::*;

    /// Plain power-set enumeration, for comparison.
    fn brute_force(pairs: &[(i32, VenueSet)]) -> usize {
        let n = pairs.len();
        let mut best = 0;
        for subset in 0u32..(1 << n) {
            let mut days = Vec::new();
            let mut used = VenueSet::empty();
            let mut ok = true;
            for (i, (day, set)) in pairs.iter().enumerate() {
                if subset & (1 << i) == 0 {
                    continue;
                }
                if days.contains(day) || !set.is_disjoint(used) {
                    ok = false;
                    break;
                }
                days.push(*day);
                used = used.union(*set);
            }
            if ok {
                best = best.max(subset.count_ones() as usize);
            }
        }
        best
    }

    fn arb_pair() -> impl Strategy<Value = (i32, VenueSet)> {
        (0i32..5, 0u8..8, 0u8..8)
            .prop_filter("distinct venues", |(_, a, b)| a != b)
            .prop_map(|(day, a, b)| {
                (day, VenueSet::empty().with(Venue::new(a)).with(Venue::new(b)))
            })
    }

    proptest! {
        #[test]
        fn matches_power_set(pairs in proptest::collection::vec(arb_pair(), 0..11)) {
            prop_assert_eq!(max_compatible(&pairs), brute_force(&pairs));
        }

        #[test]
        fn idempotent(pairs in proptest::collection::vec(arb_pair(), 0..11)) {
            prop_assert_eq!(max_compatible(&pairs), max_compatible(&pairs));
        }
    }
}
