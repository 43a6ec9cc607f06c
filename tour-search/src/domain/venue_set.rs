//! Visited-set bitmasks.
//!
//! Bit `k` of a [`VenueSet`] is set iff the venue with bit index `k` is in
//! the set. The mask is the deduplication key used by the memoization store,
//! so its encoding must stay stable across runs.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::Venue;

/// Maximum number of venues a [`VenueSet`] can hold.
pub const MAX_VENUES: usize = 64;

/// A set of venues represented as a bitmask.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct VenueSet(u64);

impl VenueSet {
    /// The empty set.
    pub const fn empty() -> Self {
        Self(0)
    }

    /// The set containing venues `0..count`.
    pub fn first_n(count: usize) -> Self {
        if count >= MAX_VENUES {
            Self(u64::MAX)
        } else {
            Self((1u64 << count) - 1)
        }
    }

    /// Create a set from raw bits.
    pub const fn from_bits(bits: u64) -> Self {
        Self(bits)
    }

    /// Returns the raw bits.
    pub const fn bits(self) -> u64 {
        self.0
    }

    /// Check if the set contains a venue.
    pub fn contains(self, venue: Venue) -> bool {
        self.0 & venue.mask() != 0
    }

    /// Insert a venue. Returns `false` if it was already present.
    pub fn insert(&mut self, venue: Venue) -> bool {
        let present = self.contains(venue);
        self.0 |= venue.mask();
        !present
    }

    /// Remove a venue. Returns `false` if it was not present.
    pub fn remove(&mut self, venue: Venue) -> bool {
        let present = self.contains(venue);
        self.0 &= !venue.mask();
        present
    }

    /// Returns a copy of this set with `venue` added.
    pub fn with(self, venue: Venue) -> Self {
        Self(self.0 | venue.mask())
    }

    /// Number of venues in the set.
    pub fn len(self) -> usize {
        self.0.count_ones() as usize
    }

    pub fn is_empty(self) -> bool {
        self.0 == 0
    }

    /// `true` if every venue of `self` is also in `other`.
    ///
    /// Equivalent to `self & other == self`.
    pub fn is_subset_of(self, other: Self) -> bool {
        self.0 & other.0 == self.0
    }

    pub fn is_disjoint(self, other: Self) -> bool {
        self.0 & other.0 == 0
    }

    pub fn union(self, other: Self) -> Self {
        Self(self.0 | other.0)
    }

    /// Venues in `self` but not in `other`.
    pub fn difference(self, other: Self) -> Self {
        Self(self.0 & !other.0)
    }

    /// Iterate over the venues in ascending bit order.
    pub fn iter(self) -> impl Iterator<Item = Venue> {
        let mut bits = self.0;
        std::iter::from_fn(move || {
            if bits == 0 {
                return None;
            }
            let index = bits.trailing_zeros();
            bits &= bits - 1;
            Some(Venue::new(index as u8))
        })
    }
}

impl FromIterator<Venue> for VenueSet {
    fn from_iter<I: IntoIterator<Item = Venue>>(iter: I) -> Self {
        let mut set = Self::empty();
        for venue in iter {
            set.insert(venue);
        }
        set
    }
}

impl fmt::Debug for VenueSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "VenueSet({:#b})", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn v(i: u8) -> Venue {
        Venue::new(i)
    }

    #[test]
    fn insert_and_contains() {
        let mut set = VenueSet::empty();
        assert!(set.is_empty());
        assert!(set.insert(v(3)));
        assert!(!set.insert(v(3)));
        assert!(set.contains(v(3)));
        assert!(!set.contains(v(2)));
        assert_eq!(set.len(), 1);
        assert_eq!(set.bits(), 0b1000);
    }

    #[test]
    fn remove() {
        let mut set: VenueSet = [v(0), v(5)].into_iter().collect();
        assert!(set.remove(v(0)));
        assert!(!set.remove(v(0)));
        assert_eq!(set.iter().collect::<Vec<_>>(), vec![v(5)]);
    }

    #[test]
    fn subset_relation() {
        let small: VenueSet = [v(1), v(4)].into_iter().collect();
        let large: VenueSet = [v(1), v(2), v(4)].into_iter().collect();
        assert!(small.is_subset_of(large));
        assert!(!large.is_subset_of(small));
        assert!(small.is_subset_of(small));
        assert!(VenueSet::empty().is_subset_of(small));
    }

    #[test]
    fn first_n() {
        assert_eq!(VenueSet::first_n(0), VenueSet::empty());
        assert_eq!(VenueSet::first_n(3).bits(), 0b111);
        assert_eq!(VenueSet::first_n(30).len(), 30);
        assert_eq!(VenueSet::first_n(64).len(), 64);
    }

    #[test]
    fn iter_in_bit_order() {
        let set: VenueSet = [v(29), v(0), v(7)].into_iter().collect();
        assert_eq!(set.iter().collect::<Vec<_>>(), vec![v(0), v(7), v(29)]);
    }

    #[test]
    fn serde_as_integer() {
        let set = VenueSet::from_bits(0b1010);
        assert_eq!(serde_json::to_string(&set).unwrap(), "10");
        let back: VenueSet = serde_json::from_str("10").unwrap();
        assert_eq!(back, set);
    }
}
