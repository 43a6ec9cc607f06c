//! The venue table.
//!
//! Venues are fixed locations that must each be visited exactly once. The
//! table holds the asymmetric driving-time matrix, the fly-compatibility
//! matrix and optional time-zone offsets. It is immutable once built.

use std::collections::HashMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use super::{VenueCode, VenueSet, VenueTableError, venue_set::MAX_VENUES};

/// A venue, identified by its bit index in the [`VenueTable`].
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Venue(u8);

impl Venue {
    /// Create a venue from its bit index.
    pub const fn new(index: u8) -> Self {
        Self(index)
    }

    /// The bit index of this venue, in `0..table.len()`.
    pub const fn index(self) -> usize {
        self.0 as usize
    }

    /// A `u64` with only this venue's bit set.
    pub const fn mask(self) -> u64 {
        1u64 << self.0
    }
}

impl fmt::Debug for Venue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Venue({})", self.0)
    }
}

/// Static venue data: codes, drive times, fly compatibility, time zones.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VenueTable {
    codes: Vec<VenueCode>,
    /// Hours behind the reference time zone, if known.
    tz_offsets: Vec<Option<i8>>,
    /// Row-major `len * len` driving minutes.
    minutes: Vec<u32>,
    /// Row-major `len * len` fly compatibility.
    fly: Vec<bool>,
    by_code: HashMap<VenueCode, Venue>,
}

impl VenueTable {
    /// Number of venues.
    pub fn len(&self) -> usize {
        self.codes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.codes.is_empty()
    }

    /// All venues in bit-index order.
    pub fn venues(&self) -> impl Iterator<Item = Venue> + '_ {
        (0..self.codes.len()).map(|i| Venue::new(i as u8))
    }

    /// The set of every venue in the table.
    pub fn all(&self) -> VenueSet {
        VenueSet::first_n(self.len())
    }

    /// Look up a venue by code.
    pub fn lookup(&self, code: &str) -> Option<Venue> {
        let code = VenueCode::parse(code).ok()?;
        self.by_code.get(&code).copied()
    }

    pub fn code(&self, venue: Venue) -> VenueCode {
        self.codes[venue.index()]
    }

    /// Bit index of a venue, in `0..len()`.
    pub fn bit_index(&self, venue: Venue) -> usize {
        venue.index()
    }

    /// Driving minutes from `from` to `to`. Not necessarily symmetric.
    pub fn minutes_between(&self, from: Venue, to: Venue) -> u32 {
        self.minutes[from.index() * self.len() + to.index()]
    }

    /// Whether a same-day double-header between the two venues is possible
    /// by flying.
    pub fn can_fly_between(&self, from: Venue, to: Venue) -> bool {
        self.fly[from.index() * self.len() + to.index()]
    }

    /// Hours behind the reference time zone, if known.
    pub fn tz_offset(&self, venue: Venue) -> Option<i8> {
        self.tz_offsets[venue.index()]
    }
}

/// Builder for a [`VenueTable`].
///
/// Validation errors are deferred to [`build`](Self::build) so the builder
/// can be used fluently.
///
/// # Examples
///
/// ```
/// use tour_search::domain::VenueTableBuilder;
///
/// let table = VenueTableBuilder::new()
///     .venue("AAA", None)
///     .venue("BBB", None)
///     .drive_both("AAA", "BBB", 60)
///     .build()
///     .unwrap();
///
/// let a = table.lookup("AAA").unwrap();
/// let b = table.lookup("BBB").unwrap();
/// assert_eq!(table.minutes_between(a, b), 60);
/// assert!(!table.can_fly_between(a, b));
/// ```
#[derive(Debug, Default)]
pub struct VenueTableBuilder {
    codes: Vec<VenueCode>,
    tz_offsets: Vec<Option<i8>>,
    drives: Vec<(VenueCode, VenueCode, u32)>,
    flights: Vec<(VenueCode, VenueCode)>,
    minutes_rows: Option<Vec<Vec<u32>>>,
    fly_rows: Option<Vec<Vec<bool>>>,
    error: Option<VenueTableError>,
}

impl VenueTableBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register the next venue. Venues receive bit indices in
    /// registration order.
    pub fn venue(mut self, code: &str, tz_offset: Option<i8>) -> Self {
        match VenueCode::parse(code) {
            Ok(code) => {
                self.codes.push(code);
                self.tz_offsets.push(tz_offset);
            }
            Err(e) => self.fail(e.into()),
        }
        self
    }

    /// Set a one-way drive time.
    pub fn drive(mut self, from: &str, to: &str, minutes: u32) -> Self {
        match (VenueCode::parse(from), VenueCode::parse(to)) {
            (Ok(from), Ok(to)) => self.drives.push((from, to, minutes)),
            (Err(e), _) | (_, Err(e)) => self.fail(e.into()),
        }
        self
    }

    /// Set the same drive time in both directions.
    pub fn drive_both(self, a: &str, b: &str, minutes: u32) -> Self {
        self.drive(a, b, minutes).drive(b, a, minutes)
    }

    /// Mark a pair of venues as fly-compatible in both directions.
    pub fn fly_both(mut self, a: &str, b: &str) -> Self {
        match (VenueCode::parse(a), VenueCode::parse(b)) {
            (Ok(a), Ok(b)) => {
                self.flights.push((a, b));
                self.flights.push((b, a));
            }
            (Err(e), _) | (_, Err(e)) => self.fail(e.into()),
        }
        self
    }

    /// Supply the full drive matrix, rows and columns in registration order.
    pub fn minutes_matrix(mut self, rows: Vec<Vec<u32>>) -> Self {
        self.minutes_rows = Some(rows);
        self
    }

    /// Supply the full fly matrix, rows and columns in registration order.
    pub fn fly_matrix(mut self, rows: Vec<Vec<bool>>) -> Self {
        self.fly_rows = Some(rows);
        self
    }

    fn fail(&mut self, err: VenueTableError) {
        if self.error.is_none() {
            self.error = Some(err);
        }
    }

    /// Validate and build the table.
    pub fn build(self) -> Result<VenueTable, VenueTableError> {
        if let Some(err) = self.error {
            return Err(err);
        }
        let n = self.codes.len();
        if n == 0 {
            return Err(VenueTableError::Empty);
        }
        if n > MAX_VENUES {
            return Err(VenueTableError::TooManyVenues(n));
        }

        let mut by_code = HashMap::with_capacity(n);
        for (i, code) in self.codes.iter().enumerate() {
            if by_code.insert(*code, Venue::new(i as u8)).is_some() {
                return Err(VenueTableError::DuplicateVenue(*code));
            }
        }
        let index_of = |code: &VenueCode| {
            by_code
                .get(code)
                .map(|v| v.index())
                .ok_or(VenueTableError::UnknownVenue(*code))
        };

        // Drive matrix: either supplied whole or assembled pair by pair.
        let mut minutes: Vec<Option<u32>> = vec![None; n * n];
        if let Some(rows) = &self.minutes_rows {
            if rows.len() != n || rows.iter().any(|r| r.len() != n) {
                return Err(VenueTableError::MatrixShape {
                    matrix: "drive",
                    expected: n,
                });
            }
            for (i, row) in rows.iter().enumerate() {
                for (j, &m) in row.iter().enumerate() {
                    minutes[i * n + j] = Some(m);
                }
            }
        }
        for (from, to, m) in &self.drives {
            minutes[index_of(from)? * n + index_of(to)?] = Some(*m);
        }
        for i in 0..n {
            match minutes[i * n + i] {
                None => minutes[i * n + i] = Some(0),
                Some(0) => {}
                Some(_) => return Err(VenueTableError::NonZeroDiagonal(self.codes[i])),
            }
        }
        let minutes = minutes
            .into_iter()
            .enumerate()
            .map(|(k, m)| {
                m.ok_or(VenueTableError::MissingDriveTime(
                    self.codes[k / n],
                    self.codes[k % n],
                ))
            })
            .collect::<Result<Vec<_>, _>>()?;

        let mut fly = vec![false; n * n];
        if let Some(rows) = &self.fly_rows {
            if rows.len() != n || rows.iter().any(|r| r.len() != n) {
                return Err(VenueTableError::MatrixShape {
                    matrix: "fly",
                    expected: n,
                });
            }
            for (i, row) in rows.iter().enumerate() {
                fly[i * n..(i + 1) * n].copy_from_slice(row);
            }
        }
        for (a, b) in &self.flights {
            fly[index_of(a)? * n + index_of(b)?] = true;
        }

        Ok(VenueTable {
            codes: self.codes,
            tz_offsets: self.tz_offsets,
            minutes,
            fly,
            by_code,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn toy() -> VenueTable {
        VenueTableBuilder::new()
            .venue("AAA", Some(0))
            .venue("BBB", Some(1))
            .venue("CCC", None)
            .drive_both("AAA", "BBB", 60)
            .drive_both("BBB", "CCC", 60)
            .drive("AAA", "CCC", 200)
            .drive("CCC", "AAA", 210)
            .fly_both("AAA", "CCC")
            .build()
            .unwrap()
    }

    #[test]
    fn lookups() {
        let table = toy();
        let a = table.lookup("AAA").unwrap();
        let c = table.lookup("CCC").unwrap();

        assert_eq!(table.len(), 3);
        assert_eq!(table.bit_index(c), 2);
        assert_eq!(table.code(a).as_str(), "AAA");
        assert_eq!(table.minutes_between(a, c), 200);
        assert_eq!(table.minutes_between(c, a), 210);
        assert_eq!(table.minutes_between(a, a), 0);
        assert!(table.can_fly_between(a, c));
        assert!(table.can_fly_between(c, a));
        assert_eq!(table.tz_offset(a), Some(0));
        assert_eq!(table.tz_offset(c), None);
        assert!(table.lookup("ZZZ").is_none());
        assert!(table.lookup("aaa").is_none());
        assert_eq!(table.all().len(), 3);
    }

    #[test]
    fn missing_drive_time_rejected() {
        let err = VenueTableBuilder::new()
            .venue("AAA", None)
            .venue("BBB", None)
            .drive("AAA", "BBB", 10)
            .build()
            .unwrap_err();
        assert!(matches!(err, VenueTableError::MissingDriveTime(_, _)));
    }

    #[test]
    fn duplicate_venue_rejected() {
        let err = VenueTableBuilder::new()
            .venue("AAA", None)
            .venue("AAA", None)
            .build()
            .unwrap_err();
        assert!(matches!(err, VenueTableError::DuplicateVenue(_)));
    }

    #[test]
    fn unknown_venue_rejected() {
        let err = VenueTableBuilder::new()
            .venue("AAA", None)
            .drive("AAA", "QQQ", 5)
            .build()
            .unwrap_err();
        assert!(matches!(err, VenueTableError::UnknownVenue(_)));
    }

    #[test]
    fn invalid_code_rejected() {
        let err = VenueTableBuilder::new().venue("aa", None).build().unwrap_err();
        assert!(matches!(err, VenueTableError::InvalidCode(_)));
    }

    #[test]
    fn empty_rejected() {
        assert_eq!(
            VenueTableBuilder::new().build().unwrap_err(),
            VenueTableError::Empty
        );
    }

    #[test]
    fn matrix_shape_checked() {
        let err = VenueTableBuilder::new()
            .venue("AAA", None)
            .venue("BBB", None)
            .minutes_matrix(vec![vec![0, 1]])
            .build()
            .unwrap_err();
        assert!(matches!(err, VenueTableError::MatrixShape { .. }));
    }

    #[test]
    fn non_zero_diagonal_rejected() {
        let err = VenueTableBuilder::new()
            .venue("AAA", None)
            .minutes_matrix(vec![vec![5]])
            .build()
            .unwrap_err();
        assert!(matches!(err, VenueTableError::NonZeroDiagonal(_)));
    }
}
