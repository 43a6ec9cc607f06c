//! Domain error types.
//!
//! These errors represent configuration and input failures in the domain
//! layer: a malformed venue table or a malformed schedule file. Both are
//! reported before any search begins.

use std::path::PathBuf;

use super::{InvalidVenueCode, VenueCode};

/// Errors raised while assembling a [`VenueTable`](super::VenueTable).
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum VenueTableError {
    /// A venue code failed validation
    #[error(transparent)]
    InvalidCode(#[from] InvalidVenueCode),

    /// The table has no venues
    #[error("venue table is empty")]
    Empty,

    /// More venues than a visited-set bitmask can hold
    #[error("too many venues: {0} (at most 64 supported)")]
    TooManyVenues(usize),

    /// The same code was registered twice
    #[error("duplicate venue {0}")]
    DuplicateVenue(VenueCode),

    /// A drive time or fly entry refers to an unregistered venue
    #[error("unknown venue {0}")]
    UnknownVenue(VenueCode),

    /// A matrix does not have one row and one column per venue
    #[error("{matrix} matrix must be {expected}x{expected}")]
    MatrixShape {
        matrix: &'static str,
        expected: usize,
    },

    /// No drive time was given for a pair of distinct venues
    #[error("no drive time from {0} to {1}")]
    MissingDriveTime(VenueCode, VenueCode),

    /// A venue has a non-zero drive time to itself
    #[error("drive time from {0} to itself must be zero")]
    NonZeroDiagonal(VenueCode),
}

/// Errors raised while loading the master schedule.
#[derive(Debug, thiserror::Error)]
pub enum ScheduleError {
    /// The schedule file could not be read
    #[error("failed to read schedule {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The CSV reader rejected the input
    #[error("line {line}: {source}")]
    Csv {
        line: usize,
        #[source]
        source: csv::Error,
    },

    /// A row does not have the `<timestamp>,<code>` shape
    #[error("line {line}: expected `MM/dd/yyyy HH:mm,CODE`, got {row:?}")]
    MalformedRow { line: usize, row: String },

    /// The timestamp column failed to parse
    #[error("line {line}: invalid timestamp {value:?}")]
    InvalidTimestamp { line: usize, value: String },

    /// The venue column is not a known venue
    #[error("line {line}: unknown venue {value:?}")]
    UnknownVenue { line: usize, value: String },

    /// Rows are not in chronological order
    #[error("line {line}: event starts before the previous row")]
    OutOfOrder { line: usize },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display() {
        let code = VenueCode::parse("BAL").unwrap();
        let other = VenueCode::parse("BOS").unwrap();

        let err = VenueTableError::DuplicateVenue(code);
        assert_eq!(err.to_string(), "duplicate venue BAL");

        let err = VenueTableError::MissingDriveTime(code, other);
        assert_eq!(err.to_string(), "no drive time from BAL to BOS");

        let err = VenueTableError::MatrixShape {
            matrix: "drive",
            expected: 3,
        };
        assert_eq!(err.to_string(), "drive matrix must be 3x3");

        let err = ScheduleError::UnknownVenue {
            line: 4,
            value: "XYZ".into(),
        };
        assert_eq!(err.to_string(), "line 4: unknown venue \"XYZ\"");

        let err = ScheduleError::OutOfOrder { line: 9 };
        assert_eq!(
            err.to_string(),
            "line 9: event starts before the previous row"
        );
    }
}
