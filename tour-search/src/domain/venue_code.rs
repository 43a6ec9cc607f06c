//! Venue code types.

use std::fmt;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Error returned when parsing an invalid venue code.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid venue code: {reason}")]
pub struct InvalidVenueCode {
    reason: &'static str,
}

/// A valid 3-letter venue code such as `BAL` or `SFG`.
///
/// Venue codes are always 3 uppercase ASCII letters. This type guarantees
/// that any `VenueCode` value is valid by construction.
///
/// # Examples
///
/// ```
/// use tour_search::domain::VenueCode;
///
/// let bal = VenueCode::parse("BAL").unwrap();
/// assert_eq!(bal.as_str(), "BAL");
///
/// // Lowercase is rejected
/// assert!(VenueCode::parse("bal").is_err());
///
/// // Wrong length is rejected
/// assert!(VenueCode::parse("BA").is_err());
/// assert!(VenueCode::parse("BALT").is_err());
/// ```
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct VenueCode([u8; 3]);

impl VenueCode {
    /// Parse a venue code from a string.
    ///
    /// The input must be exactly 3 uppercase ASCII letters (A-Z).
    pub fn parse(s: &str) -> Result<Self, InvalidVenueCode> {
        let bytes = s.as_bytes();

        if bytes.len() != 3 {
            return Err(InvalidVenueCode {
                reason: "must be exactly 3 characters",
            });
        }

        if !bytes.iter().all(u8::is_ascii_uppercase) {
            return Err(InvalidVenueCode {
                reason: "must be uppercase ASCII letters A-Z",
            });
        }

        Ok(VenueCode([bytes[0], bytes[1], bytes[2]]))
    }

    /// Returns the venue code as a string slice.
    pub fn as_str(&self) -> &str {
        // Only ASCII uppercase letters are ever stored.
        std::str::from_utf8(&self.0).unwrap_or("???")
    }
}

impl fmt::Debug for VenueCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "VenueCode({})", self.as_str())
    }
}

impl fmt::Display for VenueCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for VenueCode {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for VenueCode {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        VenueCode::parse(&s).map_err(serde::de::Error::custom)
    }
}
