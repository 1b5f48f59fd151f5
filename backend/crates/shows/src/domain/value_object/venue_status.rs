//! VenueStatus Value Object
//!
//! Venues created from free-text submissions start Unverified; admins
//! verify them once details are confirmed.

use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
#[repr(i16)]
pub enum VenueStatus {
    #[default]
    Unverified = 0,
    Verified = 1,
}

impl VenueStatus {
    #[inline]
    pub const fn id(&self) -> i16 {
        *self as i16
    }

    #[inline]
    pub const fn code(&self) -> &'static str {
        match self {
            VenueStatus::Unverified => "unverified",
            VenueStatus::Verified => "verified",
        }
    }

    #[inline]
    pub fn from_id(id: i16) -> Option<Self> {
        match id {
            0 => Some(VenueStatus::Unverified),
            1 => Some(VenueStatus::Verified),
            _ => None,
        }
    }
}

impl fmt::Display for VenueStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_roundtrip() {
        assert_eq!(VenueStatus::from_id(0), Some(VenueStatus::Unverified));
        assert_eq!(VenueStatus::from_id(1), Some(VenueStatus::Verified));
        assert_eq!(VenueStatus::from_id(5), None);
    }

    #[test]
    fn test_default() {
        assert_eq!(VenueStatus::default(), VenueStatus::Unverified);
    }
}
