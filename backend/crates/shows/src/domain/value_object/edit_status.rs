//! EditStatus Value Object
//!
//! Status of a proposed venue edit: pending -> approved | rejected.

use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
#[repr(i16)]
pub enum EditStatus {
    #[default]
    Pending = 0,
    Approved = 1,
    Rejected = 2,
}

impl EditStatus {
    #[inline]
    pub const fn id(&self) -> i16 {
        *self as i16
    }

    #[inline]
    pub const fn code(&self) -> &'static str {
        match self {
            EditStatus::Pending => "pending",
            EditStatus::Approved => "approved",
            EditStatus::Rejected => "rejected",
        }
    }

    #[inline]
    pub fn from_id(id: i16) -> Option<Self> {
        match id {
            0 => Some(EditStatus::Pending),
            1 => Some(EditStatus::Approved),
            2 => Some(EditStatus::Rejected),
            _ => None,
        }
    }

    /// Only pending edits can be resolved
    #[inline]
    pub const fn is_resolvable(&self) -> bool {
        matches!(self, EditStatus::Pending)
    }
}

impl fmt::Display for EditStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_roundtrip() {
        for status in [EditStatus::Pending, EditStatus::Approved, EditStatus::Rejected] {
            assert_eq!(EditStatus::from_id(status.id()), Some(status));
        }
        assert_eq!(EditStatus::from_id(9), None);
    }

    #[test]
    fn test_resolvable() {
        assert!(EditStatus::Pending.is_resolvable());
        assert!(!EditStatus::Approved.is_resolvable());
        assert!(!EditStatus::Rejected.is_resolvable());
    }
}
