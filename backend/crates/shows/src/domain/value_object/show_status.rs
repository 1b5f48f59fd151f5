//! ShowStatus Value Object
//!
//! Moderation status of a show listing. The state machine is small:
//! pending -> approved | rejected, and owners can toggle an approved
//! show between approved and private.

use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
#[repr(i16)]
pub enum ShowStatus {
    #[default]
    Pending = 0,
    Approved = 1,
    Rejected = 2,
    Private = 3,
}

impl ShowStatus {
    #[inline]
    pub const fn id(&self) -> i16 {
        *self as i16
    }

    #[inline]
    pub const fn code(&self) -> &'static str {
        match self {
            ShowStatus::Pending => "pending",
            ShowStatus::Approved => "approved",
            ShowStatus::Rejected => "rejected",
            ShowStatus::Private => "private",
        }
    }

    #[inline]
    pub fn from_id(id: i16) -> Option<Self> {
        match id {
            0 => Some(ShowStatus::Pending),
            1 => Some(ShowStatus::Approved),
            2 => Some(ShowStatus::Rejected),
            3 => Some(ShowStatus::Private),
            _ => None,
        }
    }

    #[inline]
    pub fn from_code(code: &str) -> Option<Self> {
        match code {
            "pending" => Some(ShowStatus::Pending),
            "approved" => Some(ShowStatus::Approved),
            "rejected" => Some(ShowStatus::Rejected),
            "private" => Some(ShowStatus::Private),
            _ => None,
        }
    }

    /// Publicly listed?
    #[inline]
    pub const fn is_public(&self) -> bool {
        matches!(self, ShowStatus::Approved)
    }

    /// Staff review transition: to Approved
    ///
    /// Rejected shows may be re-approved by staff.
    #[inline]
    pub const fn can_approve(&self) -> bool {
        matches!(self, ShowStatus::Pending | ShowStatus::Rejected)
    }

    /// Staff review transition: to Rejected
    #[inline]
    pub const fn can_reject(&self) -> bool {
        matches!(self, ShowStatus::Pending)
    }

    /// Owner toggle: Approved <-> Private
    #[inline]
    pub const fn can_toggle_private(&self) -> bool {
        matches!(self, ShowStatus::Approved | ShowStatus::Private)
    }
}

impl fmt::Display for ShowStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_id_roundtrip() {
        for status in [
            ShowStatus::Pending,
            ShowStatus::Approved,
            ShowStatus::Rejected,
            ShowStatus::Private,
        ] {
            assert_eq!(ShowStatus::from_id(status.id()), Some(status));
            assert_eq!(ShowStatus::from_code(status.code()), Some(status));
        }
        assert_eq!(ShowStatus::from_id(9), None);
        assert_eq!(ShowStatus::from_code("hidden"), None);
    }

    #[test]
    fn test_transitions() {
        assert!(ShowStatus::Pending.can_approve());
        assert!(ShowStatus::Rejected.can_approve());
        assert!(!ShowStatus::Approved.can_approve());

        assert!(ShowStatus::Pending.can_reject());
        assert!(!ShowStatus::Approved.can_reject());
        assert!(!ShowStatus::Rejected.can_reject());

        assert!(ShowStatus::Approved.can_toggle_private());
        assert!(ShowStatus::Private.can_toggle_private());
        assert!(!ShowStatus::Pending.can_toggle_private());
        assert!(!ShowStatus::Rejected.can_toggle_private());
    }

    #[test]
    fn test_visibility() {
        assert!(ShowStatus::Approved.is_public());
        assert!(!ShowStatus::Pending.is_public());
        assert!(!ShowStatus::Private.is_public());
        assert!(!ShowStatus::Rejected.is_public());
    }
}
