//! Duplicate Show Detection
//!
//! Concurrent form submissions (and re-imports from the discovery
//! tool) produce the same show twice. The guard:
//!
//! 1. Take a Postgres advisory lock keyed by (venue, date) so only one
//!    submission for that slot proceeds at a time.
//! 2. Inside the lock, load candidate shows at the venue within a
//!    +/- 1 day window and compare headliners.
//! 3. A fuzzy headliner match means duplicate: no new row is created
//!    and the caller gets the existing show id.
//!
//! This module holds the pure parts (lock key derivation, name
//! matching); the guarded read-then-write lives in the Postgres layer.

use chrono::NaiveDate;
use kernel::id::VenueId;
use sha2::{Digest, Sha256};
use unicode_normalization::UnicodeNormalization;

/// Default candidate window, in days either side of the submitted date
pub const DEDUP_WINDOW_DAYS: i64 = 1;

/// Advisory lock key for a (venue, date) slot
///
/// `pg_advisory_xact_lock` takes a single bigint; the key is the first
/// 8 bytes of SHA-256("venue_uuid:date"), big-endian. Collisions only
/// widen the critical section, they cannot produce false duplicates.
pub fn advisory_lock_key(venue_id: &VenueId, date: NaiveDate) -> i64 {
    let mut hasher = Sha256::new();
    hasher.update(venue_id.as_uuid().as_bytes());
    hasher.update(b":");
    hasher.update(date.to_string().as_bytes());
    let digest = hasher.finalize();

    i64::from_be_bytes(digest[..8].try_into().expect("digest is 32 bytes"))
}

/// Normalize an artist name for comparison
///
/// NFKC, lowercase, whitespace collapsed to single spaces, trimmed.
/// "The Linecutters " and "the  linecutters" compare equal.
pub fn normalize_artist_name(name: &str) -> String {
    let lowered: String = name.nfkc().collect::<String>().to_lowercase();
    lowered.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Case-insensitive headliner comparison
pub fn same_headliner(a: &str, b: &str) -> bool {
    let a = normalize_artist_name(a);
    if a.is_empty() {
        return false;
    }
    a == normalize_artist_name(b)
}

/// A candidate row for duplicate comparison
#[derive(Debug, Clone)]
pub struct DedupCandidate {
    pub show_id: kernel::id::ShowId,
    pub date: NaiveDate,
    pub headliner: String,
}

/// Find the first candidate that duplicates the submission
///
/// Candidates are expected to be pre-filtered to the venue and date
/// window by the query; this applies the headliner match.
pub fn find_duplicate<'a>(
    submitted_headliner: &str,
    candidates: &'a [DedupCandidate],
) -> Option<&'a DedupCandidate> {
    candidates
        .iter()
        .find(|c| same_headliner(submitted_headliner, &c.headliner))
}

#[cfg(test)]
mod tests {
    use super::*;
    use kernel::id::ShowId;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_lock_key_is_stable() {
        let venue = VenueId::new();
        let d = date(2026, 9, 12);
        assert_eq!(advisory_lock_key(&venue, d), advisory_lock_key(&venue, d));
    }

    #[test]
    fn test_lock_key_varies_by_slot() {
        let venue_a = VenueId::new();
        let venue_b = VenueId::new();
        let d = date(2026, 9, 12);

        assert_ne!(
            advisory_lock_key(&venue_a, d),
            advisory_lock_key(&venue_b, d)
        );
        assert_ne!(
            advisory_lock_key(&venue_a, d),
            advisory_lock_key(&venue_a, date(2026, 9, 13))
        );
    }

    #[test]
    fn test_normalize_artist_name() {
        assert_eq!(normalize_artist_name("  The  Linecutters "), "the linecutters");
        assert_eq!(normalize_artist_name("DESTRUCTION UNIT"), "destruction unit");
        assert_eq!(normalize_artist_name("ＡＢＣ"), "abc");
        assert_eq!(normalize_artist_name(""), "");
    }

    #[test]
    fn test_same_headliner() {
        assert!(same_headliner("The Linecutters", "the  linecutters"));
        assert!(same_headliner("X-Ray Spex", "x-ray spex"));
        assert!(!same_headliner("The Linecutters", "The Line Cutters"));
        // Empty names never match anything
        assert!(!same_headliner("", ""));
        assert!(!same_headliner("  ", "the linecutters"));
    }

    #[test]
    fn test_find_duplicate() {
        let candidates = vec![
            DedupCandidate {
                show_id: ShowId::new(),
                date: date(2026, 9, 12),
                headliner: "Gay Kiss".to_string(),
            },
            DedupCandidate {
                show_id: ShowId::new(),
                date: date(2026, 9, 12),
                headliner: "Destruction Unit".to_string(),
            },
        ];

        let hit = find_duplicate("destruction  unit", &candidates).unwrap();
        assert_eq!(hit.headliner, "Destruction Unit");

        assert!(find_duplicate("Soft Shoulder", &candidates).is_none());
    }
}
