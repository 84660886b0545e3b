//! Deterministic name-to-id mapping
//!
//! Derives a stable numeric id from a name alone, so independent hosts
//! agree on a group's gid without a central allocator. A name is read
//! case-insensitively as a base-27 numeral over the letters a-z with
//! digits 1-26; the absent zero digit keeps strings of different lengths
//! from ever colliding. The accumulated value is shifted so the smallest
//! name, "a", lands exactly on the configured minimum id.

use crate::config::IdRange;
use crate::error::MapError;

/// Base of the positional encoding: 26 letters plus the absent zero digit.
const BASE: u64 = 27;

/// Longest mappable name. The largest 13-letter value, 27^13 - 1, still
/// fits the u64 accumulator, so accumulation can never wrap.
pub const MAX_NAME_LEN: usize = 13;

/// Map a name onto a stable id within `range`.
///
/// The mapping preserves shortlex order (shorter names first, then
/// lexicographic) and is collision-free across every name the range can
/// represent. Fails on the empty string, names longer than
/// [`MAX_NAME_LEN`], characters outside a-z, and values past `range.max`;
/// it never wraps or truncates.
pub fn map_name(name: &str, range: IdRange) -> Result<u64, MapError> {
    if name.is_empty() {
        return Err(MapError::EmptyName);
    }
    if name.chars().count() > MAX_NAME_LEN {
        return Err(MapError::NameTooLong {
            name: name.to_string(),
            max_len: MAX_NAME_LEN,
        });
    }

    let mut acc: u64 = 0;
    for ch in name.chars() {
        let lower = ch.to_ascii_lowercase();
        if !lower.is_ascii_lowercase() {
            return Err(MapError::InvalidCharacter {
                name: name.to_string(),
                character: ch,
            });
        }
        let digit = (lower as u64) - ('a' as u64) + 1;
        acc = acc * BASE + digit;
    }

    // The shift can exceed u64 when min sits near the top of the id space,
    // so compare in u128.
    let value = acc as u128 + (range.min as u128).saturating_sub(1);
    if value > range.max as u128 {
        return Err(MapError::OutOfRange {
            name: name.to_string(),
            value,
            max: range.max,
        });
    }
    Ok(value as u64)
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_map_smallest_name_lands_on_min() {
        assert_eq!(map_name("a", IdRange::new(1, 100)).unwrap(), 1);
    }

    #[test]
    fn test_map_two_letter_name() {
        // 1 * 27 + 1, unshifted because min is 1.
        assert_eq!(map_name("aa", IdRange::new(1, 100)).unwrap(), 28);
    }

    #[test]
    fn test_map_shifts_by_min() {
        assert_eq!(map_name("a", IdRange::new(10, 100)).unwrap(), 10);
        assert_eq!(map_name("b", IdRange::new(10, 100)).unwrap(), 11);
    }

    #[test]
    fn test_map_value_past_max_rejected() {
        let err = map_name("z", IdRange::new(11, 20)).unwrap_err();
        assert_eq!(
            err,
            MapError::OutOfRange {
                name: "z".to_string(),
                value: 36,
                max: 20,
            }
        );
    }

    #[test]
    fn test_map_large_range() {
        let range = IdRange::new(2000200001, 4294967294);
        assert_eq!(map_name("zzzzzz", range).unwrap(), 2387620488);
    }

    #[test]
    fn test_map_case_insensitive() {
        let range = IdRange::new(1000, 10_000_000);
        assert_eq!(
            map_name("Admins", range).unwrap(),
            map_name("admins", range).unwrap()
        );
    }

    #[test]
    fn test_map_empty_name_rejected() {
        assert_eq!(
            map_name("", IdRange::new(1000, 2000)).unwrap_err(),
            MapError::EmptyName
        );
    }

    #[test]
    fn test_map_non_letter_rejected() {
        let err = map_name("dev-ops", IdRange::new(1000, u64::MAX)).unwrap_err();
        assert_eq!(
            err,
            MapError::InvalidCharacter {
                name: "dev-ops".to_string(),
                character: '-',
            }
        );
    }

    #[test]
    fn test_map_overlong_name_rejected() {
        let err = map_name("aaaaaaaaaaaaaa", IdRange::new(1000, u64::MAX)).unwrap_err();
        assert!(matches!(err, MapError::NameTooLong { max_len: 13, .. }));
    }

    #[test]
    fn test_map_longest_name_accepted() {
        // Thirteen z's is the largest mappable value: 27^13 - 1.
        let value = map_name("zzzzzzzzzzzzz", IdRange::new(1, u64::MAX)).unwrap();
        assert_eq!(value, 27u64.pow(13) - 1);
    }

    #[test]
    fn test_map_shift_overflow_rejected() {
        // With min one below the top of the id space, "b" lands exactly on
        // u64::MAX and "c" overflows it; the u128 comparison reports the
        // overflow instead of wrapping.
        let range = IdRange::new(u64::MAX - 1, u64::MAX);
        assert_eq!(map_name("b", range).unwrap(), u64::MAX);
        let err = map_name("c", range).unwrap_err();
        assert!(matches!(err, MapError::OutOfRange { .. }));
    }
}

// =============================================================================
// PROPERTY-BASED TESTS
// =============================================================================
