//! Fuzz test for the deterministic name mapper
//!
//! This fuzz target feeds arbitrary byte sequences to map_name to find:
//! - Panics or crashes
//! - Arithmetic overflow
//! - Ids escaping the configured range
//!
//! Run with: cargo +nightly fuzz run idmap_fuzz -- -max_total_time=60

#![no_main]

use libfuzzer_sys::fuzz_target;
use roster_core::{map_name, IdRange};

fuzz_target!(|data: &[u8]| {
    // The mapper should handle any valid UTF-8 string without panicking
    if let Ok(input) = std::str::from_utf8(data) {
        // A wide range, a narrow one, and one pushed against u64::MAX
        let ranges = [
            IdRange::new(1000, u64::MAX),
            IdRange::new(2000, 2100),
            IdRange::new(u64::MAX - 10, u64::MAX),
        ];

        for range in ranges {
            if let Ok(id) = map_name(input, range) {
                // Every accepted name must land inside the range
                assert!(id >= range.min, "Mapped id below the range minimum");
                assert!(id <= range.max, "Mapped id above the range maximum");

                // Mapping is deterministic
                assert_eq!(
                    map_name(input, range),
                    Ok(id),
                    "Mapping the same name twice should agree"
                );
            }
        }
    }
});
