//! Fuzz test for cache document deserialization
//!
//! This fuzz target parses arbitrary byte sequences as a cache document
//! to find:
//! - Panics or crashes in deserialization
//! - Documents that parse but cannot be re-encoded
//! - Round trips that lose records
//!
//! Run with: cargo +nightly fuzz run document_fuzz -- -max_total_time=60

#![no_main]

use libfuzzer_sys::fuzz_target;
use roster_core::CacheDocument;

fuzz_target!(|data: &[u8]| {
    // Deserializing arbitrary text must return an error, never panic
    if let Ok(input) = std::str::from_utf8(data) {
        if let Ok(document) = serde_json::from_str::<CacheDocument>(input) {
            // Anything that parsed must survive a re-encode round trip
            let encoded =
                serde_json::to_string(&document).expect("parsed document should re-encode");
            let reparsed: CacheDocument =
                serde_json::from_str(&encoded).expect("re-encoded document should parse");
            assert_eq!(document, reparsed, "Round trip should preserve the document");
        }
    }
});
