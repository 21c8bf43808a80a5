//! Fuzz target for the WAV reader.
//!
//! Feeds arbitrary bytes to `WavReader` to find crashes, panics, and
//! oversized allocations in the chunk scanner and sample decoder.

#![no_main]

use libfuzzer_sys::fuzz_target;
use siren_format::{WavReader, WavWriter};

fuzz_target!(|data: &[u8]| {
    if let Ok(container) = WavReader::from_bytes(data).decode() {
        // Anything that decodes must encode again without panicking.
        let _ = WavWriter::new().encode(&container);
        let _ = container.summary();
    }
});
