#![no_main]

use libfuzzer_sys::fuzz_target;

use streamcbor::io::SliceInput;
use streamcbor::validator::ValidationConfig;
use streamcbor::{Reader, ReaderConfig};

fn limits() -> ValidationConfig {
    let mut c = ValidationConfig::new();
    c.max_nesting_levels = 64;
    c.max_array_length = 1 << 16;
    c.max_map_length = 1 << 16;
    c
}

// Drives the typed `has_X`/`read_X` surface over arbitrary bytes,
// descending into arrays and maps it recognizes (both definite- and
// indefinite-length forms). Never asserts anything about the decoded
// values themselves — only that the typed layer cannot panic no matter
// how the bytes are shaped.
fn walk(r: &mut Reader<SliceInput<'_>>, budget: &mut u32) {
    if *budget == 0 {
        return;
    }
    *budget -= 1;

    if r.try_read_null().unwrap_or(false) || r.try_read_undefined().unwrap_or(false) {
        return;
    }
    if r.try_read_bool().unwrap_or(None).is_some() {
        return;
    }
    if r.try_read_long().unwrap_or(None).is_some() {
        return;
    }
    if r.has_double() {
        let _ = r.read_double();
        return;
    }
    if r.has_text() {
        let _ = r.read_text();
        return;
    }
    if r.has_bytes() {
        let _ = r.read_bytes();
        return;
    }
    if r.has_array_header() {
        if let Ok(len) = r.read_array_header() {
            for _ in 0..len.min(1 << 12) {
                walk(r, budget);
            }
        }
        return;
    }
    if r.has_array_start() && r.read_array_start().is_ok() {
        while !r.try_read_break().unwrap_or(true) {
            walk(r, budget);
            if *budget == 0 {
                return;
            }
        }
        return;
    }
    if r.has_map_header() {
        if let Ok(len) = r.read_map_header() {
            for _ in 0..(len.min(1 << 12)) * 2 {
                walk(r, budget);
            }
        }
        return;
    }
    if r.has_map_start() && r.read_map_start().is_ok() {
        while !r.try_read_break().unwrap_or(true) {
            walk(r, budget); // key
            if *budget == 0 {
                return;
            }
            walk(r, budget); // value
            if *budget == 0 {
                return;
            }
        }
        return;
    }
    if r.has_tag() {
        if r.read_tag().is_ok() {
            walk(r, budget);
        }
        return;
    }
    // Anything else (simple values, float16/float32, big-magnitude
    // integers, break/end-of-input surfacing as an error from the header
    // readers above): just stop descending.
}

fuzz_target!(|data: &[u8]| {
    if let Ok(mut r) = Reader::new(SliceInput::new(data), limits(), ReaderConfig::new()) {
        let mut budget = 4096;
        walk(&mut r, &mut budget);
    }
});
