#![no_main]

use libfuzzer_sys::fuzz_target;

use streamcbor::io::{SliceInput, VecOutput};
use streamcbor::validator::ValidationConfig;
use streamcbor::{Element, Reader, ReaderConfig, Writer};

fn limits() -> ValidationConfig {
    let mut c = ValidationConfig::new();
    c.max_nesting_levels = 64;
    c.max_array_length = 1 << 16;
    c.max_map_length = 1 << 16;
    c
}

// Whatever the DOM decodes from arbitrary bytes, re-encoding it and
// decoding the result back must reproduce an equal tree: `Element::write`
// is the only encoder `Element::read` needs to be the inverse of.
fuzz_target!(|data: &[u8]| {
    let Ok(mut reader) = Reader::new(SliceInput::new(data), limits(), ReaderConfig::new()) else {
        return;
    };
    let Ok(first) = Element::read(&mut reader) else {
        return;
    };

    let mut w = Writer::new(VecOutput::new(), true, limits());
    first.write(&mut w).expect("re-encoding a decoded Element must not fail");
    let bytes = w.into_inner().into_vec();

    let mut reader2 = Reader::new(SliceInput::new(&bytes), limits(), ReaderConfig::new())
        .expect("re-encoded bytes must themselves be well-formed");
    let second = Element::read(&mut reader2).expect("re-decoding re-encoded bytes must not fail");

    assert_eq!(first, second);
});
