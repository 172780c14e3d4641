#![no_main]

use libfuzzer_sys::fuzz_target;

use streamcbor::io::{Input, SliceInput};
use streamcbor::validator::ValidationConfig;
use streamcbor::{BufferingReceiver, Parser, Validator};

fn limits() -> ValidationConfig {
    let mut c = ValidationConfig::new();
    c.max_nesting_levels = 64;
    c.max_array_length = 1 << 16;
    c.max_map_length = 1 << 16;
    c
}

// Feeds arbitrary bytes through the parser/validator pair and asserts only
// that it never panics: malformed input must always surface as an `Error`.
fuzz_target!(|data: &[u8]| {
    let mut input = SliceInput::new(data);
    let mut validator = Validator::new(BufferingReceiver::new(), limits());
    let parser = Parser::new();
    loop {
        if parser.pull(&mut input, &mut validator).is_err() {
            return;
        }
        if !input.has_bytes(1) {
            let _ = parser.pull(&mut input, &mut validator);
            return;
        }
    }
});
