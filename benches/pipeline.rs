#![allow(clippy::unwrap_used)]

use std::hint::black_box;

use criterion::{criterion_group, criterion_main, Criterion};
use streamcbor::io::{SliceInput, VecOutput};
use streamcbor::validator::{ValidationConfig, Validator};
use streamcbor::{BufferingReceiver, EncodeConfig, Parser, Receiver, Writer};

fn small_map_bytes() -> Vec<u8> {
    let mut w = Writer::new(VecOutput::new(), true, ValidationConfig::new());
    w.write_map_header(1)
        .unwrap()
        .write_text("a")
        .unwrap()
        .write_int(1)
        .unwrap();
    w.into_inner().into_vec()
}

fn medium_map_bytes() -> Vec<u8> {
    let mut w = Writer::new(VecOutput::new(), true, ValidationConfig::new());
    w.write_map_header(64).unwrap();
    for i in 0..64_i32 {
        w.write_text(&format!("k{i:03}")).unwrap();
        w.write_int(i).unwrap();
    }
    w.into_inner().into_vec()
}

/// Parse-and-validate a whole item, discarding the decoded events — the
/// cost of the core pipeline's read path with nothing above it.
fn parse_and_validate(bytes: &[u8]) {
    let mut input = SliceInput::new(bytes);
    let mut validator = Validator::new(BufferingReceiver::new(), ValidationConfig::new());
    let parser = Parser::new();
    loop {
        parser.pull(&mut input, &mut validator).unwrap();
        use streamcbor::io::Input;
        if !input.has_bytes(1) {
            break;
        }
    }
}

fn bench_pipeline(c: &mut Criterion) {
    let small = small_map_bytes();
    c.bench_function("parse_validate_small_map", |b| {
        b.iter(|| parse_and_validate(black_box(&small)));
    });

    let medium = medium_map_bytes();
    c.bench_function("parse_validate_medium_map", |b| {
        b.iter(|| parse_and_validate(black_box(&medium)));
    });

    c.bench_function("encode_medium_map", |b| {
        b.iter(|| {
            let bytes = medium_map_bytes();
            black_box(bytes);
        });
    });

    let entries: Vec<(String, i32)> = (0..64_i32).map(|i| (format!("k{i:03}"), i)).collect();
    c.bench_function("encode_vec_of_i32_via_codec", |b| {
        let values: Vec<i32> = entries.iter().map(|(_, v)| *v).collect();
        b.iter(|| {
            let bytes = streamcbor::encode(black_box(&values), EncodeConfig::new()).unwrap();
            black_box(bytes);
        });
    });
}

criterion_group!(benches, bench_pipeline);
criterion_main!(benches);
