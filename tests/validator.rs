//! Validator invariants, exercised both as literal cases and as
//! property-based checks over randomly generated well-formed event
//! streams (the idempotence property from the wire specification's
//! testable properties).

use proptest::prelude::*;
use streamcbor::buffer::BufferingReceiver;
use streamcbor::event::{Event, Tag};
use streamcbor::io::{Input, SliceInput, VecOutput};
use streamcbor::validator::{ValidationConfig, Validator};
use streamcbor::{Emitter, Parser, Receiver};

#[test]
fn break_legal_only_in_unbounded_level() {
    let mut v = Validator::new(BufferingReceiver::new(), ValidationConfig::new());
    v.on_event(Event::ArrayHeader(0)).unwrap();
    assert!(v.on_event(Event::Break).is_err());

    let mut v2 = Validator::new(BufferingReceiver::new(), ValidationConfig::new());
    v2.on_event(Event::ArrayStart).unwrap();
    v2.on_event(Event::Break).unwrap();
}

#[test]
fn map_break_requires_even_sub_item_count() {
    let mut v = Validator::new(BufferingReceiver::new(), ValidationConfig::new());
    v.on_event(Event::MapStart).unwrap();
    v.on_event(Event::Text("k")).unwrap();
    assert!(v.on_event(Event::Break).is_err());
    v.on_event(Event::Long(1)).unwrap();
    v.on_event(Event::Break).unwrap();
}

#[test]
fn nesting_depth_strictly_over_cap_always_overflows() {
    let mut config = ValidationConfig::new();
    config.max_nesting_levels = 3;
    let mut v = Validator::new(BufferingReceiver::new(), config);
    v.on_event(Event::ArrayHeader(1)).unwrap();
    v.on_event(Event::ArrayHeader(1)).unwrap();
    v.on_event(Event::ArrayHeader(1)).unwrap();
    assert!(v.on_event(Event::ArrayHeader(0)).is_err());
}

#[test]
fn array_and_map_length_caps_are_enforced() {
    let mut config = ValidationConfig::new();
    config.max_array_length = 2;
    let mut v = Validator::new(BufferingReceiver::new(), config);
    assert!(v.on_event(Event::ArrayHeader(3)).is_err());

    let mut config = ValidationConfig::new();
    config.max_map_length = 1;
    let mut v = Validator::new(BufferingReceiver::new(), config);
    assert!(v.on_event(Event::MapHeader(2)).is_err());
}

#[test]
fn decimal_fraction_tag_requires_length_two_array_of_integers() {
    let mut v = Validator::new(BufferingReceiver::new(), ValidationConfig::new());
    v.on_event(Event::Tag(Tag::DecimalFraction)).unwrap();
    assert!(v.on_event(Event::ArrayHeader(3)).is_err());

    let mut v2 = Validator::new(BufferingReceiver::new(), ValidationConfig::new());
    v2.on_event(Event::Tag(Tag::DecimalFraction)).unwrap();
    v2.on_event(Event::ArrayHeader(2)).unwrap();
    v2.on_event(Event::Long(-2)).unwrap();
    v2.on_event(Event::Long(12345)).unwrap();
    v2.on_event(Event::EndOfInput).unwrap();
}

/// Build a small well-formed event stream (no `EndOfInput`) from a
/// proptest-generated recursive shape, bounded in depth and breadth so
/// generation terminates quickly.
#[derive(Debug, Clone)]
enum Shape {
    Int(i64),
    Text(alloc_free_string::AsciiString),
    Array(Vec<Shape>),
    Map(Vec<(alloc_free_string::AsciiString, Shape)>),
}

mod alloc_free_string {
    use proptest::prelude::*;

    #[derive(Debug, Clone)]
    pub struct AsciiString(pub String);

    pub fn arb() -> impl Strategy<Value = AsciiString> {
        "[a-z]{0,6}".prop_map(AsciiString)
    }
}

fn shape_strategy() -> impl Strategy<Value = Shape> {
    let leaf = prop_oneof![
        any::<i32>().prop_map(|n| Shape::Int(i64::from(n))),
        alloc_free_string::arb().prop_map(Shape::Text),
    ];
    leaf.prop_recursive(3, 16, 4, |inner| {
        prop_oneof![
            prop::collection::vec(inner.clone(), 0..4).prop_map(Shape::Array),
            prop::collection::vec((alloc_free_string::arb(), inner), 0..4).prop_map(Shape::Map),
        ]
    })
}

fn emit_shape<R: Receiver>(shape: &Shape, recv: &mut R) {
    match shape {
        Shape::Int(n) => recv.on_event(Event::Long(*n)).unwrap(),
        Shape::Text(s) => recv.on_event(Event::Text(&s.0)).unwrap(),
        Shape::Array(items) => {
            recv.on_event(Event::ArrayHeader(items.len() as u64)).unwrap();
            for item in items {
                emit_shape(item, recv);
            }
        }
        Shape::Map(entries) => {
            recv.on_event(Event::MapHeader(entries.len() as u64)).unwrap();
            for (k, v) in entries {
                recv.on_event(Event::Text(&k.0)).unwrap();
                emit_shape(v, recv);
            }
        }
    }
}

proptest! {
    /// Any event sequence the validator accepts, once emitted to bytes and
    /// re-parsed, is accepted a second time by a fresh validator.
    #[test]
    fn validator_acceptance_is_idempotent_through_the_wire(shape in shape_strategy()) {
        let mut emitter = Validator::new(Emitter::new(VecOutput::new(), true), ValidationConfig::new());
        emit_shape(&shape, &mut emitter);
        emitter.on_event(Event::EndOfInput).unwrap();
        let bytes = emitter.into_inner().into_inner().into_vec();

        let mut input = SliceInput::new(&bytes);
        let mut validator = Validator::new(BufferingReceiver::new(), ValidationConfig::new());
        let parser = Parser::new();
        loop {
            parser.pull(&mut input, &mut validator).unwrap();
            if !input.has_bytes(1) {
                break;
            }
        }
        parser.pull(&mut input, &mut validator).unwrap();
    }
}
