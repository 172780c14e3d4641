//! Exercises `#[derive(CborEncode, CborDecode)]` against the real wire
//! format: named-field structs, tuple structs, unit structs, and enums,
//! plus the `rename`/`skip`/`default` field attributes.

use streamcbor::{decode, encode, CborDecode, CborEncode, DecodeConfig, EncodeConfig};

#[derive(Debug, Clone, PartialEq, CborEncode, CborDecode)]
struct Point {
    x: i32,
    y: i32,
}

#[derive(Debug, Clone, PartialEq, CborEncode, CborDecode)]
struct Wrapped(i32, String);

#[derive(Debug, Clone, PartialEq, CborEncode, CborDecode)]
struct Unit;

#[derive(Debug, Clone, PartialEq, CborEncode, CborDecode)]
struct Renamed {
    #[cbor(rename = "n")]
    name: String,
}

#[derive(Debug, Clone, PartialEq, CborEncode, CborDecode)]
struct WithDefault {
    id: i32,
    #[cbor(default)]
    nickname: String,
}

#[derive(Debug, Clone, PartialEq, CborEncode, CborDecode)]
struct WithSkip {
    id: i32,
    #[cbor(skip)]
    cache: i32,
}

#[derive(Debug, Clone, PartialEq, CborEncode, CborDecode)]
enum Shape {
    Circle { radius: i32 },
    Rectangle { width: i32, height: i32 },
    Origin,
}

fn round_trip<T: CborEncode + CborDecode + PartialEq + core::fmt::Debug>(v: &T) {
    let bytes = encode(v, EncodeConfig::new()).unwrap();
    let (back, rest): (T, _) = decode(&bytes, false, DecodeConfig::new()).unwrap();
    assert_eq!(&back, v);
    assert!(rest.is_empty());
}

#[test]
fn named_field_struct_round_trips_as_a_map() {
    round_trip(&Point { x: 1, y: -2 });
}

#[test]
fn tuple_struct_round_trips_as_an_array() {
    round_trip(&Wrapped(7, "seven".to_string()));
}

#[test]
fn unit_struct_round_trips_as_null() {
    round_trip(&Unit);
}

#[test]
fn rename_attribute_changes_the_wire_key() {
    let v = Renamed { name: "ada".to_string() };
    let bytes = encode(&v, EncodeConfig::new()).unwrap();
    let (decoded, _): (streamcbor::Element, _) =
        decode(&bytes, false, DecodeConfig::new()).unwrap();
    let streamcbor::Element::Map(entries, _) = decoded else {
        panic!("expected a map");
    };
    assert_eq!(entries[0].0, streamcbor::Element::text("n"));
    round_trip(&v);
}

#[test]
fn default_attribute_fills_a_missing_field_on_decode() {
    // Decode a map that only has "id" — "nickname" must come back as
    // `String::default()` rather than failing.
    use streamcbor::io::VecOutput;
    use streamcbor::validator::ValidationConfig;
    use streamcbor::Writer;

    let mut w = Writer::new(VecOutput::new(), false, ValidationConfig::new());
    w.write_map_header(1).unwrap().write_text("id").unwrap().write_int(9).unwrap();
    let bytes = w.into_inner().into_vec();

    let (v, _): (WithDefault, _) = decode(&bytes, false, DecodeConfig::new()).unwrap();
    assert_eq!(v, WithDefault { id: 9, nickname: String::new() });
}

#[test]
fn skip_attribute_excludes_the_field_from_the_wire() {
    let v = WithSkip { id: 1, cache: 42 };
    let bytes = encode(&v, EncodeConfig::new()).unwrap();
    let (back, _): (WithSkip, _) = decode(&bytes, false, DecodeConfig::new()).unwrap();
    assert_eq!(back, WithSkip { id: 1, cache: 0 });
}

#[test]
fn unknown_map_keys_are_skipped_structurally() {
    // Forward-compatibility: a map with an extra key the struct doesn't
    // know about still decodes.
    use streamcbor::io::VecOutput;
    use streamcbor::validator::ValidationConfig;
    use streamcbor::Writer;

    let mut w = Writer::new(VecOutput::new(), false, ValidationConfig::new());
    w.write_map_header(2)
        .unwrap()
        .write_text("x")
        .unwrap()
        .write_int(1)
        .unwrap()
        .write_text("future_field")
        .unwrap()
        .write_array_header(2)
        .unwrap()
        .write_int(1)
        .unwrap()
        .write_int(2)
        .unwrap();
    // Oops: Point also needs "y" — append it after the unknown field.
    w.write_text("y").unwrap().write_int(2).unwrap();
    let mut bytes = w.into_inner().into_vec();
    // Fix up the map header's declared length (3 entries, not 2).
    bytes[0] = 0xa3;

    let (v, _): (Point, _) = decode(&bytes, false, DecodeConfig::new()).unwrap();
    assert_eq!(v, Point { x: 1, y: 2 });
}

#[test]
fn enum_variants_round_trip_as_single_entry_maps() {
    round_trip(&Shape::Circle { radius: 3 });
    round_trip(&Shape::Rectangle { width: 4, height: 5 });
    round_trip(&Shape::Origin);
}
