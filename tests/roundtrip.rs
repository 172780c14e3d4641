//! Property-based round-trip coverage for the typed per-type codecs, plus
//! the `BigInteger` boundary values called out in the wire specification.

use proptest::prelude::*;
use streamcbor::{decode, encode, BigInt, DecodeConfig, EncodeConfig};

proptest! {
    #[test]
    fn bool_round_trips(v: bool) {
        let bytes = encode(&v, EncodeConfig::new()).unwrap();
        let (back, rest): (bool, _) = decode(&bytes, false, DecodeConfig::new()).unwrap();
        prop_assert_eq!(back, v);
        prop_assert!(rest.is_empty());
    }

    #[test]
    fn i32_round_trips(v: i32) {
        let bytes = encode(&v, EncodeConfig::new()).unwrap();
        let (back, _): (i32, _) = decode(&bytes, false, DecodeConfig::new()).unwrap();
        prop_assert_eq!(back, v);
    }

    #[test]
    fn i64_round_trips(v: i64) {
        let bytes = encode(&v, EncodeConfig::new()).unwrap();
        let (back, _): (i64, _) = decode(&bytes, false, DecodeConfig::new()).unwrap();
        prop_assert_eq!(back, v);
    }

    #[test]
    fn f32_round_trips(v: f32) {
        let bytes = encode(&v, EncodeConfig::new()).unwrap();
        let (back, _): (f32, _) = decode(&bytes, false, DecodeConfig::new()).unwrap();
        if v.is_nan() {
            prop_assert!(back.is_nan());
        } else {
            prop_assert_eq!(back, v);
        }
    }

    #[test]
    fn f64_round_trips(v: f64) {
        let bytes = encode(&v, EncodeConfig::new()).unwrap();
        let (back, _): (f64, _) = decode(&bytes, false, DecodeConfig::new()).unwrap();
        if v.is_nan() {
            prop_assert!(back.is_nan());
        } else {
            prop_assert_eq!(back, v);
        }
    }

    #[test]
    fn string_round_trips(v: String) {
        let bytes = encode(&v, EncodeConfig::new()).unwrap();
        let (back, _): (String, _) = decode(&bytes, false, DecodeConfig::new()).unwrap();
        prop_assert_eq!(back, v);
    }

    #[test]
    fn byte_vec_round_trips(v: Vec<u8>) {
        let bytes = encode(&v, EncodeConfig::new()).unwrap();
        let (back, _): (Vec<u8>, _) = decode(&bytes, false, DecodeConfig::new()).unwrap();
        prop_assert_eq!(back, v);
    }

    #[test]
    fn vec_of_i32_round_trips(v: Vec<i32>) {
        let bytes = encode(&v, EncodeConfig::new()).unwrap();
        let (back, _): (Vec<i32>, _) = decode(&bytes, false, DecodeConfig::new()).unwrap();
        prop_assert_eq!(back, v);
    }

    #[test]
    fn option_i32_round_trips(v: Option<i32>) {
        let bytes = encode(&v, EncodeConfig::new()).unwrap();
        let (back, _): (Option<i32>, _) = decode(&bytes, false, DecodeConfig::new()).unwrap();
        prop_assert_eq!(back, v);
    }

    #[test]
    fn tuple_round_trips(a: i32, b: String, c: bool) {
        let v = (a, b.clone(), c);
        let bytes = encode(&v, EncodeConfig::new()).unwrap();
        let (back, _): ((i32, String, bool), _) = decode(&bytes, false, DecodeConfig::new()).unwrap();
        prop_assert_eq!(back, (a, b, c));
    }

    #[test]
    fn big_int_round_trips_i128(v: i128) {
        let n = BigInt::from_i128(v);
        let bytes = encode(&n, EncodeConfig::new()).unwrap();
        let (back, _): (BigInt, _) = decode(&bytes, false, DecodeConfig::new()).unwrap();
        prop_assert_eq!(back, n);
    }
}

/// The exact boundary values named in the wire specification's testable
/// properties: everywhere the signed-64/unsigned-64/bignum carriers hand
/// off to one another.
#[test]
fn big_integer_boundaries_round_trip() {
    let boundaries: &[i128] = &[
        (1i128 << 31) - 1,
        1i128 << 31,
        (1i128 << 63) - 1,
        1i128 << 63,
        (1i128 << 64) - 1,
        1i128 << 64,
        -(1i128 << 63) - 1,
    ];
    for &b in boundaries {
        let n = BigInt::from_i128(b);
        let bytes = encode(&n, EncodeConfig::new()).unwrap();
        let (back, rest): (BigInt, _) = decode(&bytes, false, DecodeConfig::new()).unwrap();
        assert_eq!(back, n, "round trip failed for {b}");
        assert!(rest.is_empty());
    }
}

#[test]
fn either_round_trips_both_sides() {
    use streamcbor::Either;

    let left: Either<i32, String> = Either::Left(7);
    let bytes = encode(&left, EncodeConfig::new()).unwrap();
    let (back, _): (Either<i32, String>, _) = decode(&bytes, false, DecodeConfig::new()).unwrap();
    assert_eq!(back, left);

    let right: Either<i32, String> = Either::Right("hi".to_string());
    let bytes = encode(&right, EncodeConfig::new()).unwrap();
    let (back, _): (Either<i32, String>, _) = decode(&bytes, false, DecodeConfig::new()).unwrap();
    assert_eq!(back, right);
}
