//! Arbitrary-precision integer and decimal support for the per-type codecs
//! in [`crate::codec`]: the `Tag::PositiveBigNum`/`Tag::NegativeBigNum`
//! byte-string encoding (RFC 7049 §2.4.2) and the `Tag::DecimalFraction`
//! exponent/mantissa pair built on top of it.
//!
//! `BigInt`'s magnitude is stored in *wire* form: for a negative value the
//! stored bytes are `n` where the value is `-1 - n`, matching the byte
//! string CBOR itself transmits, so encoding a `BigInt` never needs an
//! off-by-one adjustment and comparing two `BigInt`s byte-for-byte is
//! comparing their wire encodings.

use crate::codec::CborDecode as _;
use crate::codec::CborEncode as _;
use crate::error::{Error, ErrorKind};
use crate::event::{OverLong, Tag};
use crate::io::{Input, Output};
use crate::reader::Reader;
use crate::writer::Writer;
use alloc::vec::Vec;

/// A sign-and-magnitude integer outside the range a `Long`/`OverLong` pair
/// can carry, or one the caller simply prefers to keep in byte-string form.
///
/// `magnitude` is canonical: non-empty, and carrying no leading zero byte
/// unless it is the single byte `0x00` (the representation of zero).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BigInt {
    negative: bool,
    magnitude: Vec<u8>,
}

impl BigInt {
    /// Construct from a sign flag and big-endian wire-magnitude bytes.
    ///
    /// # Errors
    /// `ValidationFailure` if the magnitude is empty or carries a
    /// non-canonical leading zero.
    pub fn new(negative: bool, magnitude: Vec<u8>) -> Result<Self, Error> {
        validate_magnitude(&magnitude)?;
        Ok(Self { negative, magnitude })
    }

    pub(crate) fn new_unchecked(negative: bool, magnitude: Vec<u8>) -> Self {
        Self { negative, magnitude }
    }

    /// `true` for `Tag::NegativeBigNum` (value `-1 - magnitude`).
    #[must_use]
    pub const fn is_negative(&self) -> bool {
        self.negative
    }

    /// The canonical big-endian wire-magnitude bytes.
    #[must_use]
    pub fn magnitude(&self) -> &[u8] {
        &self.magnitude
    }

    /// Build from a signed `i128`, choosing the minimal wire magnitude.
    #[must_use]
    pub fn from_i128(v: i128) -> Self {
        let (negative, n) = if v < 0 { (true, (-1_i128 - v) as u128) } else { (false, v as u128) };
        Self::new_unchecked(negative, magnitude_from_u128(n))
    }

    /// Recover an `i128`, if the magnitude fits.
    #[must_use]
    pub fn to_i128(&self) -> Option<i128> {
        let n = u128_from_be_bytes(&self.magnitude)?;
        if self.negative {
            i128::try_from(n).ok().map(|n| -1_i128 - n)
        } else {
            i128::try_from(n).ok()
        }
    }
}

fn validate_magnitude(magnitude: &[u8]) -> Result<(), Error> {
    if magnitude.is_empty() {
        return Err(Error::new(ErrorKind::ValidationFailure, 0));
    }
    if magnitude.len() > 1 && magnitude[0] == 0 {
        return Err(Error::new(ErrorKind::ValidationFailure, 0));
    }
    Ok(())
}

fn magnitude_from_u128(n: u128) -> Vec<u8> {
    if n == 0 {
        return alloc::vec![0];
    }
    let raw = n.to_be_bytes();
    let leading = (n.leading_zeros() / 8) as usize;
    raw[leading..].to_vec()
}

fn u64_from_be_bytes(bytes: &[u8]) -> Option<u64> {
    if bytes.len() > 8 {
        return None;
    }
    let mut buf = [0u8; 8];
    buf[8 - bytes.len()..].copy_from_slice(bytes);
    Some(u64::from_be_bytes(buf))
}

fn u128_from_be_bytes(bytes: &[u8]) -> Option<u128> {
    if bytes.len() > 16 {
        return None;
    }
    let mut buf = [0u8; 16];
    buf[16 - bytes.len()..].copy_from_slice(bytes);
    Some(u128::from_be_bytes(buf))
}

/// Write `negative`/`magnitude` as the shortest legal CBOR form: a bare
/// `Int`/`Long` if it fits, `PosOverLong`/`NegOverLong` if its wire
/// magnitude needs the full 64 bits, else `Tag(PositiveBigNum |
/// NegativeBigNum)` followed by the magnitude as a byte string.
pub(crate) fn encode_wire_magnitude<O: Output>(
    w: &mut Writer<O>,
    negative: bool,
    magnitude: &[u8],
) -> Result<(), Error> {
    if let Some(n) = u64_from_be_bytes(magnitude) {
        if !negative {
            if n <= i64::from(i32::MAX) as u64 {
                w.write_int(n as i32)?;
            } else if n <= i64::MAX as u64 {
                w.write_long(n as i64)?;
            } else {
                w.write_pos_over_long(OverLong(n))?;
            }
        } else if n <= i64::MAX as u64 {
            let v = -1_i64 - n as i64;
            if let Ok(i) = i32::try_from(v) {
                w.write_int(i)?;
            } else {
                w.write_long(v)?;
            }
        } else {
            w.write_neg_over_long(OverLong(n))?;
        }
    } else {
        w.write_tag(if negative { Tag::NegativeBigNum } else { Tag::PositiveBigNum })?;
        w.write_bytes(magnitude)?;
    }
    Ok(())
}

impl crate::codec::CborEncode for BigInt {
    fn encode<O: Output>(&self, w: &mut Writer<O>) -> Result<(), Error> {
        encode_wire_magnitude(w, self.negative, &self.magnitude)
    }
}

impl crate::codec::CborDecode for BigInt {
    fn decode<I: Input>(r: &mut Reader<I>) -> Result<Self, Error> {
        if r.has_long() {
            let v = r.read_long()?;
            return Ok(Self::from_i128(i128::from(v)));
        }
        if r.has_over_long() {
            let (negative, over) = r.read_over_long()?;
            return Ok(Self::new_unchecked(negative, magnitude_from_u128(u128::from(over.0))));
        }
        if r.has_tag() {
            let tag = r.read_tag()?;
            return decode_bigint_from_tag(r, tag);
        }
        Err(Error::unexpected(crate::error::Expectation::AnyDataItem, r.position()))
    }
}

pub(crate) fn decode_bigint_from_tag<I: Input>(r: &mut Reader<I>, tag: Tag) -> Result<BigInt, Error> {
    match tag {
        Tag::PositiveBigNum | Tag::NegativeBigNum => {
            let bytes = r.read_bytes()?;
            BigInt::new(tag == Tag::NegativeBigNum, bytes)
        }
        _ => Err(Error::unexpected(crate::error::Expectation::AnyDataItem, r.position())),
    }
}

/// A decimal fraction: `unscaled * 10^exponent`. Encoded as a plain integer
/// when `exponent == 0`, else as `Tag::DecimalFraction` wrapping a
/// two-element array of `[exponent, unscaled]` (RFC 7049 §2.4.3).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BigDecimal {
    exponent: i64,
    unscaled: BigInt,
}

impl BigDecimal {
    /// Construct from an exponent and an unscaled integer.
    #[must_use]
    pub const fn new(exponent: i64, unscaled: BigInt) -> Self {
        Self { exponent, unscaled }
    }

    /// The base-10 exponent.
    #[must_use]
    pub const fn exponent(&self) -> i64 {
        self.exponent
    }

    /// The unscaled integer value.
    #[must_use]
    pub const fn unscaled(&self) -> &BigInt {
        &self.unscaled
    }
}

impl crate::codec::CborEncode for BigDecimal {
    fn encode<O: Output>(&self, w: &mut Writer<O>) -> Result<(), Error> {
        if self.exponent == 0 {
            return self.unscaled.encode(w);
        }
        w.write_tag(Tag::DecimalFraction)?;
        w.write_array_header(2)?;
        BigInt::from_i128(i128::from(self.exponent)).encode(w)?;
        self.unscaled.encode(w)
    }
}

impl crate::codec::CborDecode for BigDecimal {
    fn decode<I: Input>(r: &mut Reader<I>) -> Result<Self, Error> {
        if r.has_tag() {
            let tag = r.read_tag()?;
            if tag == Tag::DecimalFraction {
                let len = r.read_array_header()?;
                if len != 2 {
                    return Err(Error::new(ErrorKind::UnexpectedDataItem, r.position()));
                }
                let exponent_pos = r.position();
                let exponent_big = BigInt::decode(r)?;
                let exponent = exponent_big
                    .to_i128()
                    .and_then(|v| i64::try_from(v).ok())
                    .ok_or_else(|| Error::new(ErrorKind::Overflow, exponent_pos))?;
                let unscaled = BigInt::decode(r)?;
                return Ok(Self { exponent, unscaled });
            }
            let unscaled = decode_bigint_from_tag(r, tag)?;
            return Ok(Self { exponent: 0, unscaled });
        }
        let unscaled = BigInt::decode(r)?;
        Ok(Self { exponent: 0, unscaled })
    }
}

#[cfg(all(test, feature = "alloc"))]
mod tests {
    use super::*;
    use crate::io::{SliceInput, VecOutput};
    use crate::validator::ValidationConfig;

    fn roundtrip_bigint(v: i128) {
        let big = BigInt::from_i128(v);
        let mut w = Writer::new(VecOutput::new(), false, ValidationConfig::new());
        big.encode(&mut w).unwrap();
        let bytes = w.into_inner().into_vec();
        let mut r = Reader::new(SliceInput::new(&bytes), ValidationConfig::new(), Default::default()).unwrap();
        let back = BigInt::decode(&mut r).unwrap();
        assert_eq!(back.to_i128(), Some(v));
    }

    #[test]
    fn small_values_round_trip_through_ordinary_integer_forms() {
        roundtrip_bigint(0);
        roundtrip_bigint(-1);
        roundtrip_bigint(i64::MAX.into());
        roundtrip_bigint(i64::MIN.into());
    }

    #[test]
    fn decodes_two_to_the_sixty_four_literal() {
        // tag(2) + bytes(9): 0x01 followed by eight 0x00 bytes == 2^64.
        let bytes = [0xc2, 0x49, 0x01, 0, 0, 0, 0, 0, 0, 0, 0];
        let mut r = Reader::new(SliceInput::new(&bytes), ValidationConfig::new(), Default::default()).unwrap();
        let big = BigInt::decode(&mut r).unwrap();
        assert_eq!(big.to_i128(), Some(1_i128 << 64));
        assert_eq!(big.magnitude(), &[0x01, 0, 0, 0, 0, 0, 0, 0, 0]);
    }

    #[test]
    fn zero_exponent_decimal_encodes_as_plain_integer() {
        let d = BigDecimal::new(0, BigInt::from_i128(7));
        let mut w = Writer::new(VecOutput::new(), false, ValidationConfig::new());
        d.encode(&mut w).unwrap();
        assert_eq!(w.into_inner().into_vec(), [0x07]);
    }

    #[test]
    fn nonzero_exponent_decimal_uses_tag_four() {
        let d = BigDecimal::new(-2, BigInt::from_i128(12345));
        let mut w = Writer::new(VecOutput::new(), false, ValidationConfig::new());
        d.encode(&mut w).unwrap();
        let bytes = w.into_inner().into_vec();
        assert_eq!(bytes[0], 0xc4);
        let mut r = Reader::new(SliceInput::new(&bytes), ValidationConfig::new(), Default::default()).unwrap();
        let back = BigDecimal::decode(&mut r).unwrap();
        assert_eq!(back.exponent(), -2);
        assert_eq!(back.unscaled().to_i128(), Some(12345));
    }
}
