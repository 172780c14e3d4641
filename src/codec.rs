//! Per-type codecs (C9): small encoder/decoder units composed over the
//! [`Writer`]/[`Reader`] typed layer — primitives, options, eithers,
//! tuples, and the two collection shapes (`Iterable`/`Map`) that cover
//! arrays and maps of arbitrary element types. Big numbers live in
//! [`crate::bignum`], built on the same two traits.

use crate::error::{Error, ErrorKind};
use crate::io::{Input, Output};
use crate::reader::Reader;
use crate::writer::Writer;
use alloc::collections::BTreeMap;
use alloc::string::String;
use alloc::vec::Vec;

/// Something that can write itself as one or more CBOR data items.
pub trait CborEncode {
    /// Write `self` through `w`.
    ///
    /// # Errors
    /// Whatever the underlying `Writer` calls fail with.
    fn encode<O: Output>(&self, w: &mut Writer<O>) -> Result<(), Error>;
}

/// Something that can read itself back from CBOR data items.
pub trait CborDecode: Sized {
    /// Read one logical value (possibly several data items) through `r`.
    ///
    /// # Errors
    /// `UnexpectedDataItem` if the buffered shape doesn't match, or whatever
    /// the underlying `Reader` calls fail with.
    fn decode<I: Input>(r: &mut Reader<I>) -> Result<Self, Error>;
}

impl CborEncode for bool {
    fn encode<O: Output>(&self, w: &mut Writer<O>) -> Result<(), Error> {
        w.write_bool(*self)?;
        Ok(())
    }
}

impl CborDecode for bool {
    fn decode<I: Input>(r: &mut Reader<I>) -> Result<Self, Error> {
        r.read_bool()
    }
}

macro_rules! narrow_int_codec {
    ($ty:ty) => {
        impl CborEncode for $ty {
            fn encode<O: Output>(&self, w: &mut Writer<O>) -> Result<(), Error> {
                w.write_long(i64::from(*self))?;
                Ok(())
            }
        }

        impl CborDecode for $ty {
            fn decode<I: Input>(r: &mut Reader<I>) -> Result<Self, Error> {
                let pos = r.position();
                let v = r.read_long()?;
                <$ty>::try_from(v).map_err(|_| Error::new(ErrorKind::ValidationFailure, pos))
            }
        }
    };
}

narrow_int_codec!(i8);
narrow_int_codec!(i16);
narrow_int_codec!(u8);
narrow_int_codec!(u16);
narrow_int_codec!(u32);

impl CborEncode for i32 {
    fn encode<O: Output>(&self, w: &mut Writer<O>) -> Result<(), Error> {
        w.write_int(*self)?;
        Ok(())
    }
}

impl CborDecode for i32 {
    fn decode<I: Input>(r: &mut Reader<I>) -> Result<Self, Error> {
        let pos = r.position();
        let v = r.read_long()?;
        i32::try_from(v).map_err(|_| Error::new(ErrorKind::ValidationFailure, pos))
    }
}

impl CborEncode for i64 {
    fn encode<O: Output>(&self, w: &mut Writer<O>) -> Result<(), Error> {
        w.write_long(*self)?;
        Ok(())
    }
}

impl CborDecode for i64 {
    fn decode<I: Input>(r: &mut Reader<I>) -> Result<Self, Error> {
        r.read_long()
    }
}

impl CborEncode for u64 {
    fn encode<O: Output>(&self, w: &mut Writer<O>) -> Result<(), Error> {
        if let Ok(v) = i64::try_from(*self) {
            w.write_long(v)?;
        } else {
            w.write_pos_over_long(crate::event::OverLong(*self))?;
        }
        Ok(())
    }
}

impl CborDecode for u64 {
    fn decode<I: Input>(r: &mut Reader<I>) -> Result<Self, Error> {
        let pos = r.position();
        if r.has_long() {
            let v = r.read_long()?;
            return u64::try_from(v).map_err(|_| Error::new(ErrorKind::ValidationFailure, pos));
        }
        let (negative, over) = r.read_over_long()?;
        if negative {
            return Err(Error::new(ErrorKind::ValidationFailure, pos));
        }
        Ok(over.0)
    }
}

/// A `char` is written as the `Int`/`Long` of its codepoint. On read, the
/// value must both fit a 32-bit codepoint and be a valid Unicode scalar
/// value: `char::from_u32` rejects surrogate halves the same way the wire
/// form's "high bits zero" check does.
impl CborEncode for char {
    fn encode<O: Output>(&self, w: &mut Writer<O>) -> Result<(), Error> {
        w.write_long(i64::from(*self as u32))?;
        Ok(())
    }
}

impl CborDecode for char {
    fn decode<I: Input>(r: &mut Reader<I>) -> Result<Self, Error> {
        let pos = r.position();
        let v = r.read_long()?;
        u32::try_from(v)
            .ok()
            .and_then(char::from_u32)
            .ok_or_else(|| Error::new(ErrorKind::ValidationFailure, pos))
    }
}

impl CborEncode for f32 {
    fn encode<O: Output>(&self, w: &mut Writer<O>) -> Result<(), Error> {
        w.write_float32(*self)?;
        Ok(())
    }
}

impl CborDecode for f32 {
    fn decode<I: Input>(r: &mut Reader<I>) -> Result<Self, Error> {
        r.read_float()
    }
}

impl CborEncode for f64 {
    fn encode<O: Output>(&self, w: &mut Writer<O>) -> Result<(), Error> {
        w.write_float64(*self)?;
        Ok(())
    }
}

impl CborDecode for f64 {
    fn decode<I: Input>(r: &mut Reader<I>) -> Result<Self, Error> {
        r.read_double()
    }
}

impl CborEncode for str {
    fn encode<O: Output>(&self, w: &mut Writer<O>) -> Result<(), Error> {
        w.write_text(self)?;
        Ok(())
    }
}

impl CborEncode for String {
    fn encode<O: Output>(&self, w: &mut Writer<O>) -> Result<(), Error> {
        w.write_text(self)?;
        Ok(())
    }
}

impl CborDecode for String {
    fn decode<I: Input>(r: &mut Reader<I>) -> Result<Self, Error> {
        r.read_string()
    }
}

impl CborEncode for [u8] {
    fn encode<O: Output>(&self, w: &mut Writer<O>) -> Result<(), Error> {
        w.write_bytes(self)?;
        Ok(())
    }
}

impl CborEncode for Vec<u8> {
    fn encode<O: Output>(&self, w: &mut Writer<O>) -> Result<(), Error> {
        w.write_bytes(self)?;
        Ok(())
    }
}

impl CborDecode for Vec<u8> {
    fn decode<I: Input>(r: &mut Reader<I>) -> Result<Self, Error> {
        if r.has_bytes() {
            r.read_bytes()
        } else {
            r.read_unsized_bytes()
        }
    }
}

/// `None` writes as `ArrayHeader(0)`; `Some(x)` as `ArrayHeader(1)` followed
/// by `x` (the Option/Maybe shape).
impl<T: CborEncode> CborEncode for Option<T> {
    fn encode<O: Output>(&self, w: &mut Writer<O>) -> Result<(), Error> {
        match self {
            None => {
                w.write_array_header(0)?;
            }
            Some(v) => {
                w.write_array_header(1)?;
                v.encode(w)?;
            }
        }
        Ok(())
    }
}

impl<T: CborDecode> CborDecode for Option<T> {
    fn decode<I: Input>(r: &mut Reader<I>) -> Result<Self, Error> {
        let pos = r.position();
        let len = r.read_array_header()?;
        match len {
            0 => Ok(None),
            1 => Ok(Some(T::decode(r)?)),
            _ => Err(Error::new(ErrorKind::ValidationFailure, pos)),
        }
    }
}

/// A two-way disjoint value, encoded as the single-entry map `{0: left}` or
/// `{1: right}`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Either<L, R> {
    /// The "left" alternative, keyed `0` on the wire.
    Left(L),
    /// The "right" alternative, keyed `1` on the wire.
    Right(R),
}

impl<L: CborEncode, R: CborEncode> CborEncode for Either<L, R> {
    fn encode<O: Output>(&self, w: &mut Writer<O>) -> Result<(), Error> {
        w.write_map_header(1)?;
        match self {
            Self::Left(v) => {
                w.write_int(0)?;
                v.encode(w)?;
            }
            Self::Right(v) => {
                w.write_int(1)?;
                v.encode(w)?;
            }
        }
        Ok(())
    }
}

impl<L: CborDecode, R: CborDecode> CborDecode for Either<L, R> {
    fn decode<I: Input>(r: &mut Reader<I>) -> Result<Self, Error> {
        let pos = r.position();
        let len = r.read_map_header()?;
        if len != 1 {
            return Err(Error::new(ErrorKind::ValidationFailure, pos));
        }
        let key = r.read_long()?;
        match key {
            0 => Ok(Self::Left(L::decode(r)?)),
            1 => Ok(Self::Right(R::decode(r)?)),
            _ => Err(Error::new(ErrorKind::ValidationFailure, pos)),
        }
    }
}

macro_rules! tuple_codec {
    ($len:expr; $($idx:tt $ty:ident),+) => {
        impl<$($ty: CborEncode),+> CborEncode for ($($ty,)+) {
            fn encode<O: Output>(&self, w: &mut Writer<O>) -> Result<(), Error> {
                w.write_array_header($len)?;
                $(self.$idx.encode(w)?;)+
                Ok(())
            }
        }

        impl<$($ty: CborDecode),+> CborDecode for ($($ty,)+) {
            fn decode<I: Input>(r: &mut Reader<I>) -> Result<Self, Error> {
                let pos = r.position();
                let len = r.read_array_header()?;
                if len != $len {
                    return Err(Error::new(ErrorKind::ValidationFailure, pos));
                }
                Ok(($($ty::decode(r)?,)+))
            }
        }
    };
}

tuple_codec!(1; 0 A);
tuple_codec!(2; 0 A, 1 B);
tuple_codec!(3; 0 A, 1 B, 2 C);
tuple_codec!(4; 0 A, 1 B, 2 C, 3 D);

/// Write `items` as a definite-length array: the "Iterable of T" shape.
///
/// # Errors
/// Whatever the element encoder or `write_array_header` fails with.
pub fn encode_iterable<O, T, I>(w: &mut Writer<O>, items: I) -> Result<(), Error>
where
    O: Output,
    T: CborEncode,
    I: IntoIterator<Item = T>,
    I::IntoIter: ExactSizeIterator,
{
    let iter = items.into_iter();
    w.write_array_header(iter.len() as u64)?;
    for item in iter {
        item.encode(w)?;
    }
    Ok(())
}

/// Write `items` as an indefinite-length array (`ArrayStart`, elements,
/// `Break`): the "Iterator/stream of T" shape, for sequences whose length
/// isn't known up front.
///
/// # Errors
/// Whatever the element encoder, `write_array_start`, or `write_break`
/// fails with.
pub fn encode_stream<O, T, I>(w: &mut Writer<O>, items: I) -> Result<(), Error>
where
    O: Output,
    T: CborEncode,
    I: IntoIterator<Item = T>,
{
    w.write_array_start()?;
    for item in items {
        item.encode(w)?;
    }
    w.write_break()?;
    Ok(())
}

impl<T: CborEncode> CborEncode for Vec<T> {
    fn encode<O: Output>(&self, w: &mut Writer<O>) -> Result<(), Error> {
        encode_iterable(w, self)
    }
}

/// Reads either a definite-length array (`ArrayHeader`) or an
/// indefinite-length one (`ArrayStart` ... `Break`), draining it into a
/// `Vec<T>` either way.
impl<T: CborDecode> CborDecode for Vec<T> {
    fn decode<I: Input>(r: &mut Reader<I>) -> Result<Self, Error> {
        if r.has_array_header() {
            let len = r.read_array_header()?;
            let len =
                usize::try_from(len).map_err(|_| Error::new(ErrorKind::Overflow, r.position()))?;
            let mut out = Vec::new();
            out.try_reserve_exact(len)
                .map_err(|_| Error::new(ErrorKind::Overflow, r.position()))?;
            for _ in 0..len {
                out.push(T::decode(r)?);
            }
            Ok(out)
        } else {
            r.read_array_start()?;
            let mut out = Vec::new();
            while !r.try_read_break()? {
                out.push(T::decode(r)?);
            }
            Ok(out)
        }
    }
}

/// A map of `K → V`, written as `MapHeader(len)` followed by alternating
/// key/value entries.
impl<K: CborEncode, V: CborEncode> CborEncode for BTreeMap<K, V> {
    fn encode<O: Output>(&self, w: &mut Writer<O>) -> Result<(), Error> {
        w.write_map_header(self.len() as u64)?;
        for (k, v) in self {
            k.encode(w)?;
            v.encode(w)?;
        }
        Ok(())
    }
}

/// Reads either `MapHeader` or `MapStart`/`Break`. A duplicate key is not an
/// error: the later entry silently overwrites the earlier one.
impl<K: CborDecode + Ord, V: CborDecode> CborDecode for BTreeMap<K, V> {
    fn decode<I: Input>(r: &mut Reader<I>) -> Result<Self, Error> {
        let mut out = BTreeMap::new();
        if r.has_map_header() {
            let len = r.read_map_header()?;
            for _ in 0..len {
                let k = K::decode(r)?;
                let v = V::decode(r)?;
                out.insert(k, v);
            }
        } else {
            r.read_map_start()?;
            while !r.try_read_break()? {
                let k = K::decode(r)?;
                let v = V::decode(r)?;
                out.insert(k, v);
            }
        }
        Ok(out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::io::{SliceInput, VecOutput};
    use crate::validator::ValidationConfig;

    fn roundtrip<T: CborEncode + CborDecode + PartialEq + core::fmt::Debug>(v: T) {
        let mut w = Writer::new(VecOutput::new(), false, ValidationConfig::new());
        v.encode(&mut w).unwrap();
        let bytes = w.into_inner().into_vec();
        let mut r =
            Reader::new(SliceInput::new(&bytes), ValidationConfig::new(), Default::default()).unwrap();
        let back = T::decode(&mut r).unwrap();
        assert_eq!(v, back);
    }

    #[test]
    fn primitives_round_trip() {
        roundtrip(true);
        roundtrip(false);
        roundtrip(42_i32);
        roundtrip(-1_i64);
        roundtrip(7_u8);
        roundtrip('x');
        roundtrip(alloc::string::String::from("hello"));
    }

    #[test]
    fn option_round_trips_both_variants() {
        roundtrip(Some(5_i32));
        roundtrip(None::<i32>);
    }

    #[test]
    fn either_round_trips_both_sides() {
        roundtrip(Either::<i32, alloc::string::String>::Left(1));
        roundtrip(Either::<i32, alloc::string::String>::Right(
            alloc::string::String::from("r"),
        ));
    }

    #[test]
    fn vec_round_trips_via_definite_header() {
        roundtrip(alloc::vec![1_i32, 2, 3]);
    }

    #[test]
    fn vec_decodes_indefinite_form() {
        let mut w = Writer::new(VecOutput::new(), false, ValidationConfig::new());
        w.write_array_start().unwrap();
        w.write_int(1).unwrap();
        w.write_int(2).unwrap();
        w.write_break().unwrap();
        let bytes = w.into_inner().into_vec();
        let mut r =
            Reader::new(SliceInput::new(&bytes), ValidationConfig::new(), Default::default()).unwrap();
        let v: Vec<i32> = Vec::decode(&mut r).unwrap();
        assert_eq!(v, alloc::vec![1, 2]);
    }

    #[test]
    fn btreemap_round_trips() {
        let mut m = BTreeMap::new();
        m.insert(alloc::string::String::from("a"), 1_i32);
        m.insert(alloc::string::String::from("b"), 2_i32);
        roundtrip(m);
    }

    #[test]
    fn tuple_round_trips() {
        roundtrip((1_i32, alloc::string::String::from("x"), true));
    }

    #[test]
    fn u64_over_long_round_trips_two_to_the_sixty_four() {
        let mut w = Writer::new(VecOutput::new(), false, ValidationConfig::new());
        crate::bignum::BigInt::from_i128(1_i128 << 64)
            .encode(&mut w)
            .unwrap();
        let bytes = w.into_inner().into_vec();
        assert_eq!(bytes[0], 0xc2);
    }
}
