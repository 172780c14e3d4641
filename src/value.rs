//! An optional, owned tree representation of a CBOR data item (`spec.md`
//! §6's DOM). `Element` has exactly one encoder and one decoder, and both
//! walk the tree through the public [`Writer`]/[`Reader`] surface — no
//! private access to the emitter or parser.

use alloc::boxed::Box;
use alloc::string::String;
use alloc::vec::Vec;

use crate::error::{Error, ErrorKind, Expectation};
use crate::event::{OverLong, SimpleValue, Tag};
use crate::io::{Input, Output};
use crate::reader::Reader;
use crate::writer::Writer;

/// A non-container CBOR value: everything `Element` can hold that isn't an
/// `Array`, `Map`, or `Tagged`.
#[derive(Debug, Clone, PartialEq)]
pub enum Scalar {
    /// `null`.
    Null,
    /// `undefined`.
    Undefined,
    /// A boolean.
    Bool(bool),
    /// A signed integer fitting `i64`.
    Int(i64),
    /// An unsigned magnitude too large for `i64`: `(negative, magnitude)`.
    OverLong(bool, OverLong),
    /// A half-precision float.
    Float16(half::f16),
    /// A single-precision float.
    Float(f32),
    /// A double-precision float.
    Double(f64),
    /// A byte string.
    Bytes(Vec<u8>),
    /// A UTF-8 text string.
    Text(String),
    /// A CBOR simple value outside `Bool`/`Null`/`Undefined`.
    Simple(SimpleValue),
}

/// A CBOR data item held as an owned tree: `Value(scalar)`, `Array`, `Map`,
/// or `Tagged`.
#[derive(Debug, Clone, PartialEq)]
pub enum Element {
    /// A non-container value.
    Value(Scalar),
    /// An array. `indefinite` records whether to write it as
    /// `ArrayStart`/`Break` rather than a definite-length `ArrayHeader`.
    Array(Vec<Element>, bool),
    /// A map. `indefinite` records whether to write it as
    /// `MapStart`/`Break` rather than a definite-length `MapHeader`.
    /// Entries keep insertion order; duplicate keys are the caller's
    /// concern, not this type's — decoding never produces them since the
    /// underlying typed reads already resolve duplicates.
    Map(Vec<(Element, Element)>, bool),
    /// A tag annotating a nested element.
    Tagged(Tag, Box<Element>),
}

impl Element {
    /// Shorthand for `Element::Value(Scalar::Null)`.
    #[must_use]
    pub const fn null() -> Self {
        Self::Value(Scalar::Null)
    }

    /// Shorthand for `Element::Value(Scalar::Bool(v))`.
    #[must_use]
    pub const fn bool(v: bool) -> Self {
        Self::Value(Scalar::Bool(v))
    }

    /// Shorthand for `Element::Value(Scalar::Int(v))`.
    #[must_use]
    pub const fn int(v: i64) -> Self {
        Self::Value(Scalar::Int(v))
    }

    /// Shorthand for `Element::Value(Scalar::Text(v.into()))`.
    #[must_use]
    pub fn text(v: impl Into<String>) -> Self {
        Self::Value(Scalar::Text(v.into()))
    }

    /// Shorthand for `Element::Value(Scalar::Bytes(v.into()))`.
    #[must_use]
    pub fn bytes(v: impl Into<Vec<u8>>) -> Self {
        Self::Value(Scalar::Bytes(v.into()))
    }

    /// Write this element (and its full subtree) through `w`.
    ///
    /// # Errors
    /// Whatever the underlying `Writer` calls fail with.
    pub fn write<O: Output>(&self, w: &mut Writer<O>) -> Result<(), Error> {
        match self {
            Self::Value(scalar) => write_scalar(w, scalar),
            Self::Array(items, indefinite) => {
                if *indefinite {
                    w.write_array_start()?;
                    for item in items {
                        item.write(w)?;
                    }
                    w.write_break()?;
                } else {
                    w.write_array_header(items.len() as u64)?;
                    for item in items {
                        item.write(w)?;
                    }
                }
                Ok(())
            }
            Self::Map(entries, indefinite) => {
                if *indefinite {
                    w.write_map_start()?;
                    for (k, v) in entries {
                        k.write(w)?;
                        v.write(w)?;
                    }
                    w.write_break()?;
                } else {
                    w.write_map_header(entries.len() as u64)?;
                    for (k, v) in entries {
                        k.write(w)?;
                        v.write(w)?;
                    }
                }
                Ok(())
            }
            Self::Tagged(tag, inner) => {
                w.write_tag(*tag)?;
                inner.write(w)
            }
        }
    }

    /// Read one element (and its full subtree) through `r`.
    ///
    /// # Errors
    /// `UnexpectedDataItem` if the buffered item doesn't start a recognized
    /// shape, or whatever the underlying `Reader` calls fail with.
    pub fn read<I: Input>(r: &mut Reader<I>) -> Result<Self, Error> {
        if r.has_tag() {
            let tag = r.read_tag()?;
            let inner = Self::read(r)?;
            return Ok(Self::Tagged(tag, Box::new(inner)));
        }
        if r.has_array_header() {
            let len = r.read_array_header()?;
            let len = usize::try_from(len).map_err(|_| Error::new(ErrorKind::Overflow, r.position()))?;
            let mut items = Vec::new();
            items
                .try_reserve_exact(len)
                .map_err(|_| Error::new(ErrorKind::Overflow, r.position()))?;
            for _ in 0..len {
                items.push(Self::read(r)?);
            }
            return Ok(Self::Array(items, false));
        }
        if r.has_array_start() {
            r.read_array_start()?;
            let mut items = Vec::new();
            while !r.try_read_break()? {
                items.push(Self::read(r)?);
            }
            return Ok(Self::Array(items, true));
        }
        if r.has_map_header() {
            let len = r.read_map_header()?;
            let mut entries = Vec::new();
            for _ in 0..len {
                let k = Self::read(r)?;
                let v = Self::read(r)?;
                entries.push((k, v));
            }
            return Ok(Self::Map(entries, false));
        }
        if r.has_map_start() {
            r.read_map_start()?;
            let mut entries = Vec::new();
            while !r.try_read_break()? {
                let k = Self::read(r)?;
                let v = Self::read(r)?;
                entries.push((k, v));
            }
            return Ok(Self::Map(entries, true));
        }
        read_scalar(r).map(Self::Value)
    }
}

fn write_scalar<O: Output>(w: &mut Writer<O>, scalar: &Scalar) -> Result<(), Error> {
    match scalar {
        Scalar::Null => {
            w.write_null()?;
        }
        Scalar::Undefined => {
            w.write_undefined()?;
        }
        Scalar::Bool(v) => {
            w.write_bool(*v)?;
        }
        Scalar::Int(v) => {
            w.write_long(*v)?;
        }
        Scalar::OverLong(negative, v) => {
            if *negative {
                w.write_neg_over_long(*v)?;
            } else {
                w.write_pos_over_long(*v)?;
            }
        }
        Scalar::Float16(v) => {
            w.write_float16(*v)?;
        }
        Scalar::Float(v) => {
            w.write_float32(*v)?;
        }
        Scalar::Double(v) => {
            w.write_float64(*v)?;
        }
        Scalar::Bytes(v) => {
            w.write_bytes(v)?;
        }
        Scalar::Text(v) => {
            w.write_text(v)?;
        }
        Scalar::Simple(v) => {
            w.write_simple_value(*v)?;
        }
    }
    Ok(())
}

fn read_scalar<I: Input>(r: &mut Reader<I>) -> Result<Scalar, Error> {
    if r.has_null() {
        r.read_null()?;
        return Ok(Scalar::Null);
    }
    if r.has_bool() {
        return Ok(Scalar::Bool(r.read_bool()?));
    }
    if r.has_long() {
        return Ok(Scalar::Int(r.read_long()?));
    }
    if r.has_over_long() {
        let (negative, v) = r.read_over_long()?;
        return Ok(Scalar::OverLong(negative, v));
    }
    if r.has_float16() {
        return Ok(Scalar::Float16(r.read_float16()?));
    }
    if r.current_kind() == Some(crate::event::Kind::FLOAT) {
        return Ok(Scalar::Float(r.read_float()?));
    }
    if r.current_kind() == Some(crate::event::Kind::DOUBLE) {
        return Ok(Scalar::Double(r.read_double()?));
    }
    if r.has_bytes() {
        return Ok(Scalar::Bytes(r.read_bytes()?));
    }
    if r.current_kind() == Some(crate::event::Kind::BYTES_START) {
        return Ok(Scalar::Bytes(r.read_unsized_bytes()?));
    }
    if r.has_text() {
        return Ok(Scalar::Text(r.read_text()?));
    }
    if r.current_kind() == Some(crate::event::Kind::TEXT_START) {
        return Ok(Scalar::Text(r.read_unsized_text()?));
    }
    if r.has_simple_value() {
        return Ok(Scalar::Simple(r.read_simple_value()?));
    }
    if r.has_undefined() {
        r.read_undefined()?;
        return Ok(Scalar::Undefined);
    }
    Err(Error::unexpected(Expectation::AnyDataItem, r.position()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::io::{SliceInput, VecOutput};
    use crate::validator::ValidationConfig;

    fn roundtrip(e: Element) -> Element {
        let mut w = Writer::new(VecOutput::new(), false, ValidationConfig::new());
        e.write(&mut w).unwrap();
        let bytes = w.into_inner().into_vec();
        let mut r =
            Reader::new(SliceInput::new(&bytes), ValidationConfig::new(), Default::default()).unwrap();
        Element::read(&mut r).unwrap()
    }

    #[test]
    fn scalar_round_trips() {
        assert_eq!(roundtrip(Element::null()), Element::null());
        assert_eq!(roundtrip(Element::int(42)), Element::int(42));
        assert_eq!(roundtrip(Element::text("hi")), Element::text("hi"));
        assert_eq!(roundtrip(Element::bytes(alloc::vec![1, 2, 3])), Element::bytes(alloc::vec![1, 2, 3]));
    }

    #[test]
    fn definite_array_round_trips() {
        let e = Element::Array(alloc::vec![Element::int(1), Element::int(2)], false);
        assert_eq!(roundtrip(e.clone()), e);
    }

    #[test]
    fn indefinite_map_round_trips_and_preserves_flag() {
        let e = Element::Map(
            alloc::vec![(Element::text("a"), Element::int(1))],
            true,
        );
        let back = roundtrip(e);
        match back {
            Element::Map(entries, indefinite) => {
                assert!(indefinite);
                assert_eq!(entries.len(), 1);
            }
            _ => panic!("expected a map"),
        }
    }

    #[test]
    fn tagged_element_round_trips() {
        let e = Element::Tagged(Tag::PositiveBigNum, Box::new(Element::bytes(alloc::vec![1])));
        assert_eq!(roundtrip(e.clone()), e);
    }
}
