//! The writer (C8): a stateful fluent facade over `Validator<Emitter<O>>`.
//! One method per [`Event`] kind; each returns `&mut Self` so a sequence of
//! writes reads as a single chained expression.

use crate::emitter::Emitter;
use crate::error::Error;
use crate::event::{Event, OverLong, SimpleValue, Tag};
use crate::io::Output;
use crate::receiver::Receiver;
use crate::validator::{ValidationConfig, Validator};

/// A stateful, typed push facade over `Validator<Emitter<O>>`.
#[derive(Debug, Clone)]
pub struct Writer<O> {
    validator: Validator<Emitter<O>>,
}

impl<O: Output> Writer<O> {
    /// Wrap `output`. `compress_floats` controls the emitter's float
    /// narrowing; `validation` wires a validator that rejects malformed
    /// write sequences before any bytes reach `output` — useful for
    /// catching encoder bugs, not required for correctness of a
    /// hand-written sequence of calls.
    #[must_use]
    pub fn new(output: O, compress_floats: bool, validation: ValidationConfig) -> Self {
        Self {
            validator: Validator::new(Emitter::new(output, compress_floats), validation),
        }
    }

    /// Unwrap, returning the underlying sink.
    pub fn into_inner(self) -> O {
        self.validator.into_inner().into_inner()
    }

    fn push(&mut self, event: Event<'_>) -> Result<&mut Self, Error> {
        self.validator.on_event(event)?;
        Ok(self)
    }

    /// Write `null`.
    ///
    /// # Errors
    /// Any validator/emitter failure.
    pub fn write_null(&mut self) -> Result<&mut Self, Error> {
        self.push(Event::Null)
    }

    /// Write `undefined`.
    ///
    /// # Errors
    /// Any validator/emitter failure.
    pub fn write_undefined(&mut self) -> Result<&mut Self, Error> {
        self.push(Event::Undefined)
    }

    /// Write a boolean.
    ///
    /// # Errors
    /// Any validator/emitter failure.
    pub fn write_bool(&mut self, v: bool) -> Result<&mut Self, Error> {
        self.push(Event::Bool(v))
    }

    /// Write a value fitting `i32`.
    ///
    /// # Errors
    /// Any validator/emitter failure.
    pub fn write_int(&mut self, v: i32) -> Result<&mut Self, Error> {
        self.push(Event::Int(v))
    }

    /// Write a value fitting `i64`.
    ///
    /// # Errors
    /// Any validator/emitter failure.
    pub fn write_long(&mut self, v: i64) -> Result<&mut Self, Error> {
        self.push(Event::Long(v))
    }

    /// Write a non-negative value whose magnitude exceeds `i64`.
    ///
    /// # Errors
    /// `ValidationFailure` if `v`'s high bit is clear (it would fit `i64`),
    /// or any other validator/emitter failure.
    pub fn write_pos_over_long(&mut self, v: OverLong) -> Result<&mut Self, Error> {
        self.push(Event::PosOverLong(v))
    }

    /// Write a negative value whose magnitude exceeds `i64`.
    ///
    /// # Errors
    /// Same as [`Writer::write_pos_over_long`].
    pub fn write_neg_over_long(&mut self, v: OverLong) -> Result<&mut Self, Error> {
        self.push(Event::NegOverLong(v))
    }

    /// Write a half-precision float verbatim (no compression applies).
    ///
    /// # Errors
    /// Any validator/emitter failure.
    pub fn write_float16(&mut self, v: half::f16) -> Result<&mut Self, Error> {
        self.push(Event::Float16(v))
    }

    /// Write a single-precision float, narrowed to half if it fits and
    /// compression is enabled.
    ///
    /// # Errors
    /// Any validator/emitter failure.
    pub fn write_float32(&mut self, v: f32) -> Result<&mut Self, Error> {
        self.push(Event::Float(v))
    }

    /// Write a double-precision float, narrowed to single (and from there
    /// to half) if it fits and compression is enabled.
    ///
    /// # Errors
    /// Any validator/emitter failure.
    pub fn write_float64(&mut self, v: f64) -> Result<&mut Self, Error> {
        self.push(Event::Double(v))
    }

    /// Write a definite-length byte string.
    ///
    /// # Errors
    /// Any validator/emitter failure.
    pub fn write_bytes(&mut self, v: &[u8]) -> Result<&mut Self, Error> {
        self.push(Event::Bytes(v))
    }

    /// Begin an indefinite-length byte string.
    ///
    /// # Errors
    /// `Unsupported` if the validator disallows indefinite lengths.
    pub fn write_bytes_start(&mut self) -> Result<&mut Self, Error> {
        self.push(Event::BytesStart)
    }

    /// Write a definite-length UTF-8 text string.
    ///
    /// # Errors
    /// Any validator/emitter failure.
    pub fn write_text(&mut self, v: &str) -> Result<&mut Self, Error> {
        self.push(Event::Text(v))
    }

    /// Alias for [`Writer::write_text`]: writes `s`'s UTF-8 bytes as text.
    ///
    /// # Errors
    /// Any validator/emitter failure.
    pub fn write_string(&mut self, s: &str) -> Result<&mut Self, Error> {
        self.write_text(s)
    }

    /// Begin an indefinite-length UTF-8 text string.
    ///
    /// # Errors
    /// `Unsupported` if the validator disallows indefinite lengths.
    pub fn write_text_start(&mut self) -> Result<&mut Self, Error> {
        self.push(Event::TextStart)
    }

    /// Write a definite-length array header declaring `len` elements.
    ///
    /// # Errors
    /// `Unsupported` if `len` exceeds the configured cap.
    pub fn write_array_header(&mut self, len: u64) -> Result<&mut Self, Error> {
        self.push(Event::ArrayHeader(len))
    }

    /// Begin an indefinite-length array.
    ///
    /// # Errors
    /// `Unsupported` if the validator disallows indefinite lengths.
    pub fn write_array_start(&mut self) -> Result<&mut Self, Error> {
        self.push(Event::ArrayStart)
    }

    /// Write a definite-length map header declaring `len` pairs.
    ///
    /// # Errors
    /// `Unsupported` if `len` exceeds the configured cap.
    pub fn write_map_header(&mut self, len: u64) -> Result<&mut Self, Error> {
        self.push(Event::MapHeader(len))
    }

    /// Begin an indefinite-length map.
    ///
    /// # Errors
    /// `Unsupported` if the validator disallows indefinite lengths.
    pub fn write_map_start(&mut self) -> Result<&mut Self, Error> {
        self.push(Event::MapStart)
    }

    /// Terminate the innermost open indefinite-length container.
    ///
    /// # Errors
    /// `UnexpectedDataItem` if the innermost level isn't indefinite, or (for
    /// maps) an odd number of sub-items has been written.
    pub fn write_break(&mut self) -> Result<&mut Self, Error> {
        self.push(Event::Break)
    }

    /// Write a semantic tag annotating the item written next.
    ///
    /// # Errors
    /// Any validator/emitter failure.
    pub fn write_tag(&mut self, tag: Tag) -> Result<&mut Self, Error> {
        self.push(Event::Tag(tag))
    }

    /// Write a CBOR simple value.
    ///
    /// # Errors
    /// Any validator/emitter failure (`SimpleValue` itself already excludes
    /// the reserved `24..=31` range at construction).
    pub fn write_simple_value(&mut self, v: SimpleValue) -> Result<&mut Self, Error> {
        self.push(Event::SimpleValue(v))
    }

    /// Mark the end of the written sequence, flushing the validator's
    /// "all containers closed" check. Writes no bytes.
    ///
    /// # Errors
    /// `InsufficientInput` if a container is still open.
    pub fn write_end_of_input(&mut self) -> Result<&mut Self, Error> {
        self.push(Event::EndOfInput)
    }

    /// Dispatch to `T`'s encoder.
    ///
    /// # Errors
    /// Whatever `T::encode` returns.
    #[cfg(feature = "alloc")]
    pub fn write<T: crate::codec::CborEncode + ?Sized>(
        &mut self,
        value: &T,
    ) -> Result<&mut Self, Error> {
        value.encode(self)?;
        Ok(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::io::VecOutput;

    fn write_all(f: impl FnOnce(&mut Writer<VecOutput>) -> Result<(), Error>) -> alloc::vec::Vec<u8> {
        let mut w = Writer::new(VecOutput::new(), false, ValidationConfig::new());
        f(&mut w).unwrap();
        w.into_inner().into_vec()
    }

    #[test]
    fn fluent_chain_builds_array() {
        let bytes = write_all(|w| {
            w.write_array_header(3)?
                .write_int(1)?
                .write_int(2)?
                .write_int(3)?;
            Ok(())
        });
        assert_eq!(bytes, [0x83, 0x01, 0x02, 0x03]);
    }

    #[test]
    fn indefinite_map_round_trips_literal_scenario() {
        let bytes = write_all(|w| {
            w.write_map_start()?
                .write_text("a")?
                .write_int(1)?
                .write_text("b")?
                .write_int(2)?
                .write_break()?;
            Ok(())
        });
        assert_eq!(
            bytes,
            [0xbf, 0x61, 0x61, 0x01, 0x61, 0x62, 0x02, 0xff]
        );
    }

    #[test]
    fn mismatched_break_is_rejected() {
        let mut w = Writer::new(VecOutput::new(), false, ValidationConfig::new());
        w.write_array_header(1).unwrap();
        assert!(w.write_break().is_err());
    }
}
