//! The emitter (C3): a stateless `Receiver` that writes CBOR bytes to an
//! [`Output`]. Encapsulates integer-head packing and optional float
//! narrowing; holds no state of its own beyond the sink and a float
//! compression flag fixed at construction.

use crate::error::{Error, ErrorKind};
use crate::event::{Event, OverLong, Tag};
use crate::io::Output;
use crate::receiver::Receiver;

const MAJOR_UINT: u8 = 0;
const MAJOR_NEG: u8 = 1;
const MAJOR_BYTES: u8 = 2;
const MAJOR_TEXT: u8 = 3;
const MAJOR_ARRAY: u8 = 4;
const MAJOR_MAP: u8 = 5;
const MAJOR_TAG: u8 = 6;
const MAJOR_SIMPLE: u8 = 7;

const AI_BYTES_START: u8 = 0x5f;
const AI_TEXT_START: u8 = 0x7f;
const AI_ARRAY_START: u8 = 0x9f;
const AI_MAP_START: u8 = 0xbf;
const AI_BREAK: u8 = 0xff;

/// Write the minimal-length head for `major` (0..=7) carrying `value` in
/// its additional-info/payload. Chooses the shortest of the five legal
/// forms (inline 0..23, then 1/2/4/8 trailing bytes).
fn write_head<O: Output>(out: &mut O, major: u8, value: u64) -> Result<(), Error> {
    debug_assert!(major <= 7);
    let top = major << 5;
    if value < 24 {
        return out.write_byte(top | value as u8);
    }
    if value <= u64::from(u8::MAX) {
        out.write_byte(top | 24)?;
        return out.write_byte(value as u8);
    }
    if value <= u64::from(u16::MAX) {
        out.write_byte(top | 25)?;
        return out.write_short(value as u16);
    }
    if value <= u64::from(u32::MAX) {
        out.write_byte(top | 26)?;
        return out.write_int(value as u32);
    }
    out.write_byte(top | 27)?;
    out.write_long(value)
}

/// A `Receiver` that serializes each event to its minimal CBOR byte
/// encoding over an [`Output`].
#[derive(Debug, Clone)]
pub struct Emitter<O> {
    output: O,
    compress_floats: bool,
}

impl<O: Output> Emitter<O> {
    /// Wrap `output`. `compress_floats` mirrors
    /// `EncodeConfig::dont_compress_floating_point_values` negated: when
    /// `true`, `Float`/`Double` events are narrowed to the smallest
    /// precision that round-trips exactly.
    #[must_use]
    pub const fn new(output: O, compress_floats: bool) -> Self {
        Self {
            output,
            compress_floats,
        }
    }

    /// Unwrap, returning the underlying sink.
    pub fn into_inner(self) -> O {
        self.output
    }

    /// The underlying sink.
    pub const fn inner(&self) -> &O {
        &self.output
    }

    /// The underlying sink, mutably.
    pub fn inner_mut(&mut self) -> &mut O {
        &mut self.output
    }

    fn write_int(&mut self, v: i64) -> Result<(), Error> {
        if v >= 0 {
            write_head(&mut self.output, MAJOR_UINT, v as u64)
        } else {
            let magnitude = (-1_i128 - i128::from(v)) as u128;
            write_head(&mut self.output, MAJOR_NEG, magnitude as u64)
        }
    }

    fn write_over_long(&mut self, major: u8, v: OverLong) -> Result<(), Error> {
        if !v.is_valid() {
            return Err(Error::new(
                ErrorKind::ValidationFailure,
                self.output.position(),
            ));
        }
        self.output.write_byte((major << 5) | 27)?;
        self.output.write_long(v.0)
    }

    fn write_float16(&mut self, v: half::f16) -> Result<(), Error> {
        self.output.write_byte(0xf9)?;
        self.output.write_short(v.to_bits())
    }

    fn write_float32(&mut self, v: f32) -> Result<(), Error> {
        self.output.write_byte(0xfa)?;
        self.output.write_int(v.to_bits())
    }

    fn write_float64(&mut self, v: f64) -> Result<(), Error> {
        self.output.write_byte(0xfb)?;
        self.output.write_long(v.to_bits())
    }

    fn write_length_prefixed(&mut self, major: u8, bytes: &[u8]) -> Result<(), Error> {
        write_head(&mut self.output, major, bytes.len() as u64)?;
        self.output.write_bytes(bytes)
    }

    fn write_container_header(&mut self, major: u8, len: u64) -> Result<(), Error> {
        write_head(&mut self.output, major, len)
    }
}

impl<O: Output> Receiver for Emitter<O> {
    #[allow(clippy::too_many_lines)]
    fn on_event(&mut self, event: Event<'_>) -> Result<(), Error> {
        match event {
            Event::Null => self.output.write_byte(0xf6),
            Event::Undefined => self.output.write_byte(0xf7),
            Event::Bool(false) => self.output.write_byte(0xf4),
            Event::Bool(true) => self.output.write_byte(0xf5),
            Event::Int(v) => self.write_int(i64::from(v)),
            Event::Long(v) => self.write_int(v),
            Event::PosOverLong(v) => self.write_over_long(MAJOR_UINT, v),
            Event::NegOverLong(v) => self.write_over_long(MAJOR_NEG, v),
            Event::Float16(v) => self.write_float16(v),
            Event::Float(v) => {
                if self.compress_floats && fits_in_float16(v) {
                    self.write_float16(half::f16::from_f32(v))
                } else {
                    self.write_float32(v)
                }
            }
            Event::Double(v) => {
                if self.compress_floats && fits_in_float(v) {
                    let narrowed = v as f32;
                    if self.compress_floats && fits_in_float16(narrowed) {
                        self.write_float16(half::f16::from_f32(narrowed))
                    } else {
                        self.write_float32(narrowed)
                    }
                } else {
                    self.write_float64(v)
                }
            }
            Event::Bytes(b) => self.write_length_prefixed(MAJOR_BYTES, b),
            Event::Text(s) => self.write_length_prefixed(MAJOR_TEXT, s.as_bytes()),
            Event::BytesStart => self.output.write_byte(AI_BYTES_START),
            Event::TextStart => self.output.write_byte(AI_TEXT_START),
            Event::ArrayHeader(n) => self.write_container_header(MAJOR_ARRAY, n),
            Event::ArrayStart => self.output.write_byte(AI_ARRAY_START),
            Event::MapHeader(n) => self.write_container_header(MAJOR_MAP, n),
            Event::MapStart => self.output.write_byte(AI_MAP_START),
            Event::Break => self.output.write_byte(AI_BREAK),
            Event::Tag(tag) => write_head(&mut self.output, MAJOR_TAG, tag.code()),
            Event::SimpleValue(sv) => {
                let v = sv.value();
                if v <= 23 {
                    self.output.write_byte((MAJOR_SIMPLE << 5) | v)
                } else {
                    self.output.write_byte((MAJOR_SIMPLE << 5) | 24)?;
                    self.output.write_byte(v)
                }
            }
            Event::EndOfInput => Ok(()),
        }
    }
}

/// `d.is_nan() || (d as f32 as f64) == d` — `d` survives a round trip
/// through single precision.
#[must_use]
pub fn fits_in_float(d: f64) -> bool {
    d.is_nan() || (f64::from(d as f32) == d)
}

/// A 32-bit float whose mantissa's low 13 bits are zero and whose exponent
/// either is a special value (0 or 255) or fits in `half`'s 5-bit exponent
/// field after rebiasing. Equivalently: `f` survives a round trip through
/// `half::f16`.
#[must_use]
pub fn fits_in_float16(f: f32) -> bool {
    if f.is_nan() {
        return true;
    }
    let narrowed = half::f16::from_f32(f);
    narrowed.to_f32() == f
}

#[cfg(all(test, feature = "alloc"))]
mod tests {
    use super::*;
    use crate::io::VecOutput;

    fn emit_all(events: &[Event<'_>], compress: bool) -> alloc::vec::Vec<u8> {
        let mut emitter = Emitter::new(VecOutput::new(), compress);
        for e in events {
            emitter.on_event(*e).unwrap();
        }
        emitter.into_inner().into_vec()
    }

    #[test]
    fn int_42_is_two_bytes() {
        assert_eq!(emit_all(&[Event::Long(42)], false), [0x18, 0x2a]);
    }

    #[test]
    fn negative_one_is_one_byte() {
        assert_eq!(emit_all(&[Event::Long(-1)], false), [0x20]);
    }

    #[test]
    fn array_header_then_elements() {
        assert_eq!(
            emit_all(
                &[
                    Event::ArrayHeader(3),
                    Event::Long(1),
                    Event::Long(2),
                    Event::Long(3)
                ],
                false
            ),
            [0x83, 0x01, 0x02, 0x03]
        );
    }

    #[test]
    fn float_compression_narrows_to_float16() {
        let bytes = emit_all(&[Event::Float(1.5)], true);
        assert_eq!(bytes.len(), 3);
        assert_eq!(bytes[0], 0xf9);
    }

    #[test]
    fn float_compression_off_keeps_full_width() {
        let bytes = emit_all(&[Event::Float(1.5)], false);
        assert_eq!(bytes.len(), 5);
        assert_eq!(bytes[0], 0xfa);
    }

    #[test]
    fn double_compression_narrows_through_float_to_half() {
        let bytes = emit_all(&[Event::Double(1.5)], true);
        assert_eq!(bytes.len(), 3);
        assert_eq!(bytes[0], 0xf9);
    }

    #[test]
    fn double_no_compression_stays_nine_bytes() {
        let bytes = emit_all(&[Event::Double(core::f64::consts::PI)], false);
        assert_eq!(bytes.len(), 9);
        assert_eq!(bytes[0], 0xfb);
    }

    #[test]
    fn over_long_requires_valid_high_bit() {
        let mut emitter = Emitter::new(VecOutput::new(), false);
        assert!(emitter
            .on_event(Event::PosOverLong(OverLong(0)))
            .is_err());
    }
}
