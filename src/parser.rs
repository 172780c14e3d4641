//! The parser (C4): reads bytes from an [`Input`], decodes one data item
//! per call, and pushes it into a [`Receiver`]. Stateless over the input —
//! all state lives in the `Input` cursor itself, which is what makes
//! reader save/restore an O(1) operation.

use crate::error::{Error, ErrorKind};
use crate::event::{Event, OverLong, SimpleValue, Tag};
use crate::io::Input;
use crate::receiver::Receiver;

const MAJOR_UINT: u8 = 0;
const MAJOR_NEG: u8 = 1;
const MAJOR_BYTES: u8 = 2;
const MAJOR_TEXT: u8 = 3;
const MAJOR_ARRAY: u8 = 4;
const MAJOR_MAP: u8 = 5;
const MAJOR_TAG: u8 = 6;
const MAJOR_SIMPLE: u8 = 7;

/// A stateless CBOR byte-stream decoder. See [`Parser::pull`].
#[derive(Debug, Default, Clone, Copy)]
pub struct Parser;

impl Parser {
    /// Construct a parser. Stateless — every call is independent.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }

    /// Read one CBOR data item from `input` and push it to `receiver`.
    ///
    /// If `input` is already exhausted, pushes `Event::EndOfInput` instead
    /// of reading a head byte.
    ///
    /// # Errors
    /// `InsufficientInput` on truncation, `InvalidCborData` for a head byte
    /// with no legal decoding, or whatever `receiver` itself returns.
    pub fn pull<I: Input, R: Receiver>(&self, input: &mut I, receiver: &mut R) -> Result<(), Error> {
        if !input.has_bytes(1) {
            return receiver.on_event(Event::EndOfInput);
        }

        let off = input.position();
        let head = input.read_byte()?;
        let major = head >> 5;
        let ai = head & 0x1f;

        match major {
            MAJOR_UINT => {
                let v = read_uint(input, ai, off)?;
                receiver.on_event(make_positive(v))
            }
            MAJOR_NEG => {
                let v = read_uint(input, ai, off)?;
                receiver.on_event(make_negative(v))
            }
            MAJOR_BYTES => {
                if ai == 31 {
                    receiver.on_event(Event::BytesStart)
                } else {
                    let len = read_len(input, ai, off)?;
                    let bytes = input.read_bytes(len)?;
                    receiver.on_event(Event::Bytes(bytes))
                }
            }
            MAJOR_TEXT => {
                if ai == 31 {
                    receiver.on_event(Event::TextStart)
                } else {
                    let len = read_len(input, ai, off)?;
                    let raw = input.read_bytes(len)?;
                    let s = crate::utf8::trusted(raw)
                        .map_err(|()| Error::new(ErrorKind::InvalidCborData, off))?;
                    receiver.on_event(Event::Text(s))
                }
            }
            MAJOR_ARRAY => {
                if ai == 31 {
                    receiver.on_event(Event::ArrayStart)
                } else {
                    let len = read_uint(input, ai, off)?;
                    receiver.on_event(Event::ArrayHeader(len))
                }
            }
            MAJOR_MAP => {
                if ai == 31 {
                    receiver.on_event(Event::MapStart)
                } else {
                    let len = read_uint(input, ai, off)?;
                    receiver.on_event(Event::MapHeader(len))
                }
            }
            MAJOR_TAG => {
                let code = read_uint(input, ai, off)?;
                receiver.on_event(Event::Tag(Tag::from_code(code)))
            }
            MAJOR_SIMPLE => read_major7(input, ai, off, receiver),
            _ => unreachable!("major type is a 3-bit field"),
        }
    }
}

fn make_positive(v: u64) -> Event<'static> {
    if let Ok(i) = i32::try_from(v) {
        Event::Int(i)
    } else if let Ok(l) = i64::try_from(v) {
        Event::Long(l)
    } else {
        Event::PosOverLong(OverLong(v))
    }
}

fn make_negative(magnitude: u64) -> Event<'static> {
    // wire magnitude n represents the value -1 - n.
    if let Ok(n) = i64::try_from(magnitude) {
        if let Some(v) = n.checked_neg().and_then(|v| v.checked_sub(1)) {
            if let Ok(i) = i32::try_from(v) {
                return Event::Int(i);
            }
            return Event::Long(v);
        }
    }
    Event::NegOverLong(OverLong(magnitude))
}

fn read_uint<I: Input>(input: &mut I, ai: u8, off: usize) -> Result<u64, Error> {
    match ai {
        0..=23 => Ok(u64::from(ai)),
        24 => Ok(u64::from(input.read_byte()?)),
        25 => Ok(u64::from(input.read_be_u16()?)),
        26 => Ok(u64::from(input.read_be_u32()?)),
        27 => input.read_be_u64(),
        _ => Err(Error::new(ErrorKind::InvalidCborData, off)),
    }
}

fn read_len<I: Input>(input: &mut I, ai: u8, off: usize) -> Result<usize, Error> {
    let v = read_uint(input, ai, off)?;
    usize::try_from(v).map_err(|_| Error::new(ErrorKind::Overflow, off))
}

fn read_major7<I: Input, R: Receiver>(
    input: &mut I,
    ai: u8,
    off: usize,
    receiver: &mut R,
) -> Result<(), Error> {
    match ai {
        0..=19 => {
            // SimpleValue::new rejects 24..=31, which read_major7 never passes here.
            let sv = SimpleValue::new(ai).expect("ai in 0..=19 is always a legal simple value");
            receiver.on_event(Event::SimpleValue(sv))
        }
        20 => receiver.on_event(Event::Bool(false)),
        21 => receiver.on_event(Event::Bool(true)),
        22 => receiver.on_event(Event::Null),
        23 => receiver.on_event(Event::Undefined),
        24 => {
            let raw = input.read_byte()?;
            match SimpleValue::new(raw) {
                Some(sv) => receiver.on_event(Event::SimpleValue(sv)),
                None => Err(Error::new(ErrorKind::InvalidCborData, off)),
            }
        }
        25 => {
            let bits = input.read_be_u16()?;
            receiver.on_event(Event::Float16(half::f16::from_bits(bits)))
        }
        26 => {
            let bits = input.read_be_u32()?;
            receiver.on_event(Event::Float(f32::from_bits(bits)))
        }
        27 => {
            let bits = input.read_be_u64()?;
            receiver.on_event(Event::Double(f64::from_bits(bits)))
        }
        31 => receiver.on_event(Event::Break),
        _ => Err(Error::new(ErrorKind::InvalidCborData, off)),
    }
}

#[cfg(all(test, feature = "alloc"))]
mod tests {
    use super::*;
    use crate::buffer::BufferingReceiver;
    use crate::io::SliceInput;

    fn assert_pulls_to(bytes: &[u8], expected: Event<'_>) {
        let parser = Parser::new();
        let mut input = SliceInput::new(bytes);
        let mut buf = BufferingReceiver::new();
        parser.pull(&mut input, &mut buf).unwrap();
        assert_eq!(buf.event(), Some(expected));
    }

    #[test]
    fn decodes_int_42() {
        assert_pulls_to(&[0x18, 0x2a], Event::Int(42));
    }

    #[test]
    fn decodes_negative_one() {
        assert_pulls_to(&[0x20], Event::Int(-1));
    }

    #[test]
    fn decodes_array_header() {
        assert_pulls_to(&[0x83], Event::ArrayHeader(3));
    }

    #[test]
    fn empty_input_emits_end_of_input() {
        assert_pulls_to(&[], Event::EndOfInput);
    }

    #[test]
    fn decodes_indefinite_map_start() {
        assert_pulls_to(&[0xbf], Event::MapStart);
    }
}
