//! The reader (C7): a pull-based typed view over a [`Parser`] feeding a
//! [`Validator`]-wrapped [`BufferingReceiver`]. Maintains one-item
//! look-ahead — `pull` always leaves exactly one item buffered (or none,
//! past `EndOfInput`) — and a cheap save/restore mechanism for the rare
//! decoders that need to look further ahead than one item
//! (`try_read::<T>`, or distinguishing a tagged big-decimal shape).

use crate::buffer::BufferingReceiver;
use crate::error::{Error, ErrorKind, Expectation};
use crate::event::{Event, Kind, OverLong, SimpleValue, Tag};
use crate::io::Input;
use crate::parser::Parser;
use crate::receiver::Receiver;
use crate::validator::{ValidationConfig, Validator};
use alloc::string::String;
use alloc::vec::Vec;

/// Numeric-widening policy for typed reads, mirroring `DecodeConfig`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReaderConfig {
    /// If `false` (the default), a buffered `Float16` item also satisfies
    /// `has_float`/`has_double`.
    pub read_float16_only_as_float16: bool,
    /// If `false` (the default), a buffered `Float` item also satisfies
    /// `has_double`.
    pub read_float_only_as_float: bool,
}

impl ReaderConfig {
    /// Widening enabled for both precisions (the documented default).
    #[must_use]
    pub const fn new() -> Self {
        Self {
            read_float16_only_as_float16: false,
            read_float_only_as_float: false,
        }
    }
}

impl Default for ReaderConfig {
    fn default() -> Self {
        Self::new()
    }
}

/// An immutable snapshot of a `Reader`'s observable state: input cursor,
/// buffered item, and validator nesting state. Restoring one is exact: the
/// cursor position is just an index, so the snapshot is O(1).
#[derive(Debug, Clone)]
pub struct SavedState {
    position: usize,
    buffer: BufferingReceiver,
    validator: Validator<()>,
}

/// A unit `Receiver` used to let `Validator`'s level stack be cloned
/// independently of the buffer it normally forwards to — the reader holds
/// the buffer directly (see the crate's design notes on avoiding a
/// `target`-chain walk) and re-attaches it after cloning the validator's
/// structural state.
impl Receiver for () {
    fn on_event(&mut self, _event: Event<'_>) -> Result<(), Error> {
        Ok(())
    }
}

/// A pull-based, typed view over a CBOR byte stream.
#[derive(Debug, Clone)]
pub struct Reader<I> {
    input: I,
    parser: Parser,
    validator: Validator<()>,
    buffer: BufferingReceiver,
    config: ReaderConfig,
}

/// A chain receiver that forwards to a validator and then stores the
/// result in a buffer, used only inside `pull` to keep the two pieces of
/// state (`validator`, `buffer`) independently accessible the rest of the
/// time.
struct Chain<'a> {
    validator: &'a mut Validator<()>,
    buffer: &'a mut BufferingReceiver,
}

impl<'a> Receiver for Chain<'a> {
    fn on_event(&mut self, event: Event<'_>) -> Result<(), Error> {
        self.validator.on_event(event)?;
        self.buffer.on_event(event)
    }
}

impl<I: Input> Reader<I> {
    /// Construct a reader over `input`, pulling the first item immediately.
    ///
    /// # Errors
    /// Whatever the first `pull()` can fail with.
    pub fn new(input: I, validation: ValidationConfig, config: ReaderConfig) -> Result<Self, Error> {
        let mut reader = Self {
            input,
            parser: Parser::new(),
            validator: Validator::new((), validation),
            buffer: BufferingReceiver::new(),
            config,
        };
        reader.pull()?;
        Ok(reader)
    }

    /// Clear the buffer and read the next item through parser → validator
    /// → buffer.
    ///
    /// # Errors
    /// Any parser or validator failure.
    pub fn pull(&mut self) -> Result<(), Error> {
        self.buffer.clear();
        let mut chain = Chain {
            validator: &mut self.validator,
            buffer: &mut self.buffer,
        };
        self.parser.pull(&mut self.input, &mut chain)
    }

    /// The currently buffered item's kind, if any.
    #[must_use]
    pub fn current_kind(&self) -> Option<Kind> {
        self.buffer.kind()
    }

    /// The currently buffered item, if any.
    #[must_use]
    pub fn data_item(&self) -> Option<Event<'_>> {
        self.buffer.event()
    }

    /// The residual byte offset of the underlying input.
    #[must_use]
    pub fn position(&self) -> usize {
        self.input.position()
    }

    fn error(&self, expectation: Expectation) -> Error {
        Error::unexpected(expectation, 0)
    }

    // ---- Null / Undefined / Bool -----------------------------------

    /// `true` if the buffered item is `Null`.
    #[must_use]
    pub fn has_null(&self) -> bool {
        self.current_kind() == Some(Kind::NULL)
    }

    /// Consume a `Null` item.
    ///
    /// # Errors
    /// `UnexpectedDataItem` if the buffered item isn't `Null`.
    pub fn read_null(&mut self) -> Result<(), Error> {
        if !self.has_null() {
            return Err(self.error(Expectation::Kind(Kind::NULL.bits())));
        }
        self.pull()
    }

    /// Non-raising form of [`Reader::read_null`].
    ///
    /// # Errors
    /// Only ever propagates a `pull()` failure after a successful match.
    pub fn try_read_null(&mut self) -> Result<bool, Error> {
        if self.has_null() {
            self.pull()?;
            Ok(true)
        } else {
            Ok(false)
        }
    }

    /// `true` if the buffered item is `Undefined`.
    #[must_use]
    pub fn has_undefined(&self) -> bool {
        self.current_kind() == Some(Kind::UNDEFINED)
    }

    /// Consume an `Undefined` item.
    ///
    /// # Errors
    /// `UnexpectedDataItem` if the buffered item isn't `Undefined`.
    pub fn read_undefined(&mut self) -> Result<(), Error> {
        if !self.has_undefined() {
            return Err(self.error(Expectation::Kind(Kind::UNDEFINED.bits())));
        }
        self.pull()
    }

    /// Non-raising form of [`Reader::read_undefined`].
    ///
    /// # Errors
    /// Only ever propagates a `pull()` failure after a successful match.
    pub fn try_read_undefined(&mut self) -> Result<bool, Error> {
        if self.has_undefined() {
            self.pull()?;
            Ok(true)
        } else {
            Ok(false)
        }
    }

    /// `true` if the buffered item is a `Bool`.
    #[must_use]
    pub fn has_bool(&self) -> bool {
        self.current_kind() == Some(Kind::BOOL)
    }

    /// Consume a `Bool` item.
    ///
    /// # Errors
    /// `UnexpectedDataItem` if the buffered item isn't a `Bool`.
    pub fn read_bool(&mut self) -> Result<bool, Error> {
        match self.data_item() {
            Some(Event::Bool(v)) => {
                self.pull()?;
                Ok(v)
            }
            _ => Err(self.error(Expectation::Kind(Kind::BOOL.bits()))),
        }
    }

    /// Non-raising form of [`Reader::read_bool`].
    ///
    /// # Errors
    /// Only ever propagates a `pull()` failure after a successful match.
    pub fn try_read_bool(&mut self) -> Result<Option<bool>, Error> {
        match self.data_item() {
            Some(Event::Bool(v)) => {
                self.pull()?;
                Ok(Some(v))
            }
            _ => Ok(None),
        }
    }

    // ---- Integers ----------------------------------------------------

    /// `true` if the buffered item fits `i32` (a bare `Int`).
    #[must_use]
    pub fn has_int(&self) -> bool {
        self.current_kind() == Some(Kind::INT)
    }

    /// `true` if the buffered item fits `i64` (`Int` or `Long`).
    #[must_use]
    pub fn has_long(&self) -> bool {
        matches!(self.current_kind(), Some(Kind::INT | Kind::LONG))
    }

    /// Consume an `Int`-or-widened-to-`i64` item.
    ///
    /// # Errors
    /// `UnexpectedDataItem` if the buffered item isn't an integer fitting `i64`.
    pub fn read_long(&mut self) -> Result<i64, Error> {
        let v = match self.data_item() {
            Some(Event::Int(v)) => i64::from(v),
            Some(Event::Long(v)) => v,
            _ => return Err(self.error(Expectation::Kind(Kind::INTEGER.bits()))),
        };
        self.pull()?;
        Ok(v)
    }

    /// Non-raising form of [`Reader::read_long`].
    ///
    /// # Errors
    /// Only ever propagates a `pull()` failure after a successful match.
    pub fn try_read_long(&mut self) -> Result<Option<i64>, Error> {
        if self.has_long() {
            Ok(Some(self.read_long()?))
        } else {
            Ok(None)
        }
    }

    /// `true` if the buffered item is `PosOverLong` or `NegOverLong`.
    #[must_use]
    pub fn has_over_long(&self) -> bool {
        matches!(
            self.current_kind(),
            Some(Kind::POS_OVER_LONG | Kind::NEG_OVER_LONG)
        )
    }

    /// Consume a `PosOverLong`/`NegOverLong` item, returning the sign and
    /// wire-format magnitude carrier.
    ///
    /// # Errors
    /// `UnexpectedDataItem` if the buffered item isn't an `OverLong`.
    pub fn read_over_long(&mut self) -> Result<(bool, OverLong), Error> {
        let out = match self.data_item() {
            Some(Event::PosOverLong(v)) => (false, v),
            Some(Event::NegOverLong(v)) => (true, v),
            _ => {
                return Err(self.error(Expectation::Kind(
                    Kind::POS_OVER_LONG.union(Kind::NEG_OVER_LONG).bits(),
                )))
            }
        };
        self.pull()?;
        Ok(out)
    }

    // ---- Floats --------------------------------------------------------

    /// `true` if the buffered item satisfies a `Float16` read.
    #[must_use]
    pub fn has_float16(&self) -> bool {
        self.current_kind() == Some(Kind::FLOAT16)
    }

    /// Consume a `Float16` item.
    ///
    /// # Errors
    /// `UnexpectedDataItem` if the buffered item isn't a `Float16`.
    pub fn read_float16(&mut self) -> Result<half::f16, Error> {
        match self.data_item() {
            Some(Event::Float16(v)) => {
                self.pull()?;
                Ok(v)
            }
            _ => Err(self.error(Expectation::Kind(Kind::FLOAT16.bits()))),
        }
    }

    /// `true` if the buffered item satisfies a `Float` read: a `Float`
    /// item always does; a `Float16` does unless `read_float16_only_as_float16`.
    #[must_use]
    pub fn has_float(&self) -> bool {
        match self.current_kind() {
            Some(Kind::FLOAT) => true,
            Some(Kind::FLOAT16) => !self.config.read_float16_only_as_float16,
            _ => false,
        }
    }

    /// Consume a `Float`-or-widened-`Float16` item.
    ///
    /// # Errors
    /// `UnexpectedDataItem` if the buffered item doesn't satisfy [`Reader::has_float`].
    pub fn read_float(&mut self) -> Result<f32, Error> {
        if !self.has_float() {
            return Err(self.error(Expectation::Kind(Kind::FLOAT.bits())));
        }
        let v = match self.data_item() {
            Some(Event::Float(v)) => v,
            Some(Event::Float16(v)) => v.to_f32(),
            _ => unreachable!("has_float() already matched one of these two kinds"),
        };
        self.pull()?;
        Ok(v)
    }

    /// `true` if the buffered item satisfies a `Double` read: a `Double`
    /// item always does; `Float`/`Float16` do unless their respective
    /// narrowing flags are set.
    #[must_use]
    pub fn has_double(&self) -> bool {
        match self.current_kind() {
            Some(Kind::DOUBLE) => true,
            Some(Kind::FLOAT) => !self.config.read_float_only_as_float,
            Some(Kind::FLOAT16) => {
                !self.config.read_float16_only_as_float16 && !self.config.read_float_only_as_float
            }
            _ => false,
        }
    }

    /// Consume a `Double`-or-widened item.
    ///
    /// # Errors
    /// `UnexpectedDataItem` if the buffered item doesn't satisfy [`Reader::has_double`].
    pub fn read_double(&mut self) -> Result<f64, Error> {
        if !self.has_double() {
            return Err(self.error(Expectation::Kind(Kind::DOUBLE.bits())));
        }
        let v = match self.data_item() {
            Some(Event::Double(v)) => v,
            Some(Event::Float(v)) => f64::from(v),
            Some(Event::Float16(v)) => f64::from(v.to_f32()),
            _ => unreachable!("has_double() already matched one of these three kinds"),
        };
        self.pull()?;
        Ok(v)
    }

    // ---- Bytes / Text --------------------------------------------------

    /// `true` if the buffered item is a definite-length `Bytes`.
    #[must_use]
    pub fn has_bytes(&self) -> bool {
        self.current_kind() == Some(Kind::BYTES)
    }

    /// Consume a definite-length `Bytes` item.
    ///
    /// # Errors
    /// `UnexpectedDataItem` if the buffered item isn't `Bytes`.
    pub fn read_bytes(&mut self) -> Result<Vec<u8>, Error> {
        let out = match self.data_item() {
            Some(Event::Bytes(b)) => b.to_vec(),
            _ => return Err(self.error(Expectation::Kind(Kind::BYTES.bits()))),
        };
        self.pull()?;
        Ok(out)
    }

    /// `true` if the buffered item is a definite-length `Text`.
    #[must_use]
    pub fn has_text(&self) -> bool {
        self.current_kind() == Some(Kind::TEXT)
    }

    /// Consume a definite-length `Text` item.
    ///
    /// # Errors
    /// `UnexpectedDataItem` if the buffered item isn't `Text`.
    pub fn read_text(&mut self) -> Result<String, Error> {
        let out = match self.data_item() {
            Some(Event::Text(s)) => String::from(s),
            _ => return Err(self.error(Expectation::Kind(Kind::TEXT.bits()))),
        };
        self.pull()?;
        Ok(out)
    }

    /// Consume an indefinite-length byte string: a `BytesStart`, followed
    /// by zero or more `Bytes` chunks, followed by `Break`, concatenated.
    ///
    /// # Errors
    /// `UnexpectedDataItem` if the buffered item isn't `BytesStart`, or
    /// whatever fails while draining the chunk sequence.
    pub fn read_unsized_bytes(&mut self) -> Result<Vec<u8>, Error> {
        if self.current_kind() != Some(Kind::BYTES_START) {
            return Err(self.error(Expectation::Kind(Kind::BYTES_START.bits())));
        }
        self.pull()?;
        let mut out = Vec::new();
        loop {
            match self.data_item() {
                Some(Event::Bytes(b)) => {
                    out.extend_from_slice(b);
                    self.pull()?;
                }
                Some(Event::Break) => {
                    self.pull()?;
                    return Ok(out);
                }
                _ => return Err(self.error(Expectation::Kind(Kind::BYTES.union(Kind::BREAK).bits()))),
            }
        }
    }

    /// Consume an indefinite-length text string, chunk by chunk.
    ///
    /// # Errors
    /// Same as [`Reader::read_unsized_bytes`], plus `InvalidCborData` if the
    /// concatenated bytes aren't valid UTF-8 (chunk boundaries needn't fall
    /// on character boundaries).
    pub fn read_unsized_text(&mut self) -> Result<String, Error> {
        if self.current_kind() != Some(Kind::TEXT_START) {
            return Err(self.error(Expectation::Kind(Kind::TEXT_START.bits())));
        }
        self.pull()?;
        let mut out = Vec::new();
        loop {
            match self.data_item() {
                Some(Event::Text(s)) => {
                    out.extend_from_slice(s.as_bytes());
                    self.pull()?;
                }
                Some(Event::Break) => {
                    self.pull()?;
                    return String::from_utf8(out)
                        .map_err(|_| Error::new(ErrorKind::InvalidCborData, self.position()));
                }
                _ => return Err(self.error(Expectation::Kind(Kind::TEXT.union(Kind::BREAK).bits()))),
            }
        }
    }

    /// Read a string in either definite or indefinite form.
    ///
    /// # Errors
    /// `UnexpectedDataItem` if the buffered item is neither `Text` nor `TextStart`.
    pub fn read_string(&mut self) -> Result<String, Error> {
        if self.has_text() {
            self.read_text()
        } else {
            self.read_unsized_text()
        }
    }

    // ---- Containers ----------------------------------------------------

    /// `true` if the buffered item is a definite-length `ArrayHeader`.
    #[must_use]
    pub fn has_array_header(&self) -> bool {
        self.current_kind() == Some(Kind::ARRAY_HEADER)
    }

    /// Consume an `ArrayHeader`, returning its declared length.
    ///
    /// # Errors
    /// `UnexpectedDataItem` if the buffered item isn't an `ArrayHeader`.
    pub fn read_array_header(&mut self) -> Result<u64, Error> {
        let len = match self.data_item() {
            Some(Event::ArrayHeader(n)) => n,
            _ => return Err(self.error(Expectation::Kind(Kind::ARRAY_HEADER.bits()))),
        };
        self.pull()?;
        Ok(len)
    }

    /// `true` if the buffered item is `ArrayStart`.
    #[must_use]
    pub fn has_array_start(&self) -> bool {
        self.current_kind() == Some(Kind::ARRAY_START)
    }

    /// Consume an `ArrayStart`.
    ///
    /// # Errors
    /// `UnexpectedDataItem` if the buffered item isn't `ArrayStart`.
    pub fn read_array_start(&mut self) -> Result<(), Error> {
        if !self.has_array_start() {
            return Err(self.error(Expectation::Kind(Kind::ARRAY_START.bits())));
        }
        self.pull()
    }

    /// `true` if the buffered item is a definite-length `MapHeader`.
    #[must_use]
    pub fn has_map_header(&self) -> bool {
        self.current_kind() == Some(Kind::MAP_HEADER)
    }

    /// Consume a `MapHeader`, returning its declared pair count.
    ///
    /// # Errors
    /// `UnexpectedDataItem` if the buffered item isn't a `MapHeader`.
    pub fn read_map_header(&mut self) -> Result<u64, Error> {
        let len = match self.data_item() {
            Some(Event::MapHeader(n)) => n,
            _ => return Err(self.error(Expectation::Kind(Kind::MAP_HEADER.bits()))),
        };
        self.pull()?;
        Ok(len)
    }

    /// `true` if the buffered item is `MapStart`.
    #[must_use]
    pub fn has_map_start(&self) -> bool {
        self.current_kind() == Some(Kind::MAP_START)
    }

    /// Consume a `MapStart`.
    ///
    /// # Errors
    /// `UnexpectedDataItem` if the buffered item isn't `MapStart`.
    pub fn read_map_start(&mut self) -> Result<(), Error> {
        if !self.has_map_start() {
            return Err(self.error(Expectation::Kind(Kind::MAP_START.bits())));
        }
        self.pull()
    }

    /// `true` if the buffered item is `Break`.
    #[must_use]
    pub fn has_break(&self) -> bool {
        self.current_kind() == Some(Kind::BREAK)
    }

    /// Non-raising consumption of `Break`, the idiom for draining an
    /// indefinite-length container: `while !reader.try_read_break()? { ... }`.
    ///
    /// # Errors
    /// Only ever propagates a `pull()` failure after a successful match.
    pub fn try_read_break(&mut self) -> Result<bool, Error> {
        if self.has_break() {
            self.pull()?;
            Ok(true)
        } else {
            Ok(false)
        }
    }

    // ---- Tag / SimpleValue ----------------------------------------------

    /// `true` if the buffered item is a `Tag`.
    #[must_use]
    pub fn has_tag(&self) -> bool {
        self.current_kind() == Some(Kind::TAG)
    }

    /// Consume a `Tag` item.
    ///
    /// # Errors
    /// `UnexpectedDataItem` if the buffered item isn't a `Tag`.
    pub fn read_tag(&mut self) -> Result<Tag, Error> {
        let tag = match self.data_item() {
            Some(Event::Tag(t)) => t,
            _ => return Err(self.error(Expectation::Kind(Kind::TAG.bits()))),
        };
        self.pull()?;
        Ok(tag)
    }

    /// `true` if the buffered item is a `SimpleValue`.
    #[must_use]
    pub fn has_simple_value(&self) -> bool {
        self.current_kind() == Some(Kind::SIMPLE_VALUE)
    }

    /// Consume a `SimpleValue` item.
    ///
    /// # Errors
    /// `UnexpectedDataItem` if the buffered item isn't a `SimpleValue`.
    pub fn read_simple_value(&mut self) -> Result<SimpleValue, Error> {
        let sv = match self.data_item() {
            Some(Event::SimpleValue(v)) => v,
            _ => return Err(self.error(Expectation::Kind(Kind::SIMPLE_VALUE.bits()))),
        };
        self.pull()?;
        Ok(sv)
    }

    /// `true` if the buffered item is `EndOfInput`.
    #[must_use]
    pub fn has_end_of_input(&self) -> bool {
        self.current_kind() == Some(Kind::END_OF_INPUT)
    }

    /// Discard one logical value, recursing through any container it opens.
    /// Used by generated `CborDecode` impls to skip map entries whose key
    /// isn't recognized, so adding a field to a struct stays
    /// forward-compatible with data written by an older version.
    ///
    /// # Errors
    /// Whatever the underlying `pull()`/typed reads fail with, or
    /// `UnexpectedDataItem` if the buffered item is `Break` or
    /// `EndOfInput` (neither is a value to skip).
    pub fn skip_value(&mut self) -> Result<(), Error> {
        let kind = self
            .current_kind()
            .ok_or_else(|| self.error(Expectation::AnyDataItem))?;

        match kind {
            Kind::TAG => {
                self.read_tag()?;
                self.skip_value()
            }
            Kind::ARRAY_HEADER => {
                let len = self.read_array_header()?;
                for _ in 0..len {
                    self.skip_value()?;
                }
                Ok(())
            }
            Kind::ARRAY_START => {
                self.read_array_start()?;
                while !self.try_read_break()? {
                    self.skip_value()?;
                }
                Ok(())
            }
            Kind::MAP_HEADER => {
                let len = self.read_map_header()?;
                for _ in 0..len {
                    self.skip_value()?;
                    self.skip_value()?;
                }
                Ok(())
            }
            Kind::MAP_START => {
                self.read_map_start()?;
                while !self.try_read_break()? {
                    self.skip_value()?;
                    self.skip_value()?;
                }
                Ok(())
            }
            Kind::BYTES_START => {
                self.read_unsized_bytes()?;
                Ok(())
            }
            Kind::TEXT_START => {
                self.read_unsized_text()?;
                Ok(())
            }
            Kind::BREAK | Kind::END_OF_INPUT => {
                Err(self.error(Expectation::AnyDataItem))
            }
            _ => self.pull(),
        }
    }

    // ---- Save / restore --------------------------------------------------

    /// Snapshot the reader's observable state (input cursor, buffered
    /// item, validator nesting). O(depth), not O(bytes).
    #[must_use]
    pub fn save_state(&self) -> SavedState
    where
        I: Clone,
    {
        SavedState {
            position: self.input.position(),
            buffer: self.buffer.clone(),
            validator: self.validator.clone(),
        }
    }

    /// Rewind the input cursor, buffered item, and validator nesting to a
    /// previously taken [`SavedState`].
    pub fn restore_state(&mut self, state: &SavedState) {
        self.input.seek(state.position);
        self.buffer = state.buffer.clone();
        self.validator = state.validator.clone();
    }

    /// Save state, run `f`; on `Err`, restore state and return `Ok(None)`.
    /// Used when one item of look-ahead isn't enough to decide a shape
    /// (e.g. telling apart two tagged-container encodings of the same
    /// logical type).
    ///
    /// # Errors
    /// This method itself never fails on the decoder's behalf — a failing
    /// `f` is absorbed into `Ok(None)` after restoring state.
    pub fn try_read<T>(&mut self, f: impl FnOnce(&mut Self) -> Result<T, Error>) -> Result<Option<T>, Error>
    where
        I: Clone,
    {
        let saved = self.save_state();
        match f(self) {
            Ok(v) => Ok(Some(v)),
            Err(_) => {
                self.restore_state(&saved);
                Ok(None)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::io::SliceInput;

    fn reader(bytes: &[u8]) -> Reader<SliceInput<'_>> {
        Reader::new(
            SliceInput::new(bytes),
            ValidationConfig::new(),
            ReaderConfig::new(),
        )
        .unwrap()
    }

    #[test]
    fn reads_int_and_advances() {
        let mut r = reader(&[0x18, 0x2a, 0xf6]);
        assert_eq!(r.read_long().unwrap(), 42);
        assert!(r.has_null());
    }

    #[test]
    fn reads_array_elements() {
        let mut r = reader(&[0x83, 0x01, 0x02, 0x03]);
        let n = r.read_array_header().unwrap();
        assert_eq!(n, 3);
        let mut items = Vec::new();
        for _ in 0..n {
            items.push(r.read_long().unwrap());
        }
        assert_eq!(items, alloc::vec![1, 2, 3]);
    }

    #[test]
    fn save_restore_is_identity() {
        let mut r = reader(&[0x01, 0x02]);
        let saved = r.save_state();
        let first = r.read_long().unwrap();
        r.restore_state(&saved);
        let again = r.read_long().unwrap();
        assert_eq!(first, again);
    }

    #[test]
    fn read_unsized_bytes_concatenates_chunks() {
        // 0x5f (bytes-start) 0x41 0x01 (one-byte chunk: 0x01) 0xff (break)
        let mut r = reader(&[0x5f, 0x41, 0x01, 0xff]);
        assert_eq!(r.read_unsized_bytes().unwrap(), alloc::vec![0x01]);
    }

    #[test]
    fn break_at_top_level_reported_as_unexpected_any_item() {
        let err = Reader::new(
            SliceInput::new(&[0xff]),
            ValidationConfig::new(),
            ReaderConfig::new(),
        )
        .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::UnexpectedDataItem);
    }

    #[test]
    fn skip_value_descends_nested_containers() {
        // {"a": [1, 2, {"b": true}]} followed by a sentinel int.
        let mut w = crate::writer::Writer::new(
            crate::io::VecOutput::new(),
            false,
            ValidationConfig::new(),
        );
        w.write_map_header(1)
            .unwrap()
            .write_text("a")
            .unwrap()
            .write_array_header(3)
            .unwrap()
            .write_int(1)
            .unwrap()
            .write_int(2)
            .unwrap()
            .write_map_header(1)
            .unwrap()
            .write_text("b")
            .unwrap()
            .write_bool(true)
            .unwrap()
            .write_int(99)
            .unwrap();
        let bytes = w.into_inner().into_vec();
        let mut r = reader(&bytes);
        r.skip_value().unwrap();
        assert_eq!(r.read_long().unwrap(), 99);
    }
}
