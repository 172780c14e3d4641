//! The event buffer (C5): a terminal `Receiver` used on the read side.
//!
//! Stores the kind of the last pushed event and its scalar payload in
//! typed fields, plus an owned byte/text chunk. Unlike [`crate::event::Event`]
//! (which borrows `Bytes`/`Text` payloads from the input buffer for the
//! duration of a single `pull`), `BufferingReceiver` must outlive that
//! borrow — the [`crate::reader::Reader`] inspects the buffered item across
//! several method calls — so byte and text payloads are copied into owned
//! storage here. That copy is the price of the reader's look-ahead model
//! and only applies to `Bytes`/`Text`, not scalars.

use crate::alloc_util::{try_box_str_from_str, try_vec_from_slice};
use crate::error::Error;
use crate::event::{Event, Kind, OverLong, SimpleValue, Tag};
use crate::receiver::Receiver;
use alloc::string::String;
use alloc::vec::Vec;

/// The scalar payload of the last event stored by a [`BufferingReceiver`],
/// with owned storage for the variable-length kinds.
#[derive(Debug, Clone, PartialEq)]
enum Slot {
    Null,
    Undefined,
    Bool(bool),
    Int(i32),
    Long(i64),
    PosOverLong(OverLong),
    NegOverLong(OverLong),
    Float16(half::f16),
    Float(f32),
    Double(f64),
    Bytes(Vec<u8>),
    BytesStart,
    Text(String),
    TextStart,
    ArrayHeader(u64),
    ArrayStart,
    MapHeader(u64),
    MapStart,
    Break,
    Tag(Tag),
    SimpleValue(SimpleValue),
    EndOfInput,
}

/// A `Receiver` that remembers only the most recently pushed event.
///
/// `clear()` resets to "no item yet", which the [`Reader`](crate::reader::Reader)
/// uses to distinguish "not pulled" from "pulled and already consumed".
#[derive(Debug, Clone, Default)]
pub struct BufferingReceiver {
    slot: Option<Slot>,
}

impl BufferingReceiver {
    /// An empty buffer, holding no item.
    #[must_use]
    pub const fn new() -> Self {
        Self { slot: None }
    }

    /// Discard the buffered item, if any.
    pub fn clear(&mut self) {
        self.slot = None;
    }

    /// `true` if an item is currently buffered.
    #[must_use]
    pub const fn has_item(&self) -> bool {
        self.slot.is_some()
    }

    /// The `Kind` of the buffered item, if any.
    #[must_use]
    pub fn kind(&self) -> Option<Kind> {
        self.slot.as_ref().map(slot_kind)
    }

    /// The buffered item as a borrowed `Event`, if any.
    #[must_use]
    pub fn event(&self) -> Option<Event<'_>> {
        self.slot.as_ref().map(|s| match s {
            Slot::Null => Event::Null,
            Slot::Undefined => Event::Undefined,
            Slot::Bool(v) => Event::Bool(*v),
            Slot::Int(v) => Event::Int(*v),
            Slot::Long(v) => Event::Long(*v),
            Slot::PosOverLong(v) => Event::PosOverLong(*v),
            Slot::NegOverLong(v) => Event::NegOverLong(*v),
            Slot::Float16(v) => Event::Float16(*v),
            Slot::Float(v) => Event::Float(*v),
            Slot::Double(v) => Event::Double(*v),
            Slot::Bytes(v) => Event::Bytes(v.as_slice()),
            Slot::BytesStart => Event::BytesStart,
            Slot::Text(v) => Event::Text(v.as_str()),
            Slot::TextStart => Event::TextStart,
            Slot::ArrayHeader(n) => Event::ArrayHeader(*n),
            Slot::ArrayStart => Event::ArrayStart,
            Slot::MapHeader(n) => Event::MapHeader(*n),
            Slot::MapStart => Event::MapStart,
            Slot::Break => Event::Break,
            Slot::Tag(t) => Event::Tag(*t),
            Slot::SimpleValue(sv) => Event::SimpleValue(*sv),
            Slot::EndOfInput => Event::EndOfInput,
        })
    }
}

const fn slot_kind(slot: &Slot) -> Kind {
    match slot {
        Slot::Null => Kind::NULL,
        Slot::Undefined => Kind::UNDEFINED,
        Slot::Bool(_) => Kind::BOOL,
        Slot::Int(_) => Kind::INT,
        Slot::Long(_) => Kind::LONG,
        Slot::PosOverLong(_) => Kind::POS_OVER_LONG,
        Slot::NegOverLong(_) => Kind::NEG_OVER_LONG,
        Slot::Float16(_) => Kind::FLOAT16,
        Slot::Float(_) => Kind::FLOAT,
        Slot::Double(_) => Kind::DOUBLE,
        Slot::Bytes(_) => Kind::BYTES,
        Slot::BytesStart => Kind::BYTES_START,
        Slot::Text(_) => Kind::TEXT,
        Slot::TextStart => Kind::TEXT_START,
        Slot::ArrayHeader(_) => Kind::ARRAY_HEADER,
        Slot::ArrayStart => Kind::ARRAY_START,
        Slot::MapHeader(_) => Kind::MAP_HEADER,
        Slot::MapStart => Kind::MAP_START,
        Slot::Break => Kind::BREAK,
        Slot::Tag(_) => Kind::TAG,
        Slot::SimpleValue(_) => Kind::SIMPLE_VALUE,
        Slot::EndOfInput => Kind::END_OF_INPUT,
    }
}

impl Receiver for BufferingReceiver {
    fn on_event(&mut self, event: Event<'_>) -> Result<(), Error> {
        let position = 0; // scalar copy never allocates past what try_vec_from_slice reports.
        self.slot = Some(match event {
            Event::Null => Slot::Null,
            Event::Undefined => Slot::Undefined,
            Event::Bool(v) => Slot::Bool(v),
            Event::Int(v) => Slot::Int(v),
            Event::Long(v) => Slot::Long(v),
            Event::PosOverLong(v) => Slot::PosOverLong(v),
            Event::NegOverLong(v) => Slot::NegOverLong(v),
            Event::Float16(v) => Slot::Float16(v),
            Event::Float(v) => Slot::Float(v),
            Event::Double(v) => Slot::Double(v),
            Event::Bytes(b) => Slot::Bytes(try_vec_from_slice(b, position)?),
            Event::BytesStart => Slot::BytesStart,
            Event::Text(s) => Slot::Text(String::from(try_box_str_from_str(s, position)?)),
            Event::TextStart => Slot::TextStart,
            Event::ArrayHeader(n) => Slot::ArrayHeader(n),
            Event::ArrayStart => Slot::ArrayStart,
            Event::MapHeader(n) => Slot::MapHeader(n),
            Event::MapStart => Slot::MapStart,
            Event::Break => Slot::Break,
            Event::Tag(t) => Slot::Tag(t),
            Event::SimpleValue(sv) => Slot::SimpleValue(sv),
            Event::EndOfInput => Slot::EndOfInput,
        });
        Ok(())
    }
}
