//! The event model shared by the [`crate::parser::Parser`], the
//! [`crate::emitter::Emitter`], and everything wired between them.
//!
//! Every CBOR data item maps to exactly one [`Kind`]; [`Kind`] is a set of
//! disjoint bit flags so membership tests (`Integer`, `Number`,
//! `AllButBreak`, a tag's allowed-mask) are a single mask-and-test rather
//! than a match over every variant.

use core::fmt;

macro_rules! kinds {
    ($($(#[$meta:meta])* $name:ident = $bit:expr;)*) => {
        $(
            $(#[$meta])*
            pub const $name: Kind = Kind($bit);
        )*
    };
}

/// A bitset of CBOR data-item kinds.
///
/// Single-kind constants (`Kind::NULL`, `Kind::INT`, ...) and compound masks
/// (`Kind::INTEGER`, `Kind::NUMBER`, `Kind::ALL_BUT_BREAK`) live as
/// associated constants so `validator` and `reader` can express "any of
/// these kinds" with `Kind::contains`/`Kind::intersects`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Kind(u32);

impl Kind {
    kinds! {
        /// CBOR `null`.
        NULL = 1 << 0;
        /// CBOR `undefined`.
        UNDEFINED = 1 << 1;
        /// A boolean.
        BOOL = 1 << 2;
        /// A signed integer fitting in 32 bits.
        INT = 1 << 3;
        /// A signed integer fitting in 64 bits but not 32.
        LONG = 1 << 4;
        /// An unsigned 64-bit value with the high bit set (doesn't fit signed).
        POS_OVER_LONG = 1 << 5;
        /// A negative value whose magnitude doesn't fit in a signed 64-bit slot.
        NEG_OVER_LONG = 1 << 6;
        /// A half-precision float.
        FLOAT16 = 1 << 7;
        /// A single-precision float.
        FLOAT = 1 << 8;
        /// A double-precision float.
        DOUBLE = 1 << 9;
        /// A definite-length byte string.
        BYTES = 1 << 10;
        /// The start of an indefinite-length byte string.
        BYTES_START = 1 << 11;
        /// A definite-length UTF-8 text string.
        TEXT = 1 << 12;
        /// The start of an indefinite-length UTF-8 text string.
        TEXT_START = 1 << 13;
        /// A definite-length array header.
        ARRAY_HEADER = 1 << 14;
        /// The start of an indefinite-length array.
        ARRAY_START = 1 << 15;
        /// A definite-length map header.
        MAP_HEADER = 1 << 16;
        /// The start of an indefinite-length map.
        MAP_START = 1 << 17;
        /// Terminates an indefinite-length container.
        BREAK = 1 << 18;
        /// A semantic tag annotating the following item.
        TAG = 1 << 19;
        /// A CBOR simple value.
        SIMPLE_VALUE = 1 << 20;
        /// Emitted once, after all containers are closed, to mark input exhausted.
        END_OF_INPUT = 1 << 21;
    }

    /// `Int | Long | PosOverLong | NegOverLong`.
    pub const INTEGER: Kind = Kind(Self::INT.0 | Self::LONG.0 | Self::POS_OVER_LONG.0 | Self::NEG_OVER_LONG.0);
    /// `Integer | Float16 | Float | Double`.
    pub const NUMBER: Kind = Kind(Self::INTEGER.0 | Self::FLOAT16.0 | Self::FLOAT.0 | Self::DOUBLE.0);
    /// Every kind except `Break`.
    pub const ALL_BUT_BREAK: Kind = Kind(!Self::BREAK.0);
    /// Every kind, including `Break`.
    pub const ALL: Kind = Kind(u32::MAX);
    /// No kinds.
    pub const NONE: Kind = Kind(0);

    /// Bitwise-or two masks.
    #[inline]
    #[must_use]
    pub const fn union(self, other: Kind) -> Kind {
        Kind(self.0 | other.0)
    }

    /// `self` contains every bit set in `other`.
    #[inline]
    #[must_use]
    pub const fn contains(self, other: Kind) -> bool {
        (self.0 & other.0) == other.0
    }

    /// `self` and `other` share at least one bit.
    #[inline]
    #[must_use]
    pub const fn intersects(self, other: Kind) -> bool {
        (self.0 & other.0) != 0
    }

    /// The raw bit pattern, for diagnostics and the `Expectation::Kind` error payload.
    #[inline]
    #[must_use]
    pub const fn bits(self) -> u32 {
        self.0
    }
}

impl core::ops::BitOr for Kind {
    type Output = Kind;
    #[inline]
    fn bitor(self, rhs: Kind) -> Kind {
        self.union(rhs)
    }
}

/// A recognized CBOR tag (major type 6 code), or `Other` for anything
/// unrecognized. Unknown codes never fail to parse — they just carry less
/// semantic meaning.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[non_exhaustive]
pub enum Tag {
    /// Tag 0: RFC 3339 date/time text string.
    DateTimeString,
    /// Tag 1: numeric epoch-based date/time.
    EpochDateTime,
    /// Tag 2: unsigned bignum, big-endian magnitude bytes.
    PositiveBigNum,
    /// Tag 3: negative bignum (`-1 - magnitude`), big-endian bytes.
    NegativeBigNum,
    /// Tag 4: decimal fraction `[exponent, mantissa]`.
    DecimalFraction,
    /// Tag 5: bigfloat `[exponent, mantissa]`.
    BigFloat,
    /// Tag 21: expected base64url conversion hint.
    HintBase64Url,
    /// Tag 22: expected base64 conversion hint.
    HintBase64,
    /// Tag 23: expected base16 conversion hint.
    HintBase16,
    /// Tag 24: embedded CBOR data item, carried as a byte string.
    EmbeddedCbor,
    /// Tag 32: URI text string.
    TextUri,
    /// Tag 33: base64url text string.
    TextBase64Url,
    /// Tag 34: base64 text string.
    TextBase64,
    /// Tag 35: regular-expression text string.
    TextRegex,
    /// Tag 36: MIME message text string.
    TextMime,
    /// Tag 55799: self-describe CBOR magic header.
    MagicHeader,
    /// Any tag code not in the recognized set above.
    Other(u64),
}

impl Tag {
    /// The tag's numeric wire code.
    #[must_use]
    pub const fn code(self) -> u64 {
        match self {
            Self::DateTimeString => 0,
            Self::EpochDateTime => 1,
            Self::PositiveBigNum => 2,
            Self::NegativeBigNum => 3,
            Self::DecimalFraction => 4,
            Self::BigFloat => 5,
            Self::HintBase64Url => 21,
            Self::HintBase64 => 22,
            Self::HintBase16 => 23,
            Self::EmbeddedCbor => 24,
            Self::TextUri => 32,
            Self::TextBase64Url => 33,
            Self::TextBase64 => 34,
            Self::TextRegex => 35,
            Self::TextMime => 36,
            Self::MagicHeader => 55799,
            Self::Other(code) => code,
        }
    }

    /// Recognize a wire code, falling back to `Other`.
    #[must_use]
    pub const fn from_code(code: u64) -> Self {
        match code {
            0 => Self::DateTimeString,
            1 => Self::EpochDateTime,
            2 => Self::PositiveBigNum,
            3 => Self::NegativeBigNum,
            4 => Self::DecimalFraction,
            5 => Self::BigFloat,
            21 => Self::HintBase64Url,
            22 => Self::HintBase64,
            23 => Self::HintBase16,
            24 => Self::EmbeddedCbor,
            32 => Self::TextUri,
            33 => Self::TextBase64Url,
            34 => Self::TextBase64,
            35 => Self::TextRegex,
            36 => Self::TextMime,
            55799 => Self::MagicHeader,
            other => Self::Other(other),
        }
    }

    /// The mask of kinds legal as the item immediately following this tag,
    /// per the validator's tag-semantics table. `None` means unrestricted.
    #[must_use]
    pub const fn following_mask(self) -> Option<Kind> {
        match self {
            Self::EpochDateTime => Some(Kind::NUMBER),
            Self::PositiveBigNum | Self::NegativeBigNum | Self::EmbeddedCbor => {
                Some(Kind::BYTES.union(Kind::BYTES_START))
            }
            Self::DateTimeString
            | Self::TextUri
            | Self::TextBase64Url
            | Self::TextBase64
            | Self::TextRegex
            | Self::TextMime => Some(Kind::TEXT),
            Self::DecimalFraction | Self::BigFloat => Some(Kind::ARRAY_HEADER),
            _ => None,
        }
    }
}

impl fmt::Display for Tag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "tag({})", self.code())
    }
}

/// A CBOR simple value: an integer in `0..=23` or `32..=255`. `24..=31` is
/// reserved by the format and never constructible through this type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SimpleValue(u8);

impl SimpleValue {
    /// `false`.
    pub const FALSE: SimpleValue = SimpleValue(20);
    /// `true`.
    pub const TRUE: SimpleValue = SimpleValue(21);

    /// Construct a simple value, rejecting the reserved `24..=31` range.
    #[must_use]
    pub const fn new(value: u8) -> Option<Self> {
        match value {
            0..=23 | 32..=255 => Some(Self(value)),
            _ => None,
        }
    }

    /// The raw value.
    #[inline]
    #[must_use]
    pub const fn value(self) -> u8 {
        self.0
    }
}

/// Carrier for unsigned-64 integers that overflow a signed 64-bit slot.
///
/// For `PosOverLong`, `0` holds the raw wire bits (the true unsigned value).
/// For `NegOverLong`, `0` holds the wire bits of `~n` where `n` is the
/// actual negative magnitude (CBOR major type 1's `-1 - n` encoding). Both
/// forms require the high bit set — otherwise the value fits in `i64` and
/// should have been carried as `Long`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct OverLong(pub u64);

impl OverLong {
    /// `true` iff the high bit is set, i.e. this genuinely doesn't fit `i64`.
    #[inline]
    #[must_use]
    pub const fn is_valid(self) -> bool {
        self.0 & (1 << 63) != 0
    }
}

/// One CBOR data item as pushed through a [`crate::receiver::Receiver`].
///
/// Modeled as a single tagged enum (rather than one trait method per kind)
/// so the pipeline is a plain `match` at each stage: parser produces one,
/// validator inspects its `kind()`, buffer stores it, reader exposes it
/// through typed accessors.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Event<'b> {
    /// `null`.
    Null,
    /// `undefined`.
    Undefined,
    /// A boolean.
    Bool(bool),
    /// A signed value fitting in 32 bits.
    Int(i32),
    /// A signed value fitting in 64 bits (but not 32).
    Long(i64),
    /// An unsigned value too large for `i64`, non-negative.
    PosOverLong(OverLong),
    /// An unsigned value too large for `i64`, representing a negative number.
    NegOverLong(OverLong),
    /// A half-precision float.
    Float16(half::f16),
    /// A single-precision float.
    Float(f32),
    /// A double-precision float.
    Double(f64),
    /// A definite-length byte string.
    Bytes(&'b [u8]),
    /// The start of an indefinite-length byte string.
    BytesStart,
    /// A definite-length UTF-8 text string.
    Text(&'b str),
    /// The start of an indefinite-length UTF-8 text string.
    TextStart,
    /// A definite-length array header carrying its declared length.
    ArrayHeader(u64),
    /// The start of an indefinite-length array.
    ArrayStart,
    /// A definite-length map header carrying its declared pair count.
    MapHeader(u64),
    /// The start of an indefinite-length map.
    MapStart,
    /// Terminates the innermost open indefinite-length container.
    Break,
    /// A semantic tag annotating the item that follows.
    Tag(Tag),
    /// A CBOR simple value.
    SimpleValue(SimpleValue),
    /// Marks the input exhausted; legal only once all containers are closed.
    EndOfInput,
}

impl<'b> Event<'b> {
    /// This event's `Kind` bit.
    #[must_use]
    pub const fn kind(&self) -> Kind {
        match self {
            Self::Null => Kind::NULL,
            Self::Undefined => Kind::UNDEFINED,
            Self::Bool(_) => Kind::BOOL,
            Self::Int(_) => Kind::INT,
            Self::Long(_) => Kind::LONG,
            Self::PosOverLong(_) => Kind::POS_OVER_LONG,
            Self::NegOverLong(_) => Kind::NEG_OVER_LONG,
            Self::Float16(_) => Kind::FLOAT16,
            Self::Float(_) => Kind::FLOAT,
            Self::Double(_) => Kind::DOUBLE,
            Self::Bytes(_) => Kind::BYTES,
            Self::BytesStart => Kind::BYTES_START,
            Self::Text(_) => Kind::TEXT,
            Self::TextStart => Kind::TEXT_START,
            Self::ArrayHeader(_) => Kind::ARRAY_HEADER,
            Self::ArrayStart => Kind::ARRAY_START,
            Self::MapHeader(_) => Kind::MAP_HEADER,
            Self::MapStart => Kind::MAP_START,
            Self::Break => Kind::BREAK,
            Self::Tag(_) => Kind::TAG,
            Self::SimpleValue(_) => Kind::SIMPLE_VALUE,
            Self::EndOfInput => Kind::END_OF_INPUT,
        }
    }

    /// `true` if this event opens a container level (a header or a `*Start`).
    #[must_use]
    pub const fn opens_level(&self) -> bool {
        matches!(
            self,
            Self::ArrayHeader(_) | Self::ArrayStart | Self::MapHeader(_) | Self::MapStart
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn integer_mask_covers_all_four_carriers() {
        assert!(Kind::INTEGER.contains(Kind::INT));
        assert!(Kind::INTEGER.contains(Kind::LONG));
        assert!(Kind::INTEGER.contains(Kind::POS_OVER_LONG));
        assert!(Kind::INTEGER.contains(Kind::NEG_OVER_LONG));
        assert!(!Kind::INTEGER.contains(Kind::FLOAT));
    }

    #[test]
    fn all_but_break_excludes_only_break() {
        assert!(!Kind::ALL_BUT_BREAK.intersects(Kind::BREAK));
        assert!(Kind::ALL_BUT_BREAK.intersects(Kind::NULL));
    }

    #[test]
    fn tag_round_trips_recognized_codes() {
        assert_eq!(Tag::from_code(2), Tag::PositiveBigNum);
        assert_eq!(Tag::PositiveBigNum.code(), 2);
        assert_eq!(Tag::from_code(9999), Tag::Other(9999));
    }

    #[test]
    fn simple_value_rejects_reserved_range() {
        assert!(SimpleValue::new(24).is_none());
        assert!(SimpleValue::new(31).is_none());
        assert!(SimpleValue::new(23).is_some());
        assert!(SimpleValue::new(32).is_some());
    }

    #[test]
    fn over_long_requires_high_bit() {
        assert!(!OverLong(0).is_valid());
        assert!(OverLong(1 << 63).is_valid());
    }
}
