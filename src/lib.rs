//! # streamcbor
//!
//! A streaming CBOR (RFC 7049) codec: typed values go in one end, bytes
//! come out the other, and vice versa. The core is a small pipeline —
//! event model, pull parser, push emitter, inline validator, typed
//! reader/writer — with per-type codecs and an optional owned DOM tree
//! built entirely on top of the public `Writer`/`Reader` surface.
//!
//! ## Pipeline
//!
//! - [`event`] — the `Event` enum and `Kind` bitflags every stage below
//!   shares.
//! - [`io`] — byte-level `Input`/`Output` traits plus the slice/vec
//!   implementations.
//! - [`emitter`] — a stateless `Receiver` that serializes events to bytes.
//! - [`parser`] — a stateless decoder pulling one event at a time from an
//!   `Input`.
//! - [`buffer`] — `BufferingReceiver`, a terminal `Receiver` storing the
//!   last event.
//! - [`validator`] — a `Receiver` wrapper enforcing well-formedness and
//!   configurable resource limits.
//! - [`reader`] — a pull-based typed view with one-item look-ahead and
//!   O(1) save/restore.
//! - [`writer`] — a fluent typed push facade.
//! - [`codec`] — per-type `CborEncode`/`CborDecode` implementations.
//! - [`bignum`] — arbitrary-precision integer/decimal support.
//! - [`value`] — the optional owned `Element` tree (the DOM).
//!
//! [`encode`]/[`decode`] are the facade most callers want.
//!
//! ## Feature flags
//!
//! - `std` *(default)*: implements `std::error::Error` for [`Error`].
//! - `alloc` *(default)*: enables the owned buffer/reader/writer stack,
//!   the per-type codecs, the DOM, and the `cbor!` macro.
//! - `simdutf8`: SIMD-accelerated UTF-8 validation on the parser's text
//!   path.
//! - `unsafe-utf8`: skip UTF-8 validation where a caller already trusts the
//!   bytes.
//!
//! ## `no_std`
//!
//! The crate is `no_std` compatible; most of the pipeline additionally
//! requires `alloc` (buffering events, growing the output, and the typed
//! reader's owned `String`/`Vec<u8>` returns all need an allocator). Byte-
//! level validation of a fixed-size buffer works without `alloc`.

#![cfg_attr(not(feature = "std"), no_std)]
#![cfg_attr(docsrs, feature(doc_cfg))]
#![cfg_attr(not(feature = "unsafe-utf8"), forbid(unsafe_code))]
#![deny(missing_docs)]
#![warn(clippy::all, clippy::pedantic, clippy::nursery)]

#[cfg(feature = "alloc")]
extern crate alloc;

pub mod event;
pub mod receiver;
pub mod io;
pub mod error;
pub mod emitter;
pub mod parser;
pub mod validator;
pub(crate) mod utf8;

#[cfg(feature = "alloc")]
mod alloc_util;
#[cfg(feature = "alloc")]
pub mod buffer;
#[cfg(feature = "alloc")]
pub mod reader;
pub mod writer;
#[cfg(feature = "alloc")]
pub mod codec;
#[cfg(feature = "alloc")]
pub mod bignum;
#[cfg(feature = "alloc")]
pub mod value;
#[cfg(feature = "alloc")]
mod macros;

pub use crate::emitter::Emitter;
pub use crate::error::{Error, ErrorKind, Expectation};
pub use crate::event::{Event, Kind, OverLong, SimpleValue, Tag};
pub use crate::io::{Input, Output, SliceInput, SliceOutput};
pub use crate::parser::Parser;
pub use crate::receiver::Receiver;
pub use crate::validator::{ValidationConfig, Validator};
pub use crate::writer::Writer;

#[cfg(feature = "alloc")]
pub use crate::bignum::{BigDecimal, BigInt};
#[cfg(feature = "alloc")]
pub use crate::buffer::BufferingReceiver;
#[cfg(feature = "alloc")]
pub use crate::codec::{CborDecode, CborEncode, Either};
#[cfg(feature = "alloc")]
pub use crate::error::CausedError;
#[cfg(feature = "alloc")]
pub use crate::io::VecOutput;
#[cfg(feature = "alloc")]
pub use crate::reader::{Reader, ReaderConfig, SavedState};
#[cfg(feature = "alloc")]
pub use crate::value::{Element, Scalar};
#[cfg(feature = "alloc")]
#[doc(hidden)]
pub use crate::macros::__cbor_macro;

pub use streamcbor_derive::{CborDecode, CborEncode};

/// Configuration for [`encode`]: float-width narrowing and an optional
/// self-check validator wrapped around the writer's own output.
#[cfg(feature = "alloc")]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EncodeConfig {
    /// If `true`, `Float`/`Double` values are written at their full
    /// precision; the default narrows to the smallest width that
    /// round-trips exactly.
    pub dont_compress_floating_point_values: bool,
    /// Validate the sequence of writes before bytes reach the sink.
    /// Catches encoder bugs; not required for correctness of a
    /// hand-written call sequence.
    pub validation: Option<ValidationConfig>,
}

#[cfg(feature = "alloc")]
impl EncodeConfig {
    /// Float compression on, no self-check validation.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            dont_compress_floating_point_values: false,
            validation: None,
        }
    }

    /// Disable float-width narrowing.
    #[must_use]
    pub const fn without_float_compression(mut self) -> Self {
        self.dont_compress_floating_point_values = true;
        self
    }

    /// Wrap the writer's output in a self-check validator.
    #[must_use]
    pub const fn with_validation(mut self, validation: ValidationConfig) -> Self {
        self.validation = Some(validation);
        self
    }
}

#[cfg(feature = "alloc")]
impl Default for EncodeConfig {
    fn default() -> Self {
        Self::new()
    }
}

/// Configuration for [`decode`]: validation limits and numeric-widening
/// policy for typed reads.
#[cfg(feature = "alloc")]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DecodeConfig {
    /// Reject malformed/oversized input before it reaches the typed reader.
    pub validation: Option<ValidationConfig>,
    /// If `true`, a buffered `Float16` satisfies only `has_float16`, not
    /// `has_float`/`has_double`.
    pub read_float16_only_as_float16: bool,
    /// If `true`, a buffered `Float` satisfies only `has_float`, not
    /// `has_double`.
    pub read_float_only_as_float: bool,
}

#[cfg(feature = "alloc")]
impl DecodeConfig {
    /// Validation on with the documented defaults; both widening flags off
    /// (narrower floats transparently satisfy wider typed reads).
    #[must_use]
    pub const fn new() -> Self {
        Self {
            validation: Some(ValidationConfig::new()),
            read_float16_only_as_float16: false,
            read_float_only_as_float: false,
        }
    }

    /// Disable validation of the input stream.
    #[must_use]
    pub const fn without_validation(mut self) -> Self {
        self.validation = None;
        self
    }

    /// Use `validation` instead of the default limits.
    #[must_use]
    pub const fn with_validation(mut self, validation: ValidationConfig) -> Self {
        self.validation = Some(validation);
        self
    }

    /// Forbid a buffered `Float16` from satisfying `has_float`/`has_double`.
    #[must_use]
    pub const fn strict_float16(mut self) -> Self {
        self.read_float16_only_as_float16 = true;
        self
    }

    /// Forbid a buffered `Float` from satisfying `has_double`.
    #[must_use]
    pub const fn strict_float(mut self) -> Self {
        self.read_float_only_as_float = true;
        self
    }

    const fn reader_config(self) -> crate::reader::ReaderConfig {
        crate::reader::ReaderConfig {
            read_float16_only_as_float16: self.read_float16_only_as_float16,
            read_float_only_as_float: self.read_float_only_as_float,
        }
    }
}

#[cfg(feature = "alloc")]
impl Default for DecodeConfig {
    fn default() -> Self {
        Self::new()
    }
}

/// Encode `value` to an owned byte buffer.
///
/// # Errors
/// Whatever the underlying `Writer`/`T::encode` call fails with.
#[cfg(feature = "alloc")]
pub fn encode<T: CborEncode + ?Sized>(
    value: &T,
    config: EncodeConfig,
) -> Result<alloc::vec::Vec<u8>, Error> {
    let mut w = Writer::new(
        crate::io::VecOutput::new(),
        !config.dont_compress_floating_point_values,
        config.validation.unwrap_or_default(),
    );
    w.write(value)?;
    w.write_end_of_input()?;
    Ok(w.into_inner().into_vec())
}

/// Decode a `T` from the front of `input`, returning it alongside the
/// unconsumed remainder.
///
/// If `prefix_only` is `false`, trailing bytes after the decoded value are
/// rejected (the reader must observe `EndOfInput` immediately). If `true`,
/// any unread suffix is returned as-is.
///
/// # Errors
/// Whatever `Reader::new`/`T::decode` fails with, or `UnexpectedDataItem`
/// if `prefix_only` is `false` and bytes remain after the value.
#[cfg(feature = "alloc")]
pub fn decode<T: CborDecode>(
    input: &[u8],
    prefix_only: bool,
    config: DecodeConfig,
) -> Result<(T, &[u8]), Error> {
    let mut r = Reader::new(
        crate::io::SliceInput::new(input),
        config.validation.unwrap_or_default(),
        config.reader_config(),
    )?;
    let value = T::decode(&mut r)?;
    if !prefix_only && !r.has_end_of_input() {
        return Err(Error::unexpected(
            crate::error::Expectation::Kind(crate::event::Kind::END_OF_INPUT.bits()),
            r.position(),
        ));
    }
    Ok((value, &input[r.position()..]))
}

#[cfg(all(test, feature = "alloc"))]
mod tests {
    use super::*;

    #[test]
    fn encode_decode_round_trips_int() {
        let bytes = encode(&42_i32, EncodeConfig::new()).unwrap();
        assert_eq!(bytes, [0x18, 0x2a]);
        let (v, rest): (i32, _) = decode(&bytes, false, DecodeConfig::new()).unwrap();
        assert_eq!(v, 42);
        assert!(rest.is_empty());
    }

    #[test]
    fn decode_prefix_only_returns_remainder() {
        let mut bytes = encode(&1_i32, EncodeConfig::new()).unwrap();
        bytes.extend_from_slice(&[0xff; 2]);
        let (v, rest): (i32, _) = decode(&bytes, true, DecodeConfig::new()).unwrap();
        assert_eq!(v, 1);
        assert_eq!(rest, [0xff, 0xff]);
    }

    #[test]
    fn decode_rejects_trailing_bytes_unless_prefix_only() {
        let mut bytes = encode(&1_i32, EncodeConfig::new()).unwrap();
        bytes.push(0x02);
        let err = decode::<i32>(&bytes, false, DecodeConfig::new()).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::UnexpectedDataItem);
    }

    #[test]
    fn top_level_break_is_rejected() {
        let err = decode::<i32>(&[0xff], false, DecodeConfig::new()).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::UnexpectedDataItem);
    }
}

/// Construct a path slice element for use by the derive crate's attribute
/// parsing. Kept as a crate-root re-export so `streamcbor-derive`-generated
/// code can refer to it as `$crate::...` without depending on module
/// layout.
#[doc(hidden)]
pub mod __private {
    pub use crate::error::Error;
}
