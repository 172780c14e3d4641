use core::fmt;

#[cfg(feature = "alloc")]
use alloc::boxed::Box;

/// A structured error kind identifying why an encode or decode operation failed.
///
/// This enum is intentionally stable and (outside `General`) string-free, so the
/// error type stays `Copy` and usable without an allocator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[non_exhaustive]
pub enum ErrorKind {
    /// Malformed bytes on the wire: a reserved additional-info value, an
    /// illegal simple-value byte, or another structurally impossible head.
    InvalidCborData,
    /// A well-formedness rule was violated: an `OverLong` with its high bit
    /// clear, an out-of-range `SimpleValue` from the producer side, or a
    /// width-narrowing failure on a typed read.
    ValidationFailure,
    /// More bytes were required to complete the current head or payload.
    InsufficientInput,
    /// A typed read was attempted against a buffered item of the wrong kind.
    UnexpectedDataItem,
    /// A construct was rejected by configuration (indefinite lengths
    /// disabled, or a length above the configured cap).
    Unsupported,
    /// A bounded resource was exceeded (nesting depth, accumulated
    /// indefinite-length count, output size).
    Overflow,
    /// Any other failure raised by user-supplied encoder/decoder code.
    General,
}

impl ErrorKind {
    const fn message(self) -> &'static str {
        match self {
            Self::InvalidCborData => "invalid CBOR data",
            Self::ValidationFailure => "CBOR well-formedness violated",
            Self::InsufficientInput => "insufficient input",
            Self::UnexpectedDataItem => "unexpected data item",
            Self::Unsupported => "construct rejected by configuration",
            Self::Overflow => "bounded resource exceeded",
            Self::General => "user code failed",
        }
    }
}

/// A payload distinguishing why an `UnexpectedDataItem` occurred, without
/// requiring string storage.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[non_exhaustive]
pub enum Expectation {
    /// Any single data item, but not a `Break`.
    AnyDataItem,
    /// One specific `Kind` bit (see [`crate::event::Kind`]).
    Kind(u32),
}

/// A decode/encode error: a stable [`ErrorKind`] plus the byte offset (into
/// whichever input/output carrier was active) where it was detected.
///
/// Errors raised by [`crate::parser::Parser`] and [`crate::emitter::Emitter`]
/// carry the `Input`/`Output` cursor position at the point of failure.
/// Errors raised by [`crate::validator::Validator`] do not: the validator
/// observes a stream of [`crate::event::Event`]s, not byte offsets, so its
/// `position` is always `0`, even when reached through a [`crate::reader::Reader`].
/// Callers that need an offset for a validation failure should use
/// `Reader::position` themselves — it reports the cursor position of the
/// item that was being read when the failure occurred.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Error {
    kind: ErrorKind,
    position: usize,
    expectation: Option<Expectation>,
    #[cfg(feature = "alloc")]
    cause: Option<GeneralCause>,
}

#[cfg(feature = "alloc")]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct GeneralCause(&'static str);

impl Error {
    /// Construct an error of `kind` detected at byte `position`.
    #[inline]
    #[must_use]
    pub const fn new(kind: ErrorKind, position: usize) -> Self {
        Self {
            kind,
            position,
            expectation: None,
            #[cfg(feature = "alloc")]
            cause: None,
        }
    }

    /// Construct an `UnexpectedDataItem` error carrying what was expected.
    #[inline]
    #[must_use]
    pub const fn unexpected(expectation: Expectation, position: usize) -> Self {
        Self {
            kind: ErrorKind::UnexpectedDataItem,
            position,
            expectation: Some(expectation),
            #[cfg(feature = "alloc")]
            cause: None,
        }
    }

    /// Wrap a failure from user-supplied encoder/decoder code as `General`.
    #[inline]
    #[must_use]
    pub const fn general(position: usize) -> Self {
        Self {
            kind: ErrorKind::General,
            position,
            expectation: None,
            #[cfg(feature = "alloc")]
            cause: None,
        }
    }

    /// The error's classification.
    #[inline]
    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        self.kind
    }

    /// The byte offset into the active input/output carrier where the
    /// error was detected.
    #[inline]
    #[must_use]
    pub const fn position(&self) -> usize {
        self.position
    }

    /// The `Expectation` carried by an `UnexpectedDataItem` error, if any.
    #[inline]
    #[must_use]
    pub const fn expectation(&self) -> Option<Expectation> {
        self.expectation
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.expectation {
            Some(Expectation::AnyDataItem) => write!(
                f,
                "cbor error at {}: {} (expected any data item except BREAK, got BREAK)",
                self.position,
                self.kind.message()
            ),
            Some(Expectation::Kind(mask)) => write!(
                f,
                "cbor error at {}: {} (expected kind mask {mask:#x})",
                self.position,
                self.kind.message()
            ),
            None => write!(f, "cbor error at {}: {}", self.position, self.kind.message()),
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for Error {}

/// A `Box<dyn Error>`-backed companion to [`Error`], used by the facade to
/// carry a user-code failure cause under the `alloc` feature. Kept separate
/// from `Error` so the latter stays `Copy`.
#[cfg(feature = "alloc")]
pub struct CausedError {
    /// The underlying structured error.
    pub error: Error,
    /// The user-code failure that triggered a `General` error, if any.
    pub cause: Option<Box<dyn core::error::Error + Send + Sync>>,
}

#[cfg(feature = "alloc")]
impl CausedError {
    /// Wrap a user-code failure as a `General` error at `position`.
    #[must_use]
    pub fn from_cause(
        position: usize,
        cause: Box<dyn core::error::Error + Send + Sync>,
    ) -> Self {
        Self {
            error: Error::general(position),
            cause: Some(cause),
        }
    }
}

#[cfg(feature = "alloc")]
impl From<Error> for CausedError {
    fn from(error: Error) -> Self {
        Self { error, cause: None }
    }
}

#[cfg(feature = "alloc")]
impl fmt::Debug for CausedError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CausedError")
            .field("error", &self.error)
            .finish_non_exhaustive()
    }
}

#[cfg(feature = "alloc")]
impl fmt::Display for CausedError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.error.fmt(f)
    }
}

#[cfg(all(feature = "std", feature = "alloc"))]
impl std::error::Error for CausedError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.cause
            .as_deref()
            .map(|c| c as &(dyn std::error::Error + 'static))
    }
}

#[cfg(all(test, feature = "alloc"))]
mod tests {
    use super::*;
    use alloc::string::ToString;

    #[test]
    fn display_includes_position() {
        let e = Error::new(ErrorKind::InsufficientInput, 7);
        assert!(e.to_string().contains('7'));
    }

    #[test]
    fn unexpected_carries_expectation() {
        let e = Error::unexpected(Expectation::AnyDataItem, 0);
        assert_eq!(e.kind(), ErrorKind::UnexpectedDataItem);
        assert_eq!(e.expectation(), Some(Expectation::AnyDataItem));
    }
}
