//! The event sink (C2): a uniform push interface for every CBOR data item.
//!
//! Per [`crate::event::Event`]'s design, there is exactly one method,
//! `on_event`, rather than one method per kind — this keeps every stage of
//! the pipeline (parser → validator → buffer, or writer → validator →
//! emitter) a plain `match` over the same closed enum. Implementors that
//! need to deep-clone their state (the validator's level stack, the
//! buffer's last-seen item) do so through the ordinary `Clone` trait rather
//! than a bespoke `copy` method.

use crate::error::Error;
use crate::event::Event;

/// Something that consumes one CBOR data item at a time.
pub trait Receiver {
    /// Handle the next pushed event.
    ///
    /// # Errors
    /// Implementations return an error for any event they cannot accept —
    /// a validator rejecting a malformed sequence, an emitter failing to
    /// write, or a decoder's typed layer raising `UnexpectedDataItem`.
    fn on_event(&mut self, event: Event<'_>) -> Result<(), Error>;
}
