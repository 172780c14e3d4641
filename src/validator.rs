//! The validator (C6): a `Receiver` wrapper that verifies well-formedness
//! and nesting limits before delegating to its target. It maintains a
//! stack of *levels*, one per currently open container, each tracking how
//! many sub-items remain (or have accumulated, for indefinite containers)
//! and which kinds are legal next.

use crate::error::{Error, ErrorKind, Expectation};
use crate::event::{Event, Kind, Tag};
use crate::receiver::Receiver;

#[cfg(feature = "alloc")]
use crate::alloc_util::try_reserve;
#[cfg(feature = "alloc")]
use alloc::vec::Vec;

/// Resource limits and feature toggles enforced by the validator.
///
/// All fields are bounded naturals by construction; there is no invalid
/// combination to reject at construction time, so `ValidationConfig` has
/// no fallible constructor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ValidationConfig {
    /// Reject any indefinite-length (`*Start`) construct outright.
    pub prohibit_unbounded_lengths: bool,
    /// Maximum declared length of a definite-length array.
    pub max_array_length: u64,
    /// Maximum declared pair count of a definite-length map.
    pub max_map_length: u64,
    /// Maximum container nesting depth.
    pub max_nesting_levels: u32,
}

impl ValidationConfig {
    /// Defaults matching the documented contract: unbounded lengths
    /// allowed, array/map length capped at `i32::MAX`, nesting at 1000.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            prohibit_unbounded_lengths: false,
            max_array_length: i32::MAX as u64,
            max_map_length: i32::MAX as u64,
            max_nesting_levels: 1000,
        }
    }
}

impl Default for ValidationConfig {
    fn default() -> Self {
        Self::new()
    }
}

/// One frame in the validator's nesting stack.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Level {
    /// `Some(n)` for a definite-length level: sub-items still owed.
    /// `None` for an indefinite level: still open, no fixed count.
    remaining: Option<u64>,
    /// Sub-items accumulated so far at this level (used to enforce the
    /// cap on indefinite containers and to track map key/value parity).
    seen: u64,
    /// Kinds legal as the *next* event at this level.
    mask: Kind,
    is_map: bool,
}

impl Level {
    const fn is_unbounded(&self) -> bool {
        self.remaining.is_none()
    }
}

const INLINE_DEPTH: usize = 32;

/// A small nesting stack: an inline array for the common case, spilling to
/// a growable `Vec` under `alloc` once `INLINE_DEPTH` is exceeded. Mirrors
/// the byte-level skip-stack used for truncation-safe scanning: depth, not
/// byte length, drives how much space the validator needs.
#[derive(Debug, Clone)]
struct LevelStack {
    inline: [Option<Level>; INLINE_DEPTH],
    len: usize,
    #[cfg(feature = "alloc")]
    overflow: Vec<Level>,
}

impl LevelStack {
    const fn new() -> Self {
        Self {
            inline: [None; INLINE_DEPTH],
            len: 0,
            #[cfg(feature = "alloc")]
            overflow: Vec::new(),
        }
    }

    fn depth(&self) -> usize {
        #[cfg(feature = "alloc")]
        {
            self.len + self.overflow.len()
        }
        #[cfg(not(feature = "alloc"))]
        {
            self.len
        }
    }

    fn push(&mut self, level: Level, position: usize) -> Result<(), Error> {
        #[cfg(feature = "alloc")]
        {
            if !self.overflow.is_empty() {
                try_reserve(&mut self.overflow, 1, position)?;
                self.overflow.push(level);
                return Ok(());
            }
        }
        if self.len < INLINE_DEPTH {
            self.inline[self.len] = Some(level);
            self.len += 1;
            return Ok(());
        }
        #[cfg(feature = "alloc")]
        {
            try_reserve(&mut self.overflow, 1, position)?;
            self.overflow.push(level);
            Ok(())
        }
        #[cfg(not(feature = "alloc"))]
        {
            Err(Error::new(ErrorKind::Overflow, position))
        }
    }

    fn top_mut(&mut self) -> Option<&mut Level> {
        #[cfg(feature = "alloc")]
        {
            if let Some(l) = self.overflow.last_mut() {
                return Some(l);
            }
        }
        if self.len == 0 {
            None
        } else {
            self.inline[self.len - 1].as_mut()
        }
    }

    fn pop(&mut self) -> Option<Level> {
        #[cfg(feature = "alloc")]
        {
            if let Some(l) = self.overflow.pop() {
                return Some(l);
            }
        }
        if self.len == 0 {
            None
        } else {
            self.len -= 1;
            self.inline[self.len].take()
        }
    }
}

/// A `Receiver` wrapper enforcing CBOR well-formedness and the configured
/// resource limits before delegating each event to its `target`.
#[derive(Debug, Clone)]
pub struct Validator<R> {
    target: R,
    config: ValidationConfig,
    levels: LevelStack,
    /// The mask a tag (if any) imposes on the very next event, overriding
    /// (by intersection) the current level's own mask.
    pending_tag_mask: Option<Kind>,
}

impl<R: Receiver> Validator<R> {
    /// Wrap `target`, starting at level -1 (top level, any item but `Break`
    /// legal, `EndOfInput` legal).
    #[must_use]
    pub const fn new(target: R, config: ValidationConfig) -> Self {
        Self {
            target,
            config,
            levels: LevelStack::new(),
            pending_tag_mask: None,
        }
    }

    /// Consume the validator, returning its target.
    pub fn into_inner(self) -> R {
        self.target
    }

    /// The wrapped target.
    pub const fn inner(&self) -> &R {
        &self.target
    }

    /// The wrapped target, mutably.
    pub fn inner_mut(&mut self) -> &mut R {
        &mut self.target
    }

    /// Current nesting depth (0 at top level).
    #[must_use]
    pub fn depth(&self) -> usize {
        self.levels.depth()
    }

    fn check_kind_allowed(&mut self, kind: Kind, position: usize) -> Result<(), Error> {
        let allowed = match self.pending_tag_mask {
            Some(tag_mask) => tag_mask,
            None => self
                .levels
                .top_mut()
                .map_or(Kind::ALL_BUT_BREAK, |l| l.mask),
        };
        if allowed.intersects(kind) {
            Ok(())
        } else if kind == Kind::BREAK {
            Err(Error::unexpected(Expectation::AnyDataItem, position))
        } else {
            Err(Error::unexpected(Expectation::Kind(allowed.bits()), position))
        }
    }

    fn enter_level(
        &mut self,
        definite_len: Option<u64>,
        content_mask: Kind,
        is_map: bool,
        position: usize,
    ) -> Result<(), Error> {
        if let Some(n) = definite_len {
            let cap = if is_map {
                self.config.max_map_length
            } else {
                self.config.max_array_length
            };
            if n > cap {
                return Err(Error::new(ErrorKind::Unsupported, position));
            }
        } else if self.config.prohibit_unbounded_lengths {
            return Err(Error::new(ErrorKind::Unsupported, position));
        }

        let next_depth = self.levels.depth() + 1;
        if next_depth > self.config.max_nesting_levels as usize {
            return Err(Error::new(ErrorKind::Overflow, position));
        }

        let remaining = definite_len.map(|n| if is_map { n * 2 } else { n });
        self.levels.push(
            Level {
                remaining,
                seen: 0,
                mask: content_mask,
                is_map,
            },
            position,
        )
    }

    /// Count one non-container event at the current level, popping (and
    /// recursively counting in the parent) any definite-length level that
    /// reaches zero remaining sub-items.
    fn count_one(&mut self, position: usize) -> Result<(), Error> {
        loop {
            let max_array_length = self.config.max_array_length;
            let max_map_length = self.config.max_map_length;
            let Some(level) = self.levels.top_mut() else {
                return Ok(());
            };
            level.seen += 1;
            match &mut level.remaining {
                None => {
                    let cap = if level.is_map {
                        max_map_length.saturating_mul(2)
                    } else {
                        max_array_length
                    };
                    if level.seen > cap {
                        return Err(Error::new(ErrorKind::Overflow, position));
                    }
                    return Ok(());
                }
                Some(remaining) => {
                    *remaining = remaining.checked_sub(1).ok_or_else(|| {
                        Error::new(ErrorKind::ValidationFailure, position)
                    })?;
                    if *remaining > 0 {
                        return Ok(());
                    }
                }
            }
            self.levels.pop();
            // The level we just closed counts as one sub-item of its parent.
        }
    }

    fn handle_break(&mut self, position: usize) -> Result<(), Error> {
        let Some(level) = self.levels.top_mut() else {
            return Err(Error::unexpected(Expectation::AnyDataItem, position));
        };
        if !level.is_unbounded() {
            return Err(Error::unexpected(Expectation::AnyDataItem, position));
        }
        if level.is_map && level.seen % 2 != 0 {
            return Err(Error::new(ErrorKind::ValidationFailure, position));
        }
        self.levels.pop();
        self.count_one(position)
    }

    fn handle_end_of_input(&self, position: usize) -> Result<(), Error> {
        if self.levels.depth() == 0 {
            Ok(())
        } else {
            Err(Error::new(ErrorKind::InsufficientInput, position))
        }
    }
}

impl<R: Receiver> Receiver for Validator<R> {
    fn on_event(&mut self, event: Event<'_>) -> Result<(), Error> {
        // The validator sees events, not byte offsets, so it has no
        // meaningful position to report; see the caveat on `Error`'s docs.
        let position = 0;
        let kind = event.kind();

        if kind == Kind::END_OF_INPUT {
            self.handle_end_of_input(position)?;
            return self.target.on_event(event);
        }

        self.check_kind_allowed(kind, position)?;

        if let Event::PosOverLong(v) | Event::NegOverLong(v) = event {
            if !v.is_valid() {
                return Err(Error::new(ErrorKind::ValidationFailure, position));
            }
        }
        if let Event::SimpleValue(_) = event {
            // SimpleValue::new already rejects 24..=31 at construction, so
            // any value reaching here is legal by construction.
        }

        let tag_mask_for_next = if let Event::Tag(tag) = event {
            tag.following_mask()
        } else {
            None
        };

        if kind == Kind::BREAK {
            self.handle_break(position)?;
        } else if event.opens_level() {
            let (definite_len, is_map) = match event {
                Event::ArrayHeader(n) => (Some(n), false),
                Event::ArrayStart => (None, false),
                Event::MapHeader(n) => (Some(n), true),
                Event::MapStart => (None, true),
                _ => unreachable!("opens_level() only matches the four container events"),
            };
            let content_mask = if let Some(Kind::ARRAY_HEADER) = self.pending_tag_mask {
                // DecimalFraction / BigFloat: [exponent, mantissa], both integers
                // (possibly tagged big nums).
                if definite_len != Some(2) {
                    return Err(Error::new(ErrorKind::ValidationFailure, position));
                }
                Kind::INTEGER.union(Kind::TAG)
            } else {
                Kind::ALL_BUT_BREAK
            };
            self.pending_tag_mask = None;
            self.enter_level(definite_len, content_mask, is_map, position)?;
            self.target.on_event(event)?;
            return Ok(());
        } else {
            self.count_one(position)?;
        }

        self.pending_tag_mask = tag_mask_for_next;
        self.target.on_event(event)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::buffer::BufferingReceiver;

    fn validator() -> Validator<BufferingReceiver> {
        Validator::new(BufferingReceiver::new(), ValidationConfig::new())
    }

    #[test]
    fn accepts_well_formed_array() {
        let mut v = validator();
        v.on_event(Event::ArrayHeader(2)).unwrap();
        v.on_event(Event::Long(1)).unwrap();
        v.on_event(Event::Long(2)).unwrap();
        v.on_event(Event::EndOfInput).unwrap();
    }

    #[test]
    fn rejects_array_length_mismatch_via_premature_end_of_input() {
        let mut v = validator();
        v.on_event(Event::ArrayHeader(2)).unwrap();
        v.on_event(Event::Long(1)).unwrap();
        assert!(v.on_event(Event::EndOfInput).is_err());
    }

    #[test]
    fn break_legal_only_in_unbounded_level() {
        let mut v = validator();
        v.on_event(Event::ArrayHeader(0)).unwrap();
        assert!(v.on_event(Event::Break).is_err());

        let mut v2 = validator();
        v2.on_event(Event::ArrayStart).unwrap();
        v2.on_event(Event::Break).unwrap();
    }

    #[test]
    fn map_break_requires_even_sub_items() {
        let mut v = validator();
        v.on_event(Event::MapStart).unwrap();
        v.on_event(Event::Text("a")).unwrap();
        assert!(v.on_event(Event::Break).is_err());
    }

    #[test]
    fn map_break_accepted_after_pairs() {
        let mut v = validator();
        v.on_event(Event::MapStart).unwrap();
        v.on_event(Event::Text("a")).unwrap();
        v.on_event(Event::Long(1)).unwrap();
        v.on_event(Event::Break).unwrap();
    }

    #[test]
    fn nesting_depth_cap_triggers_overflow() {
        let mut config = ValidationConfig::new();
        config.max_nesting_levels = 1;
        let mut v = Validator::new(BufferingReceiver::new(), config);
        v.on_event(Event::ArrayHeader(1)).unwrap();
        assert!(v.on_event(Event::ArrayHeader(0)).is_err());
    }

    #[test]
    fn unbounded_disallowed_when_configured() {
        let mut config = ValidationConfig::new();
        config.prohibit_unbounded_lengths = true;
        let mut v = Validator::new(BufferingReceiver::new(), config);
        assert!(v.on_event(Event::ArrayStart).is_err());
    }

    #[test]
    fn over_long_with_clear_high_bit_is_rejected() {
        use crate::event::OverLong;
        let mut v = validator();
        assert!(v.on_event(Event::PosOverLong(OverLong(0))).is_err());
    }

    #[test]
    fn tag_restricts_following_item_kind() {
        let mut v = validator();
        v.on_event(Event::Tag(Tag::EpochDateTime)).unwrap();
        assert!(v.on_event(Event::Text("not a number")).is_err());

        let mut v2 = validator();
        v2.on_event(Event::Tag(Tag::EpochDateTime)).unwrap();
        v2.on_event(Event::Long(1_700_000_000)).unwrap();
    }

    #[test]
    fn end_of_input_illegal_inside_open_container() {
        let mut v = validator();
        v.on_event(Event::ArrayStart).unwrap();
        assert!(v.on_event(Event::EndOfInput).is_err());
    }

    #[test]
    fn break_at_top_level_is_unexpected_data_item() {
        let mut v = validator();
        let err = v.on_event(Event::Break).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::UnexpectedDataItem);
    }

    #[test]
    fn indefinite_array_over_cap_overflows() {
        let mut config = ValidationConfig::new();
        config.max_array_length = 2;
        let mut v = Validator::new(BufferingReceiver::new(), config);
        v.on_event(Event::ArrayStart).unwrap();
        v.on_event(Event::Long(1)).unwrap();
        v.on_event(Event::Long(2)).unwrap();
        let err = v.on_event(Event::Long(3)).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Overflow);
    }

    #[test]
    fn indefinite_map_over_cap_overflows() {
        let mut config = ValidationConfig::new();
        config.max_map_length = 1;
        let mut v = Validator::new(BufferingReceiver::new(), config);
        v.on_event(Event::MapStart).unwrap();
        v.on_event(Event::Text("a")).unwrap();
        v.on_event(Event::Long(1)).unwrap();
        let err = v.on_event(Event::Text("b")).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Overflow);
    }
}
