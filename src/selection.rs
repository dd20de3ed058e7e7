//! Selection state over document blocks.

use crate::document::BlockKey;

/// A selection across the document, in char offsets.
///
/// The anchor is where the selection began; the focus is where it ends.
/// A backward selection has its focus before its anchor in document
/// order, so the direction-aware [`Selection::start_key`] /
/// [`Selection::end_key`] accessors are the ones range arithmetic should
/// use.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Selection {
    anchor_key: BlockKey,
    anchor_offset: usize,
    focus_key: BlockKey,
    focus_offset: usize,
    backward: bool,
}

impl Selection {
    /// Create a selection from explicit endpoints.
    pub const fn new(
        anchor_key: BlockKey,
        anchor_offset: usize,
        focus_key: BlockKey,
        focus_offset: usize,
        backward: bool,
    ) -> Self {
        Self {
            anchor_key,
            anchor_offset,
            focus_key,
            focus_offset,
            backward,
        }
    }

    /// Create a collapsed selection (a bare cursor) at one point.
    pub fn collapsed(key: BlockKey, offset: usize) -> Self {
        Self {
            anchor_key: key.clone(),
            anchor_offset: offset,
            focus_key: key,
            focus_offset: offset,
            backward: false,
        }
    }

    /// Create a forward selection over a char range within one block.
    pub fn span(key: BlockKey, start: usize, end: usize) -> Self {
        debug_assert!(start <= end, "inverted span {start}..{end}");
        Self {
            anchor_key: key.clone(),
            anchor_offset: start,
            focus_key: key,
            focus_offset: end,
            backward: false,
        }
    }

    /// The anchor block key.
    pub const fn anchor_key(&self) -> &BlockKey {
        &self.anchor_key
    }

    /// The anchor char offset.
    pub const fn anchor_offset(&self) -> usize {
        self.anchor_offset
    }

    /// The focus block key.
    pub const fn focus_key(&self) -> &BlockKey {
        &self.focus_key
    }

    /// The focus char offset.
    pub const fn focus_offset(&self) -> usize {
        self.focus_offset
    }

    /// Whether the focus precedes the anchor in document order.
    pub const fn is_backward(&self) -> bool {
        self.backward
    }

    /// Returns true if anchor and focus coincide.
    pub fn is_collapsed(&self) -> bool {
        self.anchor_key == self.focus_key && self.anchor_offset == self.focus_offset
    }

    /// The key of the endpoint that comes first in document order.
    pub const fn start_key(&self) -> &BlockKey {
        if self.backward {
            &self.focus_key
        } else {
            &self.anchor_key
        }
    }

    /// The offset of the endpoint that comes first in document order.
    pub const fn start_offset(&self) -> usize {
        if self.backward {
            self.focus_offset
        } else {
            self.anchor_offset
        }
    }

    /// The key of the endpoint that comes last in document order.
    pub const fn end_key(&self) -> &BlockKey {
        if self.backward {
            &self.anchor_key
        } else {
            &self.focus_key
        }
    }

    /// The offset of the endpoint that comes last in document order.
    pub const fn end_offset(&self) -> usize {
        if self.backward {
            self.anchor_offset
        } else {
            self.focus_offset
        }
    }

    /// Both offsets shifted right by `n` chars, keys unchanged.
    #[must_use]
    pub fn shifted_right(&self, n: usize) -> Self {
        let mut shifted = self.clone();
        shifted.anchor_offset += n;
        shifted.focus_offset += n;
        shifted
    }

    /// Both offsets shifted left by `n` chars, saturating at zero.
    #[must_use]
    pub fn shifted_left(&self, n: usize) -> Self {
        let mut shifted = self.clone();
        shifted.anchor_offset = shifted.anchor_offset.saturating_sub(n);
        shifted.focus_offset = shifted.focus_offset.saturating_sub(n);
        shifted
    }
}
