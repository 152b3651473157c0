//! The per-pass decoration tree.
//!
//! [`RangeTree`] plays the synthetic root node: it spans the whole buffer, is
//! never breakable and is never split. It owns the top-level decorations and
//! is discarded once the pass has been rendered.

use super::node::{insert_into_level, level_is_well_formed, RangeNode};
use super::range::Range;
use log::trace;

/// Root of a decoration tree built over one buffer snapshot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RangeTree<T> {
    span: Range,
    /// Offsets that fall inside a multi-byte char of the buffer, sorted.
    interior: Vec<usize>,
    children: Vec<RangeNode<T>>,
}

impl<T> RangeTree<T> {
    /// Create an empty tree spanning `[0, len)`.
    ///
    /// The tree knows nothing about the text, so every offset is accepted.
    /// Prefer [`RangeTree::for_buffer`].
    pub fn new(len: usize) -> Self {
        Self {
            span: Range::new(0, len),
            interior: Vec::new(),
            children: Vec::new(),
        }
    }

    /// Create an empty tree spanning the whole of `buffer`.
    ///
    /// Candidates that would cut one of the buffer's chars are refused.
    pub fn for_buffer(buffer: &str) -> Self {
        Self {
            interior: buffer
                .char_indices()
                .flat_map(|(i, c)| i + 1..i + c.len_utf8())
                .collect(),
            ..Self::new(buffer.len())
        }
    }

    /// The range covered by the root.
    pub fn span(&self) -> Range {
        self.span
    }

    /// Top-level decorations, sorted by start.
    pub fn children(&self) -> &[RangeNode<T>] {
        &self.children
    }

    /// Whether no decoration has been placed.
    pub fn is_empty(&self) -> bool {
        self.children.is_empty()
    }

    /// Number of decoration nodes in the tree (the root is not counted).
    pub fn node_count(&self) -> usize {
        self.children.iter().map(RangeNode::node_count).sum()
    }

    /// Whether every node is nested in its parent and no siblings overlap.
    pub fn is_well_formed(&self) -> bool {
        level_is_well_formed(self.span, &self.children)
    }

    fn cuts_char(&self, offset: usize) -> bool {
        self.interior.binary_search(&offset).is_ok()
    }
}

impl<T: Clone> RangeTree<T> {
    /// Offer a candidate decoration to the tree.
    ///
    /// Returns `false`, leaving the tree as it was, when the candidate is
    /// malformed, lies outside the buffer or cannot be placed without
    /// fragmenting a non-breakable decoration.
    pub fn try_insert(&mut self, node: RangeNode<T>) -> bool {
        let range = node.range();
        if range.start > range.end {
            trace!("{} rejected: inverted range", range);
            return false;
        }
        if !self.span.contains(&range) {
            trace!("{} rejected: outside buffer {}", range, self.span);
            return false;
        }
        if self.cuts_char(range.start) || self.cuts_char(range.end) {
            trace!("{} rejected: not on char boundaries", range);
            return false;
        }
        insert_into_level(&mut self.children, node, false).is_ok()
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
