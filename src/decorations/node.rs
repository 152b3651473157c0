//! Range nodes and the insertion algorithm.
//!
//! A [`RangeNode`] is one decoration instance. It exclusively owns its
//! children, which are sorted by start, never overlap each other and lie
//! inside the node's own range. [`RangeNode::try_insert`] is the only way a
//! node gains descendants; it either places the candidate (splitting it when
//! the candidate is breakable) or leaves the tree untouched.

use super::range::Range;
use log::trace;

// ─────────────────────────────────────────────────────────────────────────────
// Range Node
// ─────────────────────────────────────────────────────────────────────────────

/// One decoration over `[start, end)` of the buffer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RangeNode<T> {
    range: Range,
    tag: T,
    breakable: bool,
    children: Vec<RangeNode<T>>,
}

impl<T> RangeNode<T> {
    /// Create a childless node.
    pub fn new(start: usize, end: usize, tag: T, breakable: bool) -> Self {
        Self::with_range(Range::new(start, end), tag, breakable)
    }

    /// Create a childless node from an existing range.
    pub fn with_range(range: Range, tag: T, breakable: bool) -> Self {
        Self {
            range,
            tag,
            breakable,
            children: Vec::new(),
        }
    }

    /// The decorated range.
    pub fn range(&self) -> Range {
        self.range
    }

    /// Start offset (inclusive).
    pub fn start(&self) -> usize {
        self.range.start
    }

    /// End offset (exclusive).
    pub fn end(&self) -> usize {
        self.range.end
    }

    /// The caller-supplied render tag.
    pub fn tag(&self) -> &T {
        &self.tag
    }

    /// Whether this node may be split when it conflicts with a placed node.
    pub fn is_breakable(&self) -> bool {
        self.breakable
    }

    /// Direct children, sorted by start.
    pub fn children(&self) -> &[RangeNode<T>] {
        &self.children
    }

    /// Number of nodes in this subtree, including `self`.
    pub fn node_count(&self) -> usize {
        1 + self.children.iter().map(RangeNode::node_count).sum::<usize>()
    }

    /// Check containment and sibling order for this subtree.
    pub(crate) fn is_well_formed(&self) -> bool {
        level_is_well_formed(self.range, &self.children)
    }
}

impl<T: Clone> RangeNode<T> {
    /// Insert `node` somewhere in this subtree.
    ///
    /// Returns `false` and leaves the subtree untouched when no valid
    /// placement exists.
    pub fn try_insert(&mut self, node: RangeNode<T>) -> bool {
        self.insert(node).is_ok()
    }

    /// Insert `node`, handing it back unchanged on rejection.
    pub(crate) fn insert(&mut self, node: RangeNode<T>) -> Result<(), RangeNode<T>> {
        self.place(node, false)
    }

    /// Insert `node`; a `piece` is a fragment of a split candidate and may
    /// nest inside a node with exactly its bounds.
    fn place(&mut self, node: RangeNode<T>, piece: bool) -> Result<(), RangeNode<T>> {
        if node.range.start > node.range.end {
            trace!("{} rejected: inverted range", node.range);
            return Err(node);
        }
        if !self.range.contains(&node.range) {
            trace!("{} rejected: not inside {}", node.range, self.range);
            return Err(node);
        }
        insert_into_level(&mut self.children, node, piece)
    }

    /// Cut this node at `at`, returning the two childless pieces and the
    /// children they must re-adopt.
    fn split_at(mut self, at: usize) -> (RangeNode<T>, RangeNode<T>, Vec<RangeNode<T>>) {
        let orphans = std::mem::take(&mut self.children);
        let left = RangeNode::with_range(
            Range::new(self.range.start, at),
            self.tag.clone(),
            self.breakable,
        );
        let right = RangeNode::with_range(Range::new(at, self.range.end), self.tag, self.breakable);
        (left, right, orphans)
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Insertion
// ─────────────────────────────────────────────────────────────────────────────

/// Place `node` among `children`, whose parent is already known to contain it.
///
/// Nothing in `children` is touched until the whole placement has succeeded:
/// siblings that must change are cloned, changed, and swapped in at the end.
/// `piece` marks a fragment of a candidate split further up the tree.
pub(crate) fn insert_into_level<T: Clone>(
    children: &mut Vec<RangeNode<T>>,
    node: RangeNode<T>,
    piece: bool,
) -> Result<(), RangeNode<T>> {
    // Siblings never overlap, so at most one child can contain the candidate.
    if let Some(host) = children
        .iter_mut()
        .find(|c| (piece || c.range != node.range) && c.range.contains(&node.range))
    {
        return host.place(node, piece);
    }

    let original = node.range;
    let mut live = node;
    let mut split = piece;
    // Copy of the candidate as offered, taken just before `live` first changes.
    let mut pristine: Option<RangeNode<T>> = None;
    let mut slot: Option<usize> = None;
    let mut absorbed_by: Option<usize> = None;
    let mut adopted: Vec<usize> = Vec::new();
    let mut grown: Vec<(usize, RangeNode<T>)> = Vec::new();

    macro_rules! reject {
        ($($arg:tt)*) => {{
            trace!($($arg)*);
            return Err(pristine.unwrap_or(live));
        }};
    }

    for (index, child) in children.iter().enumerate() {
        if !split && child.range == live.range {
            reject!("{} rejected: identical range already decorated", live.range);
        }
        if child.range.precedes(&live.range) {
            continue;
        }
        if live.range.precedes(&child.range) {
            slot = Some(index);
            break;
        }

        if child.range.contains(&live.range) {
            // Only the remainder of a split gets here: it starts where this
            // child starts and fits inside it whole.
            absorbed_by = Some(index);
            break;
        }

        if live.range.contains(&child.range) {
            if pristine.is_none() {
                pristine = Some(live.clone());
            }
            if let Err(child) = live.insert(child.clone()) {
                reject!("{} rejected: cannot adopt {}", original, child.range);
            }
            adopted.push(index);
            continue;
        }

        if !live.breakable {
            reject!("{} rejected: crosses {}", live.range, child.range);
        }

        if pristine.is_none() {
            pristine = Some(live.clone());
        }
        split = true;

        if child.range.start > live.range.start {
            // Child starts inside the candidate and runs past its end.
            let (mut before, mut inside, orphans) = live.split_at(child.range.start);
            if !rehome(orphans, &mut inside, &mut before) {
                live = before;
                reject!("{} rejected: orphan lost while splitting", original);
            }
            let mut host = child.clone();
            if host.place(inside, true).is_err() {
                live = before;
                reject!("{} rejected: {} refused its piece", original, child.range);
            }
            grown.push((index, host));
            live = before;
            slot = Some(index);
            break;
        }

        // Child starts before the candidate and ends inside it.
        let (mut inside, mut after, orphans) = live.split_at(child.range.end);
        if !rehome(orphans, &mut inside, &mut after) {
            live = after;
            reject!("{} rejected: orphan lost while splitting", original);
        }
        let mut host = child.clone();
        if host.place(inside, true).is_err() {
            live = after;
            reject!("{} rejected: {} refused its piece", original, child.range);
        }
        grown.push((index, host));
        live = after;
    }

    if let Some(index) = absorbed_by {
        let mut host = children[index].clone();
        if let Err(remainder) = host.place(live, true) {
            live = remainder;
            reject!("{} rejected: {} refused its piece", original, host.range);
        }
        trace!("{} placed; remainder went into {}", original, host.range);
        grown.push((index, host));
        commit(children, grown, adopted, index);
        return Ok(());
    }

    let slot = slot.unwrap_or(children.len());
    let slot = commit(children, grown, adopted, slot);
    if live.range.is_empty() && live.range != original {
        trace!("{} placed; zero-width remainder {} dropped", original, live.range);
    } else {
        children.insert(slot, live);
    }
    Ok(())
}

/// Swap grown siblings in and drop adopted ones. Returns `slot` shifted
/// back past the removed siblings.
fn commit<T>(
    children: &mut Vec<RangeNode<T>>,
    grown: Vec<(usize, RangeNode<T>)>,
    adopted: Vec<usize>,
    mut slot: usize,
) -> usize {
    for (index, host) in grown {
        children[index] = host;
    }
    for index in adopted.into_iter().rev() {
        children.remove(index);
        if index < slot {
            slot -= 1;
        }
    }
    slot
}

/// Hand orphans of a split candidate to its pieces, `inside` first.
fn rehome<T: Clone>(
    orphans: Vec<RangeNode<T>>,
    inside: &mut RangeNode<T>,
    outside: &mut RangeNode<T>,
) -> bool {
    for orphan in orphans {
        if let Err(orphan) = inside.insert(orphan) {
            if outside.insert(orphan).is_err() {
                return false;
            }
        }
    }
    true
}

/// Check that `children` are sorted, disjoint and inside `parent`, recursively.
pub(crate) fn level_is_well_formed<T>(parent: Range, children: &[RangeNode<T>]) -> bool {
    let nested = children.iter().all(|c| parent.contains(&c.range));
    let disjoint = children
        .windows(2)
        .all(|pair| pair[0].range.precedes(&pair[1].range));
    nested && disjoint && children.iter().all(RangeNode::is_well_formed)
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    fn node(start: usize, end: usize, tag: &'static str, breakable: bool) -> RangeNode<&'static str> {
        RangeNode::new(start, end, tag, breakable)
    }

    fn spans(children: &[RangeNode<&'static str>]) -> Vec<(usize, usize, &'static str)> {
        children
            .iter()
            .map(|c| (c.start(), c.end(), *c.tag()))
            .collect()
    }

    #[test]
    fn test_rejects_node_outside_receiver() {
        let mut parent = node(5, 10, "outer", false);
        assert!(!parent.try_insert(node(8, 12, "x", true)));
        assert!(!parent.try_insert(node(0, 3, "x", true)));
        assert!(parent.children().is_empty());
    }

    #[test]
    fn test_inserts_disjoint_children_in_order() {
        let mut parent = node(0, 20, "root", false);
        assert!(parent.try_insert(node(10, 12, "b", false)));
        assert!(parent.try_insert(node(2, 4, "a", false)));
        assert!(parent.try_insert(node(15, 18, "c", false)));
        assert_eq!(
            spans(parent.children()),
            vec![(2, 4, "a"), (10, 12, "b"), (15, 18, "c")]
        );
    }

    #[test]
    fn test_adjacent_siblings_allowed() {
        let mut parent = node(0, 10, "root", false);
        assert!(parent.try_insert(node(0, 5, "a", false)));
        assert!(parent.try_insert(node(5, 10, "b", false)));
        assert_eq!(parent.children().len(), 2);
        assert!(parent.is_well_formed());
    }

    #[test]
    fn test_descends_into_containing_child() {
        let mut parent = node(0, 20, "root", false);
        assert!(parent.try_insert(node(2, 12, "outer", false)));
        assert!(parent.try_insert(node(4, 6, "inner", false)));
        assert_eq!(parent.children().len(), 1);
        assert_eq!(spans(parent.children()[0].children()), vec![(4, 6, "inner")]);
    }

    #[test]
    fn test_wider_candidate_adopts_siblings() {
        let mut parent = node(0, 20, "root", false);
        assert!(parent.try_insert(node(0, 1, "before", false)));
        assert!(parent.try_insert(node(3, 5, "a", false)));
        assert!(parent.try_insert(node(6, 8, "b", false)));
        assert!(parent.try_insert(node(15, 16, "after", false)));
        assert!(parent.try_insert(node(2, 10, "wrap", false)));

        assert_eq!(
            spans(parent.children()),
            vec![(0, 1, "before"), (2, 10, "wrap"), (15, 16, "after")]
        );
        assert_eq!(
            spans(parent.children()[1].children()),
            vec![(3, 5, "a"), (6, 8, "b")]
        );
        assert!(parent.is_well_formed());
    }

    #[test]
    fn test_non_breakable_crossing_is_rejected() {
        let mut parent = node(0, 20, "root", false);
        assert!(parent.try_insert(node(0, 10, "first", false)));
        let before = parent.clone();
        assert!(!parent.try_insert(node(5, 15, "second", false)));
        assert_eq!(parent, before);
    }

    #[test]
    fn test_breakable_candidate_split_where_sibling_starts_inside() {
        let mut parent = node(0, 20, "root", false);
        assert!(parent.try_insert(node(5, 15, "code", false)));
        assert!(parent.try_insert(node(0, 10, "bold", true)));

        assert_eq!(spans(parent.children()), vec![(0, 5, "bold"), (5, 15, "code")]);
        assert_eq!(spans(parent.children()[1].children()), vec![(5, 10, "bold")]);
    }

    #[test]
    fn test_breakable_candidate_split_where_sibling_ends_inside() {
        let mut parent = node(0, 20, "root", false);
        assert!(parent.try_insert(node(0, 10, "code", false)));
        assert!(parent.try_insert(node(5, 15, "bold", true)));

        assert_eq!(spans(parent.children()), vec![(0, 10, "code"), (10, 15, "bold")]);
        assert_eq!(spans(parent.children()[0].children()), vec![(5, 10, "bold")]);
    }

    #[test]
    fn test_breakable_candidate_split_across_several_siblings() {
        let mut parent = node(0, 30, "root", false);
        assert!(parent.try_insert(node(0, 6, "a", false)));
        assert!(parent.try_insert(node(10, 12, "b", false)));
        assert!(parent.try_insert(node(18, 25, "c", false)));
        assert!(parent.try_insert(node(3, 20, "bold", true)));

        assert_eq!(
            spans(parent.children()),
            vec![(0, 6, "a"), (6, 18, "bold"), (18, 25, "c")]
        );
        // The remainder between the crossings adopted the sibling it covered.
        assert_eq!(spans(parent.children()[1].children()), vec![(10, 12, "b")]);
        assert_eq!(spans(parent.children()[0].children()), vec![(3, 6, "bold")]);
        assert_eq!(spans(parent.children()[2].children()), vec![(18, 20, "bold")]);
        assert!(parent.is_well_formed());
    }

    #[test]
    fn test_orphans_follow_the_piece_that_contains_them() {
        let mut parent = node(0, 30, "root", false);
        assert!(parent.try_insert(node(2, 4, "orphan", false)));
        assert!(parent.try_insert(node(10, 20, "code", false)));
        assert!(parent.try_insert(node(0, 15, "bold", true)));

        assert_eq!(spans(parent.children()), vec![(0, 10, "bold"), (10, 20, "code")]);
        assert_eq!(spans(parent.children()[0].children()), vec![(2, 4, "orphan")]);
        assert_eq!(spans(parent.children()[1].children()), vec![(10, 15, "bold")]);
    }

    #[test]
    fn test_failed_split_leaves_tree_untouched() {
        let mut parent = node(0, 30, "root", false);
        assert!(parent.try_insert(node(5, 15, "code", false)));
        // The piece that would land in `code` crosses this non-breakable child.
        assert!(parent.try_insert(node(8, 14, "link", false)));
        assert!(parent.try_insert(node(2, 3, "orphan", false)));
        let before = parent.clone();

        assert!(!parent.try_insert(node(0, 10, "bold", false)));
        assert_eq!(parent, before);

        // Breakable succeeds by splitting again inside `code`.
        assert!(parent.try_insert(node(0, 10, "bold", true)));
        assert!(parent.is_well_formed());
    }

    #[test]
    fn test_identical_range_rejected() {
        let mut parent = node(0, 10, "root", false);
        assert!(parent.try_insert(node(2, 8, "first", false)));
        let before = parent.clone();
        assert!(!parent.try_insert(node(2, 8, "second", true)));
        assert_eq!(parent, before);
    }

    #[test]
    fn test_remainder_starting_at_next_sibling_goes_inside_it() {
        let mut parent = node(0, 30, "root", false);
        assert!(parent.try_insert(node(0, 10, "code", false)));
        assert!(parent.try_insert(node(10, 30, "code", false)));
        assert!(parent.try_insert(node(5, 20, "bold", true)));

        assert_eq!(spans(parent.children()), vec![(0, 10, "code"), (10, 30, "code")]);
        assert_eq!(spans(parent.children()[0].children()), vec![(5, 10, "bold")]);
        assert_eq!(spans(parent.children()[1].children()), vec![(10, 20, "bold")]);
        assert!(parent.is_well_formed());
    }

    #[test]
    fn test_remainder_with_sibling_bounds_nests_inside_it() {
        let mut parent = node(0, 20, "root", false);
        assert!(parent.try_insert(node(0, 10, "a", false)));
        assert!(parent.try_insert(node(10, 20, "b", false)));
        assert!(parent.try_insert(node(5, 20, "bold", true)));

        assert_eq!(spans(parent.children()), vec![(0, 10, "a"), (10, 20, "b")]);
        assert_eq!(spans(parent.children()[1].children()), vec![(10, 20, "bold")]);
    }

    #[test]
    fn test_piece_with_grandchild_bounds_nests_inside_it() {
        let mut parent = node(0, 30, "root", false);
        assert!(parent.try_insert(node(5, 20, "link", false)));
        assert!(parent.try_insert(node(5, 10, "code", false)));
        assert!(parent.try_insert(node(0, 10, "bold", true)));

        assert_eq!(spans(parent.children()), vec![(0, 5, "bold"), (5, 20, "link")]);
        let code = &parent.children()[1].children()[0];
        assert_eq!(spans(code.children()), vec![(5, 10, "bold")]);
        assert!(parent.is_well_formed());
    }

    #[test]
    fn test_inverted_range_rejected() {
        let mut parent = node(0, 10, "root", false);
        let inverted = RangeNode::with_range(Range { start: 8, end: 3 }, "bad", true);
        assert!(!parent.try_insert(inverted));
        assert!(parent.children().is_empty());
    }

    #[test]
    fn test_zero_width_node_is_placed_between_siblings() {
        let mut parent = node(0, 10, "root", false);
        assert!(parent.try_insert(node(0, 5, "a", false)));
        assert!(parent.try_insert(node(5, 10, "b", false)));
        assert!(parent.try_insert(node(5, 5, "caret", false)));
        assert!(parent.is_well_formed());
        assert_eq!(parent.node_count(), 4);
    }

    #[test]
    fn test_split_at_keeps_tag_and_flag() {
        let (left, right, orphans) = node(0, 10, "bold", true).split_at(4);
        assert_eq!(left.range(), Range::new(0, 4));
        assert_eq!(right.range(), Range::new(4, 10));
        assert_eq!(*left.tag(), "bold");
        assert!(right.is_breakable());
        assert!(orphans.is_empty());
    }
}
