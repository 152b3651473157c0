//! Rendering a decoration tree into nested tagged spans.
//!
//! The output borrows the buffer for its text gaps and owns clones of the
//! tags, so it outlives the tree it was rendered from. Any UI layer can turn
//! it into nested markup; see [`crate::export`] and [`crate::ui`].

use super::node::RangeNode;
use super::range::Range;
use super::tree::RangeTree;
use log::warn;

/// A piece of rendered output: verbatim text or a nested tagged span.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Segment<'a, T> {
    /// Undecorated buffer text.
    Text(&'a str),
    /// A decorated span and its contents.
    Span(TaggedSpan<'a, T>),
}

/// A rendered decoration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaggedSpan<'a, T> {
    /// The decoration's tag.
    pub tag: T,
    /// The buffer range this span covers.
    pub range: Range,
    /// Contents in buffer order.
    pub children: Vec<Segment<'a, T>>,
}

/// Rendered output for a whole buffer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rendered<'a, T> {
    /// Top-level segments in buffer order.
    pub segments: Vec<Segment<'a, T>>,
}

impl<'a, T> Rendered<'a, T> {
    /// Concatenate every text segment in emission order.
    ///
    /// For output produced by [`RangeTree::render`] this reproduces the
    /// buffer exactly.
    pub fn plain_text(&self) -> String {
        let mut out = String::new();
        push_text(&self.segments, &mut out);
        out
    }

    /// Iterate over all tagged spans, depth-first in buffer order.
    pub fn spans(&self) -> Spans<'_, 'a, T> {
        Spans {
            stack: vec![self.segments.iter()],
        }
    }
}

fn push_text<T>(segments: &[Segment<'_, T>], out: &mut String) {
    for segment in segments {
        match segment {
            Segment::Text(text) => out.push_str(text),
            Segment::Span(span) => push_text(&span.children, out),
        }
    }
}

/// Depth-first iterator over the tagged spans of a [`Rendered`] tree.
pub struct Spans<'r, 'a, T> {
    stack: Vec<std::slice::Iter<'r, Segment<'a, T>>>,
}

impl<'r, 'a, T> Iterator for Spans<'r, 'a, T> {
    type Item = &'r TaggedSpan<'a, T>;

    fn next(&mut self) -> Option<Self::Item> {
        while let Some(top) = self.stack.last_mut() {
            match top.next() {
                Some(Segment::Span(span)) => {
                    self.stack.push(span.children.iter());
                    return Some(span);
                }
                Some(Segment::Text(_)) => continue,
                None => {
                    self.stack.pop();
                }
            }
        }
        None
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tree Walk
// ─────────────────────────────────────────────────────────────────────────────

impl<T: Clone> RangeTree<T> {
    /// Render the tree against the buffer it was built from.
    pub fn render<'a>(&self, buffer: &'a str) -> Rendered<'a, T> {
        Rendered {
            segments: render_level(self.span(), self.children(), buffer),
        }
    }
}

impl<T: Clone> RangeNode<T> {
    /// Render this node and its subtree as a single tagged span.
    pub fn render<'a>(&self, buffer: &'a str) -> TaggedSpan<'a, T> {
        TaggedSpan {
            tag: self.tag().clone(),
            range: self.range(),
            children: render_level(self.range(), self.children(), buffer),
        }
    }
}

/// Emit the gaps between `children` as text and each child as a span.
fn render_level<'a, T: Clone>(
    span: Range,
    children: &[RangeNode<T>],
    buffer: &'a str,
) -> Vec<Segment<'a, T>> {
    let mut segments = Vec::with_capacity(children.len() * 2 + 1);
    let mut cursor = span.start;

    for child in children {
        push_gap(&mut segments, buffer, cursor, child.start());
        segments.push(Segment::Span(child.render(buffer)));
        cursor = child.end();
    }
    push_gap(&mut segments, buffer, cursor, span.end);

    segments
}

fn push_gap<'a, T>(segments: &mut Vec<Segment<'a, T>>, buffer: &'a str, from: usize, to: usize) {
    if from >= to {
        return;
    }
    // Only a tree built for a different buffer can miss here.
    match buffer.get(from..to) {
        Some(text) => segments.push(Segment::Text(text)),
        None => warn!("Text {} is not a slice of the buffer; skipped", Range::new(from, to)),
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_leaf_renders_whole_span() {
        let buffer = "hello world";
        let mut tree = RangeTree::for_buffer(buffer);
        assert!(tree.try_insert(RangeNode::new(0, 5, "bold", false)));

        let rendered = tree.render(buffer);
        assert_eq!(
            rendered.segments,
            vec![
                Segment::Span(TaggedSpan {
                    tag: "bold",
                    range: Range::new(0, 5),
                    children: vec![Segment::Text("hello")],
                }),
                Segment::Text(" world"),
            ]
        );
    }

    #[test]
    fn test_nested_spans_and_gaps() {
        let buffer = "see [**x**](y) now";
        let mut tree = RangeTree::for_buffer(buffer);
        assert!(tree.try_insert(RangeNode::new(4, 14, "link", false)));
        assert!(tree.try_insert(RangeNode::new(5, 10, "bold", true)));

        let rendered = tree.render(buffer);
        assert_eq!(rendered.segments.len(), 3);
        let Segment::Span(link) = &rendered.segments[1] else {
            panic!("expected a span");
        };
        assert_eq!(link.tag, "link");
        assert_eq!(
            link.children,
            vec![
                Segment::Text("["),
                Segment::Span(TaggedSpan {
                    tag: "bold",
                    range: Range::new(5, 10),
                    children: vec![Segment::Text("**x**")],
                }),
                Segment::Text("](y)"),
            ]
        );
        assert_eq!(rendered.plain_text(), buffer);
    }

    #[test]
    fn test_adjacent_children_emit_no_empty_gap() {
        let buffer = "abcdef";
        let mut tree = RangeTree::for_buffer(buffer);
        assert!(tree.try_insert(RangeNode::new(0, 3, "a", false)));
        assert!(tree.try_insert(RangeNode::new(3, 6, "b", false)));
        let rendered = tree.render(buffer);
        assert_eq!(rendered.segments.len(), 2);
        assert!(rendered
            .segments
            .iter()
            .all(|s| matches!(s, Segment::Span(_))));
    }

    #[test]
    fn test_mismatched_buffer_skips_text_instead_of_panicking() {
        let mut tree = RangeTree::new(3);
        assert!(tree.try_insert(RangeNode::new(0, 2, "cut", false)));
        let rendered = tree.render("på");
        assert_eq!(rendered.spans().count(), 1);
        assert_eq!(rendered.plain_text(), "");
    }

    #[test]
    fn test_empty_tree_renders_buffer_as_text() {
        let buffer = "plain";
        let tree: RangeTree<()> = RangeTree::for_buffer(buffer);
        assert_eq!(tree.render(buffer).segments, vec![Segment::Text("plain")]);
        let empty: RangeTree<()> = RangeTree::for_buffer("");
        assert!(empty.render("").segments.is_empty());
    }

    #[test]
    fn test_render_is_idempotent() {
        let buffer = "**a** `b` **c**";
        let mut tree = RangeTree::for_buffer(buffer);
        tree.try_insert(RangeNode::new(0, 5, "bold", true));
        tree.try_insert(RangeNode::new(6, 9, "code", false));
        tree.try_insert(RangeNode::new(3, 12, "bold", true));
        assert_eq!(tree.render(buffer), tree.render(buffer));
    }

    #[test]
    fn test_spans_iterates_depth_first() {
        let buffer = "0123456789";
        let mut tree = RangeTree::for_buffer(buffer);
        tree.try_insert(RangeNode::new(0, 6, "outer", false));
        tree.try_insert(RangeNode::new(1, 3, "inner", false));
        tree.try_insert(RangeNode::new(7, 9, "tail", false));

        let rendered = tree.render(buffer);
        let tags: Vec<_> = rendered.spans().map(|s| s.tag).collect();
        assert_eq!(tags, vec!["outer", "inner", "tail"]);
    }

    #[test]
    fn test_multibyte_text_preserved() {
        let buffer = "Hei på **deg** 🎉";
        let mut tree = RangeTree::for_buffer(buffer);
        let start = buffer.find("**").unwrap_or(0);
        assert!(tree.try_insert(RangeNode::new(start, start + 7, "bold", true)));
        assert_eq!(tree.render(buffer).plain_text(), buffer);
    }
}
