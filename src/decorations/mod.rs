//! Decoration range engine
//!
//! Overlays possibly-overlapping decorations (bold markers, links, image
//! references, cross-references, popups) onto a flat text buffer and renders
//! them as a properly nested tree of tagged spans.
//!
//! # Pipeline
//! 1. Each [`Decorator`] runs its [`Pattern`] over the buffer.
//! 2. Every match becomes a [`RangeNode`] and is offered to a [`RangeTree`]
//!    via `try_insert`, in decorator registration order.
//! 3. The tree is rendered into [`Rendered`] output and discarded.
//!
//! A candidate that cannot be placed is dropped; its text still renders as
//! plain text. Breakable decorations are split around conflicting ones
//! instead of being dropped.
//!
//! # Example
//! ```
//! use ferrite_decor::decorations::{render, Decorator};
//!
//! let decorators = vec![
//!     Decorator::regex("code", r"`[^`]+`", false, |_| "code").unwrap(),
//!     Decorator::regex("bold", r"\*\*[^*]+\*\*", true, |_| "bold").unwrap(),
//! ];
//! let rendered = render("**bold `code** tail`", &decorators);
//! assert_eq!(rendered.plain_text(), "**bold `code** tail`");
//! assert_eq!(rendered.spans().count(), 3);
//! ```

mod decorator;
mod matcher;
mod node;
mod range;
mod render;
mod tag;
mod tree;

pub use decorator::{build_tree, render, Decorator, DecoratorRegistry, PassStats, TagFactory};
pub use matcher::{LiteralPattern, Pattern, PatternMatch, RegexPattern};
pub use node::RangeNode;
pub use range::Range;
pub use render::{Rendered, Segment, Spans, TaggedSpan};
pub use tag::DecorationTag;
pub use tree::RangeTree;
