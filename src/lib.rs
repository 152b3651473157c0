//! ferrite-decor - decoration range engine for the Ferrite markdown editor
//!
//! Pattern matchers find decorations in a text buffer (bold markers, links,
//! image references, cross-references). They may overlap arbitrarily; the
//! engine reconciles them into a nested tree of tagged ranges, splitting
//! breakable decorations around conflicts and dropping the rest, and renders
//! the tree for egui or as HTML.
//!
//! ```
//! use ferrite_decor::config::DecoratorTable;
//! use ferrite_decor::export::to_html;
//!
//! let registry = DecoratorTable::markdown().compile().unwrap();
//! let rendered = registry.render("see `x`");
//! assert_eq!(to_html(&rendered), "see <span class=\"deco-code\">`x`</span>");
//! ```

pub mod config;
pub mod decorations;
pub mod error;
pub mod export;
pub mod ui;

pub use decorations::{
    build_tree, render, DecorationTag, Decorator, DecoratorRegistry, PassStats, RangeNode,
    RangeTree, Rendered, Segment, TaggedSpan,
};
pub use error::{Error, Result};
