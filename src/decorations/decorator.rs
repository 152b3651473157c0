//! Decorators and the per-pass driver loop.
//!
//! A [`Decorator`] pairs a [`Pattern`] with a breakable flag and a tag
//! factory. [`build_tree`] runs decorators in registration order, offers each
//! match to a fresh [`RangeTree`] and silently drops the ones that cannot be
//! placed. Registration order is therefore priority order: when two
//! decorations conflict, the one offered first keeps its place.

use super::matcher::{Pattern, PatternMatch, RegexPattern};
use super::node::RangeNode;
use super::render::Rendered;
use super::tree::RangeTree;
use crate::error::{Error, Result};
use log::{debug, trace, warn};
use std::fmt;

/// Builds a tag from a pattern match.
pub type TagFactory<T> = Box<dyn Fn(&PatternMatch<'_>) -> T + Send + Sync>;

// ─────────────────────────────────────────────────────────────────────────────
// Decorator
// ─────────────────────────────────────────────────────────────────────────────

/// A pattern plus the rules for turning its matches into decorations.
pub struct Decorator<T> {
    name: String,
    pattern: Box<dyn Pattern>,
    breakable: bool,
    tag_factory: TagFactory<T>,
}

impl<T> Decorator<T> {
    /// Create a decorator from any pattern.
    pub fn new<P, F>(name: impl Into<String>, pattern: P, breakable: bool, tag_factory: F) -> Self
    where
        P: Pattern + 'static,
        F: Fn(&PatternMatch<'_>) -> T + Send + Sync + 'static,
    {
        Self {
            name: name.into(),
            pattern: Box::new(pattern),
            breakable,
            tag_factory: Box::new(tag_factory),
        }
    }

    /// Create a decorator from a regular expression.
    ///
    /// # Errors
    ///
    /// Returns `Error::InvalidPattern` if `pattern` does not compile.
    pub fn regex<F>(name: impl Into<String>, pattern: &str, breakable: bool, tag_factory: F) -> Result<Self>
    where
        F: Fn(&PatternMatch<'_>) -> T + Send + Sync + 'static,
    {
        let name = name.into();
        let pattern = RegexPattern::new(pattern).map_err(|source| Error::InvalidPattern {
            decorator: name.clone(),
            source,
        })?;
        Ok(Self::new(name, pattern, breakable, tag_factory))
    }

    /// The decorator's name, used in logs.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Whether this decorator's ranges may be split.
    pub fn is_breakable(&self) -> bool {
        self.breakable
    }

    /// Turn a match into a candidate node.
    ///
    /// # Errors
    ///
    /// Returns `Error::MalformedRange` when the match does not describe a
    /// valid slice of `buffer`. This is a bug in the pattern, not a runtime
    /// condition; the driver logs it and moves on.
    pub fn candidate(&self, buffer: &str, m: &PatternMatch<'_>) -> Result<RangeNode<T>> {
        let range = m.range();
        if !range.fits(buffer) {
            return Err(Error::MalformedRange {
                decorator: self.name.clone(),
                start: range.start,
                end: range.end,
            });
        }
        Ok(RangeNode::with_range(range, (self.tag_factory)(m), self.breakable))
    }

    /// All well-formed, non-empty candidates for `buffer`, in match order.
    pub fn candidates(&self, buffer: &str) -> Vec<RangeNode<T>> {
        self.pattern
            .find_matches(buffer)
            .iter()
            .filter(|m| !m.range().is_empty())
            .filter_map(|m| self.candidate(buffer, m).ok())
            .collect()
    }
}

impl<T> fmt::Debug for Decorator<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Decorator")
            .field("name", &self.name)
            .field("breakable", &self.breakable)
            .finish_non_exhaustive()
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Registry
// ─────────────────────────────────────────────────────────────────────────────

/// Decorators in priority (registration) order.
#[derive(Debug)]
pub struct DecoratorRegistry<T> {
    decorators: Vec<Decorator<T>>,
}

impl<T> Default for DecoratorRegistry<T> {
    fn default() -> Self {
        Self {
            decorators: Vec::new(),
        }
    }
}

impl<T> DecoratorRegistry<T> {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a decorator; it ranks below everything registered earlier.
    pub fn register(&mut self, decorator: Decorator<T>) -> &mut Self {
        self.decorators.push(decorator);
        self
    }

    /// Decorators in priority order.
    pub fn decorators(&self) -> &[Decorator<T>] {
        &self.decorators
    }

    /// Look up a decorator by name.
    pub fn get(&self, name: &str) -> Option<&Decorator<T>> {
        self.decorators.iter().find(|d| d.name == name)
    }

    /// Number of registered decorators.
    pub fn len(&self) -> usize {
        self.decorators.len()
    }

    /// Whether no decorators are registered.
    pub fn is_empty(&self) -> bool {
        self.decorators.is_empty()
    }
}

impl<T: Clone> DecoratorRegistry<T> {
    /// Build the decoration tree for `buffer`.
    pub fn build_tree(&self, buffer: &str) -> (RangeTree<T>, PassStats) {
        build_tree(buffer, &self.decorators)
    }

    /// Decorate and render `buffer`.
    pub fn render<'a>(&self, buffer: &'a str) -> Rendered<'a, T> {
        render(buffer, &self.decorators)
    }
}

impl<T> FromIterator<Decorator<T>> for DecoratorRegistry<T> {
    fn from_iter<I: IntoIterator<Item = Decorator<T>>>(iter: I) -> Self {
        Self {
            decorators: iter.into_iter().collect(),
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Driver
// ─────────────────────────────────────────────────────────────────────────────

/// Counters for one decoration pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PassStats {
    /// Candidates offered to the tree
    pub offered: usize,
    /// Candidates the tree accepted
    pub placed: usize,
    /// Candidates the tree rejected
    pub dropped: usize,
    /// Matches discarded before reaching the tree (empty or malformed)
    pub skipped: usize,
}

/// Run every decorator over `buffer` and collect the results into a tree.
pub fn build_tree<T: Clone>(buffer: &str, decorators: &[Decorator<T>]) -> (RangeTree<T>, PassStats) {
    let mut tree = RangeTree::for_buffer(buffer);
    let mut stats = PassStats::default();

    for decorator in decorators {
        for m in decorator.pattern.find_matches(buffer) {
            if m.range().is_empty() {
                trace!("{}: empty match at {} skipped", decorator.name, m.range().start);
                stats.skipped += 1;
                continue;
            }
            let node = match decorator.candidate(buffer, &m) {
                Ok(node) => node,
                Err(e) => {
                    warn!("{}", e);
                    stats.skipped += 1;
                    continue;
                }
            };

            stats.offered += 1;
            if tree.try_insert(node) {
                stats.placed += 1;
            } else {
                trace!("{}: candidate {} dropped", decorator.name, m.range());
                stats.dropped += 1;
            }
        }
    }

    debug!(
        "Decoration pass over {} bytes: {} offered, {} placed, {} dropped, {} skipped",
        buffer.len(),
        stats.offered,
        stats.placed,
        stats.dropped,
        stats.skipped
    );
    (tree, stats)
}

/// Decorate `buffer` with `decorators` and render the result.
///
/// Pure: the same inputs always produce the same output.
pub fn render<'a, T: Clone>(buffer: &'a str, decorators: &[Decorator<T>]) -> Rendered<'a, T> {
    build_tree(buffer, decorators).0.render(buffer)
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
