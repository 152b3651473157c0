//! Patterns that find decoration candidates in a buffer.
//!
//! A [`Pattern`] only reports where it matched; deciding what a match means
//! (its tag, whether it may be split) is up to the
//! [`Decorator`](super::Decorator) that owns it.
//!
//! Two implementations are provided:
//! - [`RegexPattern`] - regular expressions, optionally decorating a single
//!   capture group instead of the whole match
//! - [`LiteralPattern`] - plain substring search with ASCII case folding and
//!   whole-word options

use super::range::Range;
use regex::Regex;

// ─────────────────────────────────────────────────────────────────────────────
// Pattern Match
// ─────────────────────────────────────────────────────────────────────────────

/// One match of a pattern in a haystack.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PatternMatch<'t> {
    haystack: &'t str,
    range: Range,
    groups: Vec<Option<Range>>,
}

impl<'t> PatternMatch<'t> {
    /// A match with no capture groups beyond the whole match.
    pub fn new(haystack: &'t str, range: Range) -> Self {
        Self {
            haystack,
            range,
            groups: vec![Some(range)],
        }
    }

    /// A match decorating `range`, with `groups[0]` being the whole match.
    pub fn with_groups(haystack: &'t str, range: Range, groups: Vec<Option<Range>>) -> Self {
        Self {
            haystack,
            range,
            groups,
        }
    }

    /// The range to decorate.
    pub fn range(&self) -> Range {
        self.range
    }

    /// Text of the decorated range, or `""` if the range does not fit the haystack.
    pub fn as_str(&self) -> &'t str {
        if self.range.fits(self.haystack) {
            self.range.slice(self.haystack)
        } else {
            ""
        }
    }

    /// Text of capture group `index` (0 is the whole match).
    pub fn group(&self, index: usize) -> Option<&'t str> {
        self.groups
            .get(index)
            .copied()
            .flatten()
            .filter(|r| r.fits(self.haystack))
            .map(|r| r.slice(self.haystack))
    }
}

/// A source of candidate ranges.
pub trait Pattern: Send + Sync {
    /// Find all matches in `haystack`, left to right.
    fn find_matches<'t>(&self, haystack: &'t str) -> Vec<PatternMatch<'t>>;
}

// ─────────────────────────────────────────────────────────────────────────────
// Regex Pattern
// ─────────────────────────────────────────────────────────────────────────────

/// A regular-expression pattern.
#[derive(Debug, Clone)]
pub struct RegexPattern {
    regex: Regex,
    capture_group: Option<usize>,
    not_after: Vec<char>,
}

impl RegexPattern {
    /// Compile `pattern`, decorating whole matches.
    pub fn new(pattern: &str) -> Result<Self, regex::Error> {
        Ok(Self::from_regex(Regex::new(pattern)?))
    }

    /// Wrap an already compiled regex.
    pub fn from_regex(regex: Regex) -> Self {
        Self {
            regex,
            capture_group: None,
            not_after: Vec::new(),
        }
    }

    /// Decorate only capture group `group` of each match.
    ///
    /// Matches where the group did not participate are skipped.
    pub fn with_capture_group(mut self, group: usize) -> Self {
        self.capture_group = Some(group);
        self
    }

    /// Skip matches whose decorated range directly follows one of `chars`.
    ///
    /// Stands in for a lookbehind, which `regex` does not support, without
    /// consuming the preceding char the way `[^!]` would.
    pub fn not_after(mut self, chars: impl IntoIterator<Item = char>) -> Self {
        self.not_after = chars.into_iter().collect();
        self
    }

    fn follows_excluded(&self, haystack: &str, at: usize) -> bool {
        haystack[..at]
            .chars()
            .next_back()
            .map_or(false, |c| self.not_after.contains(&c))
    }

    /// The underlying regex.
    pub fn regex(&self) -> &Regex {
        &self.regex
    }
}

impl Pattern for RegexPattern {
    fn find_matches<'t>(&self, haystack: &'t str) -> Vec<PatternMatch<'t>> {
        let group = self.capture_group.unwrap_or(0);
        self.regex
            .captures_iter(haystack)
            .filter_map(|caps| {
                let range = caps.get(group).map(|m| Range::new(m.start(), m.end()))?;
                if self.follows_excluded(haystack, range.start) {
                    return None;
                }
                let groups = caps
                    .iter()
                    .map(|m| m.map(|m| Range::new(m.start(), m.end())))
                    .collect();
                Some(PatternMatch::with_groups(haystack, range, groups))
            })
            .collect()
    }
}

impl Pattern for Regex {
    fn find_matches<'t>(&self, haystack: &'t str) -> Vec<PatternMatch<'t>> {
        self.find_iter(haystack)
            .map(|m| PatternMatch::new(haystack, Range::new(m.start(), m.end())))
            .collect()
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Literal Pattern
// ─────────────────────────────────────────────────────────────────────────────

/// A plain substring pattern.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LiteralPattern {
    needle: String,
    case_sensitive: bool,
    whole_word: bool,
}

impl LiteralPattern {
    /// Case-sensitive search for `needle` anywhere in the text.
    pub fn new(needle: impl Into<String>) -> Self {
        Self {
            needle: needle.into(),
            case_sensitive: true,
            whole_word: false,
        }
    }

    /// Fold ASCII letters when comparing. Non-ASCII text must match exactly.
    pub fn case_sensitive(mut self, case_sensitive: bool) -> Self {
        self.case_sensitive = case_sensitive;
        self
    }

    /// Only accept matches not flanked by word characters.
    pub fn whole_word(mut self, whole_word: bool) -> Self {
        self.whole_word = whole_word;
        self
    }

    /// The text being searched for.
    pub fn needle(&self) -> &str {
        &self.needle
    }

    fn matches_at(&self, haystack: &str, at: usize) -> bool {
        let Some(candidate) = haystack.get(at..at + self.needle.len()) else {
            return false;
        };
        if self.case_sensitive {
            candidate == self.needle
        } else {
            candidate.eq_ignore_ascii_case(&self.needle)
        }
    }

    fn on_word_boundary(haystack: &str, start: usize, end: usize) -> bool {
        let is_word = |c: char| c.is_alphanumeric() || c == '_';
        let before = haystack[..start].chars().next_back().map_or(false, is_word);
        let after = haystack[end..].chars().next().map_or(false, is_word);
        !before && !after
    }
}

impl Pattern for LiteralPattern {
    fn find_matches<'t>(&self, haystack: &'t str) -> Vec<PatternMatch<'t>> {
        let mut matches = Vec::new();
        if self.needle.is_empty() {
            return matches;
        }

        let mut at = 0;
        while at + self.needle.len() <= haystack.len() {
            if haystack.is_char_boundary(at) && self.matches_at(haystack, at) {
                let end = at + self.needle.len();
                if !self.whole_word || Self::on_word_boundary(haystack, at, end) {
                    matches.push(PatternMatch::new(haystack, Range::new(at, end)));
                    at = end;
                    continue;
                }
            }
            at += 1;
        }

        matches
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
