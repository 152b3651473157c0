//! Half-open byte ranges over a decoration buffer.

use std::fmt;

/// A half-open `[start, end)` byte range in the buffer.
///
/// Ranges compare by offset only; two ranges with the same bounds are equal
/// regardless of what decorates them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Range {
    /// Start offset (inclusive)
    pub start: usize,
    /// End offset (exclusive)
    pub end: usize,
}

impl Range {
    /// Create a new range. `start` must not exceed `end`.
    pub fn new(start: usize, end: usize) -> Self {
        debug_assert!(start <= end, "range start {} past end {}", start, end);
        Self { start, end }
    }

    /// Create a range, returning `None` when `start > end`.
    pub fn checked(start: usize, end: usize) -> Option<Self> {
        (start <= end).then_some(Self { start, end })
    }

    /// Width of the range in bytes.
    pub fn len(&self) -> usize {
        self.end - self.start
    }

    /// Whether the range has zero width.
    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }

    /// Whether `other` lies entirely inside this range (bounds may coincide).
    pub fn contains(&self, other: &Range) -> bool {
        self.start <= other.start && other.end <= self.end
    }

    /// Whether the two ranges share at least one byte.
    pub fn overlaps(&self, other: &Range) -> bool {
        self.start < other.end && other.start < self.end
    }

    /// Whether this range ends at or before `other` starts.
    pub fn precedes(&self, other: &Range) -> bool {
        self.end <= other.start
    }

    /// Whether the range is a valid slice of `buffer`.
    ///
    /// Both offsets must be in bounds and fall on `char` boundaries.
    pub fn fits(&self, buffer: &str) -> bool {
        self.start <= self.end
            && self.end <= buffer.len()
            && buffer.is_char_boundary(self.start)
            && buffer.is_char_boundary(self.end)
    }

    /// Slice `buffer` by this range.
    ///
    /// Panics unless [`Range::fits`] holds; use `buffer.get` when it might not.
    pub fn slice<'a>(&self, buffer: &'a str) -> &'a str {
        &buffer[self.start..self.end]
    }
}

impl From<std::ops::Range<usize>> for Range {
    fn from(r: std::ops::Range<usize>) -> Self {
        Self::new(r.start, r.end)
    }
}

impl fmt::Display for Range {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}, {})", self.start, self.end)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_checked_rejects_inverted() {
        assert!(Range::checked(5, 3).is_none());
        assert_eq!(Range::checked(3, 5), Some(Range::new(3, 5)));
    }

    #[test]
    fn test_contains_is_inclusive_of_bounds() {
        let outer = Range::new(2, 8);
        assert!(outer.contains(&Range::new(2, 8)));
        assert!(outer.contains(&Range::new(3, 5)));
        assert!(outer.contains(&Range::new(8, 8)));
        assert!(!outer.contains(&Range::new(1, 5)));
        assert!(!outer.contains(&Range::new(5, 9)));
    }

    #[test]
    fn test_overlaps_excludes_adjacent() {
        let a = Range::new(0, 5);
        assert!(a.overlaps(&Range::new(4, 6)));
        assert!(!a.overlaps(&Range::new(5, 6)));
        assert!(a.precedes(&Range::new(5, 6)));
    }

    #[test]
    fn test_fits_checks_char_boundaries() {
        let text = "på deg"; // 'å' is 2 bytes
        assert!(Range::new(0, 1).fits(text));
        assert!(!Range::new(0, 2).fits(text));
        assert!(Range::new(0, 3).fits(text));
        assert!(!Range::new(0, 42).fits(text));
    }

    #[test]
    fn test_display() {
        assert_eq!(Range::new(1, 4).to_string(), "[1, 4)");
    }
}
