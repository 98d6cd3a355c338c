//! Text position and range types.
//!
//! All coordinates are **0-indexed**. Row 0 is the first line, column 0 is the
//! first character. Columns count Unicode scalar values (chars), not bytes or
//! grapheme clusters, which is how `ropey` indexes text.
//!
//! Display output is 1-indexed for humans; `Debug` output stays 0-indexed.

use std::fmt;

// ---------------------------------------------------------------------------
// Position
// ---------------------------------------------------------------------------

/// A position in a text buffer: (row, column), both 0-indexed.
///
/// Positions are ordered row first, then column, so `(0, 99) < (1, 0)`.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Position {
    pub row: usize,
    pub column: usize,
}

impl Position {
    /// The origin — row 0, column 0.
    pub const ZERO: Self = Self { row: 0, column: 0 };

    #[inline]
    #[must_use]
    pub const fn new(row: usize, column: usize) -> Self {
        Self { row, column }
    }

    /// Where this position ends up after `deleted` is removed from the buffer.
    ///
    /// Positions inside the deleted span collapse onto its start; positions
    /// after it move left (same row) or up (later rows).
    #[must_use]
    pub fn after_delete(self, deleted: Range) -> Self {
        if self <= deleted.start {
            self
        } else if self <= deleted.end {
            deleted.start
        } else if self.row == deleted.end.row {
            Self::new(
                deleted.start.row,
                deleted.start.column + (self.column - deleted.end.column),
            )
        } else {
            Self::new(self.row - (deleted.end.row - deleted.start.row), self.column)
        }
    }

    /// Where this position ends up after text was inserted, given the span
    /// the inserted text now occupies. A position exactly at the insertion
    /// point stays in front of the new text.
    #[must_use]
    pub fn after_insert(self, inserted: Range) -> Self {
        if self <= inserted.start {
            self
        } else if self.row == inserted.start.row {
            Self::new(
                inserted.end.row,
                inserted.end.column + (self.column - inserted.start.column),
            )
        } else {
            Self::new(self.row + (inserted.end.row - inserted.start.row), self.column)
        }
    }
}

impl Ord for Position {
    #[inline]
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        self.row
            .cmp(&other.row)
            .then(self.column.cmp(&other.column))
    }
}

impl PartialOrd for Position {
    #[inline]
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl fmt::Debug for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Pos({}:{})", self.row, self.column)
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.row + 1, self.column + 1)
    }
}

// ---------------------------------------------------------------------------
// Range
// ---------------------------------------------------------------------------

/// A half-open range in a text buffer: `[start, end)`.
///
/// Always normalized so that `start <= end`. Use [`Range::new`] when the
/// order is known, [`Range::ordered`] otherwise. Equality is structural.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Range {
    pub start: Position,
    pub end: Position,
}

impl Range {
    /// Create a range. Panics in debug if `start > end`.
    #[inline]
    #[must_use]
    pub const fn new(start: Position, end: Position) -> Self {
        debug_assert!(
            start.row < end.row || (start.row == end.row && start.column <= end.column),
            "Range::new requires start <= end"
        );
        Self { start, end }
    }

    /// Create a range from two arbitrary positions, swapping if needed.
    #[inline]
    #[must_use]
    pub fn ordered(a: Position, b: Position) -> Self {
        if a <= b {
            Self { start: a, end: b }
        } else {
            Self { start: b, end: a }
        }
    }

    /// A zero-width range (a collapsed selection) at the given position.
    #[inline]
    #[must_use]
    pub const fn point(pos: Position) -> Self {
        Self {
            start: pos,
            end: pos,
        }
    }

    /// True when the range spans zero characters.
    #[inline]
    #[must_use]
    pub const fn is_empty(self) -> bool {
        self.start.row == self.end.row && self.start.column == self.end.column
    }

    /// True when `other` lies entirely inside this range (ends inclusive).
    #[inline]
    #[must_use]
    pub fn covers(self, other: Self) -> bool {
        other.start >= self.start && other.end <= self.end
    }

    /// Both endpoints mapped through a deletion.
    #[must_use]
    pub fn after_delete(self, deleted: Self) -> Self {
        Self::new(
            self.start.after_delete(deleted),
            self.end.after_delete(deleted),
        )
    }

    /// Both endpoints mapped through an insertion.
    #[must_use]
    pub fn after_insert(self, inserted: Self) -> Self {
        Self::new(
            self.start.after_insert(inserted),
            self.end.after_insert(inserted),
        )
    }
}

// ---------------------------------------------------------------------------
// Edit
// ---------------------------------------------------------------------------

/// One buffer change: `deleted` was removed, then `inserted` was written at
/// its start. Either side may be empty.
///
/// Used to carry coordinates computed before an edit over to the buffer as
/// it is after the edit.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Edit {
    pub deleted: Range,
    pub inserted: Range,
}

impl Edit {
    #[must_use]
    pub const fn deletion(deleted: Range) -> Self {
        Self {
            deleted,
            inserted: Range::point(deleted.start),
        }
    }

    #[must_use]
    pub const fn insertion(inserted: Range) -> Self {
        Self {
            deleted: Range::point(inserted.start),
            inserted,
        }
    }

    #[must_use]
    pub fn map(self, pos: Position) -> Position {
        pos.after_delete(self.deleted).after_insert(self.inserted)
    }

    #[must_use]
    pub fn map_range(self, range: Range) -> Range {
        Range::new(self.map(range.start), self.map(range.end))
    }
}

impl fmt::Debug for Range {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Range({}:{} .. {}:{})",
            self.start.row, self.start.column, self.end.row, self.end.column
        )
    }
}

impl fmt::Display for Range {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.start, self.end)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
