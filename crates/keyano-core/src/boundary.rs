//! Boundary matching — where text objects begin and end.
//!
//! Simple objects (char, word, number, line) are a pattern plus a
//! [`Boundary`] rule that says what must sit just outside an instance.
//! Locating one is a two-phase scan: find the boundary nearest the search
//! point, then the first (or last) object match on the far side of it. Both
//! phases are plain regex scans over the buffer, so nothing is stepped
//! char by char and no scan state survives between calls.
//!
//! Balanced delimiters have no fixed boundary and are matched by depth
//! counting instead: [`matching_close`] and [`matching_open`].

use std::sync::LazyLock;

use regex::Regex;

use crate::buffer::TextBuffer;
use crate::position::{Position, Range};

// ---------------------------------------------------------------------------
// Patterns
// ---------------------------------------------------------------------------

fn compile(pattern: &str) -> Regex {
    Regex::new(pattern).expect("built-in pattern is valid")
}

pub(crate) static CHAR: LazyLock<Regex> = LazyLock::new(|| compile(r"[^\r\n]"));
pub(crate) static WORD: LazyLock<Regex> = LazyLock::new(|| compile(r"[A-Za-z0-9_']+"));
pub(crate) static WORD_SEPARATOR: LazyLock<Regex> = LazyLock::new(|| compile(r"[^A-Za-z0-9_']"));
pub(crate) static NUMBER: LazyLock<Regex> = LazyLock::new(|| compile(r"[0-9]+(?:\.[0-9]+)?"));
pub(crate) static NUMBER_SEPARATOR: LazyLock<Regex> = LazyLock::new(|| compile(r"[^0-9.]"));
pub(crate) static LINE: LazyLock<Regex> =
    LazyLock::new(|| compile(r"[^ \t\r\n](?:[^\r\n]*[^ \t\r\n])?"));

static OPEN_PAREN: LazyLock<Regex> = LazyLock::new(|| compile(r"\("));
static CLOSE_PAREN: LazyLock<Regex> = LazyLock::new(|| compile(r"\)"));
static PARENS: LazyLock<Regex> = LazyLock::new(|| compile(r"[()]"));

// ---------------------------------------------------------------------------
// Single-character neighbours
// ---------------------------------------------------------------------------

/// The character just before `pos`. At column 0 this is the previous row's
/// line terminator.
fn char_before<B: TextBuffer>(buffer: &B, pos: Position) -> Option<Range> {
    if pos.column > 0 {
        Some(Range::new(Position::new(pos.row, pos.column - 1), pos))
    } else if pos.row > 0 {
        let len = buffer.line_length(pos.row - 1);
        Some(Range::new(Position::new(pos.row - 1, len), pos))
    } else {
        None
    }
}

/// The character at `pos`. At the end of a row this is its line terminator.
fn char_after<B: TextBuffer>(buffer: &B, pos: Position) -> Option<Range> {
    if pos.column < buffer.line_length(pos.row) {
        Some(Range::new(pos, Position::new(pos.row, pos.column + 1)))
    } else if pos.row < buffer.last_row() {
        Some(Range::new(pos, Position::new(pos.row + 1, 0)))
    } else {
        None
    }
}

fn is_blank(text: &str) -> bool {
    text.chars().all(|c| c == ' ' || c == '\t')
}

fn row_start(pos: Position) -> Position {
    Position::new(pos.row, 0)
}

fn row_end<B: TextBuffer>(buffer: &B, row: usize) -> Position {
    Position::new(row, buffer.line_length(row))
}

// ---------------------------------------------------------------------------
// Simple text objects
// ---------------------------------------------------------------------------

/// What has to sit just outside an instance of a text object.
#[derive(Clone, Copy, Debug)]
pub(crate) enum Boundary {
    /// Instances may start anywhere.
    Anywhere,
    /// A character matching the pattern, a line terminator, or a buffer edge.
    Separator(&'static LazyLock<Regex>),
    /// Only blanks between the instance and its row's edges.
    Indentation,
}

/// A text object described by its pattern and its boundary rule.
#[derive(Clone, Copy, Debug)]
pub(crate) struct TextObject {
    pub pattern: &'static LazyLock<Regex>,
    pub boundary: Boundary,
}

impl TextObject {
    /// True if an instance may begin at `pos`.
    fn opens_at<B: TextBuffer>(&self, buffer: &B, pos: Position) -> bool {
        match self.boundary {
            Boundary::Anywhere => true,
            Boundary::Separator(separator) => char_before(buffer, pos)
                .is_none_or(|before| separator.is_match(&buffer.text_in(before))),
            Boundary::Indentation => is_blank(&buffer.text_in(Range::new(row_start(pos), pos))),
        }
    }

    /// Where the forward object scan starts when searching from `from`.
    ///
    /// For separators this is the first separator at or after the character
    /// preceding `from`, so an instance that begins exactly at `from` is
    /// still found while one that `from` sits inside is skipped.
    fn scan_start<B: TextBuffer>(&self, buffer: &B, from: Position) -> Option<Position> {
        match self.boundary {
            Boundary::Anywhere => Some(from),
            Boundary::Separator(separator) => {
                let Some(before) = char_before(buffer, from) else {
                    return Some(from);
                };
                let tail = Range::new(before.start, buffer.extent().end);
                buffer
                    .scan_forward(separator, tail)
                    .next()
                    .map(|m| m.range.start)
            }
            Boundary::Indentation => {
                if is_blank(&buffer.text_in(Range::new(row_start(from), from))) {
                    Some(row_start(from))
                } else if from.row < buffer.last_row() {
                    Some(Position::new(from.row + 1, 0))
                } else {
                    None
                }
            }
        }
    }

    /// Mirror of [`Self::scan_start`] for backward searches.
    fn scan_end<B: TextBuffer>(&self, buffer: &B, from: Position) -> Option<Position> {
        match self.boundary {
            Boundary::Anywhere => Some(from),
            Boundary::Separator(separator) => {
                let Some(after) = char_after(buffer, from) else {
                    return Some(from);
                };
                let head = Range::new(buffer.first_position(), after.end);
                buffer
                    .scan_backward(separator, head)
                    .next()
                    .map(|m| m.range.start)
            }
            Boundary::Indentation => {
                let end = row_end(buffer, from.row);
                if is_blank(&buffer.text_in(Range::new(from, end))) {
                    Some(end)
                } else if from.row > 0 {
                    Some(row_end(buffer, from.row - 1))
                } else {
                    None
                }
            }
        }
    }

    /// The nearest instance after `from`, skipping one that `from` is inside.
    pub fn next_instance<B: TextBuffer>(&self, buffer: &B, from: Position) -> Option<Range> {
        let start = self.scan_start(buffer, from)?;
        let found = buffer
            .scan_forward(self.pattern, Range::new(start, buffer.extent().end))
            .next()
            .map(|m| m.range);
        if found.is_none() {
            tracing::trace!(?from, "no instance after");
        }
        found
    }

    /// The nearest instance before `from`, skipping one that `from` is inside.
    pub fn previous_instance<B: TextBuffer>(&self, buffer: &B, from: Position) -> Option<Range> {
        let end = self.scan_end(buffer, from)?;
        let found = buffer
            .scan_backward(self.pattern, Range::new(buffer.first_position(), end))
            .next()
            .map(|m| m.range);
        if found.is_none() {
            tracing::trace!(?from, "no instance before");
        }
        found
    }

    /// True if `range` is exactly one complete instance.
    pub fn is_instance<B: TextBuffer>(&self, buffer: &B, range: Range) -> bool {
        !range.is_empty()
            && self.opens_at(buffer, range.start)
            && buffer
                .scan_forward(self.pattern, Range::new(range.start, buffer.extent().end))
                .next()
                .is_some_and(|m| m.range == range)
    }

    /// The end of the instance enclosing `pos`, or of the first one after it
    /// when `pos` is between instances. Returned as an empty range.
    pub fn enclosing_end<B: TextBuffer>(&self, buffer: &B, pos: Position) -> Option<Range> {
        let start = match self.boundary {
            Boundary::Anywhere => pos,
            Boundary::Separator(separator) => buffer
                .scan_backward(separator, Range::new(buffer.first_position(), pos))
                .next()
                .map_or_else(|| buffer.first_position(), |m| m.range.end),
            Boundary::Indentation => row_start(pos),
        };
        buffer
            .scan_forward(self.pattern, Range::new(start, buffer.extent().end))
            .next()
            .map(|m| Range::point(m.range.end))
    }

    /// The start of the instance enclosing `pos`, or of the last one before
    /// it when `pos` is between instances. Returned as an empty range.
    pub fn enclosing_start<B: TextBuffer>(&self, buffer: &B, pos: Position) -> Option<Range> {
        let end = match self.boundary {
            Boundary::Anywhere => pos,
            Boundary::Separator(separator) => buffer
                .scan_forward(separator, Range::new(pos, buffer.extent().end))
                .next()
                .map_or_else(|| buffer.extent().end, |m| m.range.start),
            Boundary::Indentation => row_end(buffer, pos.row),
        };
        buffer
            .scan_backward(self.pattern, Range::new(buffer.first_position(), end))
            .next()
            .map(|m| Range::point(m.range.start))
    }
}

// ---------------------------------------------------------------------------
// Balanced delimiters
// ---------------------------------------------------------------------------

/// The `)` that closes the group `after` is inside.
///
/// Depth starts at zero; every `(` deepens it and every `)` either closes a
/// nested group or, at depth zero, is the answer. The scan stops there.
pub(crate) fn matching_close<B: TextBuffer>(buffer: &B, after: Position) -> Option<Range> {
    let mut depth = 0usize;
    buffer
        .scan_forward(&PARENS, Range::new(after, buffer.extent().end))
        .find(|m| {
            if m.text == "(" {
                depth += 1;
                false
            } else if depth == 0 {
                true
            } else {
                depth -= 1;
                false
            }
        })
        .map(|m| m.range)
}

/// The `(` that opens the group `before` is inside. Mirror of
/// [`matching_close`].
pub(crate) fn matching_open<B: TextBuffer>(buffer: &B, before: Position) -> Option<Range> {
    let mut depth = 0usize;
    buffer
        .scan_backward(&PARENS, Range::new(buffer.first_position(), before))
        .find(|m| {
            if m.text == ")" {
                depth += 1;
                false
            } else if depth == 0 {
                true
            } else {
                depth -= 1;
                false
            }
        })
        .map(|m| m.range)
}

/// The first balanced group whose `(` is at or after `from`.
pub(crate) fn next_group<B: TextBuffer>(buffer: &B, from: Position) -> Option<Range> {
    buffer
        .scan_forward(&OPEN_PAREN, Range::new(from, buffer.extent().end))
        .find_map(|open| {
            matching_close(buffer, open.range.end).map(|close| Range::new(open.range.start, close.end))
        })
}

/// The last balanced group whose `)` ends at or before `from`.
pub(crate) fn previous_group<B: TextBuffer>(buffer: &B, from: Position) -> Option<Range> {
    buffer
        .scan_backward(&CLOSE_PAREN, Range::new(buffer.first_position(), from))
        .find_map(|close| {
            matching_open(buffer, close.range.start).map(|open| Range::new(open.start, close.range.end))
        })
}

/// True if `text` is `(`, a zero-net-depth body that never dips below
/// zero, then `)`.
pub(crate) fn is_balanced_group(text: &str) -> bool {
    let Some(body) = text.strip_prefix('(').and_then(|t| t.strip_suffix(')')) else {
        return false;
    };
    let mut depth = 0usize;
    for c in body.chars() {
        match c {
            '(' => depth += 1,
            ')' => match depth.checked_sub(1) {
                Some(d) => depth = d,
                None => return false,
            },
            _ => {}
        }
    }
    depth == 0
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
