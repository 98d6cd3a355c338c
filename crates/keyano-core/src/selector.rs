//! Selectors — the kinds of text object the engine can select.
//!
//! A [`Selector`] is a plain `Copy` value. It holds no state, so one value
//! can be shared by any number of editors, and every motion and action takes
//! it as an explicit argument.

use std::fmt;
use std::str::FromStr;

use thiserror::Error;

use crate::boundary::{self, Boundary, TextObject};
use crate::buffer::TextBuffer;
use crate::editor::Editor;
use crate::error::Result;
use crate::position::{Position, Range};

/// The kind of text object motions and actions operate on.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(rename_all = "lowercase")
)]
pub enum Selector {
    /// Any single character other than a line terminator.
    Char,
    /// A run of `[A-Za-z0-9_']`.
    #[default]
    Word,
    /// Digits with an optional decimal part.
    Number,
    /// A row from its first to its last non-blank character.
    Line,
    /// A balanced `( ... )` group.
    Parentheses,
}

/// Where a paste should land, and the text inserted to make room for it.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Anchor {
    pub at: Range,
    pub inserted: Option<Range>,
}

impl Selector {
    pub const ALL: [Self; 5] = [
        Self::Char,
        Self::Word,
        Self::Number,
        Self::Line,
        Self::Parentheses,
    ];

    /// Human-readable name, as a status line would show it.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Char => "Char",
            Self::Word => "Word",
            Self::Number => "Number",
            Self::Line => "Line",
            Self::Parentheses => "Parentheses",
        }
    }

    /// Lower-case identifier used in command tokens and configuration.
    #[must_use]
    pub const fn token(self) -> &'static str {
        match self {
            Self::Char => "char",
            Self::Word => "word",
            Self::Number => "number",
            Self::Line => "line",
            Self::Parentheses => "parentheses",
        }
    }

    fn object(self) -> Option<TextObject> {
        let (pattern, boundary) = match self {
            Self::Char => (&boundary::CHAR, Boundary::Anywhere),
            Self::Word => (&boundary::WORD, Boundary::Separator(&boundary::WORD_SEPARATOR)),
            Self::Number => (&boundary::NUMBER, Boundary::Separator(&boundary::NUMBER_SEPARATOR)),
            Self::Line => (&boundary::LINE, Boundary::Indentation),
            Self::Parentheses => return None,
        };
        Some(TextObject { pattern, boundary })
    }

    // -- Capabilities -------------------------------------------------------

    /// True if `range` is exactly one complete instance of this object.
    pub fn matches<B: TextBuffer>(self, buffer: &B, range: Range) -> bool {
        match self.object() {
            Some(object) => object.is_instance(buffer, range),
            None => boundary::is_balanced_group(&buffer.text_in(range)),
        }
    }

    /// The next instance at or after `from`. An instance that `from` is
    /// strictly inside is skipped.
    pub fn locate_forward<B: TextBuffer>(self, buffer: &B, from: Position) -> Option<Range> {
        match self.object() {
            Some(object) => object.next_instance(buffer, from),
            None => boundary::next_group(buffer, from),
        }
    }

    /// The previous instance at or before `from`. An instance that `from` is
    /// strictly inside is skipped.
    pub fn locate_backward<B: TextBuffer>(self, buffer: &B, from: Position) -> Option<Range> {
        match self.object() {
            Some(object) => object.previous_instance(buffer, from),
            None => boundary::previous_group(buffer, from),
        }
    }

    /// The right boundary paired with `left`.
    ///
    /// For parentheses this is the `)` closing the group that starts just
    /// past `left`. For the other objects it is the empty range at the end
    /// of the instance enclosing (or following) `left.end`.
    pub fn find_matching_right<B: TextBuffer>(self, buffer: &B, left: Range) -> Option<Range> {
        match self.object() {
            Some(object) => object.enclosing_end(buffer, left.end),
            None => boundary::matching_close(buffer, left.end),
        }
    }

    /// The left boundary paired with `right`. Mirror of
    /// [`Self::find_matching_right`].
    pub fn find_matching_left<B: TextBuffer>(self, buffer: &B, right: Range) -> Option<Range> {
        match self.object() {
            Some(object) => object.enclosing_start(buffer, right.start),
            None => boundary::matching_open(buffer, right.start),
        }
    }

    /// The text a delete of `range` actually removes.
    ///
    /// Lines are removed whole, terminator included. On the last row the
    /// preceding terminator goes instead, so the buffer stays the
    /// concatenation of the remaining lines.
    pub fn delete_range<B: TextBuffer>(self, buffer: &B, range: Range) -> Range {
        if self != Self::Line {
            return range;
        }
        let (first, last) = covered_rows(range);
        let end_of = |row| Position::new(row, buffer.line_length(row));
        if last < buffer.last_row() {
            Range::new(Position::new(first, 0), Position::new(last + 1, 0))
        } else if first > 0 {
            Range::new(end_of(first - 1), end_of(last))
        } else {
            Range::new(Position::ZERO, end_of(last))
        }
    }

    /// Prepare the buffer for a paste relative to `range` and return where
    /// the clipboard text should go.
    ///
    /// Lines open a new row below the target, indented like it; the anchor
    /// is the end of that row. Everything else pastes at `range.end`.
    ///
    /// # Errors
    ///
    /// Propagates a failed insert from the editor's buffer.
    pub fn paste_anchor<E: Editor>(self, editor: &mut E, range: Range) -> Result<Anchor> {
        if self != Self::Line {
            return Ok(Anchor {
                at: Range::point(range.end),
                inserted: None,
            });
        }
        let row = covered_rows(range).1;
        let buffer = editor.buffer_mut();
        let len = buffer.line_length(row);
        let content = buffer.text_in(Range::new(Position::new(row, 0), Position::new(row, len)));
        let indent: String = content.chars().take_while(|c| *c == ' ' || *c == '\t').collect();
        let opening = format!("{}{indent}", buffer.line_ending());
        let inserted = buffer.insert(Position::new(row, len), &opening)?;
        Ok(Anchor {
            at: Range::point(inserted.end),
            inserted: Some(inserted),
        })
    }
}

/// First and last row a range touches. A multi-row range ending at column 0
/// does not touch its end row.
fn covered_rows(range: Range) -> (usize, usize) {
    let last = if range.end.row > range.start.row && range.end.column == 0 {
        range.end.row - 1
    } else {
        range.end.row
    };
    (range.start.row, last)
}

// ---------------------------------------------------------------------------
// Names
// ---------------------------------------------------------------------------

impl fmt::Display for Selector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.token())
    }
}

/// Returned when a selector name is not recognized.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("unknown selector `{0}` (expected one of: char, word, number, line, parentheses)")]
pub struct ParseSelectorError(pub String);

impl FromStr for Selector {
    type Err = ParseSelectorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|selector| selector.token().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| ParseSelectorError(s.to_owned()))
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::buffer::Buffer;
    use crate::editor::TextEditor;

    fn p(row: usize, column: usize) -> Position {
        Position::new(row, column)
    }

    fn r(sr: usize, sc: usize, er: usize, ec: usize) -> Range {
        Range::new(p(sr, sc), p(er, ec))
    }

    // -- Names --------------------------------------------------------------

    #[test]
    fn default_is_word() {
        assert_eq!(Selector::default(), Selector::Word);
    }

    #[test]
    fn parse_and_display_round_trip() {
        for selector in Selector::ALL {
            assert_eq!(selector.to_string().parse::<Selector>(), Ok(selector));
        }
        assert_eq!("Line".parse::<Selector>(), Ok(Selector::Line));
        assert_eq!(
            "paragraph".parse::<Selector>(),
            Err(ParseSelectorError("paragraph".into()))
        );
    }

    #[test]
    fn display_names() {
        assert_eq!(Selector::Parentheses.name(), "Parentheses");
        assert_eq!(Selector::Number.to_string(), "number");
    }

    // -- matches ------------------------------------------------------------

    #[test]
    fn matches_complete_instances_only() {
        let buf = Buffer::from_text("x = 3.14 (a(b)c)");
        assert!(Selector::Char.matches(&buf, r(0, 0, 0, 1)));
        assert!(!Selector::Char.matches(&buf, r(0, 0, 0, 2)));
        assert!(Selector::Word.matches(&buf, r(0, 0, 0, 1)));
        assert!(Selector::Number.matches(&buf, r(0, 4, 0, 8)));
        assert!(!Selector::Number.matches(&buf, r(0, 4, 0, 5)));
        assert!(Selector::Line.matches(&buf, r(0, 0, 0, 16)));
        assert!(Selector::Parentheses.matches(&buf, r(0, 9, 0, 16)));
        assert!(Selector::Parentheses.matches(&buf, r(0, 11, 0, 14)));
        assert!(!Selector::Parentheses.matches(&buf, r(0, 9, 0, 14)));
    }

    #[test]
    fn matches_is_idempotent() {
        let buf = Buffer::from_text("alpha beta");
        let range = r(0, 6, 0, 10);
        let first = Selector::Word.matches(&buf, range);
        assert_eq!(first, Selector::Word.matches(&buf, range));
        assert!(first);
        assert_eq!(buf.contents(), "alpha beta");
    }

    // -- locate -------------------------------------------------------------

    #[test]
    fn locate_number_skips_words() {
        let buf = Buffer::from_text("width 12 height 7.5");
        assert_eq!(Selector::Number.locate_forward(&buf, p(0, 0)), Some(r(0, 6, 0, 8)));
        assert_eq!(Selector::Number.locate_forward(&buf, p(0, 8)), Some(r(0, 16, 0, 19)));
        assert_eq!(Selector::Number.locate_backward(&buf, p(0, 16)), Some(r(0, 6, 0, 8)));
    }

    #[test]
    fn locate_char_walks_single_characters() {
        let buf = Buffer::from_text("ab\ncd");
        assert_eq!(Selector::Char.locate_forward(&buf, p(0, 2)), Some(r(1, 0, 1, 1)));
        assert_eq!(Selector::Char.locate_backward(&buf, p(1, 0)), Some(r(0, 1, 0, 2)));
    }

    #[test]
    fn locate_parentheses_takes_outer_group() {
        let buf = Buffer::from_text("(a(b)c)");
        assert_eq!(Selector::Parentheses.locate_forward(&buf, p(0, 0)), Some(r(0, 0, 0, 7)));
        assert_eq!(Selector::Parentheses.locate_backward(&buf, p(0, 7)), Some(r(0, 0, 0, 7)));
        assert_eq!(Selector::Parentheses.locate_forward(&buf, p(0, 1)), Some(r(0, 2, 0, 5)));
    }

    // -- matching boundaries ------------------------------------------------

    #[test]
    fn matching_parentheses_are_delimiters() {
        let buf = Buffer::from_text("f(x, (y))");
        let right = Selector::Parentheses.find_matching_right(&buf, r(0, 1, 0, 2));
        assert_eq!(right, Some(r(0, 8, 0, 9)));
        let left = Selector::Parentheses.find_matching_left(&buf, r(0, 8, 0, 9));
        assert_eq!(left, Some(r(0, 1, 0, 2)));
    }

    #[test]
    fn matching_word_bounds_are_points() {
        let buf = Buffer::from_text("one two");
        let right = Selector::Word.find_matching_right(&buf, Range::point(p(0, 5)));
        assert_eq!(right, Some(Range::point(p(0, 7))));
        let left = Selector::Word.find_matching_left(&buf, Range::point(p(0, 7)));
        assert_eq!(left, Some(Range::point(p(0, 4))));
    }

    // -- delete_range -------------------------------------------------------

    #[test]
    fn delete_range_is_identity_for_words() {
        let buf = Buffer::from_text("one two");
        assert_eq!(Selector::Word.delete_range(&buf, r(0, 4, 0, 7)), r(0, 4, 0, 7));
    }

    #[test]
    fn delete_range_takes_whole_lines() {
        let buf = Buffer::from_text("  one\ntwo\nthree");
        assert_eq!(Selector::Line.delete_range(&buf, r(0, 2, 0, 5)), r(0, 0, 1, 0));
        assert_eq!(Selector::Line.delete_range(&buf, r(0, 2, 1, 3)), r(0, 0, 2, 0));
    }

    #[test]
    fn delete_range_on_last_row_takes_preceding_terminator() {
        let buf = Buffer::from_text("one\ntwo");
        assert_eq!(Selector::Line.delete_range(&buf, r(1, 0, 1, 3)), r(0, 3, 1, 3));
        let single = Buffer::from_text("only");
        assert_eq!(Selector::Line.delete_range(&single, r(0, 0, 0, 4)), r(0, 0, 0, 4));
    }

    // -- paste_anchor -------------------------------------------------------

    #[test]
    fn paste_anchor_for_words_is_selection_end() {
        let mut editor = TextEditor::new(Buffer::from_text("one two"));
        let anchor = Selector::Word.paste_anchor(&mut editor, r(0, 0, 0, 3)).unwrap();
        assert_eq!(anchor, Anchor { at: Range::point(p(0, 3)), inserted: None });
        assert_eq!(editor.buffer().contents(), "one two");
    }

    #[test]
    fn paste_anchor_for_lines_opens_indented_row() {
        let mut editor = TextEditor::new(Buffer::from_text("fn f() {\n    body\n}"));
        let anchor = Selector::Line.paste_anchor(&mut editor, r(1, 4, 1, 8)).unwrap();
        assert_eq!(anchor.at, Range::point(p(2, 4)));
        assert_eq!(anchor.inserted, Some(r(1, 8, 2, 4)));
        assert_eq!(editor.buffer().contents(), "fn f() {\n    body\n    \n}");
    }

    #[test]
    fn paste_anchor_reuses_buffer_line_ending() {
        let mut editor = TextEditor::new(Buffer::from_text("a\r\nb"));
        Selector::Line.paste_anchor(&mut editor, r(0, 0, 0, 1)).unwrap();
        assert_eq!(editor.buffer().contents(), "a\r\n\r\nb");
    }
}
