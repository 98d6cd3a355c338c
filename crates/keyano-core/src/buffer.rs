//! Text buffers — the contract the engine reads through, and a rope-backed
//! implementation of it.
//!
//! The engine never owns text storage. Every selector, motion, and action is
//! generic over [`TextBuffer`], a line-oriented interface with position
//! queries, pattern scans over sub-ranges, and insert/delete. Hosts bring
//! their own storage by implementing it.
//!
//! [`Buffer`] is the reference implementation used by the CLI and the tests:
//!
//! - **ropey** provides O(log n) edits and line indexing; positions convert
//!   to rope char indices and back.
//! - **Columns are char offsets.** Byte offsets from the regex engine are
//!   converted before they leave this module.
//! - **Line endings are detected on load** and reused when the engine needs
//!   to create a new line.
//!
//! # Scanning
//!
//! Patterns are matched one row at a time, terminator included, so a match
//! never spans a line break. Both scan directions are lazy at row
//! granularity: a caller that stops at the first match (or the first match
//! at depth zero) has only copied and searched the rows between the scan
//! origin and that match. Scans only see the text inside the requested
//! range, so anchors and word boundaries treat the range edges as text
//! edges.

use std::fmt;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use regex::Regex;
use ropey::{Rope, RopeSlice};

use crate::error::{Error, Result};
use crate::position::{Position, Range};

// ---------------------------------------------------------------------------
// Contract
// ---------------------------------------------------------------------------

/// One pattern match found by a scan.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScanMatch {
    pub range: Range,
    pub text: String,
}

/// Line-oriented text storage as the selection engine sees it.
///
/// Positions handed to these methods are expected to be inside the buffer
/// (or exactly at its end). Reads clamp or return empty text for anything
/// else; edits report [`Error::OutOfBounds`].
pub trait TextBuffer {
    /// The whole buffer, from the first position to the end.
    fn extent(&self) -> Range;

    /// Always `(0, 0)`.
    fn first_position(&self) -> Position {
        Position::ZERO
    }

    /// Index of the last row. A trailing line terminator creates an empty
    /// last row.
    fn last_row(&self) -> usize;

    /// Number of chars in `row`, excluding its line terminator.
    fn line_length(&self, row: usize) -> usize;

    /// The text covered by `range`.
    fn text_in(&self, range: Range) -> String;

    /// Absolute char offset of a position.
    fn offset_of(&self, pos: Position) -> usize;

    /// Position of an absolute char offset, clamped to the buffer end.
    fn position_at(&self, offset: usize) -> Position;

    /// The nearest valid position to `pos`.
    fn clip_position(&self, pos: Position) -> Position;

    /// Terminator used when a new line has to be created.
    fn line_ending(&self) -> &str;

    /// Matches of `pattern` inside `within`, in document order. A match never
    /// spans a line break.
    fn scan_forward<'a>(
        &'a self,
        pattern: &'a Regex,
        within: Range,
    ) -> impl Iterator<Item = ScanMatch> + 'a;

    /// Matches of `pattern` inside `within`, nearest to `within.end` first.
    fn scan_backward<'a>(
        &'a self,
        pattern: &'a Regex,
        within: Range,
    ) -> impl Iterator<Item = ScanMatch> + 'a;

    /// Insert `text` at `pos`, returning the span it now occupies.
    ///
    /// # Errors
    ///
    /// [`Error::OutOfBounds`] if `pos` is not inside the buffer.
    fn insert(&mut self, pos: Position, text: &str) -> Result<Range>;

    /// Remove the text covered by `range`.
    ///
    /// # Errors
    ///
    /// [`Error::OutOfBounds`] if either endpoint is not inside the buffer.
    fn delete(&mut self, range: Range) -> Result<()>;
}

// ---------------------------------------------------------------------------
// Line ending detection
// ---------------------------------------------------------------------------

/// Line ending style of a buffer.
///
/// Detected from the first occurrence. Defaults to `Lf`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LineEnding {
    /// `\n`
    Lf,
    /// `\r\n`
    CrLf,
    /// `\r`
    Cr,
}

impl LineEnding {
    #[inline]
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Lf => "\n",
            Self::CrLf => "\r\n",
            Self::Cr => "\r",
        }
    }

    /// Detect the line ending in a string from its first occurrence.
    /// Returns `Lf` if there is none.
    #[must_use]
    pub fn detect(text: &str) -> Self {
        let bytes = text.as_bytes();
        for (i, &byte) in bytes.iter().enumerate() {
            match byte {
                b'\n' => return Self::Lf,
                b'\r' if bytes.get(i + 1) == Some(&b'\n') => return Self::CrLf,
                b'\r' => return Self::Cr,
                _ => {}
            }
        }
        Self::Lf
    }
}

// ---------------------------------------------------------------------------
// Buffer
// ---------------------------------------------------------------------------

/// A rope-backed [`TextBuffer`].
///
/// Tracks the text, the file it came from (if any), whether it was edited
/// since load or save, and its line ending style.
pub struct Buffer {
    rope: Rope,
    path: Option<PathBuf>,
    modified: bool,
    line_ending: LineEnding,
}

impl Buffer {
    // -- Construction -------------------------------------------------------

    /// An empty buffer with no file path.
    #[must_use]
    pub fn new() -> Self {
        Self::from_text("")
    }

    #[must_use]
    pub fn from_text(text: &str) -> Self {
        Self {
            line_ending: LineEnding::detect(text),
            rope: Rope::from_str(text),
            path: None,
            modified: false,
        }
    }

    /// Load a buffer from a file. The buffer starts unmodified.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or is not valid UTF-8.
    pub fn from_file(path: &Path) -> io::Result<Self> {
        let text = fs::read_to_string(path)?;
        Ok(Self {
            path: Some(path.to_path_buf()),
            ..Self::from_text(&text)
        })
    }

    // -- Text access --------------------------------------------------------

    /// Number of rows. An empty buffer has one (empty) row.
    #[inline]
    #[must_use]
    pub fn line_count(&self) -> usize {
        self.rope.len_lines()
    }

    #[inline]
    #[must_use]
    pub fn len_chars(&self) -> usize {
        self.rope.len_chars()
    }

    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rope.len_chars() == 0
    }

    /// A row including its trailing line ending, if the row exists.
    #[inline]
    #[must_use]
    pub fn line(&self, row: usize) -> Option<RopeSlice<'_>> {
        (row < self.rope.len_lines()).then(|| self.rope.line(row))
    }

    /// Chars in a row **excluding** its line ending (`\n`, `\r\n`, `\r`).
    #[must_use]
    pub fn line_content_len(&self, row: usize) -> Option<usize> {
        self.line(row).map(|line| {
            let total = line.len_chars();
            match (total.checked_sub(2).map(|i| line.char(i)), total.checked_sub(1).map(|i| line.char(i))) {
                (Some('\r'), Some('\n')) => total - 2,
                (_, Some('\n' | '\r')) => total - 1,
                _ => total,
            }
        })
    }

    /// The full text. Allocates.
    #[must_use]
    pub fn contents(&self) -> String {
        self.rope.to_string()
    }

    // -- Coordinate conversion ----------------------------------------------

    /// A position as an absolute rope char index.
    ///
    /// A column equal to the row's char count (terminator included) is
    /// valid; anything past that is not.
    #[must_use]
    pub fn pos_to_char_idx(&self, pos: Position) -> Option<usize> {
        let line = self.line(pos.row)?;
        if pos.column > line.len_chars() {
            return None;
        }
        Some(self.rope.line_to_char(pos.row) + pos.column)
    }

    fn checked_idx(&self, pos: Position) -> Result<usize> {
        self.pos_to_char_idx(pos).ok_or(Error::OutOfBounds(pos))
    }

    // -- Scanning -----------------------------------------------------------

    /// The part of `row` inside `within`, its terminator included.
    fn row_segment(&self, row: usize, within: Range) -> Range {
        let row_end = if row < self.last_row() {
            Position::new(row + 1, 0)
        } else {
            Position::new(row, self.line_length(row))
        };
        Range::new(within.start.max(Position::new(row, 0)), within.end.min(row_end))
    }

    /// Matches inside one row of `within`.
    ///
    /// An empty match at the end of a row that `within` continues past is
    /// dropped: the next row reports the same position at its start.
    fn row_matches<'a>(
        &'a self,
        pattern: &'a Regex,
        row: usize,
        within: Range,
    ) -> impl Iterator<Item = ScanMatch> + 'a {
        let segment = self.row_segment(row, within);
        let continues = segment.end != within.end;
        Matches::new(self, pattern, segment)
            .filter(move |m| !(continues && m.range.is_empty() && m.range.start == segment.end))
    }

    // -- Metadata -----------------------------------------------------------

    #[inline]
    #[must_use]
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// True if the buffer changed since it was loaded or last saved.
    #[inline]
    #[must_use]
    pub const fn is_modified(&self) -> bool {
        self.modified
    }

    #[inline]
    #[must_use]
    pub const fn ending(&self) -> LineEnding {
        self.line_ending
    }

    // -- File I/O -----------------------------------------------------------

    /// Write the buffer back to the file it was loaded from.
    ///
    /// # Errors
    ///
    /// Returns an error if the buffer has no path or the write fails.
    pub fn save(&mut self) -> io::Result<()> {
        let path = self
            .path
            .clone()
            .ok_or_else(|| io::Error::new(io::ErrorKind::NotFound, "buffer has no file path"))?;
        fs::write(&path, self.contents())?;
        self.modified = false;
        Ok(())
    }
}

impl TextBuffer for Buffer {
    fn extent(&self) -> Range {
        Range::new(Position::ZERO, self.position_at(self.rope.len_chars()))
    }

    fn last_row(&self) -> usize {
        self.rope.len_lines().saturating_sub(1)
    }

    fn line_length(&self, row: usize) -> usize {
        self.line_content_len(row).unwrap_or(0)
    }

    fn text_in(&self, range: Range) -> String {
        match (self.pos_to_char_idx(range.start), self.pos_to_char_idx(range.end)) {
            (Some(start), Some(end)) if start <= end => self.rope.slice(start..end).to_string(),
            _ => String::new(),
        }
    }

    fn offset_of(&self, pos: Position) -> usize {
        self.pos_to_char_idx(pos)
            .unwrap_or_else(|| self.rope.len_chars())
    }

    fn position_at(&self, offset: usize) -> Position {
        let idx = offset.min(self.rope.len_chars());
        let row = self.rope.char_to_line(idx);
        Position::new(row, idx - self.rope.line_to_char(row))
    }

    fn clip_position(&self, pos: Position) -> Position {
        let row = pos.row.min(self.last_row());
        Position::new(row, pos.column.min(self.line_length(row)))
    }

    fn line_ending(&self) -> &str {
        self.line_ending.as_str()
    }

    fn scan_forward<'a>(
        &'a self,
        pattern: &'a Regex,
        within: Range,
    ) -> impl Iterator<Item = ScanMatch> + 'a {
        (within.start.row..=within.end.row).flat_map(move |row| self.row_matches(pattern, row, within))
    }

    fn scan_backward<'a>(
        &'a self,
        pattern: &'a Regex,
        within: Range,
    ) -> impl Iterator<Item = ScanMatch> + 'a {
        // The regex engine only searches forward, so each row is reversed on
        // its own before moving up to the previous one.
        (within.start.row..=within.end.row).rev().flat_map(move |row| {
            let mut found: Vec<ScanMatch> = self.row_matches(pattern, row, within).collect();
            found.reverse();
            found
        })
    }

    fn insert(&mut self, pos: Position, text: &str) -> Result<Range> {
        let idx = self.checked_idx(pos)?;
        self.rope.insert(idx, text);
        self.modified = true;
        Ok(Range::new(pos, self.position_at(idx + text.chars().count())))
    }

    fn delete(&mut self, range: Range) -> Result<()> {
        let start = self.checked_idx(range.start)?;
        let end = self.checked_idx(range.end)?;
        if start < end {
            self.rope.remove(start..end);
            self.modified = true;
        }
        Ok(())
    }
}

impl Default for Buffer {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for Buffer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Buffer")
            .field("lines", &self.line_count())
            .field("chars", &self.len_chars())
            .field("modified", &self.modified)
            .field("line_ending", &self.line_ending)
            .field("path", &self.path)
            .finish_non_exhaustive()
    }
}

// ---------------------------------------------------------------------------
// Row match iterator
// ---------------------------------------------------------------------------

/// Forward matches of a pattern over one row segment of a [`Buffer`].
///
/// Searches resume from the end of the previous match on each `next()`, and
/// byte offsets are converted to char offsets incrementally.
struct Matches<'a> {
    buffer: &'a Buffer,
    pattern: &'a Regex,
    haystack: String,
    /// Char offset of the haystack's first char in the buffer.
    base: usize,
    /// Byte offset where the next search starts; past the end once exhausted.
    next_byte: usize,
    /// Bytes / chars of the haystack already converted.
    seen_bytes: usize,
    seen_chars: usize,
}

impl<'a> Matches<'a> {
    fn new(buffer: &'a Buffer, pattern: &'a Regex, within: Range) -> Self {
        Self {
            buffer,
            pattern,
            haystack: buffer.text_in(within),
            base: buffer.offset_of(within.start),
            next_byte: 0,
            seen_bytes: 0,
            seen_chars: 0,
        }
    }

    fn char_offset(&mut self, byte: usize) -> usize {
        self.seen_chars += self.haystack[self.seen_bytes..byte].chars().count();
        self.seen_bytes = byte;
        self.base + self.seen_chars
    }
}

impl Iterator for Matches<'_> {
    type Item = ScanMatch;

    fn next(&mut self) -> Option<ScanMatch> {
        if self.next_byte > self.haystack.len() {
            return None;
        }
        let Some(found) = self.pattern.find_at(&self.haystack, self.next_byte) else {
            self.next_byte = self.haystack.len() + 1;
            return None;
        };
        let (start, end) = (found.start(), found.end());
        let text = found.as_str().to_owned();

        // An empty match must still make progress.
        self.next_byte = if start == end {
            end + self.haystack[end..].chars().next().map_or(1, char::len_utf8)
        } else {
            end
        };

        let start = self.char_offset(start);
        let end = self.char_offset(end);
        Some(ScanMatch {
            range: Range::new(self.buffer.position_at(start), self.buffer.position_at(end)),
            text,
        })
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn p(row: usize, column: usize) -> Position {
        Position::new(row, column)
    }

    fn r(sr: usize, sc: usize, er: usize, ec: usize) -> Range {
        Range::new(p(sr, sc), p(er, ec))
    }

    fn regex(pattern: &str) -> Regex {
        Regex::new(pattern).unwrap()
    }

    // -- LineEnding ---------------------------------------------------------

    #[test]
    fn line_ending_detect() {
        assert_eq!(LineEnding::detect("hello\nworld\n"), LineEnding::Lf);
        assert_eq!(LineEnding::detect("hello\r\nworld\r\n"), LineEnding::CrLf);
        assert_eq!(LineEnding::detect("hello\rworld\r"), LineEnding::Cr);
        assert_eq!(LineEnding::detect("no newlines"), LineEnding::Lf);
        assert_eq!(LineEnding::detect("a\r\nb\nc"), LineEnding::CrLf);
    }

    #[test]
    fn line_ending_text() {
        assert_eq!(LineEnding::CrLf.as_str(), "\r\n");
        assert_eq!(LineEnding::Cr.as_str(), "\r");
    }

    // -- Construction & metadata --------------------------------------------

    #[test]
    fn new_buffer_is_empty() {
        let buf = Buffer::new();
        assert!(buf.is_empty());
        assert_eq!(buf.line_count(), 1);
        assert_eq!(buf.extent(), Range::point(Position::ZERO));
        assert!(!buf.is_modified());
        assert!(buf.path().is_none());
    }

    #[test]
    fn file_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("notes.txt");
        fs::write(&path, "one\r\ntwo").unwrap();

        let mut buf = Buffer::from_file(&path).unwrap();
        assert_eq!(buf.ending(), LineEnding::CrLf);
        assert_eq!(buf.path(), Some(path.as_path()));

        buf.delete(r(0, 0, 1, 0)).unwrap();
        assert!(buf.is_modified());
        buf.save().unwrap();
        assert!(!buf.is_modified());
        assert_eq!(fs::read_to_string(&path).unwrap(), "two");
    }

    #[test]
    fn save_without_path_fails() {
        let mut buf = Buffer::from_text("x");
        assert_eq!(buf.save().unwrap_err().kind(), io::ErrorKind::NotFound);
    }

    // -- Contract: geometry -------------------------------------------------

    #[test]
    fn extent_and_rows() {
        let buf = Buffer::from_text("hello\nworld\n");
        assert_eq!(buf.extent(), r(0, 0, 2, 0));
        assert_eq!(buf.last_row(), 2);
        assert_eq!(buf.line_length(0), 5);
        assert_eq!(buf.line_length(2), 0);
    }

    #[test]
    fn line_length_excludes_crlf() {
        let buf = Buffer::from_text("hello\r\nworld");
        assert_eq!(buf.line_length(0), 5);
        assert_eq!(buf.line_length(1), 5);
    }

    #[test]
    fn text_in_spans_rows() {
        let buf = Buffer::from_text("first\nsecond");
        assert_eq!(buf.text_in(r(0, 3, 1, 3)), "st\nsec");
        assert_eq!(buf.text_in(r(5, 0, 6, 0)), "");
    }

    #[test]
    fn offsets_round_trip() {
        let buf = Buffer::from_text("ab\ncd");
        assert_eq!(buf.offset_of(p(1, 1)), 4);
        assert_eq!(buf.position_at(4), p(1, 1));
        assert_eq!(buf.position_at(100), p(1, 2));
    }

    #[test]
    fn clip_position_clamps_row_and_column() {
        let buf = Buffer::from_text("short\nlonger line");
        assert_eq!(buf.clip_position(p(0, 40)), p(0, 5));
        assert_eq!(buf.clip_position(p(9, 3)), p(1, 3));
    }

    // -- Contract: scans ----------------------------------------------------

    #[test]
    fn scan_forward_yields_document_order() {
        let buf = Buffer::from_text("ab 12\ncd 345");
        let digits = regex("[0-9]+");
        let found: Vec<Range> = buf
            .scan_forward(&digits, buf.extent())
            .map(|m| m.range)
            .collect();
        assert_eq!(found, vec![r(0, 3, 0, 5), r(1, 3, 1, 6)]);
    }

    #[test]
    fn scan_forward_is_limited_to_range() {
        let buf = Buffer::from_text("aaa bbb ccc");
        let word = regex("[a-z]+");
        let found: Vec<String> = buf
            .scan_forward(&word, r(0, 1, 0, 6))
            .map(|m| m.text)
            .collect();
        assert_eq!(found, vec!["aa", "bb"]);
    }

    #[test]
    fn scan_forward_converts_multibyte_columns() {
        let buf = Buffer::from_text("café x");
        let x = regex("x");
        let first = buf.scan_forward(&x, buf.extent()).next().unwrap();
        assert_eq!(first.range, r(0, 5, 0, 6));
    }

    #[test]
    fn scan_forward_survives_empty_matches() {
        let buf = Buffer::from_text("ab");
        let empty = regex("");
        assert_eq!(buf.scan_forward(&empty, buf.extent()).count(), 3);
    }

    #[test]
    fn scan_backward_yields_nearest_first() {
        let buf = Buffer::from_text("one two three");
        let word = regex("[a-z]+");
        let found: Vec<String> = buf
            .scan_backward(&word, buf.extent())
            .map(|m| m.text)
            .collect();
        assert_eq!(found, vec!["three", "two", "one"]);
    }

    #[test]
    fn scan_backward_crosses_rows_nearest_first() {
        let buf = Buffer::from_text("one two\nthree four");
        let word = regex("[a-z]+");
        let found: Vec<String> = buf
            .scan_backward(&word, r(0, 1, 1, 4))
            .map(|m| m.text)
            .collect();
        assert_eq!(found, vec!["thre", "two", "ne"]);
    }

    #[test]
    fn scan_matches_never_span_rows() {
        let buf = Buffer::from_text("a\nb");
        let across = regex(r"a\s+b");
        assert!(buf.scan_forward(&across, buf.extent()).next().is_none());
    }

    #[test]
    fn scan_sees_crlf_terminators_as_two_chars() {
        let buf = Buffer::from_text("one\r\ntwo");
        let other = regex("[^a-z]");
        let found: Vec<Range> = buf
            .scan_forward(&other, buf.extent())
            .map(|m| m.range)
            .collect();
        assert_eq!(found, vec![r(0, 3, 0, 4), r(0, 4, 1, 0)]);
    }

    #[test]
    fn scan_empty_matches_are_not_repeated_across_rows() {
        let buf = Buffer::from_text("ab\ncd");
        let empty = regex("");
        let forward: Vec<Position> = buf
            .scan_forward(&empty, buf.extent())
            .map(|m| m.range.start)
            .collect();
        assert_eq!(forward, vec![p(0, 0), p(0, 1), p(0, 2), p(1, 0), p(1, 1), p(1, 2)]);
        assert_eq!(buf.scan_backward(&empty, buf.extent()).count(), 6);
    }

    #[test]
    fn scan_finds_the_nearest_match_in_a_long_buffer() {
        let text = "word ".repeat(2000) + "\n" + &"word ".repeat(2000) + "42";
        let buf = Buffer::from_text(&text);
        let digits = regex("[0-9]+");
        let last = buf.scan_backward(&digits, buf.extent()).next().unwrap();
        assert_eq!(last.range, r(1, 10_000, 1, 10_002));
        let first = buf.scan_forward(&regex("[a-z]+"), buf.extent()).next().unwrap();
        assert_eq!(first.range, r(0, 0, 0, 4));
    }

    #[test]
    fn scan_with_no_match_is_empty() {
        let buf = Buffer::from_text("nothing here");
        let digits = regex("[0-9]");
        assert!(buf.scan_forward(&digits, buf.extent()).next().is_none());
        assert!(buf.scan_backward(&digits, buf.extent()).next().is_none());
    }

    // -- Contract: edits ----------------------------------------------------

    #[test]
    fn insert_returns_occupied_span() {
        let mut buf = Buffer::from_text("ac");
        assert_eq!(buf.insert(p(0, 1), "b\n  ").unwrap(), r(0, 1, 1, 2));
        assert_eq!(buf.contents(), "ab\n  c");
    }

    #[test]
    fn insert_out_of_bounds_is_an_error() {
        let mut buf = Buffer::from_text("ab");
        assert_eq!(buf.insert(p(3, 0), "x"), Err(Error::OutOfBounds(p(3, 0))));
        assert!(!buf.is_modified());
    }

    #[test]
    fn delete_removes_text_and_terminators() {
        let mut buf = Buffer::from_text("one\ntwo\nthree");
        buf.delete(r(1, 0, 2, 0)).unwrap();
        assert_eq!(buf.contents(), "one\nthree");
    }

    #[test]
    fn delete_empty_range_is_noop() {
        let mut buf = Buffer::from_text("abc");
        buf.delete(Range::point(p(0, 1))).unwrap();
        assert!(!buf.is_modified());
    }
}
