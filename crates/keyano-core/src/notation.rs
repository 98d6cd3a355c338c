//! Bracket notation for text with selections.
//!
//! `"Lorem ip[s]um"` is the text `Lorem ipsum` with the `s` selected.
//! Brackets may nest, `[]` is an empty selection (a caret), and `\[`, `\]`,
//! `\\` stand for the literal characters. Selections are listed in the order
//! their `[` appears.
//!
//! The notation is how scenarios are written in tests and how the CLI reads
//! and prints editor state.

use std::ops;

use thiserror::Error;

use crate::buffer::TextBuffer;
use crate::position::Range;

/// Malformed notation. Offsets count chars of the notation string.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum NotationError {
    #[error("`]` at char {0} closes no selection")]
    UnmatchedClose(usize),

    #[error("`[` at char {0} is never closed")]
    Unclosed(usize),
}

/// Plain text plus the selections marked in it, as char-offset spans.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Marked {
    pub text: String,
    pub spans: Vec<ops::Range<usize>>,
}

impl Marked {
    /// The spans as buffer ranges. `buffer` must hold [`Self::text`].
    pub fn selections<B: TextBuffer>(&self, buffer: &B) -> Vec<Range> {
        self.spans
            .iter()
            .map(|span| Range::new(buffer.position_at(span.start), buffer.position_at(span.end)))
            .collect()
    }
}

/// Split notation into text and selection spans.
///
/// # Errors
///
/// [`NotationError`] when brackets do not pair up.
pub fn parse(input: &str) -> Result<Marked, NotationError> {
    let mut text = String::with_capacity(input.len());
    let mut offset = 0;
    let mut spans: Vec<ops::Range<usize>> = Vec::new();
    // (index into `spans`, notation offset of the `[`)
    let mut open: Vec<(usize, usize)> = Vec::new();

    let mut chars = input.chars().enumerate().peekable();
    while let Some((at, c)) = chars.next() {
        match c {
            '\\' => match chars.next_if(|(_, next)| matches!(*next, '[' | ']' | '\\')) {
                Some((_, escaped)) => text.push(escaped),
                None => text.push('\\'),
            },
            '[' => {
                open.push((spans.len(), at));
                spans.push(offset..offset);
                continue;
            }
            ']' => {
                let (slot, _) = open.pop().ok_or(NotationError::UnmatchedClose(at))?;
                spans[slot].end = offset;
                continue;
            }
            _ => text.push(c),
        }
        offset += 1;
    }

    if let Some(&(_, at)) = open.first() {
        return Err(NotationError::Unclosed(at));
    }
    Ok(Marked { text, spans })
}

/// The buffer's text with `selections` marked in it.
///
/// Overlapping selections that do not nest cannot be told apart from nested
/// ones once rendered.
pub fn render<B: TextBuffer>(buffer: &B, selections: &[Range]) -> String {
    let text = buffer.text_in(buffer.extent());
    let spans: Vec<(usize, usize)> = selections
        .iter()
        .map(|range| (buffer.offset_of(range.start), buffer.offset_of(range.end)))
        .collect();

    let mut out = String::with_capacity(text.len() + 2 * spans.len());
    let mut chars = text.chars();
    let mut offset = 0;
    loop {
        let closes = spans.iter().filter(|&&(s, e)| s < e && e == offset).count();
        let carets = spans.iter().filter(|&&(s, e)| s == e && s == offset).count();
        let opens = spans.iter().filter(|&&(s, e)| s < e && s == offset).count();
        out.extend(std::iter::repeat_n(']', closes));
        out.extend(std::iter::repeat_n("[]", carets));
        out.extend(std::iter::repeat_n('[', opens));

        let Some(c) = chars.next() else { break };
        if matches!(c, '[' | ']' | '\\') {
            out.push('\\');
        }
        out.push(c);
        offset += 1;
    }
    out
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::buffer::Buffer;
    use crate::position::Position;

    fn marked(text: &str, spans: &[ops::Range<usize>]) -> Marked {
        Marked {
            text: text.into(),
            spans: spans.to_vec(),
        }
    }

    #[test]
    fn parse_single_selection() {
        assert_eq!(parse("Lorem ip[s]um"), Ok(marked("Lorem ipsum", &[8..9])));
    }

    #[test]
    fn parse_caret() {
        assert_eq!(parse("a[]b"), Ok(marked("ab", &[1..1])));
    }

    #[test]
    fn parse_nested_keeps_open_order() {
        assert_eq!(parse("[a[b]]c"), Ok(marked("abc", &[0..2, 1..2])));
    }

    #[test]
    fn parse_escapes() {
        assert_eq!(parse(r"\[x\] \\ \n"), Ok(marked(r"[x] \ \n", &[])));
        assert_eq!(parse(r"[\]]"), Ok(marked("]", &[0..1])));
    }

    #[test]
    fn parse_errors() {
        assert_eq!(parse("a]b"), Err(NotationError::UnmatchedClose(1)));
        assert_eq!(parse("[a[b]"), Err(NotationError::Unclosed(0)));
    }

    #[test]
    fn selections_cross_rows() {
        let parsed = parse("one\n[two]").unwrap();
        let buf = Buffer::from_text(&parsed.text);
        assert_eq!(
            parsed.selections(&buf),
            vec![Range::new(Position::new(1, 0), Position::new(1, 3))]
        );
    }

    #[test]
    fn render_marks_and_escapes() {
        let buf = Buffer::from_text("f[0] = x");
        let selections = [
            Range::new(Position::new(0, 1), Position::new(0, 4)),
            Range::point(Position::new(0, 8)),
        ];
        assert_eq!(render(&buf, &selections), r"f[\[0\]] = x[]");
    }

    #[test]
    fn render_inverts_parse() {
        for input in ["Lorem ipsum [dolor] \n[sit] amet", "[a[b]]c", "[]x[]", "\\[[()]\\]"] {
            let parsed = parse(input).unwrap();
            let buf = Buffer::from_text(&parsed.text);
            assert_eq!(render(&buf, &parsed.selections(&buf)), input);
        }
    }
}
