//! Actions — edit the buffer at every selection.
//!
//! Selections are processed from the bottom of the buffer up. Every range
//! still waiting to be processed is carried through the edits already made
//! (see [`Edit`]), so the outcome is the same as applying each selection's
//! edit to the buffer as it was when the command started.

use std::cmp::Reverse;

use crate::buffer::TextBuffer;
use crate::editor::Editor;
use crate::error::Result;
use crate::excursion::Excursion;
use crate::position::{Edit, Position, Range};
use crate::selector::Selector;

fn bottom_up(ranges: &[Range]) -> Vec<usize> {
    let mut order: Vec<usize> = (0..ranges.len()).collect();
    order.sort_by_key(|&i| Reverse(ranges[i].start));
    order
}

fn replay(edits: &[Edit], pos: Position) -> Position {
    edits.iter().fold(pos, |pos, edit| edit.map(pos))
}

fn replay_range(edits: &[Edit], range: Range) -> Range {
    edits.iter().fold(range, |range, edit| edit.map_range(range))
}

/// Delete what `selector` covers at every selection, then move each
/// collapsed selection to the next instance after the deletion point.
///
/// Lines go with their terminator. A selection with no instance after it
/// stays as a caret where the text was.
///
/// # Errors
///
/// Propagates a delete the buffer rejects. Selections are only replaced once
/// every delete succeeded.
pub fn delete_selections<E: Editor>(editor: &mut E, selector: Selector) -> Result<()> {
    let snapshot = editor.selections();
    if snapshot.is_empty() {
        return Ok(());
    }
    let targets: Vec<Range> = snapshot
        .iter()
        .map(|&range| selector.delete_range(editor.buffer(), range))
        .collect();

    let mut edits: Vec<Edit> = Vec::with_capacity(targets.len());
    for i in bottom_up(&targets) {
        let target = replay_range(&edits, targets[i]);
        editor.buffer_mut().delete(target)?;
        tracing::debug!(editor = editor.id().0, %target, "delete");
        edits.push(Edit::deletion(target));
    }

    let buffer = editor.buffer();
    let relocated: Vec<Range> = targets
        .iter()
        .map(|target| {
            let point = replay(&edits, target.start);
            selector
                .locate_forward(buffer, point)
                .unwrap_or_else(|| Range::point(point))
        })
        .collect();
    editor.replace_selections(relocated);
    Ok(())
}

/// Paste the clipboard relative to every selection, leaving the selections
/// where they were.
///
/// Each selection gets an anchor from [`Selector::paste_anchor`] (a new row
/// below it for lines, its end otherwise). The editor pastes once at all
/// anchors, inside an [`Excursion`] that puts the original selections back
/// afterwards, also when the paste fails. The restored selections are
/// carried through every edit made, so each still covers its own text.
///
/// # Errors
///
/// Propagates a failed anchor insert or a failed paste, such as an empty
/// clipboard.
pub fn paste_selections<E: Editor>(editor: &mut E, selector: Selector) -> Result<()> {
    let originals = editor.selections();
    if originals.is_empty() {
        return Ok(());
    }

    let mut edits: Vec<Edit> = Vec::new();
    let mut anchors = vec![(0, Range::point(Position::ZERO)); originals.len()];
    for i in bottom_up(&originals) {
        let target = replay_range(&edits, originals[i]);
        let anchor = selector.paste_anchor(editor, target)?;
        if let Some(inserted) = anchor.inserted {
            tracing::debug!(editor = editor.id().0, %inserted, "open line for paste");
            edits.push(Edit::insertion(inserted));
        }
        anchors[i] = (edits.len(), anchor.at);
    }

    let anchors: Vec<Range> = anchors
        .into_iter()
        .map(|(applied, at)| replay_range(&edits[applied..], at))
        .collect();
    let restored: Vec<Range> = originals
        .into_iter()
        .map(|range| replay_range(&edits, range))
        .collect();

    let mut excursion = Excursion::new(editor);
    excursion.restore_to(restored.clone());
    excursion.replace_selections(anchors);
    let pasted = excursion.paste_clipboard()?;
    excursion.restore_to(
        restored
            .into_iter()
            .map(|range| replay_range(&pasted, range))
            .collect(),
    );
    Ok(())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::editor::TextEditor;
    use crate::error::Error;
    use crate::motion;

    fn delete(input: &str, selector: Selector) -> String {
        let mut editor = TextEditor::from_notation(input).unwrap();
        delete_selections(&mut editor, selector).unwrap();
        editor.to_notation()
    }

    fn paste(input: &str, selector: Selector, clipboard: &str) -> String {
        let mut editor = TextEditor::from_notation(input).unwrap();
        editor.set_clipboard(clipboard);
        paste_selections(&mut editor, selector).unwrap();
        editor.to_notation()
    }

    // -- delete -------------------------------------------------------------

    #[test]
    fn delete_word_selects_next() {
        assert_eq!(delete("one [two] three", Selector::Word), "one  [three]");
    }

    #[test]
    fn delete_last_word_leaves_caret() {
        assert_eq!(delete("one [two]", Selector::Word), "one []");
    }

    #[test]
    fn delete_line_removes_terminator() {
        assert_eq!(delete("one\n[two]\nthree", Selector::Line), "one\n[three]");
    }

    #[test]
    fn delete_last_line_removes_preceding_terminator() {
        assert_eq!(delete("one\ntwo\n[three]", Selector::Line), "one\ntwo[]");
    }

    #[test]
    fn delete_only_line_empties_buffer() {
        assert_eq!(delete("[only]", Selector::Line), "[]");
    }

    #[test]
    fn delete_lines_keeps_other_lines_intact() {
        let mut editor = TextEditor::from_notation("a\n[b]\nc\n[d]\ne").unwrap();
        delete_selections(&mut editor, Selector::Line).unwrap();
        assert_eq!(editor.buffer().contents(), "a\nc\ne");
        assert_eq!(editor.to_notation(), "a\n[c]\n[e]");
    }

    #[test]
    fn delete_several_on_one_row() {
        assert_eq!(delete("[1] + [2] = [3]", Selector::Number), "[] + [] = []");
    }

    #[test]
    fn delete_overlapping_selections() {
        let mut editor = TextEditor::from_notation("[one two] three").unwrap();
        motion::add_next(&mut editor, Selector::Word);
        assert_eq!(editor.selections().len(), 2);
        delete_selections(&mut editor, Selector::Word).unwrap();
        assert_eq!(editor.buffer().contents(), " three");
        assert_eq!(editor.to_notation(), " [[three]]");
    }

    #[test]
    fn delete_parentheses() {
        assert_eq!(delete("f[(x)] (y)", Selector::Parentheses), "f [(y)]");
    }

    #[test]
    fn delete_without_selections_is_noop() {
        let mut editor = TextEditor::from_notation("text").unwrap();
        delete_selections(&mut editor, Selector::Word).unwrap();
        assert_eq!(editor.to_notation(), "text");
    }

    // -- paste --------------------------------------------------------------

    #[test]
    fn paste_word_after_selection() {
        assert_eq!(paste("[one] two", Selector::Word, "X"), "[one]X two");
    }

    #[test]
    fn paste_keeps_each_selection_on_its_own_text() {
        assert_eq!(paste("[one] [two]", Selector::Word, "XX"), "[one]XX [two]XX");
        assert_eq!(paste("[a]b [c]d", Selector::Char, "--"), "[a]--b [c]--d");
    }

    #[test]
    fn paste_line_below_with_indent() {
        assert_eq!(
            paste("{\n  [body]\n}", Selector::Line, "more"),
            "{\n  [body]\n  more\n}"
        );
    }

    #[test]
    fn paste_lines_below_several_selections() {
        assert_eq!(
            paste("[a]\n[b]\nc", Selector::Line, "x"),
            "[a]\nx\n[b]\nx\nc"
        );
    }

    #[test]
    fn failed_paste_restores_selections() {
        let mut editor = TextEditor::from_notation("one [two]").unwrap();
        assert_eq!(
            paste_selections(&mut editor, Selector::Word),
            Err(Error::ClipboardEmpty)
        );
        assert_eq!(editor.to_notation(), "one [two]");
    }
}
