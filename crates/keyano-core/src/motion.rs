//! Motions — compute new selections from current ones and a selector.
//!
//! Every motion goes through [`map_selections`]: the selections are read
//! once, each one is mapped on its own against the unchanged buffer, and the
//! results are written back with one `replace_selections` call. A selection
//! whose motion finds nothing keeps its range; it never aborts its siblings.
//!
//! Motions never edit the buffer.

use std::fmt;

use smallvec::{SmallVec, smallvec};

use crate::buffer::TextBuffer;
use crate::editor::Editor;
use crate::position::{Position, Range};
use crate::selector::Selector;

/// What one selection maps to. Most motions produce exactly one range, the
/// `add-*` motions two.
pub type Mapped = SmallVec<[Range; 2]>;

/// Map every selection through `f` and commit the results as one batch.
///
/// `f` sees the buffer and one selection from the snapshot taken before any
/// mapping; it never sees another selection's result. An editor without
/// selections is left alone.
pub fn map_selections<E, F>(editor: &mut E, mut f: F)
where
    E: Editor,
    F: FnMut(&E::Buffer, Range) -> Mapped,
{
    let snapshot = editor.selections();
    if snapshot.is_empty() {
        return;
    }
    let mapped: Vec<Range> = snapshot
        .iter()
        .flat_map(|&range| f(editor.buffer(), range))
        .collect();
    tracing::debug!(
        editor = editor.id().0,
        before = snapshot.len(),
        after = mapped.len(),
        "commit selections"
    );
    editor.replace_selections(mapped);
}

// ---------------------------------------------------------------------------
// Next / previous
// ---------------------------------------------------------------------------

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Seek {
    Next,
    Previous,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Origin {
    /// Skip the selection only if it already is an instance.
    Adaptive,
    /// Always search from the far side of the selection.
    After,
}

fn seek<B: TextBuffer>(
    buffer: &B,
    selector: Selector,
    range: Range,
    dir: Seek,
    origin: Origin,
) -> Option<Range> {
    let past = origin == Origin::After || selector.matches(buffer, range);
    match dir {
        Seek::Next => {
            let from = if past { range.end } else { range.start };
            selector.locate_forward(buffer, from)
        }
        Seek::Previous => {
            let from = if past { range.start } else { range.end };
            selector.locate_backward(buffer, from)
        }
    }
}

fn select<E: Editor>(editor: &mut E, selector: Selector, dir: Seek, origin: Origin) {
    map_selections(editor, |buffer, range| {
        smallvec![seek(buffer, selector, range, dir, origin).unwrap_or(range)]
    });
}

fn add<E: Editor>(editor: &mut E, selector: Selector, dir: Seek, origin: Origin) {
    map_selections(editor, |buffer, range| {
        let mut out: Mapped = smallvec![range];
        out.extend(seek(buffer, selector, range, dir, origin));
        out
    });
}

/// Select the next instance, moving past the selection if it already is one.
pub fn select_next<E: Editor>(editor: &mut E, selector: Selector) {
    select(editor, selector, Seek::Next, Origin::Adaptive);
}

/// Select the previous instance, moving past the selection if it already is
/// one.
pub fn select_previous<E: Editor>(editor: &mut E, selector: Selector) {
    select(editor, selector, Seek::Previous, Origin::Adaptive);
}

/// Select the next instance after the end of the selection.
pub fn select_next_after<E: Editor>(editor: &mut E, selector: Selector) {
    select(editor, selector, Seek::Next, Origin::After);
}

/// Select the previous instance before the start of the selection.
pub fn select_previous_after<E: Editor>(editor: &mut E, selector: Selector) {
    select(editor, selector, Seek::Previous, Origin::After);
}

/// Like [`select_next`], but keep the selection and add the instance.
pub fn add_next<E: Editor>(editor: &mut E, selector: Selector) {
    add(editor, selector, Seek::Next, Origin::Adaptive);
}

pub fn add_previous<E: Editor>(editor: &mut E, selector: Selector) {
    add(editor, selector, Seek::Previous, Origin::Adaptive);
}

pub fn add_next_after<E: Editor>(editor: &mut E, selector: Selector) {
    add(editor, selector, Seek::Next, Origin::After);
}

pub fn add_previous_after<E: Editor>(editor: &mut E, selector: Selector) {
    add(editor, selector, Seek::Previous, Origin::After);
}

// ---------------------------------------------------------------------------
// Expand / up / down
// ---------------------------------------------------------------------------

/// Advisory result of a boundary search that found nothing. The selection it
/// concerns is left unchanged.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Notice {
    NoRightBound,
    NoLeftBound,
}

impl fmt::Display for Notice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NoRightBound => f.write_str("no right bound found"),
            Self::NoLeftBound => f.write_str("no left bound found"),
        }
    }
}

/// The instance around the midpoint of `range`.
fn around_midpoint<B: TextBuffer>(
    buffer: &B,
    selector: Selector,
    range: Range,
) -> Result<Range, Notice> {
    let (start, end) = (buffer.offset_of(range.start), buffer.offset_of(range.end));
    let mid = buffer.position_at(start + (end - start) / 2);
    let right = selector
        .find_matching_right(buffer, Range::point(mid))
        .ok_or(Notice::NoRightBound)?;
    let left = selector
        .find_matching_left(buffer, right)
        .ok_or(Notice::NoLeftBound)?;
    Ok(Range::new(left.start, right.end))
}

/// The smallest instance that covers `range`.
///
/// A group never shrinks: when the group around the midpoint does not cover
/// `range`, or already is `range`, the search climbs to the group around it.
/// The other objects have no outer instance, so a selection no single
/// instance covers comes back unchanged.
fn enclosing<B: TextBuffer>(buffer: &B, selector: Selector, range: Range) -> Result<Range, Notice> {
    let mut found = around_midpoint(buffer, selector, range)?;
    if selector != Selector::Parentheses {
        return Ok(if found.covers(range) { found } else { range });
    }
    while found == range || !found.covers(range) {
        let right = selector
            .find_matching_right(buffer, Range::point(found.end))
            .ok_or(Notice::NoRightBound)?;
        let left = selector
            .find_matching_left(buffer, right)
            .ok_or(Notice::NoLeftBound)?;
        found = Range::new(left.start, right.end);
    }
    Ok(found)
}

fn expand_each<E, F, G>(editor: &mut E, mut seed: F, mut grow: G) -> Vec<Notice>
where
    E: Editor,
    F: FnMut(&E::Buffer, Range) -> Option<Range>,
    G: FnMut(&E::Buffer, Range) -> Result<Range, Notice>,
{
    let mut notices = Vec::new();
    map_selections(editor, |buffer, range| {
        let grown = seed(buffer, range).map(|seeded| grow(buffer, seeded));
        match grown {
            Some(Ok(found)) => smallvec![found],
            Some(Err(notice)) => {
                notices.push(notice);
                smallvec![range]
            }
            None => smallvec![range],
        }
    });
    notices
}

/// Grow each selection to the smallest instance covering it. A selected
/// group grows to its parent group.
pub fn select_expand<E: Editor>(editor: &mut E, selector: Selector) -> Vec<Notice> {
    expand_each(editor, |_, range| Some(range), |buffer, range| enclosing(buffer, selector, range))
}

/// Select the instance around the selection moved one row up. No-op on the
/// first row.
pub fn up<E: Editor>(editor: &mut E, selector: Selector) -> Vec<Notice> {
    expand_each(
        editor,
        |buffer, range| (range.start.row > 0).then(|| shift_rows(buffer, range, |row| row - 1)),
        |buffer, seeded| around_midpoint(buffer, selector, seeded),
    )
}

/// Select the instance around the selection moved one row down. No-op on
/// the last row.
pub fn down<E: Editor>(editor: &mut E, selector: Selector) -> Vec<Notice> {
    expand_each(
        editor,
        |buffer, range| {
            (range.end.row < buffer.last_row()).then(|| shift_rows(buffer, range, |row| row + 1))
        },
        |buffer, seeded| around_midpoint(buffer, selector, seeded),
    )
}

fn shift_rows<B: TextBuffer>(buffer: &B, range: Range, shift: impl Fn(usize) -> usize) -> Range {
    let move_pos = |pos: Position| buffer.clip_position(Position::new(shift(pos.row), pos.column));
    Range::ordered(move_pos(range.start), move_pos(range.end))
}

// ---------------------------------------------------------------------------
// Select all in
// ---------------------------------------------------------------------------

/// Replace each selection with every instance that lies inside it.
/// A selection holding no instance is kept.
pub fn select_all_in<E: Editor>(editor: &mut E, selector: Selector) {
    map_selections(editor, |buffer, range| {
        let mut found = Mapped::new();
        let mut point = range.start;
        while let Some(instance) = selector.locate_forward(buffer, point) {
            if instance.end > range.end || instance.end <= point {
                break;
            }
            found.push(instance);
            point = instance.end;
        }
        if found.is_empty() {
            found.push(range);
        }
        found
    });
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
