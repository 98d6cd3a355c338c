//! The editor contract and a reference editor.
//!
//! An [`Editor`] is a buffer plus an ordered list of selections, and it
//! knows how to paste its clipboard over them. The engine reads selections
//! once per command and writes them back with a single
//! [`Editor::replace_selections`] call.

use crate::buffer::{Buffer, TextBuffer};
use crate::error::{Error, Result};
use crate::notation::{self, NotationError};
use crate::position::{Edit, Position, Range};

/// Host-assigned identity of an editor.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EditorId(pub u64);

/// A buffer with selections, as the engine sees it.
pub trait Editor {
    type Buffer: TextBuffer;

    fn id(&self) -> EditorId;

    fn buffer(&self) -> &Self::Buffer;

    fn buffer_mut(&mut self) -> &mut Self::Buffer;

    /// Current selections, in order.
    fn selections(&self) -> Vec<Range>;

    /// Replace every selection at once.
    fn replace_selections(&mut self, ranges: Vec<Range>);

    /// Replace the text of every selection with the clipboard contents.
    ///
    /// Returns the edits made, in the order they were applied, so a caller
    /// can carry its own positions through the paste.
    ///
    /// # Errors
    ///
    /// Fails if there is nothing to paste or the buffer rejects an edit.
    fn paste_clipboard(&mut self) -> Result<Vec<Edit>>;
}

// ---------------------------------------------------------------------------
// TextEditor
// ---------------------------------------------------------------------------

/// An in-memory [`Editor`] over a [`Buffer`] with its own clipboard.
#[derive(Debug)]
pub struct TextEditor {
    id: EditorId,
    buffer: Buffer,
    selections: Vec<Range>,
    clipboard: String,
}

impl TextEditor {
    /// An editor with a single caret at the start of `buffer`.
    #[must_use]
    pub fn new(buffer: Buffer) -> Self {
        Self {
            id: EditorId::default(),
            buffer,
            selections: vec![Range::point(Position::ZERO)],
            clipboard: String::new(),
        }
    }

    /// Give the editor the identity its host assigned.
    #[must_use]
    pub fn with_id(mut self, id: EditorId) -> Self {
        self.id = id;
        self
    }

    /// An editor whose text and selections come from bracket notation.
    ///
    /// # Errors
    ///
    /// [`NotationError`] if the brackets do not pair up.
    pub fn from_notation(input: &str) -> Result<Self, NotationError> {
        let marked = notation::parse(input)?;
        let buffer = Buffer::from_text(&marked.text);
        let selections = marked.selections(&buffer);
        Ok(Self {
            selections,
            ..Self::new(buffer)
        })
    }

    /// Text and selections in bracket notation.
    #[must_use]
    pub fn to_notation(&self) -> String {
        notation::render(&self.buffer, &self.selections)
    }

    pub fn set_clipboard(&mut self, text: impl Into<String>) {
        self.clipboard = text.into();
    }

    /// Take the buffer back, e.g. to save it.
    #[must_use]
    pub fn into_buffer(self) -> Buffer {
        self.buffer
    }
}

impl Editor for TextEditor {
    type Buffer = Buffer;

    fn id(&self) -> EditorId {
        self.id
    }

    fn buffer(&self) -> &Buffer {
        &self.buffer
    }

    fn buffer_mut(&mut self) -> &mut Buffer {
        &mut self.buffer
    }

    fn selections(&self) -> Vec<Range> {
        self.selections.clone()
    }

    fn replace_selections(&mut self, ranges: Vec<Range>) {
        self.selections = ranges;
    }

    /// Edits run from the bottom of the buffer up. Each selection becomes a
    /// caret after its pasted text.
    fn paste_clipboard(&mut self) -> Result<Vec<Edit>> {
        if self.clipboard.is_empty() {
            return Err(Error::ClipboardEmpty);
        }

        let mut order: Vec<usize> = (0..self.selections.len()).collect();
        order.sort_by_key(|&i| std::cmp::Reverse(self.selections[i].start));

        let mut edits: Vec<Edit> = Vec::with_capacity(order.len());
        let mut carets = vec![(0, Position::ZERO); self.selections.len()];
        for i in order {
            let target = edits
                .iter()
                .fold(self.selections[i], |range, edit| edit.map_range(range));
            self.buffer.delete(target)?;
            let inserted = self.buffer.insert(target.start, &self.clipboard)?;
            edits.push(Edit {
                deleted: target,
                inserted,
            });
            carets[i] = (edits.len(), inserted.end);
        }

        self.selections = carets
            .into_iter()
            .map(|(applied, caret)| {
                Range::point(edits[applied..].iter().fold(caret, |pos, edit| edit.map(pos)))
            })
            .collect();
        tracing::debug!(editor = self.id.0, count = self.selections.len(), "pasted clipboard");
        Ok(edits)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
