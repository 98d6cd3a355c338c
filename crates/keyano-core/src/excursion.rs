//! Excursions — run an edit somewhere else, then put the selections back.
//!
//! [`Excursion`] saves an editor's selections when it is created and writes
//! them back when it is dropped, whether the work in between finished,
//! returned an error, or panicked.

use std::ops::{Deref, DerefMut};

use crate::editor::Editor;
use crate::position::Range;

/// Scoped save/restore of an editor's selections.
///
/// Derefs to the editor, so the excursion is used in place of it for the
/// duration of the scope.
pub struct Excursion<'a, E: Editor> {
    editor: &'a mut E,
    saved: Vec<Range>,
}

impl<'a, E: Editor> Excursion<'a, E> {
    /// Save the current selections.
    pub fn new(editor: &'a mut E) -> Self {
        let saved = editor.selections();
        Self { editor, saved }
    }

    /// Restore something other than what was saved.
    pub fn restore_to(&mut self, selections: Vec<Range>) {
        self.saved = selections;
    }
}

impl<E: Editor> Deref for Excursion<'_, E> {
    type Target = E;

    fn deref(&self) -> &E {
        self.editor
    }
}

impl<E: Editor> DerefMut for Excursion<'_, E> {
    fn deref_mut(&mut self) -> &mut E {
        self.editor
    }
}

impl<E: Editor> Drop for Excursion<'_, E> {
    fn drop(&mut self) {
        self.editor.replace_selections(std::mem::take(&mut self.saved));
    }
}
