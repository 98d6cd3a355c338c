// SPDX-License-Identifier: MIT
//
// Host integration — which selector each editor is using, and command
// dispatch.
//
// The engine is stateless; this is the one place that remembers anything
// between commands. An editor is observed when it opens and forgotten when
// it closes. Only `set-selector-*` changes its entry; every other command
// reads it and hands the selector to the engine.

use keyano_core::{Editor, EditorId, Notice, Selector, action, motion};
use rustc_hash::FxHashMap;

use crate::command::Command;

/// The active-selector association plus command dispatch.
#[derive(Debug, Default)]
pub struct Host {
    selectors: FxHashMap<EditorId, Selector>,
    default_selector: Selector,
}

impl Host {
    #[must_use]
    pub fn new(default_selector: Selector) -> Self {
        Self {
            selectors: FxHashMap::default(),
            default_selector,
        }
    }

    /// Start tracking an editor. An editor already tracked keeps its selector.
    pub fn observe(&mut self, id: EditorId) {
        self.selectors.entry(id).or_insert(self.default_selector);
    }

    /// Stop tracking an editor, returning the selector it had.
    pub fn close(&mut self, id: EditorId) -> Option<Selector> {
        self.selectors.remove(&id)
    }

    /// The editor's active selector, or the default for untracked editors.
    #[must_use]
    pub fn selector(&self, id: EditorId) -> Selector {
        self.selectors
            .get(&id)
            .copied()
            .unwrap_or(self.default_selector)
    }

    #[must_use]
    pub fn is_observed(&self, id: EditorId) -> bool {
        self.selectors.contains_key(&id)
    }

    /// Run one command against an editor.
    ///
    /// Returns the advisory notices the command produced, if any.
    ///
    /// # Errors
    ///
    /// Propagates engine errors from `delete-selections` and `paste`.
    pub fn dispatch<E: Editor>(
        &mut self,
        editor: &mut E,
        command: Command,
    ) -> keyano_core::Result<Vec<Notice>> {
        let id = editor.id();
        if let Command::SetSelector(selector) = command {
            tracing::info!(editor = id.0, selector = selector.name(), "selector changed");
            self.selectors.insert(id, selector);
            return Ok(Vec::new());
        }

        if !self.is_observed(id) {
            tracing::warn!(editor = id.0, %command, "editor was never observed, using default selector");
        }
        let selector = self.selector(id);
        tracing::debug!(editor = id.0, %command, %selector, edits = command.edits(), "dispatch");
        let notices = match command {
            Command::Up => motion::up(editor, selector),
            Command::Down => motion::down(editor, selector),
            Command::Expand => motion::select_expand(editor, selector),
            other => {
                apply(editor, other, selector)?;
                Vec::new()
            }
        };
        for notice in &notices {
            tracing::info!(editor = id.0, %command, "{notice}");
        }
        Ok(notices)
    }
}

/// Commands that never produce notices.
fn apply<E: Editor>(editor: &mut E, command: Command, selector: Selector) -> keyano_core::Result<()> {
    match command {
        Command::SelectNext => motion::select_next(editor, selector),
        Command::AddNext => motion::add_next(editor, selector),
        Command::SelectNextAfter => motion::select_next_after(editor, selector),
        Command::AddNextAfter => motion::add_next_after(editor, selector),
        Command::SelectPrevious => motion::select_previous(editor, selector),
        Command::AddPrevious => motion::add_previous(editor, selector),
        Command::SelectPreviousAfter => motion::select_previous_after(editor, selector),
        Command::AddPreviousAfter => motion::add_previous_after(editor, selector),
        Command::SelectAllIn => motion::select_all_in(editor, selector),
        Command::DeleteSelections => action::delete_selections(editor, selector)?,
        Command::Paste => action::paste_selections(editor, selector)?,
        Command::SetSelector(_) | Command::Up | Command::Down | Command::Expand => {}
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use keyano_core::{Error, TextEditor};
    use pretty_assertions::assert_eq;

    use super::*;

    fn editor(input: &str, id: u64) -> TextEditor {
        TextEditor::from_notation(input).unwrap().with_id(EditorId(id))
    }

    #[test]
    fn default_selector_is_used_until_set() {
        let mut host = Host::new(Selector::Word);
        let mut ed = editor("Lorem ip[s]um dolor", 1);
        host.observe(ed.id());
        host.dispatch(&mut ed, Command::SelectNext).unwrap();
        assert_eq!(ed.to_notation(), "Lorem ipsum [dolor]");
    }

    #[test]
    fn set_selector_changes_only_that_editor() {
        let mut host = Host::new(Selector::Word);
        let mut first = editor("[]ab cd", 1);
        let mut second = editor("[]ab cd", 2);
        host.observe(first.id());
        host.observe(second.id());

        host.dispatch(&mut first, Command::SetSelector(Selector::Char)).unwrap();
        host.dispatch(&mut first, Command::SelectNext).unwrap();
        host.dispatch(&mut second, Command::SelectNext).unwrap();

        assert_eq!(first.to_notation(), "[a]b cd");
        assert_eq!(second.to_notation(), "[ab] cd");
        assert_eq!(host.selector(EditorId(1)), Selector::Char);
        assert_eq!(host.selector(EditorId(2)), Selector::Word);
    }

    #[test]
    fn observe_keeps_existing_selector() {
        let mut host = Host::new(Selector::Word);
        let mut ed = editor("x", 3);
        host.observe(ed.id());
        host.dispatch(&mut ed, Command::SetSelector(Selector::Line)).unwrap();
        host.observe(ed.id());
        assert_eq!(host.selector(ed.id()), Selector::Line);
    }

    #[test]
    fn close_forgets_the_editor() {
        let mut host = Host::new(Selector::Number);
        host.observe(EditorId(4));
        assert!(host.is_observed(EditorId(4)));
        assert_eq!(host.close(EditorId(4)), Some(Selector::Number));
        assert!(!host.is_observed(EditorId(4)));
        assert_eq!(host.close(EditorId(4)), None);
    }

    #[test]
    fn expand_reports_notices() {
        let mut host = Host::new(Selector::Parentheses);
        let mut ed = editor("a [b] c", 5);
        let notices = host.dispatch(&mut ed, Command::Expand).unwrap();
        assert_eq!(notices, vec![Notice::NoRightBound]);
        assert_eq!(ed.to_notation(), "a [b] c");
    }

    #[test]
    fn paste_errors_propagate() {
        let mut host = Host::default();
        let mut ed = editor("[one]", 6);
        assert_eq!(host.dispatch(&mut ed, Command::Paste), Err(Error::ClipboardEmpty));
    }

    #[test]
    fn delete_then_paste() {
        let mut host = Host::new(Selector::Line);
        let mut ed = editor("[one]\ntwo\nthree", 7);
        host.dispatch(&mut ed, Command::DeleteSelections).unwrap();
        assert_eq!(ed.to_notation(), "[two]\nthree");
        ed.set_clipboard("one");
        host.dispatch(&mut ed, Command::Paste).unwrap();
        assert_eq!(ed.to_notation(), "[two]\none\nthree");
    }
}
