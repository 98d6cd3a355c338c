// SPDX-License-Identifier: MIT
//
// The command surface — one parameterless command per token.
//
// Tokens are what a keymap binds to. They are accepted with or without the
// `keyano:` namespace a host would register them under:
//
//   keyano:select-next   select-next   set-selector-line   paste

use std::fmt;
use std::str::FromStr;

use keyano_core::Selector;
use thiserror::Error;

/// Every command the host can dispatch.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Command {
    /// Make the selector the editor's active one.
    SetSelector(Selector),
    SelectNext,
    AddNext,
    SelectNextAfter,
    AddNextAfter,
    SelectPrevious,
    AddPrevious,
    SelectPreviousAfter,
    AddPreviousAfter,
    Up,
    Down,
    Expand,
    SelectAllIn,
    DeleteSelections,
    Paste,
}

/// Namespace prefix hosts register the commands under.
pub const NAMESPACE: &str = "keyano:";

const SET_SELECTOR: &str = "set-selector-";

/// Tokens of the commands that carry no selector.
const FIXED: [(&str, Command); 14] = [
    ("select-next", Command::SelectNext),
    ("add-next", Command::AddNext),
    ("select-next-after", Command::SelectNextAfter),
    ("add-next-after", Command::AddNextAfter),
    ("select-previous", Command::SelectPrevious),
    ("add-previous", Command::AddPrevious),
    ("select-previous-after", Command::SelectPreviousAfter),
    ("add-previous-after", Command::AddPreviousAfter),
    ("up", Command::Up),
    ("down", Command::Down),
    ("expand", Command::Expand),
    ("select-all-in", Command::SelectAllIn),
    ("delete-selections", Command::DeleteSelections),
    ("paste", Command::Paste),
];

impl Command {
    /// All commands, selector setters first.
    pub fn all() -> impl Iterator<Item = Self> {
        Selector::ALL
            .into_iter()
            .map(Self::SetSelector)
            .chain(FIXED.iter().map(|&(_, command)| command))
    }

    /// True for commands that edit the buffer.
    #[must_use]
    pub const fn edits(self) -> bool {
        matches!(self, Self::DeleteSelections | Self::Paste)
    }
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Self::SetSelector(selector) = self {
            return write!(f, "{SET_SELECTOR}{selector}");
        }
        let token = FIXED
            .iter()
            .find_map(|&(token, command)| (command == *self).then_some(token))
            .unwrap_or_default();
        f.write_str(token)
    }
}

/// Returned for a token that names no command.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("unknown command `{0}`")]
pub struct ParseCommandError(pub String);

impl FromStr for Command {
    type Err = ParseCommandError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let token = s.trim();
        let token = token.strip_prefix(NAMESPACE).unwrap_or(token);
        if let Some(name) = token.strip_prefix(SET_SELECTOR) {
            return name
                .parse()
                .map(Self::SetSelector)
                .map_err(|_| ParseCommandError(s.to_owned()));
        }
        FIXED
            .iter()
            .find_map(|&(name, command)| (name == token).then_some(command))
            .ok_or_else(|| ParseCommandError(s.to_owned()))
    }
}
