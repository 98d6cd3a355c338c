//! # keyano-core — selection engine for keyano
//!
//! This crate navigates and edits text as *text objects* (characters,
//! words, numbers, lines, balanced parentheses) across any number of
//! simultaneous selections:
//!
//! - **[`position`]** — `Position` (row, column) and `Range` types, 0-indexed, plus `Edit` mapping
//! - **[`buffer`]** — the `TextBuffer` contract and a rope-backed `Buffer`
//! - **[`selector`]** — `Selector`, the kinds of text object, and what each one matches
//! - **[`motion`]** — select/add next and previous, expand, up/down, select-all-in
//! - **[`action`]** — delete and paste at every selection
//! - **[`excursion`]** — save selections, edit elsewhere, restore them
//! - **[`editor`]** — the `Editor` contract and the in-memory `TextEditor`
//! - **[`notation`]** — `"Lorem ip[s]um"` bracket notation for text with selections
//!
//! The engine keeps no state between calls. The selector is always passed
//! in; remembering which one an editor uses is the host's job.

pub mod action;
mod boundary;
pub mod buffer;
pub mod editor;
pub mod error;
pub mod excursion;
pub mod motion;
pub mod notation;
pub mod position;
pub mod selector;

pub use buffer::{Buffer, LineEnding, ScanMatch, TextBuffer};
pub use editor::{Editor, EditorId, TextEditor};
pub use error::{Error, Result};
pub use motion::Notice;
pub use position::{Edit, Position, Range};
pub use selector::{ParseSelectorError, Selector};
