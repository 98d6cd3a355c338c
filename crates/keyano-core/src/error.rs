//! Engine errors.
//!
//! Not-found is never an error here: a missing next instance or an
//! unbalanced delimiter comes back as `None` and leaves the selection alone.
//! These variants cover the few edits that can genuinely fail.

use thiserror::Error;

use crate::position::Position;

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum Error {
    #[error("position {0} is outside the buffer")]
    OutOfBounds(Position),

    #[error("clipboard is empty")]
    ClipboardEmpty,
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
