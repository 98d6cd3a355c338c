// SPDX-License-Identifier: MIT
//
// Command-line arguments.
//
// A run loads one buffer, applies a list of commands to it in order, and
// prints the result in bracket notation:
//
//   keyano --text 'Lorem ip[s]um dolor' select-next
//   keyano --file notes.txt --select 3:1 set-selector-line delete-selections --write
//
// Positions on the command line are 1-indexed `ROW:COL`, the way they are
// displayed.

use std::path::PathBuf;

use clap::Parser;
use keyano_core::{Position, Range};

use crate::command::Command;

/// Select, grow, and edit words, lines, numbers, and parentheses across
/// many selections.
#[derive(Debug, Parser)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Buffer text in bracket notation: `[` and `]` mark selections,
    /// `[]` a caret, `\[` `\]` `\\` literal characters.
    #[arg(short, long, conflicts_with = "file")]
    pub text: Option<String>,

    /// Read the buffer from a file. Without `--text` or `--file` the buffer
    /// is read from stdin.
    #[arg(short, long)]
    pub file: Option<PathBuf>,

    /// Selection as `ROW:COL-ROW:COL` or a caret as `ROW:COL`. Repeatable;
    /// replaces the selections from `--text`.
    #[arg(short, long = "select", value_name = "RANGE", value_parser = parse_range)]
    pub selections: Vec<Range>,

    /// Text the `paste` command inserts.
    #[arg(short, long)]
    pub clipboard: Option<String>,

    /// Config file to use instead of the default location.
    #[arg(long, env = "KEYANO_CONFIG")]
    pub config: Option<PathBuf>,

    /// Write the edited buffer back to `--file` if a command changed it.
    #[arg(short, long, requires = "file")]
    pub write: bool,

    /// Print every command token and exit.
    #[arg(long)]
    pub list_commands: bool,

    /// Commands to run, in order, e.g. `set-selector-line select-next`.
    #[arg(required_unless_present = "list_commands", value_name = "COMMAND")]
    pub commands: Vec<Command>,
}

/// Parse `ROW:COL` into a 0-indexed position.
fn parse_position(s: &str) -> Result<Position, String> {
    let (row, column) = s
        .split_once(':')
        .ok_or_else(|| format!("`{s}` is not ROW:COL"))?;
    let index = |part: &str| -> Result<usize, String> {
        match part.trim().parse::<usize>() {
            Ok(0) => Err(format!("`{s}`: rows and columns start at 1")),
            Ok(n) => Ok(n - 1),
            Err(e) => Err(format!("`{s}`: {e}")),
        }
    };
    Ok(Position::new(index(row)?, index(column)?))
}

/// Parse `ROW:COL-ROW:COL` or `ROW:COL`. Reversed endpoints are reordered.
pub fn parse_range(s: &str) -> Result<Range, String> {
    match s.split_once('-') {
        Some((start, end)) => Ok(Range::ordered(parse_position(start)?, parse_position(end)?)),
        None => parse_position(s).map(Range::point),
    }
}
