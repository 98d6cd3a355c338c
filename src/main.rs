// SPDX-License-Identifier: MIT
//
// keyano — objectual editing from the command line.
//
// This is the binary that wires the engine to a host:
//
//   keyano-core → buffer, selectors, motions, actions
//   host        → per-editor active selector, command dispatch
//   config      → default selector, notices, log filter
//
// One run is one editor session:
//
//   args → config → logging → buffer + selections → Host::observe
//        → dispatch each command → notices on stderr
//        → bracket notation on stdout (and --write back to the file
//          when a command changed it)

mod cli;
mod command;
mod config;
mod host;
mod logging;

use std::io::{self, Read};
use std::process;

use anyhow::{Context, Result, bail};
use clap::Parser;
use keyano_core::{Buffer, Editor, EditorId, TextBuffer, TextEditor};

use crate::cli::Cli;
use crate::command::{Command, NAMESPACE};
use crate::config::Config;
use crate::host::Host;

/// The one editor a command-line session opens.
const SESSION_EDITOR: EditorId = EditorId(1);

fn main() {
    if let Err(e) = run() {
        eprintln!("keyano: {e:#}");
        process::exit(1);
    }
}

fn run() -> Result<()> {
    let cli = Cli::parse();
    if cli.list_commands {
        for command in Command::all() {
            println!("{NAMESPACE}{command}");
        }
        return Ok(());
    }

    let config = Config::load_with_override(cli.config.as_deref())?;
    logging::init(config.log.as_deref())?;

    let mut editor = open_editor(&cli)?.with_id(SESSION_EDITOR);
    if let Some(text) = &cli.clipboard {
        editor.set_clipboard(text.as_str());
    }

    let mut host = Host::new(config.default_selector);
    host.observe(editor.id());
    tracing::debug!(
        editor = editor.id().0,
        selections = editor.selections().len(),
        "session opened"
    );

    for &command in &cli.commands {
        let notices = host
            .dispatch(&mut editor, command)
            .with_context(|| format!("`{command}` failed"))?;
        if config.notices {
            for notice in notices {
                eprintln!("keyano: {command}: {notice}");
            }
        }
    }

    println!("{}", editor.to_notation());

    let id = editor.id();
    if cli.write {
        let mut buffer = editor.into_buffer();
        if buffer.is_modified() {
            buffer.save().with_context(|| match buffer.path() {
                Some(path) => format!("failed to write {}", path.display()),
                None => "failed to write buffer".to_owned(),
            })?;
        } else {
            tracing::info!("buffer unchanged, nothing written");
        }
    }
    host.close(id);
    Ok(())
}

/// Build the session editor from `--text`, `--file`, or stdin, then apply
/// any `--select` ranges.
fn open_editor(cli: &Cli) -> Result<TextEditor> {
    let mut editor = if let Some(text) = &cli.text {
        TextEditor::from_notation(text).context("invalid --text")?
    } else if let Some(path) = &cli.file {
        let buffer = Buffer::from_file(path)
            .with_context(|| format!("failed to read {}", path.display()))?;
        tracing::debug!(
            path = %path.display(),
            rows = buffer.line_count(),
            line_ending = ?buffer.ending(),
            "buffer loaded"
        );
        TextEditor::new(buffer)
    } else {
        let mut text = String::new();
        io::stdin()
            .read_to_string(&mut text)
            .context("failed to read stdin")?;
        TextEditor::new(Buffer::from_text(&text))
    };

    if !cli.selections.is_empty() {
        let buffer = editor.buffer();
        for range in &cli.selections {
            let inside = |pos| buffer.clip_position(pos) == pos;
            if !inside(range.start) || !inside(range.end) {
                bail!("selection {range} is outside the buffer");
            }
        }
        editor.replace_selections(cli.selections.clone());
    }
    Ok(editor)
}
