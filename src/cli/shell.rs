//! Line-oriented session (`quizdump shell`).
//!
//! Mirrors the controls of the question page: pick an operation, type the
//! input, set the options, then submit. Each `submit` hands a snapshot of the
//! current selection to the dispatcher, so later edits never affect it.

use std::io::{BufRead, Write};

use anyhow::{Context, Result};
use quizdump::{ClientConfig, Command, Dispatcher, Operation, Transport};
use tracing::debug;

use crate::cli::utils::{emit, split_options};

const HELP: &str = "\
op <CREATE|DELETE|EDIT|FILTER|SORT|NONE>  select the operation
input <text>                              set the input (sanitized)
options <a>[; <b> ...]                    set the options
submit                                    run the selected operation
view                                      list every question
show                                      print the current selection
help                                      print this help
quit                                      leave the shell";

/// Current selection in the shell.
#[derive(Debug, Default)]
struct Session {
    draft: Command,
}

enum Step {
    Continue,
    Quit,
}

/// Run the shell until `quit` or end of input.
pub fn run<T, R, W>(
    dispatcher: &Dispatcher<T>,
    config: &ClientConfig,
    input: R,
    out: &mut W,
    prompt: bool,
) -> Result<()>
where
    T: Transport,
    R: BufRead,
    W: Write,
{
    let mut session = Session::default();
    if prompt {
        writeln!(out, "Connected to {}. Type 'help' for commands.", config.base_url)?;
    }
    let mut lines = input.lines();
    loop {
        if prompt {
            write!(out, "> ")?;
            out.flush()?;
        }
        let Some(line) = lines.next() else {
            break;
        };
        let line = line.context("failed to read shell input")?;
        if let Step::Quit = session.step(dispatcher, config, &line, out)? {
            break;
        }
    }
    Ok(())
}

impl Session {
    fn step<T: Transport, W: Write>(
        &mut self,
        dispatcher: &Dispatcher<T>,
        config: &ClientConfig,
        line: &str,
        out: &mut W,
    ) -> Result<Step> {
        let trimmed = line.trim_start();
        let (word, rest) = trimmed.split_once(' ').unwrap_or((trimmed, ""));
        match word.trim_end() {
            "" => {}
            "op" | "operation" => match rest.parse::<Operation>() {
                Ok(Operation::View) => {
                    writeln!(out, "VIEW runs immediately; use 'view'.")?;
                }
                Ok(op) => self.draft = std::mem::take(&mut self.draft).with_operation(op),
                Err(err) => writeln!(out, "{}", err)?,
            },
            "input" => self.draft = std::mem::take(&mut self.draft).with_input(rest),
            "options" => {
                self.draft = std::mem::take(&mut self.draft).with_options(split_options(rest))
            }
            "submit" | "run" => {
                let snapshot = self.draft.clone();
                debug!(command = %snapshot, "submitting");
                emit(out, config, &dispatcher.execute(&snapshot))?;
            }
            "view" => emit(out, config, &dispatcher.view_all())?,
            "show" => writeln!(out, "{}", self.draft)?,
            "help" => writeln!(out, "{}", HELP)?,
            "quit" | "exit" => return Ok(Step::Quit),
            other => writeln!(out, "unknown shell command '{}', try 'help'", other)?,
        }
        Ok(Step::Continue)
    }
}
