//! Command-line interface wiring for the `quizdump` binary.
//!
//! This module owns the clap definitions and delegates execution to the
//! one-shot operation handlers or to the interactive shell.

use std::io::{self, IsTerminal};

use anyhow::Result;
use clap::{ArgAction, Parser, Subcommand};
use quizdump::{BASE_URL_ENV, ClientConfig, DEFAULT_BASE_URL, RenderMode};

pub mod common;
pub mod ops;
pub mod shell;
pub mod utils;

/// Parsed CLI entrypoint for the `quizdump` binary.
#[derive(Parser, Debug)]
#[command(
    name = "quizdump",
    version,
    about = "Add, edit and browse questions in a CSV-backed question store"
)]
pub struct Cli {
    /// Base URL of the question store.
    #[arg(long, global = true, env = BASE_URL_ENV, default_value = DEFAULT_BASE_URL)]
    pub url: String,

    /// Emit HTML markup (`<br/>`, `&nbsp;`) instead of plain text.
    #[arg(long, global = true)]
    pub html: bool,

    /// Increase log verbosity (-v info, -vv debug). `RUST_LOG` takes precedence.
    #[arg(short, long, global = true, action = ArgAction::Count)]
    pub verbose: u8,

    /// Operation to perform.
    #[command(subcommand)]
    pub command: Command,
}

/// Operations made available to end users.
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Add a question: `L op R = answer, distractor, ...`.
    Create(ops::CreateArgs),
    /// Delete a question: `L op R`.
    Delete(ops::DeleteArgs),
    /// Replace a question with a new full question.
    Edit(ops::EditArgs),
    /// List questions matching a question or an answer.
    Filter(ops::FilterArgs),
    /// Reorder the stored entries.
    Sort(ops::SortArgs),
    /// List every stored question.
    View,
    /// Read operations line by line from stdin.
    Shell,
}

/// Execute the requested command.
pub fn run(cli: Cli) -> Result<()> {
    let render = if cli.html {
        RenderMode::Html
    } else {
        RenderMode::Text
    };
    let config = ClientConfig::new(&cli.url, render)?;
    let dispatcher = quizdump::connect(&config)?;
    let mut stdout = io::stdout().lock();
    match cli.command {
        Command::Create(args) => ops::create(&dispatcher, &config, args, &mut stdout),
        Command::Delete(args) => ops::delete(&dispatcher, &config, args, &mut stdout),
        Command::Edit(args) => ops::edit(&dispatcher, &config, args, &mut stdout),
        Command::Filter(args) => ops::filter(&dispatcher, &config, args, &mut stdout),
        Command::Sort(args) => ops::sort(&dispatcher, &config, args, &mut stdout),
        Command::View => ops::view(&dispatcher, &config, &mut stdout),
        Command::Shell => {
            let stdin = io::stdin();
            let prompt = stdin.is_terminal();
            shell::run(&dispatcher, &config, stdin.lock(), &mut stdout, prompt)
        }
    }
}
