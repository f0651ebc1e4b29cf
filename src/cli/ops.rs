//! One-shot operations (`quizdump create|delete|edit|filter|sort|view`).

use std::io::Write;
use std::path::PathBuf;

use anyhow::Result;
use clap::Args;
use quizdump::{
    Attribute, ClientConfig, Command, Dispatcher, FilterOp, Operation, SortOrder, Transport,
};

use crate::cli::common::{AttributeArg, FilterOpArg, SortOrderArg};
use crate::cli::utils::{emit, read_text_arg};

/// Arguments for `quizdump create`.
#[derive(Args, Debug)]
pub struct CreateArgs {
    /// Full question, e.g. `2 + 2 = 4, 3, 5`.
    pub input: Option<String>,
    /// Load the question from file (`-` for stdin).
    #[arg(long = "from", conflicts_with = "input")]
    pub from: Option<PathBuf>,
}

/// Arguments for `quizdump delete`.
#[derive(Args, Debug)]
pub struct DeleteArgs {
    /// Question to delete, e.g. `2 + 2`.
    pub input: Option<String>,
    /// Load the question from file (`-` for stdin).
    #[arg(long = "from", conflicts_with = "input")]
    pub from: Option<PathBuf>,
}

/// Arguments for `quizdump edit`.
#[derive(Args, Debug)]
pub struct EditArgs {
    /// Question to change, e.g. `2 + 2`.
    pub input: Option<String>,
    /// Load the question to change from file (`-` for stdin).
    #[arg(long = "from", conflicts_with = "input")]
    pub from: Option<PathBuf>,
    /// Replacement full question, e.g. `2 + 3 = 5, 4`.
    #[arg(long)]
    pub to: String,
}

/// Arguments for `quizdump filter`.
#[derive(Args, Debug)]
pub struct FilterArgs {
    /// Question (`L op R`) or answer (digits) to compare against.
    pub input: String,
    /// Comparison to apply.
    #[arg(long, value_enum, default_value_t = FilterOpArg::Find)]
    pub op: FilterOpArg,
    /// Attribute to compare.
    #[arg(long = "by", value_enum, default_value_t = AttributeArg::Question)]
    pub by: AttributeArg,
}

/// Arguments for `quizdump sort`.
#[derive(Args, Debug)]
pub struct SortArgs {
    /// Sort direction.
    #[arg(long, value_enum, default_value_t = SortOrderArg::Asc)]
    pub order: SortOrderArg,
    /// Attribute to sort by.
    #[arg(long = "by", value_enum, default_value_t = AttributeArg::Question)]
    pub by: AttributeArg,
}

pub fn create<T: Transport, W: Write>(
    dispatcher: &Dispatcher<T>,
    config: &ClientConfig,
    args: CreateArgs,
    out: &mut W,
) -> Result<()> {
    let input = read_text_arg(args.input, args.from)?;
    let command = Command::new(Operation::Create).with_input(&input);
    emit(out, config, &dispatcher.execute(&command))
}

pub fn delete<T: Transport, W: Write>(
    dispatcher: &Dispatcher<T>,
    config: &ClientConfig,
    args: DeleteArgs,
    out: &mut W,
) -> Result<()> {
    let input = read_text_arg(args.input, args.from)?;
    let command = Command::new(Operation::Delete).with_input(&input);
    emit(out, config, &dispatcher.execute(&command))
}

pub fn edit<T: Transport, W: Write>(
    dispatcher: &Dispatcher<T>,
    config: &ClientConfig,
    args: EditArgs,
    out: &mut W,
) -> Result<()> {
    let input = read_text_arg(args.input, args.from)?;
    let command = Command::new(Operation::Edit)
        .with_input(&input)
        .with_options([args.to]);
    emit(out, config, &dispatcher.execute(&command))
}

pub fn filter<T: Transport, W: Write>(
    dispatcher: &Dispatcher<T>,
    config: &ClientConfig,
    args: FilterArgs,
    out: &mut W,
) -> Result<()> {
    let op: FilterOp = args.op.into();
    let by: Attribute = args.by.into();
    let command = Command::new(Operation::Filter)
        .with_input(&args.input)
        .with_options([op.as_str(), by.as_str()]);
    emit(out, config, &dispatcher.execute(&command))
}

pub fn sort<T: Transport, W: Write>(
    dispatcher: &Dispatcher<T>,
    config: &ClientConfig,
    args: SortArgs,
    out: &mut W,
) -> Result<()> {
    let order: SortOrder = args.order.into();
    let by: Attribute = args.by.into();
    let command = Command::new(Operation::Sort).with_options([order.as_str(), by.as_str()]);
    emit(out, config, &dispatcher.execute(&command))
}

pub fn view<T: Transport, W: Write>(
    dispatcher: &Dispatcher<T>,
    config: &ClientConfig,
    out: &mut W,
) -> Result<()> {
    emit(out, config, &dispatcher.view_all())
}
