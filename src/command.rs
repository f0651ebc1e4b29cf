use crate::grammar::sanitize;
use std::fmt;
use std::str::FromStr;

use anyhow::{Result, anyhow};

/// Operation selected on the page before pressing submit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Operation {
    Create,
    Delete,
    Edit,
    Filter,
    Sort,
    View,
    #[default]
    None,
}

impl Operation {
    pub fn name(self) -> &'static str {
        match self {
            Operation::Create => "CREATE",
            Operation::Delete => "DELETE",
            Operation::Edit => "EDIT",
            Operation::Filter => "FILTER",
            Operation::Sort => "SORT",
            Operation::View => "VIEW",
            Operation::None => "None",
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Operation {
    type Err = anyhow::Error;

    /// Case-insensitive; unknown names are an error rather than [`Operation::None`].
    fn from_str(s: &str) -> Result<Self> {
        let op = match s.trim().to_ascii_uppercase().as_str() {
            "CREATE" => Operation::Create,
            "DELETE" => Operation::Delete,
            "EDIT" => Operation::Edit,
            "FILTER" => Operation::Filter,
            "SORT" => Operation::Sort,
            "VIEW" => Operation::View,
            "NONE" => Operation::None,
            _ => return Err(anyhow!("unknown operation '{}'", s.trim())),
        };
        Ok(op)
    }
}

/// Snapshot of what the user has selected and typed.
///
/// Edits return a new value; whatever is handed to the dispatcher is never
/// touched again, so a later edit cannot leak into an in-flight request.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Command {
    operation: Operation,
    input: String,
    options: Vec<String>,
}

impl Command {
    pub fn new(operation: Operation) -> Self {
        Self {
            operation,
            ..Self::default()
        }
    }

    pub fn with_operation(mut self, operation: Operation) -> Self {
        self.operation = operation;
        self
    }

    /// Record user input. The text is sanitized on the way in.
    pub fn with_input(mut self, raw: &str) -> Self {
        self.input = sanitize(raw);
        self
    }

    /// Replace the auxiliary options. Options are stored verbatim.
    pub fn with_options<I, S>(mut self, options: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.options = options.into_iter().map(Into::into).collect();
        self
    }

    pub fn operation(&self) -> Operation {
        self.operation
    }

    pub fn input(&self) -> &str {
        &self.input
    }

    pub fn options(&self) -> &[String] {
        &self.options
    }

    /// Option at `index`, or `""` when absent.
    pub fn option(&self, index: usize) -> &str {
        self.options.get(index).map(String::as_str).unwrap_or("")
    }
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "operation={} input={:?} options={:?}",
            self.operation, self.input, self.options
        )
    }
}
