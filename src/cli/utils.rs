//! Convenience helpers shared across command handlers.

use std::fs;
use std::io::{self, Read, Write};
use std::path::PathBuf;

use anyhow::{Context, Result};
use quizdump::{ClientConfig, Outcome};

/// Resolve input for commands that accept either an inline string or a file.
///
/// Trailing line breaks are dropped so that `echo "2 + 2" | quizdump delete`
/// behaves like the inline form.
pub fn read_text_arg(text: Option<String>, from: Option<PathBuf>) -> Result<String> {
    let raw = if let Some(t) = text {
        t
    } else if let Some(path) = from {
        if path.as_os_str() == "-" {
            read_stdin()?
        } else {
            fs::read_to_string(&path)
                .with_context(|| format!("failed to read {}", path.display()))?
        }
    } else {
        read_stdin()?
    };
    Ok(raw.trim_end_matches(['\n', '\r']).to_string())
}

/// Read the entire stdin stream into memory.
pub fn read_stdin() -> Result<String> {
    let mut buffer = String::new();
    io::stdin()
        .read_to_string(&mut buffer)
        .context("failed to read from stdin")?;
    Ok(buffer)
}

/// Split a `;`-separated option list, trimming each entry.
pub fn split_options(raw: &str) -> Vec<String> {
    if raw.trim().is_empty() {
        return Vec::new();
    }
    raw.split(';').map(|opt| opt.trim().to_string()).collect()
}

/// Write an outcome to `out` unless it was superseded.
pub fn emit<W: Write>(out: &mut W, config: &ClientConfig, outcome: &Outcome) -> Result<()> {
    if let Some(text) = outcome.render(config.render) {
        writeln!(out, "{}", text).context("failed to write result")?;
    }
    Ok(())
}
