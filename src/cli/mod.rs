//! CLI support for kettle-lang
//!
//! The `kettle` binary is a thin clap wrapper around these functions, so
//! other tools can drive the compiler the same way without spawning it.

mod compile;
mod grammar;
mod tree;

pub use compile::{CompileCommand, execute_compile};
pub use grammar::{GrammarReport, execute_grammar};
pub use tree::execute_tree;

use std::io;

/// Errors that can occur during CLI operations
#[derive(Debug)]
pub enum CliError {
    /// Grammar, parse or lowering failure
    Compile(crate::CompileError),
    /// The token stream is not valid JSON
    Json(serde_json::Error),
    /// IO error
    Io(io::Error),
    /// No input provided
    NoInput,
}

impl std::fmt::Display for CliError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CliError::Compile(e) => write!(f, "{}", e),
            CliError::Json(e) => write!(f, "Invalid token stream: {}", e),
            CliError::Io(e) => write!(f, "IO error: {}", e),
            CliError::NoInput => write!(
                f,
                "No input provided. Use --input or pipe a JSON token stream to stdin."
            ),
        }
    }
}

impl std::error::Error for CliError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            CliError::Compile(e) => Some(e),
            CliError::Json(e) => Some(e),
            CliError::Io(e) => Some(e),
            CliError::NoInput => None,
        }
    }
}

impl From<crate::CompileError> for CliError {
    fn from(e: crate::CompileError) -> Self {
        CliError::Compile(e)
    }
}

impl From<crate::GrammarError> for CliError {
    fn from(e: crate::GrammarError) -> Self {
        CliError::Compile(e.into())
    }
}

impl From<serde_json::Error> for CliError {
    fn from(e: serde_json::Error) -> Self {
        CliError::Json(e)
    }
}

impl From<io::Error> for CliError {
    fn from(e: io::Error) -> Self {
        CliError::Io(e)
    }
}

/// Decode the JSON token stream every command takes as input.
fn read_tokens(input: Option<&str>) -> Result<Vec<crate::Token>, CliError> {
    let json = input.ok_or(CliError::NoInput)?;
    Ok(crate::tokens_from_json(json)?)
}
