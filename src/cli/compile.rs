//! Compile a token stream to JavaScript

use super::{CliError, read_tokens};
use crate::CompileOptions;

/// Options for the compile command
#[derive(Debug, Clone, Default)]
pub struct CompileCommand {
    /// JSON token stream
    pub input: Option<String>,
    /// Omit the top-level function wrapper
    pub bare: bool,
    /// Leave top-level variables undeclared
    pub globals: bool,
    /// Return the value of the last expression
    pub request_return: bool,
}

impl CompileCommand {
    fn options(&self) -> CompileOptions {
        CompileOptions {
            no_wrap: self.bare,
            globals: self.globals,
            request_return: self.request_return,
        }
    }
}

/// Execute a compile operation, returning the generated program
pub fn execute_compile(command: &CompileCommand) -> Result<String, CliError> {
    let tokens = read_tokens(command.input.as_deref())?;
    Ok(crate::compile(&tokens, &command.options())?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_compile_bare() {
        let command = CompileCommand {
            input: Some(r#"[["IDENTIFIER", "a"], ["ASSIGN", "="], ["NUMBER", "1"]]"#.to_string()),
            bare: true,
            ..Default::default()
        };
        assert_eq!(execute_compile(&command).unwrap(), "var a;\na = 1;");
    }

    #[test]
    fn test_missing_input() {
        let result = execute_compile(&CompileCommand::default());
        assert!(matches!(result, Err(CliError::NoInput)));
    }

    #[test]
    fn test_bad_json() {
        let command = CompileCommand {
            input: Some("not json".to_string()),
            ..Default::default()
        };
        assert!(matches!(execute_compile(&command), Err(CliError::Json(_))));
    }
}
