pub mod ast;
pub mod cli;
pub mod codegen;
pub mod error;
pub mod grammar;
pub mod parser;
pub mod scope;
pub mod token;

pub use ast::Node;
pub use codegen::{CompileOptions, Compiler, lower};
pub use error::{CompileError, GrammarError, LowerError, ParseError};
pub use parser::Parser;
pub use token::{Token, tokens_from_json};

/// Parse a token stream with the shared language parser.
pub fn parse(tokens: &[Token]) -> Result<Node, CompileError> {
    let parser = parser::shared()?;
    Ok(parser.parse(tokens)?)
}

/// Parse and lower a token stream to a JavaScript program.
///
/// # Examples
/// ```
/// use kettle_lang::{compile, CompileOptions, Token};
///
/// let tokens = vec![
///     Token::new("IDENTIFIER", "x"),
///     Token::new("ASSIGN", "="),
///     Token::new("NUMBER", "1"),
///     Token::new("TERMINATOR", "\n"),
/// ];
/// let js = compile(&tokens, &CompileOptions::default()).unwrap();
/// assert_eq!(js, "(function(){\n  var x;\n  x = 1;\n})();\n");
/// ```
pub fn compile(tokens: &[Token], options: &CompileOptions) -> Result<String, CompileError> {
    let root = parse(tokens)?;
    Ok(lower(&root, options)?)
}
