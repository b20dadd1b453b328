//! Tokens consumed by the parser.
//!
//! The lexer and rewriter live outside this crate. They hand over a finished
//! stream in which layout is already explicit (`INDENT`, `OUTDENT` and
//! `TERMINATOR` tokens are present).

use serde::Deserialize;

/// A single terminal: the grammar tag plus the literal text it matched.
///
/// # Examples
/// ```text
/// IDENTIFIER "square"
/// NUMBER     "42"
/// ASSIGN     "="
/// INDENT     "2"
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    /// Terminal symbol name as used in the grammar
    pub tag: String,
    /// Source text of the token (may be empty for layout tokens)
    pub value: String,
    /// Source line, 0 when unknown
    pub line: usize,
}

impl Token {
    pub fn new(tag: impl Into<String>, value: impl Into<String>) -> Self {
        Token {
            tag: tag.into(),
            value: value.into(),
            line: 0,
        }
    }

    /// Attach a source line for error reporting.
    pub fn at_line(mut self, line: usize) -> Self {
        self.line = line;
        self
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawToken {
    Located(String, String, usize),
    Pair(String, String),
    Bare((String,)),
    Record {
        tag: String,
        #[serde(default)]
        value: Option<String>,
        #[serde(default)]
        line: usize,
    },
}

impl From<RawToken> for Token {
    fn from(raw: RawToken) -> Self {
        match raw {
            RawToken::Located(tag, value, line) => Token { tag, value, line },
            RawToken::Pair(tag, value) => Token::new(tag, value),
            RawToken::Bare((tag,)) => Token::new(tag, ""),
            RawToken::Record { tag, value, line } => Token {
                tag,
                value: value.unwrap_or_default(),
                line,
            },
        }
    }
}

/// Read a token stream from JSON.
///
/// Each element may be `[tag, value]`, `[tag, value, line]`, `[tag]` or
/// `{"tag": .., "value": .., "line": ..}`.
///
/// # Examples
/// ```
/// use kettle_lang::token::tokens_from_json;
///
/// let tokens = tokens_from_json(r#"[["IDENTIFIER", "a"], ["ASSIGN", "="], ["NUMBER", "1", 3]]"#).unwrap();
/// assert_eq!(tokens.len(), 3);
/// assert_eq!(tokens[2].line, 3);
/// ```
pub fn tokens_from_json(input: &str) -> Result<Vec<Token>, serde_json::Error> {
    let raw: Vec<RawToken> = serde_json::from_str(input)?;
    Ok(raw.into_iter().map(Token::from).collect())
}
