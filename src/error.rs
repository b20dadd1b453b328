//! Error types for every compiler stage.
//!
//! All of them are fatal: a compilation either produces a complete program
//! or stops at the first error it finds.

use thiserror::Error;

/// A defect in the grammar definition, found while building the parse table.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GrammarError {
    #[error("Unknown start symbol `{0}`")]
    UnknownStart(String),

    #[error("Nonterminal `{nonterminal}` has no alternatives")]
    EmptyRule { nonterminal: String },

    #[error("Unknown precedence tag `{tag}` on rule `{rule}`")]
    UnknownPrecedence { tag: String, rule: String },

    #[error("Non-associative operator `{token}` conflicts with rule `{rule}`")]
    NonAssociative { token: String, rule: String },

    #[error("Unresolved conflict in state {state} on `{token}`: {detail}")]
    Unresolved {
        state: usize,
        token: String,
        detail: String,
    },
}

/// The token stream does not match the grammar.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    #[error("Parse error on line {line}: unexpected {tag} `{value}` at token {position}")]
    UnexpectedToken {
        tag: String,
        value: String,
        position: usize,
        line: usize,
    },

    #[error("Parse error: unexpected end of input after token {position}")]
    UnexpectedEnd { position: usize },

    #[error("Reduction for `{rule}` failed: {detail}")]
    Action { rule: String, detail: String },
}

/// The AST handed to the code generator has a shape it cannot lower.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LowerError {
    #[error("Cannot destructure into a {kind} node")]
    InvalidPattern { kind: &'static str },

    #[error("Cannot call super outside of a class method")]
    SuperOutsideMethod,

    #[error("Unexpected {kind} node {context}")]
    InvalidNode {
        kind: &'static str,
        context: &'static str,
    },
}

/// Any failure along the token stream to output text pipeline.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CompileError {
    #[error(transparent)]
    Grammar(#[from] GrammarError),

    #[error(transparent)]
    Parse(#[from] ParseError),

    #[error(transparent)]
    Lower(#[from] LowerError),
}
