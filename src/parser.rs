use crate::ast::Node;
use crate::error::{GrammarError, ParseError};
use crate::grammar::{Args, ParseTable, StackValue, Step, END, grammar};
use crate::token::Token;
use std::sync::OnceLock;

/// Table-driven shift/reduce parser.
///
/// The parser holds no per-parse state, so one instance can parse any number
/// of token streams. Building the language table takes a moment; [`shared`]
/// builds it once per process.
#[derive(Debug, Clone)]
pub struct Parser {
    table: ParseTable,
}

static SHARED: OnceLock<Result<Parser, GrammarError>> = OnceLock::new();

/// The parser for the language grammar, compiled on first use.
pub fn shared() -> Result<&'static Parser, GrammarError> {
    SHARED.get_or_init(Parser::new).as_ref().map_err(Clone::clone)
}

impl Parser {
    /// Compile the language grammar.
    pub fn new() -> Result<Self, GrammarError> {
        Ok(Parser::from_table(grammar().build()?))
    }

    /// Run an arbitrary compiled grammar.
    pub fn from_table(table: ParseTable) -> Self {
        Parser { table }
    }

    pub fn table(&self) -> &ParseTable {
        &self.table
    }

    /// Parse a complete token stream into the value of the start symbol.
    pub fn parse(&self, tokens: &[Token]) -> Result<Node, ParseError> {
        let mut states: Vec<usize> = vec![0];
        let mut values: Vec<StackValue> = Vec::new();
        let mut position = 0;

        loop {
            let state = states.last().copied().unwrap_or(0);
            let token = tokens.get(position);
            let terminal = match token {
                // The end marker is never a tag an input token can carry.
                Some(token) => self
                    .table
                    .terminal(&token.tag)
                    .filter(|&terminal| terminal != END)
                    .ok_or_else(|| unexpected(token, position))?,
                None => END,
            };

            let step = self.table.action(state, terminal).ok_or_else(|| match token {
                Some(token) => unexpected(token, position),
                None => ParseError::UnexpectedEnd { position },
            })?;

            match step {
                Step::Shift(next) => {
                    let Some(token) = token else {
                        return Err(ParseError::UnexpectedEnd { position });
                    };
                    values.push(StackValue::Token(token.clone()));
                    states.push(next);
                    position += 1;
                }
                Step::Reduce(rule) => {
                    let value = self.reduce(rule, &mut states, &mut values)?;
                    values.push(value);
                }
                Step::Accept => return self.accept(values.pop()),
            }
        }
    }

    /// Pop the matched values, run the rule's action and take the goto.
    fn reduce(
        &self,
        rule: usize,
        states: &mut Vec<usize>,
        values: &mut Vec<StackValue>,
    ) -> Result<StackValue, ParseError> {
        let production = self.table.production(rule).ok_or_else(|| ParseError::Action {
            rule: format!("#{}", rule),
            detail: "no such production".to_string(),
        })?;

        let matched = values.split_off(values.len().saturating_sub(production.len()));
        states.truncate(states.len().saturating_sub(production.len()));

        let value = match production.action {
            Some(action) => action(&mut Args::new(production.text(), matched))?,
            None => matched.into_iter().next().unwrap_or(StackValue::Empty),
        };

        let exposed = states.last().copied().unwrap_or(0);
        let next = self
            .table
            .goto(exposed, production.lhs)
            .ok_or_else(|| ParseError::Action {
                rule: production.text().to_string(),
                detail: format!("no goto from state {}", exposed),
            })?;
        states.push(next);
        Ok(value)
    }

    fn accept(&self, value: Option<StackValue>) -> Result<Node, ParseError> {
        match value {
            Some(StackValue::Node(node)) => Ok(node),
            Some(StackValue::Block(block)) => Ok(Node::Expressions(block)),
            Some(StackValue::Empty) | None => Ok(Node::Expressions(Default::default())),
            Some(other) => Err(ParseError::Action {
                rule: "$accept".to_string(),
                detail: format!("the program reduced to {:?}", other),
            }),
        }
    }
}

fn unexpected(token: &Token, position: usize) -> ParseError {
    ParseError::UnexpectedToken {
        tag: token.tag.clone(),
        value: token.value.clone(),
        position,
        line: token.line,
    }
}
