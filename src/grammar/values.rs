use crate::ast::{Expressions, ForSource, Node};
use crate::error::ParseError;
use crate::token::Token;

/// A reduction action: turns the values matched by a rule's right-hand side
/// into the value of its left-hand side.
pub type Reduction = fn(&mut Args<'_>) -> Result<StackValue, ParseError>;

/// An entry on the parser's value stack.
#[derive(Debug, Clone, PartialEq)]
pub enum StackValue {
    /// A shifted terminal
    Token(Token),
    Node(Node),
    Nodes(Vec<Node>),
    Block(Expressions),
    /// A `catch` clause: the error name and the recovery block
    Catch(Node, Expressions),
    Source(ForSource),
    /// The value of an empty or purely syntactic rule
    Empty,
}

impl StackValue {
    fn describe(&self) -> &'static str {
        match self {
            StackValue::Token(_) => "token",
            StackValue::Node(_) => "node",
            StackValue::Nodes(_) => "node list",
            StackValue::Block(_) => "block",
            StackValue::Catch(..) => "catch clause",
            StackValue::Source(_) => "loop source",
            StackValue::Empty => "nothing",
        }
    }
}

/// The values matched by a rule, addressed by 1-based position the way
/// grammar rules are written (`$1`, `$2`, ...).
pub struct Args<'a> {
    rule: &'a str,
    values: Vec<Option<StackValue>>,
}

impl<'a> Args<'a> {
    pub(crate) fn new(rule: &'a str, values: Vec<StackValue>) -> Self {
        Args {
            rule,
            values: values.into_iter().map(Some).collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Move the value at `position` out.
    pub fn take(&mut self, position: usize) -> Result<StackValue, ParseError> {
        position
            .checked_sub(1)
            .and_then(|idx| self.values.get_mut(idx))
            .and_then(Option::take)
            .ok_or_else(|| ParseError::Action {
                rule: self.rule.to_string(),
                detail: format!("no value at position {}", position),
            })
    }

    pub fn node(&mut self, position: usize) -> Result<Node, ParseError> {
        match self.take(position)? {
            StackValue::Node(node) => Ok(node),
            StackValue::Block(block) => Ok(Node::Expressions(block)),
            other => Err(self.mismatch(position, "node", &other)),
        }
    }

    pub fn nodes(&mut self, position: usize) -> Result<Vec<Node>, ParseError> {
        match self.take(position)? {
            StackValue::Nodes(nodes) => Ok(nodes),
            StackValue::Node(node) => Ok(vec![node]),
            StackValue::Empty => Ok(Vec::new()),
            other => Err(self.mismatch(position, "node list", &other)),
        }
    }

    pub fn block(&mut self, position: usize) -> Result<Expressions, ParseError> {
        match self.take(position)? {
            StackValue::Block(block) => Ok(block),
            StackValue::Node(Node::Expressions(block)) => Ok(block),
            StackValue::Node(node) => Ok(Expressions::wrap(vec![node])),
            other => Err(self.mismatch(position, "block", &other)),
        }
    }

    /// Source text of a shifted token.
    pub fn text(&mut self, position: usize) -> Result<String, ParseError> {
        match self.take(position)? {
            StackValue::Token(token) => Ok(token.value),
            other => Err(self.mismatch(position, "token", &other)),
        }
    }

    pub fn source(&mut self, position: usize) -> Result<ForSource, ParseError> {
        match self.take(position)? {
            StackValue::Source(source) => Ok(source),
            other => Err(self.mismatch(position, "loop source", &other)),
        }
    }

    pub fn catch(&mut self, position: usize) -> Result<(Node, Expressions), ParseError> {
        match self.take(position)? {
            StackValue::Catch(error, recovery) => Ok((error, recovery)),
            other => Err(self.mismatch(position, "catch clause", &other)),
        }
    }

    /// An action error attributed to the rule being reduced.
    pub fn fail(&self, detail: String) -> ParseError {
        ParseError::Action {
            rule: self.rule.to_string(),
            detail,
        }
    }

    fn mismatch(&self, position: usize, expected: &str, found: &StackValue) -> ParseError {
        ParseError::Action {
            rule: self.rule.to_string(),
            detail: format!(
                "expected a {} at position {}, found {}",
                expected,
                position,
                found.describe()
            ),
        }
    }
}
